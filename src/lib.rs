//! Tabular reinforcement learning for a racetrack grid world
//!
//! This crate provides:
//! - A discretized racetrack domain: grid maps, velocity-based states, and
//!   stochastic motion dynamics
//! - A model-based Value-Iteration agent that sweeps the full state space
//!   using known reward and transition functions
//! - A model-free Q-Learning agent that learns from simulated episodes
//! - An episode simulator with per-step listener callbacks
//! - Optimistic exploration shared by both agents' policies and update rules

pub mod agents;
pub mod dynamics;
pub mod error;
pub mod ports;
pub mod simulator;
pub mod types;
pub mod world;

pub use agents::{QLearningAgent, ValueIteratingAgent};
pub use dynamics::{TrackRewardFunction, TrackTransitionFunction};
pub use error::{Error, Result};
pub use ports::{Agent, Policy, RewardFunction, Simulator, SimulatorListener, TransitionFunction};
pub use simulator::{EpisodeSimulator, SimulationStep, SimulatorEvent};
pub use types::{Action, LEGAL_ACTIONS, MAX_SPEED, State, Terrain};
pub use world::WorldMap;
