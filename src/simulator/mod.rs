//! Episode simulation
//!
//! The simulator drives one episode at a time: it asks a policy for an action
//! every timestep, applies the world's transition function, accumulates the
//! score through the reward function, and records a [`SimulationStep`] per
//! transition. Registered [`crate::ports::SimulatorListener`]s are notified of
//! each step as it happens, so learners can update online instead of replaying
//! the returned trajectory.

pub mod episode;
pub mod step;

pub use episode::EpisodeSimulator;
pub use step::{SimulationStep, SimulatorEvent};
