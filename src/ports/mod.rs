//! Ports (trait boundaries) for the learning core.
//!
//! These traits are the seams between the agents and their collaborators:
//! the decision policy, the world model (reward and transition functions),
//! and the episode simulator. Agents consume collaborators through these
//! traits only; concrete implementations live in `dynamics` and `simulator`.

pub mod agent;
pub mod functions;
pub mod policy;
pub mod simulator;

pub use agent::Agent;
pub use functions::{RewardFunction, TransitionFunction};
pub use policy::Policy;
pub use simulator::{Simulator, SimulatorListener};
