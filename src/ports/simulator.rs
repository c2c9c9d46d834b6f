//! Simulator port - episode generation consumed by simulation-based agents.

use crate::{
    error::Result,
    ports::policy::Policy,
    simulator::{SimulationStep, SimulatorEvent},
};

/// Receives a callback for every timestep of a simulation.
///
/// Listeners let learning agents update in lockstep with the simulation
/// instead of replaying the trajectory afterwards.
pub trait SimulatorListener {
    /// Called once per timestep, after the step has been recorded.
    fn step_taken(&mut self, event: &SimulatorEvent<'_>) -> Result<()>;
}

/// Drives one episode at a time under a caller-supplied policy.
pub trait Simulator {
    /// Run a single episode from a start state to a terminal condition (goal
    /// reached or step bound hit), returning the full trajectory in
    /// chronological order. Each timestep asks `policy` for an action exactly
    /// once and notifies every registered listener of the recorded step.
    fn simulate(&mut self, policy: &dyn Policy) -> Result<Vec<SimulationStep>>;

    /// Register a listener to be notified of every future step.
    fn add_listener(&mut self, listener: Box<dyn SimulatorListener>);
}
