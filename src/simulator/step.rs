//! Trajectory records emitted by the simulator.

use serde::{Deserialize, Serialize};

use crate::types::{Action, State};

/// One recorded transition of a simulated episode.
///
/// Produced once per timestep and never mutated afterwards. The score fields
/// carry the episode's cumulative reward before and after the transition, so
/// `after_score - before_score` is the reward collected by this step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationStep {
    pub state: State,
    pub action: Action,
    pub result_state: State,
    pub before_score: f64,
    pub after_score: f64,
}

impl SimulationStep {
    /// The reward collected by this transition.
    pub fn reward(&self) -> f64 {
        self.after_score - self.before_score
    }
}

/// Event delivered to listeners for every recorded step.
#[derive(Debug, Clone, Copy)]
pub struct SimulatorEvent<'a> {
    pub step: &'a SimulationStep,
}
