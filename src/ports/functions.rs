//! Reward and transition function ports - the agent's model of the world.

use crate::types::{Action, State};

/// Assigns a reward to each state.
pub trait RewardFunction {
    /// The reward collected for being in `state`.
    fn reward(&self, state: &State) -> f64;
}

/// Describes the stochastic outcome of taking an action from a state.
pub trait TransitionFunction {
    /// The possible outcomes of taking `action` from `state`, as pairs of
    /// successor state and probability. Probabilities sum to 1 over the
    /// returned outcomes, and each successor appears at most once.
    fn transition(&self, state: &State, action: Action) -> Vec<(State, f64)>;
}
