//! Policy port - a state-to-action decision rule.

use crate::{
    error::Result,
    types::{Action, State},
};

/// A decision rule over states, derived from an agent's current estimates.
///
/// `decide` must return a legal action whenever the action enumeration is
/// non-empty; it fails only on the fatal configuration error of an empty
/// enumeration. Ties between equally-valued actions go to the first action
/// in [`crate::types::LEGAL_ACTIONS`] order, so a policy over an unchanged
/// table is fully deterministic.
pub trait Policy {
    /// Decide which action to take from the given state.
    fn decide(&self, state: &State) -> Result<Action>;
}
