//! Agent port - the learning loop seen by external drivers.

use crate::{error::Result, ports::policy::Policy};

/// A reinforcement-learning agent driven by repeated calls to [`iterate`].
///
/// A driver calls `iterate` until it returns `true` (the agent's convergence
/// criterion is met). Calling `iterate` on an already-converged agent is
/// allowed and keeps making (typically vanishing) updates.
///
/// [`iterate`]: Agent::iterate
pub trait Agent {
    /// Perform one unit of learning: a full state-space sweep for model-based
    /// agents, or one simulated episode for simulation-based agents. Returns
    /// `true` once the convergence criterion is met.
    ///
    /// # Errors
    ///
    /// Fails fast if a required collaborator (world, reward or transition
    /// function, simulator) has not been configured.
    fn iterate(&mut self) -> Result<bool>;

    /// A fresh policy view bound to the agent's live tables: later table
    /// mutations are reflected through it, not frozen at creation time.
    fn policy(&self) -> Result<Box<dyn Policy>>;

    /// An independent copy of this agent: configuration scalars and table
    /// snapshots are carried over with no aliasing of mutable state.
    /// Externally owned collaborators such as a simulator are not copied
    /// and must be reattached by the caller.
    fn duplicate(&self) -> Box<dyn Agent>;

    /// Human-readable agent name for logging and summaries.
    fn name(&self) -> &str;

    /// Enable downcasting to concrete agent types, e.g. to reattach a
    /// simulator or inspect tables after a [`duplicate`](Agent::duplicate).
    fn as_any(&self) -> &dyn std::any::Any;
}
