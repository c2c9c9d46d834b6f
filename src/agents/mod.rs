//! Learning agents
//!
//! Two tabular agents over the racetrack state space:
//!
//! - **Value iteration** ([`ValueIteratingAgent`]): model-based dynamic
//!   programming. Each `iterate()` sweeps every reachable state using the
//!   known reward and transition functions.
//! - **Q-learning** ([`QLearningAgent`]): model-free temporal difference
//!   control. Each `iterate()` runs one simulated episode and replays its
//!   trajectory through the Q-update rule.
//!
//! Both agents share the optimistic exploration function and the max-norm
//! contraction bound used as the convergence criterion.

pub mod exploration;
pub mod q_learning;
pub mod tables;
pub mod value_iteration;

pub use exploration::{converged, exploration_value};
pub use q_learning::{QLearningAgent, QLearningListener};
pub use tables::{QTable, ValueTable, VisitCounts};
pub use value_iteration::ValueIteratingAgent;
