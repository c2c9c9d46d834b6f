//! Model-based value iteration over the full racetrack state space.

use std::{cell::RefCell, rc::Rc, sync::Arc};

use crate::{
    agents::{
        exploration::{converged, exploration_value},
        tables::{ValueTable, VisitCounts},
    },
    error::{Error, Result},
    ports::{Agent, Policy, RewardFunction, TransitionFunction},
    types::{Action, LEGAL_ACTIONS, MAX_SPEED, State, Terrain},
    world::WorldMap,
};

/// Exploration-adjusted expected utility of taking `action` from `state`.
///
/// Sums `explorationFn(p * V[s'], n)` over the transition distribution, where
/// `n` is the visit count of the (state, action) pair, read lazily with its
/// default of 0 and never incremented here.
fn expected_utility(
    values: &ValueTable,
    visits: &VisitCounts,
    transition_function: &dyn TransitionFunction,
    state: &State,
    action: Action,
    minimum_exploration_count: u32,
    optimistic_utility: f64,
) -> f64 {
    let n = visits.get(state, action);
    transition_function
        .transition(state, action)
        .iter()
        .map(|(successor, probability)| {
            exploration_value(
                probability * values.get(successor),
                n,
                minimum_exploration_count,
                optimistic_utility,
            )
        })
        .sum()
}

/// Model-based agent: learns state values by sweeping the whole state space
/// with known reward and transition functions.
///
/// Sweeps update the value table in place (Gauss-Seidel style) rather than
/// double-buffering a frozen snapshot; a deliberate simplification of
/// classical synchronous value iteration that converges to the same fixpoint.
pub struct ValueIteratingAgent {
    values: Rc<RefCell<ValueTable>>,
    visits: Rc<RefCell<VisitCounts>>,
    world: Option<Arc<WorldMap>>,
    transition_function: Option<Arc<dyn TransitionFunction>>,
    reward_function: Option<Arc<dyn RewardFunction>>,
    discount_factor: f64,
    convergence_tolerance: f64,
    minimum_exploration_count: u32,
    optimistic_utility: f64,
}

impl Default for ValueIteratingAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueIteratingAgent {
    pub fn new() -> Self {
        Self {
            values: Rc::new(RefCell::new(ValueTable::new())),
            visits: Rc::new(RefCell::new(VisitCounts::new())),
            world: None,
            transition_function: None,
            reward_function: None,
            discount_factor: 0.5,
            convergence_tolerance: 1e-9,
            minimum_exploration_count: 0,
            optimistic_utility: 0.2,
        }
    }

    /// Independent copy: configuration scalars and table snapshots are copied;
    /// the world, reward, and transition functions are shared by reference
    /// (immutable configuration).
    pub fn duplicate(&self) -> Self {
        Self {
            values: Rc::new(RefCell::new(self.values.borrow().clone())),
            visits: Rc::new(RefCell::new(self.visits.borrow().clone())),
            world: self.world.clone(),
            transition_function: self.transition_function.clone(),
            reward_function: self.reward_function.clone(),
            discount_factor: self.discount_factor,
            convergence_tolerance: self.convergence_tolerance,
            minimum_exploration_count: self.minimum_exploration_count,
            optimistic_utility: self.optimistic_utility,
        }
    }

    pub fn world(&self) -> Option<Arc<WorldMap>> {
        self.world.clone()
    }

    pub fn set_world(&mut self, world: Arc<WorldMap>) {
        self.world = Some(world);
    }

    pub fn set_transition_function(&mut self, transition_function: Arc<dyn TransitionFunction>) {
        self.transition_function = Some(transition_function);
    }

    pub fn set_reward_function(&mut self, reward_function: Arc<dyn RewardFunction>) {
        self.reward_function = Some(reward_function);
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    pub fn set_discount_factor(&mut self, discount_factor: f64) {
        self.discount_factor = discount_factor;
    }

    pub fn convergence_tolerance(&self) -> f64 {
        self.convergence_tolerance
    }

    pub fn set_convergence_tolerance(&mut self, convergence_tolerance: f64) {
        self.convergence_tolerance = convergence_tolerance;
    }

    pub fn minimum_exploration_count(&self) -> u32 {
        self.minimum_exploration_count
    }

    pub fn set_minimum_exploration_count(&mut self, minimum_exploration_count: u32) {
        self.minimum_exploration_count = minimum_exploration_count;
    }

    pub fn optimistic_utility(&self) -> f64 {
        self.optimistic_utility
    }

    pub fn set_optimistic_utility(&mut self, optimistic_utility: f64) {
        self.optimistic_utility = optimistic_utility;
    }

    /// Current value estimate for a state (0.0 if never updated).
    pub fn expected_value(&self, state: &State) -> f64 {
        self.values.borrow().get(state)
    }

    /// Whether the sweep has ever written a value for this state.
    pub fn has_value(&self, state: &State) -> bool {
        self.values.borrow().contains(state)
    }

    /// Number of states with an explicit value entry.
    pub fn known_states(&self) -> usize {
        self.values.borrow().len()
    }
}

impl Agent for ValueIteratingAgent {
    /// One full synchronous sweep: every non-wall cell crossed with every
    /// velocity pair in `[-MAX_SPEED, MAX_SPEED]^2`. For each such state the
    /// new value is `reward + discount * max_a expected_utility(s, a)`, and
    /// the largest absolute change across the sweep decides convergence.
    fn iterate(&mut self) -> Result<bool> {
        let world = self.world.as_ref().ok_or(Error::MissingWorld)?;
        let transition_function = self
            .transition_function
            .as_ref()
            .ok_or(Error::MissingTransitionFunction)?;
        let reward_function = self
            .reward_function
            .as_ref()
            .ok_or(Error::MissingRewardFunction)?;

        let mut values = self.values.borrow_mut();
        let visits = self.visits.borrow();
        let mut delta: f64 = 0.0;

        for x in 0..world.width() as i32 {
            for y in 0..world.height() as i32 {
                if world.terrain((x, y)) == Terrain::Wall {
                    continue;
                }
                for vx in -MAX_SPEED..=MAX_SPEED {
                    for vy in -MAX_SPEED..=MAX_SPEED {
                        let state = State::new((x, y), (vx, vy));
                        let reward = reward_function.reward(&state);

                        let mut best = f64::NEG_INFINITY;
                        for action in LEGAL_ACTIONS {
                            let utility = expected_utility(
                                &values,
                                &visits,
                                transition_function.as_ref(),
                                &state,
                                action,
                                self.minimum_exploration_count,
                                self.optimistic_utility,
                            );
                            if utility > best {
                                best = utility;
                            }
                        }

                        let after = reward + self.discount_factor * best;
                        let change = (after - values.get(&state)).abs();
                        if change > delta {
                            delta = change;
                        }
                        values.set(state, after);
                    }
                }
            }
        }

        Ok(converged(
            delta,
            self.convergence_tolerance,
            self.discount_factor,
        ))
    }

    fn policy(&self) -> Result<Box<dyn Policy>> {
        let transition_function = self
            .transition_function
            .as_ref()
            .ok_or(Error::MissingTransitionFunction)?
            .clone();
        Ok(Box::new(ValuePolicy {
            values: Rc::clone(&self.values),
            visits: Rc::clone(&self.visits),
            transition_function,
            minimum_exploration_count: self.minimum_exploration_count,
            optimistic_utility: self.optimistic_utility,
        }))
    }

    fn duplicate(&self) -> Box<dyn Agent> {
        Box::new(ValueIteratingAgent::duplicate(self))
    }

    fn name(&self) -> &str {
        "Value Iteration"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Greedy policy over the agent's live value table.
struct ValuePolicy {
    values: Rc<RefCell<ValueTable>>,
    visits: Rc<RefCell<VisitCounts>>,
    transition_function: Arc<dyn TransitionFunction>,
    minimum_exploration_count: u32,
    optimistic_utility: f64,
}

impl Policy for ValuePolicy {
    fn decide(&self, state: &State) -> Result<Action> {
        let values = self.values.borrow();
        let visits = self.visits.borrow();

        let mut best: Option<(Action, f64)> = None;
        for action in LEGAL_ACTIONS {
            let utility = expected_utility(
                &values,
                &visits,
                self.transition_function.as_ref(),
                state,
                action,
                self.minimum_exploration_count,
                self.optimistic_utility,
            );
            // First maximal action wins; later ties do not displace it.
            match best {
                Some((_, current)) if utility <= current => {}
                _ => best = Some((action, utility)),
            }
        }
        best.map(|(action, _)| action).ok_or(Error::NoLegalActions)
    }
}
