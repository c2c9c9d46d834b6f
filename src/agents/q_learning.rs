//! Model-free Q-learning driven by simulated episodes.

use std::{cell::RefCell, rc::Rc};

use crate::{
    agents::{
        exploration::{converged, exploration_value},
        tables::{QTable, VisitCounts},
    },
    error::{Error, Result},
    ports::{Agent, Policy, Simulator, SimulatorListener},
    simulator::{SimulationStep, SimulatorEvent},
    types::{Action, LEGAL_ACTIONS, State},
};

/// Learning tables shared between the agent, its policies, and its listener.
#[derive(Debug, Clone, Default)]
struct QTables {
    expected_reward: QTable,
    visits: VisitCounts,
}

/// Scalars the update rule and policy need, copied out of the agent.
#[derive(Debug, Clone, Copy)]
struct QConfig {
    discount_factor: f64,
    learning_factor: f64,
    minimum_exploration_count: u32,
    optimistic_reward: f64,
}

/// Exploration-adjusted argmax over successor actions, first maximum wins.
fn greedy_action(tables: &QTables, state: &State, config: &QConfig) -> Result<Action> {
    let mut best: Option<(Action, f64)> = None;
    for action in LEGAL_ACTIONS {
        let adjusted = exploration_value(
            tables.expected_reward.get(state, action),
            tables.visits.get(state, action),
            config.minimum_exploration_count,
            config.optimistic_reward,
        );
        match best {
            Some((_, current)) if adjusted <= current => {}
            _ => best = Some((action, adjusted)),
        }
    }
    best.map(|(action, _)| action).ok_or(Error::NoLegalActions)
}

/// One Q-update for a recorded step. Returns the absolute change to the
/// updated entry, or infinity if the update diverged to a non-finite value;
/// in that case the table is left untouched and the caller should treat the
/// iteration as converged rather than raise an arithmetic fault. This
/// shortcut can mask true non-convergence.
///
/// The rule, for a step `(s, a, s', before, after)`:
/// the successor action is the exploration-adjusted argmax over `a'`, but its
/// contribution `max_q_prime` is the raw stored estimate; the visit count of
/// `(s, a)` is incremented first, and the effective step size decays as
/// `alpha = learning_factor / (10 * n)`; then
/// `Q(s,a) += alpha * ((after - before) + discount * max_q_prime - Q(s,a))`.
fn q_update(tables: &mut QTables, config: &QConfig, step: &SimulationStep) -> Result<f64> {
    let q = tables.expected_reward.get(&step.state, step.action);

    let successor_action = greedy_action(tables, &step.result_state, config)?;
    let max_q_prime = tables
        .expected_reward
        .get(&step.result_state, successor_action);

    let n = tables.visits.record(step.state, step.action);
    let alpha = config.learning_factor / (10.0 * n as f64);

    let update = q + alpha * (step.reward() + config.discount_factor * max_q_prime - q);
    if !update.is_finite() {
        return Ok(f64::INFINITY);
    }

    tables.expected_reward.set(step.state, step.action, update);
    Ok((update - q).abs())
}

/// Model-free agent: learns expected rewards for (state, action) pairs purely
/// from simulated experience. The simulator is an injected collaborator, not
/// agent state; `duplicate()` drops it and the caller must reattach one.
pub struct QLearningAgent {
    tables: Rc<RefCell<QTables>>,
    config: QConfig,
    convergence_tolerance: f64,
    simulator: Option<Rc<RefCell<dyn Simulator>>>,
}

impl Default for QLearningAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl QLearningAgent {
    pub fn new() -> Self {
        Self {
            tables: Rc::new(RefCell::new(QTables::default())),
            config: QConfig {
                discount_factor: 0.99,
                learning_factor: 0.5,
                minimum_exploration_count: 1,
                optimistic_reward: 0.2,
            },
            convergence_tolerance: 1e-9,
            simulator: None,
        }
    }

    /// Independent copy of configuration and both tables. The simulator
    /// reference is not carried over.
    pub fn duplicate(&self) -> Self {
        Self {
            tables: Rc::new(RefCell::new(self.tables.borrow().clone())),
            config: self.config,
            convergence_tolerance: self.convergence_tolerance,
            simulator: None,
        }
    }

    pub fn simulator(&self) -> Option<Rc<RefCell<dyn Simulator>>> {
        self.simulator.clone()
    }

    pub fn set_simulator(&mut self, simulator: Rc<RefCell<dyn Simulator>>) {
        self.simulator = Some(simulator);
    }

    pub fn discount_factor(&self) -> f64 {
        self.config.discount_factor
    }

    pub fn set_discount_factor(&mut self, discount_factor: f64) {
        self.config.discount_factor = discount_factor;
    }

    pub fn learning_factor(&self) -> f64 {
        self.config.learning_factor
    }

    pub fn set_learning_factor(&mut self, learning_factor: f64) {
        self.config.learning_factor = learning_factor;
    }

    pub fn convergence_tolerance(&self) -> f64 {
        self.convergence_tolerance
    }

    pub fn set_convergence_tolerance(&mut self, convergence_tolerance: f64) {
        self.convergence_tolerance = convergence_tolerance;
    }

    pub fn minimum_exploration_count(&self) -> u32 {
        self.config.minimum_exploration_count
    }

    pub fn set_minimum_exploration_count(&mut self, minimum_exploration_count: u32) {
        self.config.minimum_exploration_count = minimum_exploration_count;
    }

    pub fn optimistic_reward(&self) -> f64 {
        self.config.optimistic_reward
    }

    pub fn set_optimistic_reward(&mut self, optimistic_reward: f64) {
        self.config.optimistic_reward = optimistic_reward;
    }

    /// Current estimate for a pair (0.0 if never updated).
    pub fn expected_reward(&self, state: &State, action: Action) -> f64 {
        self.tables.borrow().expected_reward.get(state, action)
    }

    /// How often a pair has been updated.
    pub fn visit_count(&self, state: &State, action: Action) -> u32 {
        self.tables.borrow().visits.get(state, action)
    }

    /// Number of (state, action) pairs with an explicit estimate.
    pub fn table_size(&self) -> usize {
        self.tables.borrow().expected_reward.len()
    }

    /// A listener that applies the Q-update to this agent's tables as the
    /// simulation runs, for drivers that prefer online updates over the
    /// batch replay done by [`Agent::iterate`]. Do not register it on the
    /// simulator that `iterate` uses, or every step is learned twice.
    /// Unlike the replay loop, a listener cannot know which event is the
    /// episode's last, so it updates on every step it sees.
    pub fn listener(&self) -> QLearningListener {
        QLearningListener {
            tables: Rc::clone(&self.tables),
            config: self.config,
        }
    }
}

impl Agent for QLearningAgent {
    /// One simulated episode, replayed through the Q-update rule.
    ///
    /// The final step of the trajectory is excluded: it is the terminal
    /// record and its successor value is not yet meaningful. Convergence is
    /// judged on the largest absolute table change across the replay.
    fn iterate(&mut self) -> Result<bool> {
        let simulator = self.simulator.clone().ok_or(Error::MissingSimulator)?;
        let policy = self.policy()?;
        let trajectory = simulator.borrow_mut().simulate(policy.as_ref())?;

        let mut delta: f64 = 0.0;
        let mut tables = self.tables.borrow_mut();
        for step in trajectory.iter().take(trajectory.len().saturating_sub(1)) {
            let change = q_update(&mut tables, &self.config, step)?;
            if !change.is_finite() {
                delta = f64::INFINITY;
                break;
            }
            if change > delta {
                delta = change;
            }
        }
        drop(tables);

        Ok(converged(
            delta,
            self.convergence_tolerance,
            self.config.discount_factor,
        ))
    }

    fn policy(&self) -> Result<Box<dyn Policy>> {
        Ok(Box::new(QPolicy {
            tables: Rc::clone(&self.tables),
            config: self.config,
        }))
    }

    fn duplicate(&self) -> Box<dyn Agent> {
        Box::new(QLearningAgent::duplicate(self))
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Greedy policy over the agent's live Q-table, with optimistic exploration.
struct QPolicy {
    tables: Rc<RefCell<QTables>>,
    config: QConfig,
}

impl Policy for QPolicy {
    fn decide(&self, state: &State) -> Result<Action> {
        greedy_action(&self.tables.borrow(), state, &self.config)
    }
}

/// Applies the Q-update in lockstep with a running simulation.
pub struct QLearningListener {
    tables: Rc<RefCell<QTables>>,
    config: QConfig,
}

impl SimulatorListener for QLearningListener {
    fn step_taken(&mut self, event: &SimulatorEvent<'_>) -> Result<()> {
        q_update(&mut self.tables.borrow_mut(), &self.config, event.step)?;
        Ok(())
    }
}
