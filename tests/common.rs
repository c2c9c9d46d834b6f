//! Common test utilities for the racetrack test suite.

use std::sync::Arc;

use racetrack::{
    Action, Policy, Result, SimulationStep, Simulator, SimulatorEvent, SimulatorListener, State,
    TrackRewardFunction, TrackTransitionFunction, ValueIteratingAgent, WorldMap,
};

/// Five-cell straight track: start at x=0, goal at x=4.
pub fn corridor() -> Arc<WorldMap> {
    Arc::new(WorldMap::parse("S...G\n").expect("corridor map is well-formed"))
}

/// Track with an interior wall at (1, 0).
pub fn walled_track() -> Arc<WorldMap> {
    Arc::new(WorldMap::parse("S#G\n...\n").expect("walled map is well-formed"))
}

/// Value-iteration agent wired to deterministic dynamics on `world`.
pub fn value_agent(world: &Arc<WorldMap>) -> ValueIteratingAgent {
    let mut transition = TrackTransitionFunction::new(Arc::clone(world));
    transition.set_slip_probability(0.0);
    let mut agent = ValueIteratingAgent::new();
    agent.set_world(Arc::clone(world));
    agent.set_transition_function(Arc::new(transition));
    agent.set_reward_function(Arc::new(TrackRewardFunction::new(Arc::clone(world))));
    agent
}

/// Build a recorded step with the given reward delta starting from score zero.
pub fn scripted_step(
    state: State,
    action: Action,
    result_state: State,
    before_score: f64,
    after_score: f64,
) -> SimulationStep {
    SimulationStep {
        state,
        action,
        result_state,
        before_score,
        after_score,
    }
}

/// Simulator stub that hands back a pre-scripted trajectory.
///
/// The policy is still consulted once per step and listeners are notified,
/// mirroring the contract of the real simulator, so agents under test
/// exercise the same code paths.
pub struct ScriptedSimulator {
    pub trajectory: Vec<SimulationStep>,
    pub runs: usize,
    listeners: Vec<Box<dyn SimulatorListener>>,
}

impl ScriptedSimulator {
    pub fn new(trajectory: Vec<SimulationStep>) -> Self {
        Self {
            trajectory,
            runs: 0,
            listeners: Vec::new(),
        }
    }
}

impl Simulator for ScriptedSimulator {
    fn simulate(&mut self, policy: &dyn Policy) -> Result<Vec<SimulationStep>> {
        self.runs += 1;
        for step in &self.trajectory {
            policy.decide(&step.state)?;
            for listener in &mut self.listeners {
                listener.step_taken(&SimulatorEvent { step })?;
            }
        }
        Ok(self.trajectory.clone())
    }

    fn add_listener(&mut self, listener: Box<dyn SimulatorListener>) {
        self.listeners.push(listener);
    }
}
