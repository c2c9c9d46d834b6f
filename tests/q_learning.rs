//! Behavioral tests for the Q-learning agent.

use std::{cell::RefCell, rc::Rc, sync::Arc};

use racetrack::{
    Action, Agent, EpisodeSimulator, Error, LEGAL_ACTIONS, Policy, QLearningAgent, Simulator,
    State, TrackRewardFunction, TrackTransitionFunction,
};

mod common;

fn scripted_agent(
    trajectory: Vec<racetrack::SimulationStep>,
) -> (QLearningAgent, Rc<RefCell<common::ScriptedSimulator>>) {
    let simulator = Rc::new(RefCell::new(common::ScriptedSimulator::new(trajectory)));
    let mut agent = QLearningAgent::new();
    agent.set_simulator(simulator.clone());
    (agent, simulator)
}

/// Two-step episode: one learnable step followed by the terminal record.
fn two_step_trajectory() -> Vec<racetrack::SimulationStep> {
    let s0 = State::at_rest((0, 0));
    let s1 = State::at_rest((1, 0));
    let s2 = State::at_rest((2, 0));
    vec![
        common::scripted_step(s0, Action::Right, s1, 0.0, 10.0),
        common::scripted_step(s1, Action::Right, s2, 10.0, 9.0),
    ]
}

#[test]
fn replay_applies_the_textbook_update() {
    // learning_factor = 0.5, discount = 0.99, Q = 0, reward = 10, best
    // successor Q = 0; with n = 1 the step size is 0.5 / 10 = 0.05, so
    // update = 0 + 0.05 * (10 + 0.99 * 0 - 0) = 0.5.
    let (mut agent, _) = scripted_agent(two_step_trajectory());
    agent.iterate().expect("iteration should succeed");

    let s0 = State::at_rest((0, 0));
    assert_eq!(agent.expected_reward(&s0, Action::Right), 0.5);
    assert_eq!(agent.visit_count(&s0, Action::Right), 1);
}

#[test]
fn final_trajectory_step_is_not_replayed() {
    let (mut agent, _) = scripted_agent(two_step_trajectory());
    agent.iterate().expect("iteration should succeed");

    let s1 = State::at_rest((1, 0));
    assert_eq!(agent.expected_reward(&s1, Action::Right), 0.0);
    assert_eq!(agent.visit_count(&s1, Action::Right), 0);
}

#[test]
fn iterate_runs_one_episode_per_call() {
    let (mut agent, simulator) = scripted_agent(two_step_trajectory());
    agent.iterate().expect("iteration should succeed");
    agent.iterate().expect("iteration should succeed");
    assert_eq!(simulator.borrow().runs, 2);
}

#[test]
fn visit_counts_never_decrease() {
    let world = common::corridor();
    let transition = {
        let mut t = TrackTransitionFunction::new(Arc::clone(&world));
        t.set_slip_probability(0.1);
        t
    };
    let mut simulator = EpisodeSimulator::new(
        Arc::clone(&world),
        Arc::new(transition),
        Arc::new(TrackRewardFunction::new(Arc::clone(&world))),
    )
    .with_seed(7);
    simulator.set_step_limit(50);

    let mut agent = QLearningAgent::new();
    agent.set_simulator(Rc::new(RefCell::new(simulator)));

    let probe = State::at_rest((0, 0));
    let mut previous = [0u32; 9];
    for _ in 0..10 {
        agent.iterate().expect("iteration should succeed");
        for (slot, action) in previous.iter_mut().zip(LEGAL_ACTIONS) {
            let count = agent.visit_count(&probe, action);
            assert!(count >= *slot, "visit counts must be non-decreasing");
            *slot = count;
        }
    }
    // The start state is visited every episode, so something was counted.
    assert!(previous.iter().sum::<u32>() > 0);
}

#[test]
fn policy_is_optimistic_until_the_exploration_floor() {
    let (mut agent, _) = scripted_agent(two_step_trajectory());
    agent.iterate().expect("iteration should succeed");

    let s0 = State::at_rest((0, 0));
    let policy = agent.policy().expect("policy should build");

    // Right has been visited once: with the floor at 1 its raw estimate
    // (0.5) beats every unvisited pair's optimistic 0.2.
    assert_eq!(agent.minimum_exploration_count(), 1);
    assert_eq!(policy.decide(&s0).expect("decide should succeed"), Action::Right);

    // Raise the floor above Right's count and every pair reads the same
    // optimistic value, so the first action in enumeration order wins.
    agent.set_minimum_exploration_count(2);
    let policy = agent.policy().expect("policy should build");
    assert_eq!(
        policy.decide(&s0).expect("decide should succeed"),
        LEGAL_ACTIONS[0]
    );
}

#[test]
fn decide_is_deterministic_on_an_unchanged_table() {
    let (mut agent, _) = scripted_agent(two_step_trajectory());
    agent.iterate().expect("iteration should succeed");

    let policy = agent.policy().expect("policy should build");
    let probe = State::at_rest((1, 0));
    let first = policy.decide(&probe).expect("decide should succeed");
    let second = policy.decide(&probe).expect("decide should succeed");
    assert_eq!(first, second);
}

#[test]
fn duplicate_snapshots_tables_and_drops_the_simulator() {
    let (mut agent, _) = scripted_agent(two_step_trajectory());
    agent.iterate().expect("iteration should succeed");

    let s0 = State::at_rest((0, 0));
    let mut duplicate = agent.duplicate();
    assert_eq!(duplicate.expected_reward(&s0, Action::Right), 0.5);
    assert_eq!(duplicate.visit_count(&s0, Action::Right), 1);

    // The simulator is external state and must be reattached by the caller.
    assert!(duplicate.simulator().is_none());
    assert!(matches!(duplicate.iterate(), Err(Error::MissingSimulator)));

    // Later learning on the original does not alias the duplicate's tables.
    agent.iterate().expect("iteration should succeed");
    assert_eq!(duplicate.expected_reward(&s0, Action::Right), 0.5);
    assert_eq!(duplicate.visit_count(&s0, Action::Right), 1);
    assert!(agent.visit_count(&s0, Action::Right) > 1);
}

#[test]
fn trait_object_duplicate_still_drops_the_simulator() {
    let (mut agent, _simulator) = scripted_agent(two_step_trajectory());
    agent.iterate().expect("iteration should succeed");

    let driver_handle: Box<dyn Agent> = Box::new(agent);
    let mut duplicate = driver_handle.duplicate();
    assert!(matches!(duplicate.iterate(), Err(Error::MissingSimulator)));

    let s0 = State::at_rest((0, 0));
    let copy = duplicate
        .as_any()
        .downcast_ref::<QLearningAgent>()
        .expect("duplicate keeps the concrete type");
    assert_eq!(copy.expected_reward(&s0, Action::Right), 0.5);
}

#[test]
fn convergence_uses_the_contraction_bound() {
    // delta after one replay of the scripted episode is 0.5.
    let (mut agent, _) = scripted_agent(two_step_trajectory());
    agent.set_convergence_tolerance(10.0);
    agent.set_discount_factor(0.5);
    // threshold = 10 * (1 - 0.5) / 0.5 = 10 > 0.5
    assert!(agent.iterate().expect("iteration should succeed"));

    let (mut agent, _) = scripted_agent(two_step_trajectory());
    agent.set_convergence_tolerance(1e-9);
    assert!(!agent.iterate().expect("iteration should succeed"));
}

#[test]
fn degenerate_discount_is_not_converged_while_updates_are_finite() {
    let (mut agent, _) = scripted_agent(two_step_trajectory());
    agent.set_discount_factor(1.0);
    agent.set_convergence_tolerance(10.0);
    // The threshold collapses to zero, so a finite delta never satisfies it.
    assert!(!agent.iterate().expect("iteration should succeed"));
}

#[test]
fn listener_learns_in_lockstep_with_the_simulation() {
    let mut simulator = common::ScriptedSimulator::new(two_step_trajectory());
    let agent = QLearningAgent::new();
    simulator.add_listener(Box::new(agent.listener()));

    let policy = agent.policy().expect("policy should build");
    simulator
        .simulate(policy.as_ref())
        .expect("simulation should succeed");

    // The listener saw both steps, including the final one.
    let s0 = State::at_rest((0, 0));
    let s1 = State::at_rest((1, 0));
    assert_eq!(agent.expected_reward(&s0, Action::Right), 0.5);
    assert_eq!(agent.visit_count(&s1, Action::Right), 1);
}

#[test]
fn empty_trajectory_converges_without_updates() {
    let (mut agent, _) = scripted_agent(Vec::new());
    agent.set_discount_factor(0.5);
    // No steps, delta = 0, threshold positive: converged.
    assert!(agent.iterate().expect("iteration should succeed"));
    assert_eq!(agent.table_size(), 0);
}
