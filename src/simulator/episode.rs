//! The concrete episode simulator for racetrack worlds.

use std::sync::Arc;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    error::{Error, Result},
    ports::{Policy, RewardFunction, Simulator, SimulatorListener, TransitionFunction},
    simulator::step::{SimulationStep, SimulatorEvent},
    types::{State, Terrain},
    world::WorldMap,
};

/// Default bound on episode length, in timesteps.
pub const DEFAULT_STEP_LIMIT: usize = 1_000;

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Runs episodes on a [`WorldMap`] under caller-supplied world dynamics.
///
/// Each episode starts at rest on one of the map's start cells and ends when
/// the agent reaches goal terrain or the step limit is hit. The simulator is
/// deterministic given a seed: all randomness (start-cell choice and outcome
/// sampling) flows through one seeded generator.
pub struct EpisodeSimulator {
    world: Arc<WorldMap>,
    transition_function: Arc<dyn TransitionFunction>,
    reward_function: Arc<dyn RewardFunction>,
    listeners: Vec<Box<dyn SimulatorListener>>,
    step_limit: usize,
    rng: StdRng,
}

impl EpisodeSimulator {
    pub fn new(
        world: Arc<WorldMap>,
        transition_function: Arc<dyn TransitionFunction>,
        reward_function: Arc<dyn RewardFunction>,
    ) -> Self {
        Self {
            world,
            transition_function,
            reward_function,
            listeners: Vec::new(),
            step_limit: DEFAULT_STEP_LIMIT,
            rng: build_rng(None),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = build_rng(Some(seed));
        self
    }

    pub fn step_limit(&self) -> usize {
        self.step_limit
    }

    pub fn set_step_limit(&mut self, step_limit: usize) {
        self.step_limit = step_limit;
    }

    /// Pick an episode start: at rest on one of the map's start cells.
    fn start_state(&mut self) -> Result<State> {
        let position = self
            .world
            .start_positions()
            .choose(&mut self.rng)
            .copied()
            .ok_or(Error::NoStartCell)?;
        Ok(State::at_rest(position))
    }

    /// Sample a successor from a transition distribution.
    fn sample_outcome(&mut self, outcomes: &[(State, f64)], fallback: State) -> State {
        let ticket: f64 = self.rng.random();
        let mut cumulative = 0.0;
        for (state, probability) in outcomes {
            cumulative += probability;
            if ticket <= cumulative {
                return *state;
            }
        }
        // Rounding can leave the ticket above the final cumulative sum.
        outcomes.last().map(|(state, _)| *state).unwrap_or(fallback)
    }
}

impl Simulator for EpisodeSimulator {
    fn simulate(&mut self, policy: &dyn Policy) -> Result<Vec<SimulationStep>> {
        let mut state = self.start_state()?;
        let mut score = 0.0;
        let mut trajectory = Vec::new();

        for _ in 0..self.step_limit {
            if self.world.terrain(state.position()) == Terrain::Goal {
                break;
            }

            let action = policy.decide(&state)?;
            let outcomes = self.transition_function.transition(&state, action);
            let result_state = self.sample_outcome(&outcomes, state);

            let before_score = score;
            score += self.reward_function.reward(&result_state);

            let step = SimulationStep {
                state,
                action,
                result_state,
                before_score,
                after_score: score,
            };
            for listener in &mut self.listeners {
                listener.step_taken(&SimulatorEvent { step: &step })?;
            }
            trajectory.push(step);

            state = result_state;
        }

        Ok(trajectory)
    }

    fn add_listener(&mut self, listener: Box<dyn SimulatorListener>) {
        self.listeners.push(listener);
    }
}
