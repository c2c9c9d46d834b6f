//! Racetrack world dynamics: the concrete reward and transition functions.
//!
//! Motion model: the requested acceleration is applied with probability
//! `1 - slip_probability` and dropped (zero acceleration) otherwise. The new
//! velocity is clamped to `[-MAX_SPEED, MAX_SPEED]` per axis, then the car
//! moves along the straight line it traces. Crossing a wall (or the map edge)
//! stops the car on the last open cell with its velocity zeroed; crossing a
//! goal cell stops the car there. Goal states are absorbing.

use std::sync::Arc;

use crate::{
    ports::{RewardFunction, TransitionFunction},
    types::{Action, MAX_SPEED, State, Terrain},
    world::WorldMap,
};

/// State-based reward: a fixed penalty per timestep, zero on goal cells.
#[derive(Debug, Clone)]
pub struct TrackRewardFunction {
    world: Arc<WorldMap>,
    step_penalty: f64,
    goal_reward: f64,
}

impl TrackRewardFunction {
    pub fn new(world: Arc<WorldMap>) -> Self {
        Self {
            world,
            step_penalty: -1.0,
            goal_reward: 0.0,
        }
    }

    pub fn step_penalty(&self) -> f64 {
        self.step_penalty
    }

    pub fn set_step_penalty(&mut self, step_penalty: f64) {
        self.step_penalty = step_penalty;
    }

    pub fn goal_reward(&self) -> f64 {
        self.goal_reward
    }

    pub fn set_goal_reward(&mut self, goal_reward: f64) {
        self.goal_reward = goal_reward;
    }
}

impl RewardFunction for TrackRewardFunction {
    fn reward(&self, state: &State) -> f64 {
        match self.world.terrain(state.position()) {
            Terrain::Goal => self.goal_reward,
            _ => self.step_penalty,
        }
    }
}

/// Stochastic racetrack transitions with a slip probability.
#[derive(Debug, Clone)]
pub struct TrackTransitionFunction {
    world: Arc<WorldMap>,
    slip_probability: f64,
}

impl TrackTransitionFunction {
    pub fn new(world: Arc<WorldMap>) -> Self {
        Self {
            world,
            slip_probability: 0.2,
        }
    }

    pub fn slip_probability(&self) -> f64 {
        self.slip_probability
    }

    pub fn set_slip_probability(&mut self, slip_probability: f64) {
        self.slip_probability = slip_probability;
    }

    /// Deterministic outcome of moving with the given post-acceleration velocity.
    fn resolve(&self, position: (i32, i32), velocity: (i32, i32)) -> State {
        let (x0, y0) = position;
        let (vx, vy) = velocity;
        let steps = vx.abs().max(vy.abs());
        if steps == 0 {
            return State::new(position, velocity);
        }

        let mut last_open = position;
        for i in 1..=steps {
            let cell = (
                x0 + ((vx * i) as f64 / steps as f64).round() as i32,
                y0 + ((vy * i) as f64 / steps as f64).round() as i32,
            );
            match self.world.terrain(cell) {
                Terrain::Wall => return State::at_rest(last_open),
                Terrain::Goal => return State::new(cell, velocity),
                _ => last_open = cell,
            }
        }
        State::new(last_open, velocity)
    }

    /// Successor for one acceleration outcome (intended or slipped).
    fn outcome(&self, state: &State, acceleration: (i32, i32)) -> State {
        let (vx, vy) = state.velocity();
        let velocity = (
            (vx + acceleration.0).clamp(-MAX_SPEED, MAX_SPEED),
            (vy + acceleration.1).clamp(-MAX_SPEED, MAX_SPEED),
        );
        self.resolve(state.position(), velocity)
    }
}

impl TransitionFunction for TrackTransitionFunction {
    fn transition(&self, state: &State, action: Action) -> Vec<(State, f64)> {
        // Goal states are absorbing so discounted sweeps stay bounded.
        if self.world.terrain(state.position()) == Terrain::Goal {
            return vec![(*state, 1.0)];
        }

        let intended = self.outcome(state, action.acceleration());
        if self.slip_probability == 0.0 {
            return vec![(intended, 1.0)];
        }

        let slipped = self.outcome(state, (0, 0));
        if intended == slipped {
            return vec![(intended, 1.0)];
        }
        vec![
            (intended, 1.0 - self.slip_probability),
            (slipped, self.slip_probability),
        ]
    }
}
