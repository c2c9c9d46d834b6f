//! Racetrack CLI - train a tabular agent on a map and report how it drives.

use std::{cell::RefCell, fs, path::PathBuf, rc::Rc, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::to_writer_pretty;

use racetrack::{
    Agent, EpisodeSimulator, QLearningAgent, Simulator, Terrain, TrackRewardFunction,
    TrackTransitionFunction, ValueIteratingAgent, WorldMap,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AgentKind {
    /// Model-based value iteration (full state-space sweeps)
    ValueIteration,
    /// Model-free Q-learning (one simulated episode per iteration)
    QLearning,
}

#[derive(Parser, Debug)]
#[command(
    name = "racetrack",
    version,
    about = "Train a tabular reinforcement-learning agent on a racetrack map",
    allow_negative_numbers = true
)]
struct Cli {
    /// Path to a map file ('#' wall, '.' open, 'S' start, 'G' goal)
    map: PathBuf,

    /// Agent to train
    #[arg(value_enum, default_value_t = AgentKind::ValueIteration)]
    agent: AgentKind,

    /// Maximum number of iterate() calls
    #[arg(long, short = 'i', default_value_t = 200)]
    iterations: usize,

    /// Discount factor
    #[arg(long)]
    discount: Option<f64>,

    /// Learning factor (Q-learning only)
    #[arg(long)]
    learning_factor: Option<f64>,

    /// Convergence tolerance
    #[arg(long)]
    tolerance: Option<f64>,

    /// Visits before a pair stops being treated optimistically
    #[arg(long)]
    min_exploration: Option<u32>,

    /// Optimistic value for under-explored pairs
    #[arg(long)]
    optimistic: Option<f64>,

    /// Probability that a requested acceleration slips
    #[arg(long, default_value_t = 0.2)]
    slip: f64,

    /// Episode length bound, in timesteps
    #[arg(long, default_value_t = 1_000)]
    step_limit: usize,

    /// RNG seed for reproducible simulations
    #[arg(long)]
    seed: Option<u64>,

    /// Write a JSON training summary to this path
    #[arg(long)]
    summary: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct TrainingSummary {
    agent: String,
    iterations_run: usize,
    converged: bool,
    evaluation: EvaluationSummary,
}

#[derive(Debug, Serialize)]
struct EvaluationSummary {
    steps: usize,
    final_score: f64,
    reached_goal: bool,
}

fn build_simulator(
    world: &Arc<WorldMap>,
    slip: f64,
    step_limit: usize,
    seed: Option<u64>,
) -> EpisodeSimulator {
    let mut transition = TrackTransitionFunction::new(Arc::clone(world));
    transition.set_slip_probability(slip);
    let reward = TrackRewardFunction::new(Arc::clone(world));
    let mut simulator = EpisodeSimulator::new(Arc::clone(world), Arc::new(transition), Arc::new(reward));
    simulator.set_step_limit(step_limit);
    if let Some(seed) = seed {
        simulator = simulator.with_seed(seed);
    }
    simulator
}

fn build_agent(cli: &Cli, world: &Arc<WorldMap>) -> Box<dyn Agent> {
    match cli.agent {
        AgentKind::ValueIteration => {
            let mut transition = TrackTransitionFunction::new(Arc::clone(world));
            transition.set_slip_probability(cli.slip);
            let mut agent = ValueIteratingAgent::new();
            agent.set_world(Arc::clone(world));
            agent.set_transition_function(Arc::new(transition));
            agent.set_reward_function(Arc::new(TrackRewardFunction::new(Arc::clone(world))));
            if let Some(discount) = cli.discount {
                agent.set_discount_factor(discount);
            }
            if let Some(tolerance) = cli.tolerance {
                agent.set_convergence_tolerance(tolerance);
            }
            if let Some(count) = cli.min_exploration {
                agent.set_minimum_exploration_count(count);
            }
            if let Some(optimistic) = cli.optimistic {
                agent.set_optimistic_utility(optimistic);
            }
            Box::new(agent)
        }
        AgentKind::QLearning => {
            let simulator = build_simulator(world, cli.slip, cli.step_limit, cli.seed);
            let mut agent = QLearningAgent::new();
            agent.set_simulator(Rc::new(RefCell::new(simulator)));
            if let Some(discount) = cli.discount {
                agent.set_discount_factor(discount);
            }
            if let Some(learning_factor) = cli.learning_factor {
                agent.set_learning_factor(learning_factor);
            }
            if let Some(tolerance) = cli.tolerance {
                agent.set_convergence_tolerance(tolerance);
            }
            if let Some(count) = cli.min_exploration {
                agent.set_minimum_exploration_count(count);
            }
            if let Some(optimistic) = cli.optimistic {
                agent.set_optimistic_reward(optimistic);
            }
            Box::new(agent)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let world = Arc::new(
        WorldMap::load(&cli.map).with_context(|| format!("loading map {}", cli.map.display()))?,
    );

    let mut agent = build_agent(&cli, &world);

    let bar = ProgressBar::new(cli.iterations as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} iterations {msg}")?
            .progress_chars("##-"),
    );

    let mut converged = false;
    let mut iterations_run = 0;
    for _ in 0..cli.iterations {
        let done = agent.iterate().context("iteration failed")?;
        iterations_run += 1;
        bar.inc(1);
        if done {
            converged = true;
            break;
        }
    }
    bar.finish_and_clear();

    // Drive one evaluation episode with the learned policy. A fresh simulator
    // keeps the evaluation run independent of what training consumed.
    let policy = agent.policy().context("building policy")?;
    let mut evaluation_simulator =
        build_simulator(&world, cli.slip, cli.step_limit, cli.seed.map(|s| s.wrapping_add(1)));
    let trajectory = evaluation_simulator
        .simulate(policy.as_ref())
        .context("evaluation episode failed")?;

    let reached_goal = trajectory
        .last()
        .map(|step| world.terrain(step.result_state.position()) == Terrain::Goal)
        .unwrap_or(false);
    let final_score = trajectory.last().map(|step| step.after_score).unwrap_or(0.0);

    println!(
        "{}: {} iteration(s), {}",
        agent.name(),
        iterations_run,
        if converged { "converged" } else { "not converged" }
    );
    println!(
        "evaluation: {} step(s), score {:.1}, goal {}",
        trajectory.len(),
        final_score,
        if reached_goal { "reached" } else { "not reached" }
    );

    if let Some(path) = &cli.summary {
        let summary = TrainingSummary {
            agent: agent.name().to_string(),
            iterations_run,
            converged,
            evaluation: EvaluationSummary {
                steps: trajectory.len(),
                final_score,
                reached_goal,
            },
        };
        let file = fs::File::create(path)
            .with_context(|| format!("creating summary file {}", path.display()))?;
        to_writer_pretty(file, &summary).context("writing summary")?;
        println!("summary written to {}", path.display());
    }

    Ok(())
}
