//! Error types for the racetrack crate

use thiserror::Error;

/// Main error type for the racetrack crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("no world map configured (call set_world before iterating)")]
    MissingWorld,

    #[error("no transition function configured (call set_transition_function before iterating)")]
    MissingTransitionFunction,

    #[error("no reward function configured (call set_reward_function before iterating)")]
    MissingRewardFunction,

    #[error("no simulator attached (call set_simulator before iterating)")]
    MissingSimulator,

    #[error("action enumeration is empty; cannot decide on an action")]
    NoLegalActions,

    #[error("map has no rows")]
    EmptyMap,

    #[error("map row {row} has width {got}, expected {expected}")]
    RaggedMapRow {
        row: usize,
        got: usize,
        expected: usize,
    },

    #[error("invalid map character '{character}' at row {row}, column {column}")]
    InvalidMapCharacter {
        character: char,
        row: usize,
        column: usize,
    },

    #[error("map has no start cell ('S')")]
    NoStartCell,

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
