//! Error types for the progression engine
//!
//! Every variant here is recovered inside the engine: operations that reject
//! input leave the state untouched and hand the reason back to the caller.

use thiserror::Error;

/// Failure at the durable storage boundary (StorageWriteFailure)
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to acquire storage lock: {0}")]
    Lock(String),

    #[error("Storage rejected the write: {0}")]
    Rejected(String),
}

/// Errors returned by state-store operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Block '{0}' does not belong to the current cycle")]
    InvalidBlockReference(String),

    #[error("No active cycle")]
    NoActiveCycle,

    #[error("Session duration must be positive (got {0} minutes)")]
    NonPositiveDuration(i64),

    #[error("Unknown study session: {0}")]
    UnknownSession(String),

    #[error("Stored state is malformed: {0}")]
    MalformedStoredState(String),
}

/// Errors from sending commands to the simulated clock
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClockError {
    #[error("Simulation command queue is full")]
    QueueFull,

    #[error("Simulation clock is no longer attached to a store")]
    Disconnected,
}
