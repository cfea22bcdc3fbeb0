//! Error taxonomy for the coordination layer.
//!
//! Every fallible operation reports one of these categories; nothing in the
//! bridge surface panics into the scripting host. Callers that only need a
//! status string use the [`std::fmt::Display`] rendering.

use thiserror::Error;

use crate::alloc::Tier;

/// Errors reported by the coordination layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required subsystem or resource is missing or misconfigured
    /// (storage not initialized, slow pool absent, zero pool capacity).
    #[error("configuration error: {0}")]
    Configuration(&'static str),

    /// An allocation pool could not satisfy a request.
    #[error("{pool} pool exhausted: requested {requested} bytes, {available} available")]
    ResourceExhausted {
        pool: Tier,
        requested: usize,
        available: usize,
    },

    /// Input from the caller was rejected (bad size, bad path, zero-length
    /// request).
    #[error("validation error: {0}")]
    Validation(String),

    /// An underlying storage or thread primitive failed mid-operation.
    #[error("I/O error: {0}")]
    Io(String),

    /// The operation is not legal in the current session state
    /// (start while running, load while running, stop while idle).
    #[error("invalid state: {0}")]
    State(&'static str),

    /// The emulation core rejected the program image at power-on.
    #[error("engine initialization failed: {0}")]
    EngineInit(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CoreError>;
