//! Error types for the input acquisition engine.

use thiserror::Error;

/// Result type alias for asyncinput operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while operating the engine.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied argument was rejected (reserved flags set, empty
    /// output buffer, …).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The engine has not been initialized, or has already been shut down.
    #[error("engine is not initialized")]
    NotInitialized,

    /// An OS facility the engine depends on could not be set up
    /// (readiness multiplexer, hotplug watcher, worker thread).
    #[error("system error: {0}")]
    System(String),

    /// The keymap could not be compiled from the configured names.
    /// The previously active keymap, if any, is still in place.
    #[error("keymap build failed: {0}")]
    KeymapBuild(String),

    /// The operation is not available on this platform or build.
    #[error("not supported: {0}")]
    NotSupported(String),
}
