//! Error types for the matching engine.
//!
//! ## Error Cases
//! - `ServiceShutdown`: An enqueue arrived after shutdown had begun.
//! - `InvalidConfig`: A [`SystemConfig`] failed validation.
//!
//! Worker interruption and a shutdown that overruns its bound are not errors;
//! the first moves a worker to its stopped state and the second is reported as
//! [`ShutdownOutcome::Forced`].
//!
//! [`SystemConfig`]: crate::SystemConfig
//! [`ShutdownOutcome::Forced`]: crate::ShutdownOutcome::Forced

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the matching engine.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// The system is shutting down and no longer accepts riders or drivers.
    #[error("Service is shutting down")]
    ServiceShutdown,

    /// The supplied configuration cannot be used to start a system.
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },
}
