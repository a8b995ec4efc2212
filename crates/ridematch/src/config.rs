use crate::{
    error::{Error, Result},
    ride::RideKind,
};
use core::{fmt, str::FromStr, time::Duration};
use serde::{Deserialize, Serialize};

/// What a worker does with a rider it already holds when cancellation arrives
/// before a driver does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    /// Discard the rider. The rider is never matched and never requeued.
    #[default]
    Drop,
    /// Return the rider to the head of the rider queue.
    Requeue,
}

impl OrphanPolicy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Drop => "drop",
            Self::Requeue => "requeue",
        }
    }
}

impl fmt::Display for OrphanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrphanPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" => Ok(Self::Drop),
            "requeue" => Ok(Self::Requeue),
            other => Err(Error::InvalidConfig {
                reason: format!("unknown orphan policy `{other}` (expected drop or requeue)"),
            }),
        }
    }
}

/// Runtime settings for a [`RideSharingSystem`].
///
/// [`RideSharingSystem`]: crate::RideSharingSystem
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SystemConfig {
    /// Number of concurrent matcher tasks.
    pub worker_threads: usize,
    /// Simulated dispatch work performed for every match.
    pub processing_delay: Duration,
    /// Upper bound on how long [`RideSharingSystem::shutdown`] waits for the
    /// workers to stop.
    ///
    /// [`RideSharingSystem::shutdown`]: crate::RideSharingSystem::shutdown
    pub shutdown_timeout: Duration,
    pub orphan_policy: OrphanPolicy,
    /// Service level of every ride the workers synthesise.
    pub ride_kind: RideKind,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            worker_threads: 3,
            processing_delay: Duration::from_millis(500),
            shutdown_timeout: Duration::from_secs(3),
            orphan_policy: OrphanPolicy::Drop,
            ride_kind: RideKind::Standard,
        }
    }
}

impl SystemConfig {
    pub fn new(worker_threads: usize) -> Self {
        Self {
            worker_threads,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_processing_delay(mut self, delay: Duration) -> Self {
        self.processing_delay = delay;
        self
    }

    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_orphan_policy(mut self, policy: OrphanPolicy) -> Self {
        self.orphan_policy = policy;
        self
    }

    #[must_use]
    pub const fn with_ride_kind(mut self, kind: RideKind) -> Self {
        self.ride_kind = kind;
        self
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if there are no workers or the shutdown
    /// bound is zero.
    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 {
            return Err(Error::InvalidConfig {
                reason: "worker_threads must be greater than 0".to_string(),
            });
        }
        if self.shutdown_timeout.is_zero() {
            return Err(Error::InvalidConfig {
                reason: "shutdown_timeout must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}
