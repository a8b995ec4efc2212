//! Sequential identifiers for riders, drivers and rides.
//!
//! Every entity category draws from its own [`Sequence`]. The three sequences
//! are bundled in an [`IdAllocator`] that is shared by reference (usually
//! through an `Arc`) between the caller-facing API and the worker tasks, so
//! that two systems living in one process never share counters.

use core::fmt;
use portable_atomic::{AtomicU64, Ordering};
use serde::{Deserialize, Serialize};

/// A lock-free, strictly increasing counter starting at zero.
///
/// Backed by an [`AtomicU64`], so it can be shared across threads and tasks
/// without a lock. Each call to [`Sequence::next`] returns a value no other
/// caller has seen.
#[derive(Debug, Default)]
pub struct Sequence {
    state: AtomicU64,
}

impl Sequence {
    /// Creates a sequence whose first value is `0`.
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Creates a sequence whose first value is `start`.
    pub const fn starting_at(start: u64) -> Self {
        Self {
            state: AtomicU64::new(start),
        }
    }

    /// Returns the next value and advances the counter.
    ///
    /// Uniqueness only depends on the atomicity of the increment, so a relaxed
    /// ordering is sufficient.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> u64 {
        self.state.fetch_add(1, Ordering::Relaxed)
    }

    /// Returns the value the next call to [`Sequence::next`] would produce.
    pub fn peek(&self) -> u64 {
        self.state.load(Ordering::Relaxed)
    }
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn to_raw(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

define_id!(
    /// Identifier of a [`Rider`](crate::Rider).
    RiderId
);
define_id!(
    /// Identifier of a [`Driver`](crate::Driver).
    DriverId
);
define_id!(
    /// Identifier of a [`Ride`](crate::Ride).
    RideId
);

/// Independent sequences for every entity category.
///
/// Ride IDs are allocated from inside the worker tasks while rider and driver
/// IDs are allocated by enqueuing callers; all three accessors are safe to
/// call concurrently.
#[derive(Debug, Default)]
pub struct IdAllocator {
    riders: Sequence,
    drivers: Sequence,
    rides: Sequence,
}

impl IdAllocator {
    pub const fn new() -> Self {
        Self {
            riders: Sequence::new(),
            drivers: Sequence::new(),
            rides: Sequence::new(),
        }
    }

    pub fn next_rider(&self) -> RiderId {
        RiderId(self.riders.next())
    }

    pub fn next_driver(&self) -> DriverId {
        DriverId(self.drivers.next())
    }

    pub fn next_ride(&self) -> RideId {
        RideId(self.rides.next())
    }
}
