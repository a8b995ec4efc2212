//! Riders, drivers and the rides synthesised from matching them.

use crate::id::{DriverId, RideId, RiderId};
use core::{fmt, str::FromStr};
use serde::{Deserialize, Serialize};

/// A person waiting to be picked up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rider {
    id: RiderId,
    name: String,
}

impl Rider {
    pub fn new(id: RiderId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub const fn id(&self) -> RiderId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A driver offering a seat.
///
/// The optional rating is carried for reporting only; matching never looks at
/// it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    id: DriverId,
    name: String,
    rating: Option<u8>,
}

impl Driver {
    pub fn new(id: DriverId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            rating: None,
        }
    }

    #[must_use]
    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    pub const fn id(&self) -> DriverId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn rating(&self) -> Option<u8> {
        self.rating
    }
}

/// Service level of a ride. Determines the per-mile fare rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RideKind {
    Standard,
    Premium,
}

impl RideKind {
    pub const ALL: &'static [Self] = &[Self::Standard, Self::Premium];

    /// The fare multiplier applied to each mile travelled.
    ///
    /// A new kind needs a variant above and an arm here; queues and workers
    /// are unaffected.
    pub const fn rate_per_mile(self) -> f64 {
        match self {
            Self::Standard => 1.5,
            Self::Premium => 3.0,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Premium => "premium",
        }
    }
}

impl fmt::Display for RideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown ride kind `{0}` (expected one of: standard, premium)")]
pub struct ParseRideKindError(String);

impl FromStr for RideKind {
    type Err = ParseRideKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseRideKindError(s.to_owned()))
    }
}

/// A completed match between one rider and one driver.
///
/// Rides are immutable once built. The fare is derived on demand from the
/// distance and the kind; it is never stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ride {
    id: RideId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rider: Option<RiderId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    driver: Option<DriverId>,
    pickup: String,
    dropoff: String,
    distance_miles: f64,
    kind: RideKind,
}

impl Ride {
    pub fn new(
        id: RideId,
        pickup: impl Into<String>,
        dropoff: impl Into<String>,
        distance_miles: f64,
        kind: RideKind,
    ) -> Self {
        Self {
            id,
            rider: None,
            driver: None,
            pickup: pickup.into(),
            dropoff: dropoff.into(),
            distance_miles,
            kind,
        }
    }

    /// Records which rider and driver this ride was synthesised from.
    #[must_use]
    pub fn between(mut self, rider: RiderId, driver: DriverId) -> Self {
        self.rider = Some(rider);
        self.driver = Some(driver);
        self
    }

    pub const fn id(&self) -> RideId {
        self.id
    }

    pub const fn rider(&self) -> Option<RiderId> {
        self.rider
    }

    pub const fn driver(&self) -> Option<DriverId> {
        self.driver
    }

    pub fn pickup(&self) -> &str {
        &self.pickup
    }

    pub fn dropoff(&self) -> &str {
        &self.dropoff
    }

    pub const fn distance_miles(&self) -> f64 {
        self.distance_miles
    }

    pub const fn kind(&self) -> RideKind {
        self.kind
    }

    /// `distance_miles * kind.rate_per_mile()`.
    pub fn fare(&self) -> f64 {
        self.distance_miles * self.kind.rate_per_mile()
    }
}
