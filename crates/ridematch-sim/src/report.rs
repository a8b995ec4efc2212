//! Formatting of completed rides for the console.

use ridematch::{Ride, RideKind, ShutdownOutcome};
use serde::Serialize;
use std::io::{self, Write};

const RULE: &str = "--------------------------------";

/// Everything the report prints besides the rides themselves.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Summary {
    pub forced_shutdown: bool,
    pub unmatched_riders: usize,
    pub unmatched_drivers: usize,
}

impl Summary {
    pub const fn new(
        outcome: ShutdownOutcome,
        unmatched_riders: usize,
        unmatched_drivers: usize,
    ) -> Self {
        Self {
            forced_shutdown: outcome.is_forced(),
            unmatched_riders,
            unmatched_drivers,
        }
    }
}

#[derive(Serialize)]
struct RideLine<'a> {
    id: u64,
    pickup: &'a str,
    dropoff: &'a str,
    distance_miles: f64,
    kind: RideKind,
    fare: f64,
}

impl<'a> From<&'a Ride> for RideLine<'a> {
    fn from(ride: &'a Ride) -> Self {
        Self {
            id: ride.id().to_raw(),
            pickup: ride.pickup(),
            dropoff: ride.dropoff(),
            distance_miles: ride.distance_miles(),
            kind: ride.kind(),
            fare: ride.fare(),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    completed: usize,
    #[serde(flatten)]
    summary: Summary,
    rides: Vec<RideLine<'a>>,
}

pub fn write_text<W: Write>(out: &mut W, rides: &[Ride], summary: Summary) -> io::Result<()> {
    writeln!(out, "\n--- Completed Rides ---")?;
    for ride in rides {
        writeln!(out, "Ride ID: {}", ride.id())?;
        writeln!(out, "Pickup: {}", ride.pickup())?;
        writeln!(out, "Dropoff: {}", ride.dropoff())?;
        writeln!(out, "Distance: {:.2} miles", ride.distance_miles())?;
        writeln!(out, "Fare: ${:.2}", ride.fare())?;
        writeln!(out, "{RULE}")?;
    }
    writeln!(
        out,
        "{} rides completed, {} riders and {} drivers unmatched{}",
        rides.len(),
        summary.unmatched_riders,
        summary.unmatched_drivers,
        if summary.forced_shutdown {
            " (forced shutdown)"
        } else {
            ""
        }
    )
}

pub fn write_json<W: Write>(out: &mut W, rides: &[Ride], summary: Summary) -> io::Result<()> {
    let report = JsonReport {
        completed: rides.len(),
        summary,
        rides: rides.iter().map(RideLine::from).collect(),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)
}
