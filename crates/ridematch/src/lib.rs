//! Concurrent rider/driver matching engine.
//!
//! Riders and drivers are pushed into two unbounded FIFO queues. A fixed pool
//! of Tokio tasks pairs one of each, synthesises a [`Ride`] and appends it to
//! a shared [`RideStore`]. [`RideSharingSystem`] ties the pieces together and
//! shuts the pool down within a fixed bound.
//!
//! ```no_run
//! use ridematch::{RideSharingSystem, SystemConfig};
//!
//! # async fn run() -> ridematch::Result<()> {
//! let system = RideSharingSystem::new(SystemConfig::new(3))?;
//! system.add_rider("Rider0")?;
//! system.add_driver("Driver0")?;
//!
//! let outcome = system.shutdown().await;
//! for ride in system.list_completed_rides() {
//!     println!("{} -> {}: ${:.2}", ride.pickup(), ride.dropoff(), ride.fare());
//! }
//! # let _ = outcome;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod id;
pub mod pool;
mod queue;
mod ride;
mod store;
mod system;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::id::*;
pub use crate::pool::manager::{ShutdownOutcome, WorkerPool};
pub use crate::pool::worker::{DISTANCE_MILES, DROPOFF, PICKUP, WorkerContext};
pub use crate::queue::*;
pub use crate::ride::*;
pub use crate::store::*;
pub use crate::system::*;
