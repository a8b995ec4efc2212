//! Fixed-size pool of matcher tasks.
//!
//! ## Structure
//!
//! - [`worker`] - the per-task match-and-process loop.
//! - [`manager`] - spawning, cancellation and bounded shutdown of the tasks.

pub mod manager;
pub mod worker;
