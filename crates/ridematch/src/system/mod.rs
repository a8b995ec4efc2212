//! Lifecycle controller for the matching engine.
//!
//! [`RideSharingSystem`] owns the queues, the ride store and the ID allocator,
//! starts the worker pool on construction and exposes the caller-facing API:
//! adding riders and drivers, shutting down, and listing completed rides.
//!
//! ## Responsibilities
//!
//! - Validate the [`SystemConfig`] and spawn the [`WorkerPool`].
//! - Allocate rider and driver IDs and enqueue the new entities.
//! - Refuse new riders and drivers once shutdown has begun.
//! - Stop the pool within the configured bound and report how it ended.


use crate::{
    config::SystemConfig,
    error::{Error, Result},
    id::IdAllocator,
    pool::{
        manager::{ShutdownOutcome, WorkerPool},
        worker::WorkerContext,
    },
    queue::MatchQueues,
    ride::{Driver, Ride, Rider},
    store::RideStore,
};
use parking_lot::RwLock;
use std::sync::Arc;

/// Matches riders with drivers on a fixed pool of Tokio tasks.
///
/// Cloning is cheap and every clone drives the same system.
#[derive(Clone)]
pub struct RideSharingSystem {
    config: SystemConfig,
    queues: Arc<MatchQueues>,
    store: Arc<RideStore>,
    ids: Arc<IdAllocator>,
    worker_pool: Arc<WorkerPool>,
    /// Held shared by every enqueue and exclusively while shutdown cancels
    /// the pool, so no entity is queued after cancellation is observable.
    admission: Arc<RwLock<()>>,
}

impl RideSharingSystem {
    /// Builds the queues and store and starts `config.worker_threads` workers.
    ///
    /// There is no separate start step: the workers are waiting for riders as
    /// soon as this returns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the configuration does not validate.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn new(config: SystemConfig) -> Result<Self> {
        Self::with_allocator(config, Arc::new(IdAllocator::new()))
    }

    /// Like [`RideSharingSystem::new`], drawing IDs from a caller-supplied
    /// allocator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the configuration does not validate.
    pub fn with_allocator(config: SystemConfig, ids: Arc<IdAllocator>) -> Result<Self> {
        config.validate()?;

        let queues = Arc::new(MatchQueues::new());
        let store = Arc::new(RideStore::new());
        let ctx = WorkerContext {
            queues: Arc::clone(&queues),
            store: Arc::clone(&store),
            ids: Arc::clone(&ids),
            processing_delay: config.processing_delay,
            orphan_policy: config.orphan_policy,
            ride_kind: config.ride_kind,
        };
        let worker_pool = WorkerPool::start(config.worker_threads, &ctx);

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Ride sharing system started with {} {} workers (orphan policy: {})",
            config.worker_threads,
            config.ride_kind,
            config.orphan_policy
        );

        Ok(Self {
            config,
            queues,
            store,
            ids,
            worker_pool: Arc::new(worker_pool),
            admission: Arc::new(RwLock::new(())),
        })
    }

    pub const fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Creates a rider with a fresh ID and queues it for matching.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceShutdown`] once shutdown has begun.
    pub fn add_rider(&self, name: impl Into<String>) -> Result<Rider> {
        self.ensure_accepting()?;
        let rider = Rider::new(self.ids.next_rider(), name);
        self.enqueue_rider(rider.clone())?;
        Ok(rider)
    }

    /// Creates a driver with a fresh ID and queues it for matching.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceShutdown`] once shutdown has begun.
    pub fn add_driver(&self, name: impl Into<String>) -> Result<Driver> {
        self.ensure_accepting()?;
        let driver = Driver::new(self.ids.next_driver(), name);
        self.enqueue_driver(driver.clone())?;
        Ok(driver)
    }

    /// Like [`RideSharingSystem::add_driver`], attaching a rating to the
    /// driver. Matching ignores it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceShutdown`] once shutdown has begun.
    pub fn add_driver_with_rating(&self, name: impl Into<String>, rating: u8) -> Result<Driver> {
        self.ensure_accepting()?;
        let driver = Driver::new(self.ids.next_driver(), name).with_rating(rating);
        self.enqueue_driver(driver.clone())?;
        Ok(driver)
    }

    /// Queues an already constructed rider.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceShutdown`] once shutdown has begun.
    pub fn enqueue_rider(&self, rider: Rider) -> Result<()> {
        let _admission = self.admission.read();
        self.ensure_accepting()?;

        #[cfg(feature = "tracing")]
        tracing::debug!("Rider added to queue: {} ({})", rider.name(), rider.id());

        self.queues.enqueue_rider(rider);
        Ok(())
    }

    /// Queues an already constructed driver.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceShutdown`] once shutdown has begun.
    pub fn enqueue_driver(&self, driver: Driver) -> Result<()> {
        let _admission = self.admission.read();
        self.ensure_accepting()?;

        #[cfg(feature = "tracing")]
        tracing::debug!("Driver added to queue: {} ({})", driver.name(), driver.id());

        self.queues.enqueue_driver(driver);
        Ok(())
    }

    /// Stops the workers, waiting at most `config.shutdown_timeout`.
    ///
    /// An overrun is reported as [`ShutdownOutcome::Forced`] and logged; it is
    /// not an error. Enqueue calls fail with [`Error::ServiceShutdown`] from
    /// the moment this is called; an enqueue that was already admitted
    /// completes before the workers are cancelled.
    ///
    /// Shutting down through several clones at once is fine: every caller
    /// waits for the same drain and gets the same outcome.
    pub async fn shutdown(&self) -> ShutdownOutcome {
        {
            let _admission = self.admission.write();
            self.worker_pool.cancel();
        }

        let outcome = self
            .worker_pool
            .shutdown(self.config.shutdown_timeout)
            .await;

        #[cfg(feature = "tracing")]
        if self.queues.pending_riders() > 0 || self.queues.pending_drivers() > 0 {
            tracing::info!(
                "Unmatched at shutdown: {} riders, {} drivers",
                self.queues.pending_riders(),
                self.queues.pending_drivers()
            );
        }

        outcome
    }

    pub fn is_shut_down(&self) -> bool {
        self.worker_pool.is_shutting_down()
    }

    /// Completed rides in match-completion order.
    pub fn list_completed_rides(&self) -> Vec<Ride> {
        self.store.snapshot()
    }

    pub fn completed_count(&self) -> usize {
        self.store.len()
    }

    pub fn pending_riders(&self) -> usize {
        self.queues.pending_riders()
    }

    pub fn pending_drivers(&self) -> usize {
        self.queues.pending_drivers()
    }

    /// Workers that have not yet stopped.
    pub fn running_workers(&self) -> usize {
        self.worker_pool.running_workers()
    }

    fn ensure_accepting(&self) -> Result<()> {
        if self.is_shut_down() {
            return Err(Error::ServiceShutdown);
        }
        Ok(())
    }
}
