use crate::{
    config::OrphanPolicy,
    id::IdAllocator,
    queue::MatchQueues,
    ride::{Ride, RideKind},
    store::RideStore,
};
use core::{ops::Range, time::Duration};
use rand::Rng;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Pickup label of every synthesised ride.
pub const PICKUP: &str = "Start";
/// Dropoff label of every synthesised ride.
pub const DROPOFF: &str = "End";
/// Half-open range synthesised ride distances are drawn from, in miles.
pub const DISTANCE_MILES: Range<f64> = 5.0..15.0;

/// Everything a worker shares with its siblings and the controller.
///
/// Cloning is cheap: every field is reference counted or `Copy`.
#[derive(Clone, Debug)]
pub struct WorkerContext {
    pub queues: Arc<MatchQueues>,
    pub store: Arc<RideStore>,
    pub ids: Arc<IdAllocator>,
    pub processing_delay: Duration,
    pub orphan_policy: OrphanPolicy,
    /// Service level stamped on every ride this pool synthesises.
    pub ride_kind: RideKind,
}

/// Matcher task pairing one rider with one driver per iteration.
///
/// Each iteration:
///
/// 1. Waits for a rider. Cancellation here stops the worker without touching
///    the driver queue.
/// 2. Waits for a driver. Cancellation here stops the worker while it holds a
///    rider, who is then handled by the configured [`OrphanPolicy`].
/// 3. Builds a ride of the configured [`RideKind`] with a distance drawn
///    from [`DISTANCE_MILES`].
/// 4. Sleeps for the processing delay. The delay is drained rather than
///    interrupted; only an overrun shutdown aborts it.
/// 5. Appends the ride to the store.
///
/// Runs until `shutdown` is cancelled and returns the number of rides it
/// completed.
pub async fn worker_loop(
    worker_id: usize,
    ctx: WorkerContext,
    shutdown: CancellationToken,
) -> usize {
    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {worker_id} started");

    let mut completed = 0;

    loop {
        let Some(rider) = ctx.queues.dequeue_rider(&shutdown).await else {
            break;
        };

        let Some(driver) = ctx.queues.dequeue_driver(&shutdown).await else {
            match ctx.orphan_policy {
                OrphanPolicy::Drop => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        "Worker {worker_id} dropped rider {} ({}) with no driver at shutdown",
                        rider.id(),
                        rider.name()
                    );
                }
                OrphanPolicy::Requeue => {
                    #[cfg(feature = "tracing")]
                    tracing::info!(
                        "Worker {worker_id} returned rider {} ({}) to the queue",
                        rider.id(),
                        rider.name()
                    );
                    ctx.queues.requeue_rider(rider);
                }
            }
            break;
        };

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Worker {worker_id} matched {} with {}",
            rider.name(),
            driver.name()
        );

        let distance = rand::rng().random_range(DISTANCE_MILES);
        let ride = Ride::new(
            ctx.ids.next_ride(),
            PICKUP,
            DROPOFF,
            distance,
            ctx.ride_kind,
        )
        .between(rider.id(), driver.id());

        if !ctx.processing_delay.is_zero() {
            tokio::time::sleep(ctx.processing_delay).await;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Worker {worker_id} completed ride {} for {} with {}",
            ride.id(),
            rider.name(),
            driver.name()
        );

        ctx.store.append(ride);
        completed += 1;
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {worker_id} stopped after {completed} rides");

    #[cfg(not(feature = "tracing"))]
    let _ = worker_id;

    completed
}
