//! Cancellable, unbounded FIFO queues feeding the worker pool.
//!
//! A [`MatchQueue`] is a `VecDeque` behind a [`parking_lot::Mutex`] paired with
//! a [`Notify`] for tasks waiting on an empty queue. Producers never wait;
//! consumers wait until an element arrives or their [`CancellationToken`] is
//! cancelled, whichever comes first.

use crate::ride::{Driver, Rider};
use core::pin::pin;
use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// An unbounded FIFO queue whose consumers can be cancelled while waiting.
#[derive(Debug)]
pub struct MatchQueue<T> {
    items: Mutex<VecDeque<T>>,
    notify: Notify,
}

impl<T> Default for MatchQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MatchQueue<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
        }
    }

    /// Appends `item` to the tail and wakes one waiting consumer.
    pub fn push(&self, item: T) {
        self.items.lock().push_back(item);
        self.notify.notify_one();
    }

    /// Returns `item` to the head of the queue so it is the next one served.
    pub fn push_front(&self, item: T) {
        self.items.lock().push_front(item);
        self.notify.notify_one();
    }

    /// Removes the head without waiting.
    pub fn try_pop(&self) -> Option<T> {
        self.items.lock().pop_front()
    }

    /// Waits for the head of the queue.
    ///
    /// Returns `None` once `token` is cancelled. A token that is already
    /// cancelled wins over an available element, so a stopping worker never
    /// takes new work.
    pub async fn pop(&self, token: &CancellationToken) -> Option<T> {
        loop {
            if token.is_cancelled() {
                return None;
            }

            // Register interest before looking at the deque so a push landing
            // between the check and the await is not missed.
            let mut notified = pin!(self.notify.notified());
            notified.as_mut().enable();

            if let Some(item) = self.try_pop() {
                return Some(item);
            }

            tokio::select! {
                biased;
                () = token.cancelled() => return None,
                () = notified => {}
            }
        }
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

/// The rider queue and the driver queue shared by every worker.
#[derive(Debug, Default)]
pub struct MatchQueues {
    riders: MatchQueue<Rider>,
    drivers: MatchQueue<Driver>,
}

impl MatchQueues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue_rider(&self, rider: Rider) {
        self.riders.push(rider);
    }

    pub fn enqueue_driver(&self, driver: Driver) {
        self.drivers.push(driver);
    }

    /// Puts a rider whose match could not complete back at the head of the
    /// rider queue.
    pub fn requeue_rider(&self, rider: Rider) {
        self.riders.push_front(rider);
    }

    pub async fn dequeue_rider(&self, token: &CancellationToken) -> Option<Rider> {
        self.riders.pop(token).await
    }

    pub async fn dequeue_driver(&self, token: &CancellationToken) -> Option<Driver> {
        self.drivers.pop(token).await
    }

    pub fn pending_riders(&self) -> usize {
        self.riders.len()
    }

    pub fn pending_drivers(&self) -> usize {
        self.drivers.len()
    }
}
