//! Push subscriptions
//!
//! A `Subscription` is the receiving half of a live query. The store keeps the
//! matching `SubscriptionSink` and pushes a full result on every change.
//! Closing or dropping the subscription detaches it: nothing pushed afterwards
//! is observed, and the sink reports itself closed so the producer can stop.

use tokio::sync::mpsc;

use crate::error::DomainError;

/// Create a connected sink/subscription pair
pub fn subscription_channel<T>() -> (SubscriptionSink<T>, Subscription<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        SubscriptionSink { tx },
        Subscription { rx, closed: false },
    )
}

/// Receiving half of a live query
#[derive(Debug)]
pub struct Subscription<T> {
    rx: mpsc::UnboundedReceiver<Result<T, DomainError>>,
    closed: bool,
}

impl<T> Subscription<T> {
    /// Wait for the next push
    ///
    /// Returns `None` once the subscription is closed or the producer has gone
    /// away. Cancel safe.
    pub async fn next(&mut self) -> Option<Result<T, DomainError>> {
        if self.closed {
            return None;
        }
        self.rx.recv().await
    }

    /// Unsubscribe. Buffered pushes are dropped.
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.rx.close();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Producing half of a live query, held by the store
#[derive(Debug)]
pub struct SubscriptionSink<T> {
    tx: mpsc::UnboundedSender<Result<T, DomainError>>,
}

impl<T> Clone for SubscriptionSink<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> SubscriptionSink<T> {
    /// Push a result; returns false if the subscriber is gone
    pub fn push(&self, item: T) -> bool {
        self.tx.send(Ok(item)).is_ok()
    }

    /// Report a failure to the subscriber; returns false if it is gone
    pub fn fail(&self, err: DomainError) -> bool {
        self.tx.send(Err(err)).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Resolves once the subscriber has closed or dropped its end
    pub async fn closed(&self) {
        self.tx.closed().await
    }
}
