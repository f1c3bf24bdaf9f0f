//! Live subscriptions emulated by polling

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::domain::ports::SubscriptionSink;
use crate::error::DomainError;

/// Poll `fetch` every `every` and push each result that differs from the last
///
/// The first successful poll is always pushed. A failed poll is reported to
/// the subscriber and forgets the last result, so the next success is pushed
/// even if unchanged. The task ends when the subscriber closes.
pub fn spawn_poll<T, F, Fut>(sink: SubscriptionSink<T>, every: Duration, mut fetch: F) -> JoinHandle<()>
where
    T: Clone + PartialEq + Send + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, DomainError>> + Send,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last: Option<T> = None;

        loop {
            tokio::select! {
                _ = sink.closed() => break,
                _ = ticker.tick() => {}
            }

            let result = tokio::select! {
                _ = sink.closed() => break,
                result = fetch() => result,
            };

            match result {
                Ok(value) => {
                    if last.as_ref() == Some(&value) {
                        continue;
                    }
                    if !sink.push(value.clone()) {
                        break;
                    }
                    last = Some(value);
                }
                Err(e) => {
                    tracing::warn!("Poll failed: {}", e);
                    last = None;
                    if !sink.fail(e) {
                        break;
                    }
                }
            }
        }

        tracing::debug!("Polling stopped");
    })
}
