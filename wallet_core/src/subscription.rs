//! Live topic subscriptions.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, Instrument};

use hbar_network::TopicStream;
use hbar_types::TopicId;

use crate::result::TopicMessageRecord;

/// Handle to a running topic subscription.
///
/// Records reach the callback in the order the network delivers them.
/// [`cancel`](Self::cancel) (or dropping the handle) unsubscribes: once it
/// returns, only a delivery already under way can still finish. Cancelling
/// from inside the callback stops the subscription after the current record.
#[derive(Debug)]
pub struct SubscriptionHandle {
    topic_id: TopicId,
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl SubscriptionHandle {
    pub(crate) fn spawn<F>(topic_id: TopicId, mut stream: TopicStream, mut callback: F) -> Self
    where
        F: FnMut(TopicMessageRecord) + Send + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let span = hbar_utils::tracing_spans::topic_subscription_span(&topic_id.to_string());

        let task = tokio::spawn(
            async move {
                debug!("subscription started");
                while let Some(next) = stream.next().await {
                    if flag.load(Ordering::Acquire) {
                        break;
                    }
                    match next {
                        Ok(message) => callback(TopicMessageRecord::from(message)),
                        Err(e) => {
                            error!("topic subscription error: {e}");
                            return;
                        }
                    }
                }
                debug!("topic stream ended");
            }
            .instrument(span),
        );

        Self {
            topic_id,
            cancelled,
            task,
        }
    }

    pub fn topic_id(&self) -> TopicId {
        self.topic_id
    }

    /// Whether the subscription has stopped, by cancellation or because the
    /// stream ended.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the subscription and release the network stream. Idempotent.
    pub fn cancel(&self) {
        let was_cancelled = self.cancelled.swap(true, Ordering::AcqRel);
        self.task.abort();
        if !was_cancelled {
            debug!(topic = %self.topic_id, "subscription cancelled");
        }
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hbar_network::TopicMessage;
    use hbar_types::ConsensusTimestamp;
    use std::time::Duration;

    fn message(seq: u64) -> TopicMessage {
        TopicMessage {
            consensus_timestamp: ConsensusTimestamp::new(seq as i64, 0),
            contents: format!("m{seq}").into_bytes(),
            sequence_number: seq,
            running_hash: vec![],
        }
    }

    #[tokio::test]
    async fn delivers_in_order_then_stops_on_cancel() {
        let (tx, stream) = TopicStream::channel();
        let (seen_tx, mut seen_rx) = tokio::sync::mpsc::unbounded_channel();
        let handle = SubscriptionHandle::spawn(TopicId::from_num(1), stream, move |record| {
            let _ = seen_tx.send(record.sequence_number);
        });

        tx.send(Ok(message(1))).await.unwrap();
        tx.send(Ok(message(2))).await.unwrap();
        assert_eq!(seen_rx.recv().await, Some(1));
        assert_eq!(seen_rx.recv().await, Some(2));

        handle.cancel();
        let _ = tx.send(Ok(message(3))).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(seen_rx.try_recv().is_err());
        assert!(handle.is_finished());
    }

    #[tokio::test]
    async fn stream_error_ends_subscription() {
        let (tx, stream) = TopicStream::channel();
        let handle = SubscriptionHandle::spawn(TopicId::from_num(1), stream, |_| {});
        tx.send(Err(hbar_network::NetworkError::Stream("gone".into())))
            .await
            .unwrap();
        tokio::time::timeout(Duration::from_secs(1), async {
            while !handle.is_finished() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn callback_may_cancel_its_own_subscription() {
        let (tx, stream) = TopicStream::channel();
        let slot: Arc<std::sync::Mutex<Option<SubscriptionHandle>>> = Arc::default();
        let (seen_tx, mut seen_rx) = tokio::sync::mpsc::unbounded_channel();

        let own = Arc::clone(&slot);
        let handle = SubscriptionHandle::spawn(TopicId::from_num(1), stream, move |record| {
            let _ = seen_tx.send(record.sequence_number);
            if let Some(handle) = own.lock().unwrap().as_ref() {
                handle.cancel();
            }
        });
        *slot.lock().unwrap() = Some(handle);

        tx.send(Ok(message(1))).await.unwrap();
        assert_eq!(seen_rx.recv().await, Some(1));
        let _ = tx.send(Ok(message(2))).await;
        tokio::time::timeout(Duration::from_secs(1), tx.closed())
            .await
            .unwrap();
        assert!(seen_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn drop_releases_stream() {
        let (tx, stream) = TopicStream::channel();
        let handle = SubscriptionHandle::spawn(TopicId::from_num(1), stream, |_| {});
        drop(handle);
        tokio::time::timeout(Duration::from_secs(1), tx.closed())
            .await
            .unwrap();
    }
}
