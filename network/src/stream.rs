//! Push stream of topic messages.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::NetworkError;
use crate::response::TopicMessage;

/// Channel capacity between a stream producer and its consumer.
pub const STREAM_CAPACITY: usize = 256;

/// A live, consensus-ordered stream of messages for one topic.
///
/// The network pushes messages as they reach consensus; there is no
/// end-of-history marker. The stream ends when the producer stops (returns
/// `None`). Dropping the stream aborts the producer task, which releases the
/// underlying network subscription.
#[derive(Debug)]
pub struct TopicStream {
    rx: mpsc::Receiver<Result<TopicMessage, NetworkError>>,
    producer: Option<JoinHandle<()>>,
}

/// Producer half handed to whatever feeds a [`TopicStream`].
pub type TopicSender = mpsc::Sender<Result<TopicMessage, NetworkError>>;

impl TopicStream {
    /// Create a stream and the sender that feeds it.
    pub fn channel() -> (TopicSender, Self) {
        let (tx, rx) = mpsc::channel(STREAM_CAPACITY);
        (tx, Self { rx, producer: None })
    }

    /// Tie the lifetime of a producer task to this stream.
    pub fn with_producer(mut self, producer: JoinHandle<()>) -> Self {
        self.producer = Some(producer);
        self
    }

    /// Wait for the next message. `None` means the producer has stopped.
    pub async fn next(&mut self) -> Option<Result<TopicMessage, NetworkError>> {
        self.rx.recv().await
    }
}

impl Drop for TopicStream {
    fn drop(&mut self) {
        self.rx.close();
        if let Some(producer) = self.producer.take() {
            producer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hbar_types::ConsensusTimestamp;

    fn message(seq: u64) -> TopicMessage {
        TopicMessage {
            consensus_timestamp: ConsensusTimestamp::new(seq as i64, 0),
            contents: vec![],
            sequence_number: seq,
            running_hash: vec![],
        }
    }

    #[tokio::test]
    async fn delivers_in_send_order() {
        let (tx, mut stream) = TopicStream::channel();
        for seq in 1..=3 {
            tx.send(Ok(message(seq))).await.unwrap();
        }
        drop(tx);
        let mut seen = Vec::new();
        while let Some(Ok(msg)) = stream.next().await {
            seen.push(msg.sequence_number);
        }
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn dropping_stream_aborts_producer() {
        let (_tx, stream) = TopicStream::channel();
        let (alive_tx, alive_rx) = tokio::sync::oneshot::channel::<()>();
        let producer = tokio::spawn(async move {
            let _alive = alive_tx;
            std::future::pending::<()>().await;
        });
        let stream = stream.with_producer(producer);
        drop(stream);
        // The sender is dropped only when the producer task is torn down.
        assert!(alive_rx.await.is_err());
    }
}
