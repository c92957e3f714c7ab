//! In-memory broker test double, following the `MessagingProvider::new_in_memory()`
//! pattern: an exercised stand-in for a live RabbitMQ connection, used
//! throughout the worker/api test suites.

use std::collections::VecDeque;
use std::sync::Arc;

use hydrofind_shared::HydroResult;
use tokio::sync::Notify;
use tokio::sync::Mutex;

use crate::wire::WorkMessage;

struct Envelope {
    message: WorkMessage,
    retry_count: u32,
}

/// A queue entry handed back to callers instead of a `lapin::Delivery`; ack
/// is a no-op, nack-with-requeue pushes the envelope back onto the queue.
pub struct InMemoryDelivery {
    envelope: Option<Envelope>,
    queue: Arc<InnerQueue>,
}

impl InMemoryDelivery {
    pub async fn ack(mut self) -> HydroResult<()> {
        self.envelope = None;
        Ok(())
    }

    pub async fn nack(mut self, requeue: bool) -> HydroResult<()> {
        if requeue {
            if let Some(envelope) = self.envelope.take() {
                self.queue.push(envelope).await;
            }
        }
        Ok(())
    }
}

struct InnerQueue {
    items: Mutex<VecDeque<Envelope>>,
    notify: Notify,
}

impl InnerQueue {
    async fn push(&self, envelope: Envelope) {
        self.items.lock().await.push_back(envelope);
        self.notify.notify_one();
    }
}

pub struct InMemoryBroker {
    queue: Arc<InnerQueue>,
}

impl Default for InMemoryBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self {
            queue: Arc::new(InnerQueue { items: Mutex::new(VecDeque::new()), notify: Notify::new() }),
        }
    }

    pub async fn publish(&self, message: &WorkMessage, retry_count: u32) -> HydroResult<()> {
        self.queue.push(Envelope { message: message.clone(), retry_count }).await;
        Ok(())
    }

    /// Block until a message is available, then hand it back along with a
    /// delivery handle for ack/nack.
    pub async fn recv(&self) -> HydroResult<(WorkMessage, u32, InMemoryDelivery)> {
        loop {
            {
                let mut items = self.queue.items.lock().await;
                if let Some(envelope) = items.pop_front() {
                    let message = envelope.message.clone();
                    let retry_count = envelope.retry_count;
                    return Ok((
                        message,
                        retry_count,
                        InMemoryDelivery { envelope: Some(envelope), queue: self.queue.clone() },
                    ));
                }
            }
            self.queue.notify.notified().await;
        }
    }

    /// Number of messages currently waiting, for test assertions.
    pub async fn len(&self) -> usize {
        self.queue.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_message(task_id: &str) -> WorkMessage {
        WorkMessage::Single {
            task_id: task_id.to_string(),
            query: "fitting DKOL".to_string(),
            priority: 5,
            metadata: serde_json::Value::Null,
        }
    }

    #[tokio::test]
    async fn publish_then_recv_round_trips_retry_count() {
        let broker = InMemoryBroker::new();
        broker.publish(&sample_message("t1"), 2).await.unwrap();
        let (message, retry_count, delivery) = broker.recv().await.unwrap();
        assert_eq!(message.task_id(), "t1");
        assert_eq!(retry_count, 2);
        delivery.ack().await.unwrap();
    }

    #[tokio::test]
    async fn nack_with_requeue_makes_message_available_again() {
        let broker = InMemoryBroker::new();
        broker.publish(&sample_message("t1"), 0).await.unwrap();
        let (_, _, delivery) = broker.recv().await.unwrap();
        delivery.nack(true).await.unwrap();
        assert_eq!(broker.len().await, 1);
    }

    #[tokio::test]
    async fn nack_without_requeue_drops_the_message() {
        let broker = InMemoryBroker::new();
        broker.publish(&sample_message("t1"), 0).await.unwrap();
        let (_, _, delivery) = broker.recv().await.unwrap();
        delivery.nack(false).await.unwrap();
        assert!(broker.is_empty().await);
    }
}
