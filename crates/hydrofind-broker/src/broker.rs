//! Enum-dispatch facade over the two broker backends, grounded in the
//! teacher's `MessageClient` wrapper
//! (`tasker-shared/src/messaging/client.rs`): callers hold one concrete
//! type and never touch `RabbitBroker`/`InMemoryBroker` directly.

use hydrofind_shared::HydroResult;

use crate::memory::{InMemoryBroker, InMemoryDelivery};
use crate::rabbit::RabbitBroker;
use crate::wire::WorkMessage;

/// A received message plus its delivery handle, abstracting over the two
/// backends so the worker pipeline only ever sees one type.
pub enum Delivery {
    Rabbit(RabbitDelivery),
    InMemory(InMemoryDelivery),
}

pub struct RabbitDelivery {
    pub(crate) broker: std::sync::Arc<RabbitBroker>,
    pub(crate) delivery: lapin::message::Delivery,
}

impl Delivery {
    pub async fn ack(self) -> HydroResult<()> {
        match self {
            Delivery::Rabbit(d) => d.broker.ack(d.delivery).await,
            Delivery::InMemory(d) => d.ack().await,
        }
    }

    pub async fn nack(self, requeue: bool) -> HydroResult<()> {
        match self {
            Delivery::Rabbit(d) => d.broker.nack(d.delivery, requeue).await,
            Delivery::InMemory(d) => d.nack(requeue).await,
        }
    }
}

/// Publisher/consumer facade over a RabbitMQ connection or an in-memory
/// stand-in (tests, examples).
pub enum Broker {
    Rabbit(std::sync::Arc<RabbitBroker>),
    InMemory(InMemoryBroker),
}

impl Broker {
    pub fn rabbit(inner: RabbitBroker) -> Self {
        Broker::Rabbit(std::sync::Arc::new(inner))
    }

    pub fn in_memory() -> Self {
        Broker::InMemory(InMemoryBroker::new())
    }

    /// Publish a new message with a fresh (zero) retry count.
    pub async fn publish(&self, message: &WorkMessage) -> HydroResult<()> {
        match self {
            Broker::Rabbit(b) => b.publish(message, 0).await,
            Broker::InMemory(b) => b.publish(message, 0).await,
        }
    }

    /// Republish with an incremented retry count: retries are in-band via
    /// republish, not a broker-native redelivery mechanism.
    pub async fn republish_with_retry(&self, message: &WorkMessage, retry_count: u32) -> HydroResult<()> {
        match self {
            Broker::Rabbit(b) => b.publish(message, retry_count).await,
            Broker::InMemory(b) => b.publish(message, retry_count).await,
        }
    }

    /// Connection liveness, for `/api/health`'s `services.broker` field.
    /// The in-memory backend is always "connected".
    pub fn is_connected(&self) -> bool {
        match self {
            Broker::Rabbit(b) => b.is_connected(),
            Broker::InMemory(_) => true,
        }
    }

    /// Block until the next message is available. The decoded message is
    /// itself a `Result`: a `RabbitBroker` delivery that fails to deserialize
    /// into a `WorkMessage` is handed back as an `Err` rather than failing
    /// `recv` outright, so the caller can ack-and-drop the one bad delivery
    /// instead of the whole consumer loop propagating the error upward. The
    /// in-memory backend never deserializes, so it can't hit this path.
    pub async fn recv(&self) -> HydroResult<(HydroResult<WorkMessage>, u32, Delivery)> {
        match self {
            Broker::Rabbit(b) => {
                let (message, retry_count, delivery) = b.recv().await?;
                Ok((
                    message,
                    retry_count,
                    Delivery::Rabbit(RabbitDelivery { broker: b.clone(), delivery }),
                ))
            }
            Broker::InMemory(b) => {
                let (message, retry_count, delivery) = b.recv().await?;
                Ok((Ok(message), retry_count, Delivery::InMemory(delivery)))
            }
        }
    }
}
