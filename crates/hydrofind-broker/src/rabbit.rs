//! RabbitMQ-backed broker connection, grounded in
//! `backend/messaging/producer.py` (queue
//! declaration, persistent delivery) and
//! `backend/messaging/consumer.py` (manual
//! ack/nack, prefetch=1 single-flight consumption).

use chrono::Utc;
use futures::StreamExt;
use hydrofind_shared::{HydroError, HydroResult};
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicNackOptions, BasicPublishOptions, BasicQosOptions,
    QueueDeclareOptions,
};
use lapin::types::{AMQPValue, FieldTable, LongLongInt, ShortString};
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use tokio::sync::Mutex;

use crate::wire::WorkMessage;

const X_RETRY_COUNT: &str = "x-retry-count";
const X_TASK_ID: &str = "x-task-id";
const X_PRIORITY: &str = "x-priority";
const X_SENT_TIMESTAMP: &str = "x-sent-timestamp";

pub struct RabbitBroker {
    channel: Channel,
    queue: String,
    consumer: Mutex<Option<lapin::Consumer>>,
}

impl RabbitBroker {
    pub async fn connect(amqp_uri: &str, queue: &str, prefetch: u16) -> HydroResult<Self> {
        let connection = Connection::connect(amqp_uri, ConnectionProperties::default())
            .await
            .map_err(|e| HydroError::Messaging(format!("connect failed: {e}")))?;
        let channel = connection
            .create_channel()
            .await
            .map_err(|e| HydroError::Messaging(format!("channel open failed: {e}")))?;

        channel
            .queue_declare(queue, QueueDeclareOptions { durable: true, ..Default::default() }, FieldTable::default())
            .await
            .map_err(|e| HydroError::Messaging(format!("queue declare failed: {e}")))?;

        channel
            .basic_qos(prefetch, BasicQosOptions::default())
            .await
            .map_err(|e| HydroError::Messaging(format!("qos failed: {e}")))?;

        Ok(Self { channel, queue: queue.to_string(), consumer: Mutex::new(None) })
    }

    fn headers(task_id: &str, priority: u8, retry_count: u32) -> FieldTable {
        let mut headers = FieldTable::default();
        headers.insert(ShortString::from(X_TASK_ID), AMQPValue::LongString(task_id.into()));
        headers.insert(ShortString::from(X_PRIORITY), AMQPValue::ShortShortUInt(priority));
        headers.insert(ShortString::from(X_RETRY_COUNT), AMQPValue::LongUInt(retry_count));
        headers.insert(
            ShortString::from(X_SENT_TIMESTAMP),
            AMQPValue::LongLongInt(Utc::now().timestamp() as LongLongInt),
        );
        headers
    }

    pub async fn publish(&self, message: &WorkMessage, retry_count: u32) -> HydroResult<()> {
        let payload = serde_json::to_vec(message)?;
        let properties = BasicProperties::default()
            .with_delivery_mode(2) // persistent
            .with_content_type("application/json".into())
            .with_headers(Self::headers(message.task_id(), message.priority(), retry_count));

        self.channel
            .basic_publish(
                "",
                &self.queue,
                BasicPublishOptions::default(),
                &payload,
                properties,
            )
            .await
            .map_err(|e| HydroError::Messaging(format!("publish failed: {e}")))?
            .await
            .map_err(|e| HydroError::Messaging(format!("publish confirm failed: {e}")))?;
        Ok(())
    }

    async fn ensure_consumer(&self) -> HydroResult<()> {
        let mut guard = self.consumer.lock().await;
        if guard.is_none() {
            let consumer = self
                .channel
                .basic_consume(
                    &self.queue,
                    "hydrofind-worker",
                    BasicConsumeOptions::default(),
                    FieldTable::default(),
                )
                .await
                .map_err(|e| HydroError::Messaging(format!("consume failed: {e}")))?;
            *guard = Some(consumer);
        }
        Ok(())
    }

    /// Block until the next delivery arrives. Returns the decoded message
    /// (or the deserialization failure, left for the caller to ack-and-drop
    /// rather than propagate), its retry count (from `x-retry-count`), and
    /// raw delivery handle for the caller to ack/nack once processing
    /// completes.
    pub async fn recv(&self) -> HydroResult<(HydroResult<WorkMessage>, u32, lapin::message::Delivery)> {
        self.ensure_consumer().await?;
        let mut guard = self.consumer.lock().await;
        let consumer = guard.as_mut().expect("consumer initialized above");
        let delivery = consumer
            .next()
            .await
            .ok_or_else(|| HydroError::Messaging("consumer stream closed".into()))?
            .map_err(|e| HydroError::Messaging(format!("delivery error: {e}")))?;

        let retry_count = delivery
            .properties
            .headers()
            .as_ref()
            .and_then(|h| h.inner().get(X_RETRY_COUNT))
            .and_then(|v| match v {
                AMQPValue::LongUInt(n) => Some(*n),
                _ => None,
            })
            .unwrap_or(0);

        let message = serde_json::from_slice::<WorkMessage>(&delivery.data).map_err(HydroError::from);
        Ok((message, retry_count, delivery))
    }

    pub async fn ack(&self, delivery: lapin::message::Delivery) -> HydroResult<()> {
        delivery
            .ack(BasicAckOptions::default())
            .await
            .map_err(|e| HydroError::Messaging(format!("ack failed: {e}")))
    }

    pub async fn nack(&self, delivery: lapin::message::Delivery, requeue: bool) -> HydroResult<()> {
        delivery
            .nack(BasicNackOptions { requeue, ..Default::default() })
            .await
            .map_err(|e| HydroError::Messaging(format!("nack failed: {e}")))
    }

    /// Channel liveness, for `/api/health`'s `services.broker` field.
    pub fn is_connected(&self) -> bool {
        self.channel.status().connected()
    }
}
