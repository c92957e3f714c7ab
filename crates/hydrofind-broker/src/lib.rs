//! Broker: the work queue boundary for the hydrofind pipeline. Publishes
//! and consumes `WorkMessage`s over RabbitMQ, with an in-memory stand-in
//! for tests.

pub mod broker;
pub mod memory;
pub mod rabbit;
pub mod wire;

pub use broker::{Broker, Delivery};
pub use wire::WorkMessage;
