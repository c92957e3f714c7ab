//! The HTTP surface: Producer submit endpoints plus the StatusAPI
//! (get/cancel/download/health).

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
