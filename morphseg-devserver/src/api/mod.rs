//! HTTP API of the development backend

pub mod handlers;
pub mod health;

pub use handlers::*;
pub use health::health_routes;
