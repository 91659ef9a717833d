//! Domain layer for the SeaClaw gateway.
//!
//! Pure data types, validation, and port traits. Nothing in this module
//! tree knows about axum, sqlx connections, or reqwest clients — those
//! live in `infrastructure` and are wired in behind the traits declared
//! in `ports`.

pub mod errors;
pub mod models;
pub mod ports;
pub mod requests;

pub use errors::{GatewayError, GatewayResult};
