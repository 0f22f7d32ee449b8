//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, REST classification, metrics)
//!     → handlers build a RestValue (resources.rs)
//!     → response.rs (negotiate visitor, render, map errors)
//!     → Send to client
//! ```

pub mod request;
pub mod resources;
pub mod response;
pub mod server;

pub use request::{IsRestRequest, RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
