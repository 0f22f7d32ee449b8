//! REST API layer with Accept-header content negotiation.
//!
//! Responses are produced by output visitors. Which visitor renders a
//! response is decided per request by matching the client's `Accept`
//! candidates against a priority-ordered dispatch table compiled from the
//! configured visitor registrations.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod visitor;

pub use config::RestConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
