//! Request classification.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → matcher.rs (REST path predicate)
//!     → http::request listener sets IsRestRequest extension
//!     → handlers decide between REST rendering and plain responses
//! ```
//!
//! # Design Decisions
//! - Classification is a pure function of the path
//! - Every request is classified, including ones that end up as 404

pub mod matcher;

pub use matcher::{Matcher, RestRequestMatcher};
