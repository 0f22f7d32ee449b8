//! Output visitor selection (content negotiation).
//!
//! # Data Flow
//! ```text
//! Table compilation (startup and reload):
//!     VisitorRegistration[]
//!     → registry.rs (resolve parameters, flatten, compile regexes)
//!     → Sort by priority, registration order breaks ties
//!     → Freeze as immutable DispatchTable
//!
//! Per request:
//!     Accept header
//!     → accept.rs (candidates by client preference)
//!     → dispatcher.rs (first candidate matching any entry, in table order)
//!     → output.rs (render with the selected visitor)
//!     → Visit or NotAcceptable
//! ```
//!
//! # Design Decisions
//! - Tables compiled once, immutable at runtime, swapped whole on reload
//! - Deterministic: same table and candidates always pick the same visitor
//! - Patterns are applied as authored; anchoring is the author's contract

pub mod accept;
pub mod dispatcher;
pub mod output;
pub mod registration;
pub mod registry;
pub mod table;

pub use dispatcher::{resolve, AcceptHeaderDispatcher, DispatchError, NotAcceptable, Visit};
pub use output::{OutputVisitor, RestValue, VisitorCatalog};
pub use registration::{DeclaredPriority, HandlerRef, PatternSource, VisitorRegistration};
pub use registry::{ParameterResolver, RegistryBuilder, RegistryError};
pub use table::{DispatchTable, DispatchTableEntry};
