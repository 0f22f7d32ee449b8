//! Per-request visitor selection.
//!
//! # Data Flow
//! ```text
//! Accept header
//!     → accept.rs (ordered candidates)
//!     → resolve() against the current table generation
//!     → VisitorCatalog lookup (lazy instantiation)
//!     → OutputVisitor::render
//! ```
//!
//! # Design Decisions
//! - Client preference first: every entry is tried for a candidate before
//!   the next candidate is considered
//! - No fallback visitor: no match is an explicit `NotAcceptable`
//! - The table is swapped atomically; a call works on the generation it
//!   loaded at its start

use std::sync::Arc;

use arc_swap::ArcSwap;
use thiserror::Error;

use crate::observability::metrics;
use crate::visitor::accept;
use crate::visitor::output::{OutputVisitor, RestValue, VisitError, VisitorCatalog};
use crate::visitor::registration::HandlerRef;
use crate::visitor::table::DispatchTable;

/// No table entry accepts any of the candidates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no visitor accepts any of [{}]", .candidates.join(", "))]
pub struct NotAcceptable {
    pub candidates: Vec<String>,
}

/// Errors that can occur while dispatching a value to a visitor.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    NotAcceptable(#[from] NotAcceptable),

    /// The table names a visitor the catalog does not provide.
    #[error("visitor '{0}' is not registered in the catalog")]
    UnknownVisitor(HandlerRef),

    #[error(transparent)]
    Visit(#[from] VisitError),
}

/// Select the handler for the first acceptable candidate.
///
/// Candidates are tried in order; for each one the table is scanned in
/// priority order and the first entry with a matching pattern wins.
pub fn resolve<'t, S: AsRef<str>>(
    table: &'t DispatchTable,
    candidates: &[S],
) -> Result<&'t HandlerRef, NotAcceptable> {
    for candidate in candidates {
        let candidate = candidate.as_ref();
        if let Some(entry) = table.entries().iter().find(|e| e.matches(candidate)) {
            tracing::trace!(candidate, handler = %entry.handler(), "Visitor matched");
            return Ok(entry.handler());
        }
    }

    Err(NotAcceptable {
        candidates: candidates.iter().map(|c| c.as_ref().to_string()).collect(),
    })
}

/// A rendered response body.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    pub handler: HandlerRef,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Dispatches values to visitors based on the request's `Accept` header.
#[derive(Debug)]
pub struct AcceptHeaderDispatcher {
    table: ArcSwap<DispatchTable>,
    catalog: VisitorCatalog,
}

impl AcceptHeaderDispatcher {
    pub fn new(table: DispatchTable, catalog: VisitorCatalog) -> Self {
        Self {
            table: ArcSwap::from_pointee(table),
            catalog,
        }
    }

    /// The current table generation.
    pub fn table(&self) -> Arc<DispatchTable> {
        self.table.load_full()
    }

    /// Publish a new table. Returns the previous generation.
    pub fn replace_table(&self, table: DispatchTable) -> Arc<DispatchTable> {
        let visitors = table.len();
        let previous = self.table.swap(Arc::new(table));
        tracing::info!(visitors, previous = previous.len(), "Visitor dispatch table replaced");
        previous
    }

    pub fn catalog(&self) -> &VisitorCatalog {
        &self.catalog
    }

    /// Pick the visitor for a raw `Accept` header value.
    pub fn select(&self, accept: Option<&str>) -> Result<(HandlerRef, Arc<dyn OutputVisitor>), DispatchError> {
        let candidates = accept::candidates(accept);
        let table = self.table.load();

        let handler = match resolve(&table, candidates.as_slice()) {
            Ok(handler) => handler.clone(),
            Err(err) => {
                tracing::debug!(accept = ?accept, "No acceptable visitor");
                metrics::record_dispatch("none", "not_acceptable");
                return Err(err.into());
            }
        };

        match self.catalog.get(&handler) {
            Some(visitor) => Ok((handler, visitor)),
            None => {
                tracing::error!(handler = %handler, "Dispatch table references unknown visitor");
                metrics::record_dispatch(handler.as_str(), "unknown_visitor");
                Err(DispatchError::UnknownVisitor(handler))
            }
        }
    }

    /// Render `value` with the visitor the `Accept` header selects.
    pub fn dispatch(&self, accept: Option<&str>, value: &RestValue) -> Result<Visit, DispatchError> {
        let (handler, visitor) = self.select(accept)?;
        let body = visitor.render(value)?;
        metrics::record_dispatch(handler.as_str(), "ok");

        Ok(Visit {
            content_type: visitor.media_type(value),
            handler,
            body,
        })
    }
}
