//! The compiled dispatch table.
//!
//! # Design Decisions
//! - Immutable once built; shared behind `Arc`
//! - Entries ordered by priority descending, then registration order
//! - Patterns are compiled once at build time, never per request

use regex::Regex;

use crate::visitor::registration::HandlerRef;

/// One visitor binding in table order.
#[derive(Debug, Clone)]
pub struct DispatchTableEntry {
    handler: HandlerRef,
    priority: i64,
    index: usize,
    patterns: Vec<Regex>,
}

impl DispatchTableEntry {
    pub(crate) fn new(handler: HandlerRef, priority: i64, index: usize, patterns: Vec<Regex>) -> Self {
        Self {
            handler,
            priority,
            index,
            patterns,
        }
    }

    pub fn handler(&self) -> &HandlerRef {
        &self.handler
    }

    /// Effective priority after defaulting.
    pub fn priority(&self) -> i64 {
        self.priority
    }

    /// Position of the registration in the input sequence.
    pub fn registration_index(&self) -> usize {
        self.index
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Regex::as_str)
    }

    /// True if any pattern matches the media type.
    ///
    /// Patterns are applied as authored; a pattern that should only accept
    /// the whole media type must be anchored (`^...$`).
    pub fn matches(&self, media_type: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(media_type))
    }
}

/// Priority-ordered visitor bindings.
#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    entries: Vec<DispatchTableEntry>,
}

impl DispatchTable {
    /// Sorts the entries into table order.
    pub(crate) fn from_entries(mut entries: Vec<DispatchTableEntry>) -> Self {
        // `sort_by` is stable; the index key keeps this explicit regardless.
        entries.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.index.cmp(&b.index)));
        Self { entries }
    }

    pub fn entries(&self) -> &[DispatchTableEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Handler references in table order.
    pub fn handlers(&self) -> impl Iterator<Item = &HandlerRef> {
        self.entries.iter().map(DispatchTableEntry::handler)
    }
}
