//! Declared visitor registrations.
//!
//! A registration binds an output visitor (by reference) to the media-type
//! patterns it serves. Registrations come from the `[[visitors]]` tables of
//! the configuration file, or are built directly in code.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque reference to an output visitor.
///
/// The registry never instantiates visitors; the reference is looked up in a
/// [`VisitorCatalog`](crate::visitor::output::VisitorCatalog) at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct HandlerRef(String);

impl HandlerRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HandlerRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Where a registration's patterns come from.
///
/// Both forms carry pattern *groups*: a list of lists, flattened one level
/// before the patterns are compiled.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PatternSource {
    /// Pattern groups written inline.
    Literal(Vec<Vec<String>>),
    /// Name of a parameter that resolves to pattern groups.
    Parameter(String),
}

/// Priority as it was declared, before it is interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeclaredPriority {
    /// No `priority` key.
    #[default]
    Absent,
    Integer(i64),
    /// Present, but not something we can read as an integer.
    Malformed(String),
}

impl DeclaredPriority {
    /// Interpret a raw config value.
    pub fn from_toml(value: Option<&toml::Value>) -> Self {
        match value {
            None => Self::Absent,
            Some(toml::Value::Integer(i)) => Self::Integer(*i),
            Some(toml::Value::String(s)) => match s.trim().parse::<i64>() {
                Ok(i) => Self::Integer(i),
                Err(_) => Self::Malformed(s.clone()),
            },
            Some(other) => Self::Malformed(other.to_string()),
        }
    }

    /// The priority used for ordering. `None` means the declared value was
    /// unusable and the default applies.
    pub fn effective(&self) -> Option<i64> {
        match self {
            Self::Absent => Some(0),
            Self::Integer(i) => Some(*i),
            Self::Malformed(_) => None,
        }
    }
}

impl From<i64> for DeclaredPriority {
    fn from(priority: i64) -> Self {
        Self::Integer(priority)
    }
}

impl From<i32> for DeclaredPriority {
    fn from(priority: i32) -> Self {
        Self::Integer(priority.into())
    }
}

/// A visitor binding known at build time.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitorRegistration {
    pub handler: HandlerRef,
    pub patterns: Option<PatternSource>,
    pub priority: DeclaredPriority,
}

impl VisitorRegistration {
    /// Registration with inline pattern groups and default priority.
    pub fn literal(handler: impl Into<String>, groups: Vec<Vec<String>>) -> Self {
        Self {
            handler: HandlerRef::new(handler),
            patterns: Some(PatternSource::Literal(groups)),
            priority: DeclaredPriority::Absent,
        }
    }

    /// Registration whose patterns come from a named parameter.
    pub fn parameter(handler: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            handler: HandlerRef::new(handler),
            patterns: Some(PatternSource::Parameter(name.into())),
            priority: DeclaredPriority::Absent,
        }
    }

    pub fn with_priority(mut self, priority: impl Into<DeclaredPriority>) -> Self {
        self.priority = priority.into();
        self
    }
}
