//! Compiles visitor registrations into a [`DispatchTable`].
//!
//! # Responsibilities
//! - Resolve pattern sources (inline groups or named parameters)
//! - Flatten pattern groups and compile them
//! - Default missing or unusable priorities to 0
//! - Order entries by priority, keeping registration order for ties
//!
//! # Design Decisions
//! - Pure: no visitor is instantiated here
//! - Parameter lookup is injected through [`ParameterResolver`]
//! - Any configuration fault fails the whole build; there is no partial table

use std::collections::{BTreeMap, HashMap};

use regex::Regex;
use thiserror::Error;

use crate::visitor::registration::{DeclaredPriority, HandlerRef, PatternSource, VisitorRegistration};
use crate::visitor::table::{DispatchTable, DispatchTableEntry};

/// Pattern groups as declared: a list of lists of regular expressions.
pub type PatternGroups = Vec<Vec<String>>;

/// Resolves a named parameter to pattern groups.
pub trait ParameterResolver {
    fn resolve(&self, name: &str) -> Option<&PatternGroups>;
}

impl<T: ParameterResolver + ?Sized> ParameterResolver for &T {
    fn resolve(&self, name: &str) -> Option<&PatternGroups> {
        (**self).resolve(name)
    }
}

impl ParameterResolver for HashMap<String, PatternGroups> {
    fn resolve(&self, name: &str) -> Option<&PatternGroups> {
        self.get(name)
    }
}

impl ParameterResolver for BTreeMap<String, PatternGroups> {
    fn resolve(&self, name: &str) -> Option<&PatternGroups> {
        self.get(name)
    }
}

/// Resolver for registrations that only use inline patterns.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoParameters;

impl ParameterResolver for NoParameters {
    fn resolve(&self, _name: &str) -> Option<&PatternGroups> {
        None
    }
}

/// Errors that prevent a dispatch table from being built.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registration declares no pattern source at all.
    #[error("visitor '{handler}' (registration #{index}) declares no patterns")]
    MissingPatterns { handler: HandlerRef, index: usize },

    /// The pattern source resolved to an empty list.
    #[error("visitor '{handler}' (registration #{index}) has an empty pattern list")]
    EmptyPatterns { handler: HandlerRef, index: usize },

    /// A parameter reference could not be resolved.
    #[error("visitor '{handler}' references unknown parameter '{parameter}'")]
    UnresolvedParameter { handler: HandlerRef, parameter: String },

    /// A pattern is not a valid regular expression.
    #[error("visitor '{handler}' has invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        handler: HandlerRef,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Builds dispatch tables from registrations.
#[derive(Debug, Clone)]
pub struct RegistryBuilder<R> {
    resolver: R,
}

impl RegistryBuilder<NoParameters> {
    /// Builder without parameter support.
    pub fn literal_only() -> Self {
        Self::new(NoParameters)
    }
}

impl<R: ParameterResolver> RegistryBuilder<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// Compile registrations, in declaration order, into a table.
    pub fn build(&self, registrations: &[VisitorRegistration]) -> Result<DispatchTable, RegistryError> {
        let mut entries = Vec::with_capacity(registrations.len());

        for (index, registration) in registrations.iter().enumerate() {
            let patterns = self.compile_patterns(index, registration)?;
            let priority = effective_priority(&registration.handler, &registration.priority);

            tracing::debug!(
                handler = %registration.handler,
                priority,
                patterns = patterns.len(),
                "Visitor registered"
            );

            entries.push(DispatchTableEntry::new(
                registration.handler.clone(),
                priority,
                index,
                patterns,
            ));
        }

        let table = DispatchTable::from_entries(entries);
        tracing::info!(visitors = table.len(), "Visitor dispatch table built");
        Ok(table)
    }

    fn compile_patterns(
        &self,
        index: usize,
        registration: &VisitorRegistration,
    ) -> Result<Vec<Regex>, RegistryError> {
        let handler = &registration.handler;

        let groups = match &registration.patterns {
            None => {
                return Err(RegistryError::MissingPatterns {
                    handler: handler.clone(),
                    index,
                })
            }
            Some(PatternSource::Literal(groups)) => groups,
            Some(PatternSource::Parameter(name)) => {
                self.resolver
                    .resolve(name)
                    .ok_or_else(|| RegistryError::UnresolvedParameter {
                        handler: handler.clone(),
                        parameter: name.clone(),
                    })?
            }
        };

        let patterns = groups
            .iter()
            .flatten()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| RegistryError::InvalidPattern {
                    handler: handler.clone(),
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if patterns.is_empty() {
            return Err(RegistryError::EmptyPatterns {
                handler: handler.clone(),
                index,
            });
        }

        Ok(patterns)
    }
}

fn effective_priority(handler: &HandlerRef, declared: &DeclaredPriority) -> i64 {
    match declared.effective() {
        Some(priority) => priority,
        None => {
            tracing::warn!(
                handler = %handler,
                declared = ?declared,
                "Unusable visitor priority, using default 0"
            );
            0
        }
    }
}
