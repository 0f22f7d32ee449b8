//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the REST
//! layer. All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::visitor::registration::{DeclaredPriority, HandlerRef, PatternSource, VisitorRegistration};
use crate::visitor::registry::PatternGroups;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RestConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Admin endpoints.
    pub admin: AdminConfig,

    /// Output visitor registrations, in declaration order.
    pub visitors: Vec<VisitorConfig>,

    /// Named pattern lists referenced by visitor registrations.
    pub parameters: BTreeMap<String, PatternGroups>,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
            admin: AdminConfig::default(),
            visitors: default_visitors(),
            parameters: default_parameters(),
        }
    }
}

impl RestConfig {
    /// Visitor registrations in declaration order.
    pub fn registrations(&self) -> Vec<VisitorRegistration> {
        self.visitors.iter().map(VisitorConfig::to_registration).collect()
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// One `[[visitors]]` table.
///
/// Unknown keys are ignored, so a misspelled `priority` key leaves the
/// registration at the default priority.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VisitorConfig {
    /// Visitor name in the catalog (`json`, `xml`).
    pub handler: String,

    /// Pattern groups, or the name of a `[parameters]` entry.
    #[serde(default)]
    pub patterns: Option<PatternSource>,

    /// Priority (higher = checked first). Kept raw; interpretation is lenient.
    #[serde(default)]
    pub priority: Option<toml::Value>,
}

impl VisitorConfig {
    pub fn to_registration(&self) -> VisitorRegistration {
        VisitorRegistration {
            handler: HandlerRef::new(self.handler.clone()),
            patterns: self.patterns.clone(),
            priority: DeclaredPriority::from_toml(self.priority.as_ref()),
        }
    }
}

pub const JSON_PATTERNS_PARAMETER: &str = "rest.output.visitor.json.regexps";
pub const XML_PATTERNS_PARAMETER: &str = "rest.output.visitor.xml.regexps";

fn default_visitors() -> Vec<VisitorConfig> {
    vec![
        VisitorConfig {
            handler: "json".to_string(),
            patterns: Some(PatternSource::Parameter(JSON_PATTERNS_PARAMETER.to_string())),
            priority: None,
        },
        VisitorConfig {
            handler: "xml".to_string(),
            patterns: Some(PatternSource::Parameter(XML_PATTERNS_PARAMETER.to_string())),
            priority: None,
        },
        // Anything else, including */*, falls back to JSON.
        VisitorConfig {
            handler: "json".to_string(),
            patterns: Some(PatternSource::Literal(vec![vec![r"(^.*/.*$)".to_string()]])),
            priority: Some(toml::Value::Integer(-10)),
        },
    ]
}

fn default_parameters() -> BTreeMap<String, PatternGroups> {
    let mut parameters = BTreeMap::new();
    parameters.insert(
        JSON_PATTERNS_PARAMETER.to_string(),
        vec![
            vec![r"(^application/vnd\.ez\.api\.[A-Za-z]+\+json$)".to_string()],
            vec![r"(^application/json$)".to_string()],
        ],
    );
    parameters.insert(
        XML_PATTERNS_PARAMETER.to_string(),
        vec![
            vec![r"(^application/vnd\.ez\.api\.[A-Za-z]+\+xml$)".to_string()],
            vec![r"(^application/xml$)".to_string()],
            vec![r"(^text/xml$)".to_string()],
        ],
    );
    parameters
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Serve `/admin/*` routes.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
        }
    }
}
