//! Output visitors: the handlers a [`HandlerRef`] points at.
//!
//! A visitor turns a [`RestValue`] into a response body in one format.
//! Values carry a resource name (`Root`, `ErrorMessage`, ...) which becomes
//! the top-level element and part of the vendor media type
//! `application/vnd.ez.api.<Name>+<format>`.
//!
//! Body keys starting with `_` are attributes: JSON keeps them as-is, XML
//! writes them as element attributes.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::visitor::registration::HandlerRef;

/// Vendor prefix of REST media types.
pub const MEDIA_TYPE_PREFIX: &str = "application/vnd.ez.api.";

/// A REST resource ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct RestValue {
    pub name: String,
    pub body: Map<String, Value>,
}

impl RestValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: Map::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }
}

/// Errors raised while rendering a value.
#[derive(Debug, Error)]
pub enum VisitError {
    #[error("JSON rendering failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML rendering failed: {0}")]
    Xml(#[from] quick_xml::DeError),
}

/// Renders REST values in one format.
pub trait OutputVisitor: Send + Sync + std::fmt::Debug {
    /// Format suffix used in media types (`json`, `xml`).
    fn format(&self) -> &'static str;

    fn render(&self, value: &RestValue) -> Result<Vec<u8>, VisitError>;

    fn media_type(&self, value: &RestValue) -> String {
        format!("{}{}+{}", MEDIA_TYPE_PREFIX, value.name, self.format())
    }
}

#[derive(Debug, Default)]
pub struct JsonVisitor;

impl OutputVisitor for JsonVisitor {
    fn format(&self) -> &'static str {
        "json"
    }

    fn render(&self, value: &RestValue) -> Result<Vec<u8>, VisitError> {
        let mut body = Map::new();
        body.insert("_media-type".into(), Value::String(self.media_type(value)));
        body.extend(value.body.clone());

        let mut root = Map::new();
        root.insert(value.name.clone(), Value::Object(body));
        Ok(serde_json::to_vec(&Value::Object(root))?)
    }
}

#[derive(Debug, Default)]
pub struct XmlVisitor;

impl XmlVisitor {
    /// Map `_key` to quick-xml's `@key` attribute convention, recursively.
    fn attributes(value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, val)| {
                        let key = match key.strip_prefix('_') {
                            Some(attr) => format!("@{attr}"),
                            None => key.clone(),
                        };
                        (key, Self::attributes(val))
                    })
                    .collect(),
            ),
            Value::Array(items) => Value::Array(items.iter().map(Self::attributes).collect()),
            other => other.clone(),
        }
    }
}

impl OutputVisitor for XmlVisitor {
    fn format(&self) -> &'static str {
        "xml"
    }

    fn render(&self, value: &RestValue) -> Result<Vec<u8>, VisitError> {
        let mut body = Map::new();
        body.insert("@media-type".into(), Value::String(self.media_type(value)));
        if let Value::Object(map) = Self::attributes(&Value::Object(value.body.clone())) {
            body.extend(map);
        }

        let xml = quick_xml::se::to_string_with_root(&value.name, &Value::Object(body))?;
        Ok(format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{xml}").into_bytes())
    }
}

type VisitorFactory = Box<dyn Fn() -> Arc<dyn OutputVisitor> + Send + Sync>;

struct CatalogEntry {
    factory: VisitorFactory,
    instance: OnceLock<Arc<dyn OutputVisitor>>,
}

/// Lazily instantiated visitors, keyed by handler reference.
///
/// A visitor is created the first time a dispatch selects it and shared
/// afterwards.
#[derive(Default)]
pub struct VisitorCatalog {
    entries: HashMap<HandlerRef, CatalogEntry>,
}

impl VisitorCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the built-in `json` and `xml` visitors.
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        catalog.register("json", || Arc::new(JsonVisitor));
        catalog.register("xml", || Arc::new(XmlVisitor));
        catalog
    }

    pub fn register<F>(&mut self, handler: impl Into<HandlerRef>, factory: F)
    where
        F: Fn() -> Arc<dyn OutputVisitor> + Send + Sync + 'static,
    {
        self.entries.insert(
            handler.into(),
            CatalogEntry {
                factory: Box::new(factory),
                instance: OnceLock::new(),
            },
        );
    }

    pub fn contains(&self, handler: &HandlerRef) -> bool {
        self.entries.contains_key(handler)
    }

    pub fn get(&self, handler: &HandlerRef) -> Option<Arc<dyn OutputVisitor>> {
        let entry = self.entries.get(handler)?;
        Some(entry.instance.get_or_init(|| (entry.factory)()).clone())
    }
}

impl std::fmt::Debug for VisitorCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.entries.keys().collect();
        names.sort();
        f.debug_struct("VisitorCatalog").field("visitors", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn root() -> RestValue {
        RestValue::new("Root").with(
            "content",
            serde_json::json!({ "_href": "/api/ezp/v2/content/objects" }),
        )
    }

    #[test]
    fn test_json_render() {
        let bytes = JsonVisitor.render(&root()).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(
            value["Root"]["_media-type"],
            "application/vnd.ez.api.Root+json"
        );
        assert_eq!(value["Root"]["content"]["_href"], "/api/ezp/v2/content/objects");
    }

    #[test]
    fn test_xml_render_uses_attributes() {
        let bytes = XmlVisitor.render(&root()).unwrap();
        let xml = String::from_utf8(bytes).unwrap();

        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains(r#"<Root media-type="application/vnd.ez.api.Root+xml""#));
        assert!(xml.contains(r#"href="/api/ezp/v2/content/objects""#));
    }

    #[test]
    fn test_render_keeps_declared_key_order() {
        let value = RestValue::new("Root")
            .with("users", serde_json::json!({ "_href": "u" }))
            .with("roles", serde_json::json!({ "_href": "r" }))
            .with("content", serde_json::json!({ "_href": "c" }));

        let xml = String::from_utf8(XmlVisitor.render(&value).unwrap()).unwrap();
        let users = xml.find("<users").unwrap();
        let roles = xml.find("<roles").unwrap();
        let content = xml.find("<content").unwrap();
        assert!(users < roles && roles < content);

        let json = String::from_utf8(JsonVisitor.render(&value).unwrap()).unwrap();
        let users = json.find("\"users\"").unwrap();
        let roles = json.find("\"roles\"").unwrap();
        let content = json.find("\"content\"").unwrap();
        assert!(users < roles && roles < content);
    }

    #[test]
    fn test_catalog_instantiates_lazily_once() {
        let created = Arc::new(AtomicUsize::new(0));
        let counter = created.clone();

        let mut catalog = VisitorCatalog::new();
        catalog.register("json", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Arc::new(JsonVisitor)
        });
        assert_eq!(created.load(Ordering::SeqCst), 0);

        let handler = HandlerRef::new("json");
        assert!(catalog.get(&handler).is_some());
        assert!(catalog.get(&handler).is_some());
        assert_eq!(created.load(Ordering::SeqCst), 1);

        assert!(catalog.get(&HandlerRef::new("yaml")).is_none());
    }
}
