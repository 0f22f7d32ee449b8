//! REST resource values served by this layer.

use serde_json::json;

use crate::visitor::RestValue;

/// Collections linked from the API root, relative to the API prefix.
const ROOT_LINKS: &[(&str, &str)] = &[
    ("content", "content/objects"),
    ("contentTypes", "content/types"),
    ("users", "user/users"),
    ("roles", "user/roles"),
    ("rootLocation", "content/locations/1"),
    ("trash", "content/trash"),
    ("sections", "content/sections"),
    ("views", "views"),
];

/// The API root: links to the main resource collections.
///
/// `prefix` is the matched REST prefix, e.g. `/api/ezp/v2/`.
pub fn root(prefix: &str) -> RestValue {
    ROOT_LINKS.iter().fold(RestValue::new("Root"), |value, (name, path)| {
        value.with(*name, json!({ "_href": format!("{prefix}{path}") }))
    })
}

/// Error body rendered through the negotiated visitor.
pub fn error_message(code: u16, message: &str, description: impl Into<String>) -> RestValue {
    RestValue::new("ErrorMessage")
        .with("errorCode", code)
        .with("errorMessage", message)
        .with("errorDescription", description.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_links_use_prefix() {
        let value = root("/api/ezp/v2/");
        assert_eq!(value.name, "Root");
        assert_eq!(value.body["content"]["_href"], "/api/ezp/v2/content/objects");
        let keys: Vec<_> = value.body.keys().map(String::as_str).collect();
        let declared: Vec<_> = ROOT_LINKS.iter().map(|(name, _)| *name).collect();
        assert_eq!(keys, declared);
    }

    #[test]
    fn test_error_message() {
        let value = error_message(404, "Not Found", "no such resource");
        assert_eq!(value.body["errorCode"], 404);
        assert_eq!(value.body["errorDescription"], "no such resource");
    }
}
