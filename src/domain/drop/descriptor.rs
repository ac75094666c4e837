// src/domain/drop/descriptor.rs
//
// Drop Descriptor
//
// The ambiguous record the sandboxed UI context produces for one dragged-in
// file. Several path-like fields may be present at once; none is trusted
// until the host has verified it.

use serde::{Deserialize, Serialize};

/// One user drop action, as reported across the isolation boundary.
///
/// Immutable after construction: fields are private and only the builder
/// methods (which consume `self`) can set them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropDescriptor {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    raw_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    relative_path: Option<String>,
    source_tag: String,
}

impl DropDescriptor {
    /// Create a descriptor carrying only the file name
    pub fn new(name: impl Into<String>, source_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_path: None,
            url: None,
            relative_path: None,
            source_tag: source_tag.into(),
        }
    }

    pub fn with_raw_path(mut self, raw_path: impl Into<String>) -> Self {
        self.raw_path = Some(raw_path.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_relative_path(mut self, relative_path: impl Into<String>) -> Self {
        self.relative_path = Some(relative_path.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn raw_path(&self) -> Option<&str> {
        self.raw_path.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn relative_path(&self) -> Option<&str> {
        self.relative_path.as_deref()
    }

    pub fn source_tag(&self) -> &str {
        &self.source_tag
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_optional_fields() {
        let descriptor = DropDescriptor::new("scene.usd", "webview-drop")
            .with_raw_path("/proj/scene.usd")
            .with_url("file:///proj/scene.usd");

        assert_eq!(descriptor.name(), "scene.usd");
        assert_eq!(descriptor.raw_path(), Some("/proj/scene.usd"));
        assert_eq!(descriptor.url(), Some("file:///proj/scene.usd"));
        assert_eq!(descriptor.relative_path(), None);
        assert_eq!(descriptor.source_tag(), "webview-drop");
    }

    #[test]
    fn test_deserializes_camel_case_wire_form() {
        let json = r#"{"name":"a.usda","rawPath":"/x/a.usda","relativePath":"x/a.usda","sourceTag":"ui"}"#;
        let descriptor: DropDescriptor = serde_json::from_str(json).unwrap();

        assert_eq!(descriptor.raw_path(), Some("/x/a.usda"));
        assert_eq!(descriptor.relative_path(), Some("x/a.usda"));
        assert_eq!(descriptor.url(), None);
    }
}
