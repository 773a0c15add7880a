//! The state handed to each resource entry point.

use serde_json::{Map, Value};

use crate::codec::fields::is_populated;

/// Attribute tree of one resource instance plus its id.
///
/// The id is `None` until the dashboard exists remotely, and is cleared again
/// when a read finds it gone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    id: Option<String>,
    attributes: Map<String, Value>,
}

impl ResourceData {
    /// State built from a configuration tree, before creation.
    #[must_use]
    pub const fn from_config(attributes: Map<String, Value>) -> Self {
        Self {
            id: None,
            attributes,
        }
    }

    /// State that only knows its id, as during import.
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            attributes: Map::new(),
        }
    }

    /// The remote id.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Sets or clears the remote id.
    pub fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    /// Raw value of an attribute.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Value of an attribute that was set to something non-null and non-empty.
    #[must_use]
    pub fn get_ok(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key).filter(|value| is_populated(value))
    }

    /// Sets one attribute.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Replaces every attribute at once.
    pub fn replace_attributes(&mut self, attributes: Map<String, Value>) {
        self.attributes = attributes;
    }

    /// The attribute tree.
    #[must_use]
    pub const fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data() -> ResourceData {
        let Value::Object(map) = json!({
            "title": "Ops",
            "description": "",
            "notify_list": [],
            "template_variable": null,
            "is_read_only": false,
        }) else {
            unreachable!()
        };
        ResourceData::from_config(map)
    }

    #[test]
    fn test_get_ok_skips_empty_values() {
        let data = data();
        assert_eq!(data.get_ok("title"), Some(&json!("Ops")));
        assert!(data.get("description").is_some());
        assert!(data.get_ok("description").is_none());
        assert!(data.get_ok("notify_list").is_none());
        assert!(data.get_ok("template_variable").is_none());
        assert!(data.get_ok("missing").is_none());
        assert_eq!(data.get_ok("is_read_only"), Some(&json!(false)));
    }

    #[test]
    fn test_set_and_id() {
        let mut data = data();
        assert!(data.id().is_none());
        data.set_id(Some("abc-def-001".to_string()));
        data.set("title", "Renamed");
        assert_eq!(data.id(), Some("abc-def-001"));
        assert_eq!(data.get("title"), Some(&json!("Renamed")));

        data.set_id(None);
        assert!(data.id().is_none());
    }

    #[test]
    fn test_from_id_has_no_attributes() {
        let data = ResourceData::from_id("qc9-tuk-9kv");
        assert_eq!(data.id(), Some("qc9-tuk-9kv"));
        assert!(data.attributes().is_empty());
    }
}
