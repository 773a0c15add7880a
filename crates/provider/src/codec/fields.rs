//! Typed access to configuration-tree nodes.
//!
//! The tree follows the plugin SDK's shapes: nested blocks are lists of
//! objects, and map attributes are objects whose scalar values may arrive
//! string-encoded (`"14"`, `"true"`). Readers accept both forms.

use std::str::FromStr;

use dashform_model::{Error, FieldPath, Result};
use serde_json::{Map, Value};

/// A configuration tree node.
pub type Tree = Map<String, Value>;

/// Whether a value counts as set: non-null and not an empty string, list or map.
#[must_use]
pub fn is_populated(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Reads an integer from a number or a string-encoded number.
pub(crate) fn parse_i64(value: &Value, path: &FieldPath) -> Result<Option<i64>> {
    scalar(value, path, "integer", Value::as_i64)
}

/// Reads a finite float from a number or a string-encoded number.
pub(crate) fn parse_f64(value: &Value, path: &FieldPath) -> Result<Option<f64>> {
    match scalar(value, path, "number", Value::as_f64)? {
        Some(number) if !number.is_finite() => Err(Error::invalid(path.clone(), "finite number", value)),
        number => Ok(number),
    }
}

/// Reads a boolean from a bool or `"true"` / `"false"`.
pub(crate) fn parse_bool(value: &Value, path: &FieldPath) -> Result<Option<bool>> {
    scalar(value, path, "boolean", Value::as_bool)
}

fn scalar<T: FromStr>(
    value: &Value,
    path: &FieldPath,
    expected: &'static str,
    native: fn(&Value) -> Option<T>,
) -> Result<Option<T>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::invalid(path.clone(), expected, value)),
        other => native(other)
            .map(Some)
            .ok_or_else(|| Error::invalid(path.clone(), expected, other)),
    }
}

/// A block of the tree together with its location.
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    map: &'a Tree,
    path: FieldPath,
}

impl<'a> Fields<'a> {
    /// Wraps a node found at `path`.
    #[must_use]
    pub const fn new(map: &'a Tree, path: FieldPath) -> Self {
        Self { map, path }
    }

    /// Wraps the top of the tree.
    #[must_use]
    pub fn root(map: &'a Tree) -> Self {
        Self::new(map, FieldPath::root())
    }

    /// Location of this block.
    #[must_use]
    pub const fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Location of one of this block's attributes.
    #[must_use]
    pub fn at(&self, key: &str) -> FieldPath {
        self.path.key(key)
    }

    fn value(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|value| !value.is_null())
    }

    /// Whether the attribute is set to something non-empty.
    #[must_use]
    pub fn populated(&self, key: &str) -> bool {
        self.map.get(key).is_some_and(is_populated)
    }

    /// Whether the attribute is a non-empty list whose first element is a block.
    #[must_use]
    pub fn has_block(&self, key: &str) -> bool {
        matches!(self.value(key), Some(Value::Array(items)) if items.first().is_some_and(Value::is_object))
    }

    /// A string that must be present and non-empty.
    pub fn required_str(&self, key: &str) -> Result<String> {
        self.opt_str(key)?
            .ok_or_else(|| Error::missing(self.at(key)))
    }

    /// A string copied only when present and non-empty.
    pub fn opt_str(&self, key: &str) -> Result<Option<String>> {
        match self.value(key) {
            None => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(Error::invalid(self.at(key), "string", other)),
        }
    }

    /// An optional integer.
    pub fn opt_i64(&self, key: &str) -> Result<Option<i64>> {
        match self.value(key) {
            Some(value) => parse_i64(value, &self.at(key)),
            None => Ok(None),
        }
    }

    /// An optional finite float.
    pub fn opt_f64(&self, key: &str) -> Result<Option<f64>> {
        match self.value(key) {
            Some(value) => parse_f64(value, &self.at(key)),
            None => Ok(None),
        }
    }

    /// A finite float that must be present.
    pub fn required_f64(&self, key: &str) -> Result<f64> {
        self.opt_f64(key)?
            .ok_or_else(|| Error::missing(self.at(key)))
    }

    /// An optional boolean.
    pub fn opt_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.value(key) {
            Some(value) => parse_bool(value, &self.at(key)),
            None => Ok(None),
        }
    }

    /// A list of strings, empty when absent.
    pub fn string_list(&self, key: &str) -> Result<Vec<String>> {
        let Some(value) = self.value(key) else {
            return Ok(Vec::new());
        };
        let path = self.at(key);
        let items = value
            .as_array()
            .ok_or_else(|| Error::invalid(path.clone(), "list", value))?;

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| Error::invalid(path.index(i), "string", item))
            })
            .collect()
    }

    /// A list of nested blocks, empty when absent.
    pub fn blocks(&self, key: &str) -> Result<Vec<Self>> {
        let Some(value) = self.value(key) else {
            return Ok(Vec::new());
        };
        let path = self.at(key);
        let items = value
            .as_array()
            .ok_or_else(|| Error::invalid(path.clone(), "list", value))?;

        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(Fields::new(map, path.index(i))),
                other => Err(Error::invalid(path.index(i), "block", other)),
            })
            .collect()
    }

    /// A block declared as a list of at most one element.
    pub fn single_block(&self, key: &str) -> Result<Option<Self>> {
        let mut blocks = self.blocks(key)?;
        if blocks.len() > 1 {
            return Err(Error::TooManyItems {
                path: self.at(key),
                max: 1,
                found: blocks.len(),
            });
        }
        Ok(blocks.pop())
    }

    /// A single block that must be present.
    pub fn required_block(&self, key: &str) -> Result<Self> {
        self.single_block(key)?
            .ok_or_else(|| Error::missing(self.at(key)))
    }

    /// A map attribute, `None` when absent or empty.
    pub fn map(&self, key: &str) -> Result<Option<Self>> {
        match self.value(key) {
            None => Ok(None),
            Some(Value::Object(map)) if map.is_empty() => Ok(None),
            Some(Value::Object(map)) => Ok(Some(Fields::new(map, self.at(key)))),
            Some(other) => Err(Error::invalid(self.at(key), "map", other)),
        }
    }

    /// A map attribute that must be present.
    pub fn required_map(&self, key: &str) -> Result<Self> {
        self.map(key)?
            .ok_or_else(|| Error::missing(self.at(key)))
    }
}

/// Builds a tree node, skipping unset optional attributes.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    map: Tree,
}

impl TreeBuilder {
    /// Starts an empty node.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute unconditionally.
    #[must_use]
    pub fn value(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.map.insert(key.to_string(), value.into());
        self
    }

    /// Sets a string attribute.
    #[must_use]
    pub fn str(self, key: &str, value: impl Into<String>) -> Self {
        self.value(key, Value::String(value.into()))
    }

    /// Sets a string attribute when `Some`.
    #[must_use]
    pub fn opt_str(self, key: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.str(key, value),
            None => self,
        }
    }

    /// Sets a scalar attribute when `Some`.
    #[must_use]
    pub fn opt_value(self, key: &str, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.value(key, value),
            None => self,
        }
    }

    /// Sets a string list when it is not empty.
    #[must_use]
    pub fn string_list(self, key: &str, values: &[String]) -> Self {
        if values.is_empty() {
            return self;
        }
        self.value(key, values.to_vec())
    }

    /// Sets a list of blocks when it is not empty.
    #[must_use]
    pub fn blocks(self, key: &str, blocks: Vec<Tree>) -> Self {
        if blocks.is_empty() {
            return self;
        }
        self.value(key, blocks.into_iter().map(Value::Object).collect::<Vec<_>>())
    }

    /// Sets a single block, encoded as a one-element list.
    #[must_use]
    pub fn single_block(self, key: &str, block: Tree) -> Self {
        self.value(key, vec![Value::Object(block)])
    }

    /// Sets a map attribute when it is not empty.
    #[must_use]
    pub fn map(self, key: &str, map: Tree) -> Self {
        if map.is_empty() {
            return self;
        }
        self.value(key, Value::Object(map))
    }

    /// Finishes the node.
    #[must_use]
    pub fn build(self) -> Tree {
        self.map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: Value) -> Tree {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_string_encoded_scalars() {
        let map = tree(json!({
            "precision": "3",
            "count": 7,
            "ratio": " 0.25 ",
            "flag": "true",
            "native_flag": false,
            "blank": "",
        }));
        let fields = Fields::root(&map);

        assert_eq!(fields.opt_i64("precision").unwrap(), Some(3));
        assert_eq!(fields.opt_i64("count").unwrap(), Some(7));
        assert_eq!(fields.opt_f64("ratio").unwrap(), Some(0.25));
        assert_eq!(fields.opt_bool("flag").unwrap(), Some(true));
        assert_eq!(fields.opt_bool("native_flag").unwrap(), Some(false));
        assert_eq!(fields.opt_i64("blank").unwrap(), None);
        assert_eq!(fields.opt_i64("absent").unwrap(), None);
    }

    #[test]
    fn test_invalid_scalar_reports_path() {
        let map = tree(json!({"size": "big", "nan": "NaN"}));
        let fields = Fields::new(&map, FieldPath::from("widget.0"));

        match fields.opt_i64("size") {
            Err(Error::InvalidFieldValue { path, expected, .. }) => {
                assert_eq!(path.to_string(), "widget.0.size");
                assert_eq!(expected, "integer");
            }
            other => panic!("expected InvalidFieldValue, got {other:?}"),
        }
        assert!(fields.opt_f64("nan").is_err());
    }

    #[test]
    fn test_empty_string_counts_as_absent() {
        let map = tree(json!({"title": "", "content": ""}));
        let fields = Fields::root(&map);

        assert_eq!(fields.opt_str("title").unwrap(), None);
        assert!(matches!(
            fields.required_str("content"),
            Err(Error::MissingRequiredField { .. })
        ));
    }

    #[test]
    fn test_blocks_carry_indexed_paths() {
        let map = tree(json!({"widget": [{"a": "1"}, {"b": "2"}]}));
        let fields = Fields::root(&map);
        let blocks = fields.blocks("widget").unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].path().to_string(), "widget.1");
        assert!(fields.has_block("widget"));
        assert!(matches!(
            fields.single_block("widget"),
            Err(Error::TooManyItems { max: 1, found: 2, .. })
        ));
    }

    #[test]
    fn test_builder_skips_unset_values() {
        let built = TreeBuilder::new()
            .str("content", "hello")
            .opt_str("font_size", None::<String>)
            .opt_value("show_tick", Some(true))
            .string_list("tags", &[])
            .blocks("marker", Vec::new())
            .map("time", Tree::new())
            .build();

        assert_eq!(
            Value::Object(built),
            json!({"content": "hello", "show_tick": true})
        );
    }
}
