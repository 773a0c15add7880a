//! Schema descriptors and the validator that checks a tree against them.
//!
//! Descriptors are plain values built by the functions in [`catalog`]; nothing
//! here holds global state.

pub mod catalog;

pub use catalog::{
    dashboard_schema, definition_schema, leaf_widget_schema, widget_json_schema, widget_schema,
};

use dashform_model::{Error, FieldPath, Result};
use serde_json::{Map, Value};

use crate::codec::fields::{is_populated, parse_bool, parse_f64, parse_i64};

/// Whether an attribute must, may or cannot be set by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Must be set
    Required,
    /// May be set
    Optional,
    /// Set by the provider from the API response
    Computed,
}

/// Element type of a list attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Elem {
    /// Plain strings
    String,
    /// Nested blocks
    Block(Block),
}

/// Type of an attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeType {
    /// String
    String,
    /// Integer, possibly string-encoded
    Int,
    /// Float, possibly string-encoded
    Float,
    /// Boolean, possibly string-encoded
    Bool,
    /// Ordered list
    List(Elem),
    /// Object whose values are string-encoded scalars
    Map(Block),
}

impl AttributeType {
    /// A list of nested blocks.
    #[must_use]
    pub const fn blocks(block: Block) -> Self {
        Self::List(Elem::Block(block))
    }

    /// A list of strings.
    #[must_use]
    pub const fn strings() -> Self {
        Self::List(Elem::String)
    }

    fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "integer",
            Self::Float => "number",
            Self::Bool => "boolean",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

/// One attribute of a block.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Value type
    pub ty: AttributeType,
    /// Who sets the value
    pub constraint: Constraint,
    /// Human-readable description
    pub description: &'static str,
    /// Maximum list length
    pub max_items: Option<usize>,
    /// Value filled in when the attribute is absent
    pub default: Option<Value>,
    /// Accepted values of a string attribute
    pub allowed_values: Option<Vec<&'static str>>,
    /// Attributes that may not be set together with this one
    pub conflicts_with: Vec<&'static str>,
}

impl Attribute {
    fn with_constraint(ty: AttributeType, constraint: Constraint) -> Self {
        Self {
            ty,
            constraint,
            description: "",
            max_items: None,
            default: None,
            allowed_values: None,
            conflicts_with: Vec::new(),
        }
    }

    /// A required attribute.
    #[must_use]
    pub fn required(ty: AttributeType) -> Self {
        Self::with_constraint(ty, Constraint::Required)
    }

    /// An optional attribute.
    #[must_use]
    pub fn optional(ty: AttributeType) -> Self {
        Self::with_constraint(ty, Constraint::Optional)
    }

    /// A computed attribute.
    #[must_use]
    pub fn computed(ty: AttributeType) -> Self {
        Self::with_constraint(ty, Constraint::Computed)
    }

    /// Sets the description.
    #[must_use]
    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Limits a list to `max` elements.
    #[must_use]
    pub const fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Restricts a string to the given values.
    #[must_use]
    pub fn one_of(mut self, values: &[&'static str]) -> Self {
        self.allowed_values = Some(values.to_vec());
        self
    }

    /// Declares attributes that may not be set together with this one.
    #[must_use]
    pub fn conflicts_with(mut self, names: &[&'static str]) -> Self {
        self.conflicts_with = names.to_vec();
        self
    }
}

/// A set of named attributes, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    attributes: Vec<(&'static str, Attribute)>,
}

impl Block {
    /// An empty block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an attribute.
    #[must_use]
    pub fn attr(mut self, name: &'static str, attribute: Attribute) -> Self {
        self.attributes.push((name, attribute));
        self
    }

    /// Looks up an attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, attribute)| attribute)
    }

    /// Checks a tree against this block and reports the first problem.
    pub fn validate(&self, tree: &Map<String, Value>) -> Result<()> {
        self.validate_at(tree, &FieldPath::root())
    }

    fn validate_at(&self, tree: &Map<String, Value>, path: &FieldPath) -> Result<()> {
        if let Some(unknown) = tree.keys().find(|key| self.get(key).is_none()) {
            return Err(Error::UnknownAttribute {
                path: path.key(unknown.as_str()),
            });
        }

        for (name, attribute) in &self.attributes {
            let at = path.key(*name);
            let value = tree.get(*name).filter(|value| is_populated(value));

            let Some(value) = value else {
                if attribute.constraint == Constraint::Required {
                    return Err(Error::missing(at));
                }
                continue;
            };

            if let Some(other) = attribute
                .conflicts_with
                .iter()
                .find(|other| tree.get(**other).is_some_and(is_populated))
            {
                return Err(Error::ConflictingAttributes {
                    path: at,
                    other: (*other).to_string(),
                });
            }

            attribute.validate_value(value, &at)?;
        }
        Ok(())
    }

    /// Fills in declared defaults for absent attributes, recursing into nested blocks.
    pub fn apply_defaults(&self, tree: &mut Map<String, Value>) {
        for (name, attribute) in &self.attributes {
            if tree.get(*name).is_none_or(Value::is_null) {
                if let Some(default) = &attribute.default {
                    tree.insert((*name).to_string(), default.clone());
                }
                continue;
            }

            match (tree.get_mut(*name), &attribute.ty) {
                (Some(Value::Array(items)), AttributeType::List(Elem::Block(block))) => {
                    for item in items.iter_mut() {
                        if let Value::Object(map) = item {
                            block.apply_defaults(map);
                        }
                    }
                }
                (Some(Value::Object(map)), AttributeType::Map(block)) => block.apply_defaults(map),
                _ => {}
            }
        }
    }
}

impl Attribute {
    fn validate_value(&self, value: &Value, path: &FieldPath) -> Result<()> {
        match &self.ty {
            AttributeType::String => {
                let text = value
                    .as_str()
                    .ok_or_else(|| Error::invalid(path.clone(), self.ty.name(), value))?;
                if let Some(allowed) = &self.allowed_values
                    && !allowed.iter().any(|candidate| *candidate == text)
                {
                    return Err(Error::InvalidEnumValue {
                        path: path.clone(),
                        value: text.to_string(),
                        allowed: allowed.clone(),
                    });
                }
                Ok(())
            }
            AttributeType::Int => parse_i64(value, path).map(drop),
            AttributeType::Float => parse_f64(value, path).map(drop),
            AttributeType::Bool => parse_bool(value, path).map(drop),
            AttributeType::List(elem) => {
                let items = value
                    .as_array()
                    .ok_or_else(|| Error::invalid(path.clone(), self.ty.name(), value))?;
                if let Some(max) = self.max_items
                    && items.len() > max
                {
                    return Err(Error::TooManyItems {
                        path: path.clone(),
                        max,
                        found: items.len(),
                    });
                }
                for (i, item) in items.iter().enumerate() {
                    let at = path.index(i);
                    match (elem, item) {
                        (Elem::String, Value::String(_)) => {}
                        (Elem::String, other) => return Err(Error::invalid(at, "string", other)),
                        (Elem::Block(block), Value::Object(map)) => block.validate_at(map, &at)?,
                        (Elem::Block(_), other) => return Err(Error::invalid(at, "block", other)),
                    }
                }
                Ok(())
            }
            AttributeType::Map(block) => match value {
                Value::Object(map) => block.validate_at(map, path),
                other => Err(Error::invalid(path.clone(), self.ty.name(), other)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn sample() -> Block {
        Block::new()
            .attr("name", Attribute::required(AttributeType::String))
            .attr(
                "mode",
                Attribute::optional(AttributeType::String).one_of(&["a", "b"]),
            )
            .attr("count", Attribute::optional(AttributeType::Int).default_value(3))
            .attr(
                "items",
                Attribute::optional(AttributeType::blocks(
                    Block::new().attr("flag", Attribute::optional(AttributeType::Bool).default_value(false)),
                ))
                .max_items(2)
                .conflicts_with(&["tags"]),
            )
            .attr("tags", Attribute::optional(AttributeType::strings()))
    }

    #[test]
    fn test_valid_tree() {
        let value = tree(json!({"name": "x", "mode": "a", "count": "4", "items": [{"flag": "true"}]}));
        sample().validate(&value).unwrap();
    }

    #[test]
    fn test_unknown_attribute() {
        let err = sample()
            .validate(&tree(json!({"name": "x", "items": [{"flag": true, "color": "red"}]})))
            .unwrap_err();
        match err {
            Error::UnknownAttribute { path } => assert_eq!(path.to_string(), "items.0.color"),
            other => panic!("expected UnknownAttribute, got {other:?}"),
        }
    }

    #[test]
    fn test_required_and_enum() {
        let err = sample().validate(&tree(json!({"name": ""}))).unwrap_err();
        assert!(matches!(err, Error::MissingRequiredField { .. }));

        let err = sample()
            .validate(&tree(json!({"name": "x", "mode": "c"})))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidEnumValue { .. }));
    }

    #[test]
    fn test_max_items_and_conflicts() {
        let err = sample()
            .validate(&tree(json!({"name": "x", "items": [{}, {}, {}]})))
            .unwrap_err();
        assert!(matches!(err, Error::TooManyItems { max: 2, found: 3, .. }));

        let err = sample()
            .validate(&tree(json!({"name": "x", "items": [{}], "tags": ["t"]})))
            .unwrap_err();
        match err {
            Error::ConflictingAttributes { path, other } => {
                assert_eq!(path.to_string(), "items");
                assert_eq!(other, "tags");
            }
            other => panic!("expected ConflictingAttributes, got {other:?}"),
        }
    }

    #[test]
    fn test_type_mismatch() {
        let err = sample()
            .validate(&tree(json!({"name": "x", "count": "many"})))
            .unwrap_err();
        assert_eq!(err.path().unwrap().to_string(), "count");
    }

    #[test]
    fn test_apply_defaults_recurses() {
        let mut value = tree(json!({"name": "x", "items": [{}]}));
        sample().apply_defaults(&mut value);
        assert_eq!(value["count"], json!(3));
        assert_eq!(value["items"][0]["flag"], json!(false));
        assert!(!value.contains_key("mode"));
    }
}
