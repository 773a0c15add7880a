//! Wire format of the boards API.
//!
//! Widget definitions travel as `{"type": <tag>, ...}` objects. Decoding reads
//! the tag first and dispatches to the matching variant, so an unknown tag
//! surfaces as [`Error::UnsupportedWidgetType`] instead of a generic serde
//! failure.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::model::{
    Dashboard, Definition, GroupDefinition, Layout, LayoutType, LeafDefinition, LeafWidget,
    TemplateVariable, Widget, WidgetKind,
};
use crate::path::FieldPath;

/// Request and response body of the dashboard endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardPayload {
    /// Dashboard identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Title
    pub title: String,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Layout mode
    pub layout_type: LayoutType,
    /// Read-only flag
    #[serde(default)]
    pub is_read_only: bool,
    /// Handles to notify; the API answers `null` when empty
    #[serde(default)]
    pub notify_list: Option<Vec<String>>,
    /// Template variables; the API answers `null` when empty
    #[serde(default)]
    pub template_variables: Option<Vec<TemplateVariable>>,
    /// Widgets
    #[serde(default)]
    pub widgets: Vec<WidgetPayload>,
    /// Link to the dashboard, set by the API
    #[serde(default, skip_serializing)]
    pub url: Option<String>,
}

/// One widget on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetPayload {
    /// Widget identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Position on a free dashboard
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    /// Tagged definition object
    pub definition: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct GroupPayload {
    layout_type: LayoutType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default)]
    widgets: Vec<WidgetPayload>,
}

impl TryFrom<BoardPayload> for Dashboard {
    type Error = Error;

    fn try_from(payload: BoardPayload) -> Result<Self> {
        let widgets_path = FieldPath::root().key("widgets");
        let widgets = payload
            .widgets
            .iter()
            .enumerate()
            .map(|(i, widget)| decode_widget(widget, &widgets_path.index(i), decode_definition))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id: payload.id,
            title: payload.title,
            layout_type: payload.layout_type,
            description: payload.description,
            is_read_only: payload.is_read_only,
            notify_list: payload.notify_list.unwrap_or_default(),
            template_variables: payload.template_variables.unwrap_or_default(),
            widgets,
            url: payload.url,
        })
    }
}

impl TryFrom<&Dashboard> for BoardPayload {
    type Error = Error;

    fn try_from(dashboard: &Dashboard) -> Result<Self> {
        let widgets = dashboard
            .widgets
            .iter()
            .map(|widget| encode_widget(widget, encode_definition))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id: dashboard.id.clone(),
            title: dashboard.title.clone(),
            description: dashboard.description.clone(),
            layout_type: dashboard.layout_type,
            is_read_only: dashboard.is_read_only,
            notify_list: Some(dashboard.notify_list.clone()),
            template_variables: Some(dashboard.template_variables.clone()),
            widgets,
            url: None,
        })
    }
}

impl BoardPayload {
    /// Parses a response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not a valid board document.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::payload(FieldPath::root(), e.to_string()))
    }
}

fn decode_widget<D>(
    widget: &WidgetPayload,
    path: &FieldPath,
    decode: fn(&Value, &FieldPath) -> Result<D>,
) -> Result<Widget<D>> {
    Ok(Widget {
        id: widget.id,
        layout: widget.layout,
        definition: decode(&widget.definition, &path.key("definition"))?,
    })
}

fn encode_widget<D>(
    widget: &Widget<D>,
    encode: fn(&D) -> Result<Value>,
) -> Result<WidgetPayload> {
    Ok(WidgetPayload {
        id: widget.id,
        layout: widget.layout,
        definition: encode(&widget.definition)?,
    })
}

/// Reads the `type` tag of a definition object and resolves its kind.
///
/// # Errors
///
/// Fails with [`Error::MissingRequiredField`] when the tag is absent and with
/// [`Error::UnsupportedWidgetType`] when it is not in the catalog.
pub fn definition_kind(value: &Value, path: &FieldPath) -> Result<WidgetKind> {
    let tag = value
        .as_object()
        .ok_or_else(|| Error::invalid(path.clone(), "a definition object", value))?
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::missing(path.key("type")))?;

    WidgetKind::from_tag(tag).ok_or_else(|| Error::UnsupportedWidgetType {
        widget_type: tag.to_string(),
    })
}

/// Decodes any tagged definition, including groups.
///
/// # Errors
///
/// Returns an error if the tag is missing or unknown, or if the body does not
/// match the tagged kind.
pub fn decode_definition(value: &Value, path: &FieldPath) -> Result<Definition> {
    if definition_kind(value, path)? != WidgetKind::Group {
        return decode_leaf_definition(value, path).map(Definition::Leaf);
    }

    let group: GroupPayload = parse(value, path)?;
    let widgets_path = path.key("widgets");
    let widgets = group
        .widgets
        .iter()
        .enumerate()
        .map(|(i, widget)| decode_widget(widget, &widgets_path.index(i), decode_leaf_definition))
        .collect::<Result<Vec<LeafWidget>>>()?;

    Ok(Definition::Group(GroupDefinition {
        layout_type: group.layout_type,
        title: group.title,
        widgets,
    }))
}

/// Decodes a tagged definition that must not be a group.
///
/// # Errors
///
/// Fails with [`Error::NestedGroup`] for a `group` tag, in addition to the
/// errors of [`decode_definition`].
pub fn decode_leaf_definition(value: &Value, path: &FieldPath) -> Result<LeafDefinition> {
    let definition = match definition_kind(value, path)? {
        WidgetKind::Group => return Err(Error::NestedGroup { path: path.clone() }),
        WidgetKind::AlertGraph => LeafDefinition::AlertGraph(parse(value, path)?),
        WidgetKind::AlertValue => LeafDefinition::AlertValue(parse(value, path)?),
        WidgetKind::CheckStatus => LeafDefinition::CheckStatus(parse(value, path)?),
        WidgetKind::EventStream => LeafDefinition::EventStream(parse(value, path)?),
        WidgetKind::EventTimeline => LeafDefinition::EventTimeline(parse(value, path)?),
        WidgetKind::FreeText => LeafDefinition::FreeText(parse(value, path)?),
        WidgetKind::Iframe => LeafDefinition::Iframe(parse(value, path)?),
        WidgetKind::Image => LeafDefinition::Image(parse(value, path)?),
        WidgetKind::LogStream => LeafDefinition::LogStream(parse(value, path)?),
        WidgetKind::ManageStatus => LeafDefinition::ManageStatus(parse(value, path)?),
        WidgetKind::Note => LeafDefinition::Note(parse(value, path)?),
        WidgetKind::QueryValue => LeafDefinition::QueryValue(parse(value, path)?),
        WidgetKind::Timeseries => LeafDefinition::Timeseries(parse(value, path)?),
        WidgetKind::Toplist => LeafDefinition::Toplist(parse(value, path)?),
    };
    Ok(definition)
}

/// Encodes any definition as a tagged object.
///
/// # Errors
///
/// Returns an error if a definition cannot be serialized.
pub fn encode_definition(definition: &Definition) -> Result<Value> {
    match definition {
        Definition::Leaf(leaf) => encode_leaf_definition(leaf),
        Definition::Group(group) => {
            let payload = GroupPayload {
                layout_type: group.layout_type,
                title: group.title.clone(),
                widgets: group
                    .widgets
                    .iter()
                    .map(|widget| encode_widget(widget, encode_leaf_definition))
                    .collect::<Result<Vec<_>>>()?,
            };
            tagged(WidgetKind::Group, &payload)
        }
    }
}

/// Encodes a leaf definition as a tagged object.
///
/// # Errors
///
/// Returns an error if the definition cannot be serialized.
pub fn encode_leaf_definition(definition: &LeafDefinition) -> Result<Value> {
    let kind = definition.kind();
    match definition {
        LeafDefinition::AlertGraph(d) => tagged(kind, d),
        LeafDefinition::AlertValue(d) => tagged(kind, d),
        LeafDefinition::CheckStatus(d) => tagged(kind, d),
        LeafDefinition::EventStream(d) => tagged(kind, d),
        LeafDefinition::EventTimeline(d) => tagged(kind, d),
        LeafDefinition::FreeText(d) => tagged(kind, d),
        LeafDefinition::Iframe(d) => tagged(kind, d),
        LeafDefinition::Image(d) => tagged(kind, d),
        LeafDefinition::LogStream(d) => tagged(kind, d),
        LeafDefinition::ManageStatus(d) => tagged(kind, d),
        LeafDefinition::Note(d) => tagged(kind, d),
        LeafDefinition::QueryValue(d) => tagged(kind, d),
        LeafDefinition::Timeseries(d) => tagged(kind, d),
        LeafDefinition::Toplist(d) => tagged(kind, d),
    }
}

fn tagged<T: Serialize>(kind: WidgetKind, definition: &T) -> Result<Value> {
    let mut object = Map::new();
    object.insert("type".to_string(), Value::String(kind.tag().to_string()));
    match serde_json::to_value(definition)? {
        Value::Object(fields) => object.extend(fields),
        other => {
            return Err(Error::payload(
                FieldPath::root().key(kind.tag()),
                format!("definition serialized to a non-object: {other}"),
            ));
        }
    }
    Ok(Value::Object(object))
}

fn parse<T: DeserializeOwned>(value: &Value, path: &FieldPath) -> Result<T> {
    T::deserialize(value).map_err(|e| Error::payload(path.clone(), e.to_string()))
}
