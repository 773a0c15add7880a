//! Typed dashboard model.
//!
//! A [`Dashboard`] exclusively owns its widgets, template variables and notify
//! list. Widgets are generic over their definition type so the same struct
//! serves both the top level ([`Widget`]) and the children of a group
//! ([`LeafWidget`]), which cannot hold another group.

mod definition;
mod query;

pub use definition::{
    AlertGraphDefinition, AlertValueDefinition, CheckStatusDefinition, Definition,
    EventStreamDefinition, EventTimelineDefinition, FreeTextDefinition, GroupDefinition,
    IframeDefinition, ImageDefinition, LeafDefinition, LogStreamDefinition,
    ManageStatusDefinition, NoteDefinition, QueryValueDefinition, TimeseriesDefinition,
    ToplistDefinition, WidgetKind, WidgetTitle,
};
pub use query::{
    ApmOrLogQuery, ConditionalFormat, GroupBySort, ProcessQuery, QueryCompute, QueryGroupBy,
    QuerySearch, QueryValueRequest, RequestQuery, TimeseriesRequest, ToplistRequest,
    WidgetMarker, WidgetTime,
};

use std::fmt;

use serde::{Deserialize, Serialize};

/// How widgets are positioned on a dashboard or inside a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutType {
    /// Widgets flow in declaration order; per-widget layouts are ignored
    #[default]
    Ordered,
    /// Widgets are placed by their explicit [`Layout`]
    Free,
}

impl LayoutType {
    /// Every accepted spelling, in schema order.
    pub const ALLOWED: [&'static str; 2] = ["ordered", "free"];

    /// The wire and configuration spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ordered => "ordered",
            Self::Free => "free",
        }
    }

    /// Parses the configuration spelling.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ordered" => Some(Self::Ordered),
            "free" => Some(Self::Free),
            _ => None,
        }
    }
}

impl fmt::Display for LayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form position of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Horizontal offset
    pub x: f64,
    /// Vertical offset
    pub y: f64,
    /// Widget width
    pub width: f64,
    /// Widget height
    pub height: f64,
}

impl Layout {
    /// Creates a layout from its four coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A named, prefix-scoped substitution value usable across a dashboard's queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateVariable {
    /// Variable name
    pub name: String,
    /// Tag prefix that restricts the values offered for the variable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Value selected when the dashboard loads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl TemplateVariable {
    /// Creates a template variable with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: None,
            default: None,
        }
    }
}

/// One visual element on a dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget<D = Definition> {
    /// Identifier assigned by the API after the first round trip
    pub id: Option<i64>,
    /// Position, meaningful only inside a `free` container
    pub layout: Option<Layout>,
    /// Type-specific content
    pub definition: D,
}

/// A widget that may appear inside a group: every kind except `group`.
pub type LeafWidget = Widget<LeafDefinition>;

impl<D> Widget<D> {
    /// Creates a widget without id or layout.
    pub fn new(definition: impl Into<D>) -> Self {
        Self {
            id: None,
            layout: None,
            definition: definition.into(),
        }
    }

    /// Sets the widget layout.
    #[must_use]
    pub const fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }
}

impl Widget {
    /// The discriminator of this widget's definition.
    #[must_use]
    pub const fn kind(&self) -> WidgetKind {
        self.definition.kind()
    }
}

impl LeafWidget {
    /// The discriminator of this widget's definition.
    #[must_use]
    pub const fn kind(&self) -> WidgetKind {
        self.definition.kind()
    }
}

/// A dashboard as managed by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    /// Identifier assigned by the API on creation
    pub id: Option<String>,
    /// Dashboard title
    pub title: String,
    /// Layout mode for the top-level widgets
    pub layout_type: LayoutType,
    /// Free-form description
    pub description: Option<String>,
    /// Whether only the author and admins may edit the dashboard
    pub is_read_only: bool,
    /// Handles notified when the dashboard changes
    pub notify_list: Vec<String>,
    /// Template variables, in declaration order
    pub template_variables: Vec<TemplateVariable>,
    /// Widgets, in declaration order
    pub widgets: Vec<Widget>,
    /// Link to the dashboard, reported by the API
    pub url: Option<String>,
}

impl Dashboard {
    /// Creates an empty dashboard.
    pub fn new(title: impl Into<String>, layout_type: LayoutType) -> Self {
        Self {
            id: None,
            title: title.into(),
            layout_type,
            description: None,
            is_read_only: false,
            notify_list: Vec::new(),
            template_variables: Vec::new(),
            widgets: Vec::new(),
            url: None,
        }
    }

    /// Total number of widgets, counting the children of groups.
    #[must_use]
    pub fn widget_count(&self) -> usize {
        self.widgets
            .iter()
            .map(|widget| match &widget.definition {
                Definition::Group(group) => 1 + group.widgets.len(),
                Definition::Leaf(_) => 1,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_type_parse() {
        assert_eq!(LayoutType::parse("free"), Some(LayoutType::Free));
        assert_eq!(LayoutType::parse("ordered"), Some(LayoutType::Ordered));
        assert_eq!(LayoutType::parse("Free"), None);
        assert_eq!(LayoutType::Free.to_string(), "free");
    }

    #[test]
    fn test_layout_type_serde() {
        let json = serde_json::to_string(&LayoutType::Free).unwrap();
        assert_eq!(json, "\"free\"");
        let parsed: LayoutType = serde_json::from_str("\"ordered\"").unwrap();
        assert_eq!(parsed, LayoutType::Ordered);
    }

    #[test]
    fn test_widget_count_includes_group_children() {
        let mut dashboard = Dashboard::new("Counting", LayoutType::Ordered);
        dashboard
            .widgets
            .push(Widget::new(NoteDefinition::new("top")));
        dashboard.widgets.push(Widget::new(GroupDefinition {
            layout_type: LayoutType::Ordered,
            title: None,
            widgets: vec![
                LeafWidget::new(NoteDefinition::new("a")),
                LeafWidget::new(NoteDefinition::new("b")),
            ],
        }));
        assert_eq!(dashboard.widget_count(), 4);
    }

    #[test]
    fn test_template_variable_omits_unset_fields() {
        let json = serde_json::to_string(&TemplateVariable::new("env")).unwrap();
        assert_eq!(json, r#"{"name":"env"}"#);
    }
}
