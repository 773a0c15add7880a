//! Widget definitions: the closed catalog of widget kinds.

use serde::{Deserialize, Serialize};

use super::query::{
    QueryValueRequest, TimeseriesRequest, ToplistRequest, WidgetMarker, WidgetTime,
};
use super::{LayoutType, LeafWidget};

/// Discriminator for every widget kind the provider understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WidgetKind {
    /// Graph of a monitor's underlying query
    AlertGraph,
    /// Current value of a monitor's underlying query
    AlertValue,
    /// Status of a service check
    CheckStatus,
    /// Event stream filtered by a query
    EventStream,
    /// Timeline of events matching a query
    EventTimeline,
    /// Static heading text
    FreeText,
    /// Container for other widgets
    Group,
    /// Embedded web page
    Iframe,
    /// Static image
    Image,
    /// Stream of log lines
    LogStream,
    /// Monitor summary
    ManageStatus,
    /// Markdown note
    Note,
    /// Single aggregated value
    QueryValue,
    /// Line, area or bar graph over time
    Timeseries,
    /// Ranked list
    Toplist,
}

impl WidgetKind {
    /// Every kind, in the order definitions are probed.
    pub const ALL: [Self; 15] = [
        Self::AlertGraph,
        Self::AlertValue,
        Self::CheckStatus,
        Self::EventStream,
        Self::EventTimeline,
        Self::FreeText,
        Self::Group,
        Self::Iframe,
        Self::Image,
        Self::LogStream,
        Self::ManageStatus,
        Self::Note,
        Self::QueryValue,
        Self::Timeseries,
        Self::Toplist,
    ];

    /// The `type` tag used by the boards API.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::AlertGraph => "alert_graph",
            Self::AlertValue => "alert_value",
            Self::CheckStatus => "check_status",
            Self::EventStream => "event_stream",
            Self::EventTimeline => "event_timeline",
            Self::FreeText => "free_text",
            Self::Group => "group",
            Self::Iframe => "iframe",
            Self::Image => "image",
            Self::LogStream => "log_stream",
            Self::ManageStatus => "manage_status",
            Self::Note => "note",
            Self::QueryValue => "query_value",
            Self::Timeseries => "timeseries",
            Self::Toplist => "toplist",
        }
    }

    /// The configuration block that carries this kind's definition.
    #[must_use]
    pub const fn block_name(self) -> &'static str {
        match self {
            Self::AlertGraph => "alert_graph_definition",
            Self::AlertValue => "alert_value_definition",
            Self::CheckStatus => "check_status_definition",
            Self::EventStream => "event_stream_definition",
            Self::EventTimeline => "event_timeline_definition",
            Self::FreeText => "free_text_definition",
            Self::Group => "group_definition",
            Self::Iframe => "iframe_definition",
            Self::Image => "image_definition",
            Self::LogStream => "log_stream_definition",
            Self::ManageStatus => "manage_status_definition",
            Self::Note => "note_definition",
            Self::QueryValue => "query_value_definition",
            Self::Timeseries => "timeseries_definition",
            Self::Toplist => "toplist_definition",
        }
    }

    /// Looks up a kind by its API tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Whether widgets of this kind may appear inside a group.
    #[must_use]
    pub const fn is_leaf(self) -> bool {
        !matches!(self, Self::Group)
    }

    /// Every kind allowed inside a group.
    pub fn leaves() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(|kind| kind.is_leaf())
    }
}

/// Title settings shared by most widget kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetTitle {
    /// Title text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Title font size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_size: Option<String>,
    /// Title alignment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_align: Option<String>,
}

impl WidgetTitle {
    /// A title with only its text set.
    pub fn text(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

/// `alert_graph` widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertGraphDefinition {
    /// Monitor identifier
    pub alert_id: String,
    /// Visualization: `timeseries` or `toplist`
    pub viz_type: String,
    /// Title settings
    #[serde(flatten)]
    pub title: WidgetTitle,
    /// Time frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<WidgetTime>,
}

/// `alert_value` widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertValueDefinition {
    /// Monitor identifier
    pub alert_id: String,
    /// Number of decimals shown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<i64>,
    /// Unit displayed next to the value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Value font size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_size: Option<String>,
    /// Value alignment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    /// Title settings
    #[serde(flatten)]
    pub title: WidgetTitle,
}

/// `check_status` widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckStatusDefinition {
    /// Service check name
    pub check: String,
    /// `check` or `cluster`
    pub grouping: String,
    /// Group reported for a single check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Tags used to filter the checks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Tags used to group a cluster check
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<String>,
    /// Title settings
    #[serde(flatten)]
    pub title: WidgetTitle,
    /// Time frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<WidgetTime>,
}

/// `event_stream` widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventStreamDefinition {
    /// Event query
    pub query: String,
    /// `s` or `l`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_size: Option<String>,
    /// Title settings
    #[serde(flatten)]
    pub title: WidgetTitle,
    /// Time frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<WidgetTime>,
}

/// `event_timeline` widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventTimelineDefinition {
    /// Event query
    pub query: String,
    /// Title settings
    #[serde(flatten)]
    pub title: WidgetTitle,
    /// Time frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<WidgetTime>,
}

/// `free_text` widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeTextDefinition {
    /// Displayed text
    pub text: String,
    /// Text color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Font size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    /// Alignment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
}

/// `iframe` widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IframeDefinition {
    /// Embedded page
    pub url: String,
}

/// `image` widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDefinition {
    /// Image location
    pub url: String,
    /// `zoom`, `fit` or `center`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizing: Option<String>,
    /// `small` or `large`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
}

/// `log_stream` widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogStreamDefinition {
    /// Log index
    pub logset: String,
    /// Log search query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Columns shown for each line
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    /// Title settings
    #[serde(flatten)]
    pub title: WidgetTitle,
    /// Time frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<WidgetTime>,
}

/// `manage_status` widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManageStatusDefinition {
    /// Monitor query
    pub query: String,
    /// Sort order of the monitors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// Number of monitors shown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    /// Offset of the first monitor shown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    /// `counts`, `countsAndList` or `list`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_format: Option<String>,
    /// `background` or `text`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_preference: Option<String>,
    /// Hide statuses with no monitors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_zero_counts: Option<bool>,
    /// Title settings
    #[serde(flatten)]
    pub title: WidgetTitle,
}

/// `note` widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDefinition {
    /// Markdown content
    pub content: String,
    /// Background color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Font size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    /// Alignment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    /// Whether the note has a pointer tick
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_tick: Option<bool>,
    /// Position of the tick along its edge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_pos: Option<String>,
    /// Edge the tick sits on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_edge: Option<String>,
}

impl NoteDefinition {
    /// A note with only its content set.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }
}

/// `query_value` widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryValueDefinition {
    /// Queries, normally exactly one
    #[serde(default)]
    pub requests: Vec<QueryValueRequest>,
    /// Scale the value automatically
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoscale: Option<bool>,
    /// Unit displayed next to the value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_unit: Option<String>,
    /// Number of decimals shown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<i64>,
    /// Value alignment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    /// Title settings
    #[serde(flatten)]
    pub title: WidgetTitle,
    /// Time frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<WidgetTime>,
}

/// `timeseries` widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesDefinition {
    /// Graphed queries
    #[serde(default)]
    pub requests: Vec<TimeseriesRequest>,
    /// Horizontal markers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<WidgetMarker>,
    /// Title settings
    #[serde(flatten)]
    pub title: WidgetTitle,
    /// Whether to show the legend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_legend: Option<bool>,
    /// Legend size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend_size: Option<String>,
    /// Time frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<WidgetTime>,
}

/// `toplist` widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToplistDefinition {
    /// Ranked queries
    #[serde(default)]
    pub requests: Vec<ToplistRequest>,
    /// Title settings
    #[serde(flatten)]
    pub title: WidgetTitle,
    /// Time frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<WidgetTime>,
}

/// `group` widget: an ordered container of non-group widgets.
///
/// Not serde-derived; its children go through the tagged wire dispatch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupDefinition {
    /// Layout of the children
    pub layout_type: LayoutType,
    /// Group title
    pub title: Option<String>,
    /// Children, in declaration order
    pub widgets: Vec<LeafWidget>,
}

/// Every definition allowed inside a group.
#[derive(Debug, Clone, PartialEq)]
pub enum LeafDefinition {
    /// `alert_graph`
    AlertGraph(AlertGraphDefinition),
    /// `alert_value`
    AlertValue(AlertValueDefinition),
    /// `check_status`
    CheckStatus(CheckStatusDefinition),
    /// `event_stream`
    EventStream(EventStreamDefinition),
    /// `event_timeline`
    EventTimeline(EventTimelineDefinition),
    /// `free_text`
    FreeText(FreeTextDefinition),
    /// `iframe`
    Iframe(IframeDefinition),
    /// `image`
    Image(ImageDefinition),
    /// `log_stream`
    LogStream(LogStreamDefinition),
    /// `manage_status`
    ManageStatus(ManageStatusDefinition),
    /// `note`
    Note(NoteDefinition),
    /// `query_value`
    QueryValue(QueryValueDefinition),
    /// `timeseries`
    Timeseries(TimeseriesDefinition),
    /// `toplist`
    Toplist(ToplistDefinition),
}

impl LeafDefinition {
    /// The discriminator of this definition.
    #[must_use]
    pub const fn kind(&self) -> WidgetKind {
        match self {
            Self::AlertGraph(_) => WidgetKind::AlertGraph,
            Self::AlertValue(_) => WidgetKind::AlertValue,
            Self::CheckStatus(_) => WidgetKind::CheckStatus,
            Self::EventStream(_) => WidgetKind::EventStream,
            Self::EventTimeline(_) => WidgetKind::EventTimeline,
            Self::FreeText(_) => WidgetKind::FreeText,
            Self::Iframe(_) => WidgetKind::Iframe,
            Self::Image(_) => WidgetKind::Image,
            Self::LogStream(_) => WidgetKind::LogStream,
            Self::ManageStatus(_) => WidgetKind::ManageStatus,
            Self::Note(_) => WidgetKind::Note,
            Self::QueryValue(_) => WidgetKind::QueryValue,
            Self::Timeseries(_) => WidgetKind::Timeseries,
            Self::Toplist(_) => WidgetKind::Toplist,
        }
    }
}

/// Any widget definition, including groups.
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    /// A container of leaf widgets
    Group(GroupDefinition),
    /// Any other kind
    Leaf(LeafDefinition),
}

impl Definition {
    /// The discriminator of this definition.
    #[must_use]
    pub const fn kind(&self) -> WidgetKind {
        match self {
            Self::Group(_) => WidgetKind::Group,
            Self::Leaf(leaf) => leaf.kind(),
        }
    }

    /// The group definition, if this is a group.
    #[must_use]
    pub const fn as_group(&self) -> Option<&GroupDefinition> {
        match self {
            Self::Group(group) => Some(group),
            Self::Leaf(_) => None,
        }
    }
}

impl From<LeafDefinition> for Definition {
    fn from(value: LeafDefinition) -> Self {
        Self::Leaf(value)
    }
}

impl From<GroupDefinition> for Definition {
    fn from(value: GroupDefinition) -> Self {
        Self::Group(value)
    }
}

macro_rules! leaf_conversions {
    ($($variant:ident => $definition:ty),+ $(,)?) => {
        $(
            impl From<$definition> for LeafDefinition {
                fn from(value: $definition) -> Self {
                    Self::$variant(value)
                }
            }

            impl From<$definition> for Definition {
                fn from(value: $definition) -> Self {
                    Self::Leaf(LeafDefinition::$variant(value))
                }
            }
        )+
    };
}

leaf_conversions! {
    AlertGraph => AlertGraphDefinition,
    AlertValue => AlertValueDefinition,
    CheckStatus => CheckStatusDefinition,
    EventStream => EventStreamDefinition,
    EventTimeline => EventTimelineDefinition,
    FreeText => FreeTextDefinition,
    Iframe => IframeDefinition,
    Image => ImageDefinition,
    LogStream => LogStreamDefinition,
    ManageStatus => ManageStatusDefinition,
    Note => NoteDefinition,
    QueryValue => QueryValueDefinition,
    Timeseries => TimeseriesDefinition,
    Toplist => ToplistDefinition,
}
