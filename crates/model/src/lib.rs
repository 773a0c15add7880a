//! # dashform-model
//!
//! Typed model of a monitoring dashboard and the wire format of the boards API.
//!
//! - [`model`]: dashboards, widgets and the closed widget-definition catalog
//! - [`wire`]: JSON payloads and the `type`-tagged definition dispatch
//! - [`Error`]: configuration and decoding errors, each located by a [`FieldPath`]
//!
//! ## Example
//!
//! ```
//! use dashform_model::{BoardPayload, Dashboard, LayoutType, NoteDefinition, Widget};
//!
//! let mut dashboard = Dashboard::new("Service overview", LayoutType::Ordered);
//! dashboard.widgets.push(Widget::new(NoteDefinition::new("Owned by the platform team")));
//!
//! let payload = BoardPayload::try_from(&dashboard)?;
//! assert_eq!(payload.widgets[0].definition["type"], "note");
//!
//! let decoded = Dashboard::try_from(payload)?;
//! assert_eq!(decoded, dashboard);
//! # Ok::<(), dashform_model::Error>(())
//! ```

pub mod error;
pub mod model;
pub mod path;
pub mod wire;

pub use error::{Error, Result};
pub use model::{
    AlertGraphDefinition, AlertValueDefinition, ApmOrLogQuery, CheckStatusDefinition,
    ConditionalFormat, Dashboard, Definition, EventStreamDefinition, EventTimelineDefinition,
    FreeTextDefinition, GroupBySort, GroupDefinition, IframeDefinition, ImageDefinition, Layout,
    LayoutType, LeafDefinition, LeafWidget, LogStreamDefinition, ManageStatusDefinition,
    NoteDefinition, ProcessQuery, QueryCompute, QueryGroupBy, QuerySearch, QueryValueDefinition,
    QueryValueRequest, RequestQuery, TemplateVariable, TimeseriesDefinition, TimeseriesRequest,
    ToplistDefinition, ToplistRequest, Widget, WidgetKind, WidgetMarker, WidgetTime, WidgetTitle,
};
pub use path::FieldPath;
pub use wire::{BoardPayload, WidgetPayload};
