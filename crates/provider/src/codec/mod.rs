//! Conversion between the resource's configuration tree and the typed model.
//!
//! Every decoder reports the dotted path of the node it rejected, e.g.
//! `widget.1.group_definition.0.widget.0.note_definition.0.content`.

pub mod dashboard;
pub mod definitions;
pub mod fields;
pub mod layout;
pub mod query;
pub mod widget;
pub mod widget_json;

pub use dashboard::{WidgetStyle, decode_dashboard, encode_dashboard};
pub use fields::{Fields, Tree, TreeBuilder};
pub use layout::format_coordinate;
pub use widget::DefinitionCodec;
