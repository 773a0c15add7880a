//! Widget blocks and definition dispatch.
//!
//! The same codec serves top-level widgets ([`Definition`]) and the children
//! of a group ([`LeafDefinition`]); [`DefinitionCodec`] selects which kinds
//! each level accepts.

use dashform_model::{
    Definition, Error, GroupDefinition, LayoutType, LeafDefinition, Result, Widget, WidgetKind,
};

use super::definitions::{decode_leaf, encode_leaf};
use super::fields::{Fields, Tree, TreeBuilder};
use super::layout::{decode_layout, decode_layout_type, encode_layout};

/// A definition type that can be read from and written to a widget block.
pub trait DefinitionCodec: Sized {
    /// Decodes the `<kind>_definition` block found for `kind`.
    fn decode(kind: WidgetKind, fields: &Fields<'_>) -> Result<Self>;

    /// Encodes the definition and names the block it belongs in.
    fn encode(&self) -> (WidgetKind, Tree);
}

impl DefinitionCodec for LeafDefinition {
    fn decode(kind: WidgetKind, fields: &Fields<'_>) -> Result<Self> {
        decode_leaf(kind, fields)
    }

    fn encode(&self) -> (WidgetKind, Tree) {
        (self.kind(), encode_leaf(self))
    }
}

impl DefinitionCodec for Definition {
    fn decode(kind: WidgetKind, fields: &Fields<'_>) -> Result<Self> {
        match kind {
            WidgetKind::Group => decode_group(fields).map(Self::Group),
            _ => decode_leaf(kind, fields).map(Self::Leaf),
        }
    }

    fn encode(&self) -> (WidgetKind, Tree) {
        match self {
            Self::Group(group) => (WidgetKind::Group, encode_group(group)),
            Self::Leaf(leaf) => leaf.encode(),
        }
    }
}

fn decode_group(fields: &Fields<'_>) -> Result<GroupDefinition> {
    let layout_type = decode_layout_type(fields, "layout_type")?;
    if !fields.populated("widget") {
        return Err(Error::missing(fields.at("widget")));
    }

    Ok(GroupDefinition {
        layout_type,
        title: fields.opt_str("title")?,
        widgets: decode_widgets(fields, "widget", layout_type)?,
    })
}

fn encode_group(group: &GroupDefinition) -> Tree {
    TreeBuilder::new()
        .str("layout_type", group.layout_type.as_str())
        .opt_str("title", group.title.as_deref())
        .blocks("widget", encode_widgets(&group.widgets, group.layout_type))
        .build()
}

/// Decodes one widget block.
///
/// Exactly one `<kind>_definition` block must be set. Under a `free` container
/// the `layout` map is required; under `ordered` it is ignored.
pub fn decode_widget<D: DefinitionCodec>(
    fields: &Fields<'_>,
    container: LayoutType,
) -> Result<Widget<D>> {
    let kinds: Vec<WidgetKind> = WidgetKind::ALL
        .into_iter()
        .filter(|kind| fields.has_block(kind.block_name()))
        .collect();

    let kind = match kinds.as_slice() {
        [] => {
            return Err(Error::NoDefinitionSpecified {
                path: fields.path().clone(),
            });
        }
        [kind] => *kind,
        _ => {
            return Err(Error::MultipleDefinitions {
                path: fields.path().clone(),
                kinds: kinds.iter().map(|k| k.block_name().to_string()).collect(),
            });
        }
    };

    let definition = D::decode(kind, &fields.required_block(kind.block_name())?)?;
    let layout = match container {
        LayoutType::Free => Some(decode_layout(&fields.required_map("layout")?)?),
        LayoutType::Ordered => None,
    };

    Ok(Widget {
        id: None,
        layout,
        definition,
    })
}

/// Decodes a list of widget blocks, keeping their order.
pub fn decode_widgets<D: DefinitionCodec>(
    fields: &Fields<'_>,
    key: &str,
    container: LayoutType,
) -> Result<Vec<Widget<D>>> {
    fields
        .blocks(key)?
        .iter()
        .map(|widget| decode_widget(widget, container))
        .collect()
}

/// Encodes one widget block. The layout is written only under a `free` container.
#[must_use]
pub fn encode_widget<D: DefinitionCodec>(widget: &Widget<D>, container: LayoutType) -> Tree {
    let (kind, definition) = widget.definition.encode();
    let mut builder = TreeBuilder::new().single_block(kind.block_name(), definition);
    if container == LayoutType::Free
        && let Some(layout) = &widget.layout
    {
        builder = builder.map("layout", encode_layout(layout));
    }
    builder.build()
}

/// Encodes a list of widgets, keeping their order.
#[must_use]
pub fn encode_widgets<D: DefinitionCodec>(widgets: &[Widget<D>], container: LayoutType) -> Vec<Tree> {
    widgets
        .iter()
        .map(|widget| encode_widget(widget, container))
        .collect()
}
