//! Widgets given as raw JSON documents in the boards API format.
//!
//! Each `widget_json` block carries one `definition` string. On read the
//! configured text is kept whenever it still describes the remote widget, so
//! key order and whitespace never show up as a diff.

use dashform_model::wire::{decode_definition, encode_definition};
use dashform_model::{Definition, Error, FieldPath, LayoutType, Result, Widget};
use serde_json::Value;

use super::fields::{Fields, Tree, TreeBuilder};
use super::layout::{decode_layout, encode_layout};

/// Name of the raw-widget attribute.
pub const WIDGET_JSON: &str = "widget_json";

/// Decodes every `widget_json` block of the dashboard.
pub fn decode_widget_json(fields: &Fields<'_>, container: LayoutType) -> Result<Vec<Widget>> {
    fields
        .blocks(WIDGET_JSON)?
        .iter()
        .map(|block| {
            let path = block.at("definition");
            let text = block.required_str("definition")?;
            let document: Value = serde_json::from_str(&text)
                .map_err(|e| Error::payload(path.clone(), e.to_string()))?;

            let layout = match container {
                LayoutType::Free => Some(decode_layout(&block.required_map("layout")?)?),
                LayoutType::Ordered => None,
            };

            Ok(Widget {
                id: None,
                layout,
                definition: decode_definition(&document, &path)?,
            })
        })
        .collect()
}

/// The `definition` texts currently held in a tree, in order.
#[must_use]
pub fn configured_documents(tree: &Tree) -> Vec<String> {
    let Some(Value::Array(blocks)) = tree.get(WIDGET_JSON) else {
        return Vec::new();
    };
    blocks
        .iter()
        .map(|block| {
            block
                .get("definition")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

/// Encodes remote widgets as `widget_json` blocks.
///
/// The document at position `i` reuses `configured[i]` verbatim when it
/// decodes to the same definition as the remote widget; otherwise the remote
/// definition is written. Number form, key order, unknown keys and explicit
/// nulls therefore never count as a change.
pub fn encode_widget_json(
    widgets: &[Widget],
    container: LayoutType,
    configured: &[String],
) -> Result<Vec<Tree>> {
    widgets
        .iter()
        .enumerate()
        .map(|(i, widget)| {
            let text = match configured.get(i) {
                Some(text) if same_definition(text, &widget.definition) => text.clone(),
                _ => serde_json::to_string(&encode_definition(&widget.definition)?)?,
            };

            let mut builder = TreeBuilder::new().str("definition", text);
            if container == LayoutType::Free
                && let Some(layout) = &widget.layout
            {
                builder = builder.map("layout", encode_layout(layout));
            }
            Ok(builder.build())
        })
        .collect()
}

fn same_definition(text: &str, remote: &Definition) -> bool {
    let Ok(document) = serde_json::from_str::<Value>(text) else {
        return false;
    };
    decode_definition(&document, &FieldPath::root())
        .is_ok_and(|configured| without_child_ids(configured) == without_child_ids(remote.clone()))
}

/// Group children get ids from the API; a configured document has none.
fn without_child_ids(mut definition: Definition) -> Definition {
    if let Definition::Group(group) = &mut definition {
        for widget in &mut group.widgets {
            widget.id = None;
        }
    }
    definition
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashform_model::{NoteDefinition, WidgetKind};
    use serde_json::json;

    fn tree(value: Value) -> Tree {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_decode_dispatches_on_type() {
        let map = tree(json!({
            "widget_json": [
                {"definition": r#"{"type": "note", "content": "raw"}"#},
                {"definition": r#"{"type": "iframe", "url": "https://example.com"}"#}
            ]
        }));
        let widgets = decode_widget_json(&Fields::root(&map), LayoutType::Ordered).unwrap();
        assert_eq!(widgets[0].kind(), WidgetKind::Note);
        assert_eq!(widgets[1].kind(), WidgetKind::Iframe);
    }

    #[test]
    fn test_decode_rejects_unknown_type() {
        let map = tree(json!({"widget_json": [{"definition": r#"{"type": "sunburst"}"#}]}));
        let err = decode_widget_json(&Fields::root(&map), LayoutType::Ordered).unwrap_err();
        assert!(matches!(err, Error::UnsupportedWidgetType { widget_type } if widget_type == "sunburst"));
    }

    #[test]
    fn test_decode_rejects_invalid_json() {
        let map = tree(json!({"widget_json": [{"definition": "{not json"}]}));
        let err = decode_widget_json(&Fields::root(&map), LayoutType::Ordered).unwrap_err();
        assert_eq!(err.path().unwrap().to_string(), "widget_json.0.definition");
    }

    #[test]
    fn test_equal_documents_keep_configured_text() {
        let configured = "{ \"content\": \"raw\",\n  \"type\": \"note\" }".to_string();
        let widgets = vec![Widget::new(NoteDefinition::new("raw"))];

        let blocks = encode_widget_json(&widgets, LayoutType::Ordered, &[configured.clone()]).unwrap();
        assert_eq!(blocks[0]["definition"], json!(configured));
    }

    #[test]
    fn test_equivalent_documents_keep_configured_text() {
        let configured = r#"{"type": "note", "content": "raw", "has_padding": true, "font_size": null}"#;
        let widgets = vec![Widget::new(NoteDefinition::new("raw"))];

        let blocks =
            encode_widget_json(&widgets, LayoutType::Ordered, &[configured.to_string()]).unwrap();
        assert_eq!(blocks[0]["definition"], json!(configured));
    }

    #[test]
    fn test_group_child_ids_are_not_a_change() {
        let configured = r#"{"type": "group", "layout_type": "ordered",
            "widgets": [{"definition": {"type": "note", "content": "child"}}]}"#;
        let mut child: dashform_model::LeafWidget = Widget::new(NoteDefinition::new("child"));
        child.id = Some(4_096);
        let group = dashform_model::GroupDefinition {
            layout_type: LayoutType::Ordered,
            title: None,
            widgets: vec![child],
        };

        let blocks = encode_widget_json(
            &[Widget::new(group)],
            LayoutType::Ordered,
            &[configured.to_string()],
        )
        .unwrap();
        assert_eq!(blocks[0]["definition"], json!(configured));
    }

    #[test]
    fn test_changed_documents_take_remote_text() {
        let configured = r#"{"type": "note", "content": "old"}"#.to_string();
        let widgets = vec![Widget::new(NoteDefinition::new("new"))];

        let blocks = encode_widget_json(&widgets, LayoutType::Ordered, &[configured]).unwrap();
        assert_eq!(
            blocks[0]["definition"],
            json!(r#"{"type":"note","content":"new"}"#)
        );
    }
}
