//! Dashboard assembly: the whole resource tree to and from [`Dashboard`].

use dashform_model::{Dashboard, Error, Result, TemplateVariable};

use super::fields::{Fields, Tree, TreeBuilder};
use super::layout::decode_layout_type;
use super::widget::{decode_widgets, encode_widgets};
use super::widget_json::{WIDGET_JSON, decode_widget_json, encode_widget_json};

/// How widgets are written back into the tree.
#[derive(Debug, Clone, Copy)]
pub enum WidgetStyle<'a> {
    /// Typed `widget` blocks
    Blocks,
    /// Raw `widget_json` documents, reusing the configured texts where equal
    Json(&'a [String]),
}

/// Assembles a dashboard from the resource tree.
///
/// Widgets, template variables and notify-list entries keep their order.
pub fn decode_dashboard(tree: &Tree) -> Result<Dashboard> {
    let fields = Fields::root(tree);
    let title = fields.required_str("title")?;
    let layout_type = decode_layout_type(&fields, "layout_type")?;

    let widgets = match (fields.populated("widget"), fields.populated(WIDGET_JSON)) {
        (true, true) => {
            return Err(Error::ConflictingAttributes {
                path: fields.at("widget"),
                other: WIDGET_JSON.to_string(),
            });
        }
        (false, true) => decode_widget_json(&fields, layout_type)?,
        _ => decode_widgets(&fields, "widget", layout_type)?,
    };

    let template_variables = fields
        .blocks("template_variable")?
        .iter()
        .map(|variable| {
            Ok(TemplateVariable {
                name: variable.required_str("name")?,
                prefix: variable.opt_str("prefix")?,
                default: variable.opt_str("default")?,
            })
        })
        .collect::<Result<_>>()?;

    Ok(Dashboard {
        id: None,
        title,
        layout_type,
        description: fields.opt_str("description")?,
        is_read_only: fields.opt_bool("is_read_only")?.unwrap_or(false),
        notify_list: fields.string_list("notify_list")?,
        template_variables,
        widgets,
        url: None,
    })
}

/// Writes a dashboard back as a resource tree.
pub fn encode_dashboard(dashboard: &Dashboard, style: WidgetStyle<'_>) -> Result<Tree> {
    let template_variables = dashboard
        .template_variables
        .iter()
        .map(|variable| {
            TreeBuilder::new()
                .str("name", variable.name.as_str())
                .opt_str("prefix", variable.prefix.as_deref())
                .opt_str("default", variable.default.as_deref())
                .build()
        })
        .collect();

    let builder = TreeBuilder::new()
        .str("title", dashboard.title.as_str())
        .str("layout_type", dashboard.layout_type.as_str())
        .opt_str("description", dashboard.description.as_deref())
        .value("is_read_only", dashboard.is_read_only)
        .blocks("template_variable", template_variables)
        .string_list("notify_list", &dashboard.notify_list)
        .opt_str("url", dashboard.url.as_deref());

    let builder = match style {
        WidgetStyle::Blocks => builder.blocks(
            "widget",
            encode_widgets(&dashboard.widgets, dashboard.layout_type),
        ),
        WidgetStyle::Json(configured) => builder.blocks(
            WIDGET_JSON,
            encode_widget_json(&dashboard.widgets, dashboard.layout_type, configured)?,
        ),
    };
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashform_model::LayoutType;
    use serde_json::{Value, json};

    fn tree(value: Value) -> Tree {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_minimal_dashboard_defaults() {
        let dashboard = decode_dashboard(&tree(json!({
            "title": "Minimal",
            "layout_type": "ordered"
        })))
        .unwrap();
        assert_eq!(dashboard.layout_type, LayoutType::Ordered);
        assert!(!dashboard.is_read_only);
        assert!(dashboard.widgets.is_empty());
    }

    #[test]
    fn test_missing_title() {
        let err = decode_dashboard(&tree(json!({"layout_type": "free"}))).unwrap_err();
        assert!(matches!(err, Error::MissingRequiredField { .. }));
        assert_eq!(err.path().unwrap().to_string(), "title");
    }

    #[test]
    fn test_widget_and_widget_json_conflict() {
        let err = decode_dashboard(&tree(json!({
            "title": "Both",
            "layout_type": "ordered",
            "widget": [{"note_definition": [{"content": "typed"}]}],
            "widget_json": [{"definition": "{\"type\": \"note\", \"content\": \"raw\"}"}]
        })))
        .unwrap_err();
        assert!(matches!(err, Error::ConflictingAttributes { .. }));
    }

    #[test]
    fn test_round_trip_through_tree() {
        let value = json!({
            "title": "Acceptance Test Free Dashboard",
            "layout_type": "free",
            "description": "Created using the Datadog provider in Terraform",
            "is_read_only": false,
            "template_variable": [
                {"name": "var_1", "prefix": "host", "default": "aws"},
                {"name": "var_2", "prefix": "service_name", "default": "autoscaling"}
            ],
            "notify_list": ["ops@example.com", "dev@example.com"],
            "widget": [{
                "event_stream_definition": [{
                    "query": "*",
                    "event_size": "l",
                    "title": "Widget Title",
                    "time": {"live_span": "1h"}
                }],
                "layout": {"x": "5", "y": "5", "width": "32", "height": "43"}
            }]
        });
        let dashboard = decode_dashboard(&tree(value.clone())).unwrap();
        let encoded = encode_dashboard(&dashboard, WidgetStyle::Blocks).unwrap();
        assert_eq!(Value::Object(encoded), value);
    }
}
