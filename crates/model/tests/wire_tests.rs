//! Tests for the boards API wire format.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use dashform_model::wire::{decode_definition, encode_definition};
use dashform_model::{
    BoardPayload, CheckStatusDefinition, Dashboard, Definition, Error, FieldPath,
    GroupDefinition, Layout, LayoutType, LeafWidget, NoteDefinition, RequestQuery,
    TimeseriesDefinition, TimeseriesRequest, Widget, WidgetKind, WidgetTitle,
};
use serde_json::json;

/// A response body shaped like the ones the boards API returns.
fn api_response() -> serde_json::Value {
    json!({
        "id": "qc9-tuk-9kv",
        "title": "Acceptance Test Ordered Dashboard",
        "description": "Created using the Datadog provider in Terraform",
        "layout_type": "ordered",
        "is_read_only": true,
        "notify_list": null,
        "template_variables": [
            {"name": "var_1", "prefix": "host", "default": "aws"},
            {"name": "var_2", "prefix": "service_name", "default": "autoscaling"}
        ],
        "url": "/dashboard/qc9-tuk-9kv/acceptance-test-ordered-dashboard",
        "widgets": [
            {
                "id": 5_436_370_674_582_587_u64,
                "definition": {
                    "type": "note",
                    "content": "note text",
                    "background_color": "pink",
                    "font_size": "14",
                    "text_align": "center"
                }
            },
            {
                "id": 3_887_046_970_315_839_u64,
                "definition": {
                    "type": "group",
                    "layout_type": "ordered",
                    "title": "Group Widget",
                    "widgets": [
                        {
                            "id": 1,
                            "definition": {
                                "type": "note",
                                "content": "cluster note widget",
                                "background_color": "yellow"
                            }
                        },
                        {
                            "id": 2,
                            "definition": {
                                "type": "alert_graph",
                                "alert_id": "123",
                                "viz_type": "toplist",
                                "title": "Alert Graph",
                                "title_size": "16",
                                "title_align": "right",
                                "time": {"live_span": "1h"}
                            }
                        }
                    ]
                }
            }
        ]
    })
}

#[test]
fn test_decode_api_response() {
    let payload: BoardPayload = serde_json::from_value(api_response()).unwrap();
    let dashboard = Dashboard::try_from(payload).unwrap();

    assert_eq!(dashboard.id.as_deref(), Some("qc9-tuk-9kv"));
    assert!(dashboard.is_read_only);
    assert!(dashboard.notify_list.is_empty());
    assert_eq!(dashboard.template_variables.len(), 2);
    assert_eq!(dashboard.template_variables[1].name, "var_2");
    assert_eq!(dashboard.widgets.len(), 2);
    assert_eq!(dashboard.widgets[0].kind(), WidgetKind::Note);

    let group = dashboard.widgets[1].definition.as_group().unwrap();
    assert_eq!(group.title.as_deref(), Some("Group Widget"));
    assert_eq!(group.widgets.len(), 2);
    assert_eq!(group.widgets[0].kind(), WidgetKind::Note);
    assert_eq!(group.widgets[1].kind(), WidgetKind::AlertGraph);
    assert_eq!(group.widgets[1].id, Some(2));
    assert!(dashboard.url.is_some());
}

#[test]
fn test_response_round_trip_keeps_definitions() {
    let payload: BoardPayload = serde_json::from_value(api_response()).unwrap();
    let original_widgets = payload.widgets.clone();

    let dashboard = Dashboard::try_from(payload).unwrap();
    let encoded = BoardPayload::try_from(&dashboard).unwrap();

    assert_eq!(encoded.widgets, original_widgets);
    assert!(encoded.url.is_none());
}

#[test]
fn test_url_is_never_sent() {
    let mut dashboard = Dashboard::new("Links", LayoutType::Free);
    dashboard.url = Some("/dashboard/abc".to_string());
    let body = serde_json::to_value(BoardPayload::try_from(&dashboard).unwrap()).unwrap();
    assert!(body.get("url").is_none());
    assert_eq!(body["layout_type"], "free");
}

#[test]
fn test_unknown_widget_type_fails_whole_dashboard() {
    let mut response = api_response();
    response["widgets"][0]["definition"]["type"] = json!("sunburst");
    let payload: BoardPayload = serde_json::from_value(response).unwrap();

    match Dashboard::try_from(payload) {
        Err(Error::UnsupportedWidgetType { widget_type }) => assert_eq!(widget_type, "sunburst"),
        other => panic!("expected UnsupportedWidgetType, got {other:?}"),
    }
}

#[test]
fn test_layout_and_ids_survive() {
    let mut dashboard = Dashboard::new("Free board", LayoutType::Free);
    let mut widget = Widget::new(NoteDefinition::new("positioned"))
        .with_layout(Layout::new(36.0, 25.0, 140.0, 500.0));
    widget.id = Some(42);
    dashboard.widgets.push(widget);

    let payload = BoardPayload::try_from(&dashboard).unwrap();
    let body = serde_json::to_value(&payload).unwrap();
    assert_eq!(
        body["widgets"][0]["layout"],
        json!({"x": 36.0, "y": 25.0, "width": 140.0, "height": 500.0})
    );

    let decoded = Dashboard::try_from(payload).unwrap();
    assert_eq!(decoded, dashboard);
}

#[test]
fn test_group_encodes_children_with_tags() {
    let group = GroupDefinition {
        layout_type: LayoutType::Ordered,
        title: Some("Checks".to_string()),
        widgets: vec![LeafWidget::new(CheckStatusDefinition {
            check: "aws.ecs.agent_connected".to_string(),
            grouping: "cluster".to_string(),
            group_by: vec!["account".to_string(), "cluster".to_string()],
            ..CheckStatusDefinition::default()
        })],
    };
    let value = encode_definition(&Definition::Group(group.clone())).unwrap();

    assert_eq!(value["type"], "group");
    assert_eq!(value["widgets"][0]["definition"]["type"], "check_status");
    assert!(value["widgets"][0]["definition"].get("tags").is_none());

    let decoded = decode_definition(&value, &FieldPath::root()).unwrap();
    assert_eq!(decoded, Definition::Group(group));
}

#[test]
fn test_timeseries_requests_keep_their_order() {
    let definition = TimeseriesDefinition {
        requests: vec![
            TimeseriesRequest::new(RequestQuery::Metric("avg:a{*}".to_string())),
            TimeseriesRequest::new(RequestQuery::Metric("avg:b{*}".to_string())),
            TimeseriesRequest::new(RequestQuery::Metric("avg:c{*}".to_string())),
        ],
        title: WidgetTitle::text("Three lines"),
        ..TimeseriesDefinition::default()
    };
    let value = encode_definition(&definition.clone().into()).unwrap();
    let queries: Vec<_> = value["requests"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["q"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(queries, vec!["avg:a{*}", "avg:b{*}", "avg:c{*}"]);

    let decoded = decode_definition(&value, &FieldPath::root()).unwrap();
    assert_eq!(decoded, definition.into());
}

mod ordering {
    use super::*;
    use dashform_model::TemplateVariable;
    use proptest::prelude::*;

    fn dashboard(notes: &[String], variables: &[String], notify: &[String]) -> Dashboard {
        let mut dashboard = Dashboard::new("Ordering", LayoutType::Ordered);
        dashboard.widgets = notes
            .iter()
            .map(|content| Widget::new(NoteDefinition::new(content.as_str())))
            .collect();
        dashboard.template_variables = variables.iter().map(TemplateVariable::new).collect();
        dashboard.notify_list = notify.to_vec();
        dashboard
    }

    proptest! {
        #[test]
        fn body_round_trip_preserves_order(
            notes in prop::collection::vec("[a-z ]{1,12}", 0..6),
            variables in prop::collection::vec("[a-z_]{1,8}", 0..4),
            notify in prop::collection::vec("[a-z]{1,6}@example\\.com", 0..4),
        ) {
            let original = dashboard(&notes, &variables, &notify);
            let body = serde_json::to_vec(&BoardPayload::try_from(&original).unwrap()).unwrap();
            let decoded = Dashboard::try_from(BoardPayload::from_slice(&body).unwrap()).unwrap();
            prop_assert_eq!(decoded, original);
        }
    }
}
