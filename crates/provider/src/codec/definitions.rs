//! Codecs for each leaf widget definition.

use dashform_model::{
    AlertGraphDefinition, AlertValueDefinition, CheckStatusDefinition, Error,
    EventStreamDefinition, EventTimelineDefinition, FreeTextDefinition, IframeDefinition,
    ImageDefinition, LeafDefinition, LogStreamDefinition, ManageStatusDefinition,
    NoteDefinition, QueryValueDefinition, QueryValueRequest, Result, TimeseriesDefinition,
    TimeseriesRequest, ToplistDefinition, ToplistRequest, WidgetKind, WidgetMarker, WidgetTime,
    WidgetTitle,
};

use super::fields::{Fields, Tree, TreeBuilder};
use super::query::{
    decode_conditional_formats, decode_request_query, encode_conditional_formats,
    encode_request_query,
};

/// Decodes the definition block of a leaf kind.
///
/// A `group` block fails with [`Error::NestedGroup`]: groups only exist at
/// the top level.
pub fn decode_leaf(kind: WidgetKind, fields: &Fields<'_>) -> Result<LeafDefinition> {
    Ok(match kind {
        WidgetKind::AlertGraph => decode_alert_graph(fields)?.into(),
        WidgetKind::AlertValue => decode_alert_value(fields)?.into(),
        WidgetKind::CheckStatus => decode_check_status(fields)?.into(),
        WidgetKind::EventStream => decode_event_stream(fields)?.into(),
        WidgetKind::EventTimeline => decode_event_timeline(fields)?.into(),
        WidgetKind::FreeText => decode_free_text(fields)?.into(),
        WidgetKind::Iframe => decode_iframe(fields)?.into(),
        WidgetKind::Image => decode_image(fields)?.into(),
        WidgetKind::LogStream => decode_log_stream(fields)?.into(),
        WidgetKind::ManageStatus => decode_manage_status(fields)?.into(),
        WidgetKind::Note => decode_note(fields)?.into(),
        WidgetKind::QueryValue => decode_query_value(fields)?.into(),
        WidgetKind::Timeseries => decode_timeseries(fields)?.into(),
        WidgetKind::Toplist => decode_toplist(fields)?.into(),
        WidgetKind::Group => {
            return Err(Error::NestedGroup {
                path: fields.path().clone(),
            });
        }
    })
}

/// Encodes a leaf definition as the content of its `<kind>_definition` block.
#[must_use]
pub fn encode_leaf(definition: &LeafDefinition) -> Tree {
    match definition {
        LeafDefinition::AlertGraph(d) => encode_alert_graph(d),
        LeafDefinition::AlertValue(d) => encode_alert_value(d),
        LeafDefinition::CheckStatus(d) => encode_check_status(d),
        LeafDefinition::EventStream(d) => encode_event_stream(d),
        LeafDefinition::EventTimeline(d) => encode_event_timeline(d),
        LeafDefinition::FreeText(d) => encode_free_text(d),
        LeafDefinition::Iframe(d) => encode_iframe(d),
        LeafDefinition::Image(d) => encode_image(d),
        LeafDefinition::LogStream(d) => encode_log_stream(d),
        LeafDefinition::ManageStatus(d) => encode_manage_status(d),
        LeafDefinition::Note(d) => encode_note(d),
        LeafDefinition::QueryValue(d) => encode_query_value(d),
        LeafDefinition::Timeseries(d) => encode_timeseries(d),
        LeafDefinition::Toplist(d) => encode_toplist(d),
    }
}

fn decode_title(fields: &Fields<'_>) -> Result<WidgetTitle> {
    Ok(WidgetTitle {
        title: fields.opt_str("title")?,
        title_size: fields.opt_str("title_size")?,
        title_align: fields.opt_str("title_align")?,
    })
}

fn encode_title(builder: TreeBuilder, title: &WidgetTitle) -> TreeBuilder {
    builder
        .opt_str("title", title.title.as_deref())
        .opt_str("title_size", title.title_size.as_deref())
        .opt_str("title_align", title.title_align.as_deref())
}

fn decode_time(fields: &Fields<'_>) -> Result<Option<WidgetTime>> {
    fields
        .map("time")?
        .map(|time| {
            Ok(WidgetTime {
                live_span: time.opt_str("live_span")?,
            })
        })
        .transpose()
}

fn encode_time(builder: TreeBuilder, time: Option<&WidgetTime>) -> TreeBuilder {
    let Some(time) = time else {
        return builder;
    };
    let map = TreeBuilder::new()
        .opt_str("live_span", time.live_span.as_deref())
        .build();
    builder.map("time", map)
}

fn decode_alert_graph(fields: &Fields<'_>) -> Result<AlertGraphDefinition> {
    Ok(AlertGraphDefinition {
        alert_id: fields.required_str("alert_id")?,
        viz_type: fields.required_str("viz_type")?,
        title: decode_title(fields)?,
        time: decode_time(fields)?,
    })
}

fn encode_alert_graph(d: &AlertGraphDefinition) -> Tree {
    let builder = TreeBuilder::new()
        .str("alert_id", d.alert_id.as_str())
        .str("viz_type", d.viz_type.as_str());
    let builder = encode_title(builder, &d.title);
    encode_time(builder, d.time.as_ref()).build()
}

fn decode_alert_value(fields: &Fields<'_>) -> Result<AlertValueDefinition> {
    Ok(AlertValueDefinition {
        alert_id: fields.required_str("alert_id")?,
        precision: fields.opt_i64("precision")?,
        unit: fields.opt_str("unit")?,
        text_size: fields.opt_str("text_size")?,
        text_align: fields.opt_str("text_align")?,
        title: decode_title(fields)?,
    })
}

fn encode_alert_value(d: &AlertValueDefinition) -> Tree {
    let builder = TreeBuilder::new()
        .str("alert_id", d.alert_id.as_str())
        .opt_value("precision", d.precision)
        .opt_str("unit", d.unit.as_deref())
        .opt_str("text_size", d.text_size.as_deref())
        .opt_str("text_align", d.text_align.as_deref());
    encode_title(builder, &d.title).build()
}

fn decode_check_status(fields: &Fields<'_>) -> Result<CheckStatusDefinition> {
    Ok(CheckStatusDefinition {
        check: fields.required_str("check")?,
        grouping: fields.required_str("grouping")?,
        group: fields.opt_str("group")?,
        tags: fields.string_list("tags")?,
        group_by: fields.string_list("group_by")?,
        title: decode_title(fields)?,
        time: decode_time(fields)?,
    })
}

fn encode_check_status(d: &CheckStatusDefinition) -> Tree {
    let builder = TreeBuilder::new()
        .str("check", d.check.as_str())
        .str("grouping", d.grouping.as_str())
        .opt_str("group", d.group.as_deref())
        .string_list("tags", &d.tags)
        .string_list("group_by", &d.group_by);
    let builder = encode_title(builder, &d.title);
    encode_time(builder, d.time.as_ref()).build()
}

fn decode_event_stream(fields: &Fields<'_>) -> Result<EventStreamDefinition> {
    Ok(EventStreamDefinition {
        query: fields.required_str("query")?,
        event_size: fields.opt_str("event_size")?,
        title: decode_title(fields)?,
        time: decode_time(fields)?,
    })
}

fn encode_event_stream(d: &EventStreamDefinition) -> Tree {
    let builder = TreeBuilder::new()
        .str("query", d.query.as_str())
        .opt_str("event_size", d.event_size.as_deref());
    let builder = encode_title(builder, &d.title);
    encode_time(builder, d.time.as_ref()).build()
}

fn decode_event_timeline(fields: &Fields<'_>) -> Result<EventTimelineDefinition> {
    Ok(EventTimelineDefinition {
        query: fields.required_str("query")?,
        title: decode_title(fields)?,
        time: decode_time(fields)?,
    })
}

fn encode_event_timeline(d: &EventTimelineDefinition) -> Tree {
    let builder = TreeBuilder::new().str("query", d.query.as_str());
    let builder = encode_title(builder, &d.title);
    encode_time(builder, d.time.as_ref()).build()
}

fn decode_free_text(fields: &Fields<'_>) -> Result<FreeTextDefinition> {
    Ok(FreeTextDefinition {
        text: fields.required_str("text")?,
        color: fields.opt_str("color")?,
        font_size: fields.opt_str("font_size")?,
        text_align: fields.opt_str("text_align")?,
    })
}

fn encode_free_text(d: &FreeTextDefinition) -> Tree {
    TreeBuilder::new()
        .str("text", d.text.as_str())
        .opt_str("color", d.color.as_deref())
        .opt_str("font_size", d.font_size.as_deref())
        .opt_str("text_align", d.text_align.as_deref())
        .build()
}

fn decode_iframe(fields: &Fields<'_>) -> Result<IframeDefinition> {
    Ok(IframeDefinition {
        url: fields.required_str("url")?,
    })
}

fn encode_iframe(d: &IframeDefinition) -> Tree {
    TreeBuilder::new().str("url", d.url.as_str()).build()
}

fn decode_image(fields: &Fields<'_>) -> Result<ImageDefinition> {
    Ok(ImageDefinition {
        url: fields.required_str("url")?,
        sizing: fields.opt_str("sizing")?,
        margin: fields.opt_str("margin")?,
    })
}

fn encode_image(d: &ImageDefinition) -> Tree {
    TreeBuilder::new()
        .str("url", d.url.as_str())
        .opt_str("sizing", d.sizing.as_deref())
        .opt_str("margin", d.margin.as_deref())
        .build()
}

fn decode_log_stream(fields: &Fields<'_>) -> Result<LogStreamDefinition> {
    Ok(LogStreamDefinition {
        logset: fields.required_str("logset")?,
        query: fields.opt_str("query")?,
        columns: fields.string_list("columns")?,
        title: decode_title(fields)?,
        time: decode_time(fields)?,
    })
}

fn encode_log_stream(d: &LogStreamDefinition) -> Tree {
    let builder = TreeBuilder::new()
        .str("logset", d.logset.as_str())
        .opt_str("query", d.query.as_deref())
        .string_list("columns", &d.columns);
    let builder = encode_title(builder, &d.title);
    encode_time(builder, d.time.as_ref()).build()
}

fn decode_manage_status(fields: &Fields<'_>) -> Result<ManageStatusDefinition> {
    Ok(ManageStatusDefinition {
        query: fields.required_str("query")?,
        sort: fields.opt_str("sort")?,
        count: fields.opt_i64("count")?,
        start: fields.opt_i64("start")?,
        display_format: fields.opt_str("display_format")?,
        color_preference: fields.opt_str("color_preference")?,
        hide_zero_counts: fields.opt_bool("hide_zero_counts")?,
        title: decode_title(fields)?,
    })
}

fn encode_manage_status(d: &ManageStatusDefinition) -> Tree {
    let builder = TreeBuilder::new()
        .str("query", d.query.as_str())
        .opt_str("sort", d.sort.as_deref())
        .opt_value("count", d.count)
        .opt_value("start", d.start)
        .opt_str("display_format", d.display_format.as_deref())
        .opt_str("color_preference", d.color_preference.as_deref())
        .opt_value("hide_zero_counts", d.hide_zero_counts);
    encode_title(builder, &d.title).build()
}

fn decode_note(fields: &Fields<'_>) -> Result<NoteDefinition> {
    Ok(NoteDefinition {
        content: fields.required_str("content")?,
        background_color: fields.opt_str("background_color")?,
        font_size: fields.opt_str("font_size")?,
        text_align: fields.opt_str("text_align")?,
        show_tick: fields.opt_bool("show_tick")?,
        tick_pos: fields.opt_str("tick_pos")?,
        tick_edge: fields.opt_str("tick_edge")?,
    })
}

fn encode_note(d: &NoteDefinition) -> Tree {
    TreeBuilder::new()
        .str("content", d.content.as_str())
        .opt_str("background_color", d.background_color.as_deref())
        .opt_str("font_size", d.font_size.as_deref())
        .opt_str("text_align", d.text_align.as_deref())
        .opt_value("show_tick", d.show_tick)
        .opt_str("tick_pos", d.tick_pos.as_deref())
        .opt_str("tick_edge", d.tick_edge.as_deref())
        .build()
}

fn decode_query_value(fields: &Fields<'_>) -> Result<QueryValueDefinition> {
    let requests = fields
        .blocks("request")?
        .iter()
        .map(|request| {
            Ok(QueryValueRequest {
                query: decode_request_query(request)?,
                conditional_formats: decode_conditional_formats(request)?,
                aggregator: request.opt_str("aggregator")?,
            })
        })
        .collect::<Result<_>>()?;

    Ok(QueryValueDefinition {
        requests,
        autoscale: fields.opt_bool("autoscale")?,
        custom_unit: fields.opt_str("custom_unit")?,
        precision: fields.opt_i64("precision")?,
        text_align: fields.opt_str("text_align")?,
        title: decode_title(fields)?,
        time: decode_time(fields)?,
    })
}

fn encode_query_value(d: &QueryValueDefinition) -> Tree {
    let requests = d
        .requests
        .iter()
        .map(|request| {
            let builder = encode_request_query(TreeBuilder::new(), &request.query);
            encode_conditional_formats(builder, &request.conditional_formats)
                .opt_str("aggregator", request.aggregator.as_deref())
                .build()
        })
        .collect();
    let builder = TreeBuilder::new()
        .blocks("request", requests)
        .opt_value("autoscale", d.autoscale)
        .opt_str("custom_unit", d.custom_unit.as_deref())
        .opt_value("precision", d.precision)
        .opt_str("text_align", d.text_align.as_deref());
    let builder = encode_title(builder, &d.title);
    encode_time(builder, d.time.as_ref()).build()
}

fn decode_timeseries(fields: &Fields<'_>) -> Result<TimeseriesDefinition> {
    let requests = fields
        .blocks("request")?
        .iter()
        .map(|request| {
            Ok(TimeseriesRequest {
                query: decode_request_query(request)?,
                display_type: request.opt_str("display_type")?,
            })
        })
        .collect::<Result<_>>()?;
    let markers = fields
        .blocks("marker")?
        .iter()
        .map(|marker| {
            Ok(WidgetMarker {
                value: marker.required_str("value")?,
                display_type: marker.opt_str("display_type")?,
                label: marker.opt_str("label")?,
            })
        })
        .collect::<Result<_>>()?;

    Ok(TimeseriesDefinition {
        requests,
        markers,
        title: decode_title(fields)?,
        show_legend: fields.opt_bool("show_legend")?,
        legend_size: fields.opt_str("legend_size")?,
        time: decode_time(fields)?,
    })
}

fn encode_timeseries(d: &TimeseriesDefinition) -> Tree {
    let requests = d
        .requests
        .iter()
        .map(|request| {
            encode_request_query(TreeBuilder::new(), &request.query)
                .opt_str("display_type", request.display_type.as_deref())
                .build()
        })
        .collect();
    let markers = d
        .markers
        .iter()
        .map(|marker| {
            TreeBuilder::new()
                .str("value", marker.value.as_str())
                .opt_str("display_type", marker.display_type.as_deref())
                .opt_str("label", marker.label.as_deref())
                .build()
        })
        .collect();
    let builder = TreeBuilder::new()
        .blocks("request", requests)
        .blocks("marker", markers);
    let builder = encode_title(builder, &d.title)
        .opt_value("show_legend", d.show_legend)
        .opt_str("legend_size", d.legend_size.as_deref());
    encode_time(builder, d.time.as_ref()).build()
}

fn decode_toplist(fields: &Fields<'_>) -> Result<ToplistDefinition> {
    let requests = fields
        .blocks("request")?
        .iter()
        .map(|request| {
            Ok(ToplistRequest {
                query: decode_request_query(request)?,
                conditional_formats: decode_conditional_formats(request)?,
            })
        })
        .collect::<Result<_>>()?;

    Ok(ToplistDefinition {
        requests,
        title: decode_title(fields)?,
        time: decode_time(fields)?,
    })
}

fn encode_toplist(d: &ToplistDefinition) -> Tree {
    let requests = d
        .requests
        .iter()
        .map(|request| {
            let builder = encode_request_query(TreeBuilder::new(), &request.query);
            encode_conditional_formats(builder, &request.conditional_formats).build()
        })
        .collect();
    let builder = TreeBuilder::new().blocks("request", requests);
    let builder = encode_title(builder, &d.title);
    encode_time(builder, d.time.as_ref()).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn decode(kind: WidgetKind, value: &Value) -> Result<LeafDefinition> {
        decode_leaf(kind, &Fields::root(value.as_object().unwrap()))
    }

    #[test]
    fn test_note_with_string_encoded_bool() {
        let value = json!({
            "content": "note text",
            "background_color": "pink",
            "font_size": "14",
            "show_tick": "true",
            "tick_edge": "left",
            "title": "ignored by notes"
        });
        let LeafDefinition::Note(note) = decode(WidgetKind::Note, &value).unwrap() else {
            panic!("expected a note");
        };
        assert_eq!(note.content, "note text");
        assert_eq!(note.font_size.as_deref(), Some("14"));
        assert_eq!(note.show_tick, Some(true));
        assert!(note.text_align.is_none());
    }

    #[test]
    fn test_missing_required_field_path() {
        let err = decode(WidgetKind::AlertGraph, &json!({"alert_id": "895605"})).unwrap_err();
        assert!(matches!(err, Error::MissingRequiredField { .. }));
        assert_eq!(err.path().unwrap().to_string(), "viz_type");
    }

    #[test]
    fn test_group_is_not_a_leaf() {
        let err = decode(WidgetKind::Group, &json!({"layout_type": "ordered"})).unwrap_err();
        assert!(matches!(err, Error::NestedGroup { .. }));
    }

    #[test]
    fn test_timeseries_block_round_trip() {
        let value = json!({
            "request": [
                {"q": "avg:system.cpu.user{app:general} by {env}", "display_type": "line"},
                {"apm_query": [{"index": "trace-search", "compute": {"aggregation": "count"}}], "display_type": "bars"}
            ],
            "marker": [
                {"display_type": "error dashed", "label": " z=6 ", "value": "y = 4"},
                {"display_type": "ok solid", "value": "10 < y < 999"}
            ],
            "title": "Widget Title",
            "show_legend": true,
            "legend_size": "2",
            "time": {"live_span": "1h"}
        });
        let definition = decode(WidgetKind::Timeseries, &value).unwrap();
        assert_eq!(Value::Object(encode_leaf(&definition)), value);
    }

    #[test]
    fn test_query_value_block_round_trip() {
        let value = json!({
            "request": [{
                "q": "avg:system.load.1{env:staging} by {account}",
                "aggregator": "sum",
                "conditional_format": [
                    {"comparator": "<", "value": 2.0, "palette": "white_on_green"},
                    {"comparator": ">", "value": 2.2, "palette": "white_on_red"}
                ]
            }],
            "autoscale": true,
            "custom_unit": "xx",
            "precision": 4,
            "text_align": "right",
            "title": "Widget Title",
            "time": {"live_span": "1h"}
        });
        let definition = decode(WidgetKind::QueryValue, &value).unwrap();
        assert_eq!(Value::Object(encode_leaf(&definition)), value);
    }
}
