//! Schema of the dashboard resource.

use dashform_model::{LayoutType, WidgetKind};

use super::{Attribute, AttributeType, Block};

const TITLE_ALIGN: [&str; 3] = ["center", "left", "right"];

/// Schema of the whole resource.
#[must_use]
pub fn dashboard_schema() -> Block {
    Block::new()
        .attr(
            "title",
            Attribute::required(AttributeType::String).describe("The title of the dashboard."),
        )
        .attr(
            "widget",
            Attribute::optional(AttributeType::blocks(widget_schema()))
                .describe("The list of widgets to display on the dashboard.")
                .conflicts_with(&["widget_json"]),
        )
        .attr(
            "widget_json",
            Attribute::optional(AttributeType::blocks(widget_json_schema()))
                .describe("Widgets given as raw JSON definitions in the API format.")
                .conflicts_with(&["widget"]),
        )
        .attr(
            "layout_type",
            Attribute::required(AttributeType::String)
                .one_of(&LayoutType::ALLOWED)
                .describe("The layout type of the dashboard, either 'free' or 'ordered'."),
        )
        .attr(
            "description",
            Attribute::optional(AttributeType::String).describe("The description of the dashboard."),
        )
        .attr(
            "is_read_only",
            Attribute::optional(AttributeType::Bool)
                .default_value(false)
                .describe("Whether this dashboard is read-only."),
        )
        .attr(
            "template_variable",
            Attribute::optional(AttributeType::blocks(template_variable_schema()))
                .describe("The list of template variables for this dashboard."),
        )
        .attr(
            "notify_list",
            Attribute::optional(AttributeType::strings())
                .describe("The list of handles of users to notify when changes are made to this dashboard."),
        )
        .attr(
            "url",
            Attribute::computed(AttributeType::String).describe("The URL of the dashboard."),
        )
}

fn template_variable_schema() -> Block {
    Block::new()
        .attr(
            "name",
            Attribute::required(AttributeType::String).describe("The name of the variable."),
        )
        .attr(
            "prefix",
            Attribute::optional(AttributeType::String)
                .describe("The tag prefix associated with the variable."),
        )
        .attr(
            "default",
            Attribute::optional(AttributeType::String)
                .describe("The default value for the template variable on dashboard load."),
        )
}

/// Schema of one `widget_json` block.
#[must_use]
pub fn widget_json_schema() -> Block {
    Block::new()
        .attr(
            "definition",
            Attribute::required(AttributeType::String)
                .describe("The widget definition as a JSON document, tagged by `type`."),
        )
        .attr(
            "layout",
            Attribute::optional(AttributeType::Map(layout_schema()))
                .describe("The layout of the widget on a 'free' dashboard."),
        )
}

/// Schema of a top-level widget block: any kind, including `group`.
#[must_use]
pub fn widget_schema() -> Block {
    widget_block(WidgetKind::ALL.into_iter())
}

/// Schema of a widget inside a group. It has no `group_definition`, so a
/// nested group fails validation as an unknown attribute.
#[must_use]
pub fn leaf_widget_schema() -> Block {
    widget_block(WidgetKind::leaves())
}

fn widget_block(kinds: impl Iterator<Item = WidgetKind>) -> Block {
    let block = Block::new().attr(
        "layout",
        Attribute::optional(AttributeType::Map(layout_schema()))
            .describe("The layout of the widget on a 'free' dashboard."),
    );
    kinds.fold(block, |block, kind| {
        block.attr(
            kind.block_name(),
            Attribute::optional(AttributeType::blocks(definition_schema(kind))).max_items(1),
        )
    })
}

fn layout_schema() -> Block {
    Block::new()
        .attr("x", Attribute::required(AttributeType::Float))
        .attr("y", Attribute::required(AttributeType::Float))
        .attr("width", Attribute::required(AttributeType::Float))
        .attr("height", Attribute::required(AttributeType::Float))
}

/// Schema of the `<kind>_definition` block of a widget kind.
#[must_use]
pub fn definition_schema(kind: WidgetKind) -> Block {
    match kind {
        WidgetKind::AlertGraph => titled(
            Block::new()
                .attr("alert_id", Attribute::required(AttributeType::String))
                .attr(
                    "viz_type",
                    Attribute::required(AttributeType::String).one_of(&["timeseries", "toplist"]),
                ),
        )
        .attr("time", time()),
        WidgetKind::AlertValue => titled(
            Block::new()
                .attr("alert_id", Attribute::required(AttributeType::String))
                .attr("precision", Attribute::optional(AttributeType::Int))
                .attr("unit", Attribute::optional(AttributeType::String))
                .attr("text_size", Attribute::optional(AttributeType::String))
                .attr("text_align", align()),
        ),
        WidgetKind::CheckStatus => titled(
            Block::new()
                .attr("check", Attribute::required(AttributeType::String))
                .attr(
                    "grouping",
                    Attribute::required(AttributeType::String).one_of(&["check", "cluster"]),
                )
                .attr("group", Attribute::optional(AttributeType::String))
                .attr("tags", Attribute::optional(AttributeType::strings()))
                .attr("group_by", Attribute::optional(AttributeType::strings())),
        )
        .attr("time", time()),
        WidgetKind::EventStream => titled(
            Block::new()
                .attr("query", Attribute::required(AttributeType::String))
                .attr(
                    "event_size",
                    Attribute::optional(AttributeType::String).one_of(&["s", "l"]),
                ),
        )
        .attr("time", time()),
        WidgetKind::EventTimeline => {
            titled(Block::new().attr("query", Attribute::required(AttributeType::String)))
                .attr("time", time())
        }
        WidgetKind::FreeText => Block::new()
            .attr("text", Attribute::required(AttributeType::String))
            .attr("color", Attribute::optional(AttributeType::String))
            .attr("font_size", Attribute::optional(AttributeType::String))
            .attr("text_align", align()),
        WidgetKind::Group => Block::new()
            .attr(
                "layout_type",
                Attribute::required(AttributeType::String).one_of(&LayoutType::ALLOWED),
            )
            .attr(
                "widget",
                Attribute::required(AttributeType::blocks(leaf_widget_schema()))
                    .describe("The widgets of the group. Groups cannot contain groups."),
            )
            .attr("title", Attribute::optional(AttributeType::String)),
        WidgetKind::Iframe => Block::new().attr("url", Attribute::required(AttributeType::String)),
        WidgetKind::Image => Block::new()
            .attr("url", Attribute::required(AttributeType::String))
            .attr(
                "sizing",
                Attribute::optional(AttributeType::String).one_of(&["zoom", "fit", "center"]),
            )
            .attr(
                "margin",
                Attribute::optional(AttributeType::String).one_of(&["small", "large"]),
            ),
        WidgetKind::LogStream => titled(
            Block::new()
                .attr("logset", Attribute::required(AttributeType::String))
                .attr("query", Attribute::optional(AttributeType::String))
                .attr("columns", Attribute::optional(AttributeType::strings())),
        )
        .attr("time", time()),
        WidgetKind::ManageStatus => titled(
            Block::new()
                .attr("query", Attribute::required(AttributeType::String))
                .attr("sort", Attribute::optional(AttributeType::String))
                .attr("count", Attribute::optional(AttributeType::Int))
                .attr("start", Attribute::optional(AttributeType::Int))
                .attr(
                    "display_format",
                    Attribute::optional(AttributeType::String).one_of(&[
                        "counts",
                        "countsAndList",
                        "list",
                    ]),
                )
                .attr(
                    "color_preference",
                    Attribute::optional(AttributeType::String).one_of(&["background", "text"]),
                )
                .attr("hide_zero_counts", Attribute::optional(AttributeType::Bool)),
        ),
        WidgetKind::Note => Block::new()
            .attr("content", Attribute::required(AttributeType::String))
            .attr("background_color", Attribute::optional(AttributeType::String))
            .attr("font_size", Attribute::optional(AttributeType::String))
            .attr("text_align", align())
            .attr("show_tick", Attribute::optional(AttributeType::Bool))
            .attr("tick_pos", Attribute::optional(AttributeType::String))
            .attr("tick_edge", Attribute::optional(AttributeType::String)),
        WidgetKind::QueryValue => titled(
            Block::new()
                .attr(
                    "request",
                    Attribute::optional(AttributeType::blocks(
                        request_schema()
                            .attr("conditional_format", conditional_formats())
                            .attr(
                                "aggregator",
                                Attribute::optional(AttributeType::String)
                                    .one_of(&["avg", "last", "max", "min", "sum"]),
                            ),
                    )),
                )
                .attr("autoscale", Attribute::optional(AttributeType::Bool))
                .attr("custom_unit", Attribute::optional(AttributeType::String))
                .attr("precision", Attribute::optional(AttributeType::Int))
                .attr("text_align", align()),
        )
        .attr("time", time()),
        WidgetKind::Timeseries => titled(
            Block::new()
                .attr(
                    "request",
                    Attribute::optional(AttributeType::blocks(request_schema().attr(
                        "display_type",
                        Attribute::optional(AttributeType::String).one_of(&["area", "bars", "line"]),
                    ))),
                )
                .attr(
                    "marker",
                    Attribute::optional(AttributeType::blocks(marker_schema())),
                ),
        )
        .attr("show_legend", Attribute::optional(AttributeType::Bool))
        .attr("legend_size", Attribute::optional(AttributeType::String))
        .attr("time", time()),
        WidgetKind::Toplist => titled(Block::new().attr(
            "request",
            Attribute::optional(AttributeType::blocks(
                request_schema().attr("conditional_format", conditional_formats()),
            )),
        ))
        .attr("time", time()),
    }
}

fn titled(block: Block) -> Block {
    block
        .attr("title", Attribute::optional(AttributeType::String))
        .attr("title_size", Attribute::optional(AttributeType::String))
        .attr("title_align", align())
}

fn align() -> Attribute {
    Attribute::optional(AttributeType::String).one_of(&TITLE_ALIGN)
}

fn time() -> Attribute {
    Attribute::optional(AttributeType::Map(
        Block::new().attr("live_span", Attribute::optional(AttributeType::String)),
    ))
}

fn marker_schema() -> Block {
    Block::new()
        .attr("value", Attribute::required(AttributeType::String))
        .attr("display_type", Attribute::optional(AttributeType::String))
        .attr("label", Attribute::optional(AttributeType::String))
}

fn conditional_formats() -> Attribute {
    Attribute::optional(AttributeType::blocks(
        Block::new()
            .attr(
                "comparator",
                Attribute::required(AttributeType::String).one_of(&[">", ">=", "<", "<="]),
            )
            .attr("value", Attribute::required(AttributeType::Float))
            .attr("palette", Attribute::required(AttributeType::String))
            .attr("custom_bg_color", Attribute::optional(AttributeType::String))
            .attr("custom_fg_color", Attribute::optional(AttributeType::String))
            .attr("image_url", Attribute::optional(AttributeType::String))
            .attr("hide_value", Attribute::optional(AttributeType::Bool))
            .attr("timeframe", Attribute::optional(AttributeType::String)),
    ))
}

/// The query alternatives every request block offers.
fn request_schema() -> Block {
    Block::new()
        .attr("q", Attribute::optional(AttributeType::String))
        .attr("apm_query", apm_or_log_query())
        .attr("log_query", apm_or_log_query())
        .attr("process_query", process_query())
}

fn apm_or_log_query() -> Attribute {
    let compute = Block::new()
        .attr("aggregation", Attribute::required(AttributeType::String))
        .attr("facet", Attribute::optional(AttributeType::String))
        .attr("interval", Attribute::optional(AttributeType::Int));
    let search = Block::new().attr("query", Attribute::required(AttributeType::String));
    let sort = Block::new()
        .attr("aggregation", Attribute::required(AttributeType::String))
        .attr(
            "order",
            Attribute::required(AttributeType::String).one_of(&["asc", "desc"]),
        )
        .attr("facet", Attribute::optional(AttributeType::String));
    let group_by = Block::new()
        .attr("facet", Attribute::required(AttributeType::String))
        .attr("limit", Attribute::optional(AttributeType::Int))
        .attr("sort", Attribute::optional(AttributeType::Map(sort)));

    Attribute::optional(AttributeType::blocks(
        Block::new()
            .attr("index", Attribute::required(AttributeType::String))
            .attr("compute", Attribute::required(AttributeType::Map(compute)))
            .attr("search", Attribute::optional(AttributeType::Map(search)))
            .attr("group_by", Attribute::optional(AttributeType::blocks(group_by))),
    ))
    .max_items(1)
}

fn process_query() -> Attribute {
    Attribute::optional(AttributeType::blocks(
        Block::new()
            .attr("metric", Attribute::required(AttributeType::String))
            .attr("search_by", Attribute::optional(AttributeType::String))
            .attr("filter_by", Attribute::optional(AttributeType::strings()))
            .attr("limit", Attribute::optional(AttributeType::Int)),
    ))
    .max_items(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_schema_covers_every_kind() {
        let schema = widget_schema();
        for kind in WidgetKind::ALL {
            assert!(schema.get(kind.block_name()).is_some(), "{kind:?}");
        }
    }

    #[test]
    fn test_leaf_schema_has_no_group() {
        let schema = leaf_widget_schema();
        assert!(schema.get("group_definition").is_none());
        for kind in WidgetKind::leaves() {
            assert!(schema.get(kind.block_name()).is_some(), "{kind:?}");
        }
    }

    #[test]
    fn test_schemas_are_fresh_values() {
        assert_eq!(dashboard_schema(), dashboard_schema());
        assert_eq!(
            dashboard_schema().get("is_read_only").unwrap().default,
            Some(serde_json::Value::Bool(false))
        );
    }
}
