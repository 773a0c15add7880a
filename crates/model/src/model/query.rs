//! Query fragments and the request shapes that embed them.

use serde::{Deserialize, Serialize};

/// Time frame of a widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetTime {
    /// Relative span such as `1h` or `1w`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_span: Option<String>,
}

/// Horizontal marker on a timeseries graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetMarker {
    /// Value or range, e.g. `y = 15` or `10 < y < 20`
    pub value: String,
    /// Marker style, e.g. `error dashed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_type: Option<String>,
    /// Marker label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Coloring rule applied to a value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionalFormat {
    /// `>`, `>=`, `<` or `<=`
    pub comparator: String,
    /// Threshold
    pub value: f64,
    /// Color palette applied when the rule matches
    pub palette: String,
    /// Background color for the `custom_bg` palette
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_bg_color: Option<String>,
    /// Foreground color for the `custom_text` palette
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fg_color: Option<String>,
    /// Image shown instead of the value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Hide the value when the rule matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_value: Option<bool>,
    /// Time frame the rule applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
}

/// Aggregation of an APM or log query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryCompute {
    /// Aggregation function, e.g. `count` or `avg`
    pub aggregation: String,
    /// Facet the aggregation applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facet: Option<String>,
    /// Roll-up interval in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
}

/// Search filter of an APM or log query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySearch {
    /// Search expression
    pub query: String,
}

/// Ordering applied to a group-by.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupBySort {
    /// Aggregation the sort is based on
    pub aggregation: String,
    /// `asc` or `desc`
    pub order: String,
    /// Facet the sort is based on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facet: Option<String>,
}

/// Grouping of an APM or log query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryGroupBy {
    /// Facet to group by
    pub facet: String,
    /// Maximum number of groups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    /// Ordering of the groups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<GroupBySort>,
}

/// Structured query against APM traces or logs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApmOrLogQuery {
    /// Index to query
    pub index: String,
    /// Aggregation
    pub compute: QueryCompute,
    /// Search filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<QuerySearch>,
    /// Groupings, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<QueryGroupBy>,
}

/// Query against live processes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessQuery {
    /// Process metric
    pub metric: String,
    /// Free-text process search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_by: Option<String>,
    /// Tags used to filter the processes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter_by: Vec<String>,
    /// Maximum number of processes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

/// The single query carried by a request slot.
///
/// Serialized flattened into the request, as one of the `q`, `apm_query`,
/// `log_query` or `process_query` keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestQuery {
    /// Metric query string
    #[serde(rename = "q")]
    Metric(String),
    /// APM query
    #[serde(rename = "apm_query")]
    Apm(ApmOrLogQuery),
    /// Log query
    #[serde(rename = "log_query")]
    Log(ApmOrLogQuery),
    /// Process query
    #[serde(rename = "process_query")]
    Process(ProcessQuery),
}

impl RequestQuery {
    /// Every query attribute, in dispatch priority order.
    pub const FIELDS: [&'static str; 4] = ["q", "apm_query", "log_query", "process_query"];

    /// The attribute this query is carried in.
    #[must_use]
    pub const fn field_name(&self) -> &'static str {
        match self {
            Self::Metric(_) => "q",
            Self::Apm(_) => "apm_query",
            Self::Log(_) => "log_query",
            Self::Process(_) => "process_query",
        }
    }
}

/// Request of a `timeseries` widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesRequest {
    /// The query
    #[serde(flatten)]
    pub query: RequestQuery,
    /// `area`, `bars` or `line`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_type: Option<String>,
}

impl TimeseriesRequest {
    /// A request with only a query.
    #[must_use]
    pub const fn new(query: RequestQuery) -> Self {
        Self {
            query,
            display_type: None,
        }
    }
}

/// Request of a `query_value` widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryValueRequest {
    /// The query
    #[serde(flatten)]
    pub query: RequestQuery,
    /// Coloring rules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditional_formats: Vec<ConditionalFormat>,
    /// `avg`, `last`, `max`, `min` or `sum`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregator: Option<String>,
}

/// Request of a `toplist` widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToplistRequest {
    /// The query
    #[serde(flatten)]
    pub query: RequestQuery,
    /// Coloring rules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditional_formats: Vec<ConditionalFormat>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metric_request_flattens_query() {
        let request = TimeseriesRequest {
            query: RequestQuery::Metric("avg:system.cpu.user{*}".to_string()),
            display_type: Some("line".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"q": "avg:system.cpu.user{*}", "display_type": "line"})
        );
    }

    #[test]
    fn test_log_request_deserializes() {
        let request: ToplistRequest = serde_json::from_value(json!({
            "log_query": {
                "index": "main",
                "compute": {"aggregation": "count", "interval": 3_600_000},
                "group_by": [{"facet": "host", "limit": 10}]
            }
        }))
        .unwrap();

        let RequestQuery::Log(query) = &request.query else {
            panic!("expected a log query, got {:?}", request.query);
        };
        assert_eq!(query.index, "main");
        assert_eq!(query.compute.interval, Some(3_600_000));
        assert_eq!(query.group_by[0].limit, Some(10));
        assert!(request.conditional_formats.is_empty());
    }

    #[test]
    fn test_field_names_follow_priority() {
        let query = RequestQuery::Process(ProcessQuery::default());
        assert_eq!(query.field_name(), RequestQuery::FIELDS[3]);
    }
}
