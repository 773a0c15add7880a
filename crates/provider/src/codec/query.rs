//! Query fragments shared by request blocks.

use dashform_model::{
    ApmOrLogQuery, ConditionalFormat, Error, GroupBySort, ProcessQuery, QueryCompute,
    QueryGroupBy, QuerySearch, RequestQuery, Result,
};

use super::fields::{Fields, Tree, TreeBuilder};

/// Decodes the one query a request block carries.
///
/// Exactly one of `q`, `apm_query`, `log_query` and `process_query` must be
/// set. None fails with [`Error::NoQuerySpecified`]; several fail with
/// [`Error::AmbiguousQuery`] naming each of them.
pub fn decode_request_query(fields: &Fields<'_>) -> Result<RequestQuery> {
    let populated: Vec<&str> = RequestQuery::FIELDS
        .into_iter()
        .filter(|field| fields.populated(field))
        .collect();

    match populated.as_slice() {
        [] => Err(Error::NoQuerySpecified {
            path: fields.path().clone(),
        }),
        ["q"] => Ok(RequestQuery::Metric(fields.required_str("q")?)),
        ["apm_query"] => Ok(RequestQuery::Apm(decode_apm_or_log_query(
            &fields.required_block("apm_query")?,
        )?)),
        ["log_query"] => Ok(RequestQuery::Log(decode_apm_or_log_query(
            &fields.required_block("log_query")?,
        )?)),
        ["process_query"] => Ok(RequestQuery::Process(decode_process_query(
            &fields.required_block("process_query")?,
        )?)),
        _ => Err(Error::AmbiguousQuery {
            path: fields.path().clone(),
            alternatives: populated.iter().map(ToString::to_string).collect(),
        }),
    }
}

/// Writes a request's query into its block.
#[must_use]
pub fn encode_request_query(builder: TreeBuilder, query: &RequestQuery) -> TreeBuilder {
    match query {
        RequestQuery::Metric(q) => builder.str("q", q.as_str()),
        RequestQuery::Apm(apm) => builder.single_block("apm_query", encode_apm_or_log_query(apm)),
        RequestQuery::Log(log) => builder.single_block("log_query", encode_apm_or_log_query(log)),
        RequestQuery::Process(process) => {
            builder.single_block("process_query", encode_process_query(process))
        }
    }
}

fn decode_apm_or_log_query(fields: &Fields<'_>) -> Result<ApmOrLogQuery> {
    let compute = fields.required_map("compute")?;
    let search = fields
        .map("search")?
        .map(|search| {
            Ok::<_, Error>(QuerySearch {
                query: search.required_str("query")?,
            })
        })
        .transpose()?;

    Ok(ApmOrLogQuery {
        index: fields.required_str("index")?,
        compute: QueryCompute {
            aggregation: compute.required_str("aggregation")?,
            facet: compute.opt_str("facet")?,
            interval: compute.opt_i64("interval")?,
        },
        search,
        group_by: fields
            .blocks("group_by")?
            .iter()
            .map(decode_group_by)
            .collect::<Result<_>>()?,
    })
}

fn decode_group_by(fields: &Fields<'_>) -> Result<QueryGroupBy> {
    let sort = fields
        .map("sort")?
        .map(|sort| {
            Ok::<_, Error>(GroupBySort {
                aggregation: sort.required_str("aggregation")?,
                order: sort.required_str("order")?,
                facet: sort.opt_str("facet")?,
            })
        })
        .transpose()?;

    Ok(QueryGroupBy {
        facet: fields.required_str("facet")?,
        limit: fields.opt_i64("limit")?,
        sort,
    })
}

// Map attributes hold strings, so `interval` goes back as a string.
fn encode_apm_or_log_query(query: &ApmOrLogQuery) -> Tree {
    let compute = TreeBuilder::new()
        .str("aggregation", query.compute.aggregation.as_str())
        .opt_str("facet", query.compute.facet.as_deref())
        .opt_str("interval", query.compute.interval.map(|i| i.to_string()))
        .build();
    let search = query
        .search
        .as_ref()
        .map(|search| TreeBuilder::new().str("query", search.query.as_str()).build())
        .unwrap_or_default();
    let group_by = query
        .group_by
        .iter()
        .map(|group_by| {
            let sort = group_by
                .sort
                .as_ref()
                .map(|sort| {
                    TreeBuilder::new()
                        .str("aggregation", sort.aggregation.as_str())
                        .str("order", sort.order.as_str())
                        .opt_str("facet", sort.facet.as_deref())
                        .build()
                })
                .unwrap_or_default();
            TreeBuilder::new()
                .str("facet", group_by.facet.as_str())
                .opt_value("limit", group_by.limit)
                .map("sort", sort)
                .build()
        })
        .collect();

    TreeBuilder::new()
        .str("index", query.index.as_str())
        .map("compute", compute)
        .map("search", search)
        .blocks("group_by", group_by)
        .build()
}

fn decode_process_query(fields: &Fields<'_>) -> Result<ProcessQuery> {
    Ok(ProcessQuery {
        metric: fields.required_str("metric")?,
        search_by: fields.opt_str("search_by")?,
        filter_by: fields.string_list("filter_by")?,
        limit: fields.opt_i64("limit")?,
    })
}

fn encode_process_query(query: &ProcessQuery) -> Tree {
    TreeBuilder::new()
        .str("metric", query.metric.as_str())
        .opt_str("search_by", query.search_by.as_deref())
        .string_list("filter_by", &query.filter_by)
        .opt_value("limit", query.limit)
        .build()
}

/// Decodes the `conditional_format` blocks of a request.
pub fn decode_conditional_formats(fields: &Fields<'_>) -> Result<Vec<ConditionalFormat>> {
    fields
        .blocks("conditional_format")?
        .iter()
        .map(|format| {
            Ok(ConditionalFormat {
                comparator: format.required_str("comparator")?,
                value: format.required_f64("value")?,
                palette: format.required_str("palette")?,
                custom_bg_color: format.opt_str("custom_bg_color")?,
                custom_fg_color: format.opt_str("custom_fg_color")?,
                image_url: format.opt_str("image_url")?,
                hide_value: format.opt_bool("hide_value")?,
                timeframe: format.opt_str("timeframe")?,
            })
        })
        .collect()
}

/// Writes `conditional_format` blocks, skipping the attribute when empty.
#[must_use]
pub fn encode_conditional_formats(builder: TreeBuilder, formats: &[ConditionalFormat]) -> TreeBuilder {
    let blocks = formats
        .iter()
        .map(|format| {
            TreeBuilder::new()
                .str("comparator", format.comparator.as_str())
                .value("value", format.value)
                .str("palette", format.palette.as_str())
                .opt_str("custom_bg_color", format.custom_bg_color.as_deref())
                .opt_str("custom_fg_color", format.custom_fg_color.as_deref())
                .opt_str("image_url", format.image_url.as_deref())
                .opt_value("hide_value", format.hide_value)
                .opt_str("timeframe", format.timeframe.as_deref())
                .build()
        })
        .collect();
    builder.blocks("conditional_format", blocks)
}
