//! Graph and field definitions (`config` output)

use super::graphs::{Graph, GraphPlan, Series};
use super::PluginOutput;
use crate::error::Result;

const GRAPH_CATEGORY: &str = "smart home";

/// Print the definition of every graph in the plan
///
/// `host_name` is Munin's host override; when set it is printed last.
pub fn emit_config(
    plan: &GraphPlan<'_>,
    host_name: Option<&str>,
    out: &mut dyn PluginOutput,
) -> Result<()> {
    for (index, graph) in plan.graphs.iter().enumerate() {
        if index > 0 {
            out.blank()?;
        }
        emit_graph(graph, out)?;
    }

    if let Some(host_name) = host_name {
        out.blank()?;
        out.line(&format!("host_name {host_name}"))?;
    }

    Ok(())
}

fn emit_graph(graph: &Graph<'_>, out: &mut dyn PluginOutput) -> Result<()> {
    out.line(&format!("multigraph {}", graph.name))?;
    out.line(&format!("graph_title {}", graph.title))?;
    out.line(&format!("graph_vlabel {}", graph.vlabel))?;
    out.line(&format!("graph_category {GRAPH_CATEGORY}"))?;
    out.line("graph_scale no")?;

    let fields: Vec<String> = graph.series.iter().map(Series::field).collect();

    if let Some(total) = &graph.total {
        out.line(&format!("graph_order {total} {}", fields.join(" ")))?;
    }

    for (series, field) in graph.series.iter().zip(&fields) {
        emit_field(series, field, graph.is_detail(), out)?;
    }

    if let Some(total) = &graph.total {
        // ADDNAN treats a missing device value as zero instead of poisoning the sum
        let cdef = format!(
            "{}{}",
            fields.join(","),
            ",ADDNAN".repeat(fields.len().saturating_sub(1))
        );
        out.line(&format!("{total}.label total"))?;
        out.line(&format!("{total}.cdef {cdef}"))?;
        out.line(&format!("{total}.min 0"))?;
    }

    Ok(())
}

fn emit_field(
    series: &Series<'_>,
    field: &str,
    detail: bool,
    out: &mut dyn PluginOutput,
) -> Result<()> {
    let device = series.device;
    let attrs = series.metric.attributes(detail);

    let label = if detail {
        attrs.detail_label
    } else {
        device.display_name.as_str()
    };

    out.line(&format!("{field}.label {label}"))?;
    out.line(&format!("{field}.type {}", attrs.field_type))?;
    out.line(&format!("{field}.graph LINE"))?;

    let bounds = [
        ("min", attrs.min),
        ("max", attrs.max),
        ("warning", attrs.warning),
        ("critical", attrs.critical),
    ];
    for (attribute, value) in bounds {
        if let Some(value) = value {
            out.line(&format!("{field}.{attribute} {value}"))?;
        }
    }

    out.line(&format!(
        "{field}.info {} [{} - {}]",
        attrs.info, device.model, device.identifier
    ))?;

    Ok(())
}
