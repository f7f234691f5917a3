//! Weighted call graph construction.
//!
//! Nodes are every function that appeared on a counted stack. Edges connect
//! adjacent frames (caller -> callee) and carry the volume of the samples that
//! passed through them. A caller/callee pair is counted at most once per sample.

use crate::aggregator::ranker::{rank, RankBy};
use crate::aggregator::stats::{aggregate, selected_volume, AccountingMode, Aggregation, Stat};
use crate::parser::schema::{FunctionId, Profile};
use crate::utils::config::{EDGE_WIDTH_SCALE, MIN_EDGE_WIDTH, MIN_FONT_SIZE, TOP_EMPHASIS};
use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// A function in the call graph
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: FunctionId,
    pub name: String,
    pub flat: Stat,
    pub cumulative: Stat,
    pub flat_percentage: Option<f64>,
    pub cumulative_percentage: Option<f64>,

    /// The node calls something, so its cumulative value is shown separately
    pub has_callees: bool,

    /// Within the top flat ranking
    pub emphasized: bool,

    pub font_size: f64,
}

/// A caller -> callee edge
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub caller: FunctionId,
    pub callee: FunctionId,
    pub bytes: i64,
    pub width: f64,
}

/// Renderer-independent call graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphDescription {
    pub mode: AccountingMode,
    pub total_bytes: i64,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Build the call graph for `profile`
///
/// **Public** - main entry point for graph construction
pub fn build_graph(profile: &Profile, mode: AccountingMode) -> GraphDescription {
    let aggregation = aggregate(profile, mode);
    build_graph_from(profile, &aggregation)
}

/// Build the call graph from an aggregation computed earlier
///
/// **Public** - lets callers share one aggregation between reports
pub fn build_graph_from(profile: &Profile, aggregation: &Aggregation) -> GraphDescription {
    let (edge_volumes, callers) = accumulate_edges(profile, aggregation.mode);

    // Graph highlighting goes by flat rank alone, so leaves with zero or
    // negative net volume are still marked when they place in the top ranks
    let emphasized: HashSet<FunctionId> = rank(aggregation, RankBy::Flat)
        .into_iter()
        .filter(|entry| {
            entry.rank <= TOP_EMPHASIS && aggregation.flat.contains_key(&entry.function_id)
        })
        .map(|entry| entry.function_id)
        .collect();

    let nodes: Vec<GraphNode> = aggregation
        .cumulative
        .iter()
        .map(|(&id, &cumulative)| {
            let flat = aggregation.flat_of(id);
            let flat_percentage = aggregation.percentage(flat.bytes);
            GraphNode {
                id,
                name: profile.functions.display_name(id).into_owned(),
                flat,
                cumulative,
                flat_percentage,
                cumulative_percentage: aggregation.percentage(cumulative.bytes),
                has_callees: callers.contains(&id),
                emphasized: emphasized.contains(&id),
                font_size: flat_percentage.unwrap_or(0.0).max(MIN_FONT_SIZE),
            }
        })
        .collect();

    let edges: Vec<GraphEdge> = edge_volumes
        .into_iter()
        .map(|((caller, callee), bytes)| GraphEdge {
            caller,
            callee,
            bytes,
            width: edge_width(bytes, aggregation.total.bytes),
        })
        .collect();

    info!(
        "Built call graph with {} nodes and {} edges",
        nodes.len(),
        edges.len()
    );

    GraphDescription {
        mode: aggregation.mode,
        total_bytes: aggregation.total.bytes,
        nodes,
        edges,
    }
}

/// Sum sample volume onto caller -> callee pairs, walking each stack root first
///
/// Returns the edge volumes and the set of frames that call something.
fn accumulate_edges(
    profile: &Profile,
    mode: AccountingMode,
) -> (BTreeMap<(FunctionId, FunctionId), i64>, BTreeSet<FunctionId>) {
    let mut edges: BTreeMap<(FunctionId, FunctionId), i64> = BTreeMap::new();
    let mut callers: BTreeSet<FunctionId> = BTreeSet::new();
    let mut seen: HashSet<(FunctionId, FunctionId)> = HashSet::new();

    for sample in &profile.samples {
        let Some(volume) = selected_volume(sample, mode) else {
            continue;
        };

        seen.clear();
        // stack is leaf-first, so stack[i] calls stack[i - 1]
        for pair in sample.stack.windows(2).rev() {
            let edge = (pair[1], pair[0]);
            if seen.insert(edge) {
                *edges.entry(edge).or_insert(0) += volume.bytes;
            }
            callers.insert(edge.0);
        }
    }

    debug!("Accumulated {} distinct call edges", edges.len());
    (edges, callers)
}

fn edge_width(bytes: i64, total_bytes: i64) -> f64 {
    if total_bytes == 0 {
        return MIN_EDGE_WIDTH;
    }
    (bytes as f64 * EDGE_WIDTH_SCALE / total_bytes as f64).max(MIN_EDGE_WIDTH)
}

impl GraphDescription {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: FunctionId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, caller: FunctionId, callee: FunctionId) -> Option<&GraphEdge> {
        self.edges
            .iter()
            .find(|e| e.caller == caller && e.callee == callee)
    }

    /// Render as a Graphviz `digraph`
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph G {\n");

        for node in &self.nodes {
            dot.push_str(&format!(
                "\tnode{} [label=\"{}\\r{} ({})\\r",
                node.id,
                escape_label(&node.name),
                node.flat.bytes,
                format_percentage(node.flat_percentage)
            ));
            if node.has_callees {
                dot.push_str(&format!(
                    "{} ({})\\r",
                    node.cumulative.bytes,
                    format_percentage(node.cumulative_percentage)
                ));
            }
            dot.push_str(&format!("\";fontsize={:.0};shape=box;", node.font_size));
            if node.emphasized {
                dot.push_str("color=red;");
            }
            dot.push_str("];\n");
        }

        for edge in &self.edges {
            dot.push_str(&format!(
                "\tnode{}->node{} [style=\"setlinewidth({:.2})\" label={}];\n",
                edge.caller, edge.callee, edge.width, edge.bytes
            ));
        }

        dot.push_str("}\n");
        dot
    }
}

fn format_percentage(value: Option<f64>) -> String {
    match value {
        Some(pct) => format!("{:.2}%", pct),
        None => "n/a".to_string(),
    }
}

fn escape_label(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "'")
}
