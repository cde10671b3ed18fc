//! State transition graph.

use std::collections::BTreeMap;

use bm_types::{MatrixRow, Phase};
use serde::Serialize;
use tracing::debug;

/// One outgoing edge of a start state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionEdge {
    pub end_state: String,
    pub phase: Phase,
}

/// `start_state → edges`, edges in row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TransitionGraph {
    pub edges: BTreeMap<String, Vec<TransitionEdge>>,
}

impl TransitionGraph {
    pub fn edges_from(&self, start_state: &str) -> &[TransitionEdge] {
        match self.edges.get(start_state) {
            Some(edges) => edges,
            None => &[],
        }
    }

    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}

/// Build the transition graph, optionally limited to one component.
pub fn transition_graph(rows: &[MatrixRow], component_id: Option<&str>) -> TransitionGraph {
    let mut graph = TransitionGraph::default();
    for row in rows {
        if component_id.is_some_and(|c| c != row.component_id) {
            continue;
        }
        graph
            .edges
            .entry(row.context.start_state.clone())
            .or_default()
            .push(TransitionEdge {
                end_state: row.expect.end_state.clone(),
                phase: row.phase,
            });
    }
    debug!(
        states = graph.edges.len(),
        edges = graph.edge_count(),
        "built transition graph"
    );
    graph
}
