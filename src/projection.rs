//! Conversions between a [`Document`] and its [`Graph`] projection.

use std::collections::HashSet;

use tracing::debug;

use crate::config::LayoutConfig;
use crate::graph::{Graph, GraphEdge, GraphNode, TableData};
use crate::identity::edge_id;
use crate::model::{Document, Ref, Table};

pub fn build_graph(document: &Document) -> Graph {
    build_graph_with(document, &LayoutConfig::default())
}

/// Project a validated document. Never fails and does not check that refs
/// name existing tables.
pub fn build_graph_with(document: &Document, layout: &LayoutConfig) -> Graph {
    let nodes = document
        .tables
        .iter()
        .enumerate()
        .map(|(idx, table)| GraphNode {
            id: table.name.clone(),
            position: table.position.unwrap_or_else(|| layout.position(idx)),
            data: TableData {
                columns: table.columns.clone(),
                background_color: table.background_color.clone(),
                text_color: table.text_color.clone(),
            },
        })
        .collect();

    let mut seen = HashSet::new();
    let mut edges = Vec::with_capacity(document.refs.len());
    for r in &document.refs {
        let id = edge_id(&r.source.table, &r.target.table);
        if !seen.insert(id.clone()) {
            debug!(edge = %id, "merging duplicate ref into existing edge");
            continue;
        }
        edges.push(GraphEdge {
            id,
            source: r.source.table.clone(),
            target: r.target.table.clone(),
            data: r.clone(),
        });
    }

    Graph { nodes, edges }
}

/// Turn the current graph back into a document. Node order becomes table
/// order and every table carries its live position.
pub fn collapse_graph(graph: &Graph) -> Document {
    let tables = graph
        .nodes
        .iter()
        .map(|node| Table {
            name: node.id.clone(),
            columns: node.data.columns.clone(),
            position: Some(node.position),
            background_color: node.data.background_color.clone(),
            text_color: node.data.text_color.clone(),
        })
        .collect();
    let refs = graph
        .edges
        .iter()
        .map(|edge| Ref {
            source: edge.data.source.clone(),
            target: edge.data.target.clone(),
        })
        .collect();
    Document { tables, refs }
}
