use serde::{Deserialize, Serialize};

use crate::error::PatchError;
use crate::identity::edge_id;
use crate::model::{Column, Position, Ref};

/// Table payload carried by a node: everything but the name and position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Table name.
    pub id: String,
    pub position: Position,
    pub data: TableData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Endpoint-derived id, fixed at creation. It is not updated when a
    /// table is renamed; `data` is.
    pub id: String,
    pub source: String,
    pub target: String,
    pub data: Ref,
}

/// Node/edge collections handed to the diagram widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// A single interaction event from the diagram widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GraphPatch {
    NodeMoved {
        id: String,
        position: Position,
    },
    NodeAdded {
        id: String,
        position: Position,
        #[serde(default)]
        data: TableData,
    },
    NodeRenamed {
        id: String,
        new_id: String,
    },
    /// Removes the node and every edge touching it.
    NodeRemoved {
        id: String,
    },
    /// Connects two nodes. Connecting an already connected pair is a no-op.
    EdgeAdded {
        source: String,
        target: String,
    },
    EdgeRemoved {
        id: String,
    },
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    fn has_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Edges with at least one endpoint that is not a node of this graph.
    pub fn unresolved_edges(&self) -> Vec<&GraphEdge> {
        self.edges
            .iter()
            .filter(|e| !self.has_node(&e.source) || !self.has_node(&e.target))
            .collect()
    }

    /// Apply a patch in place. A rejected patch leaves the graph untouched.
    pub fn apply(&mut self, patch: GraphPatch) -> Result<(), PatchError> {
        match patch {
            GraphPatch::NodeMoved { id, position } => {
                if !position.is_finite() {
                    return Err(PatchError::NonFinitePosition(id));
                }
                let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) else {
                    return Err(PatchError::UnknownNode(id));
                };
                node.position = position;
            }
            GraphPatch::NodeAdded { id, position, data } => {
                if id.is_empty() {
                    return Err(PatchError::EmptyNodeId);
                }
                if self.has_node(&id) {
                    return Err(PatchError::DuplicateNode(id));
                }
                if !position.is_finite() {
                    return Err(PatchError::NonFinitePosition(id));
                }
                if data.columns.iter().any(|c| c.name.is_empty()) {
                    return Err(PatchError::EmptyColumnName(id));
                }
                self.nodes.push(GraphNode { id, position, data });
            }
            GraphPatch::NodeRenamed { id, new_id } => {
                if new_id.is_empty() {
                    return Err(PatchError::EmptyNodeId);
                }
                if !self.has_node(&id) {
                    return Err(PatchError::UnknownNode(id));
                }
                if new_id == id {
                    return Ok(());
                }
                if self.has_node(&new_id) {
                    return Err(PatchError::DuplicateNode(new_id));
                }
                for node in self.nodes.iter_mut().filter(|n| n.id == id) {
                    node.id = new_id.clone();
                }
                for edge in &mut self.edges {
                    if edge.source == id {
                        edge.source = new_id.clone();
                        edge.data.source.table = new_id.clone();
                    }
                    if edge.target == id {
                        edge.target = new_id.clone();
                        edge.data.target.table = new_id.clone();
                    }
                }
            }
            GraphPatch::NodeRemoved { id } => {
                let before = self.nodes.len();
                self.nodes.retain(|n| n.id != id);
                if self.nodes.len() == before {
                    return Err(PatchError::UnknownNode(id));
                }
                self.edges.retain(|e| e.source != id && e.target != id);
            }
            GraphPatch::EdgeAdded { source, target } => {
                if !self.has_node(&source) {
                    return Err(PatchError::MissingEndpoint(source));
                }
                if !self.has_node(&target) {
                    return Err(PatchError::MissingEndpoint(target));
                }
                if self
                    .edges
                    .iter()
                    .any(|e| e.source == source && e.target == target)
                {
                    return Ok(());
                }
                let id = edge_id(&source, &target);
                self.release_edge_id(&id);
                let data = Ref::new(source.as_str(), target.as_str());
                self.edges.push(GraphEdge {
                    id,
                    source,
                    target,
                    data,
                });
            }
            GraphPatch::EdgeRemoved { id } => {
                let before = self.edges.len();
                self.edges.retain(|e| e.id != id);
                if self.edges.len() == before {
                    return Err(PatchError::UnknownEdge(id));
                }
            }
        }
        Ok(())
    }

    /// Frees `id` when it is held by an edge whose endpoints were renamed
    /// away from it. That edge takes the id of its current endpoints, which may
    /// displace another stale edge in turn. A stale edge whose endpoints are
    /// already connected is merged into that connection.
    fn release_edge_id(&mut self, id: &str) {
        let Some(mut pos) = self.edges.iter().position(|e| e.id == id) else {
            return;
        };
        loop {
            let natural = edge_id(&self.edges[pos].source, &self.edges[pos].target);
            let holder = self
                .edges
                .iter()
                .enumerate()
                .position(|(idx, e)| idx != pos && e.id == natural);
            match holder {
                None => {
                    self.edges[pos].id = natural;
                    return;
                }
                Some(other)
                    if self.edges[other].source == self.edges[pos].source
                        && self.edges[other].target == self.edges[pos].target =>
                {
                    self.edges.remove(pos);
                    return;
                }
                Some(other) => {
                    self.edges[pos].id = natural;
                    pos = other;
                }
            }
        }
    }
}

/// Reducer form of [`Graph::apply`].
pub fn apply_patch(mut graph: Graph, patch: GraphPatch) -> Result<Graph, PatchError> {
    graph.apply(patch)?;
    Ok(graph)
}
