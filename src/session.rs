//! Editing session: owns the text view and the graph view of one sketch and
//! keeps them in step through three reducers.
//!
//! - [`Session::apply_text_change`] rebuilds the graph from text, all or nothing.
//! - [`Session::apply_graph_patch`] edits the graph; the text is left alone.
//! - [`Session::publish`] writes the graph back as canonical text.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::codec::{decode, encode_with};
use crate::config::{Config, LayoutConfig};
use crate::error::{SessionError, ValidationErrors, ValidationIssue};
use crate::graph::{Graph, GraphEdge, GraphPatch};
use crate::model::Document;
use crate::projection::{build_graph_with, collapse_graph};
use crate::schema::validate;

/// Decode, validate and project `text`.
pub fn load(text: &str, layout: &LayoutConfig) -> Result<(Document, Graph), SessionError> {
    let value = decode(text)?;
    let document = validate(&value)?;
    check_unique_names(&document)?;
    let graph = build_graph_with(&document, layout);
    Ok((document, graph))
}

/// Table names key the graph, so a repeated name cannot be projected.
pub fn check_unique_names(document: &Document) -> Result<(), ValidationErrors> {
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    let mut issues = Vec::new();
    for (idx, table) in document.tables.iter().enumerate() {
        if let Some(first) = first_seen.get(table.name.as_str()) {
            issues.push(ValidationIssue::new(
                format!("/tables/{idx}/name"),
                format!(
                    "duplicate table name '{}' (first declared at /tables/{first})",
                    table.name
                ),
            ));
        } else {
            first_seen.insert(table.name.as_str(), idx);
        }
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(issues))
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    config: Config,
    text: String,
    document: Option<Document>,
    graph: Graph,
    last_error: Option<SessionError>,
    unpublished: bool,
}

impl Session {
    pub fn open(text: impl Into<String>) -> Self {
        Self::open_with(text, Config::default())
    }

    /// Start a session. Invalid initial text yields an empty graph and the
    /// error is available from [`Session::last_error`].
    pub fn open_with(text: impl Into<String>, config: Config) -> Self {
        let session = Self {
            config,
            text: String::new(),
            document: None,
            graph: Graph::new(),
            last_error: None,
            unpublished: false,
        };
        session.apply_text_change(text)
    }

    /// End the session, handing back the current text.
    pub fn close(self) -> String {
        debug!(unpublished = self.unpublished, "closing session");
        self.text
    }

    pub fn apply_text_change(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        match load(&self.text, &self.config.layout) {
            Ok((document, graph)) => {
                debug!(
                    tables = document.tables.len(),
                    refs = document.refs.len(),
                    "rebuilt graph from text"
                );
                self.document = Some(document);
                self.graph = graph;
                self.last_error = None;
                self.unpublished = false;
            }
            Err(err) => {
                warn!(error = %err, "text rejected, keeping previous graph");
                self.last_error = Some(err);
            }
        }
        self
    }

    pub fn apply_graph_patch(mut self, patch: GraphPatch) -> Self {
        match self.graph.apply(patch) {
            Ok(()) => {
                self.unpublished = true;
                if matches!(self.last_error, Some(SessionError::Patch(_))) {
                    self.last_error = None;
                }
            }
            Err(err) => {
                warn!(error = %err, "graph patch rejected");
                self.last_error = Some(err.into());
            }
        }
        self
    }

    /// Replace the text with the canonical encoding of the current graph.
    pub fn publish(mut self) -> Self {
        let document = collapse_graph(&self.graph);
        self.text = encode_with(&document, &self.config.codec);
        debug!(tables = document.tables.len(), "published graph to text");
        self.document = Some(document);
        self.last_error = None;
        self.unpublished = false;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Last document that was successfully loaded or published.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    /// Whether the graph holds edits that the text does not reflect yet.
    pub fn has_unpublished_edits(&self) -> bool {
        self.unpublished
    }

    pub fn unresolved_edges(&self) -> Vec<&GraphEdge> {
        self.graph.unresolved_edges()
    }
}
