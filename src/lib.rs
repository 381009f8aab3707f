#[cfg(feature = "cli")]
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod graph;
pub mod identity;
pub mod layout;
pub mod model;
pub mod projection;
pub mod schema;
pub mod session;

#[cfg(feature = "cli")]
pub use cli::run;
pub use codec::{decode, encode, encode_with};
pub use config::{load_config, CodecConfig, Config, LayoutConfig};
pub use error::{ParseError, PatchError, SessionError, ValidationErrors, ValidationIssue};
pub use graph::{apply_patch, Graph, GraphEdge, GraphNode, GraphPatch, TableData};
pub use identity::{column_edge_id, edge_id};
pub use layout::default_position;
pub use model::{Column, Document, Position, Ref, Table, TableRef};
pub use projection::{build_graph, build_graph_with, collapse_graph};
pub use schema::validate;
pub use session::{load, Session};
