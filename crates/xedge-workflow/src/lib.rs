//! XEdge Workflow
//!
//! This crate provides the canonical in-memory representation of a workflow:
//! a [`Graph`] of [`Node`]s and [`Edge`]s as an editing surface sees them.
//!
//! Key differences from the flat `elements` form in `xedge-config`:
//! - Nodes and edges are separate, strongly typed collections
//! - Every node and edge has an id, every edge has both endpoints
//! - Missing node types and positions have been defaulted
//!
//! The [`codec`] module converts between the two. The graph itself enforces
//! nothing beyond that: duplicate ids, parallel edges and dangling edges are
//! all representable and left to the validator to reject.

pub mod codec;
mod error;
mod graph;
mod node;

pub use codec::{decode, decode_document, encode, encode_document};
pub use error::WorkflowError;
pub use graph::Graph;
pub use node::{Edge, Node, NodeDataPatch};
