//! Object graph walker for the valdiff engine.
//!
//! Wraps a [`valdiff_types::Value`] in a [`GraphNode`] carrying its path,
//! declared type and member-selection [`valdiff_types::Criteria`], then
//! enumerates named children on demand: record members (filtered and
//! name-normalized), and array/sequence elements as index-named synthetic
//! members. Traversal is cycle-safe via identity-based visit guards scoped
//! to a single walk.
//!
//! # Key Types
//!
//! - [`GraphNode`] / [`build_graph`] — Node construction and child enumeration
//! - [`GraphNode::map_fields`] — Label-paired walk over two graphs
//! - [`GraphNode::scan_fields`] — Walk over a single graph
//! - [`VisitGuard`] — Identity-based cycle guard

pub mod node;
pub mod walk;

pub use node::{build_graph, coordinate_label, normalize_member_name, GraphNode};
pub use walk::VisitGuard;
