//! Graph data structures for input to the force graph component.
//!
//! The same structures are embedded as JSON in exported documents, so a page
//! carrying a `graph-data` script element can be shown without an upload.

use serde::{Deserialize, Serialize};

/// A project node in the graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	/// Unique identifier for this node (the project name). Used to reference nodes in links.
	pub id: String,
	/// Optional display label drawn next to the node.
	#[serde(default)]
	pub label: Option<String>,
	/// Optional CSS color override (e.g., "#ff0000" or "rgb(255, 0, 0)").
	/// If not set, color is derived from the theme's cluster scale based on `group`.
	#[serde(default)]
	pub color: Option<String>,
	/// Cluster id from community detection.
	#[serde(default)]
	pub group: Option<usize>,
	/// Hashtags shown when hovering the node.
	#[serde(default)]
	pub hashtags: Vec<String>,
	/// Initial position in layout units (`[-1, 1]`).
	#[serde(default)]
	pub position: Option<(f64, f64)>,
}

/// An undirected edge between two projects.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	/// Shared hashtags, comma-joined.
	#[serde(default)]
	pub label: Option<String>,
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	/// All nodes.
	pub nodes: Vec<GraphNode>,
	/// Links between nodes, by node id.
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Highest cluster id present, if any node has one.
	pub fn max_group(&self) -> Option<usize> {
		self.nodes.iter().filter_map(|n| n.group).max()
	}
}
