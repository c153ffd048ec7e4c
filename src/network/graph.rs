//! Co-occurrence graph: projects are nodes, shared hashtags are edge labels.

use std::collections::{BTreeSet, HashMap, HashSet};

use log::debug;

use super::table::ProjectTags;

/// What to do with projects that share no hashtag with any other project.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IsolatedProjects {
	/// Build the graph from shared-tag pairs only; isolated projects vanish.
	#[default]
	Omit,
	/// Append isolated projects as singleton nodes, in table order.
	Show,
}

/// An undirected edge labelled with every hashtag both projects carry.
#[derive(Clone, Debug, PartialEq)]
pub struct TagEdge {
	/// Lower node index.
	pub source: usize,
	/// Higher node index.
	pub target: usize,
	/// Never empty.
	pub tags: BTreeSet<String>,
}

impl TagEdge {
	/// Shared tags joined for display (`"#a, #b"`).
	pub fn label(&self) -> String {
		self.tags.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
	}
}

/// Undirected project graph with at most one edge per project pair.
#[derive(Clone, Debug, Default)]
pub struct TagGraph {
	/// Project names, indexed by node id.
	pub nodes: Vec<String>,
	/// Edges in creation order.
	pub edges: Vec<TagEdge>,
	node_index: HashMap<String, usize>,
	edge_index: HashMap<(usize, usize), usize>,
}

impl TagGraph {
	/// Connects every pair of projects that share a hashtag.
	///
	/// Tags are visited in first-seen order and projects per tag in table
	/// order, so node and edge order are stable for a given table.
	pub fn build(projects: &[ProjectTags], isolated: IsolatedProjects) -> Self {
		let mut tag_order: Vec<&str> = Vec::new();
		let mut carriers: HashMap<&str, Vec<&str>> = HashMap::new();

		for project in projects {
			let mut seen = HashSet::new();
			for tag in &project.hashtags {
				if !seen.insert(tag.as_str()) {
					continue;
				}
				carriers
					.entry(tag.as_str())
					.or_insert_with(|| {
						tag_order.push(tag.as_str());
						Vec::new()
					})
					.push(project.name.as_str());
			}
		}

		let mut graph = Self::default();
		for tag in tag_order {
			let members = &carriers[tag];
			for (i, u) in members.iter().enumerate() {
				for v in &members[i + 1..] {
					graph.add_shared_tag(u, v, tag);
				}
			}
		}

		if isolated == IsolatedProjects::Show {
			for project in projects {
				graph.add_node(&project.name);
			}
		}

		debug!(
			"tagnet: built graph with {} nodes, {} edges",
			graph.node_count(),
			graph.edge_count()
		);
		graph
	}

	fn add_node(&mut self, name: &str) -> usize {
		if let Some(&idx) = self.node_index.get(name) {
			return idx;
		}
		let idx = self.nodes.len();
		self.nodes.push(name.to_string());
		self.node_index.insert(name.to_string(), idx);
		idx
	}

	fn add_shared_tag(&mut self, u: &str, v: &str, tag: &str) {
		let (a, b) = (self.add_node(u), self.add_node(v));
		let key = (a.min(b), a.max(b));
		match self.edge_index.get(&key) {
			Some(&e) => {
				self.edges[e].tags.insert(tag.to_string());
			}
			None => {
				self.edge_index.insert(key, self.edges.len());
				self.edges.push(TagEdge {
					source: a,
					target: b,
					tags: BTreeSet::from([tag.to_string()]),
				});
			}
		}
	}

	/// Number of projects in the graph.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Number of project pairs sharing a hashtag.
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// Node id of a project, if it is in the graph.
	pub fn index_of(&self, name: &str) -> Option<usize> {
		self.node_index.get(name).copied()
	}

	/// The edge joining two nodes, in either direction.
	pub fn edge_between(&self, a: usize, b: usize) -> Option<&TagEdge> {
		self.edge_index
			.get(&(a.min(b), a.max(b)))
			.map(|&e| &self.edges[e])
	}

	/// Projects sharing at least one hashtag with `idx`.
	pub fn neighbors(&self, idx: usize) -> Vec<usize> {
		self.edges
			.iter()
			.filter_map(|edge| {
				if edge.source == idx {
					Some(edge.target)
				} else if edge.target == idx {
					Some(edge.source)
				} else {
					None
				}
			})
			.collect()
	}

	/// Number of edges at `idx`.
	pub fn degree(&self, idx: usize) -> usize {
		self.edges
			.iter()
			.filter(|edge| edge.source == idx || edge.target == idx)
			.count()
	}
}
