//! Greedy modularity community detection (Clauset–Newman–Moore).
//!
//! Every node starts in its own community. The pair of adjacent communities
//! whose merge raises modularity the most is merged until no merge helps.
//! Nothing here is random: ties go to the lowest community index pair.

use std::collections::BTreeMap;

use log::debug;

use super::graph::TagGraph;

/// A partition of graph nodes into disjoint clusters.
///
/// Cluster ids are positions in `communities`, largest cluster first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Partition {
	/// Cluster id per node index.
	pub assignment: Vec<usize>,
	/// Node indices per cluster, each sorted ascending.
	pub communities: Vec<Vec<usize>>,
}

impl Partition {
	/// Cluster id of a node.
	pub fn cluster_of(&self, node: usize) -> Option<usize> {
		self.assignment.get(node).copied()
	}

	/// Number of clusters.
	pub fn len(&self) -> usize {
		self.communities.len()
	}

	/// True when the graph had no nodes.
	pub fn is_empty(&self) -> bool {
		self.communities.is_empty()
	}

	fn from_members(node_count: usize, mut communities: Vec<Vec<usize>>) -> Self {
		for members in &mut communities {
			members.sort_unstable();
		}
		communities.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.first().cmp(&b.first())));

		let mut assignment = vec![0; node_count];
		for (cluster, members) in communities.iter().enumerate() {
			for &node in members {
				assignment[node] = cluster;
			}
		}
		Self {
			assignment,
			communities,
		}
	}
}

/// Partitions `graph` by greedy modularity maximisation.
///
/// An edgeless graph yields one singleton cluster per node.
#[allow(clippy::cast_precision_loss)]
pub fn greedy_modularity(graph: &TagGraph) -> Partition {
	let n = graph.node_count();
	let m = graph.edge_count();
	let singletons = || (0..n).map(|i| vec![i]).collect::<Vec<_>>();

	if m == 0 {
		return Partition::from_members(n, singletons());
	}

	let q0 = 1.0 / (2.0 * m as f64);
	let mut a: Vec<f64> = (0..n).map(|i| graph.degree(i) as f64 * q0).collect();

	// dq[i][j]: modularity change from merging communities i and j.
	let mut dq: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); n];
	for edge in &graph.edges {
		let (i, j) = (edge.source, edge.target);
		let gain = 2.0 * (q0 - a[i] * a[j]);
		dq[i].insert(j, gain);
		dq[j].insert(i, gain);
	}

	let mut members = singletons();
	let mut merges = 0;

	while let Some((i, j, gain)) = best_merge(&dq) {
		if gain <= 0.0 {
			break;
		}
		merge(&mut dq, &mut a, i, j);
		let moved = std::mem::take(&mut members[i]);
		members[j].extend(moved);
		merges += 1;
	}

	let partition = Partition::from_members(
		n,
		members.into_iter().filter(|c| !c.is_empty()).collect(),
	);
	debug!(
		"tagnet: {} merges, {} communities over {} nodes",
		merges,
		partition.len(),
		n
	);
	partition
}

/// Largest gain over all adjacent pairs, lowest `(i, j)` on ties.
fn best_merge(dq: &[BTreeMap<usize, f64>]) -> Option<(usize, usize, f64)> {
	let mut best: Option<(usize, usize, f64)> = None;
	for (i, row) in dq.iter().enumerate() {
		for (&j, &gain) in row.range(i + 1..) {
			if best.is_none_or(|(_, _, g)| gain > g) {
				best = Some((i, j, gain));
			}
		}
	}
	best
}

/// Folds community `i` into community `j`, updating gains of their neighbours.
fn merge(dq: &mut [BTreeMap<usize, f64>], a: &mut [f64], i: usize, j: usize) {
	let row_i = std::mem::take(&mut dq[i]);
	let mut row_j = std::mem::take(&mut dq[j]);
	row_j.remove(&i);

	let mut merged: BTreeMap<usize, f64> = BTreeMap::new();
	for (&k, &gain_ik) in row_i.iter().filter(|&(&k, _)| k != j) {
		let gain = match row_j.get(&k) {
			Some(&gain_jk) => gain_ik + gain_jk,
			None => gain_ik - 2.0 * a[j] * a[k],
		};
		merged.insert(k, gain);
	}
	for (&k, &gain_jk) in &row_j {
		merged.entry(k).or_insert(gain_jk - 2.0 * a[i] * a[k]);
	}

	for (&k, &gain) in &merged {
		dq[k].remove(&i);
		dq[k].insert(j, gain);
	}
	dq[j] = merged;

	a[j] += a[i];
	a[i] = 0.0;
}

/// Newman modularity of `partition` on the unweighted graph.
#[allow(clippy::cast_precision_loss)]
pub fn modularity(graph: &TagGraph, partition: &Partition) -> f64 {
	let m = graph.edge_count() as f64;
	if m == 0.0 {
		return 0.0;
	}

	let mut internal = vec![0.0; partition.len()];
	let mut degree_sum = vec![0.0; partition.len()];
	for edge in &graph.edges {
		let (cu, cv) = (
			partition.assignment[edge.source],
			partition.assignment[edge.target],
		);
		degree_sum[cu] += 1.0;
		degree_sum[cv] += 1.0;
		if cu == cv {
			internal[cu] += 1.0;
		}
	}

	internal
		.iter()
		.zip(&degree_sum)
		.map(|(l, d)| l / m - (d / (2.0 * m)).powi(2))
		.sum()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::network::graph::IsolatedProjects;
	use crate::network::table::ProjectTags;

	fn graph(projects: &[(&str, &[&str])], isolated: IsolatedProjects) -> TagGraph {
		let projects: Vec<ProjectTags> = projects
			.iter()
			.map(|(name, tags)| ProjectTags {
				name: name.to_string(),
				hashtags: tags.iter().map(|t| t.to_string()).collect(),
			})
			.collect();
		TagGraph::build(&projects, isolated)
	}

	/// Two triangles (a, b, c) and (d, e, f) bridged by c–d.
	fn two_triangles() -> TagGraph {
		graph(
			&[
				("a", &["#ab", "#ac"]),
				("b", &["#ab", "#bc"]),
				("c", &["#ac", "#bc", "#bridge"]),
				("d", &["#bridge", "#de", "#df"]),
				("e", &["#de", "#ef"]),
				("f", &["#df", "#ef"]),
			],
			IsolatedProjects::Omit,
		)
	}

	#[test]
	fn splits_two_triangles() {
		let g = two_triangles();
		let partition = greedy_modularity(&g);
		assert_eq!(partition.len(), 2);

		let id = |name: &str| partition.cluster_of(g.index_of(name).unwrap()).unwrap();
		assert_eq!(id("a"), id("b"));
		assert_eq!(id("b"), id("c"));
		assert_eq!(id("d"), id("e"));
		assert_eq!(id("e"), id("f"));
		assert_ne!(id("a"), id("d"));

		let q = modularity(&g, &partition);
		assert!((q - (6.0 / 7.0 - 0.5)).abs() < 1e-9, "modularity was {q}");
	}

	#[test]
	fn assignment_is_total() {
		let g = graph(
			&[
				("a", &["#x"]),
				("b", &["#x", "#y"]),
				("c", &["#y"]),
				("solo", &["#z"]),
			],
			IsolatedProjects::Show,
		);
		let partition = greedy_modularity(&g);
		assert_eq!(partition.assignment.len(), g.node_count());
		for node in 0..g.node_count() {
			let cluster = partition.cluster_of(node).unwrap();
			assert!(partition.communities[cluster].contains(&node));
		}
		let total: usize = partition.communities.iter().map(Vec::len).sum();
		assert_eq!(total, g.node_count());
	}

	#[test]
	fn edgeless_graph_gives_singletons() {
		let g = graph(&[("a", &["#x"]), ("b", &["#y"])], IsolatedProjects::Show);
		let partition = greedy_modularity(&g);
		assert_eq!(partition.len(), 2);
		assert_ne!(partition.cluster_of(0), partition.cluster_of(1));
		assert_eq!(modularity(&g, &partition), 0.0);
	}

	#[test]
	fn empty_graph_gives_empty_partition() {
		let partition = greedy_modularity(&TagGraph::default());
		assert!(partition.is_empty());
	}

	#[test]
	fn detection_is_deterministic() {
		let g = two_triangles();
		assert_eq!(greedy_modularity(&g), greedy_modularity(&g));
	}

	#[test]
	fn largest_cluster_gets_id_zero() {
		let g = graph(
			&[
				("p1", &["#big"]),
				("p2", &["#big"]),
				("p3", &["#big"]),
				("p4", &["#big"]),
				("q1", &["#small"]),
				("q2", &["#small"]),
			],
			IsolatedProjects::Omit,
		);
		let partition = greedy_modularity(&g);
		assert_eq!(partition.communities[0].len(), 4);
		assert_eq!(partition.cluster_of(g.index_of("q1").unwrap()), Some(1));
	}
}
