//! Seeded force-directed layout.
//!
//! Runs the `force_graph` spring/charge simulation for a fixed number of
//! steps from pseudo-random start positions, then rescales the result into
//! the `[-1, 1]` box around the origin.

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::graph::TagGraph;

/// Simulation settings for the static layout.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
	/// Seed for the start positions; equal seeds give equal layouts.
	pub seed: u64,
	/// Simulation steps before rescaling.
	pub iterations: usize,
	/// Simulated seconds per step.
	pub time_step: f32,
	/// Half-width of the square the start positions are drawn from.
	pub spread: f32,
	/// Repulsion between every pair of nodes.
	pub force_charge: f32,
	/// Attraction along edges.
	pub force_spring: f32,
	/// Cap on the force applied to a node per step.
	pub force_max: f32,
	/// Velocity scale applied to the net force.
	pub node_speed: f32,
	/// Velocity kept from one step to the next.
	pub damping_factor: f32,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			seed: 42,
			iterations: 300,
			time_step: 0.016,
			spread: 200.0,
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		}
	}
}

impl LayoutConfig {
	pub(crate) fn simulation_parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: self.force_charge,
			force_spring: self.force_spring,
			force_max: self.force_max,
			node_speed: self.node_speed,
			damping_factor: self.damping_factor,
		}
	}
}

/// Node coordinates, indexed like [`TagGraph::nodes`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
	/// One `(x, y)` per node.
	pub positions: Vec<(f64, f64)>,
}

impl Layout {
	/// Position of one node.
	pub fn position(&self, node: usize) -> Option<(f64, f64)> {
		self.positions.get(node).copied()
	}

	/// Midpoint of the segment between two nodes.
	pub fn midpoint(&self, a: usize, b: usize) -> Option<(f64, f64)> {
		let ((x0, y0), (x1, y1)) = (self.position(a)?, self.position(b)?);
		Some(((x0 + x1) / 2.0, (y0 + y1) / 2.0))
	}
}

/// Computes a layout for `graph`. Identical graph and config give identical
/// coordinates.
pub fn spring_layout(graph: &TagGraph, config: &LayoutConfig) -> Layout {
	let n = graph.node_count();
	if n == 0 {
		return Layout::default();
	}

	let mut rng = StdRng::seed_from_u64(config.seed);
	let mut sim: ForceGraph<usize, ()> = ForceGraph::new(config.simulation_parameters());
	let mut handles = Vec::with_capacity(n);
	for node in 0..n {
		handles.push(sim.add_node(NodeData {
			x: rng.gen_range(-config.spread..=config.spread),
			y: rng.gen_range(-config.spread..=config.spread),
			mass: 10.0,
			is_anchor: false,
			user_data: node,
		}));
	}
	for edge in &graph.edges {
		sim.add_edge(handles[edge.source], handles[edge.target], EdgeData::default());
	}

	for _ in 0..config.iterations {
		sim.update(config.time_step);
	}

	let mut raw = vec![(0.0, 0.0); n];
	sim.visit_nodes(|node| {
		raw[node.data.user_data] = (node.x() as f64, node.y() as f64);
	});

	debug!("tagnet: laid out {} nodes in {} steps", n, config.iterations);
	Layout {
		positions: rescale(raw),
	}
}

/// Centers positions on their mean and scales the largest |coordinate| to 1.
#[allow(clippy::cast_precision_loss)]
fn rescale(mut positions: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
	let n = positions.len() as f64;
	let (cx, cy) = positions
		.iter()
		.fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x, sy + y));
	let (cx, cy) = (cx / n, cy / n);

	let mut lim: f64 = 0.0;
	for (x, y) in &mut positions {
		*x -= cx;
		*y -= cy;
		lim = lim.max(x.abs()).max(y.abs());
	}

	if lim > 0.0 && lim.is_finite() {
		for (x, y) in &mut positions {
			*x /= lim;
			*y /= lim;
		}
	} else {
		positions.iter_mut().for_each(|p| *p = (0.0, 0.0));
	}
	positions
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::network::graph::IsolatedProjects;
	use crate::network::table::ProjectTags;

	fn sample_graph() -> TagGraph {
		let projects: Vec<ProjectTags> = [
			("A", vec!["#x", "#y"]),
			("B", vec!["#y", "#z"]),
			("C", vec!["#z"]),
			("D", vec!["#x", "#w"]),
			("E", vec!["#w"]),
		]
		.into_iter()
		.map(|(name, tags)| ProjectTags {
			name: name.to_string(),
			hashtags: tags.into_iter().map(str::to_string).collect(),
		})
		.collect();
		TagGraph::build(&projects, IsolatedProjects::Omit)
	}

	#[test]
	fn same_seed_same_coordinates() {
		let graph = sample_graph();
		let config = LayoutConfig::default();
		assert_eq!(spring_layout(&graph, &config), spring_layout(&graph, &config));
	}

	#[test]
	fn one_position_per_node_inside_unit_box() {
		let graph = sample_graph();
		let layout = spring_layout(&graph, &LayoutConfig::default());
		assert_eq!(layout.positions.len(), graph.node_count());
		for &(x, y) in &layout.positions {
			assert!(x.is_finite() && y.is_finite());
			assert!(x.abs() <= 1.0 + 1e-9 && y.abs() <= 1.0 + 1e-9);
		}
		let max = layout
			.positions
			.iter()
			.map(|(x, y)| x.abs().max(y.abs()))
			.fold(0.0, f64::max);
		assert!((max - 1.0).abs() < 1e-9);
	}

	#[test]
	fn different_seed_moves_nodes() {
		let graph = sample_graph();
		let a = spring_layout(&graph, &LayoutConfig::default());
		let b = spring_layout(
			&graph,
			&LayoutConfig {
				seed: 7,
				..LayoutConfig::default()
			},
		);
		assert_ne!(a, b);
	}

	#[test]
	fn empty_and_single_node_graphs() {
		assert!(spring_layout(&TagGraph::default(), &LayoutConfig::default())
			.positions
			.is_empty());

		let single = TagGraph::build(
			&[ProjectTags {
				name: "solo".into(),
				hashtags: vec![],
			}],
			IsolatedProjects::Show,
		);
		let layout = spring_layout(&single, &LayoutConfig::default());
		assert_eq!(layout.positions, vec![(0.0, 0.0)]);
	}

	#[test]
	fn midpoint_is_average_of_endpoints() {
		let layout = Layout {
			positions: vec![(-1.0, 0.0), (1.0, 0.5)],
		};
		assert_eq!(layout.midpoint(0, 1), Some((0.0, 0.25)));
		assert_eq!(layout.midpoint(0, 5), None);
	}
}
