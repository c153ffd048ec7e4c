//! Simulation and interaction state behind the canvas.
//!
//! The `force_graph` simulation is seeded with the precomputed layout so the
//! canvas opens on the same arrangement as the exported figure. Pointer and
//! wheel input is translated into view changes and node drags here, which
//! keeps the component itself free of geometry.

use std::collections::{HashMap, HashSet};

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData};

use super::scale::{ScaleConfig, ScaledValues};
use super::theme::{Color, Theme};
use super::types::GraphData;
use crate::network::LayoutConfig;

const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 10.0;

/// Per-node display metadata carried through the simulation.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	/// Project name drawn above the node.
	pub label: Option<String>,
	/// CSS color.
	pub color: String,
	/// Radius multiplier; well-connected projects are drawn larger.
	pub size: f64,
	/// Tooltip lines under the name.
	pub hashtags: Vec<String>,
}

/// Pan and zoom applied to the whole view: `screen = world * k + (x, y)`.
#[derive(Clone, Debug)]
pub struct ViewTransform {
	/// Horizontal translation in pixels.
	pub x: f64,
	/// Vertical translation in pixels.
	pub y: f64,
	/// Zoom factor.
	pub k: f64,
}

impl ViewTransform {
	/// Screen point to world coordinates.
	pub fn to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// World point to screen coordinates.
	pub fn to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
		(wx * self.k + self.x, wy * self.k + self.y)
	}

	/// Zooms by `factor` while keeping the world point under `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = k;
	}
}

/// What the pointer is currently doing.
#[derive(Clone, Debug, Default)]
pub enum Gesture {
	/// No button held.
	#[default]
	Idle,
	/// Moving a node.
	Drag {
		/// The grabbed node.
		node: DefaultNodeIdx,
		/// Screen point where the drag started.
		grab: (f64, f64),
		/// World position of the node when grabbed.
		origin: (f32, f32),
	},
	/// Moving the view.
	Pan {
		/// Screen point where the pan started.
		grab: (f64, f64),
		/// View translation when grabbed.
		origin: (f64, f64),
	},
}

/// Eased hover highlight over the hovered node and its neighbours.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	/// Node under the pointer, if any.
	pub hovered_node: Option<DefaultNodeIdx>,
	targets: HashSet<DefaultNodeIdx>,
	intensity: HashMap<DefaultNodeIdx, f64>,
	peak: f64,
}

impl HighlightState {
	const FADE_IN: f64 = 6.0;
	const FADE_OUT: f64 = 4.0;

	fn set_hover(
		&mut self,
		node: Option<DefaultNodeIdx>,
		neighbors: &HashMap<DefaultNodeIdx, Vec<DefaultNodeIdx>>,
	) {
		if self.hovered_node == node {
			return;
		}
		self.hovered_node = node;
		self.targets = node
			.into_iter()
			.flat_map(|idx| {
				let around = neighbors.get(&idx).map(Vec::as_slice).unwrap_or_default();
				std::iter::once(idx).chain(around.iter().copied())
			})
			.collect();
	}

	/// Moves every intensity towards its target, exponentially in `dt`.
	pub fn tick(&mut self, dt: f64) {
		let rise = 1.0 - (-Self::FADE_IN * dt).exp();
		let decay = (-Self::FADE_OUT * dt).exp();

		for &idx in &self.targets {
			let value = self.intensity.entry(idx).or_insert(0.0);
			*value += (1.0 - *value) * rise;
		}

		let targets = &self.targets;
		self.intensity.retain(|idx, value| {
			if !targets.contains(idx) {
				*value *= decay;
			}
			*value > 0.005
		});
		self.peak = self.intensity.values().copied().fold(0.0, f64::max);
	}

	/// Current highlight of one node in `[0, 1]`.
	pub fn node_intensity(&self, idx: DefaultNodeIdx) -> f64 {
		self.intensity.get(&idx).copied().unwrap_or(0.0)
	}

	/// Geometric mean of both endpoint intensities.
	pub fn edge_intensity(&self, a: DefaultNodeIdx, b: DefaultNodeIdx) -> f64 {
		(self.node_intensity(a) * self.node_intensity(b)).sqrt()
	}

	/// Strongest highlight of any node; drives dimming of the rest.
	pub fn max_intensity(&self) -> f64 {
		self.peak
	}
}

/// Everything the canvas needs between frames for one uploaded network.
pub struct ForceGraphState {
	/// Live simulation.
	pub graph: ForceGraph<NodeInfo, ()>,
	/// Current pan and zoom.
	pub transform: ViewTransform,
	/// Pointer gesture in progress.
	pub gesture: Gesture,
	/// Hover highlight.
	pub highlight: HighlightState,
	/// Canvas width in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
	neighbors: HashMap<DefaultNodeIdx, Vec<DefaultNodeIdx>>,
	edge_labels: HashMap<(DefaultNodeIdx, DefaultNodeIdx), String>,
}

fn edge_key(a: DefaultNodeIdx, b: DefaultNodeIdx) -> (DefaultNodeIdx, DefaultNodeIdx) {
	(a.min(b), a.max(b))
}

impl ForceGraphState {
	/// Builds the simulation from embedded or computed graph data.
	pub fn new(data: &GraphData, width: f64, height: f64, theme: &Theme, scale: &ScaleConfig) -> Self {
		let mut graph = ForceGraph::new(LayoutConfig::default().simulation_parameters());

		let mut degree: HashMap<&str, usize> = HashMap::new();
		for link in &data.links {
			*degree.entry(link.source.as_str()).or_default() += 1;
			*degree.entry(link.target.as_str()).or_default() += 1;
		}
		let max_degree = degree.values().copied().max().unwrap_or(0).max(1) as f64;
		let max_group = data.max_group().unwrap_or(0) as f64;

		let mut by_id = HashMap::new();
		for (i, node) in data.nodes.iter().enumerate() {
			let color = node.color.clone().unwrap_or_else(|| {
				node.group
					.map(|g| theme.cluster_scale.sample_range(g as f64, 0.0, max_group))
					.unwrap_or(Color::rgb(128, 128, 128))
					.to_css_rgb()
			});
			// layout y points up, canvas y points down
			let (lx, ly) = node.position.unwrap_or_else(|| {
				let angle = i as f64 * std::f64::consts::TAU / data.nodes.len() as f64;
				(angle.cos(), angle.sin())
			});
			let links = degree.get(node.id.as_str()).copied().unwrap_or(0) as f64;

			let idx = graph.add_node(NodeData {
				x: (lx * scale.layout_extent) as f32,
				y: (-ly * scale.layout_extent) as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					label: node.label.clone(),
					color,
					size: 1.0 + 0.5 * (links / max_degree).sqrt(),
					hashtags: node.hashtags.clone(),
				},
			});
			by_id.insert(node.id.as_str(), idx);
		}

		let mut neighbors: HashMap<DefaultNodeIdx, Vec<DefaultNodeIdx>> = HashMap::new();
		let mut edge_labels = HashMap::new();
		for link in &data.links {
			let (Some(&a), Some(&b)) = (
				by_id.get(link.source.as_str()),
				by_id.get(link.target.as_str()),
			) else {
				continue;
			};
			graph.add_edge(a, b, EdgeData::default());
			neighbors.entry(a).or_default().push(b);
			neighbors.entry(b).or_default().push(a);
			if let Some(label) = &link.label {
				edge_labels.insert(edge_key(a, b), label.clone());
			}
		}

		Self {
			graph,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			gesture: Gesture::Idle,
			highlight: HighlightState::default(),
			width,
			height,
			neighbors,
			edge_labels,
		}
	}

	/// Shared hashtags on the edge between two nodes.
	pub fn edge_label(&self, a: DefaultNodeIdx, b: DefaultNodeIdx) -> Option<&str> {
		self.edge_labels.get(&edge_key(a, b)).map(String::as_str)
	}

	/// World position and metadata of one node.
	pub fn node(&self, idx: DefaultNodeIdx) -> Option<((f64, f64), NodeInfo)> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(((node.x() as f64, node.y() as f64), node.data.user_data.clone()));
			}
		});
		found
	}

	/// Topmost node under a screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64, config: &ScaleConfig) -> Option<DefaultNodeIdx> {
		let (wx, wy) = self.transform.to_world(sx, sy);
		let hit_radius = ScaledValues::new(config, self.transform.k).hit_radius;
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - wx, node.y() as f64 - wy);
			if dx.hypot(dy) < hit_radius * node.data.user_data.size {
				found = Some(node.index());
			}
		});
		found
	}

	/// Highlights `node` and its neighbours, or clears the highlight.
	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		self.highlight.set_hover(node, &self.neighbors);
	}

	/// Grabs the node under the pointer, or the background for panning.
	pub fn pointer_down(&mut self, sx: f64, sy: f64, config: &ScaleConfig) {
		let grabbed = self
			.node_at_position(sx, sy, config)
			.and_then(|idx| self.node(idx).map(|((x, y), _)| (idx, (x as f32, y as f32))));

		self.gesture = match grabbed {
			Some((node, origin)) => Gesture::Drag {
				node,
				grab: (sx, sy),
				origin,
			},
			None => Gesture::Pan {
				grab: (sx, sy),
				origin: (self.transform.x, self.transform.y),
			},
		};
	}

	/// Continues the current gesture; while idle, updates the hover target.
	pub fn pointer_move(&mut self, sx: f64, sy: f64, config: &ScaleConfig) {
		match self.gesture {
			Gesture::Idle => {
				let hovered = self.node_at_position(sx, sy, config);
				self.set_hover(hovered);
			}
			Gesture::Drag { node, grab, origin } => {
				let k = self.transform.k;
				let x = origin.0 + ((sx - grab.0) / k) as f32;
				let y = origin.1 + ((sy - grab.1) / k) as f32;
				// a dragged node stays pinned where it is dropped
				self.graph.visit_nodes_mut(|n| {
					if n.index() == node {
						n.data.x = x;
						n.data.y = y;
						n.data.is_anchor = true;
					}
				});
			}
			Gesture::Pan { grab, origin } => {
				self.transform.x = origin.0 + (sx - grab.0);
				self.transform.y = origin.1 + (sy - grab.1);
			}
		}
	}

	/// Ends the current gesture.
	pub fn pointer_up(&mut self) {
		self.gesture = Gesture::Idle;
	}

	/// Ends the current gesture and clears the hover.
	pub fn pointer_leave(&mut self) {
		self.gesture = Gesture::Idle;
		self.set_hover(None);
	}

	/// One wheel notch: 10% zoom around the pointer.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		self.transform.zoom_at(sx, sy, factor);
	}

	/// Advances the physics and the hover fade by `dt` seconds.
	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.highlight.tick(dt as f64);
	}
}
