//! Figure model and standalone HTML export.
//!
//! A [`Figure`] is the drawable form of an analysis: one segment and one
//! midpoint label per edge, one marker per node colored by cluster on a
//! continuous scale. It converts to [`GraphData`] for the interactive canvas
//! and renders itself as a self-contained interactive HTML document.

use super::community::Partition;
use super::graph::TagGraph;
use super::layout::Layout;
use super::table::ProjectTags;
use crate::components::force_graph::theme::{Color, Theme};
use crate::components::force_graph::{GraphData, GraphLink, GraphNode};

/// Fixed file name of the HTML download.
pub const HTML_FILE_NAME: &str = "netzwerk.html";

/// Layout-space padding around the `[-1, 1]` box.
const AXIS_PAD: f64 = 0.1;
/// Horizontal room reserved for the color bar.
const COLORBAR_SPACE: f64 = 90.0;

/// Plot margins in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margin {
	/// Left margin.
	pub left: f64,
	/// Right margin.
	pub right: f64,
	/// Top margin.
	pub top: f64,
	/// Bottom margin.
	pub bottom: f64,
}

/// Sizes and switches for the exported figure.
#[derive(Clone, Debug, PartialEq)]
pub struct FigureStyle {
	/// Figure width in pixels.
	pub width: f64,
	/// Figure height in pixels.
	pub height: f64,
	/// Space between the plot area and the figure border.
	pub margin: Margin,
	/// Marker diameter in pixels.
	pub node_size: f64,
	/// Edge line width in pixels.
	pub edge_width: f64,
	/// Font size of the shared-hashtag labels.
	pub edge_label_size: f64,
	/// Font size of the project names.
	pub node_label_size: f64,
	/// Whether the cluster color bar is drawn.
	pub show_scale: bool,
}

impl Default for FigureStyle {
	fn default() -> Self {
		Self {
			width: 1100.0,
			height: 700.0,
			margin: Margin {
				left: 20.0,
				right: 20.0,
				top: 40.0,
				bottom: 20.0,
			},
			node_size: 20.0,
			edge_width: 1.0,
			edge_label_size: 8.0,
			node_label_size: 12.0,
			show_scale: true,
		}
	}
}

/// One project as drawn: name above a colored marker.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeMarker {
	/// Project name, shown as text.
	pub name: String,
	/// Layout position.
	pub position: (f64, f64),
	/// Cluster id.
	pub cluster: usize,
	/// Color sampled from the cluster scale.
	pub color: Color,
	/// Hashtags shown on hover.
	pub hashtags: Vec<String>,
}

impl NodeMarker {
	/// Hover text: the project's hashtags, one per line.
	pub fn hover_text(&self) -> String {
		self.hashtags.join("\n")
	}
}

/// A straight edge between two node markers.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeSegment {
	/// Index of the first endpoint in [`Figure::nodes`].
	pub source: usize,
	/// Index of the second endpoint in [`Figure::nodes`].
	pub target: usize,
	/// Layout position of `source`.
	pub from: (f64, f64),
	/// Layout position of `target`.
	pub to: (f64, f64),
}

/// Shared hashtags drawn at an edge's midpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeLabel {
	/// Edge midpoint.
	pub position: (f64, f64),
	/// Shared hashtags, comma-joined.
	pub text: String,
}

/// Everything needed to draw the network.
#[derive(Clone, Debug, PartialEq)]
pub struct Figure {
	/// Markers in node order.
	pub nodes: Vec<NodeMarker>,
	/// Edge lines in edge order.
	pub edges: Vec<EdgeSegment>,
	/// One label per edge, same order as `edges`.
	pub edge_labels: Vec<EdgeLabel>,
	/// Lowest and highest cluster id on the color scale.
	pub cluster_range: (usize, usize),
	/// Sizes used by the HTML export.
	pub style: FigureStyle,
}

impl Figure {
	/// Assembles the figure. `projects` supplies each node's hover hashtags.
	#[allow(clippy::cast_precision_loss)]
	pub fn build(
		graph: &TagGraph,
		partition: &Partition,
		layout: &Layout,
		projects: &[ProjectTags],
		theme: &Theme,
	) -> Self {
		let clusters: Vec<usize> = (0..graph.node_count())
			.map(|node| partition.cluster_of(node).unwrap_or(0))
			.collect();
		let cluster_range = (
			clusters.iter().copied().min().unwrap_or(0),
			clusters.iter().copied().max().unwrap_or(0),
		);

		let nodes = graph
			.nodes
			.iter()
			.enumerate()
			.map(|(idx, name)| {
				let cluster = clusters[idx];
				NodeMarker {
					name: name.clone(),
					position: layout.position(idx).unwrap_or((0.0, 0.0)),
					cluster,
					color: theme.cluster_scale.sample_range(
						cluster as f64,
						cluster_range.0 as f64,
						cluster_range.1 as f64,
					),
					hashtags: projects
						.iter()
						.find(|p| &p.name == name)
						.map(|p| p.hashtags.clone())
						.unwrap_or_default(),
				}
			})
			.collect();

		let mut edges = Vec::with_capacity(graph.edge_count());
		let mut edge_labels = Vec::with_capacity(graph.edge_count());
		for edge in &graph.edges {
			let from = layout.position(edge.source).unwrap_or((0.0, 0.0));
			let to = layout.position(edge.target).unwrap_or((0.0, 0.0));
			edges.push(EdgeSegment {
				source: edge.source,
				target: edge.target,
				from,
				to,
			});
			edge_labels.push(EdgeLabel {
				position: ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0),
				text: edge.label(),
			});
		}

		Self {
			nodes,
			edges,
			edge_labels,
			cluster_range,
			style: FigureStyle::default(),
		}
	}

	/// Input for the interactive canvas component.
	pub fn graph_data(&self) -> GraphData {
		let nodes = self
			.nodes
			.iter()
			.map(|node| GraphNode {
				id: node.name.clone(),
				label: Some(node.name.clone()),
				color: Some(node.color.to_css_rgb()),
				group: Some(node.cluster),
				hashtags: node.hashtags.clone(),
				position: Some(node.position),
			})
			.collect();

		let links = self
			.edges
			.iter()
			.zip(&self.edge_labels)
			.map(|(edge, label)| GraphLink {
				source: self.nodes[edge.source].name.clone(),
				target: self.nodes[edge.target].name.clone(),
				label: Some(label.text.clone()),
			})
			.collect();

		GraphData { nodes, links }
	}

	/// Maps layout coordinates into SVG pixels (y grows downwards).
	fn to_screen(&self, (x, y): (f64, f64)) -> (f64, f64) {
		let s = &self.style;
		let scale_room = if s.show_scale { COLORBAR_SPACE } else { 0.0 };
		let plot_w = s.width - s.margin.left - s.margin.right - scale_room;
		let plot_h = s.height - s.margin.top - s.margin.bottom;
		let span = 2.0 * (1.0 + AXIS_PAD);
		(
			s.margin.left + (x + 1.0 + AXIS_PAD) / span * plot_w,
			s.margin.top + (1.0 + AXIS_PAD - y) / span * plot_h,
		)
	}

	/// Renders a self-contained HTML document: inline SVG with hover
	/// tooltips, wheel zoom and drag pan, plus the graph data as JSON.
	pub fn to_html(&self, theme: &Theme) -> Result<String, serde_json::Error> {
		let data = serde_json::to_string(&self.graph_data())?.replace("</", "<\\/");

		Ok(format!(
			r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Project Hashtag Network</title>
<style>{css}</style>
</head>
<body>
<svg id="network" viewBox="0 0 {w} {h}" preserveAspectRatio="xMidYMid meet">
<rect width="{w}" height="{h}" fill="{bg}"/>
<g id="viewport">
{edges}{edge_labels}{nodes}</g>
{colorbar}</svg>
<script type="application/json" id="graph-data">{data}</script>
<script>{js}</script>
</body>
</html>
"#,
			css = inline_css(theme),
			w = self.style.width,
			h = self.style.height,
			bg = theme.background.color.to_css(),
			edges = self.svg_edges(theme),
			edge_labels = self.svg_edge_labels(theme),
			nodes = self.svg_nodes(theme),
			colorbar = self.svg_colorbar(theme),
			data = data,
			js = inline_javascript(),
		))
	}

	fn svg_edges(&self, theme: &Theme) -> String {
		let stroke = theme.edge.color.to_css();
		self.edges
			.iter()
			.map(|edge| {
				let ((x0, y0), (x1, y1)) = (self.to_screen(edge.from), self.to_screen(edge.to));
				format!(
					"<line x1=\"{x0:.2}\" y1=\"{y0:.2}\" x2=\"{x1:.2}\" y2=\"{y1:.2}\" stroke=\"{stroke}\" stroke-width=\"{}\"/>\n",
					self.style.edge_width,
				)
			})
			.collect()
	}

	fn svg_edge_labels(&self, theme: &Theme) -> String {
		let fill = theme.edge.label_color.to_css();
		self.edge_labels
			.iter()
			.map(|label| {
				let (x, y) = self.to_screen(label.position);
				format!(
					"<text class=\"edge-label\" x=\"{x:.2}\" y=\"{y:.2}\" font-size=\"{}\" fill=\"{fill}\" text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>\n",
					self.style.edge_label_size,
					html_escape(&label.text),
				)
			})
			.collect()
	}

	fn svg_nodes(&self, theme: &Theme) -> String {
		let radius = self.style.node_size / 2.0;
		self.nodes
			.iter()
			.map(|node| {
				let (x, y) = self.to_screen(node.position);
				format!(
					r#"<g class="node" data-cluster="{cluster}"><title>{title}</title><circle cx="{x:.2}" cy="{y:.2}" r="{radius}" fill="{fill}" stroke="{stroke}" stroke-width="{sw}"/><text x="{x:.2}" y="{ty:.2}" font-size="{fs}" fill="{tc}" text-anchor="middle">{name}</text></g>
"#,
					cluster = node.cluster,
					title = html_escape(&node.hover_text()),
					fill = node.color.to_css(),
					stroke = theme.node.border_color.to_css(),
					sw = theme.node.border_width,
					ty = y - radius - 4.0,
					fs = self.style.node_label_size,
					tc = theme.node.label_color.to_css(),
					name = html_escape(&node.name),
				)
			})
			.collect()
	}

	#[allow(clippy::cast_precision_loss)]
	fn svg_colorbar(&self, theme: &Theme) -> String {
		if !self.style.show_scale || self.nodes.is_empty() {
			return String::new();
		}
		let s = &self.style;
		let (x, y) = (s.width - s.margin.right - 60.0, s.margin.top);
		let h = s.height - s.margin.top - s.margin.bottom;

		let stops: String = theme
			.cluster_scale
			.stops
			.iter()
			.map(|(pos, color)| {
				format!(
					r#"<stop offset="{:.4}" stop-color="{}"/>"#,
					1.0 - pos,
					color.to_css_rgb()
				)
			})
			.collect();

		let (lo, hi) = self.cluster_range;
		format!(
			r#"<defs><linearGradient id="cluster-scale" x1="0" y1="0" x2="0" y2="1">{stops}</linearGradient></defs>
<g class="colorbar"><rect x="{x}" y="{y}" width="18" height="{h}" fill="url(#cluster-scale)"/><text x="{tx}" y="{y_hi}" font-size="11" fill="{c}">{hi}</text><text x="{tx}" y="{y_lo}" font-size="11" fill="{c}">{lo}</text></g>
"#,
			tx = x + 24.0,
			y_hi = y + 10.0,
			y_lo = y + h,
			c = theme.node.label_color.to_css(),
		)
	}
}

fn inline_css(theme: &Theme) -> String {
	format!(
		r#"
html, body {{ margin: 0; height: 100%; background: {bg}; font-family: system-ui, sans-serif; }}
#network {{ width: 100%; height: 100vh; cursor: grab; }}
#network.panning {{ cursor: grabbing; }}
.node circle {{ transition: r 0.15s ease; }}
.node:hover circle {{ stroke: #000; stroke-width: 2; }}
.edge-label {{ pointer-events: none; }}
"#,
		bg = theme.background.color.to_css(),
	)
}

/// Wheel zoom around the cursor and drag-to-pan for the `#viewport` group.
fn inline_javascript() -> &'static str {
	r#"
(function () {
  const svg = document.getElementById('network');
  const viewport = document.getElementById('viewport');
  let t = { x: 0, y: 0, k: 1 };
  let drag = null;
  const apply = () => viewport.setAttribute('transform', `translate(${t.x} ${t.y}) scale(${t.k})`);
  const point = (ev) => {
    const p = svg.createSVGPoint();
    p.x = ev.clientX; p.y = ev.clientY;
    return p.matrixTransform(svg.getScreenCTM().inverse());
  };
  svg.addEventListener('wheel', (ev) => {
    ev.preventDefault();
    const p = point(ev);
    const k = Math.min(10, Math.max(0.1, t.k * (ev.deltaY > 0 ? 0.9 : 1.1)));
    t.x = p.x - (p.x - t.x) * (k / t.k);
    t.y = p.y - (p.y - t.y) * (k / t.k);
    t.k = k;
    apply();
  }, { passive: false });
  svg.addEventListener('mousedown', (ev) => {
    const p = point(ev);
    drag = { x: p.x, y: p.y, tx: t.x, ty: t.y };
    svg.classList.add('panning');
  });
  window.addEventListener('mousemove', (ev) => {
    if (!drag) return;
    const p = point(ev);
    t.x = drag.tx + (p.x - drag.x);
    t.y = drag.ty + (p.y - drag.y);
    apply();
  });
  window.addEventListener('mouseup', () => {
    drag = null;
    svg.classList.remove('panning');
  });
})();
"#
}

fn html_escape(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::network::community::greedy_modularity;
	use crate::network::graph::IsolatedProjects;
	use crate::network::layout::{LayoutConfig, spring_layout};

	fn projects() -> Vec<ProjectTags> {
		[
			("ProjA", vec!["#x", "#y"]),
			("ProjB", vec!["#y", "#z"]),
			("ProjC", vec!["#z"]),
		]
		.into_iter()
		.map(|(name, tags)| ProjectTags {
			name: name.to_string(),
			hashtags: tags.into_iter().map(str::to_string).collect(),
		})
		.collect()
	}

	fn figure() -> Figure {
		let projects = projects();
		let graph = TagGraph::build(&projects, IsolatedProjects::Omit);
		let partition = greedy_modularity(&graph);
		let layout = spring_layout(&graph, &LayoutConfig::default());
		Figure::build(&graph, &partition, &layout, &projects, &Theme::light())
	}

	#[test]
	fn one_label_per_edge_at_midpoint() {
		let fig = figure();
		assert_eq!(fig.edges.len(), 2);
		assert_eq!(fig.edge_labels.len(), 2);
		for (edge, label) in fig.edges.iter().zip(&fig.edge_labels) {
			let mid = ((edge.from.0 + edge.to.0) / 2.0, (edge.from.1 + edge.to.1) / 2.0);
			assert_eq!(label.position, mid);
		}
		let texts: Vec<&str> = fig.edge_labels.iter().map(|l| l.text.as_str()).collect();
		assert!(texts.contains(&"#y"));
		assert!(texts.contains(&"#z"));
	}

	#[test]
	fn hover_text_joins_hashtags() {
		let fig = figure();
		let a = fig.nodes.iter().find(|n| n.name == "ProjA").unwrap();
		assert_eq!(a.hover_text(), "#x\n#y");
	}

	#[test]
	fn graph_data_mirrors_figure() {
		let fig = figure();
		let data = fig.graph_data();
		assert_eq!(data.nodes.len(), fig.nodes.len());
		assert_eq!(data.links.len(), fig.edges.len());
		assert!(data.nodes.iter().all(|n| n.group.is_some() && n.position.is_some()));
	}

	#[test]
	fn html_is_standalone_and_escaped() {
		let mut fig = figure();
		fig.nodes[0].name = "R&D <core>".into();
		let html = fig.to_html(&Theme::light()).unwrap();
		assert!(html.starts_with("<!DOCTYPE html>"));
		assert!(html.contains(r#"id="graph-data""#));
		assert!(html.contains("R&amp;D &lt;core&gt;"));
		assert_eq!(html.matches("<line ").count(), 2);
		assert_eq!(html.matches(r#"class="node""#).count(), 3);
		assert!(html.contains("cluster-scale"));
		assert!(!html.contains("<script src"));
	}

	#[test]
	fn embedded_json_round_trips() {
		let fig = figure();
		let html = fig.to_html(&Theme::light()).unwrap();
		let start = html.find(r#"id="graph-data">"#).unwrap() + r#"id="graph-data">"#.len();
		let end = start + html[start..].find("</script>").unwrap();
		let json = html[start..end].replace("<\\/", "</");
		let data: GraphData = serde_json::from_str(&json).unwrap();
		let expected = fig.graph_data();
		assert_eq!(data.links, expected.links);
		for (got, want) in data.nodes.iter().zip(&expected.nodes) {
			assert_eq!(got.id, want.id);
			assert_eq!(got.group, want.group);
			assert_eq!(got.hashtags, want.hashtags);
			let ((gx, gy), (wx, wy)) = (got.position.unwrap(), want.position.unwrap());
			assert!((gx - wx).abs() < 1e-12 && (gy - wy).abs() < 1e-12);
		}
	}

	#[test]
	fn empty_figure_renders() {
		let fig = Figure::build(
			&TagGraph::default(),
			&Partition::default(),
			&Layout::default(),
			&[],
			&Theme::light(),
		);
		let html = fig.to_html(&Theme::light()).unwrap();
		assert!(!html.contains("cluster-scale"));
	}
}
