//! Canvas rendering for the force graph.
//!
//! Rendering uses multiple passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Edge lines, then shared-hashtag labels at edge midpoints (world space)
//! 3. Non-highlighted nodes, then highlighted nodes on top
//! 4. Vignette and the hover tooltip (screen space)

use std::f64::consts::PI;

use force_graph::Node;
use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::{ForceGraphState, NodeInfo};
use super::theme::{Color, Theme};

fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Renders the complete graph to the canvas.
pub fn render(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let scale = ScaledValues::new(config, state.transform.k);

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx, &scale, theme);
	if !scale.cull_edge_labels {
		draw_edge_labels(state, ctx, &scale, theme);
	}
	draw_nodes(state, ctx, &scale, theme);

	ctx.restore();

	if theme.background.vignette > 0.0 {
		draw_vignette(state, ctx, theme);
	}
	draw_tooltip(state, ctx, &scale, theme);
}

fn draw_background(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (cx, cy) = (state.width / 2.0, state.height / 2.0);
	let gradient = theme
		.background
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, state.width.max(state.height) * 0.8)
				.ok()
		})
		.flatten();

	if let Some(gradient) = gradient {
		let _ = gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css());
		let _ = gradient.add_color_stop(1.0, &theme.background.color.to_css());
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
	} else {
		ctx.set_fill_style_str(&theme.background.color.to_css());
	}

	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_vignette(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (cx, cy) = (state.width / 2.0, state.height / 2.0);
	let Ok(gradient) = ctx.create_radial_gradient(
		cx,
		cy,
		state.width.min(state.height) * 0.3,
		cx,
		cy,
		state.width.max(state.height) * 0.7,
	) else {
		return;
	};

	let _ = gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)");
	let _ = gradient.add_color_stop(
		1.0,
		&format!("rgba(0, 0, 0, {})", theme.background.vignette),
	);

	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

/// Edge opacity and width multiplier under the current hover highlight.
fn edge_emphasis(state: &ForceGraphState, n1: &Node<NodeInfo>, n2: &Node<NodeInfo>) -> (f64, f64) {
	let edge_t = smooth_step(state.highlight.edge_intensity(n1.index(), n2.index()));
	let max_t = smooth_step(state.highlight.max_intensity());

	if edge_t > 0.01 {
		(0.7 + 0.3 * edge_t, 1.0 + 0.6 * edge_t)
	} else if max_t > 0.01 {
		(0.7 - 0.5 * max_t, 1.0 - 0.3 * max_t)
	} else {
		(0.7, 1.0)
	}
}

fn draw_edges(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let edge_color = theme.edge.color;

	state.graph.visit_edges(|n1, n2, _| {
		let (alpha, width_mult) = edge_emphasis(state, n1, n2);

		ctx.set_stroke_style_str(&edge_color.with_alpha(alpha * edge_color.a).to_css());
		ctx.set_line_width(scale.edge_line_width * width_mult);

		ctx.begin_path();
		ctx.move_to(n1.x() as f64, n1.y() as f64);
		ctx.line_to(n2.x() as f64, n2.y() as f64);
		ctx.stroke();
	});
}

fn draw_edge_labels(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let label_color = theme.edge.label_color;
	let max_t = smooth_step(state.highlight.max_intensity());

	ctx.set_font(&scale.edge_label_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	state.graph.visit_edges(|n1, n2, _| {
		let Some(label) = state.edge_label(n1.index(), n2.index()) else {
			return;
		};

		// labels of edges outside the hovered neighbourhood dim with the rest
		let edge_t = smooth_step(state.highlight.edge_intensity(n1.index(), n2.index()));
		let dim = 1.0 - 0.8 * max_t * (1.0 - edge_t);
		let alpha = label_color.a * scale.edge_label_alpha * dim;
		if alpha < 0.01 {
			return;
		}

		let mid_x = (n1.x() as f64 + n2.x() as f64) / 2.0;
		let mid_y = (n1.y() as f64 + n2.y() as f64) / 2.0;
		ctx.set_fill_style_str(&label_color.with_alpha(alpha).to_css());
		let _ = ctx.fill_text(label, mid_x, mid_y);
	});

	ctx.set_text_align("start");
	ctx.set_text_baseline("alphabetic");
}

fn draw_nodes(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let max_t = smooth_step(state.highlight.max_intensity());
	let has_highlight = max_t > 0.01;
	let (dim_alpha, dim_radius) = if has_highlight {
		(1.0 - 0.7 * max_t, 1.0 - 0.15 * max_t)
	} else {
		(1.0, 1.0)
	};

	// Pass 1: non-highlighted nodes
	state.graph.visit_nodes(|node| {
		if state.highlight.node_intensity(node.index()) > 0.001 {
			return;
		}
		draw_node(ctx, node, scale, theme, dim_alpha, dim_radius);
	});

	// Pass 2: highlighted/transitioning nodes on top
	state.graph.visit_nodes(|node| {
		let idx = node.index();
		let node_t = state.highlight.node_intensity(idx);
		if node_t <= 0.001 {
			return;
		}

		let eased_t = smooth_step(node_t);
		let is_hovered = state.highlight.hovered_node == Some(idx);
		let highlight_radius = if is_hovered { 1.0 + 0.4 * eased_t } else { 1.0 + 0.25 * eased_t };

		let alpha = dim_alpha + (1.0 - dim_alpha) * eased_t;
		let radius_mult = dim_radius + (highlight_radius - dim_radius) * eased_t;
		draw_node(ctx, node, scale, theme, alpha, radius_mult);

		if is_hovered {
			let (x, y) = (node.x() as f64, node.y() as f64);
			let radius = scale.node_radius * radius_mult * node.data.user_data.size;
			let ring = theme.node.label_color;

			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + scale.ring_offset, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&ring.with_alpha(0.8 * eased_t).to_css());
			ctx.set_line_width(scale.ring_width);
			ctx.stroke();
		}
	});
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &Node<NodeInfo>,
	scale: &ScaledValues,
	theme: &Theme,
	alpha: f64,
	radius_mult: f64,
) {
	let (x, y) = (node.x() as f64, node.y() as f64);
	let info = &node.data.user_data;
	let radius = scale.node_radius * radius_mult * info.size;

	ctx.set_global_alpha(alpha);

	let gradient = theme
		.node
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
				.ok()
		})
		.flatten();

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	if let Some(gradient) = gradient {
		let base_color = Color::parse(&info.color);
		let _ = gradient.add_color_stop(0.0, &base_color.lighten(0.4).to_css());
		let _ = gradient.add_color_stop(0.7, &base_color.to_css());
		let _ = gradient.add_color_stop(1.0, &base_color.darken(0.2).to_css());
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
	} else {
		ctx.set_fill_style_str(&info.color);
	}
	ctx.fill();

	if theme.node.border_width > 0.0 {
		ctx.set_stroke_style_str(&theme.node.border_color.to_css());
		ctx.set_line_width(theme.node.border_width / scale.k);
		ctx.stroke();
	}

	// project names are always shown, centered above the marker
	if let Some(label) = &info.label {
		ctx.set_fill_style_str(&theme.node.label_color.to_css());
		ctx.set_font(&scale.label_font);
		ctx.set_text_align("center");
		let _ = ctx.fill_text(label, x, y - radius - 4.0 / scale.k);
		ctx.set_text_align("start");
	}

	ctx.set_global_alpha(1.0);
}

/// Hover box next to the hovered node: project name, then one hashtag per line.
fn draw_tooltip(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let Some(((x, y), info)) = state.highlight.hovered_node.and_then(|idx| state.node(idx)) else {
		return;
	};

	let mut lines: Vec<&str> = info.label.iter().map(String::as_str).collect();
	lines.extend(info.hashtags.iter().map(String::as_str));
	if lines.is_empty() {
		return;
	}

	const PADDING: f64 = 6.0;
	const LINE_HEIGHT: f64 = 15.0;

	ctx.set_font("12px sans-serif");
	let text_width = lines
		.iter()
		.filter_map(|line| ctx.measure_text(line).ok())
		.map(|metrics| metrics.width())
		.fold(0.0, f64::max);

	let box_w = text_width + PADDING * 2.0;
	let box_h = lines.len() as f64 * LINE_HEIGHT + PADDING * 2.0;
	let offset = scale.node_radius * info.size * state.transform.k + 8.0;
	let (sx, sy) = state.transform.to_screen(x, y);
	let (sx, sy) = (sx + offset, sy - box_h / 2.0);
	let bx = sx.min(state.width - box_w - PADDING).max(PADDING);
	let by = sy.min(state.height - box_h - PADDING).max(PADDING);

	ctx.set_fill_style_str(&Color::parse(&info.color).darken(0.5).with_alpha(0.92).to_css());
	ctx.fill_rect(bx, by, box_w, box_h);
	ctx.set_stroke_style_str(&theme.node.label_color.with_alpha(0.4).to_css());
	ctx.set_line_width(1.0);
	ctx.stroke_rect(bx, by, box_w, box_h);

	ctx.set_fill_style_str("rgba(255, 255, 255, 0.95)");
	ctx.set_text_baseline("top");
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, bx + PADDING, by + PADDING + i as f64 * LINE_HEIGHT);
	}
	ctx.set_text_baseline("alphabetic");
}
