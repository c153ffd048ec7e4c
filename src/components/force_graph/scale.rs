//! Zoom-dependent sizes for the canvas view.
//!
//! Configured sizes are screen pixels at zoom 1. Everything is drawn after
//! the pan/zoom transform, so [`ScaledValues`] converts them once per frame
//! into world units for the current zoom `k`.

/// A world-space size that follows the zoom but never shrinks below
/// `min_screen` pixels on screen.
#[derive(Clone, Copy, Debug)]
pub struct ZoomClamped {
	/// World-space size.
	pub base: f64,
	/// Smallest on-screen size in pixels.
	pub min_screen: f64,
}

impl ZoomClamped {
	/// World-space size at zoom `k`.
	pub fn at(&self, k: f64) -> f64 {
		self.base.max(self.min_screen / k)
	}
}

/// Opacity ramp over zoom: transparent at `hidden_at` and below, opaque at
/// `opaque_at` and above.
#[derive(Clone, Copy, Debug)]
pub struct ZoomFade {
	/// Zoom at and below which the value is 0.
	pub hidden_at: f64,
	/// Zoom at and above which the value is 1.
	pub opaque_at: f64,
}

impl ZoomFade {
	/// Opacity at zoom `k`.
	pub fn at(&self, k: f64) -> f64 {
		if self.opaque_at <= self.hidden_at {
			return 1.0;
		}
		((k - self.hidden_at) / (self.opaque_at - self.hidden_at)).clamp(0.0, 1.0)
	}
}

/// Size settings for nodes, edges, labels and the hover ring.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Node marker radius.
	pub node_radius: ZoomClamped,
	/// Pointer hit radius around a node centre.
	pub hit_radius: ZoomClamped,
	/// Project name font size in pixels.
	pub node_label_px: f64,
	/// Below this zoom, fonts stop shrinking with the view.
	pub min_font_zoom: f64,
	/// Edge line width in pixels.
	pub edge_width_px: f64,
	/// Shared-hashtag label font size in pixels.
	pub edge_label_px: f64,
	/// Hashtag labels fade out when zoomed far out.
	pub edge_label_fade: ZoomFade,
	/// Labels fainter than this are not drawn at all.
	pub edge_label_cull: f64,
	/// Hover ring stroke width in pixels.
	pub ring_width_px: f64,
	/// Gap between a hovered node and its ring, in pixels.
	pub ring_offset_px: f64,
	/// Canvas pixels per layout unit when placing the precomputed layout.
	pub layout_extent: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node_radius: ZoomClamped {
				base: 10.0,
				min_screen: 5.0,
			},
			hit_radius: ZoomClamped {
				base: 14.0,
				min_screen: 6.0,
			},
			node_label_px: 12.0,
			min_font_zoom: 0.5,
			edge_width_px: 1.0,
			edge_label_px: 8.0,
			edge_label_fade: ZoomFade {
				hidden_at: 0.4,
				opaque_at: 0.9,
			},
			edge_label_cull: 0.05,
			ring_width_px: 1.5,
			ring_offset_px: 2.0,
			layout_extent: 300.0,
		}
	}
}

/// Pre-computed world-space sizes for one zoom level.
///
/// Create this once per frame and pass it to rendering functions.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Zoom level these values were computed for.
	pub k: f64,
	/// Node radius in world units.
	pub node_radius: f64,
	/// Pointer hit radius in world units.
	pub hit_radius: f64,
	/// Node label font (e.g., "12px sans-serif").
	pub label_font: String,
	/// Edge line width in world units.
	pub edge_line_width: f64,
	/// Shared-hashtag label font.
	pub edge_label_font: String,
	/// Edge label alpha multiplier in `[0, 1]`.
	pub edge_label_alpha: f64,
	/// Skip drawing edge labels entirely.
	pub cull_edge_labels: bool,
	/// Hover ring stroke width in world units.
	pub ring_width: f64,
	/// Hover ring gap in world units.
	pub ring_offset: f64,
}

impl ScaledValues {
	/// Converts `config` for zoom `k`.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let font_k = k.max(config.min_font_zoom);
		let edge_label_alpha = config.edge_label_fade.at(k);

		Self {
			k,
			node_radius: config.node_radius.at(k),
			hit_radius: config.hit_radius.at(k),
			label_font: format!("{}px sans-serif", config.node_label_px / font_k),
			edge_line_width: config.edge_width_px / k,
			edge_label_font: format!("{}px sans-serif", config.edge_label_px / font_k),
			edge_label_alpha,
			cull_edge_labels: edge_label_alpha < config.edge_label_cull,
			ring_width: config.ring_width_px / k,
			ring_offset: config.ring_offset_px / k,
		}
	}
}
