//! Visual theming for the force graph and the exported figure.
//!
//! Provides colors, the continuous cluster color scale, and style settings.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha in `[0, 1]`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color, different alpha.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		let mix = |a: u8, b: u8| (a as f64 * (1.0 - t) + b as f64 * t).round() as u8;
		Self {
			r: mix(self.r, other.r),
			g: mix(self.g, other.g),
			b: mix(self.b, other.b),
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	/// CSS `rgba()` or, when opaque, hex notation.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			self.to_css_rgb()
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// CSS hex notation, ignoring alpha.
	pub fn to_css_rgb(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}

	/// Parses a CSS color string.
	/// Supports hex (`#RRGGBB`) and `rgb()`/`rgba()` functional notation;
	/// anything else falls back to mid gray.
	pub fn parse(color_str: &str) -> Color {
		if color_str.starts_with('#') && color_str.len() == 7 {
			let channel = |range: std::ops::Range<usize>| {
				u8::from_str_radix(&color_str[range], 16).unwrap_or(128)
			};
			Color::rgb(channel(1..3), channel(3..5), channel(5..7))
		} else if color_str.starts_with("rgb") {
			let nums: Vec<&str> = color_str
				.trim_start_matches("rgba(")
				.trim_start_matches("rgb(")
				.trim_end_matches(')')
				.split(',')
				.collect();
			let channel = |i: usize| {
				nums.get(i)
					.and_then(|s| s.trim().parse().ok())
					.unwrap_or(128)
			};
			let a = nums
				.get(3)
				.and_then(|s| s.trim().parse().ok())
				.unwrap_or(1.0);
			Color::rgba(channel(0), channel(1), channel(2), a)
		} else {
			Color::rgb(128, 128, 128)
		}
	}
}

/// A continuous color scale given by sorted `(position, color)` stops on `[0, 1]`.
#[derive(Clone, Debug)]
pub struct ColorScale {
	/// Stops sorted by position.
	pub stops: Vec<(f64, Color)>,
}

impl ColorScale {
	/// The Viridis scale, sampled at the same stops plotting libraries use.
	pub fn viridis() -> Self {
		const HEX: [u32; 17] = [
			0x440154, 0x48186a, 0x472d7b, 0x424086, 0x3b528b, 0x33638d, 0x2c728e, 0x26828e,
			0x21918c, 0x1fa088, 0x28ae80, 0x3fbc73, 0x5ec962, 0x84d44b, 0xaddc30, 0xd8e219,
			0xfde725,
		];
		let stops = HEX
			.iter()
			.enumerate()
			.map(|(i, &hex)| {
				let position = if i == HEX.len() - 1 {
					1.0
				} else {
					(i * 16) as f64 / 255.0
				};
				let color = Color::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8);
				(position, color)
			})
			.collect();
		Self { stops }
	}

	/// Color at `t` (clamped to `[0, 1]`).
	pub fn sample(&self, t: f64) -> Color {
		let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
		let Some(&(_, first)) = self.stops.first() else {
			return Color::rgb(128, 128, 128);
		};

		let mut prev = (0.0, first);
		for &(pos, color) in &self.stops {
			if t <= pos {
				let span = pos - prev.0;
				if span <= 0.0 {
					return color;
				}
				return prev.1.lerp(color, (t - prev.0) / span);
			}
			prev = (pos, color);
		}
		prev.1
	}

	/// Color for `value` on a scale spanning `min..=max`. A zero-width range
	/// maps everything to the low end.
	pub fn sample_range(&self, value: f64, min: f64, max: f64) -> Color {
		if max > min {
			self.sample((value - min) / (max - min))
		} else {
			self.sample(0.0)
		}
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for gradients
	pub color_secondary: Color,
	/// Whether to use radial gradient
	pub use_gradient: bool,
	/// Vignette intensity (0.0 = none, 1.0 = strong)
	pub vignette: f64,
}

/// Edge visual style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Base edge color
	pub color: Color,
	/// Color of the shared-hashtag text at the edge midpoint
	pub label_color: Color,
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Whether nodes have inner gradients
	pub use_gradient: bool,
	/// Border/stroke width (0 = no border)
	pub border_width: f64,
	/// Border color
	pub border_color: Color,
	/// Project name color
	pub label_color: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas background.
	pub background: BackgroundStyle,
	/// Edge lines and labels.
	pub edge: EdgeStyle,
	/// Node markers and names.
	pub node: NodeStyle,
	/// Maps cluster ids to node colors.
	pub cluster_scale: ColorScale,
}

impl Theme {
	/// Dark canvas theme used by the interactive view (default)
	pub fn default_theme() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(30, 35, 42),
				use_gradient: true,
				vignette: 0.15,
			},
			edge: EdgeStyle {
				color: Color::rgba(140, 160, 180, 0.5),
				label_color: Color::rgba(200, 210, 220, 0.8),
			},
			node: NodeStyle {
				use_gradient: true,
				border_width: 0.0,
				border_color: Color::rgba(255, 255, 255, 0.0),
				label_color: Color::rgba(255, 255, 255, 0.85),
			},
			cluster_scale: ColorScale::viridis(),
		}
	}

	/// Plain light theme used for exported documents
	pub fn light() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(255, 255, 255),
				color_secondary: Color::rgb(229, 236, 246),
				use_gradient: false,
				vignette: 0.0,
			},
			edge: EdgeStyle {
				color: Color::rgb(128, 128, 128),
				label_color: Color::rgb(42, 63, 95),
			},
			node: NodeStyle {
				use_gradient: false,
				border_width: 1.0,
				border_color: Color::rgb(255, 255, 255),
				label_color: Color::rgb(42, 63, 95),
			},
			cluster_scale: ColorScale::viridis(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn viridis_endpoints() {
		let scale = ColorScale::viridis();
		assert_eq!(scale.sample(0.0).to_css(), "#440154");
		assert_eq!(scale.sample(1.0).to_css(), "#fde725");
		assert_eq!(scale.sample(-3.0), scale.sample(0.0));
		assert_eq!(scale.sample(7.0), scale.sample(1.0));
	}

	#[test]
	fn zero_width_range_uses_low_end() {
		let scale = ColorScale::viridis();
		assert_eq!(scale.sample_range(0.0, 0.0, 0.0), scale.sample(0.0));
		assert_eq!(scale.sample_range(4.0, 0.0, 4.0), scale.sample(1.0));
	}

	#[test]
	fn parses_css_colors() {
		assert_eq!(Color::parse("#ff8000"), Color::rgb(255, 128, 0));
		assert_eq!(Color::parse("rgba(1, 2, 3, 0.5)"), Color::rgba(1, 2, 3, 0.5));
		assert_eq!(Color::parse("teal"), Color::rgb(128, 128, 128));
	}
}
