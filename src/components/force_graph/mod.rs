//! Force-directed graph visualization component.
//!
//! Renders the project network on an HTML canvas with:
//! - Physics-based node positioning, seeded from the precomputed layout
//! - Pan, zoom, and node dragging interactions
//! - Shared-hashtag labels at edge midpoints
//! - Smooth highlight transitions and a hashtag tooltip on hover
//! - Configurable theming and visual scaling
//!
//! # Example
//!
//! ```ignore
//! use tagnet::components::force_graph::{ForceGraphCanvas, GraphData, GraphLink, GraphNode};
//!
//! let data = GraphData {
//!     nodes: vec![
//!         GraphNode { id: "A".into(), label: Some("A".into()), ..Default::default() },
//!         GraphNode { id: "B".into(), label: Some("B".into()), ..Default::default() },
//!     ],
//!     links: vec![GraphLink {
//!         source: "A".into(),
//!         target: "B".into(),
//!         label: Some("#x".into()),
//!     }],
//! };
//!
//! view! { <ForceGraphCanvas data=data /> }
//! ```

mod component;
mod render;
pub mod scale;
mod state;
pub mod theme;
mod types;

pub use component::ForceGraphCanvas;
pub use theme::{Color, ColorScale, Theme};
pub use types::{GraphData, GraphLink, GraphNode};
