//! The upload-to-figure pipeline.
//!
//! load → build graph → detect communities → lay out → build figure. Each
//! run is a pure function of the table and the config; nothing is kept
//! between uploads.

pub mod community;
pub mod export;
pub mod figure;
pub mod graph;
pub mod layout;
pub mod table;

use log::info;

pub use community::{Partition, greedy_modularity, modularity};
pub use figure::Figure;
pub use graph::{IsolatedProjects, TagEdge, TagGraph};
pub use layout::{Layout, LayoutConfig, spring_layout};
pub use table::{ProjectRow, ProjectTags, Table, TableFormat};

use crate::components::force_graph::Theme;
use crate::error::{LoadError, Result};

/// Settings for one pipeline run.
#[derive(Clone, Debug, Default)]
pub struct NetworkConfig {
	/// Whether projects without shared hashtags become nodes.
	pub isolated: IsolatedProjects,
	/// Seed and physics of the static layout.
	pub layout: LayoutConfig,
}

/// Result of a full pipeline run.
#[derive(Clone, Debug)]
pub struct Analysis {
	/// The table as uploaded; the CSV download re-serializes it.
	pub table: Table,
	/// Deduplicated projects with their cleaned hashtags.
	pub projects: Vec<ProjectTags>,
	/// Co-occurrence graph over `projects`.
	pub graph: TagGraph,
	/// Clusters found by greedy modularity.
	pub partition: Partition,
	/// Node positions in the `[-1, 1]` box.
	pub layout: Layout,
	/// Drawable form of the network.
	pub figure: Figure,
	/// Modularity Q of `partition`.
	pub modularity: f64,
}

impl Analysis {
	/// Standalone interactive document of the figure.
	pub fn html(&self) -> Result<String> {
		Ok(self.figure.to_html(&Theme::light())?)
	}

	/// The uploaded table, re-serialized unchanged.
	pub fn csv(&self) -> Result<String> {
		Ok(export::table_to_csv(&self.table).map_err(LoadError::from)?)
	}
}

/// Runs the pipeline on an already loaded table.
pub fn analyze(table: Table, config: &NetworkConfig) -> Result<Analysis> {
	let projects = table.project_tags()?;
	let graph = TagGraph::build(&projects, config.isolated);
	let partition = greedy_modularity(&graph);
	let score = modularity(&graph, &partition);
	let layout = spring_layout(&graph, &config.layout);
	let figure = Figure::build(&graph, &partition, &layout, &projects, &Theme::default());

	info!(
		"tagnet: {} projects → {} nodes, {} edges, {} clusters (Q = {:.3})",
		projects.len(),
		graph.node_count(),
		graph.edge_count(),
		partition.len(),
		score
	);

	Ok(Analysis {
		table,
		projects,
		graph,
		partition,
		layout,
		figure,
		modularity: score,
	})
}

/// Loads an uploaded file and runs the pipeline on it.
pub fn analyze_upload(file_name: &str, bytes: &[u8], config: &NetworkConfig) -> Result<Analysis> {
	let table = Table::load(file_name, bytes)?;
	analyze(table, config)
}
