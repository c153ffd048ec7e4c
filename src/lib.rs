//! tagnet: Project/hashtag co-occurrence network explorer.
//!
//! Upload a table with one project per row and hashtag columns after the
//! project name. Projects that share a hashtag are linked, clustered by
//! greedy modularity maximisation, laid out with a seeded force simulation,
//! and shown on an interactive canvas. The figure can be downloaded as a
//! standalone HTML document, the table as CSV.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod error;
pub mod network;

pub use components::force_graph::{ForceGraphCanvas, GraphData, GraphLink, GraphNode};
pub use network::{Analysis, IsolatedProjects, NetworkConfig, analyze, analyze_upload};

use components::downloads::Downloads;
use components::upload::{Upload, UploadedFile};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("tagnet: logging initialized");
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], links: [...] }
fn load_graph_data() -> Option<GraphData> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<GraphData>(&json_text) {
		Ok(data) => {
			info!(
				"tagnet: loaded {} nodes, {} links",
				data.nodes.len(),
				data.links.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("tagnet: failed to parse graph data: {}", e);
			None
		}
	}
}

const PAGE_STYLE: &str = r#"
body { margin: 0; font-family: sans-serif; background: #161b22; color: #e6edf3; }
.page { max-width: 1200px; margin: 0 auto; padding: 1rem 1.5rem; }
.subtitle { color: #8b949e; }
.upload { display: flex; flex-direction: column; gap: 0.5rem; margin: 1rem 0; }
.upload-error, .download-error { color: #ff7b72; }
.summary { color: #7ee787; }
.graph-frame { height: 700px; border: 1px solid #30363d; border-radius: 6px; overflow: hidden; }
.downloads { display: flex; gap: 0.75rem; margin: 1rem 0; }
"#;

/// Main application component.
///
/// Every upload (and every flip of the isolated-projects toggle) re-runs the
/// whole pipeline on the uploaded bytes. A page that ships a `graph-data`
/// element shows that graph until the first upload.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let embedded = load_graph_data();
	let upload = RwSignal::new(None::<UploadedFile>);
	let show_isolated = RwSignal::new(false);
	let analysis = RwSignal::new(None::<Arc<Analysis>>);
	let error = RwSignal::new(None::<String>);

	Effect::new(move |_| {
		let Some(file) = upload.get() else {
			return;
		};
		let config = NetworkConfig {
			isolated: if show_isolated.get() {
				IsolatedProjects::Show
			} else {
				IsolatedProjects::Omit
			},
			..NetworkConfig::default()
		};

		match analyze_upload(&file.name, &file.bytes, &config) {
			Ok(result) => {
				error.set(None);
				analysis.set(Some(Arc::new(result)));
			}
			Err(e) => {
				warn!("tagnet: '{}': {}", file.name, e);
				analysis.set(None);
				error.set(Some(e.to_string()));
			}
		}
	});

	let has_upload = move || upload.with(Option::is_some);
	let graph_signal = Signal::derive(move || {
		analysis
			.with(|a| a.as_ref().map(|a| a.figure.graph_data()))
			.or_else(|| embedded.clone().filter(|_| !has_upload()))
			.unwrap_or_default()
	});
	let show_graph = move || {
		error.with(Option::is_none)
			&& (analysis.with(Option::is_some) || !graph_signal.with(|g| g.nodes.is_empty()))
	};

	let summary = move || {
		analysis.get().map(|a| {
			format!(
				"{} projects, {} links, {} clusters (modularity {:.3})",
				a.graph.node_count(),
				a.graph.edge_count(),
				a.partition.len(),
				a.modularity
			)
		})
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Project Hashtag Network" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />
		<Style>{PAGE_STYLE}</Style>

		<div class="page">
			<h1>"Project Hashtag Network"</h1>
			<p class="subtitle">
				"Upload a table with the project name in the first column and hashtags in the following columns. "
				"Projects sharing a hashtag are linked; colors mark thematic clusters. "
				"Drag nodes to reposition. Scroll to zoom. Drag background to pan."
			</p>

			<Upload
				on_file=Callback::new(move |file: UploadedFile| upload.set(Some(file)))
				show_isolated=show_isolated
				error=error
			/>

			<Show when=show_graph>
				{move || summary().map(|text| view! { <p class="summary">{text}</p> })}
				<div class="graph-frame">
					<ForceGraphCanvas data=graph_signal />
				</div>
			</Show>

			<Downloads analysis=analysis />
		</div>
	}
}
