//! Download buttons for the exported figure and the uploaded table.

use std::sync::Arc;

use js_sys::Array;
use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::network::Analysis;
use crate::network::export::CSV_FILE_NAME;
use crate::network::figure::HTML_FILE_NAME;

/// Saves `contents` under `file_name` through a temporary object URL.
fn save_as(file_name: &str, contents: &str, mime: &str) -> Result<(), JsValue> {
	let options = BlobPropertyBag::new();
	options.set_type(mime);
	let blob =
		Blob::new_with_str_sequence_and_options(&Array::of1(&JsValue::from_str(contents)), &options)?;
	let url = Url::create_object_url_with_blob(&blob)?;

	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| JsValue::from_str("no document"))?;
	let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
	anchor.set_href(&url);
	anchor.set_download(file_name);
	anchor.click();

	Url::revoke_object_url(&url)
}

/// Buttons for `netzwerk.html` and `daten.csv`; hidden until an analysis exists.
///
/// A failed download is reported next to the buttons and leaves the shown
/// network alone.
#[component]
pub fn Downloads(#[prop(into)] analysis: Signal<Option<Arc<Analysis>>>) -> impl IntoView {
	let failure = RwSignal::new(None::<String>);
	let export = move |file_name: &'static str| {
		let Some(analysis) = analysis.get() else {
			return;
		};
		failure.set(None);
		let (contents, mime) = match file_name {
			HTML_FILE_NAME => (analysis.html(), "text/html;charset=utf-8"),
			_ => (analysis.csv(), "text/csv;charset=utf-8"),
		};
		let result = contents
			.map_err(|e| e.to_string())
			.and_then(|text| save_as(file_name, &text, mime).map_err(|e| format!("{e:?}")));
		match result {
			Ok(()) => info!("tagnet: downloaded {}", file_name),
			Err(message) => {
				warn!("tagnet: download of {} failed: {}", file_name, message);
				failure.set(Some(message));
			}
		}
	};

	view! {
		<Show when=move || analysis.with(Option::is_some)>
			<div class="downloads">
				<button on:click=move |_| export(HTML_FILE_NAME)>"Download network (HTML)"</button>
				<button on:click=move |_| export(CSV_FILE_NAME)>"Download data (CSV)"</button>
				{move || failure.get().map(|message| view! { <p class="download-error">{message}</p> })}
			</div>
		</Show>
	}
}
