//! File picker for the project table.
//!
//! Reads the chosen file into memory and hands it to the page, which runs
//! the pipeline. Read failures and pipeline errors show up as a message
//! below the picker.

use std::sync::Arc;

use js_sys::Uint8Array;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, warn};
use wasm_bindgen_futures::JsFuture;
use web_sys::File;

use crate::error::LoadError;

/// File types offered by the picker.
pub const ACCEPTED_TYPES: &str = ".csv,.xlsx,.xlsm,.xls,.ods";

/// An uploaded file, fully read.
#[derive(Clone, Debug)]
pub struct UploadedFile {
	/// File name as reported by the browser.
	pub name: String,
	/// Raw file contents.
	pub bytes: Arc<[u8]>,
}

async fn read_file(file: &File) -> Result<Vec<u8>, LoadError> {
	let buffer = JsFuture::from(file.array_buffer())
		.await
		.map_err(|e| LoadError::Unreadable(format!("{e:?}")))?;
	Ok(Uint8Array::new(&buffer).to_vec())
}

/// File input, "show isolated projects" toggle, and error banner.
#[component]
pub fn Upload(
	/// Called once the chosen file has been read.
	on_file: Callback<UploadedFile>,
	show_isolated: RwSignal<bool>,
	error: RwSignal<Option<String>>,
) -> impl IntoView {
	let input_ref = NodeRef::<leptos::html::Input>::new();

	let on_change = move |_| {
		let Some(input) = input_ref.get() else {
			return;
		};
		let Some(file) = input.files().and_then(|files| files.get(0)) else {
			return;
		};
		let name = file.name();
		debug!("tagnet: reading '{}' ({} bytes)", name, file.size());

		spawn_local(async move {
			match read_file(&file).await {
				Ok(bytes) => on_file.run(UploadedFile {
					name,
					bytes: bytes.into(),
				}),
				Err(e) => {
					warn!("tagnet: {}", e);
					error.set(Some(e.to_string()));
				}
			}
		});
	};

	view! {
		<div class="upload">
			<label class="upload-picker">
				"Project table (CSV or Excel): "
				<input node_ref=input_ref type="file" accept=ACCEPTED_TYPES on:change=on_change />
			</label>
			<label class="upload-toggle">
				<input
					type="checkbox"
					prop:checked=move || show_isolated.get()
					on:change=move |ev| show_isolated.set(event_target_checked(&ev))
				/>
				" Show projects without shared hashtags"
			</label>
			{move || error.get().map(|message| view! { <p class="upload-error">{message}</p> })}
		</div>
	}
}
