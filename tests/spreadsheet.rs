//! Workbook uploads, written with `rust_xlsxwriter` and read back through the loader.

// Test target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use std::collections::BTreeSet;

use rust_xlsxwriter::{Workbook, XlsxError};
use tagnet::network::Table;
use tagnet::{NetworkConfig, analyze_upload};

/// Three projects; `2024` is stored as a number, not as text.
fn workbook() -> Result<Vec<u8>, XlsxError> {
	let mut workbook = Workbook::new();
	let sheet = workbook.add_worksheet();
	for (col, header) in ["Project", "Tag 1", "Tag 2"].into_iter().enumerate() {
		sheet.write_string(0, col as u16, header)?;
	}
	sheet.write_string(1, 0, "ProjA")?;
	sheet.write_string(1, 1, "#x")?;
	sheet.write_string(1, 2, "#y")?;
	sheet.write_string(2, 0, "ProjB")?;
	sheet.write_string(2, 1, "#y")?;
	sheet.write_number(2, 2, 2024)?;
	sheet.write_string(3, 0, "ProjC")?;
	sheet.write_number(3, 1, 2024)?;
	workbook.save_to_buffer()
}

fn tags(list: &[&str]) -> BTreeSet<String> {
	list.iter().map(|t| t.to_string()).collect()
}

#[test]
fn xlsx_first_sheet_loads_with_numeric_cells_as_text() {
	let bytes = workbook().unwrap();
	let table = Table::load("projects.xlsx", &bytes).unwrap();

	assert_eq!(table.headers, vec!["Project", "Tag 1", "Tag 2"]);
	assert_eq!(table.rows.len(), 3);
	assert_eq!(
		table.rows[1],
		vec![Some("ProjB".into()), Some("#y".into()), Some("2024".into())]
	);
	assert_eq!(table.rows[2], vec![Some("ProjC".into()), Some("2024".into()), None]);
}

#[test]
fn workbook_without_extension_is_sniffed_and_analyzed() {
	let bytes = workbook().unwrap();
	let analysis = analyze_upload("upload", &bytes, &NetworkConfig::default()).unwrap();
	let graph = &analysis.graph;

	let (a, b, c) = (
		graph.index_of("ProjA").unwrap(),
		graph.index_of("ProjB").unwrap(),
		graph.index_of("ProjC").unwrap(),
	);
	assert_eq!(graph.edge_count(), 2);
	assert_eq!(graph.edge_between(a, b).unwrap().tags, tags(&["#y"]));
	assert_eq!(graph.edge_between(b, c).unwrap().tags, tags(&["2024"]));
	assert!(graph.edge_between(a, c).is_none());
}

#[test]
fn workbook_csv_export_keeps_cells() {
	let bytes = workbook().unwrap();
	let analysis = analyze_upload("projects.xlsx", &bytes, &NetworkConfig::default()).unwrap();

	let exported = analysis.csv().unwrap();
	assert_eq!(Table::from_csv(exported.as_bytes()).unwrap(), analysis.table);
}
