//! Pass-through CSV export of the uploaded table.

use csv::Writer;

use super::table::Table;

/// Fixed file name of the CSV download.
pub const CSV_FILE_NAME: &str = "daten.csv";

/// Serializes the table back to CSV: header row first, no index column,
/// blank cells as empty fields.
pub fn table_to_csv(table: &Table) -> Result<String, csv::Error> {
	let mut wtr = Writer::from_writer(vec![]);

	wtr.write_record(&table.headers)?;
	for row in &table.rows {
		wtr.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
	}

	let data = wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
	Ok(String::from_utf8_lossy(&data).into_owned())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trips_cell_for_cell() {
		let input = "Project,Tag 1,Tag 2\n\"Alpha, Inc\",#x,\nBeta,,#y\n";
		let table = Table::from_csv(input.as_bytes()).unwrap();
		let exported = table_to_csv(&table).unwrap();
		assert_eq!(Table::from_csv(exported.as_bytes()).unwrap(), table);
	}

	#[test]
	fn writes_header_first_without_index() {
		let table = Table {
			headers: vec!["Project".into(), "Tag".into()],
			rows: vec![vec![Some("A".into()), None]],
		};
		assert_eq!(table_to_csv(&table).unwrap(), "Project,Tag\nA,\n");
	}
}
