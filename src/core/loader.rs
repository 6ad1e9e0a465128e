//! Reads the displacement table from CSV into normalized records.

use crate::core::count::parse_count_str;
use crate::domain::model::DisplacementRecord;
use crate::utils::error::{EtlError, Result};

pub const PERIOD_COLUMN: &str = "Period";
pub const ORIGIN_COLUMN: &str = "Origin_Country";
pub const DESTINATION_COLUMN: &str = "Destination_Country";
pub const COUNT_COLUMN: &str = "Number_Displaced";

/// `" Number Displaced "` becomes `"Number_Displaced"`.
pub fn normalize_header(header: &str) -> String {
    header.trim().replace(' ', "_")
}

struct ColumnIndex {
    period: usize,
    origin: usize,
    destination: usize,
    count: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let find = |column: &str| {
            normalized
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| EtlError::MissingColumn {
                    column: column.to_string(),
                })
        };

        Ok(Self {
            period: find(PERIOD_COLUMN)?,
            origin: find(ORIGIN_COLUMN)?,
            destination: find(DESTINATION_COLUMN)?,
            count: find(COUNT_COLUMN)?,
        })
    }
}

/// Parse CSV bytes into records. Any unparsable count fails the whole load.
pub fn load_records(data: &[u8]) -> Result<Vec<DisplacementRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(data);

    let columns = ColumnIndex::from_headers(reader.headers()?)?;
    let mut records = Vec::new();

    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let row_number = index + 1;
        let field = |i: usize| row.get(i).unwrap_or_default();

        let number_displaced = parse_count_str(field(columns.count)).map_err(|e| {
            tracing::error!(
                "Rejecting displacement table: row {} ({} → {}) has an unparsable count",
                row_number,
                field(columns.origin),
                field(columns.destination)
            );
            e.at_row(row_number)
        })?;

        records.push(DisplacementRecord {
            period: field(columns.period).to_string(),
            origin_country: field(columns.origin).to_string(),
            destination_country: field(columns.destination).to_string(),
            number_displaced,
        });
    }

    tracing::debug!("Loaded {} displacement records", records.len());
    Ok(records)
}
