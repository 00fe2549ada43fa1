//! Export adapter: flat cell rows as CSV text or an Arrow `RecordBatch`
//!
//! The column set is fixed (the superset of every view), so a single-cell
//! export, a comparison across experiments and a re-import all share one
//! schema. Missing values render as empty fields, never as dropped columns.

use arrow::array::{ArrayRef, Float64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Arc;

use crate::cell::{slot_label, CellRecord, CellType};
use crate::summary::CellStatus;
use crate::{Error, Result};

/// CSV header, in column order.
pub const CSV_COLUMNS: [&str; 10] = [
    "Experiment",
    "Cell",
    "Type",
    "Temperature (C)",
    "Voltage (V)",
    "Current (A)",
    "Capacity (mAh)",
    "Min Voltage (V)",
    "Max Voltage (V)",
    "Status",
];

/// One flat export row (one cell, or one cell of one experiment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellRow {
    /// Owning experiment, set when rows of several experiments are mixed
    pub experiment: Option<String>,
    /// 1-based slot
    pub slot_index: usize,
    /// Chemistry
    pub cell_type: Option<CellType>,
    /// Temperature (°C)
    pub temperature: Option<f64>,
    /// Voltage (V)
    pub voltage: Option<f64>,
    /// Current (A)
    pub current: Option<f64>,
    /// Capacity (mAh)
    pub capacity: Option<f64>,
    /// Lower band bound (V)
    pub min_voltage: Option<f64>,
    /// Upper band bound (V)
    pub max_voltage: Option<f64>,
    /// Voltage status
    pub status: Option<CellStatus>,
}

impl CellRow {
    /// Flatten a cell record, optionally tagging it with an experiment name.
    #[must_use]
    pub fn from_record(cell: &CellRecord, experiment: Option<&str>) -> Self {
        Self {
            experiment: experiment.map(str::to_string),
            slot_index: cell.slot_index(),
            cell_type: Some(cell.cell_type()),
            temperature: Some(cell.temperature()),
            voltage: Some(cell.voltage()),
            current: Some(cell.current()),
            capacity: Some(cell.capacity()),
            min_voltage: Some(cell.min_voltage()),
            max_voltage: Some(cell.max_voltage()),
            status: Some(CellStatus::of(cell)),
        }
    }

    fn to_fields(&self) -> [String; 10] {
        [
            self.experiment.clone().unwrap_or_default(),
            slot_label(self.slot_index),
            self.cell_type.map(|t| t.to_string()).unwrap_or_default(),
            number(self.temperature),
            number(self.voltage),
            number(self.current),
            number(self.capacity),
            number(self.min_voltage),
            number(self.max_voltage),
            self.status.map(|s| s.to_string()).unwrap_or_default(),
        ]
    }

    fn from_record_fields(line: u64, record: &StringRecord) -> Result<Self> {
        if record.len() != CSV_COLUMNS.len() {
            return Err(Error::ParseError(format!(
                "line {line}: expected {} fields, found {}",
                CSV_COLUMNS.len(),
                record.len()
            )));
        }
        let at = |i: usize| record.get(i).unwrap_or_default();

        Ok(Self {
            experiment: optional(at(0)).map(str::to_string),
            slot_index: parse_slot(line, at(1))?,
            cell_type: optional(at(2))
                .map(str::parse::<CellType>)
                .transpose()
                .map_err(|e| Error::ParseError(format!("line {line}: {e}")))?,
            temperature: parse_number(line, CSV_COLUMNS[3], at(3))?,
            voltage: parse_number(line, CSV_COLUMNS[4], at(4))?,
            current: parse_number(line, CSV_COLUMNS[5], at(5))?,
            capacity: parse_number(line, CSV_COLUMNS[6], at(6))?,
            min_voltage: parse_number(line, CSV_COLUMNS[7], at(7))?,
            max_voltage: parse_number(line, CSV_COLUMNS[8], at(8))?,
            status: match optional(at(9)) {
                None => None,
                Some("Normal") => Some(CellStatus::Normal),
                Some("Out of Range") => Some(CellStatus::OutOfRange),
                Some(other) => {
                    return Err(Error::ParseError(format!(
                        "line {line}: unknown status '{other}'"
                    )))
                }
            },
        })
    }
}

/// Flatten every cell of a bank, untagged.
#[must_use]
pub fn rows_for(cells: &[CellRecord]) -> Vec<CellRow> {
    cells.iter().map(|c| CellRow::from_record(c, None)).collect()
}

/// Write rows as CSV into `writer`: header line, then one line per row, in
/// input order.
///
/// Numbers use their shortest round-tripping form; absent values are empty
/// fields. Fields containing a comma, quote or line break are quoted.
///
/// # Errors
///
/// Returns `Csv` if the underlying writer fails.
pub fn write_csv<W: Write>(rows: &[CellRow], writer: W) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    writer.write_record(CSV_COLUMNS)?;
    for row in rows {
        writer.write_record(row.to_fields())?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Render rows as a CSV string (see [`write_csv`]).
///
/// # Errors
///
/// Returns `Csv` if the rows cannot be encoded.
pub fn to_csv(rows: &[CellRow]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    String::from_utf8(buf)
        .map_err(|e| Error::InvalidArgument(format!("CSV output is not UTF-8: {e}")))
}

/// Parse CSV produced by [`to_csv`] back into rows.
///
/// Blank lines are skipped and both LF and CRLF line endings are accepted.
///
/// # Errors
///
/// Returns `ParseError` if the header does not match, a record has the wrong
/// number of fields, or a value cannot be parsed.
pub fn parse_csv(text: &str) -> Result<Vec<CellRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let header = reader
        .headers()
        .map_err(|e| Error::ParseError(format!("header: {e}")))?;
    if header.iter().ne(CSV_COLUMNS.iter().copied()) {
        return Err(Error::ParseError(format!(
            "unexpected header: {}",
            header.iter().collect::<Vec<_>>().join(",")
        )));
    }

    reader
        .records()
        .map(|record| {
            let record = record.map_err(|e| Error::ParseError(e.to_string()))?;
            let line = record.position().map_or(0, csv::Position::line);
            CellRow::from_record_fields(line, &record)
        })
        .collect()
}

/// Build an Arrow `RecordBatch` with one column per CSV column.
///
/// # Errors
///
/// Returns `Arrow` if the batch cannot be assembled.
pub fn to_record_batch(rows: &[CellRow]) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("experiment", DataType::Utf8, true),
        Field::new("slot", DataType::UInt64, false),
        Field::new("cell_type", DataType::Utf8, true),
        Field::new("temperature_c", DataType::Float64, true),
        Field::new("voltage_v", DataType::Float64, true),
        Field::new("current_a", DataType::Float64, true),
        Field::new("capacity_mah", DataType::Float64, true),
        Field::new("min_voltage_v", DataType::Float64, true),
        Field::new("max_voltage_v", DataType::Float64, true),
        Field::new("status", DataType::Utf8, true),
    ]));

    let slots = rows
        .iter()
        .map(|r| u64::try_from(r.slot_index))
        .collect::<std::result::Result<Vec<u64>, _>>()
        .map_err(|e| Error::InvalidArgument(format!("slot index: {e}")))?;
    let float = |get: fn(&CellRow) -> Option<f64>| -> ArrayRef {
        Arc::new(rows.iter().map(get).collect::<Float64Array>())
    };

    let columns: Vec<ArrayRef> = vec![
        Arc::new(
            rows.iter()
                .map(|r| r.experiment.as_deref())
                .collect::<StringArray>(),
        ),
        Arc::new(UInt64Array::from(slots)),
        Arc::new(
            rows.iter()
                .map(|r| r.cell_type.map(CellType::as_str))
                .collect::<StringArray>(),
        ),
        float(|r| r.temperature),
        float(|r| r.voltage),
        float(|r| r.current),
        float(|r| r.capacity),
        float(|r| r.min_voltage),
        float(|r| r.max_voltage),
        Arc::new(
            rows.iter()
                .map(|r| r.status.map(CellStatus::as_str))
                .collect::<StringArray>(),
        ),
    ];

    Ok(RecordBatch::try_new(schema, columns)?)
}

fn number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn optional(field: &str) -> Option<&str> {
    if field.is_empty() {
        None
    } else {
        Some(field)
    }
}

fn parse_slot(line: u64, field: &str) -> Result<usize> {
    field
        .strip_prefix("Cell ")
        .and_then(|n| n.parse::<usize>().ok())
        .filter(|&n| n > 0)
        .ok_or_else(|| Error::ParseError(format!("line {line}: bad cell label '{field}'")))
}

fn parse_number(line: u64, column: &str, field: &str) -> Result<Option<f64>> {
    optional(field)
        .map(|v| {
            v.parse::<f64>().map_err(|e| {
                Error::ParseError(format!("line {line}: {column} '{v}': {e}"))
            })
        })
        .transpose()
}
