//! Loading property data files into a [`PropertyStore`].

use crate::property::{Field, Lane, PropertyRecord, RawRecord, RawValue, normalize_record};
use crate::{Error, Result};
use calamine::Reader as _;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Supported property data formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Csv,
    Spreadsheet,
}

impl DataFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(Self::Spreadsheet),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }
}

/// Regular and corner tile names for one lane, in board order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneNames {
    pub lane: Vec<String>,
    pub corners: Vec<String>,
}

impl LaneNames {
    pub fn total(&self) -> usize {
        self.lane.len() + self.corners.len()
    }

    /// Lane names followed by corner names, the order used for declared-position checks.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.lane.iter().chain(self.corners.iter()).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    records: Vec<PropertyRecord>,
    /// Record indexes per name, in file order. Names are unique within a lane only.
    by_name: FxHashMap<String, Vec<usize>>,
}

impl PropertyStore {
    pub fn from_records(records: Vec<PropertyRecord>) -> Self {
        let mut by_name: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        for (idx, record) in records.iter().enumerate() {
            let entries = by_name.entry(record.name.clone()).or_default();
            if entries.iter().any(|&i| records[i].lane == record.lane) {
                tracing::warn!(
                    name = %record.name,
                    lane = %record.lane,
                    "duplicate property name in lane; lookups resolve to the first record"
                );
            }
            entries.push(idx);
        }
        Self { records, by_name }
    }

    /// Loads a property file, picking the parser from the file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let store = match DataFormat::from_path(path)? {
            DataFormat::Json => {
                let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
                Self::from_json_str(&text)?
            }
            DataFormat::Csv => {
                let file = std::fs::File::open(path).map_err(|e| Error::io(path, e))?;
                Self::from_csv_reader(file)?
            }
            DataFormat::Spreadsheet => Self::from_spreadsheet(path)?,
        };
        tracing::debug!(
            path = %path.display(),
            records = store.len(),
            "loaded property data"
        );
        Ok(store)
    }

    /// Accepts either a top-level array of records or an object with a `properties` array.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let list = match &value {
            serde_json::Value::Array(items) => items.as_slice(),
            serde_json::Value::Object(map) => match map.get("properties") {
                Some(serde_json::Value::Array(items)) => items.as_slice(),
                _ => &[],
            },
            _ => &[],
        };

        let mut records = Vec::with_capacity(list.len());
        for (index, item) in list.iter().enumerate() {
            let Some(obj) = item.as_object() else {
                return Err(Error::InvalidField {
                    index,
                    field: "record",
                    value: item.to_string(),
                });
            };
            let mut raw = RawRecord::default();
            for (key, value) in obj {
                raw.push(key.clone(), RawValue::from_json(value));
            }
            records.push(normalize_record(index, &raw)?);
        }
        Ok(Self::from_records(records))
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        check_required_columns(&headers)?;

        let mut records = Vec::new();
        for (index, row) in rdr.records().enumerate() {
            let row = row?;
            let mut raw = RawRecord::default();
            for (key, cell) in headers.iter().zip(row.iter()) {
                raw.push(key.clone(), RawValue::from_text(cell));
            }
            records.push(normalize_record(index, &raw)?);
        }
        Ok(Self::from_records(records))
    }

    /// Reads the first worksheet of an Excel/ODS workbook; the first row is the header.
    pub fn from_spreadsheet(path: &Path) -> Result<Self> {
        let mut workbook = calamine::open_workbook_auto(path).map_err(|e| Error::Spreadsheet {
            message: format!("{}: {e}", path.display()),
        })?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| Error::Spreadsheet {
                message: format!("{}: workbook has no worksheets", path.display()),
            })?
            .map_err(|e| Error::Spreadsheet {
                message: format!("{}: {e}", path.display()),
            })?;

        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            return Err(Error::Spreadsheet {
                message: format!("{}: first worksheet is empty", path.display()),
            });
        };
        let headers: Vec<String> = header_row.iter().map(|c| c.to_string()).collect();
        check_required_columns(&headers)?;

        let mut records = Vec::new();
        for (index, row) in rows.enumerate() {
            if row.iter().all(|c| matches!(c, calamine::Data::Empty)) {
                continue;
            }
            let mut raw = RawRecord::default();
            for (key, cell) in headers.iter().zip(row.iter()) {
                raw.push(key.clone(), spreadsheet_value(cell));
            }
            records.push(normalize_record(index, &raw)?);
        }
        Ok(Self::from_records(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PropertyRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyRecord> {
        self.records.iter()
    }

    /// Case-sensitive exact lookup; the first record with `name` in any lane.
    pub fn get(&self, name: &str) -> Option<&PropertyRecord> {
        self.by_name
            .get(name)
            .and_then(|idxs| idxs.first())
            .map(|&idx| &self.records[idx])
    }

    /// The first record named `name` that belongs to `lane`.
    pub fn get_in_lane(&self, lane: Lane, name: &str) -> Option<&PropertyRecord> {
        self.by_name
            .get(name)?
            .iter()
            .map(|&idx| &self.records[idx])
            .find(|record| record.lane == lane)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Records of `lane`: those with a declared position first (by position), then the rest in
    /// file order.
    pub fn lane(&self, lane: Lane) -> Vec<&PropertyRecord> {
        let mut out: Vec<&PropertyRecord> =
            self.records.iter().filter(|r| r.lane == lane).collect();
        out.sort_by_key(|r| (r.position.is_none(), r.position));
        out
    }

    pub fn lane_names(&self, lane: Lane) -> LaneNames {
        let mut names = LaneNames::default();
        for record in self.lane(lane) {
            if record.is_corner() {
                names.corners.push(record.name.clone());
            } else {
                names.lane.push(record.name.clone());
            }
        }
        names
    }
}

fn check_required_columns(headers: &[String]) -> Result<()> {
    for field in Field::ALL.into_iter().filter(|f| f.is_required()) {
        if !headers.iter().any(|h| field.matches_key(h)) {
            return Err(Error::MissingColumn {
                column: field.canonical_name(),
            });
        }
    }
    Ok(())
}

fn spreadsheet_value(cell: &calamine::Data) -> RawValue {
    match cell {
        calamine::Data::Empty => RawValue::Empty,
        calamine::Data::Int(n) => RawValue::Number(*n as f64),
        calamine::Data::Float(n) => RawValue::Number(*n),
        calamine::Data::Bool(b) => RawValue::Bool(*b),
        calamine::Data::String(s) => RawValue::from_text(s),
        other => RawValue::from_text(&other.to_string()),
    }
}
