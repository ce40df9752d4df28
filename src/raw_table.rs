use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::Field;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    lookup: HashMap<String, usize>,
}

impl RawTable {
    /// Short rows are padded with empty cells, long rows truncated to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        let mut lookup = HashMap::with_capacity(width);
        for (idx, name) in headers.iter().enumerate() {
            // Scraped tables repeat headers (e.g. a second "Gls" in the per-90 block);
            // the first occurrence is the season total.
            lookup.entry(name.trim().to_string()).or_insert(idx);
        }
        Self {
            headers,
            rows,
            lookup,
        }
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);
        let headers = rdr
            .headers()
            .context("read csv header row")?
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for (idx, record) in rdr.records().enumerate() {
            let record = record.with_context(|| format!("read csv row {}", idx + 1))?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }
        Ok(Self::new(headers, rows))
    }

    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
        Self::from_csv_reader(file).with_context(|| format!("parse {}", path.display()))
    }

    /// Reads a flat parquet export. Null fields become empty cells.
    pub fn from_parquet_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
        let reader = SerializedFileReader::new(file).context("open parquet reader")?;
        let headers = reader
            .metadata()
            .file_metadata()
            .schema_descr()
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect::<Vec<_>>();
        let index: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), idx))
            .collect();

        let iter = reader.get_row_iter(None).context("iterate parquet rows")?;
        let mut rows = Vec::new();
        for row in iter {
            let row = row.context("decode parquet row")?;
            let mut cells = vec![String::new(); headers.len()];
            for (name, field) in row.get_column_iter() {
                let Some(&idx) = index.get(name.as_str()) else {
                    continue;
                };
                cells[idx] = field_to_cell(field);
            }
            rows.push(cells);
        }
        Ok(Self::new(headers, rows))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(|s| s.as_str())
    }
}

fn field_to_cell(field: &Field) -> String {
    match field {
        Field::Null => String::new(),
        Field::Str(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parses a numeric cell. Blank, `-` and unparseable cells are `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return None;
    }
    // Thousands separators ("1,234") and percent signs show up in scraped tables.
    let cleaned = s.trim_end_matches('%').replace(',', "");
    let v = cleaned.trim().parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

pub fn parse_text(raw: &str) -> Option<&str> {
    let s = raw.trim();
    (!s.is_empty()).then_some(s)
}
