//! CSV generation from tabular text or a list of numbers
//!
//! Two shapes are understood. Text containing `;` is a table: rows split on
//! `;`, cells on `,`, first row is the header. Anything else is a list of
//! numbers that becomes an `index,value` table. A `to <name>.csv` phrase picks
//! the file name inside the configured output directory.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::CsvConfig;
use crate::errors::CalcError;
use crate::number::Number;
use crate::stats::extract_numbers;

static TARGET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:to|as|into)\s+([A-Za-z0-9_\-.]+\.csv)\b").expect("target pattern is valid")
});

static TRIGGER_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^.*?\b(?:csv|spreadsheet|save)\b(?:\s+(?:a|an|the))?(?:\s+(?:csv|spreadsheet))?(?:\s+file)?(?:\s+(?:with|of|from|for))?\s*:?\s*",
    )
    .expect("trigger pattern is valid")
});

/// Header plus rows, every row exactly as wide as the header.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, CalcError> {
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(CalcError::Csv("header row is empty".to_string()));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(CalcError::Csv(format!(
                    "row {} has {} cells, expected {}",
                    i + 2,
                    row.len(),
                    headers.len()
                )));
            }
        }
        Ok(Self { headers, rows })
    }

    pub fn from_numbers(values: &[f64]) -> Result<Self, CalcError> {
        if values.is_empty() {
            return Err(CalcError::Csv("No numbers found".to_string()));
        }
        let rows = values
            .iter()
            .enumerate()
            .map(|(i, v)| vec![(i + 1).to_string(), Number::Float(*v).to_string()])
            .collect();
        Self::new(vec!["index".to_string(), "value".to_string()], rows)
    }

    /// Parses `h1,h2; a,b; c,d`. A trailing `;` is ignored.
    pub fn from_description(text: &str) -> Result<Self, CalcError> {
        let mut lines = text
            .split(';')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.split(',').map(|cell| cell.trim().to_string()).collect::<Vec<_>>());
        let headers = lines
            .next()
            .ok_or_else(|| CalcError::Csv("no table rows found".to_string()))?;
        Self::new(headers, lines.collect())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for record in std::iter::once(&self.headers).chain(self.rows.iter()) {
            let line = record.iter().map(|c| escape_cell(c)).collect::<Vec<_>>().join(",");
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

fn escape_cell(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// What the user asked to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRequest {
    pub file_name: Option<String>,
    pub table: CsvTable,
}

impl CsvRequest {
    pub fn parse(text: &str) -> Result<Self, CalcError> {
        let file_name = TARGET_PATTERN.captures(text).map(|caps| caps[1].to_string());
        let without_target = TARGET_PATTERN.replace(text, " ");
        let body = TRIGGER_PREFIX.replace(without_target.trim(), "");

        let table = if body.contains(';') {
            CsvTable::from_description(&body)?
        } else {
            CsvTable::from_numbers(&extract_numbers(&body))?
        };
        Ok(Self { file_name, table })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsvOutput {
    pub path: PathBuf,
    pub csv: String,
    pub rows: usize,
}

#[derive(Debug, Clone)]
pub struct CsvExporter {
    output_dir: PathBuf,
    default_file_name: String,
}

impl CsvExporter {
    pub fn new(config: &CsvConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            default_file_name: config.default_file_name.clone(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn export(&self, request: &CsvRequest) -> Result<CsvOutput, CalcError> {
        let name = request.file_name.as_deref().unwrap_or(&self.default_file_name);
        let path = self.output_dir.join(name);
        let csv = request.table.render();

        fs::write(&path, &csv).map_err(|e| CalcError::Io(format!("{}: {}", path.display(), e)))?;
        log::info!("wrote {} rows to {}", request.table.rows().len(), path.display());

        Ok(CsvOutput {
            path,
            csv,
            rows: request.table.rows().len(),
        })
    }
}
