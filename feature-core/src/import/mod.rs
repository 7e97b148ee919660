//! Importers turning external files into canonical feature records
//!
//! The importer is chosen by [`ImportFormat`], usually derived from the file
//! extension. JSON goes through the heuristic strategy chain in [`json`];
//! delimited text and spreadsheets are fixed-column adapters that skip and
//! report rows whose id or priority is not an integer.

pub mod delimited;
pub mod json;
pub mod tabular;

use log::{info, warn};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{FeatureError, Result};
use crate::models::Feature;
use crate::storage::FileStore;

pub use json::{resolve, resolve_detailed, Resolution, Strategy};

/// Source file kinds understood by the importers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    /// Any JSON document, resolved heuristically
    Json,
    /// One `Id;Name;Description;Priority` record per line
    Delimited,
    /// First worksheet of a spreadsheet, header row skipped
    Spreadsheet,
}

impl ImportFormat {
    /// Infers the format from the file extension, defaulting to JSON
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("txt") | Some("csv") => ImportFormat::Delimited,
            Some("xlsx") | Some("xlsm") | Some("xlsb") | Some("xls") | Some("ods") => {
                ImportFormat::Spreadsheet
            }
            _ => ImportFormat::Json,
        }
    }
}

impl fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportFormat::Json => write!(f, "json"),
            ImportFormat::Delimited => write!(f, "delimited"),
            ImportFormat::Spreadsheet => write!(f, "spreadsheet"),
        }
    }
}

impl FromStr for ImportFormat {
    type Err = FeatureError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ImportFormat::Json),
            "delimited" | "txt" | "text" | "csv" => Ok(ImportFormat::Delimited),
            "spreadsheet" | "excel" | "xlsx" | "ods" => Ok(ImportFormat::Spreadsheet),
            _ => Err(FeatureError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Why a row was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowIssue {
    /// Fewer than four fields
    MissingFields(usize),
    /// Id column is not an integer
    InvalidId(String),
    /// Priority column is not an integer
    InvalidPriority(String),
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowIssue::MissingFields(found) => write!(f, "expected 4 fields, found {}", found),
            RowIssue::InvalidId(value) => write!(f, "invalid id '{}'", value),
            RowIssue::InvalidPriority(value) => write!(f, "invalid priority '{}'", value),
        }
    }
}

/// A row that was skipped during a delimited or spreadsheet import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based line or worksheet row number
    pub row: usize,
    /// The raw row content, for diagnostics
    pub content: String,
    pub issue: RowIssue,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {} (\"{}\")", self.row, self.issue, self.content)
    }
}

/// Result of importing one source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Sanitized records, in source order
    pub features: Vec<Feature>,
    /// Rows skipped by the fixed-column importers
    pub skipped: Vec<RowError>,
    /// JSON strategy that applied, for JSON sources
    pub strategy: Option<Strategy>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Maps four positional fields to a record, or explains why it can't
pub(crate) fn feature_from_fields(
    fields: &[&str],
) -> std::result::Result<Feature, RowIssue> {
    if fields.len() < 4 {
        return Err(RowIssue::MissingFields(fields.len()));
    }

    let id: i64 = fields[0]
        .trim()
        .parse()
        .map_err(|_| RowIssue::InvalidId(fields[0].to_string()))?;
    let priority: i64 = fields[3]
        .trim()
        .parse()
        .map_err(|_| RowIssue::InvalidPriority(fields[3].to_string()))?;

    Ok(Feature::new(id, fields[1], fields[2], priority))
}

/// Logs each skipped row the way the importers report them
pub(crate) fn log_skipped(source: &str, skipped: &[RowError]) {
    for error in skipped {
        warn!("[{}] Skipped {}", source, error);
    }
}

/// Parses already loaded bytes with the given importer
pub fn import_bytes(bytes: &[u8], format: ImportFormat) -> Result<ImportReport> {
    match format {
        ImportFormat::Json => {
            let text = String::from_utf8_lossy(bytes);
            let resolution = json::resolve_detailed(&text);
            Ok(ImportReport {
                features: resolution.features,
                skipped: Vec::new(),
                strategy: resolution.strategy,
            })
        }
        ImportFormat::Delimited => Ok(delimited::parse_delimited(&String::from_utf8_lossy(bytes))),
        ImportFormat::Spreadsheet => tabular::parse_spreadsheet(bytes),
    }
}

/// Reads a file through the store and imports it
///
/// `hint` overrides the format derived from the extension. Content problems
/// never fail the import; only reading the file (or opening a workbook) can.
pub fn import_from_path(
    store: &dyn FileStore,
    path: &Path,
    hint: Option<ImportFormat>,
) -> Result<ImportReport> {
    let format = hint.unwrap_or_else(|| ImportFormat::from_path(path));
    let bytes = store.read_file(path)?;

    let report = import_bytes(&bytes, format).map_err(|e| {
        warn!("Could not import {}: {}", path.display(), e);
        e
    })?;

    info!(
        "Imported {} feature(s) from {} as {} ({} row(s) skipped)",
        report.features.len(),
        path.display(),
        format,
        report.skipped.len()
    );

    Ok(report)
}
