//! File export of flat result rows.

use crate::types::ResultRow;
use crate::{ResultsError, ResultsResult};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = ResultsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ResultsError::UnknownFormat {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportConfig {
    /// Replace an existing output file instead of failing
    pub overwrite: bool,
}

fn prepare(path: &Path, config: &ExportConfig) -> ResultsResult<()> {
    if path.exists() && !config.overwrite {
        return Err(ResultsError::OutputExists {
            path: path.display().to_string(),
        });
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Write rows as CSV with header `t,id,iq,Vdc,Idc,P_ac,Q_ac`.
pub fn write_csv(path: &Path, rows: &[ResultRow], config: &ExportConfig) -> ResultsResult<()> {
    prepare(path, config)?;
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write rows as a pretty-printed JSON array.
pub fn write_json(path: &Path, rows: &[ResultRow], config: &ExportConfig) -> ResultsResult<()> {
    prepare(path, config)?;
    let json = serde_json::to_string_pretty(rows)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn export_rows(
    path: &Path,
    rows: &[ResultRow],
    format: ExportFormat,
    config: &ExportConfig,
) -> ResultsResult<()> {
    match format {
        ExportFormat::Csv => write_csv(path, rows, config),
        ExportFormat::Json => write_json(path, rows, config),
    }
}
