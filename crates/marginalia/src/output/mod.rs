//! Rendering clippings back out: the clippings-file format, CSV and JSON.

mod clippings;
mod table;

pub use clippings::{serialize, serialize_clipping};
pub use table::{to_csv, to_json, ExportRow};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Clipping;

/// Output format for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Same grammar as the e-reader export, re-importable.
    #[default]
    Clippings,
    /// One row per clipping.
    Csv,
    /// Pretty-printed array of clippings.
    Json,
}

impl ExportFormat {
    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Clippings => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Render clippings in the given format, dropping deleted ones unless asked.
pub fn export(clippings: &[&Clipping], format: ExportFormat, include_deleted: bool) -> Result<String> {
    let kept: Vec<&Clipping> = clippings
        .iter()
        .copied()
        .filter(|c| include_deleted || !c.deleted)
        .collect();

    match format {
        ExportFormat::Clippings => Ok(serialize(&kept, true)),
        ExportFormat::Csv => to_csv(&kept),
        ExportFormat::Json => to_json(&kept),
    }
}
