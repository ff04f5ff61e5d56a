use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::Dataset;
use crate::processing::histogram::DEFAULT_BINS;
use crate::state::{IshikawaDiagram, ReportRequest};

/// User selections driving one analysis run. Every field is optional in the
/// JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Columns for the overview; empty means every column in the file.
    pub columns: Vec<String>,
    /// Categorical columns pooled into the Pareto table; empty means `columns`.
    pub pareto_columns: Vec<String>,
    /// Column for the histogram and control chart; defaults to the first
    /// mostly numeric column.
    pub value_column: Option<String>,
    pub group_column: Option<String>,
    pub x_column: Option<String>,
    pub y_column: Option<String>,
    pub bin_count: usize,
    pub report: ReportRequest,
    pub ishikawa: Option<IshikawaDiagram>,
    /// Saved check sheets; the most recent one goes into the report.
    pub check_sheet_store: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            pareto_columns: Vec::new(),
            value_column: None,
            group_column: None,
            x_column: None,
            y_column: None,
            bin_count: DEFAULT_BINS,
            report: ReportRequest::default(),
            ishikawa: None,
            check_sheet_store: None,
        }
    }
}

impl AnalysisConfig {
    pub fn load(path: &Path) -> Result<Self, String> {
        let json = std::fs::read_to_string(path).map_err(|e| format!("Failed to read config: {e}"))?;
        let config = serde_json::from_str(&json).map_err(|e| format!("Failed to parse config: {e}"))?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn selected_columns(&self, dataset: &Dataset) -> Vec<String> {
        if self.columns.is_empty() {
            dataset.columns.clone()
        } else {
            self.columns.clone()
        }
    }

    pub fn pareto_columns(&self, dataset: &Dataset) -> Vec<String> {
        if self.pareto_columns.is_empty() {
            self.selected_columns(dataset)
        } else {
            self.pareto_columns.clone()
        }
    }

    pub fn value_column(&self, dataset: &Dataset) -> Option<String> {
        self.value_column.clone().or_else(|| {
            self.selected_columns(dataset)
                .into_iter()
                .find(|c| dataset.is_mostly_numeric(c))
        })
    }
}
