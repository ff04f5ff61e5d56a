use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::datetime;

/// A section that can be included in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSection {
    Pareto,
    Ishikawa,
    ControlChart,
    Scatter,
    Stratification,
    Histogram,
    CheckSheet,
}

impl ReportSection {
    pub const ALL: [ReportSection; 7] = [
        ReportSection::Pareto,
        ReportSection::Ishikawa,
        ReportSection::ControlChart,
        ReportSection::Scatter,
        ReportSection::Stratification,
        ReportSection::Histogram,
        ReportSection::CheckSheet,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReportSection::Pareto => "Pareto Analysis",
            ReportSection::Ishikawa => "Ishikawa Diagram",
            ReportSection::ControlChart => "Control Charts",
            ReportSection::Scatter => "Scatter Diagram",
            ReportSection::Stratification => "Stratification Analysis",
            ReportSection::Histogram => "Histogram",
            ReportSection::CheckSheet => "Check Sheets",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInfo {
    pub name: String,
    pub department: String,
    pub date: NaiveDate,
    pub analyst: String,
    pub objective: String,
}

impl Default for ProjectInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            department: String::new(),
            date: datetime::today(),
            analyst: String::new(),
            objective: String::new(),
        }
    }
}

/// What the user asked to put in a report, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportRequest {
    pub title: String,
    pub project: ProjectInfo,
    pub sections: Vec<ReportSection>,
}

impl ReportRequest {
    /// Select a section, or deselect it if already selected.
    pub fn toggle_section(&mut self, section: ReportSection) {
        if let Some(pos) = self.sections.iter().position(|s| *s == section) {
            self.sections.remove(pos);
        } else {
            self.sections.push(section);
        }
    }

    pub fn includes(&self, section: ReportSection) -> bool {
        self.sections.contains(&section)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Report title is required".to_string());
        }
        if self.sections.is_empty() {
            return Err("Select at least one report section".to_string());
        }
        Ok(())
    }
}
