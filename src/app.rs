pub mod report;

use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::data::Dataset;
use crate::processing::control_chart::{control_chart_for_column, ControlChart};
use crate::processing::correlation::{scatter, Scatter};
use crate::processing::histogram::{histogram_for_column, Histogram};
use crate::processing::overview::{column_overview, ColumnOverview};
use crate::processing::pareto::{pareto, ParetoEntry};
use crate::processing::stratify::{stratify, StratumSummary};
use crate::state::{CheckSheet, IshikawaDiagram, ReportRequest, ReportSection, SheetStore};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterResult {
    pub x_column: String,
    pub y_column: String,
    pub scatter: Scatter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StratificationResult {
    pub value_column: String,
    pub group_column: String,
    pub strata: Vec<StratumSummary>,
}

/// Everything computed for one report. Sections that were not requested,
/// or whose inputs are missing, are `None`/empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub request: ReportRequest,
    pub row_count: usize,
    pub overview: Vec<ColumnOverview>,
    pub value_column: Option<String>,
    pub pareto: Vec<ParetoEntry>,
    pub histogram: Option<Histogram>,
    pub control_chart: Option<ControlChart>,
    pub scatter: Option<ScatterResult>,
    pub stratification: Option<StratificationResult>,
    pub check_sheet: Option<CheckSheet>,
    pub ishikawa: Option<IshikawaDiagram>,
}

/// Sections that have enough configuration to be computed.
pub fn available_sections(config: &AnalysisConfig, dataset: &Dataset) -> Vec<ReportSection> {
    ReportSection::ALL
        .into_iter()
        .filter(|section| match section {
            ReportSection::Pareto => !config.pareto_columns(dataset).is_empty(),
            ReportSection::Ishikawa => config.ishikawa.is_some(),
            ReportSection::ControlChart | ReportSection::Histogram => {
                config.value_column(dataset).is_some()
            }
            ReportSection::Scatter => config.x_column.is_some() && config.y_column.is_some(),
            ReportSection::Stratification => {
                config.group_column.is_some() && config.value_column(dataset).is_some()
            }
            ReportSection::CheckSheet => config.check_sheet_store.is_some(),
        })
        .collect()
}

/// Run every requested tool over `dataset`.
///
/// With no sections selected, every section whose inputs are configured is
/// included. Fails if the resulting request is invalid or a saved check sheet
/// cannot be read.
pub fn run_analysis(dataset: &Dataset, config: &AnalysisConfig) -> Result<Analysis, String> {
    let mut request = config.report.clone();
    if request.sections.is_empty() {
        request.sections = available_sections(config, dataset);
        tracing::info!(
            "No report sections selected, using {:?}",
            request.sections
        );
    }
    request.validate()?;

    let columns = config.selected_columns(dataset);
    let value_column = config.value_column(dataset);
    let wants = |section| request.includes(section);

    let pareto_entries = if wants(ReportSection::Pareto) {
        pareto(dataset, &config.pareto_columns(dataset))
    } else {
        Vec::new()
    };

    let histogram = value_column
        .as_deref()
        .filter(|_| wants(ReportSection::Histogram))
        .and_then(|c| histogram_for_column(dataset, c, config.bin_count));

    let control_chart = value_column
        .as_deref()
        .filter(|_| wants(ReportSection::ControlChart))
        .and_then(|c| control_chart_for_column(dataset, c));

    let scatter = match (&config.x_column, &config.y_column) {
        (Some(x), Some(y)) if wants(ReportSection::Scatter) => Some(ScatterResult {
            x_column: x.clone(),
            y_column: y.clone(),
            scatter: scatter(dataset, x, y),
        }),
        _ => None,
    };

    let stratification = match (&value_column, &config.group_column) {
        (Some(v), Some(g)) if wants(ReportSection::Stratification) => Some(StratificationResult {
            value_column: v.clone(),
            group_column: g.clone(),
            strata: stratify(dataset, v, g),
        }),
        _ => None,
    };

    let check_sheet = match &config.check_sheet_store {
        Some(path) if wants(ReportSection::CheckSheet) => SheetStore::new(path).load_last()?,
        _ => None,
    };

    let ishikawa = config
        .ishikawa
        .clone()
        .filter(|_| wants(ReportSection::Ishikawa));

    tracing::info!(
        "Analysed {} rows: {} sections",
        dataset.row_count(),
        request.sections.len()
    );

    Ok(Analysis {
        row_count: dataset.row_count(),
        overview: column_overview(dataset, &columns),
        value_column,
        pareto: pareto_entries,
        histogram,
        control_chart,
        scatter,
        stratification,
        check_sheet,
        ishikawa,
        request,
    })
}
