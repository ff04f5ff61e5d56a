use std::path::PathBuf;

use anyhow::{bail, ensure, Context};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use lss_workbench::app::{self, report};
use lss_workbench::config::AnalysisConfig;
use lss_workbench::data::{datetime, loader};
use lss_workbench::processing::sigma::{self, SigmaMetrics};
use lss_workbench::state::{CheckSheet, SheetStore};

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Load a CSV/Excel file and print an analysis report
    Analyze(AnalyzeArg),
    /// Convert between defects, DPMO, sigma level and yield
    Sigma(SigmaArg),
    /// Create, tally and rank saved check sheets
    CheckSheet(CheckSheetArg),
}

#[derive(Debug, Clone, Args)]
struct AnalyzeArg {
    /// Data file (.csv, .xls, .xlsx, .xlsm, .ods)
    file: PathBuf,
    /// JSON analysis configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Column to include in the summary (repeatable)
    #[arg(long = "column")]
    columns: Vec<String>,
    /// Categorical column pooled into the Pareto table (repeatable)
    #[arg(long = "pareto")]
    pareto_columns: Vec<String>,
    /// Column for the histogram and control chart
    #[arg(long = "value")]
    value_column: Option<String>,
    /// Grouping column for stratification
    #[arg(long = "group")]
    group_column: Option<String>,
    #[arg(long = "x")]
    x_column: Option<String>,
    #[arg(long = "y")]
    y_column: Option<String>,
    /// Histogram bins, clamped to 5..=20
    #[arg(long)]
    bins: Option<usize>,
    /// Report title (defaults to the file name)
    #[arg(long)]
    title: Option<String>,
    /// Saved check sheets to include in the report
    #[arg(long)]
    store: Option<PathBuf>,
    /// Print the analysis as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Args)]
struct SigmaArg {
    #[arg(long, requires_all = ["opportunities", "units"], conflicts_with_all = ["sigma", "yield_percent"])]
    defects: Option<f64>,
    /// Opportunities per unit
    #[arg(long)]
    opportunities: Option<f64>,
    #[arg(long)]
    units: Option<f64>,
    #[arg(long, conflicts_with = "yield_percent")]
    sigma: Option<f64>,
    /// Yield in percent
    #[arg(long = "yield")]
    yield_percent: Option<f64>,
}

#[derive(Debug, Clone, Args)]
struct CheckSheetArg {
    /// Check sheet store file
    #[arg(long)]
    store: PathBuf,
    /// Sheet to work on; defaults to the most recent one
    #[arg(long)]
    id: Option<u64>,
    /// Defaults to `show`
    #[command(subcommand)]
    action: Option<SheetAction>,
}

#[derive(Debug, Clone, Subcommand)]
enum SheetAction {
    /// Create and save a new sheet
    New {
        title: String,
        #[arg(long = "category")]
        categories: Vec<String>,
        #[arg(long = "date", value_parser = parse_date_arg)]
        dates: Vec<NaiveDate>,
    },
    /// Print the tally grid and totals
    Show,
    AddCategory {
        name: String,
    },
    RemoveCategory {
        name: String,
    },
    /// Add a date column (today when omitted)
    AddDate {
        #[arg(value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
    },
    /// Adjust one tally; counts never drop below zero
    Tally {
        category: String,
        /// Defaults to today
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        delta: i64,
    },
    /// Rank the categories by total tally
    Pareto,
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    datetime::parse_date(s).ok_or_else(|| format!("not a recognised date: {s}"))
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Analyze(arg) => run_analyze(arg)?,
        Mode::Sigma(arg) => run_sigma(&arg)?,
        Mode::CheckSheet(arg) => run_check_sheet(&arg)?,
    }
    Ok(())
}

fn run_analyze(arg: AnalyzeArg) -> anyhow::Result<()> {
    let mut config = match &arg.config {
        Some(path) => AnalysisConfig::load(path).map_err(anyhow::Error::msg)?,
        None => AnalysisConfig::default(),
    };
    if !arg.columns.is_empty() {
        config.columns = arg.columns;
    }
    if !arg.pareto_columns.is_empty() {
        config.pareto_columns = arg.pareto_columns;
    }
    config.value_column = arg.value_column.or(config.value_column);
    config.group_column = arg.group_column.or(config.group_column);
    config.x_column = arg.x_column.or(config.x_column);
    config.y_column = arg.y_column.or(config.y_column);
    config.check_sheet_store = arg.store.or(config.check_sheet_store);
    if let Some(bins) = arg.bins {
        config.bin_count = bins;
    }
    if let Some(title) = arg.title {
        config.report.title = title;
    }
    if config.report.title.trim().is_empty() {
        config.report.title = arg
            .file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Process analysis".to_string());
    }

    let dataset = loader::load_file(&arg.file)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("failed to load {}", arg.file.display()))?;
    let analysis = app::run_analysis(&dataset, &config).map_err(anyhow::Error::msg)?;

    if arg.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print!("{}", report::render(&analysis)?);
    }
    Ok(())
}

fn run_sigma(arg: &SigmaArg) -> anyhow::Result<()> {
    let metrics: Option<SigmaMetrics> = match (arg.defects, arg.sigma, arg.yield_percent) {
        (Some(defects), None, None) => sigma::from_defects(
            defects,
            arg.opportunities.unwrap_or_default(),
            arg.units.unwrap_or_default(),
        ),
        (None, Some(level), None) => sigma::from_sigma(level),
        (None, None, Some(y)) => sigma::from_yield(y),
        _ => bail!("give exactly one of --defects, --sigma or --yield"),
    };
    let Some(m) = metrics else {
        bail!("sigma metrics are not computable for these inputs");
    };
    println!("DPMO:        {:.2}", m.dpmo);
    println!("Sigma level: {:.2}", m.sigma_level);
    println!("Yield:       {:.2}%", m.yield_percent);
    Ok(())
}

fn run_check_sheet(arg: &CheckSheetArg) -> anyhow::Result<()> {
    let store = SheetStore::new(&arg.store);
    let load = || {
        store
            .find(arg.id)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("in {}", arg.store.display()))
    };
    let save = |sheet: &CheckSheet| store.update(sheet).map_err(anyhow::Error::msg);

    match arg.action.clone().unwrap_or(SheetAction::Show) {
        SheetAction::New {
            title,
            categories,
            dates,
        } => {
            let mut sheet = CheckSheet::new(title);
            for category in &categories {
                if !sheet.add_category(category) {
                    tracing::warn!("Skipping blank or repeated category {category:?}");
                }
            }
            for date in dates {
                sheet.add_date(date);
            }
            let saved = store.save(&sheet).map_err(anyhow::Error::msg)?;
            println!("Saved check sheet {} ({})", saved.id.unwrap_or_default(), saved.title);
        }
        SheetAction::Show => print_sheet(&load()?),
        SheetAction::AddCategory { name } => {
            let mut sheet = load()?;
            ensure!(
                sheet.add_category(&name),
                "category {name:?} is blank or already on the sheet"
            );
            save(&sheet)?;
            print_sheet(&sheet);
        }
        SheetAction::RemoveCategory { name } => {
            let mut sheet = load()?;
            ensure!(sheet.remove_category(&name), "no category {name:?} on the sheet");
            save(&sheet)?;
            print_sheet(&sheet);
        }
        SheetAction::AddDate { date } => {
            let mut sheet = load()?;
            let date = date.unwrap_or_else(datetime::today);
            ensure!(sheet.add_date(date), "{date} is already on the sheet");
            save(&sheet)?;
            print_sheet(&sheet);
        }
        SheetAction::Tally {
            category,
            date,
            delta,
        } => {
            let mut sheet = load()?;
            let date = date.unwrap_or_else(datetime::today);
            let Some(count) = sheet.update_count(&category, date, delta) else {
                bail!("{category:?} on {date} is not on the sheet");
            };
            save(&sheet)?;
            println!("{category} on {date}: {count}");
        }
        SheetAction::Pareto => {
            let sheet = load()?;
            println!("{:<24} {:>8} {:>12}", "Category", "Count", "Cumulative");
            for e in sheet.to_pareto() {
                println!("{:<24} {:>8} {:>11.2}%", e.category, e.frequency, e.cumulative_percentage);
            }
        }
    }
    Ok(())
}

fn print_sheet(sheet: &CheckSheet) {
    println!(
        "#{} {} ({} dates)",
        sheet.id.unwrap_or_default(),
        sheet.title,
        sheet.dates.len()
    );
    for category in &sheet.categories {
        println!("  {:<24} {:>8}", category, sheet.category_total(category));
    }
    println!("  {:<24} {:>8}", "Total", sheet.grand_total());
}
