//! Plain-text rendering of an [`Analysis`]. All number formatting happens here.

use std::fmt::Write;

use crate::app::Analysis;
use crate::processing::pareto::ParetoEntry;
use crate::processing::statistics::DescriptiveStats;
use crate::state::ReportSection;

const RULE: &str = "------------------------------------------------------------";

pub fn render(analysis: &Analysis) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    write_report(&mut out, analysis)?;
    Ok(out)
}

fn write_report(out: &mut String, a: &Analysis) -> std::fmt::Result {
    let req = &a.request;
    writeln!(out, "{}", req.title)?;
    writeln!(out, "{}", "=".repeat(req.title.chars().count().max(1)))?;
    let p = &req.project;
    for (label, value) in [
        ("Project", p.name.as_str()),
        ("Department", p.department.as_str()),
        ("Analyst", p.analyst.as_str()),
        ("Objective", p.objective.as_str()),
    ] {
        if !value.is_empty() {
            writeln!(out, "{label}: {value}")?;
        }
    }
    writeln!(out, "Date: {}", p.date)?;
    writeln!(out, "Rows: {}", a.row_count)?;
    writeln!(out)?;

    if !a.overview.is_empty() {
        writeln!(out, "Summary")?;
        writeln!(out, "{RULE}")?;
        writeln!(
            out,
            "{:<20} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "Column", "N", "Mean", "Std Dev", "Median", "Min", "Max"
        )?;
        for o in &a.overview {
            write_stats_row(out, &o.column, &o.stats)?;
        }
        writeln!(out)?;
    }

    for section in &req.sections {
        writeln!(out, "{}", section.label())?;
        writeln!(out, "{RULE}")?;
        match section {
            ReportSection::Pareto => write_pareto(out, a)?,
            ReportSection::Ishikawa => write_ishikawa(out, a)?,
            ReportSection::ControlChart => write_control_chart(out, a)?,
            ReportSection::Scatter => write_scatter(out, a)?,
            ReportSection::Stratification => write_stratification(out, a)?,
            ReportSection::Histogram => write_histogram(out, a)?,
            ReportSection::CheckSheet => write_check_sheet(out, a)?,
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_stats_row(out: &mut String, name: &str, s: &DescriptiveStats) -> std::fmt::Result {
    writeln!(
        out,
        "{:<20} {:>6} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
        name, s.count, s.mean, s.std_dev, s.median, s.min, s.max
    )
}

fn no_data(out: &mut String) -> std::fmt::Result {
    writeln!(out, "No data available.")
}

fn write_pareto(out: &mut String, a: &Analysis) -> std::fmt::Result {
    if a.pareto.is_empty() {
        return no_data(out);
    }
    write_pareto_table(out, &a.pareto)
}

fn write_pareto_table(out: &mut String, entries: &[ParetoEntry]) -> std::fmt::Result {
    writeln!(out, "{:<30} {:>8} {:>12}", "Category", "Count", "Cumulative")?;
    for e in entries {
        writeln!(out, "{:<30} {:>8} {:>11.2}%", e.category, e.frequency, e.cumulative_percentage)?;
    }
    Ok(())
}

fn write_ishikawa(out: &mut String, a: &Analysis) -> std::fmt::Result {
    let Some(d) = &a.ishikawa else {
        return no_data(out);
    };
    writeln!(out, "Effect: {}", d.effect)?;
    for c in &d.categories {
        writeln!(out, "  {}", c.name)?;
        for cause in &c.causes {
            writeln!(out, "    - {cause}")?;
        }
    }
    Ok(())
}

fn write_control_chart(out: &mut String, a: &Analysis) -> std::fmt::Result {
    let Some(chart) = &a.control_chart else {
        return no_data(out);
    };
    if let Some(column) = &a.value_column {
        writeln!(out, "Column: {column}")?;
    }
    let l = &chart.limits;
    writeln!(out, "UCL: {:.2}", l.upper_limit)?;
    writeln!(out, "CL:  {:.2}", l.center_line)?;
    writeln!(out, "LCL: {:.2}", l.lower_limit)?;
    writeln!(out, "Observations: {}", chart.points.len())?;
    let flagged: Vec<String> = chart
        .violations()
        .map(|p| format!("#{} ({:.2})", p.index, p.value))
        .collect();
    if flagged.is_empty() {
        writeln!(out, "All points within limits.")
    } else {
        writeln!(out, "Out of control: {}", flagged.join(", "))
    }
}

fn write_scatter(out: &mut String, a: &Analysis) -> std::fmt::Result {
    let Some(s) = &a.scatter else {
        return no_data(out);
    };
    writeln!(out, "X: {}  Y: {}", s.x_column, s.y_column)?;
    writeln!(out, "Pairs: {}", s.scatter.points.len())?;
    match (s.scatter.r, s.scatter.strength()) {
        (Some(r), Some(strength)) => writeln!(out, "Correlation (r): {r:.4} - {}", strength.label()),
        _ => writeln!(out, "Correlation (r): not computable"),
    }
}

fn write_stratification(out: &mut String, a: &Analysis) -> std::fmt::Result {
    let Some(s) = &a.stratification else {
        return no_data(out);
    };
    if s.strata.is_empty() {
        return no_data(out);
    }
    writeln!(out, "{} by {}", s.value_column, s.group_column)?;
    writeln!(out, "{:<20} {:>6} {:>10} {:>10} {:>10}", "Group", "N", "Mean", "Min", "Max")?;
    for g in &s.strata {
        writeln!(
            out,
            "{:<20} {:>6} {:>10.2} {:>10.2} {:>10.2}",
            g.group, g.count, g.mean, g.min, g.max
        )?;
    }
    Ok(())
}

fn write_histogram(out: &mut String, a: &Analysis) -> std::fmt::Result {
    let Some(h) = &a.histogram else {
        return no_data(out);
    };
    if let Some(column) = &a.value_column {
        write_stats_row(out, column, &h.stats)?;
    }
    let widest = h.bins.iter().map(|b| b.frequency).max().unwrap_or(0).max(1);
    for b in &h.bins {
        let bar = "#".repeat(b.frequency * 40 / widest);
        let normal = b
            .normal_density
            .map_or_else(|| "-".to_string(), |d| format!("{d:.2}"));
        writeln!(
            out,
            "{:>10.2} - {:<10.2} {:>5} {:>8} {bar}",
            b.range_start, b.range_end, b.frequency, normal
        )?;
    }
    Ok(())
}

fn write_check_sheet(out: &mut String, a: &Analysis) -> std::fmt::Result {
    let Some(sheet) = &a.check_sheet else {
        return no_data(out);
    };
    writeln!(out, "{}", sheet.title)?;
    write!(out, "{:<24}", "Category")?;
    for d in &sheet.dates {
        write!(out, " {:>10}", d.format("%m-%d"))?;
    }
    writeln!(out, " {:>8}", "Total")?;
    for c in &sheet.categories {
        write!(out, "{c:<24}")?;
        for d in &sheet.dates {
            write!(out, " {:>10}", sheet.count(c, *d))?;
        }
        writeln!(out, " {:>8}", sheet.category_total(c))?;
    }
    writeln!(out, "Grand total: {}", sheet.grand_total())?;
    let ranked = sheet.to_pareto();
    if !ranked.is_empty() {
        writeln!(out)?;
        write_pareto_table(out, &ranked)?;
    }
    Ok(())
}
