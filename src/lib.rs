//! Lean Six Sigma analysis workbench.
//!
//! Loads a CSV or spreadsheet table and computes the quality-tool outputs:
//! descriptive statistics, histograms with a normal overlay, control limits,
//! Pareto rankings, scatter correlation, stratification and the DPMO /
//! sigma level / yield calculator. Every engine is a pure function of the
//! dataset and the caller's column selection.

pub mod app;
pub mod config;
pub mod data;
pub mod processing;
pub mod state;
