use std::collections::HashMap;

use serde::Serialize;

use crate::data::Dataset;

/// Summary of the numeric values belonging to one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StratumSummary {
    pub group: String,
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy)]
struct Accumulator {
    count: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn push(&mut self, v: f64) {
        self.count += 1;
        self.sum += v;
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }
}

/// Group the numeric cells of `value_column` by the raw cell of
/// `group_column`.
///
/// Rows whose value is not numeric are skipped. The grouping key is the
/// unparsed cell (a missing cell keys as `""`). Groups come out in the order
/// their key was first seen.
pub fn stratify(dataset: &Dataset, value_column: &str, group_column: &str) -> Vec<StratumSummary> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Accumulator> = HashMap::new();

    for record in &dataset.records {
        let Some(v) = Dataset::cell(record, value_column).as_number() else {
            continue;
        };
        let key = Dataset::cell(record, group_column).label();
        groups
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                Accumulator::new()
            })
            .push(v);
    }

    order
        .into_iter()
        .map(|group| {
            let acc = groups[&group];
            StratumSummary {
                mean: acc.sum / acc.count as f64,
                count: acc.count,
                min: acc.min,
                max: acc.max,
                group,
            }
        })
        .collect()
}
