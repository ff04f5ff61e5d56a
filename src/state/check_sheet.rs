use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::processing::pareto::{rank_counts, ParetoEntry};

/// A tally sheet: one row per category, one column per date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckSheet {
    /// Assigned when the sheet is saved to a store.
    #[serde(default)]
    pub id: Option<u64>,
    pub title: String,
    pub categories: Vec<String>,
    /// Kept sorted ascending.
    pub dates: Vec<NaiveDate>,
    #[serde(default)]
    pub counts: HashMap<String, BTreeMap<NaiveDate, u32>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl CheckSheet {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Add a category. Blank names and duplicates are ignored.
    pub fn add_category(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.categories.iter().any(|c| c == name) {
            return false;
        }
        self.categories.push(name.to_string());
        let row = self.counts.entry(name.to_string()).or_default();
        for date in &self.dates {
            row.entry(*date).or_insert(0);
        }
        true
    }

    /// Remove a category together with its counts.
    pub fn remove_category(&mut self, name: &str) -> bool {
        let before = self.categories.len();
        self.categories.retain(|c| c != name);
        self.counts.remove(name);
        self.categories.len() != before
    }

    /// Add a date column, keeping dates sorted. Existing counts are kept.
    pub fn add_date(&mut self, date: NaiveDate) -> bool {
        let Err(pos) = self.dates.binary_search(&date) else {
            return false;
        };
        self.dates.insert(pos, date);
        for category in &self.categories {
            self.counts
                .entry(category.clone())
                .or_default()
                .entry(date)
                .or_insert(0);
        }
        true
    }

    /// Adjust a tally by `delta`, never going below zero. Returns the new
    /// count, or `None` for an unknown category or date.
    pub fn update_count(&mut self, category: &str, date: NaiveDate, delta: i64) -> Option<u32> {
        if !self.categories.iter().any(|c| c == category) || self.dates.binary_search(&date).is_err() {
            return None;
        }
        let slot = self
            .counts
            .entry(category.to_string())
            .or_default()
            .entry(date)
            .or_insert(0);
        let updated = (i64::from(*slot) + delta).clamp(0, i64::from(u32::MAX));
        *slot = updated as u32;
        Some(*slot)
    }

    pub fn count(&self, category: &str, date: NaiveDate) -> u32 {
        self.counts
            .get(category)
            .and_then(|row| row.get(&date))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of a category's tallies over the sheet's dates. Summed in `u64`
    /// since every cell may hold up to `u32::MAX`.
    pub fn category_total(&self, category: &str) -> u64 {
        self.dates
            .iter()
            .map(|d| u64::from(self.count(category, *d)))
            .sum()
    }

    pub fn grand_total(&self) -> u64 {
        self.categories
            .iter()
            .map(|c| self.category_total(c))
            .fold(0, u64::saturating_add)
    }

    /// Rank the categories by total tally.
    pub fn to_pareto(&self) -> Vec<ParetoEntry> {
        rank_counts(
            self.categories
                .iter()
                .map(|c| (c.clone(), usize::try_from(self.category_total(c)).unwrap_or(usize::MAX))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn sheet() -> CheckSheet {
        let mut s = CheckSheet::new("Packaging defects");
        s.add_category("Torn label");
        s.add_category("Dent");
        s.add_date(day(3));
        s.add_date(day(1));
        s
    }

    #[test]
    fn categories_are_trimmed_and_unique() {
        let mut s = sheet();
        assert!(!s.add_category("  Dent "));
        assert!(!s.add_category("   "));
        assert!(s.add_category(" Scratch "));
        assert_eq!(s.categories, vec!["Torn label", "Dent", "Scratch"]);
    }

    #[test]
    fn dates_stay_sorted_and_unique() {
        let mut s = sheet();
        assert!(!s.add_date(day(1)));
        assert!(s.add_date(day(2)));
        assert_eq!(s.dates, vec![day(1), day(2), day(3)]);
        assert_eq!(s.count("Dent", day(2)), 0);
    }

    #[test]
    fn counts_saturate_at_zero() {
        let mut s = sheet();
        assert_eq!(s.update_count("Dent", day(1), 3), Some(3));
        assert_eq!(s.update_count("Dent", day(1), -5), Some(0));
        assert_eq!(s.update_count("Dent", day(9), 1), None);
        assert_eq!(s.update_count("Unknown", day(1), 1), None);
    }

    #[test]
    fn totals_and_pareto() {
        let mut s = sheet();
        s.update_count("Dent", day(1), 2);
        s.update_count("Dent", day(3), 4);
        s.update_count("Torn label", day(3), 1);
        assert_eq!(s.category_total("Dent"), 6);
        assert_eq!(s.grand_total(), 7);

        let ranked = s.to_pareto();
        assert_eq!(ranked[0].category, "Dent");
        assert_eq!(ranked[0].frequency, 6);
        assert!((ranked[1].cumulative_percentage - 100.0).abs() < 1e-9);
    }

    #[test]
    fn totals_of_full_cells_do_not_overflow() {
        let mut s = sheet();
        assert_eq!(s.update_count("Dent", day(1), i64::MAX), Some(u32::MAX));
        assert_eq!(s.update_count("Dent", day(3), i64::MAX), Some(u32::MAX));
        s.update_count("Torn label", day(1), 1);
        assert_eq!(s.category_total("Dent"), 2 * u64::from(u32::MAX));
        assert_eq!(s.grand_total(), 2 * u64::from(u32::MAX) + 1);
        assert_eq!(s.to_pareto()[0].category, "Dent");
    }

    #[test]
    fn removing_a_category_drops_counts() {
        let mut s = sheet();
        s.update_count("Dent", day(1), 2);
        assert!(s.remove_category("Dent"));
        assert!(!s.remove_category("Dent"));
        assert_eq!(s.grand_total(), 0);
        assert!(!s.counts.contains_key("Dent"));
    }

    #[test]
    fn serializes_dates_as_iso_strings() {
        let mut s = sheet();
        s.update_count("Dent", day(3), 1);
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"2024-05-03\""), "{json}");
        let back: CheckSheet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
