use serde::{Deserialize, Serialize};

/// The classic six cause categories of a fishbone diagram.
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Manpower",
    "Methods",
    "Materials",
    "Machinery",
    "Measurement",
    "Environment",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CauseCategory {
    pub id: u32,
    pub name: String,
    pub causes: Vec<String>,
}

/// Cause-and-effect (fishbone) diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IshikawaDiagram {
    pub effect: String,
    pub categories: Vec<CauseCategory>,
}

impl IshikawaDiagram {
    pub fn new(effect: impl Into<String>) -> Self {
        let categories = DEFAULT_CATEGORIES
            .iter()
            .zip(1..)
            .map(|(name, id)| CauseCategory {
                id,
                name: (*name).to_string(),
                causes: Vec::new(),
            })
            .collect();
        Self {
            effect: effect.into(),
            categories,
        }
    }

    pub fn category(&self, id: u32) -> Option<&CauseCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Append a cause to a category. Blank causes are ignored.
    pub fn add_cause(&mut self, category_id: u32, cause: &str) -> bool {
        let cause = cause.trim();
        if cause.is_empty() {
            return false;
        }
        match self.categories.iter_mut().find(|c| c.id == category_id) {
            Some(category) => {
                category.causes.push(cause.to_string());
                true
            }
            None => false,
        }
    }

    pub fn remove_cause(&mut self, category_id: u32, index: usize) -> Option<String> {
        let category = self.categories.iter_mut().find(|c| c.id == category_id)?;
        (index < category.causes.len()).then(|| category.causes.remove(index))
    }

    pub fn cause_count(&self) -> usize {
        self.categories.iter().map(|c| c.causes.len()).sum()
    }
}

impl Default for IshikawaDiagram {
    fn default() -> Self {
        Self::new("")
    }
}
