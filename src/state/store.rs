use std::path::{Path, PathBuf};

use crate::state::check_sheet::CheckSheet;

/// Saved check sheets, kept as a JSON array in a single file.
#[derive(Debug, Clone)]
pub struct SheetStore {
    path: PathBuf,
}

impl SheetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every saved sheet, oldest first. A missing file is an empty store.
    pub fn load_all(&self) -> Result<Vec<CheckSheet>, String> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let json = std::fs::read_to_string(&self.path)
            .map_err(|e| format!("Failed to read file: {e}"))?;
        if json.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&json).map_err(|e| format!("Failed to parse check sheets: {e}"))
    }

    pub fn load_last(&self) -> Result<Option<CheckSheet>, String> {
        Ok(self.load_all()?.pop())
    }

    /// The sheet with `id`, or the most recent one when `id` is `None`.
    pub fn find(&self, id: Option<u64>) -> Result<CheckSheet, String> {
        let sheets = self.load_all()?;
        let found = match id {
            Some(id) => sheets.into_iter().find(|s| s.id == Some(id)),
            None => sheets.into_iter().last(),
        };
        found.ok_or_else(|| match id {
            Some(id) => format!("No check sheet with id {id}"),
            None => "No check sheets saved".to_string(),
        })
    }

    /// Append a sheet. The title must not be blank; the stored copy gets the
    /// next free id and the current time, and is returned.
    pub fn save(&self, sheet: &CheckSheet) -> Result<CheckSheet, String> {
        if sheet.title.trim().is_empty() {
            return Err("Check sheet title is required".to_string());
        }

        let mut sheets = self.load_all()?;
        let next_id = sheets.iter().filter_map(|s| s.id).max().map_or(1, |id| id + 1);

        let mut saved = sheet.clone();
        saved.id = Some(next_id);
        saved.created_at = Some(chrono::Utc::now());
        sheets.push(saved.clone());

        self.write_all(&sheets)?;
        tracing::info!("Check sheet {:?} saved to {:?}", saved.title, self.path);
        Ok(saved)
    }

    /// Replace a previously saved sheet, matched by id. Its id and creation
    /// time are kept.
    pub fn update(&self, sheet: &CheckSheet) -> Result<(), String> {
        if sheet.title.trim().is_empty() {
            return Err("Check sheet title is required".to_string());
        }
        let Some(id) = sheet.id else {
            return Err("Check sheet has not been saved yet".to_string());
        };

        let mut sheets = self.load_all()?;
        let slot = sheets
            .iter_mut()
            .find(|s| s.id == Some(id))
            .ok_or_else(|| format!("No check sheet with id {id}"))?;
        let created_at = slot.created_at;
        *slot = sheet.clone();
        slot.created_at = created_at;

        self.write_all(&sheets)?;
        tracing::info!("Check sheet {id} updated in {:?}", self.path);
        Ok(())
    }

    fn write_all(&self, sheets: &[CheckSheet]) -> Result<(), String> {
        let json = serde_json::to_string_pretty(sheets)
            .map_err(|e| format!("Failed to serialize check sheets: {e}"))?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| format!("Failed to create {dir:?}: {e}"))?;
        }
        std::fs::write(&self.path, json).map_err(|e| format!("Failed to save check sheets: {e}"))
    }
}
