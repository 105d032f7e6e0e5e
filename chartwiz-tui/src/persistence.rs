//! UI preferences persisted as JSON across restarts.
//!
//! Only terminal preferences live here; wizard progress is never persisted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use chartwiz_core::domain::Category;
use chartwiz_core::SortKey;

use crate::app::{AppState, Overlay};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub welcome_dismissed: bool,
    pub sort: SortKey,
    /// Category the cursor starts on.
    pub last_category: Option<Category>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            welcome_dismissed: false,
            sort: SortKey::Name,
            last_category: None,
        }
    }
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        welcome_dismissed: app.overlay != Overlay::Welcome,
        sort: app.session.query().sort,
        last_category: app.last_category,
    }
}

pub fn apply(app: &mut AppState, state: PersistedState) {
    if !state.welcome_dismissed {
        app.overlay = Overlay::Welcome;
    }
    app.session.set_sort(state.sort);
    app.last_category = state.last_category;
    if let Some(category) = state.last_category {
        app.category_cursor = Category::ALL
            .iter()
            .position(|c| *c == category)
            .unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let state = PersistedState {
            welcome_dismissed: true,
            sort: SortKey::Date,
            last_category: Some(Category::Options),
        };
        save(&path, &state).unwrap();
        assert_eq!(load(&path), state);
    }

    #[test]
    fn missing_file_returns_defaults() {
        let loaded = load(Path::new("/nonexistent/path/state.json"));
        assert_eq!(loaded, PersistedState::default());
        assert!(!loaded.welcome_dismissed);
    }

    #[test]
    fn corrupt_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not valid json {{{").unwrap();
        assert_eq!(load(&path), PersistedState::default());
    }

    #[test]
    fn older_file_missing_fields_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"welcome_dismissed": true}"#).unwrap();
        let loaded = load(&path);
        assert!(loaded.welcome_dismissed);
        assert_eq!(loaded.sort, SortKey::Name);
    }
}
