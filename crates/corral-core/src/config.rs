//! Project configuration, loaded from `.corral/config.toml`.
//!
//! Every field has a serde default so a partial (or absent) file always
//! yields a usable config.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::view::{SortKey, SortOrder};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProjectConfig {
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub bulk: BulkConfig,
    #[serde(default)]
    pub user: UserConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Kanban columns, in board order.
    #[serde(default = "default_board_columns")]
    pub board_columns: Vec<String>,
    #[serde(default)]
    pub default_sort: SortKey,
    #[serde(default)]
    pub default_order: SortOrder,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            board_columns: default_board_columns(),
            default_sort: SortKey::default(),
            default_order: SortOrder::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkConfig {
    /// Milliseconds slept between bulk items — a courtesy to rate-limited
    /// backends, not a correctness knob.
    #[serde(default = "default_item_delay_ms")]
    pub item_delay_ms: u64,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            item_delay_ms: default_item_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    /// Id the `only_mine` filter clause compares assignees against.
    #[serde(default)]
    pub current_user: Option<String>,
}

fn default_board_columns() -> Vec<String> {
    vec!["todo".into(), "in-progress".into(), "done".into()]
}

const fn default_item_delay_ms() -> u64 {
    100
}

/// Load `.corral/config.toml` under the given root. A missing file yields
/// the default config; a malformed file is an error.
pub fn load_project_config(root: &Path) -> Result<ProjectConfig> {
    let path = root.join(".corral/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::{load_project_config, ProjectConfig};
    use crate::view::SortKey;

    #[test]
    fn defaults_are_usable() {
        let config = ProjectConfig::default();
        assert_eq!(config.view.board_columns, ["todo", "in-progress", "done"]);
        assert_eq!(config.bulk.item_delay_ms, 100);
        assert!(config.user.current_user.is_none());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: ProjectConfig = toml::from_str(
            r#"
            [view]
            default_sort = "priority"

            [user]
            current_user = "u-7"
            "#,
        )
        .unwrap();
        assert_eq!(config.view.default_sort, SortKey::Priority);
        assert_eq!(config.view.board_columns.len(), 3);
        assert_eq!(config.user.current_user.as_deref(), Some("u-7"));
    }

    #[test]
    fn missing_file_is_default_malformed_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_project_config(dir.path()).is_ok());

        std::fs::create_dir_all(dir.path().join(".corral")).unwrap();
        std::fs::write(dir.path().join(".corral/config.toml"), "not = [toml").unwrap();
        assert!(load_project_config(dir.path()).is_err());
    }
}
