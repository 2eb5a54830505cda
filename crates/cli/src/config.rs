use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use querysync_core::filters::DistributionFilters;
use querysync_core::{NavigateMode, TrackedKeys};

const CONFIG_FILE: &str = "querysync.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub pages: Vec<PageConfig>,
}

/// A page whose filters are mirrored into its URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    pub name: String,
    pub path: String,
    pub keys: Vec<String>,
    /// Record filter edits as new history entries instead of replacing.
    #[serde(default)]
    pub push: bool,
}

impl PageConfig {
    pub fn tracked_keys(&self) -> TrackedKeys {
        TrackedKeys::new(self.keys.iter().map(String::as_str))
    }

    pub fn mode(&self) -> NavigateMode {
        if self.push {
            NavigateMode::Push
        } else {
            NavigateMode::Replace
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pages: vec![PageConfig {
                name: "distributions".to_string(),
                path: "/retailer/distributions".to_string(),
                keys: DistributionFilters::KEYS
                    .iter()
                    .map(|k| k.to_string())
                    .collect(),
                push: false,
            }],
        }
    }
}

impl AppConfig {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("querysync")
            .join(CONFIG_FILE)
    }

    /// Load from `path`, or from the default location. A missing default
    /// file yields the built-in pages; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::config_path(), false),
        };
        if !explicit && !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using built-in pages");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("config not found at {}", path.display()))?;
        toml::from_str(&content).context("failed to parse config")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        Ok(())
    }

    pub fn find_page(&self, name: &str) -> Option<&PageConfig> {
        self.pages.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Tracked keys from an explicit list, or from a named page.
    pub fn resolve_keys(&self, keys: &[String], page: Option<&str>) -> Result<TrackedKeys> {
        if !keys.is_empty() {
            return Ok(TrackedKeys::new(keys.iter().map(String::as_str)));
        }
        let name = page.ok_or_else(|| anyhow::anyhow!("either --keys or --page is required"))?;
        let page = self
            .find_page(name)
            .ok_or_else(|| anyhow::anyhow!("unknown page: {name}"))?;
        Ok(page.tracked_keys())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = AppConfig::default();
        config.pages.push(PageConfig {
            name: "invoices".into(),
            path: "/staff/invoices".into(),
            keys: vec!["status".into(), "q".into()],
            push: true,
        });
        config.save(&path).unwrap();

        let loaded = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded.pages.len(), 2);
        let invoices = loaded.find_page("INVOICES").unwrap();
        assert_eq!(invoices.mode(), NavigateMode::Push);
        assert_eq!(
            invoices.tracked_keys().iter().collect::<Vec<_>>(),
            vec!["status", "q"]
        );
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("config not found"));
    }

    #[test]
    fn parses_minimal_page() {
        let config: AppConfig = toml::from_str(
            r#"
            [[pages]]
            name = "patients"
            path = "/staff/patients"
            keys = ["shopId"]
            "#,
        )
        .unwrap();
        assert_eq!(config.pages[0].mode(), NavigateMode::Replace);
    }

    #[test]
    fn resolve_keys_prefers_explicit_list() {
        let config = AppConfig::default();
        let keys = config
            .resolve_keys(&["a".into(), "b".into()], Some("distributions"))
            .unwrap();
        assert_eq!(keys.len(), 2);

        let keys = config.resolve_keys(&[], Some("distributions")).unwrap();
        assert!(keys.contains("deliveryStatus"));

        assert!(config.resolve_keys(&[], None).is_err());
        assert!(config.resolve_keys(&[], Some("nope")).is_err());
    }
}
