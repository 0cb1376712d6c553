use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{HachToanError, Result};
use crate::mapper::DEFAULT_CUTOFF_YEAR;
use crate::models::Layout;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Last year still booked through POS terminals.
    #[serde(default = "default_cutoff_year")]
    pub cutoff_year: i32,
    #[serde(default = "default_bank_account")]
    pub bank_account: String,
    #[serde(default = "default_bank_name")]
    pub bank_name: String,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_cutoff_year() -> i32 {
    DEFAULT_CUTOFF_YEAR
}

fn default_bank_account() -> String {
    "1290153594".to_string()
}

fn default_bank_name() -> String {
    "Ngân hàng TMCP Đầu tư và Phát triển Việt Nam - Hoàng Mai".to_string()
}

fn default_output_dir() -> String {
    ".".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cutoff_year: default_cutoff_year(),
            bank_account: default_bank_account(),
            bank_name: default_bank_name(),
            layout: Layout::default(),
            output_dir: default_output_dir(),
        }
    }
}

pub const KEYS: &[&str] = &["cutoff_year", "bank_account", "bank_name", "layout", "output_dir"];

impl Settings {
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "cutoff_year" => Some(self.cutoff_year.to_string()),
            "bank_account" => Some(self.bank_account.clone()),
            "bank_name" => Some(self.bank_name.clone()),
            "layout" => Some(self.layout.key().to_string()),
            "output_dir" => Some(self.output_dir.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "cutoff_year" => {
                self.cutoff_year = value.trim().parse().map_err(|_| {
                    HachToanError::Settings(format!("cutoff_year must be a year, got '{value}'"))
                })?;
            }
            "bank_account" => self.bank_account = value.trim().to_string(),
            "bank_name" => self.bank_name = value.trim().to_string(),
            "layout" => {
                self.layout = Layout::from_key(value)
                    .ok_or_else(|| HachToanError::UnknownLayout(value.to_string()))?;
            }
            "output_dir" => self.output_dir = value.trim().to_string(),
            _ => {
                return Err(HachToanError::Settings(format!(
                    "unknown key '{key}' (expected one of: {})",
                    KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("hachtoan")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings file");
            Settings::default()
        })
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| HachToanError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            cutoff_year: 2023,
            layout: Layout::Journal,
            ..Settings::default()
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        std::fs::write(&path, &json).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: Settings = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded, settings);
        assert!(content.contains("\"layout\": \"journal\""));
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.cutoff_year, 2022);
        assert_eq!(s.bank_account, "1290153594");
        assert_eq!(s.layout, Layout::Receipt);
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"cutoff_year": 2023}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.cutoff_year, 2023);
        assert_eq!(s.bank_account, "1290153594");
        assert_eq!(s.output_dir, ".");
    }

    #[test]
    fn test_set_and_get() {
        let mut s = Settings::default();
        s.set("cutoff_year", "2023").unwrap();
        s.set("layout", "Journal").unwrap();
        assert_eq!(s.get("cutoff_year").as_deref(), Some("2023"));
        assert_eq!(s.get("layout").as_deref(), Some("journal"));
        assert!(s.set("cutoff_year", "soon").is_err());
        assert!(s.set("layout", "ledger").is_err());
        assert!(s.set("colour", "red").is_err());
        assert_eq!(s.get("colour"), None);
    }
}
