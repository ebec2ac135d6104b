//! Alert thresholds and notification contacts
//!
//! Stored as JSON in `<root>/settings.json`. Missing file → defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use rankscout_common::Result;

/// User alert settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    /// Rank threshold
    pub rank: u64,
    /// Monthly sales threshold
    pub monthly_sales: u64,
    /// Sales price threshold
    pub sales_price: f64,
    /// Notification email address
    pub email: String,
    /// Notification text (SMS) contact
    pub text: String,
}

impl AlertSettings {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write atomically (temp file + rename)
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, serde_json::to_vec_pretty(self)?)?;
        std::fs::rename(&temp_path, path)?;

        tracing::info!(path = %path.display(), "Settings updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = AlertSettings::load(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, AlertSettings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let settings = AlertSettings {
            rank: 5000,
            monthly_sales: 40,
            sales_price: 19.99,
            email: "ops@example.com".to_string(),
            text: String::new(),
        };
        settings.save(&path).unwrap();

        assert_eq!(AlertSettings::load(&path).unwrap(), settings);
        assert!(!dir.path().join("settings.json.tmp").exists());
    }
}
