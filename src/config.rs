//! Configuration management for verdant
//!
//! Stores settings in ~/.config/verdant/config.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

fn default_server_url() -> String {
    "http://localhost:8000".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend base URL.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Remembered zip / postal code from the last session.
    pub zip_code: Option<String>,
    /// Default garden size: small, medium, or large.
    pub garden_size: Option<String>,
    /// Default experience level: beginner, intermediate, or advanced.
    pub experience_level: Option<String>,
    /// Directory for downloaded plan documents (defaults to cwd).
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            zip_code: None,
            garden_size: None,
            experience_level: None,
            output_dir: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("verdant"))
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }

    /// Load config from disk, or return default
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if let Ok(content) = fs::read_to_string(&path) {
                match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(err) => {
                        preserve_corrupt_config(&path, &content);
                        eprintln!(
                            "  Warning: Config file was corrupted ({}). A backup was saved and defaults were loaded.",
                            err
                        );
                    }
                }
            }
        }
        Self::default()
    }

    /// Save config to disk
    pub fn save(&self) -> Result<(), String> {
        let dir = Self::config_dir()
            .ok_or_else(|| "Could not determine config directory".to_string())?;

        fs::create_dir_all(&dir)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;

        let path = dir.join("config.json");
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(&path, content).map_err(|e| format!("Failed to write config: {}", e))?;
        Ok(())
    }

    /// Get the config file location for display
    pub fn config_location() -> String {
        Self::config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "~/.config/verdant/config.json".to_string())
    }
}

fn preserve_corrupt_config(path: &std::path::Path, content: &str) {
    let corrupt_path = path.with_extension("json.corrupt");
    if fs::rename(path, &corrupt_path).is_err() {
        let _ = fs::write(&corrupt_path, content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_url, "http://localhost:8000");
        assert!(config.zip_code.is_none());
    }

    #[test]
    fn test_config_round_trip() {
        let config = Config {
            server_url: "http://garden.example:9000".to_string(),
            zip_code: Some("97201".to_string()),
            garden_size: Some("large".to_string()),
            experience_level: None,
            output_dir: None,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.server_url, config.server_url);
        assert_eq!(back.zip_code, config.zip_code);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let back: Config = serde_json::from_str(r#"{"zip_code": "12345"}"#).unwrap();
        assert_eq!(back.server_url, "http://localhost:8000");
        assert_eq!(back.zip_code.as_deref(), Some("12345"));
    }

    #[test]
    fn test_corrupt_config_is_backed_up_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();

        preserve_corrupt_config(&path, "{not json");

        let backup = dir.path().join("config.json.corrupt");
        assert!(backup.exists());
        assert_eq!(fs::read_to_string(backup).unwrap(), "{not json");
    }
}
