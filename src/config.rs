use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Dashboard settings read from `~/.launch-dash/config.json`.
/// Any field missing from the file keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Launch table loaded at startup.
    pub data_path: PathBuf,
    /// Step of the payload range sliders, in kg.
    pub payload_step_kg: f64,
    /// Labelled marks under the payload sliders, in kg.
    pub payload_marks_kg: Vec<f64>,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("spacex_launch_dash.csv"),
            payload_step_kg: 1000.0,
            payload_marks_kg: vec![2500.0, 5000.0, 7500.0],
            window_width: 1200.0,
            window_height: 900.0,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".launch-dash"))
    }

    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Config> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load from an explicit path, else the default location, else defaults.
    /// A broken config file is logged and ignored.
    pub fn load(explicit: Option<&Path>) -> Config {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) if p.exists() => p,
                _ => return Config::default(),
            },
        };

        match Self::from_file(&path) {
            Ok(config) => {
                log::debug!("Using config {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config: {e:#}");
                Config::default()
            }
        }
    }
}
