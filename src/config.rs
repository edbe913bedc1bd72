// SPDX-License-Identifier: PMPL-1.0-or-later

//! Site configuration (`umbrella.yaml` / `umbrella.json`).

use crate::types::{Language, MotionPreference};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const CONFIG_CANDIDATES: [&str; 3] = ["umbrella.yaml", "umbrella.yml", "umbrella.json"];
pub const ENV_PUBLIC_DIR: &str = "UMBRELLA_PUBLIC_DIR";
pub const ENV_REDUCED_MOTION: &str = "UMBRELLA_REDUCED_MOTION";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub public_dir: PathBuf,
    pub preference_file: PathBuf,
    pub default_language: Language,
    pub viewport: ViewportConfig,
    /// Pixels scrolled per playback tick.
    pub scroll_step: f64,
    pub loader_ms: u64,
    pub carousel_interval_ms: u64,
    pub modal_close_ms: u64,
    pub reduced_motion: bool,
    pub particle_count: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            public_dir: PathBuf::from("public"),
            preference_file: PathBuf::from(".umbrella/preferences.json"),
            default_language: Language::En,
            viewport: ViewportConfig::default(),
            scroll_step: 40.0,
            loader_ms: 500,
            carousel_interval_ms: 5000,
            modal_close_ms: 300,
            reduced_motion: false,
            particle_count: 1500,
        }
    }
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

impl SiteConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
        let ext = path.extension().and_then(|s| s.to_str());
        let config: SiteConfig = if ext == Some("yaml") || ext == Some("yml") {
            serde_yaml::from_str(&content)
                .with_context(|| format!("parsing yaml config {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("parsing json config {}", path.display()))?
        };
        config.validate()?;
        Ok(config)
    }

    /// Explicit path first, then the well-known names in `dir`, then
    /// defaults. An explicit path that does not exist is an error.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<(Self, ConfigSource)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, ConfigSource::File(path.to_path_buf())));
        }
        for name in CONFIG_CANDIDATES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                debug!(path = %candidate.display(), "using config file");
                return Ok((Self::load(&candidate)?, ConfigSource::File(candidate)));
            }
        }
        Ok((Self::default(), ConfigSource::Defaults))
    }

    /// Apply `UMBRELLA_*` overrides through `lookup` (normally `std::env::var`).
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(dir) = lookup(ENV_PUBLIC_DIR).filter(|value| !value.is_empty()) {
            self.public_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup(ENV_REDUCED_MOTION) {
            self.reduced_motion = parse_flag(&raw)
                .ok_or_else(|| anyhow!("{} must be a boolean, got '{}'", ENV_REDUCED_MOTION, raw))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return Err(anyhow!(
                "viewport must have a positive size, got {}x{}",
                self.viewport.width,
                self.viewport.height
            ));
        }
        if self.scroll_step <= 0.0 {
            return Err(anyhow!("scroll_step must be positive, got {}", self.scroll_step));
        }
        Ok(())
    }

    pub fn loader(&self) -> Duration {
        Duration::from_millis(self.loader_ms)
    }

    pub fn carousel_interval(&self) -> Duration {
        Duration::from_millis(self.carousel_interval_ms)
    }

    pub fn modal_close(&self) -> Duration {
        Duration::from_millis(self.modal_close_ms)
    }

    pub fn motion(&self) -> MotionPreference {
        if self.reduced_motion {
            MotionPreference::Reduced
        } else {
            MotionPreference::Full
        }
    }
}
