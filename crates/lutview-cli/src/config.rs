//! User settings (`config.ron`).
//!
//! ```ron
//! (
//!     lut_resolution: 33,
//!     intent: "relative",
//!     displays: [
//!         (name: "studio", profile: "/usr/share/color/icc/studio.icc"),
//!         (name: "laptop"),
//!     ],
//! )
//! ```

use anyhow::{Context, Result, bail};
use ron::extensions::Extensions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use lutview_icc::Intent;
use lutview_lut::{DEFAULT_RESOLUTION, DisplayId, StaticResolver};

/// A display and the ICC profile assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub name: String,
    #[serde(default)]
    pub profile: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Edge length for generated LUTs.
    pub lut_resolution: usize,
    /// Rendering intent name, parsed on use.
    pub intent: String,
    pub displays: Vec<DisplayConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lut_resolution: DEFAULT_RESOLUTION,
            intent: Intent::default().to_string(),
            displays: Vec::new(),
        }
    }
}

impl Settings {
    /// `<config dir>/lutview/config.ron`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lutview").join("config.ron"))
    }

    /// Loads settings from `path`, or from [`default_path`](Self::default_path).
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => {
                if !p.exists() {
                    bail!("Config file not found: {}", p.display());
                }
                p.to_path_buf()
            }
            None => match Self::default_path() {
                Some(p) if p.exists() => p,
                _ => {
                    debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let settings = Self::parse(&text)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        debug!(path = %path.display(), displays = settings.displays.len(), "loaded config");
        Ok(settings)
    }

    /// Parses RON text. `profile: "..."` needs no `Some(...)` wrapper.
    pub fn parse(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .from_str(text)
    }

    pub fn intent(&self) -> Result<Intent> {
        self.intent
            .parse()
            .with_context(|| format!("Invalid intent in config: {}", self.intent))
    }

    /// Profile table for the configured displays.
    pub fn resolver(&self) -> StaticResolver {
        self.displays
            .iter()
            .filter_map(|d| {
                d.profile
                    .as_ref()
                    .map(|p| (DisplayId::new(d.name.as_str()), p.clone()))
            })
            .collect()
    }

    pub fn display_ids(&self) -> Vec<DisplayId> {
        self.displays
            .iter()
            .map(|d| DisplayId::new(d.name.as_str()))
            .collect()
    }
}
