// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export configuration

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File read by [`ExportConfig::load`] when present in the working directory.
pub const CONFIG_FILE: &str = "gdml-export.toml";

/// How the world box is sized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorldSizing {
    /// Origin-centred box around every placed volume, plus the margin
    #[default]
    Computed,
    /// Cube of `default_size` regardless of content
    Fixed,
}

impl std::str::FromStr for WorldSizing {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "computed" => Ok(WorldSizing::Computed),
            "fixed" => Ok(WorldSizing::Fixed),
            other => bail!("Unknown world sizing '{}', expected 'computed' or 'fixed'", other),
        }
    }
}

/// World volume settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub sizing: WorldSizing,
    /// Edge length in mm of the fixed box, also used for an empty scene
    pub default_size: f64,
    /// Clearance in mm added on each side of the computed extent
    pub margin: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            sizing: WorldSizing::Computed,
            default_size: 1000.0,
            margin: 10.0,
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Material for objects that do not name their own
    pub default_material: String,
    /// Material filling the world volume
    pub world_material: String,
    pub world: WorldConfig,
    /// Translation components and rotation angles (rad) at or below this
    /// magnitude count as zero
    pub zero_tolerance: f64,
    /// Warn when boolean operands are rotated relative to each other
    pub report_boolean_rotation: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_material: "SSteel0x56070ee87d10".to_string(),
            world_material: "G4_Galactic".to_string(),
            world: WorldConfig::default(),
            zero_tolerance: 1e-9,
            report_boolean_rotation: true,
        }
    }
}

impl ExportConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: ExportConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Result<Self> {
        let config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.with_env_overrides()
    }

    /// Apply `GDML_DEFAULT_MATERIAL`, `GDML_WORLD_MATERIAL` and
    /// `GDML_WORLD_SIZING`.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(material) = std::env::var("GDML_DEFAULT_MATERIAL") {
            self.default_material = material;
        }

        if let Ok(material) = std::env::var("GDML_WORLD_MATERIAL") {
            self.world_material = material;
        }

        if let Ok(sizing) = std::env::var("GDML_WORLD_SIZING") {
            self.world.sizing = sizing
                .parse()
                .context("Invalid GDML_WORLD_SIZING")?;
        }

        Ok(self)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.default_material, "SSteel0x56070ee87d10");
        assert_eq!(config.world_material, "G4_Galactic");
        assert_eq!(config.world.sizing, WorldSizing::Computed);
        assert_eq!(config.world.default_size, 1000.0);
    }

    #[test]
    fn test_save_and_reload() -> Result<()> {
        let mut config = ExportConfig::default();
        config.world.sizing = WorldSizing::Fixed;
        config.default_material = "G4_AIR".to_string();

        let file = NamedTempFile::new()?;
        config.save(file.path())?;
        let loaded = ExportConfig::from_file(file.path())?;

        assert_eq!(loaded, config);
        Ok(())
    }

    #[test]
    fn test_partial_file_keeps_defaults() -> Result<()> {
        let file = NamedTempFile::new()?;
        std::fs::write(file.path(), "[world]\nsizing = \"fixed\"\n")?;
        let loaded = ExportConfig::from_file(file.path())?;

        assert_eq!(loaded.world.sizing, WorldSizing::Fixed);
        assert_eq!(loaded.world.margin, 10.0);
        assert_eq!(loaded.world_material, "G4_Galactic");
        Ok(())
    }

    #[test]
    fn test_world_sizing_parse() {
        assert_eq!("Fixed".parse::<WorldSizing>().unwrap(), WorldSizing::Fixed);
        assert!("huge".parse::<WorldSizing>().is_err());
    }
}
