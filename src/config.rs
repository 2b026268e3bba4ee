// src/config.rs

use crate::model::elements::{SiteRole, CENTER_SPECIES, CORNER_SPECIES};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("config i/o error: {0}")]
  Io(#[from] std::io::Error),
  #[error("error parsing config: {0}")]
  Parse(#[from] serde_json::Error),
}

// --- Main Config Struct ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TiltingConfig {
  /// Max center-corner distance for a corner to belong to an octahedron (Å)
  pub bond_length_limit: f64,
  /// Max Z spread between consecutive members of a tilt plane (Å)
  pub z_difference: f64,
  /// Folding limit for extracted angles (degrees)
  pub max_tilting_degree: f64,
  /// Cell refinement distance tolerance
  pub symprec: f64,
  /// Cell refinement angle tolerance (degrees)
  pub angle_tolerance: f64,
  pub center_species: BTreeSet<String>,
  pub corner_species: BTreeSet<String>,
}

impl Default for TiltingConfig {
  fn default() -> Self {
    Self {
      bond_length_limit: 2.5,
      z_difference: 1.6,
      max_tilting_degree: 22.4,
      symprec: 1e-4,
      angle_tolerance: 4.0,
      center_species: CENTER_SPECIES.iter().map(|s| s.to_string()).collect(),
      corner_species: CORNER_SPECIES.iter().map(|s| s.to_string()).collect(),
    }
  }
}

impl TiltingConfig {
  pub fn is_center(&self, element: &str) -> bool {
    self.center_species.contains(element)
  }

  pub fn is_corner(&self, element: &str) -> bool {
    self.corner_species.contains(element)
  }

  /// Center wins when a species is listed in both sets
  pub fn role_of(&self, element: &str) -> Option<SiteRole> {
    if self.is_center(element) {
      Some(SiteRole::Center)
    } else if self.is_corner(element) {
      Some(SiteRole::Corner)
    } else {
      None
    }
  }

  /// Loads config from standard OS location (e.g., ~/.config/octatilt/settings.json)
  pub fn load() -> Self {
    let path = Self::get_path();
    if !path.exists() {
      log::debug!("No config found at {:?}. Using defaults.", path);
      return Self::default();
    }
    match Self::load_from(&path) {
      Ok(cfg) => {
        log::info!("Config loaded from {:?}", path);
        cfg
      }
      Err(e) => {
        log::warn!("{} ({:?}); using defaults", e, path);
        Self::default()
      }
    }
  }

  pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
  }

  /// Saves config to standard OS location
  pub fn save(&self) -> Result<PathBuf, ConfigError> {
    let path = Self::get_path();
    self.save_to(&path)?;
    Ok(path)
  }

  pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, self)?;
    Ok(())
  }

  pub fn get_path() -> PathBuf {
    if let Some(proj) = ProjectDirs::from("org", "octatilt", "octatilt") {
      proj.config_dir().join("settings.json")
    } else {
      PathBuf::from("settings.json")
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let cfg = TiltingConfig::default();
    assert_eq!(cfg.bond_length_limit, 2.5);
    assert_eq!(cfg.z_difference, 1.6);
    assert_eq!(cfg.max_tilting_degree, 22.4);
    assert_eq!(cfg.role_of("Ti"), Some(SiteRole::Center));
    assert_eq!(cfg.role_of("O"), Some(SiteRole::Corner));
    assert_eq!(cfg.role_of("Sr"), None);
  }

  #[test]
  fn test_partial_json_fills_defaults() {
    let cfg: TiltingConfig =
      serde_json::from_str(r#"{"bond_length_limit": 2.2, "corner_species": ["Cl"]}"#).unwrap();
    assert_eq!(cfg.bond_length_limit, 2.2);
    assert_eq!(cfg.max_tilting_degree, 22.4);
    assert!(cfg.is_corner("Cl"));
    assert!(!cfg.is_corner("O"));
    assert!(cfg.is_center("Ti"));
  }

  #[test]
  fn test_save_and_load_roundtrip() {
    let dir = std::env::temp_dir().join(format!("octatilt-cfg-{}", std::process::id()));
    let path = dir.join("settings.json");
    let mut cfg = TiltingConfig::default();
    cfg.center_species.insert("Pb".to_string());
    cfg.save_to(&path).unwrap();

    let back = TiltingConfig::load_from(&path).unwrap();
    assert_eq!(back, cfg);
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_load_errors() {
    let missing = std::env::temp_dir().join("octatilt-definitely-missing.json");
    assert!(matches!(TiltingConfig::load_from(&missing), Err(ConfigError::Io(_))));

    let bad = std::env::temp_dir().join(format!("octatilt-bad-{}.json", std::process::id()));
    fs::write(&bad, "{ not json").unwrap();
    assert!(matches!(TiltingConfig::load_from(&bad), Err(ConfigError::Parse(_))));
    let _ = fs::remove_file(&bad);
  }
}
