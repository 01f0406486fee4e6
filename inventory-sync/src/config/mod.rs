//! Configuration file handling
//!
//! Settings come from three layers, later layers winning:
//! 1. `config.toml` (default location `~/.config/inventory-sync/config.toml`)
//! 2. Environment variables (a `.env` file is loaded first)
//! 3. Command-line flags, applied by the command handlers

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::store::StoreKind;
use crate::sync::{FieldMapping, MatchPolicy, TableLayout};

const APP_DIR: &str = "inventory-sync";
const CONFIG_FILE: &str = "config.toml";

pub const ENV_RVTOOLS: &str = "INVENTORY_SYNC_RVTOOLS";
pub const ENV_INVENTORY: &str = "INVENTORY_SYNC_INVENTORY";
pub const ENV_OUTPUT: &str = "INVENTORY_SYNC_OUTPUT";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub workbooks: WorkbookConfig,
    pub sheets: SheetNames,
    pub layout: LayoutConfig,
    pub sync: SyncSettings,
}

/// Where the two workbooks live
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbookConfig {
    /// RVTools export (`.xlsx` file or directory of CSV files)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rvtools: Option<String>,
    /// Server inventory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<String>,
    /// Save the reconciled inventory here instead of overwriting it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub store: StoreKind,
}

/// Names of the four sheets a run works on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetNames {
    /// RVTools network-interface sheet
    pub network: String,
    /// RVTools general VM info sheet
    pub info: String,
    /// Inventory sheet for UNIX servers
    pub unix: String,
    /// Inventory sheet for Intel VMs
    pub intel: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        SheetNames {
            network: "vNetwork".to_string(),
            info: "vInfo".to_string(),
            unix: "Servidores UNIX".to_string(),
            intel: "MV INTEL".to_string(),
        }
    }
}

/// Header row of each workbook's sheets (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub rvtools_header_row: u32,
    /// Inventory sheets carry a title block above the headers
    pub inventory_header_row: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            rvtools_header_row: 1,
            inventory_header_row: 3,
        }
    }
}

impl LayoutConfig {
    pub fn rvtools(&self) -> TableLayout {
        TableLayout::new(self.rvtools_header_row)
    }

    pub fn inventory(&self) -> TableLayout {
        TableLayout::new(self.inventory_header_row)
    }

    /// Header rows are 1-based and need a data row after them
    pub fn validate(&self) -> Result<()> {
        for (key, row) in [
            ("rvtools_header_row", self.rvtools_header_row),
            ("inventory_header_row", self.inventory_header_row),
        ] {
            if row == 0 || row == u32::MAX {
                bail!("layout.{} must be between 1 and {}, got {}", key, u32::MAX - 1, row);
            }
        }
        Ok(())
    }
}

/// Reconciliation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Target column used to identify a row
    pub key_field: String,
    pub match_policy: MatchPolicy,
    /// `network` sheet -> `unix` sheet
    pub unix: FieldMapping,
    /// `info` sheet -> `intel` sheet
    pub intel: FieldMapping,
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            key_field: "HOSTNAME".to_string(),
            match_policy: MatchPolicy::default(),
            unix: FieldMapping::network(),
            intel: FieldMapping::info(),
        }
    }
}

impl Config {
    /// Default config file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(CONFIG_FILE)
    }

    /// Load from `path`, or from the default location.
    ///
    /// An explicit path must exist; a missing file at the default location
    /// yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::default_path();
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    log::debug!("No config file at {}, using defaults", default_path.display());
                    Config::default()
                }
            }
        };

        config.apply_env();
        Ok(config)
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config
            .layout
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the config as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = self.to_toml()?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Override workbook locations from the environment
    pub fn apply_env(&mut self) {
        if let Ok(value) = std::env::var(ENV_RVTOOLS) {
            self.workbooks.rvtools = Some(value);
        }
        if let Ok(value) = std::env::var(ENV_INVENTORY) {
            self.workbooks.inventory = Some(value);
        }
        if let Ok(value) = std::env::var(ENV_OUTPUT) {
            self.workbooks.output = Some(value);
        }
    }

    pub fn rvtools_id(&self) -> Result<&str> {
        self.workbooks.rvtools.as_deref().with_context(|| {
            format!(
                "No RVTools workbook configured. Use --rvtools, set {} or add workbooks.rvtools to the config file",
                ENV_RVTOOLS
            )
        })
    }

    pub fn inventory_id(&self) -> Result<&str> {
        self.workbooks.inventory.as_deref().with_context(|| {
            format!(
                "No inventory workbook configured. Use --inventory, set {} or add workbooks.inventory to the config file",
                ENV_INVENTORY
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_known_layout() {
        let config = Config::default();
        assert_eq!(config.sheets.network, "vNetwork");
        assert_eq!(config.sheets.info, "vInfo");
        assert_eq!(config.sheets.unix, "Servidores UNIX");
        assert_eq!(config.sheets.intel, "MV INTEL");
        assert_eq!(config.layout.rvtools().data_start(), 2);
        assert_eq!(config.layout.inventory().data_start(), 4);
        assert_eq!(config.sync.key_field, "HOSTNAME");
        assert_eq!(config.sync.match_policy, MatchPolicy::All);
        assert!(config.sync.unix.enabled);
        assert!(!config.sync.intel.enabled);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [workbooks]
            rvtools = "RVTools_export_all.xlsx"
            inventory = "Inventario.xlsx"

            [sync]
            match_policy = "first"
            "#,
        )
        .unwrap();

        assert_eq!(config.workbooks.rvtools.as_deref(), Some("RVTools_export_all.xlsx"));
        assert_eq!(config.workbooks.store, StoreKind::Auto);
        assert_eq!(config.sync.match_policy, MatchPolicy::First);
        assert_eq!(config.sync.unix, FieldMapping::network());
        assert_eq!(config.sheets, SheetNames::default());
    }

    #[test]
    fn test_intel_mapping_can_be_enabled() {
        let config: Config = toml::from_str(
            r#"
            [sync.intel]
            enabled = true
            hostname_column = "VM"
            ip_column = "Primary IP Address"
            ip_field = "IP"
            "#,
        )
        .unwrap();

        assert!(config.sync.intel.enabled);
        assert_eq!(config.sync.intel.ip_field, "IP");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = Config::default();
        config.workbooks.inventory = Some("Inventario.xlsx".to_string());
        config.layout.inventory_header_row = 5;
        config.save(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/config.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_out_of_range_header_rows_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        for row in ["0", "4294967295"] {
            fs::write(&path, format!("[layout]\ninventory_header_row = {}\n", row)).unwrap();
            let err = Config::from_file(&path).unwrap_err();
            assert!(format!("{:#}", err).contains("inventory_header_row"), "row {}", row);
        }

        fs::write(&path, "[layout]\nrvtools_header_row = 2\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.layout.rvtools().data_start(), 3);
    }

    #[test]
    fn test_missing_workbook_message_names_the_flag() {
        let err = Config::default().rvtools_id().unwrap_err();
        assert!(err.to_string().contains("--rvtools"));
        assert!(err.to_string().contains(ENV_RVTOOLS));
    }
}
