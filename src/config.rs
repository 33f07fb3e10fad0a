// ⚙️ Configuration - connection parameters and run settings
//
// Replaces module-level globals (output dir, DB settings) with one struct that
// is passed explicitly into the pipeline. Every field defaults independently,
// so a JSON file may name only the fields it wants to override.

use crate::error::{DashboardError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "PLACEMENT_CONFIG";

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

// ============================================================================
// DATABASE CONFIG
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbDriver {
    #[default]
    Mysql,
    Sqlite,
}

/// Recognized fields: host, user, password, database, port (+ driver)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    /// Database name for MySQL, file path for SQLite
    pub database: String,
    pub port: u16,
    pub driver: DbDriver,
}

impl Default for DbConfig {
    fn default() -> Self {
        DbConfig {
            host: "localhost".to_string(),
            user: String::new(),
            password: String::new(),
            database: "placement_db".to_string(),
            port: 3306,
            driver: DbDriver::Mysql,
        }
    }
}

impl DbConfig {
    /// Human-readable connection target (never includes the password)
    pub fn target(&self) -> String {
        match self.driver {
            DbDriver::Mysql => format!("mysql://{}@{}:{}/{}", self.user, self.host, self.port, self.database),
            DbDriver::Sqlite => format!("sqlite://{}", self.database),
        }
    }
}

// ============================================================================
// DASHBOARD CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub csv_path: PathBuf,
    pub output_dir: PathBuf,
    pub top_n: usize,
    pub salary_bins: usize,
    pub db: DbConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            csv_path: Path::new("data").join("sample_placements.csv"),
            output_dir: PathBuf::from("plots"),
            top_n: 6,
            salary_bins: 12,
            db: DbConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Parse a config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|source| DashboardError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve config: `$PLACEMENT_CONFIG`, then `./dashboard.json`, then defaults
    pub fn discover() -> Result<Self> {
        let explicit = std::env::var(CONFIG_ENV).ok();
        Self::discover_from(explicit.as_deref(), Path::new("."))
    }

    /// Same precedence as `discover`, with the explicit path and the lookup
    /// directory passed in. An explicit path must exist and parse.
    pub fn discover_from(explicit: Option<&str>, dir: &Path) -> Result<Self> {
        if let Some(explicit) = explicit {
            return Self::from_file(Path::new(explicit));
        }

        let local = dir.join(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::from_file(&local);
        }

        Ok(Self::default())
    }
}
