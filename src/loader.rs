// 📂 Data Loader - flat file or relational source → in-memory offer table

use crate::config::DashboardConfig;
use crate::db;
use crate::error::{DashboardError, Result};
use crate::record::{OfferTable, RawOffer};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Where the offer table comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMode {
    /// Delimited text file with a header row
    #[default]
    File,
    /// Four-table join through the configured database driver
    Query,
}

impl FromStr for SourceMode {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "csv" => Ok(SourceMode::File),
            "query" | "mysql" | "sql" => Ok(SourceMode::Query),
            _ => Err(DashboardError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceMode::File => write!(f, "file"),
            SourceMode::Query => write!(f, "query"),
        }
    }
}

/// Load the full offer table for the selected source
pub fn load(mode: SourceMode, config: &DashboardConfig) -> Result<OfferTable> {
    match mode {
        SourceMode::File => load_csv(&config.csv_path),
        SourceMode::Query => db::load_query(&config.db),
    }
}

/// Read offer records from a CSV file with a header row.
///
/// Columns are matched by name; unknown columns are ignored.
pub fn load_csv(csv_path: &Path) -> Result<OfferTable> {
    if !csv_path.exists() {
        return Err(DashboardError::InputNotFound {
            path: csv_path.to_path_buf(),
        });
    }

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(csv_path)?;

    let mut offers = Vec::new();

    for (i, result) in rdr.deserialize::<RawOffer>().enumerate() {
        offers.push(result?.into_record(i + 1)?);
    }

    Ok(offers)
}
