// Placement Dashboard - Core Library
// Exposes all modules for use in the CLI and tests

pub mod error;
pub mod config;
pub mod logging;
pub mod record;
pub mod db;
pub mod loader;
pub mod filter;
pub mod aggregate;
pub mod render;
pub mod pipeline;

// Re-export commonly used types
pub use error::{DashboardError, Result};
pub use config::{DashboardConfig, DbConfig, DbDriver};
pub use record::{OfferRecord, OfferTable, RawOffer, parse_offer_date};
pub use loader::{SourceMode, load, load_csv};
pub use db::{load_query, load_from_sqlite};
pub use filter::filter_by_year;
pub use aggregate::{
    CrossTab, Histogram, Bin, LabelCount, LabelValue,
    placements_per_branch, avg_package_per_branch, top_companies,
    salary_distribution, branch_company_crosstab,
    DEFAULT_TOP_N, DEFAULT_SALARY_BINS,
};
pub use render::{ChartKind, ChartLabels, chart_path};
pub use pipeline::{RunReport, run};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
