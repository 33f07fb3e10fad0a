// 🚀 Orchestrator - load → filter → five aggregate/render pairs
//
// Linear and fail-fast: the first error aborts the run, nothing is retried,
// and there is no partial-success state to resume from.

use crate::aggregate::{self, LabelValue};
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::filter::filter_by_year;
use crate::loader::{self, SourceMode};
use crate::record::OfferRecord;
use crate::render::{self, ChartKind, ChartLabels};
use std::path::{Path, PathBuf};

/// What a completed run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub rows_loaded: usize,
    pub rows_after_filter: usize,
    /// Written chart paths, in render order
    pub charts: Vec<PathBuf>,
    pub output_dir: PathBuf,
}

/// Run the whole dashboard for one source mode and optional year
pub fn run(config: &DashboardConfig, mode: SourceMode, year: Option<i32>) -> Result<RunReport> {
    std::fs::create_dir_all(&config.output_dir)?;

    let table = loader::load(mode, config)?;
    let rows_loaded = table.len();
    tracing::info!(rows = rows_loaded, %mode, "Loaded placement rows (offers)");

    let table = filter_by_year(table, year);
    if let Some(year) = year {
        tracing::info!(rows = table.len(), year, "Filtered by offer year");
    }

    let charts = render_all(&table, config, year)?;

    let output_dir = config
        .output_dir
        .canonicalize()
        .unwrap_or_else(|_| config.output_dir.clone());
    tracing::info!(dir = %output_dir.display(), "All plots are saved");

    Ok(RunReport {
        rows_loaded,
        rows_after_filter: table.len(),
        charts,
        output_dir,
    })
}

/// Aggregate and render every chart for an already-filtered table
pub fn render_all(
    table: &[OfferRecord],
    config: &DashboardConfig,
    year: Option<i32>,
) -> Result<Vec<PathBuf>> {
    let dir: &Path = &config.output_dir;
    let mut charts = Vec::with_capacity(5);

    let per_branch = aggregate::placements_per_branch(table);
    tracing::debug!(groups = per_branch.len(), "placements per branch");
    charts.push(render::render_bar_chart(
        ChartKind::PlacementsPerBranch,
        &per_branch.iter().map(LabelValue::from).collect::<Vec<_>>(),
        &ChartLabels::new("Students Placed per Branch", year, "Branch", "Number of students placed"),
        dir,
        year,
    )?);

    let avg_package = aggregate::avg_package_per_branch(table);
    tracing::debug!(groups = avg_package.len(), "average package per branch");
    charts.push(render::render_bar_chart(
        ChartKind::AvgPackagePerBranch,
        &avg_package,
        &ChartLabels::new("Average Package (LPA) per Branch", year, "Branch", "Average Package (LPA)"),
        dir,
        year,
    )?);

    let top = aggregate::top_companies(table, config.top_n);
    tracing::debug!(companies = top.len(), n = config.top_n, "top companies");
    charts.push(render::render_pie_chart(
        &top,
        &ChartLabels::new(&format!("Top {} Companies by Offers", config.top_n), year, "", ""),
        dir,
        year,
    )?);

    let salaries = aggregate::salary_distribution(table, config.salary_bins);
    tracing::debug!(bins = salaries.bins.len(), values = salaries.total(), "salary distribution");
    charts.push(render::render_histogram(
        &salaries,
        &ChartLabels::new("Salary Distribution (LPA)", year, "Package (LPA)", "Count"),
        dir,
        year,
    )?);

    let crosstab = aggregate::branch_company_crosstab(table);
    tracing::debug!(
        branches = crosstab.rows.len(),
        companies = crosstab.columns.len(),
        "branch x company cross-tab"
    );
    charts.push(render::render_heatmap(
        &crosstab,
        &ChartLabels::new("Branches vs Companies heatmap", year, "Company", "Number of students placed"),
        dir,
        year,
    )?);

    Ok(charts)
}
