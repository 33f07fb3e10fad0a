// 🎨 Renderer - one PNG per summary, named <kind>_<year|all>.png
//
// Existing files are overwritten. An empty summary still produces an image
// with the title and a "No data" notice, so a run always writes every chart.

use crate::aggregate::{CrossTab, Histogram, LabelCount, LabelValue};
use crate::error::{DashboardError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;
use std::path::{Path, PathBuf};

const FONT: &str = "sans-serif";
const BAR_SIZE: (u32, u32) = (800, 500);
const PIE_SIZE: (u32, u32) = (600, 600);
const HEATMAP_SIZE: (u32, u32) = (1000, 600);

/// The five chart kinds; each maps to a fixed file stem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    PlacementsPerBranch,
    AvgPackagePerBranch,
    TopCompanies,
    SalaryDistribution,
    BranchCompanyHeatmap,
}

impl ChartKind {
    pub fn file_stem(&self) -> &'static str {
        match self {
            ChartKind::PlacementsPerBranch => "placements_per_branch",
            ChartKind::AvgPackagePerBranch => "avg_package_per_branch",
            ChartKind::TopCompanies => "top_companies",
            ChartKind::SalaryDistribution => "salary_distribution",
            ChartKind::BranchCompanyHeatmap => "heatmap_branch_company",
        }
    }
}

/// Deterministic output path: `dir/<kind>_<year|all>.png`
pub fn chart_path(dir: &Path, kind: ChartKind, year: Option<i32>) -> PathBuf {
    let suffix = year.map_or_else(|| "all".to_string(), |y| y.to_string());
    dir.join(format!("{}_{}.png", kind.file_stem(), suffix))
}

/// Title and axis labels for one chart
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartLabels {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl ChartLabels {
    /// Builds labels; the title gets a " - <year>" suffix when a year filter is set
    pub fn new(title: &str, year: Option<i32>, x_label: &str, y_label: &str) -> Self {
        let title = match year {
            Some(y) => format!("{title} - {y}"),
            None => title.to_string(),
        };
        ChartLabels {
            title,
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
        }
    }
}

fn render_error<E: std::fmt::Display>(path: &Path) -> impl Fn(E) -> DashboardError + '_ {
    move |e| DashboardError::Render {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

fn centered(size: u32) -> TextStyle<'static> {
    (FONT, size)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center))
}

/// Title plus a centred notice, for summaries with nothing to plot
fn draw_no_data(root: &Area<'_>, title: &str, path: &Path) -> Result<()> {
    let area = root.titled(title, (FONT, 28)).map_err(render_error(path))?;
    let (w, h) = area.dim_in_pixel();

    area.draw(&Text::new(
        "No data",
        (w as i32 / 2, h as i32 / 2),
        centered(24),
    ))
    .map_err(render_error(path))?;

    tracing::debug!(path = %path.display(), "summary empty, drew placeholder chart");
    Ok(())
}

// ============================================================================
// BAR CHART (counts and averages)
// ============================================================================

/// Vertical bar chart, one bar per label in the given order
pub fn render_bar_chart(
    kind: ChartKind,
    bars: &[LabelValue],
    labels: &ChartLabels,
    output_dir: &Path,
    year: Option<i32>,
) -> Result<PathBuf> {
    let path = chart_path(output_dir, kind, year);
    draw_bar_chart(&path, bars, labels)?;
    tracing::info!(path = %path.display(), "Saved chart");
    Ok(path)
}

fn draw_bar_chart(path: &Path, bars: &[LabelValue], labels: &ChartLabels) -> Result<()> {
    let root = BitMapBackend::new(path, BAR_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_error(path))?;

    if bars.is_empty() {
        draw_no_data(&root, &labels.title, path)?;
    } else {
        let y_max = bars.iter().map(|b| b.value).fold(0.0, f64::max);
        let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

        let mut chart = ChartBuilder::on(&root)
            .caption(&labels.title, (FONT, 28))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(70)
            .build_cartesian_2d((0..bars.len()).into_segmented(), 0f64..y_max)
            .map_err(render_error(path))?;

        let names: Vec<&str> = bars.iter().map(|b| b.label.as_str()).collect();
        let formatter = |v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(i) => names.get(*i).map(|s| s.to_string()).unwrap_or_default(),
            _ => String::new(),
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(bars.len() + 1)
            .x_label_formatter(&formatter)
            .x_desc(&labels.x_label)
            .y_desc(&labels.y_label)
            .label_style((FONT, 16))
            .axis_desc_style((FONT, 18))
            .draw()
            .map_err(render_error(path))?;

        chart
            .draw_series(
                plotters::series::Histogram::vertical(&chart)
                    .style(BLUE.mix(0.8).filled())
                    .margin(12)
                    .data(bars.iter().enumerate().map(|(i, b)| (i, b.value))),
            )
            .map_err(render_error(path))?;
    }

    root.present().map_err(render_error(path))
}

// ============================================================================
// PIE CHART (top-N shares)
// ============================================================================

fn wedge(center: (i32, i32), radius: f64, from: f64, to: f64) -> Vec<(i32, i32)> {
    let steps = (((to - from).to_degrees().abs()).ceil() as usize).max(2);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for step in 0..=steps {
        let angle = from + (to - from) * step as f64 / steps as f64;
        points.push(polar(center, radius, angle));
    }
    points
}

// Pixel y grows downward, so a positive angle runs counter-clockwise on screen
fn polar(center: (i32, i32), radius: f64, angle: f64) -> (i32, i32) {
    (
        center.0 + (radius * angle.cos()).round() as i32,
        center.1 - (radius * angle.sin()).round() as i32,
    )
}

/// Pie chart of each label's share, annotated with percentages
pub fn render_pie_chart(
    slices: &[LabelCount],
    labels: &ChartLabels,
    output_dir: &Path,
    year: Option<i32>,
) -> Result<PathBuf> {
    let path = chart_path(output_dir, ChartKind::TopCompanies, year);
    draw_pie_chart(&path, slices, labels)?;
    tracing::info!(path = %path.display(), "Saved chart");
    Ok(path)
}

fn draw_pie_chart(path: &Path, slices: &[LabelCount], labels: &ChartLabels) -> Result<()> {
    let root = BitMapBackend::new(path, PIE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_error(path))?;

    let total: usize = slices.iter().map(|s| s.count).sum();

    if total == 0 {
        draw_no_data(&root, &labels.title, path)?;
    } else {
        let area = root.titled(&labels.title, (FONT, 28)).map_err(render_error(path))?;
        let (w, h) = area.dim_in_pixel();
        let center = (w as i32 / 2, h as i32 / 2);
        let radius = f64::from(w.min(h)) * 0.33;

        let mut start = 0.0f64;
        for (i, slice) in slices.iter().enumerate() {
            let share = slice.count as f64 / total as f64;
            let end = start + share * std::f64::consts::TAU;
            let mid = (start + end) / 2.0;

            area.draw(&Polygon::new(
                wedge(center, radius, start, end),
                Palette99::pick(i).filled(),
            ))
            .map_err(render_error(path))?;

            area.draw(&Text::new(
                slice.label.clone(),
                polar(center, radius * 1.2, mid),
                centered(16),
            ))
            .map_err(render_error(path))?;

            area.draw(&Text::new(
                format!("{:.1}%", share * 100.0),
                polar(center, radius * 0.6, mid),
                centered(14),
            ))
            .map_err(render_error(path))?;

            start = end;
        }
    }

    root.present().map_err(render_error(path))
}

// ============================================================================
// HISTOGRAM (salary buckets)
// ============================================================================

pub fn render_histogram(
    hist: &Histogram,
    labels: &ChartLabels,
    output_dir: &Path,
    year: Option<i32>,
) -> Result<PathBuf> {
    let path = chart_path(output_dir, ChartKind::SalaryDistribution, year);
    draw_histogram(&path, hist, labels)?;
    tracing::info!(path = %path.display(), "Saved chart");
    Ok(path)
}

fn draw_histogram(path: &Path, hist: &Histogram, labels: &ChartLabels) -> Result<()> {
    let root = BitMapBackend::new(path, BAR_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_error(path))?;

    match (hist.bins.first(), hist.bins.last()) {
        (Some(first), Some(last)) => {
            let max_count = hist.bins.iter().map(|b| b.count).max().unwrap_or(0);
            let y_max = (max_count as f64 * 1.1).max(1.0);

            let mut chart = ChartBuilder::on(&root)
                .caption(&labels.title, (FONT, 28))
                .margin(20)
                .x_label_area_size(60)
                .y_label_area_size(70)
                .build_cartesian_2d(first.lower..last.upper, 0f64..y_max)
                .map_err(render_error(path))?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_desc(&labels.x_label)
                .y_desc(&labels.y_label)
                .y_label_formatter(&|v| format!("{:.0}", v))
                .label_style((FONT, 16))
                .axis_desc_style((FONT, 18))
                .draw()
                .map_err(render_error(path))?;

            chart
                .draw_series(hist.bins.iter().map(|b| {
                    Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], BLUE.mix(0.8).filled())
                }))
                .map_err(render_error(path))?;

            chart
                .draw_series(hist.bins.iter().map(|b| {
                    Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], WHITE.stroke_width(1))
                }))
                .map_err(render_error(path))?;
        }
        _ => draw_no_data(&root, &labels.title, path)?,
    }

    root.present().map_err(render_error(path))
}

// ============================================================================
// HEATMAP (branch × company matrix)
// ============================================================================

// Viridis control points, low → high
const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

/// Map t in [0, 1] onto the viridis ramp
pub fn colormap(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let idx = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - idx as f64;

    let (a, b) = (VIRIDIS[idx], VIRIDIS[idx + 1]);
    let lerp = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * frac).round() as u8;
    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

/// Colour-mapped matrix with row/column labels, cell counts and a colour bar
pub fn render_heatmap(
    tab: &CrossTab,
    labels: &ChartLabels,
    output_dir: &Path,
    year: Option<i32>,
) -> Result<PathBuf> {
    let path = chart_path(output_dir, ChartKind::BranchCompanyHeatmap, year);
    draw_heatmap(&path, tab, labels)?;
    tracing::info!(path = %path.display(), "Saved chart");
    Ok(path)
}

fn draw_heatmap(path: &Path, tab: &CrossTab, labels: &ChartLabels) -> Result<()> {
    let root = BitMapBackend::new(path, HEATMAP_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_error(path))?;

    if tab.is_empty() {
        draw_no_data(&root, &labels.title, path)?;
        return root.present().map_err(render_error(path));
    }

    let area = root.titled(&labels.title, (FONT, 28)).map_err(render_error(path))?;
    let (w, _) = area.dim_in_pixel();
    let (matrix, colorbar) = area.split_horizontally((w as i32 - 140).max(1));
    let (mw, mh) = matrix.dim_in_pixel();

    // Plot rectangle inside the matrix area, leaving room for tick labels
    let (x0, y0) = (140i32, 10i32);
    let (x1, y1) = (mw as i32 - 10, mh as i32 - 130);
    let cell_w = (x1 - x0) as f64 / tab.columns.len() as f64;
    let cell_h = (y1 - y0) as f64 / tab.rows.len() as f64;
    let max = tab.max_cell().max(1) as f64;

    for (r, row) in tab.cells.iter().enumerate() {
        for (c, &value) in row.iter().enumerate() {
            let left = x0 + (c as f64 * cell_w).round() as i32;
            let right = x0 + ((c + 1) as f64 * cell_w).round() as i32;
            let top = y0 + (r as f64 * cell_h).round() as i32;
            let bottom = y0 + ((r + 1) as f64 * cell_h).round() as i32;
            let t = value as f64 / max;

            matrix
                .draw(&Rectangle::new([(left, top), (right, bottom)], colormap(t).filled()))
                .map_err(render_error(path))?;

            let ink = if t > 0.6 { BLACK } else { WHITE };
            matrix
                .draw(&Text::new(
                    value.to_string(),
                    ((left + right) / 2, (top + bottom) / 2),
                    (FONT, 14).into_font().color(&ink).pos(Pos::new(HPos::Center, VPos::Center)),
                ))
                .map_err(render_error(path))?;
        }
    }

    let row_style = (FONT, 15)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Center));
    for (r, name) in tab.rows.iter().enumerate() {
        let y = y0 + ((r as f64 + 0.5) * cell_h).round() as i32;
        matrix
            .draw(&Text::new(name.clone(), (x0 - 8, y), row_style.clone()))
            .map_err(render_error(path))?;
    }

    let column_style = (FONT, 15)
        .into_font()
        .transform(FontTransform::Rotate90)
        .color(&BLACK);
    for (c, name) in tab.columns.iter().enumerate() {
        let x = x0 + ((c as f64 + 0.5) * cell_w).round() as i32;
        matrix
            .draw(&Text::new(name.clone(), (x + 8, y1 + 8), column_style.clone()))
            .map_err(render_error(path))?;
    }

    draw_colorbar(&colorbar, tab.max_cell(), &labels.y_label, path)?;

    root.present().map_err(render_error(path))
}

fn draw_colorbar(area: &Area<'_>, max: usize, label: &str, path: &Path) -> Result<()> {
    let (_, h) = area.dim_in_pixel();
    let (left, right) = (20i32, 45i32);
    let (top, bottom) = (10i32, h as i32 - 130);
    let steps = 100;

    for step in 0..steps {
        let t = 1.0 - step as f64 / steps as f64;
        let y_from = top + (bottom - top) * step / steps;
        let y_to = top + (bottom - top) * (step + 1) / steps;
        area.draw(&Rectangle::new([(left, y_from), (right, y_to)], colormap(t).filled()))
            .map_err(render_error(path))?;
    }

    let tick_style = (FONT, 14)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    for (value, y) in [(max, top), (0, bottom)] {
        area.draw(&Text::new(value.to_string(), (right + 6, y), tick_style.clone()))
            .map_err(render_error(path))?;
    }

    let label_style = (FONT, 15)
        .into_font()
        .transform(FontTransform::Rotate90)
        .color(&BLACK);
    area.draw(&Text::new(label.to_string(), (right + 60, top), label_style))
        .map_err(render_error(path))?;

    Ok(())
}
