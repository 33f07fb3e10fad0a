use anyhow::{bail, Context, Result};
use std::env;

use placement_dashboard::{logging, run, DashboardConfig, SourceMode};

const USAGE: &str = "\
Placement Data Analytics Dashboard

Usage:
    placement-dashboard [--mode file|query] [--year YEAR]

Options:
    --mode   'file' reads the CSV at csv_path (default);
             'query' joins the student/branch/company/placement tables
    --year   only chart offers made in this year (default: all years)

Configuration is read from $PLACEMENT_CONFIG or ./dashboard.json when present.";

#[derive(Debug, PartialEq)]
struct CliArgs {
    mode: SourceMode,
    year: Option<i32>,
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    let Some(cli) = parse_args(&args)? else {
        println!("{USAGE}");
        return Ok(());
    };

    logging::init_tracing();

    let config = DashboardConfig::discover().context("Failed to load configuration")?;

    let report = run(&config, cli.mode, cli.year)
        .with_context(|| format!("Dashboard run failed in {} mode", cli.mode))?;

    println!("✓ Loaded {} placement rows (offers)", report.rows_loaded);
    if cli.year.is_some() {
        println!("✓ {} rows after year filter", report.rows_after_filter);
    }
    for chart in &report.charts {
        println!("  Saved {}", chart.display());
    }
    println!("✅ All plots are saved in {}", report.output_dir.display());

    Ok(())
}

/// Returns None when help was requested
fn parse_args(args: &[String]) -> Result<Option<CliArgs>> {
    let mut cli = CliArgs {
        mode: SourceMode::default(),
        year: None,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) => (flag, Some(value.to_string())),
            None => (arg.as_str(), None),
        };

        match flag {
            "-h" | "--help" => return Ok(None),
            "--mode" | "--year" => {
                let value = match inline {
                    Some(value) => value,
                    None => iter
                        .next()
                        .cloned()
                        .with_context(|| format!("{flag} requires a value"))?,
                };

                if flag == "--mode" {
                    cli.mode = value.parse()?;
                } else {
                    cli.year = Some(
                        value
                            .parse()
                            .with_context(|| format!("--year expects an integer, got '{value}'"))?,
                    );
                }
            }
            other => bail!("unrecognized argument '{other}'\n\n{USAGE}"),
        }
    }

    Ok(Some(cli))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let cli = parse_args(&[]).unwrap().unwrap();
        assert_eq!(cli, CliArgs { mode: SourceMode::File, year: None });
    }

    #[test]
    fn test_mode_and_year() {
        let cli = parse_args(&args(&["--mode", "query", "--year", "2025"])).unwrap().unwrap();
        assert_eq!(cli, CliArgs { mode: SourceMode::Query, year: Some(2025) });

        let cli = parse_args(&args(&["--mode=csv", "--year=2024"])).unwrap().unwrap();
        assert_eq!(cli, CliArgs { mode: SourceMode::File, year: Some(2024) });
    }

    #[test]
    fn test_invalid_mode_rejected() {
        let err = parse_args(&args(&["--mode", "excel"])).unwrap_err();
        assert!(err.to_string().contains("unsupported mode"));
    }

    #[test]
    fn test_bad_year_and_missing_value() {
        assert!(parse_args(&args(&["--year", "soon"])).is_err());
        assert!(parse_args(&args(&["--year"])).is_err());
        assert!(parse_args(&args(&["--verbose"])).is_err());
    }

    #[test]
    fn test_help() {
        assert_eq!(parse_args(&args(&["--help"])).unwrap(), None);
    }
}
