mod cache;
mod config;
mod dashboard;
mod error;
mod interactive;
mod logging;
mod occupancy;
mod utils;

use anyhow::{anyhow, Result};
use chrono::prelude::*;
use clap::{Args, Parser, Subcommand};
use rand::seq::SliceRandom;
use serde_json::json;
use std::process;

use cache::ProjectCache;
use config::Config;
use dashboard::{DashboardClient, ProjectRecord};
use occupancy::{FilterCriteria, ProjectInterval, WeekBucket};
use utils::Timer;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(name = "bezetting")]
#[command(about = "Weekly crew-occupancy overview for infrastructure projects", long_about = None)]
#[command(version, long_version = LONG_VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Filter flags shared by the overview and week commands; every flag maps
/// onto one optional criterion, unset flags impose no constraint
#[derive(Args, Debug, Clone, Default)]
struct FilterArgs {
    /// Free-text search against name, id, location and manager
    #[arg(short, long)]
    search: Option<String>,

    /// Exact project status, e.g. "In uitvoering"
    #[arg(long)]
    status: Option<String>,

    /// Exact organization name, or "none" for projects without one
    #[arg(long)]
    organization: Option<String>,

    /// Exact project manager name
    #[arg(long)]
    manager: Option<String>,

    /// Exact location
    #[arg(long)]
    location: Option<String>,

    /// Exact category
    #[arg(long)]
    category: Option<String>,

    /// Exact discipline
    #[arg(long)]
    discipline: Option<String>,
}

impl FilterArgs {
    fn to_criteria(&self) -> FilterCriteria {
        // Blank flag values behave like unset flags
        let clean = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        FilterCriteria {
            search: clean(&self.search),
            status: clean(&self.status),
            organization: clean(&self.organization),
            manager: clean(&self.manager),
            location: clean(&self.location),
            category: clean(&self.category),
            discipline: clean(&self.discipline),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the weekly occupancy overview for a date range
    Overview {
        /// Range start (YYYY-MM-DD, YYYY.MM.DD, or YYYY/MM/DD; default: 4 weeks back)
        #[arg(long)]
        from: Option<String>,

        /// Range end (default: 8 weeks ahead)
        #[arg(long)]
        to: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,

        /// Emit buckets and summary as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Use the locally cached project list, skip the network
        #[arg(long)]
        offline: bool,

        /// Verbose output
        #[arg(short = 'v', long)]
        verbose: bool,
    },
    /// Drill down into the projects active during one week
    Week {
        /// Any date inside the week of interest (default: today)
        #[arg(short = 'D', long)]
        date: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,

        /// Emit the contributing projects as JSON
        #[arg(long)]
        json: bool,

        /// Use the locally cached project list, skip the network
        #[arg(long)]
        offline: bool,

        /// Verbose output
        #[arg(short = 'v', long)]
        verbose: bool,
    },
    /// Open the interactive occupancy browser
    Interactive,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(_) => (),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Overview {
            from,
            to,
            filters,
            json,
            offline,
            verbose,
        }) => {
            logging::init();
            let (range_start, range_end) = resolve_range(&from, &to)?;
            let records = load_projects(offline, verbose).await?;
            let projects = dashboard::to_intervals(&records);
            let criteria = filters.to_criteria();

            let buckets = occupancy::compute_occupancy(&projects, &criteria, range_start, range_end);
            let summary = occupancy::summarize(&buckets);
            let filtered = occupancy::filter_projects(&projects, &criteria);

            if json {
                let payload = json!({
                    "rangeStart": range_start,
                    "rangeEnd": range_end,
                    "buckets": buckets,
                    "summary": summary,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                display_overview(
                    &buckets,
                    &summary,
                    filtered.len(),
                    projects.len(),
                    range_start,
                    range_end,
                );
            }
        }
        Some(Commands::Week {
            date,
            filters,
            json,
            offline,
            verbose,
        }) => {
            logging::init();
            let target = resolve_date(&date)?;
            let records = load_projects(offline, verbose).await?;
            let projects = dashboard::to_intervals(&records);
            let criteria = filters.to_criteria();

            // A single-day range produces exactly the bucket containing it
            let buckets = occupancy::week_buckets(target, target);
            let bucket = buckets
                .into_iter()
                .next()
                .ok_or_else(|| anyhow!("No week bucket for {}", target))?;
            let contributing = occupancy::projects_in_week(&projects, &criteria, &bucket);

            if json {
                let payload = json!({
                    "week": bucket,
                    "projects": contributing,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                display_week_detail(&bucket, &contributing);
            }
        }
        Some(Commands::Interactive) => {
            // File logging only: stdout belongs to the alternate screen now
            if let Err(e) = logging::init_with_file("bezetting.log") {
                eprintln!("Warning: file logging unavailable: {}", e);
            }
            interactive::run_interactive().await?;
        }
        None => {
            println!("No command specified. Use --help for available commands.");
        }
    }

    Ok(())
}

/// Load the dashboard configuration, walking through first-run setup when
/// there is none yet
async fn load_or_setup_config(verbose: bool) -> Result<Config> {
    match Config::load() {
        Ok(config) => {
            if verbose {
                println!(
                    "Using dashboard {} with API key {}",
                    config.base_url,
                    utils::mask_api_key(&config.api_key)
                );
            }
            Ok(config)
        }
        Err(_) => {
            println!("No dashboard configuration found. Let's set one up!");
            let base_url = Config::prompt_for_base_url();
            if base_url.is_empty() {
                return Err(anyhow!("Base URL cannot be empty"));
            }

            let api_key = Config::prompt_for_api_key();
            if api_key.is_empty() {
                return Err(anyhow!("API key cannot be empty"));
            }

            let config = Config::new(base_url, api_key);

            // Test the credentials before saving
            println!("Testing connection to the dashboard...");
            let client = DashboardClient::new(config.base_url.clone(), config.api_key.clone());
            match client.test_connection().await {
                Ok(_) => {
                    config.save()?;
                    println!("Credentials validated and saved successfully!");
                    Ok(config)
                }
                Err(e) => Err(anyhow!(
                    "Failed to validate credentials: {}. Please check the URL and API key and try again.",
                    e
                )),
            }
        }
    }
}

/// Fetch the project register, or serve it from the local cache
async fn load_projects(offline: bool, verbose: bool) -> Result<Vec<ProjectRecord>> {
    if offline {
        let cache = ProjectCache::load()?;
        if cache.projects.is_empty() {
            return Err(anyhow!(
                "No cached project list yet. Run once without --offline first."
            ));
        }
        if cache.is_stale(24) {
            println!("Note: cached project list is older than a day.");
        }
        tracing::info!(count = cache.projects.len(), "Serving projects from cache");
        return Ok(cache.projects);
    }

    let config = load_or_setup_config(verbose).await?;
    let client = DashboardClient::new(config.base_url, config.api_key);

    let messages = [
        "Fetching the project register... time for a quick stretch 🏗️",
        "Talking to the dashboard... one moment 🚧",
        "Collecting projects... almost there ⛏️",
    ];
    let message = {
        let mut rng = rand::thread_rng();
        *messages.choose(&mut rng).unwrap_or(&messages[0])
    };
    println!("{}", message);

    let timer = Timer::new("Fetching projects");
    let records = client.get_projects_verbose(verbose).await?;
    if verbose {
        println!("{}", timer.stop_with_message());
    }
    tracing::info!(count = records.len(), "Fetched project register");

    // Refresh the offline snapshot; a failed write is not fatal
    let mut cache = ProjectCache::load().unwrap_or_default();
    cache.update(records.clone());
    if let Err(e) = cache.save() {
        tracing::warn!("Failed to update project cache: {}", e);
    }

    Ok(records)
}

/// Parse --from/--to, falling back to the default window around today
fn resolve_range(from: &Option<String>, to: &Option<String>) -> Result<(NaiveDate, NaiveDate)> {
    let (default_start, default_end) = utils::default_view_range(Local::now().naive_local().date());

    let range_start = match from {
        Some(s) => parse_date_arg(s)?,
        None => default_start,
    };
    let range_end = match to {
        Some(s) => parse_date_arg(s)?,
        None => default_end,
    };

    // A reversed range is not an error: the overview just comes out empty
    Ok((range_start, range_end))
}

fn resolve_date(date: &Option<String>) -> Result<NaiveDate> {
    match date {
        Some(s) => parse_date_arg(s),
        None => Ok(Local::now().naive_local().date()),
    }
}

fn parse_date_arg(s: &str) -> Result<NaiveDate> {
    utils::validate_date(s)?;
    utils::parse_date(s).ok_or_else(|| anyhow!("Invalid date: {}", s))
}

/// Print the occupancy overview as a table with scaled bars
fn display_overview(
    buckets: &[WeekBucket],
    summary: &occupancy::OccupancySummary,
    filtered_count: usize,
    total_count: usize,
    range_start: NaiveDate,
    range_end: NaiveDate,
) {
    println!(
        "\n=== CREW OCCUPANCY {} to {} ===",
        range_start.format("%Y-%m-%d"),
        range_end.format("%Y-%m-%d")
    );
    println!("Projects: {} of {} after filtering", filtered_count, total_count);

    if buckets.is_empty() {
        println!("\nNo weeks in range (is the range reversed?)");
        return;
    }

    println!();
    for bucket in buckets {
        let bar = utils::create_occupancy_bar(bucket.occupancy, summary.max_occupancy, 30);
        println!(
            "{:<9} {:<24} {:<30} {:>3}",
            bucket.label(),
            utils::format_week_range(bucket),
            bar,
            bucket.occupancy
        );
    }

    let peak = buckets.iter().map(|b| b.occupancy).max().unwrap_or(0);
    println!("{}", "-".repeat(70));
    println!(
        "Average: {} | Peak: {} | Axis max: {}",
        utils::format_avg_occupancy(summary.avg_occupancy),
        peak,
        summary.max_occupancy
    );
    println!("\nFound {} weeks in range", buckets.len());
}

/// Print the drill-down list for one week
fn display_week_detail(bucket: &WeekBucket, projects: &[ProjectInterval]) {
    println!(
        "\n=== PROJECTS ACTIVE IN {} ({}) ===",
        bucket.label(),
        utils::format_week_range(bucket)
    );

    if projects.is_empty() {
        println!("\nNo projects active in this week.");
        return;
    }

    println!(
        "\n{:<28} {:<16} {:<18} {:<14} {:<12} {:<12}",
        "Name", "Status", "Manager", "Location", "Start", "End"
    );
    println!("{}", "-".repeat(104));

    for project in projects {
        let fmt_date = |d: Option<NaiveDate>| {
            d.map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string())
        };
        println!(
            "{:<28} {:<16} {:<18} {:<14} {:<12} {:<12}",
            utils::truncate_string(project.name.as_deref().unwrap_or("(unnamed)"), 26),
            utils::truncate_string(project.status.as_deref().unwrap_or("-"), 14),
            utils::truncate_string(project.manager.as_deref().unwrap_or("-"), 16),
            utils::truncate_string(project.location.as_deref().unwrap_or("-"), 12),
            fmt_date(project.start),
            fmt_date(project.end),
        );
    }

    println!("{}", "-".repeat(104));
    println!("{} crews deployed this week", projects.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_overview() {
        let result = Cli::try_parse_from([
            "bezetting",
            "overview",
            "--from",
            "2026-01-05",
            "--to",
            "2026-03-01",
            "--status",
            "In uitvoering",
        ]);
        assert!(result.is_ok());

        let cli = result.unwrap();
        match cli.command {
            Some(Commands::Overview { from, to, filters, .. }) => {
                assert_eq!(from, Some("2026-01-05".to_string()));
                assert_eq!(to, Some("2026-03-01".to_string()));
                assert_eq!(filters.status, Some("In uitvoering".to_string()));
            }
            _ => panic!("Expected Overview command"),
        }
    }

    #[test]
    fn test_cli_parsing_week() {
        let result = Cli::try_parse_from(["bezetting", "week", "-D", "2026-02-11", "--json"]);
        assert!(result.is_ok());

        let cli = result.unwrap();
        match cli.command {
            Some(Commands::Week { date, json, .. }) => {
                assert_eq!(date, Some("2026-02-11".to_string()));
                assert!(json);
            }
            _ => panic!("Expected Week command"),
        }
    }

    #[test]
    fn test_filter_args_to_criteria() {
        let args = FilterArgs {
            search: Some("  sluis ".to_string()),
            status: Some("".to_string()),
            organization: Some("none".to_string()),
            ..FilterArgs::default()
        };
        let criteria = args.to_criteria();
        assert_eq!(criteria.search, Some("sluis".to_string()));
        // Blank flags behave like unset flags
        assert_eq!(criteria.status, None);
        assert_eq!(criteria.organization, Some("none".to_string()));
        assert_eq!(criteria.manager, None);
    }

    #[test]
    fn test_parse_date_arg() {
        assert!(parse_date_arg("2026-03-12").is_ok());
        assert!(parse_date_arg("2026.03.12").is_ok());
        assert!(parse_date_arg("12-03-2026").is_err());
        assert!(parse_date_arg("garbage").is_err());
    }

    #[test]
    fn test_resolve_range_allows_reversed_input() {
        let (start, end) = resolve_range(
            &Some("2026-06-10".to_string()),
            &Some("2026-06-01".to_string()),
        )
        .unwrap();
        assert!(start > end);
        // Downstream this yields an empty overview, not an error
        assert!(occupancy::week_buckets(start, end).is_empty());
    }

    #[test]
    fn test_display_functions_do_not_panic() {
        let buckets = occupancy::week_buckets(
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 25).unwrap(),
        );
        let summary = occupancy::summarize(&buckets);
        display_overview(
            &buckets,
            &summary,
            0,
            0,
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 25).unwrap(),
        );

        display_week_detail(&buckets[0], &[]);
    }
}
