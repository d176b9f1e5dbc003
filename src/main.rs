// src/main.rs

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use captrack_core::insights::{self, SortConfig, SortDirection, SortKey};
use captrack_core::{config, dates, load, report, store};

#[derive(Parser)]
#[command(
    name = "captrack",
    about = "Employee capacity declarations and team load reporting"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Team capacity table over the rolling 4-week horizon
    Dashboard {
        /// Horizon week to focus, 1-4 (default 1)
        #[arg(long)]
        week: Option<usize>,
        /// Sort column: employee|office|availability|week1..week4|category1|category2|projects
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending instead of ascending
        #[arg(long)]
        desc: bool,
    },
    /// Capacity snapshot: bucket counts, busiest people, top matters
    Insights {
        /// Horizon week to focus, 1-4 (default 1)
        #[arg(long)]
        week: Option<usize>,
    },
    /// Latest declaration on record for one employee
    Profile { name: String },
    /// Export the dashboard table as CSV
    Export {
        #[arg(long)]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Setting tracing subscriber failed")?;

    let cli = Cli::parse();
    let config = config::load()?;
    let store = store::EntryStore::open(&config.store_path);

    match cli.command {
        Command::Dashboard { week, sort, desc } => {
            let active_week = resolve_week(week)?;
            let sort = parse_sort(sort.as_deref(), desc)?;
            let mut rows = load::dashboard_rows(load::latest_entries(store.entries()));
            insights::sort_rows(&mut rows, sort, active_week);
            println!(
                "{}",
                report::render_dashboard(&rows, dates::current_week_start(), active_week)
            );
        }
        Command::Insights { week } => {
            let active_week = resolve_week(week)?;
            let rows = load::dashboard_rows(load::latest_entries(store.entries()));
            let insights = insights::week_insights(&rows, active_week);
            let summaries = insights::weekly_summaries(&rows);
            println!(
                "{}",
                report::render_insights(
                    &insights,
                    &summaries,
                    dates::current_week_start(),
                    active_week
                )
            );
        }
        Command::Profile { name } => match load::latest_entry_for(&name, store.entries()) {
            Some(entry) => println!("{}", report::render_profile(entry)),
            None => println!("No declaration on record for '{}'", name),
        },
        Command::Export { out } => {
            let mut rows = load::dashboard_rows(load::latest_entries(store.entries()));
            insights::sort_rows(&mut rows, None, 0);
            report::write_dashboard_csv(&rows, &out)?;
            info!("Exported {} rows to {}", rows.len(), out.display());
        }
    }

    Ok(())
}

fn resolve_week(week: Option<usize>) -> Result<usize> {
    match week {
        None => Ok(0),
        Some(n @ 1..=4) => Ok(n - 1),
        Some(other) => bail!("Week must be between 1 and 4, got {}", other),
    }
}

fn parse_sort(key: Option<&str>, desc: bool) -> Result<Option<SortConfig>> {
    let Some(raw) = key else {
        return Ok(None);
    };
    let key = match raw {
        "employee" => SortKey::EmployeeName,
        "office" => SortKey::Office,
        "availability" => SortKey::Availability,
        "week1" => SortKey::WeekLoad(0),
        "week2" => SortKey::WeekLoad(1),
        "week3" => SortKey::WeekLoad(2),
        "week4" => SortKey::WeekLoad(3),
        "category1" => SortKey::Category1Total,
        "category2" => SortKey::Category2Total,
        "projects" => SortKey::ProjectTotal,
        other => bail!("Unknown sort column '{}'", other),
    };
    let direction = if desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    Ok(Some(SortConfig { key, direction }))
}
