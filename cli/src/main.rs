//! Promotion projection command line
//!
//! Runs projections from the source CSV files, serves the HTTP API, and
//! prints stored predictions.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use promotion_projection_core::models::event::iso_date;
use promotion_projection_core::reports;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod pipeline;
mod server;

use pipeline::{run_and_persist, Sources};

#[derive(Parser, Debug)]
#[command(name = "promotion-cli")]
#[command(
    version,
    about = "Project promotions and retirements over a post hierarchy",
    long_about = None
)]
struct Cli {
    /// SQLite prediction store
    #[arg(long, env = "PROMOTION_DB", default_value = "Promotion.db", global = true)]
    db: PathBuf,

    /// Employee roster CSV
    #[arg(long, env = "PROMOTION_EMPLOYEES_CSV", default_value = "EmpList.csv", global = true)]
    employees_csv: PathBuf,

    /// Post catalog CSV
    #[arg(
        long,
        env = "PROMOTION_POSTS_CSV",
        default_value = "Final_Complete_Master_List.csv",
        global = true
    )]
    posts_csv: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load the CSV files, run a full projection and replace stored predictions
    Run,

    /// Serve the HTTP API
    Serve {
        /// Listen address
        #[arg(long, env = "PROMOTION_ADDR", default_value = "127.0.0.1:5000")]
        addr: SocketAddr,
    },

    /// Print one employee's projected career
    Show {
        emp_id: String,

        /// Only steps on or before this date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date)]
        until: Option<NaiveDate>,
    },

    /// Print promotions per year
    Yearly,
}

fn parse_iso_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, iso_date::FORMAT)
        .map_err(|_| format!("invalid date {raw:?}, expected YYYY-MM-DD"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let sources = Sources {
        employees_csv: cli.employees_csv,
        posts_csv: cli.posts_csv,
        db: cli.db,
    };

    match cli.command {
        Commands::Run => run(&sources),
        Commands::Serve { addr } => tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("Failed to build tokio runtime")?
            .block_on(server::serve(addr, sources))
            .with_context(|| format!("server on {addr} failed")),
        Commands::Show { emp_id, until } => show(&sources, &emp_id, until),
        Commands::Yearly => yearly(&sources),
    }
}

fn run(sources: &Sources) -> Result<()> {
    let outcome = run_and_persist(sources).context("projection run failed")?;
    let manifest = &outcome.manifest;

    println!("run_id:          {}", manifest.run_id);
    println!("years:           {}..={}", manifest.start_year, manifest.end_year);
    println!("events:          {}", manifest.num_events);
    println!("promotions:      {}", manifest.num_promotions);
    println!("retirements:     {}", manifest.num_retirements);
    println!("pre-horizon:     {}", manifest.num_pre_horizon_retirements);
    println!("unassigned:      {}", manifest.num_unassigned);
    println!("events digest:   {}", manifest.events_digest);
    println!("stored in:       {}", sources.db.display());
    Ok(())
}

fn show(sources: &Sources, emp_id: &str, until: Option<NaiveDate>) -> Result<()> {
    let store = sources
        .open_store()
        .with_context(|| format!("cannot open {}", sources.db.display()))?;
    let events = store.events_for(emp_id).context("failed to read predictions")?;
    let report = reports::promotion_report(&events, emp_id, until);

    let Some(name) = report.employee_name.as_deref() else {
        anyhow::bail!("no predictions stored for employee {emp_id}");
    };
    println!("{emp_id} {name}");
    for step in &report.promotion_path {
        println!(
            "  {:>2}. {}  {:>7} -> {:<7}  {}",
            step.step,
            step.predicted_date.format(iso_date::FORMAT),
            step.from_grade.to_string(),
            step.to_grade.to_string(),
            step.new_designation
        );
    }
    println!("promotions: {}", report.total_promotions);
    Ok(())
}

fn yearly(sources: &Sources) -> Result<()> {
    let store = sources
        .open_store()
        .with_context(|| format!("cannot open {}", sources.db.display()))?;
    let counts = store.promotions_per_year().context("failed to count promotions")?;
    for count in counts {
        println!("{}  {}", count.year, count.count);
    }
    Ok(())
}
