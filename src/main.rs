use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use jobmail_tracker::{
    Config, DateRange, DirectoryMailbox, MessageFilter, Processor, RunReport, append_failures,
    failure_log_path, report_path, save_records,
};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "jobmail-tracker")]
#[command(about = "Track LinkedIn job applications from notification emails")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process the mailbox and write the application report
    Run {
        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory with one sub-directory of .eml files per label
        #[arg(short, long)]
        mailbox: Option<PathBuf>,

        /// Directory receiving the report and failure log
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Date range (all, 24h, 7d, 30d, 90d, 1y, or YYYY-MM-DD:YYYY-MM-DD)
        #[arg(short, long)]
        date_range: Option<String>,

        /// Skip messages dated before this year (0 disables)
        #[arg(long)]
        min_year: Option<i32>,

        /// Also append log output to this file
        #[arg(long)]
        log_file: Option<PathBuf>,

        /// Print run statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// List available date ranges
    Ranges,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            mailbox,
            output_dir,
            date_range,
            min_year,
            log_file,
            json,
        } => {
            let mut config = match config {
                Some(path) => Config::load(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => Config::default(),
            };
            if let Some(mailbox) = mailbox {
                config.mailbox_root = mailbox;
            }
            if let Some(output_dir) = output_dir {
                config.output_dir = output_dir;
            }
            if let Some(date_range) = date_range {
                config.date_range = date_range;
            }
            if min_year.is_some() {
                config.min_year = min_year;
            }
            if log_file.is_some() {
                config.log_file = log_file;
            }

            init_logging(config.log_file.as_deref())?;
            run(&config, json)
        }
        Commands::Ranges => {
            println!("Available date ranges:");
            for (code, description) in DateRange::available() {
                println!("  {code:8} - {description}");
            }
            Ok(())
        }
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    Ok(())
}

fn run(config: &Config, json: bool) -> Result<()> {
    let range = config.date_range()?;
    let filter = MessageFilter {
        range,
        min_year: config.min_year(),
        today: Local::now().date_naive(),
    };
    info!("Date range: {}", range);
    info!("Mailbox: {}", config.mailbox_root.display());

    let mut mailbox = DirectoryMailbox::new(&config.mailbox_root);
    let report = Processor::new(config.labels.clone(), filter)
        .run(&mut mailbox)
        .context("Processing mailbox failed")?;

    let now = Local::now().naive_local();
    let report_file = report_path(&config.output_dir, &range, now);
    save_records(&report_file, &report.records)
        .with_context(|| format!("Failed to write {}", report_file.display()))?;

    let failure_file = if report.failures.is_empty() {
        None
    } else {
        let path = failure_log_path(&config.output_dir, now);
        append_failures(&path, &report.failures)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Some(path)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report.stats)?);
    } else {
        print_summary(&report, &report_file, failure_file.as_deref());
    }
    Ok(())
}

fn print_summary(report: &RunReport, report_file: &Path, failure_file: Option<&Path>) {
    for label in &report.stats.labels {
        println!(
            "{}: {} fetched, {} parsed, {} skipped, {} failed",
            label.label, label.fetched, label.parsed, label.skipped, label.failed
        );
    }
    println!(
        "{} applications ({} upgraded, {} without an Applied record)",
        report.stats.records, report.stats.upgraded, report.stats.created
    );
    println!("Report: {}", report_file.display());
    if let Some(path) = failure_file {
        println!(
            "{} non-critical errors logged to {}",
            report.failures.len(),
            path.display()
        );
    }
}
