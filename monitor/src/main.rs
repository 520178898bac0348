//! CLI entry point for the vertex IPS monitor.

use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use vertex_monitor::commands::{self, AdjustmentArgs, SecurityArgs};
use vertex_monitor::config::Config;
use vertex_monitor::error::Error;

#[derive(Parser)]
#[command(name = "vertex")]
#[command(about = "Portfolio analytics and IPS compliance monitor")]
#[command(version)]
struct Cli {
    /// Path to config.toml (defaults apply if the file is missing)
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the first-run snapshot with strategic targets and default tables
    Init {
        /// Overwrite an existing snapshot without asking
        #[arg(long)]
        force: bool,
    },

    /// Print allocation, exposures, risk statistics and compliance
    Report {
        /// Return series (JSON array or one number per line)
        #[arg(long)]
        returns: Option<PathBuf>,

        /// Print the evaluation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate, store derived tables, exit with code 2 on any breach
    Check {
        /// Return series (JSON array or one number per line)
        #[arg(long)]
        returns: Option<PathBuf>,
    },

    /// Show allocation drift and the trades that fix it
    Rebalance,

    /// Set the current allocation of an asset class
    SetAllocation {
        /// Asset class label, e.g. "Fixed Income"
        asset_class: String,
        /// Current allocation in percent
        current: f64,
    },

    /// Add a security
    AddSecurity {
        ticker: String,
        #[arg(long)]
        asset_class: String,
        #[arg(long)]
        sector: String,
        #[arg(long)]
        region: String,
        /// Current weight in percent
        #[arg(long)]
        weight: f64,
        /// Target weight in percent
        #[arg(long)]
        target: f64,
        #[arg(long, default_value = "")]
        name: String,
        /// Instrument label, e.g. "T-Bill" (drives duration)
        #[arg(long, default_value = "")]
        instrument: String,
        #[arg(long, default_value_t = 0.0)]
        market_value: f64,
    },

    /// Remove a security by id
    RemoveSecurity { id: String },

    /// Record a tactical adjustment
    AddAdjustment {
        /// What was done, e.g. "Increased Fixed Income by 3%"
        tactical_move: String,
        /// Signed deviation from strategic target, percentage points
        #[arg(long, allow_hyphen_values = true)]
        deviation: f64,
        #[arg(long, default_value = "")]
        signal: String,
        #[arg(long, default_value = "")]
        duration: String,
        #[arg(long, default_value = "")]
        approved_by: String,
        #[arg(long, default_value = "")]
        notes: String,
        /// ISO date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Permanently delete a tactical adjustment
    RemoveAdjustment { id: String },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let config = match Config::load_or_default(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init { force } => commands::init(&config, force),
        Command::Report { returns, json } => commands::report(&config, returns.as_deref(), json),
        Command::Check { returns } => commands::check(&config, returns.as_deref()),
        Command::Rebalance => commands::rebalance(&config),
        Command::SetAllocation {
            asset_class,
            current,
        } => commands::set_allocation(&config, &asset_class, current),
        Command::AddSecurity {
            ticker,
            asset_class,
            sector,
            region,
            weight,
            target,
            name,
            instrument,
            market_value,
        } => commands::add_security(
            &config,
            SecurityArgs {
                ticker,
                name,
                instrument,
                asset_class,
                sector,
                region,
                current_weight: weight,
                target_weight: target,
                market_value,
            },
        )
        .map(drop),
        Command::RemoveSecurity { id } => commands::remove_security(&config, &id),
        Command::AddAdjustment {
            tactical_move,
            deviation,
            signal,
            duration,
            approved_by,
            notes,
            date,
        } => commands::add_adjustment(
            &config,
            AdjustmentArgs {
                tactical_move,
                deviation_percent: deviation,
                market_signal: signal,
                duration,
                approved_by,
                notes,
                date,
            },
        )
        .map(drop),
        Command::RemoveAdjustment { id } => commands::remove_adjustment(&config, &id),
    };

    if let Err(e) = result {
        match &e {
            Error::ComplianceFailed(msg) => {
                eprintln!("\nIPS breach: {msg}");
                process::exit(2);
            }
            Error::Aborted(msg) => {
                eprintln!("{msg}");
                process::exit(0);
            }
            _ => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
    }
}
