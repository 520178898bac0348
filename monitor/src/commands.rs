//! Command implementations: load → edit or evaluate → save → audit.
//!
//! Read-only commands (`report`, `rebalance`) degrade to an empty snapshot
//! when the store cannot be read; commands that save refuse to run instead.
//!
//! Every command opens the audit trail first, so even a failed command
//! leaves a `command_started` record.

use std::path::Path;

use chrono::NaiveDate;
use log::{info, warn};
use vertex::persistence::{self, FileStore};
use vertex::{
    AssetClass, PortfolioSnapshot, ReconcileReport, Region, Sector, Security, TacticalAdjustment,
};

use crate::audit::AuditLog;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::returns;

/// Fields for a new tactical adjustment.
#[derive(Debug, Clone, Default)]
pub struct AdjustmentArgs {
    pub tactical_move: String,
    pub deviation_percent: f64,
    pub market_signal: String,
    pub duration: String,
    pub approved_by: String,
    pub notes: String,
    /// Defaults to today.
    pub date: Option<NaiveDate>,
}

/// Fields for a new security.
#[derive(Debug, Clone, Default)]
pub struct SecurityArgs {
    pub ticker: String,
    pub name: String,
    pub instrument: String,
    pub asset_class: String,
    pub sector: String,
    pub region: String,
    pub current_weight: f64,
    pub target_weight: f64,
    pub market_value: f64,
}

/// One suggested trade to bring an asset class back to target.
#[derive(Debug, Clone, PartialEq)]
pub struct RebalanceTrade {
    pub asset_class: String,
    /// `current - target`, percentage points.
    pub deviation: f64,
    /// Signed amount to trade: positive buys, negative sells.
    pub amount: f64,
}

impl std::fmt::Display for RebalanceTrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let action = if self.amount >= 0.0 { "BUY" } else { "SELL" };
        write!(
            f,
            "{:4} {:30} {:>18.0}  ({:+.2} pts)",
            action,
            self.asset_class,
            self.amount.abs(),
            self.deviation
        )
    }
}

fn open_audit(config: &Config, command: &str) -> Result<AuditLog> {
    AuditLog::for_command(&config.audit_path(), command)
}

fn save(store: &mut FileStore, snapshot: &PortfolioSnapshot, audit: &mut AuditLog) -> Result<()> {
    persistence::save_snapshot(store, snapshot)?;
    audit.snapshot_saved(snapshot.date, snapshot.securities.len())
}

/// Load the snapshot a command is about to modify and save back.
///
/// Unlike [`persistence::load_snapshot`], an unreadable or malformed store is
/// an error here: saving over it would discard the stored portfolio.
fn load_for_edit(store: &FileStore) -> Result<PortfolioSnapshot> {
    Ok(persistence::try_load(store)?.unwrap_or_else(|| PortfolioSnapshot::empty(vertex::today())))
}

/// Write the first-run snapshot. Asks before overwriting unless `force`.
pub fn init(config: &Config, force: bool) -> Result<()> {
    let mut audit = open_audit(config, "init")?;
    let mut store = config.store();

    let exists = !matches!(persistence::try_load(&store), Ok(None));
    if exists && !force {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt("A snapshot already exists. Overwrite it?")
            .default(false)
            .interact()
            .map_err(|e| Error::Aborted(format!("confirmation prompt failed: {e}")))?;

        audit.log("user_confirmed", serde_json::json!({ "approved": confirmed }))?;
        if !confirmed {
            audit.log_simple("init_aborted")?;
            println!("Aborted.");
            return Ok(());
        }
    }

    let snapshot = PortfolioSnapshot::initial(vertex::today());
    save(&mut store, &snapshot, &mut audit)?;
    info!("initialised snapshot in {}", store.dir().display());
    println!(
        "Initialised portfolio snapshot dated {} in {}",
        snapshot.date,
        store.dir().display()
    );
    Ok(())
}

/// Print the full evaluation. `json` prints it as JSON instead.
pub fn report(config: &Config, returns_file: Option<&Path>, json: bool) -> Result<()> {
    let mut audit = open_audit(config, "report")?;
    let returns = returns::load_optional(returns_file)?;
    let snapshot = persistence::load_snapshot(&config.store());

    let evaluation = config.engine().evaluate(&snapshot, &returns);
    audit.evaluation(&evaluation)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
    } else {
        println!(
            "PORTFOLIO {} (value {:.0})\n",
            snapshot.date,
            snapshot.total_value()
        );
        print!("{evaluation}");
    }
    Ok(())
}

/// Evaluate, store the derived tables, and fail if any hard limit is breached.
pub fn check(config: &Config, returns_file: Option<&Path>) -> Result<()> {
    let mut audit = open_audit(config, "check")?;
    let returns = returns::load_optional(returns_file)?;
    let mut store = config.store();
    let mut snapshot = load_for_edit(&store)?;

    let evaluation = config.engine().apply(&mut snapshot, &returns);
    audit.evaluation(&evaluation)?;
    save(&mut store, &snapshot, &mut audit)?;

    print!("{}", evaluation.report);
    println!("TACTICAL: {}", evaluation.tactical);

    if evaluation.has_breaches() {
        return Err(Error::ComplianceFailed(format!(
            "{} rule breaches, {} metric breaches",
            evaluation.report.breaches.len(),
            evaluation.breach_count()
        )));
    }
    println!("All IPS limits respected.");
    Ok(())
}

/// Trades that bring every out-of-tolerance asset class back to target.
pub fn rebalance_plan(snapshot: &PortfolioSnapshot) -> Vec<RebalanceTrade> {
    ReconcileReport::from_allocations(&snapshot.allocations)
        .out_of_tolerance()
        .map(|e| RebalanceTrade {
            asset_class: e.asset_class.clone(),
            deviation: e.deviation,
            amount: -e.deviation / 100.0 * snapshot.total_value(),
        })
        .collect()
}

/// Print the allocation reconciliation and the trades to fix it.
pub fn rebalance(config: &Config) -> Result<()> {
    let mut audit = open_audit(config, "rebalance")?;
    let snapshot = persistence::load_snapshot(&config.store());

    let report = ReconcileReport::from_allocations(&snapshot.allocations);
    print!("{report}");

    let plan = rebalance_plan(&snapshot);
    audit.log(
        "rebalance_planned",
        serde_json::json!({
            "trades": plan
                .iter()
                .map(|t| serde_json::json!({
                    "asset_class": t.asset_class,
                    "deviation": t.deviation,
                    "amount": t.amount,
                }))
                .collect::<Vec<_>>(),
        }),
    )?;

    if plan.is_empty() {
        println!("\nNo rebalancing needed. All asset classes within tolerance.");
        return Ok(());
    }

    println!("\nREBALANCE TRADES:");
    for trade in &plan {
        println!("  {trade}");
    }
    Ok(())
}

/// Set the current allocation of one asset class.
pub fn set_allocation(config: &Config, asset_class: &str, current: f64) -> Result<()> {
    let mut audit = open_audit(config, "set-allocation")?;
    let mut store = config.store();
    let mut snapshot = load_for_edit(&store)?;

    let class = AssetClass::from_label(asset_class);
    let alloc = snapshot
        .allocation_mut(&class)
        .ok_or_else(|| Error::NotFound(format!("no allocation for asset class '{asset_class}'")))?;
    let previous = alloc.current();
    alloc.set_current(current)?;

    if alloc.rebalancing_required() {
        warn!(
            "{} deviates {:+.2} pts from target: rebalancing required",
            alloc.asset_class,
            alloc.deviation()
        );
    }
    println!(
        "{}: {:.2}% → {:.2}% (target {:.2}%, deviation {:+.2})",
        alloc.asset_class,
        previous,
        alloc.current(),
        alloc.target(),
        alloc.deviation()
    );
    audit.allocation_set(previous, alloc)?;

    save(&mut store, &snapshot, &mut audit)
}

/// Add a security. Returns its id.
pub fn add_security(config: &Config, args: SecurityArgs) -> Result<String> {
    let mut audit = open_audit(config, "add-security")?;
    let mut store = config.store();
    let mut snapshot = load_for_edit(&store)?;

    let mut security = Security::new(
        args.ticker,
        AssetClass::from_label(&args.asset_class),
        Sector::from_label(&args.sector),
        Region::from_label(&args.region),
    )
    .with_instrument(args.instrument)
    .with_weights(args.current_weight, args.target_weight)?
    .with_market_value(args.market_value)?;
    security.name = args.name;

    for (kind, known) in [
        ("asset class", security.asset_class.is_known()),
        ("sector", security.sector.is_known()),
        ("region", security.geographic_exposure.is_known()),
    ] {
        if !known {
            warn!("{} uses an unrecognised {kind}", security.ticker);
        }
    }

    let ticker = security.ticker.clone();
    let id = snapshot.add_security(security);
    audit.log(
        "security_added",
        serde_json::json!({ "id": id, "ticker": ticker }),
    )?;
    save(&mut store, &snapshot, &mut audit)?;
    println!("Added {ticker} as security {id}");
    Ok(id)
}

/// Remove a security by id.
pub fn remove_security(config: &Config, id: &str) -> Result<()> {
    let mut audit = open_audit(config, "remove-security")?;
    let mut store = config.store();
    let mut snapshot = load_for_edit(&store)?;

    let removed = snapshot
        .remove_security(id)
        .ok_or_else(|| Error::NotFound(format!("no security with id {id}")))?;
    audit.log(
        "security_removed",
        serde_json::json!({ "id": id, "ticker": removed.ticker }),
    )?;
    save(&mut store, &snapshot, &mut audit)?;
    println!("Removed {} ({id})", removed.ticker);
    Ok(())
}

/// Record a tactical adjustment. Returns its id.
pub fn add_adjustment(config: &Config, args: AdjustmentArgs) -> Result<String> {
    let mut audit = open_audit(config, "add-adjustment")?;
    let mut store = config.store();
    let mut snapshot = load_for_edit(&store)?;

    let mut adjustment = TacticalAdjustment::new(args.date.unwrap_or_else(vertex::today))
        .with_move(args.tactical_move, args.deviation_percent)?;
    adjustment.market_signal = args.market_signal;
    adjustment.duration = args.duration;
    adjustment.approved_by = args.approved_by;
    adjustment.notes = args.notes;

    let id = snapshot.add_adjustment(adjustment);
    if let Some(recorded) = snapshot.tactical_adjustments.iter().find(|t| t.id == id) {
        audit.adjustment_added(recorded)?;
    }

    let tactical = vertex_compliance::check_tactical_limit(
        &snapshot.tactical_adjustments,
        config.ips.max_tactical_deviation,
    );
    if !tactical.within_limit {
        warn!("tactical deviation {tactical}");
    }

    save(&mut store, &snapshot, &mut audit)?;
    println!("Recorded adjustment {id}. Tactical: {tactical}");
    Ok(id)
}

/// Permanently delete a tactical adjustment.
pub fn remove_adjustment(config: &Config, id: &str) -> Result<()> {
    let mut audit = open_audit(config, "remove-adjustment")?;
    let mut store = config.store();
    let mut snapshot = load_for_edit(&store)?;

    let removed = snapshot
        .remove_adjustment(id)
        .ok_or_else(|| Error::NotFound(format!("no tactical adjustment with id {id}")))?;
    audit.adjustment_removed(&removed)?;
    save(&mut store, &snapshot, &mut audit)?;
    println!("Deleted adjustment {id}");
    Ok(())
}
