//! Integration tests for monitor commands against a temporary store.

use std::path::Path;

use vertex::persistence::{self, STORAGE_KEY};
use vertex::{AssetClass, MetricStatus};
use vertex_monitor::commands::{self, AdjustmentArgs, SecurityArgs};
use vertex_monitor::config::Config;
use vertex_monitor::error::Error;

fn config_in(dir: &Path) -> Config {
    let toml = format!(
        "[storage]\ndir = {:?}\n\n[logging]\ndir = {:?}\naudit_file = \"audit.jsonl\"\n",
        dir.join("state").display().to_string(),
        dir.join("logs").display().to_string(),
    );
    Config::from_toml(&toml).unwrap()
}

fn audit_events(config: &Config) -> Vec<String> {
    std::fs::read_to_string(config.audit_path())
        .unwrap()
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            value["event"].as_str().unwrap().to_string()
        })
        .collect()
}

fn bond(ticker: &str, weight: f64) -> SecurityArgs {
    SecurityArgs {
        ticker: ticker.into(),
        instrument: "T-Bill".into(),
        asset_class: "Fixed Income".into(),
        sector: "Government".into(),
        region: "Tanzania".into(),
        current_weight: weight,
        target_weight: weight,
        ..SecurityArgs::default()
    }
}

// ============================================================================
// init
// ============================================================================

#[test]
fn init_writes_initial_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    commands::init(&config, true).unwrap();

    let store = config.store();
    assert!(store.path_for(STORAGE_KEY).exists());
    let snap = persistence::load_snapshot(&store);
    assert_eq!(snap.allocations.len(), 4);
    assert_eq!(snap.compliance_checks.len(), 6);

    let events = audit_events(&config);
    assert_eq!(events, vec!["command_started", "snapshot_saved"]);
}

#[test]
fn init_force_overwrites_without_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    commands::init(&config, true).unwrap();
    commands::add_security(&config, bond("TB-91", 5.0)).unwrap();
    commands::init(&config, true).unwrap();

    let snap = persistence::load_snapshot(&config.store());
    assert!(snap.securities.is_empty());
}

// ============================================================================
// Edits
// ============================================================================

#[test]
fn set_allocation_rederives_flag() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    commands::init(&config, true).unwrap();

    commands::set_allocation(&config, "cash & equivalents", 14.5).unwrap();

    let snap = persistence::load_snapshot(&config.store());
    let cash = snap.allocation(&AssetClass::CashEquivalents).unwrap();
    assert_eq!(cash.current(), 14.5);
    assert_eq!(cash.deviation(), 4.5);
    assert!(cash.rebalancing_required());
    assert!(audit_events(&config).contains(&"allocation_set".to_string()));
}

#[test]
fn set_allocation_rejects_bad_input() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    commands::init(&config, true).unwrap();

    assert!(matches!(
        commands::set_allocation(&config, "Crypto", 5.0),
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        commands::set_allocation(&config, "Fixed Income", 120.0),
        Err(Error::Validation(_))
    ));

    // Nothing was saved
    let snap = persistence::load_snapshot(&config.store());
    assert_eq!(snap.allocation(&AssetClass::FixedIncome).unwrap().current(), 0.0);
}

#[test]
fn securities_get_sequential_ids() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    commands::init(&config, true).unwrap();

    let a = commands::add_security(&config, bond("TB-91", 5.0)).unwrap();
    let b = commands::add_security(&config, bond("TB-182", 5.0)).unwrap();
    assert_eq!((a.as_str(), b.as_str()), ("1", "2"));

    commands::remove_security(&config, &a).unwrap();
    assert!(matches!(
        commands::remove_security(&config, &a),
        Err(Error::NotFound(_))
    ));

    let snap = persistence::load_snapshot(&config.store());
    assert_eq!(snap.securities.len(), 1);
    assert_eq!(snap.securities[0].ticker, "TB-182");
}

#[test]
fn adjustments_add_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    commands::init(&config, true).unwrap();

    let id = commands::add_adjustment(
        &config,
        AdjustmentArgs {
            tactical_move: "Increased Fixed Income by 3%".into(),
            deviation_percent: 3.0,
            approved_by: "Investment Committee".into(),
            ..AdjustmentArgs::default()
        },
    )
    .unwrap();

    let snap = persistence::load_snapshot(&config.store());
    assert_eq!(snap.tactical_adjustments.len(), 1);
    assert_eq!(snap.tactical_adjustments[0].deviation_percent(), 3.0);

    commands::remove_adjustment(&config, &id).unwrap();
    let snap = persistence::load_snapshot(&config.store());
    assert!(snap.tactical_adjustments.is_empty());

    let events = audit_events(&config);
    assert!(events.contains(&"adjustment_added".to_string()));
    assert!(events.contains(&"adjustment_removed".to_string()));
}

#[test]
fn non_finite_adjustment_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    commands::init(&config, true).unwrap();

    let result = commands::add_adjustment(
        &config,
        AdjustmentArgs {
            deviation_percent: f64::NAN,
            ..AdjustmentArgs::default()
        },
    );
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[test]
fn non_finite_market_value_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    commands::init(&config, true).unwrap();
    commands::add_security(&config, bond("TB-91", 5.0)).unwrap();

    for bad in [f64::NAN, f64::INFINITY] {
        let result = commands::add_security(
            &config,
            SecurityArgs {
                market_value: bad,
                ..bond("TB-182", 5.0)
            },
        );
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    // The stored snapshot still loads and still holds everything
    commands::add_security(&config, bond("TB-364", 5.0)).unwrap();
    let snap = persistence::try_load(&config.store()).unwrap().unwrap();
    let tickers: Vec<&str> = snap.securities.iter().map(|s| s.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["TB-91", "TB-364"]);
    assert_eq!(snap.allocations.len(), 4);
}

#[test]
fn edits_refuse_to_overwrite_unreadable_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    commands::init(&config, true).unwrap();

    let path = config.store().path_for(STORAGE_KEY);
    let corrupt = "{\"date\": \"2026-06-30\", \"totalValue\": null}";
    std::fs::write(&path, corrupt).unwrap();

    assert!(matches!(
        commands::add_security(&config, bond("TB-91", 5.0)),
        Err(Error::Store(_))
    ));
    assert!(matches!(
        commands::set_allocation(&config, "Fixed Income", 50.0),
        Err(Error::Store(_))
    ));
    assert!(matches!(
        commands::add_adjustment(&config, AdjustmentArgs::default()),
        Err(Error::Store(_))
    ));
    assert!(matches!(commands::check(&config, None), Err(Error::Store(_))));
    assert!(matches!(
        commands::remove_security(&config, "1"),
        Err(Error::Store(_))
    ));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), corrupt);

    // Read-only commands still run on the empty fallback
    commands::report(&config, None, false).unwrap();
    commands::rebalance(&config).unwrap();
}

// ============================================================================
// Evaluation
// ============================================================================

#[test]
fn check_fails_on_breach_and_stores_tables() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    commands::init(&config, true).unwrap();
    commands::add_security(&config, bond("TB-91", 15.0)).unwrap();

    let result = commands::check(&config, None);
    assert!(matches!(result, Err(Error::ComplianceFailed(_))));

    let snap = persistence::load_snapshot(&config.store());
    assert_eq!(snap.risk_metrics[0].status, MetricStatus::Breach);
    assert!(snap.compliance_checks[0].breach);
}

#[test]
fn report_reads_returns_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    commands::init(&config, true).unwrap();

    let returns = dir.path().join("returns.json");
    std::fs::write(&returns, "[0.01, 0.02, -0.01]").unwrap();
    commands::report(&config, Some(&returns), false).unwrap();
    commands::report(&config, Some(&returns), true).unwrap();

    let missing = dir.path().join("missing.txt");
    assert!(matches!(
        commands::report(&config, Some(&missing), false),
        Err(Error::ReturnsRead { .. })
    ));
    assert!(audit_events(&config).contains(&"evaluation".to_string()));
}

#[test]
fn report_without_snapshot_uses_empty_state() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    commands::report(&config, None, false).unwrap();
    commands::rebalance(&config).unwrap();
}
