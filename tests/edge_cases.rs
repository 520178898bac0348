//! Edge-case tests: adversarial inputs to every public API.

use vertex::metrics::{self, RiskStatistics};
use vertex::tactical::{max_tactical_deviation, total_tactical_deviation};
use vertex::{
    exposure, today, Allocation, AssetClass, Region, RiskLevel, Sector, Security,
    TacticalAdjustment, ValidationError,
};

fn sec(ticker: &str, weight: f64) -> Security {
    Security::new(ticker, AssetClass::FixedIncome, Sector::Government, Region::Tanzania)
        .with_weights(weight, weight)
        .unwrap()
}

// ============================================================================
// Empty inputs
// ============================================================================

#[test]
fn empty_returns_are_all_zero() {
    assert_eq!(metrics::volatility(&[]), 0.0);
    assert_eq!(metrics::sharpe_ratio(&[], 0.05), 0.0);
    assert_eq!(metrics::sortino_ratio(&[], 0.05), 0.0);
    assert_eq!(metrics::max_drawdown(&[]), 0.0);
}

#[test]
fn single_return_has_no_volatility() {
    assert_eq!(metrics::volatility(&[0.03]), 0.0);
    assert_eq!(metrics::sharpe_ratio(&[0.03], 0.0), 0.0);
}

#[test]
fn empty_securities() {
    let summary = exposure::ExposureSummary::from_securities(&[]);
    assert!(summary.sectors.is_empty());
    assert!(summary.regions.is_empty());
    assert_eq!(summary.concentration, exposure::Concentration::default());
    assert_eq!(summary.total_weight, 0.0);
    assert_eq!(exposure::average_weight(&[]), 0.0);

    assert_eq!(metrics::weighted_duration(&[]), 0.0);
    assert_eq!(metrics::portfolio_beta(&[], &[("TB-91", 0.3)]), 1.0);
}

#[test]
fn statistics_for_empty_portfolio() {
    let stats = RiskStatistics::compute(&[], &[], &[], metrics::DEFAULT_RISK_FREE_RATE);
    assert_eq!(stats.num_periods, 0);
    assert_eq!(stats.max_single_security, 0.0);
    assert_eq!(stats.beta, 1.0);
    assert_eq!(stats.risk_level, RiskLevel::Low);
}

#[test]
fn empty_allocations_are_compliant() {
    assert!(vertex::allocation::check_allocation_compliance(&[]));
}

#[test]
fn empty_adjustments() {
    assert_eq!(total_tactical_deviation(&[]), 0.0);
    assert_eq!(max_tactical_deviation(&[]), 0.0);
}

// ============================================================================
// Rejected edits
// ============================================================================

#[test]
fn non_finite_weights_rejected() {
    let mut s = sec("TB-91", 5.0);
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert!(matches!(
            s.set_current_weight(bad),
            Err(ValidationError::NonFinite { .. })
        ));
    }
    // Rejected edits leave the record untouched
    assert_eq!(s.current_weight(), 5.0);
    assert_eq!(s.deviation(), 0.0);
}

#[test]
fn out_of_range_percentages_rejected() {
    let mut alloc = Allocation::new(AssetClass::CashEquivalents, 10.0).unwrap();
    assert!(matches!(
        alloc.set_current(-0.01),
        Err(ValidationError::OutOfRange { .. })
    ));
    assert!(matches!(
        alloc.set_target(100.5),
        Err(ValidationError::OutOfRange { .. })
    ));
    assert!(Allocation::new(AssetClass::FixedIncome, f64::NAN).is_err());

    // Boundaries are accepted
    alloc.set_current(0.0).unwrap();
    alloc.set_current(100.0).unwrap();
    assert_eq!(alloc.deviation(), 90.0);
}

#[test]
fn adjustment_deviation_must_be_finite() {
    let adj = TacticalAdjustment::new(today());
    assert!(adj.clone().with_move("x", f64::NAN).is_err());
    // Negative deviations are fine: they record an underweight move
    let adj = adj.with_move("Reduced equities", -4.0).unwrap();
    assert_eq!(adj.deviation_percent(), -4.0);
}

// ============================================================================
// Tolerance boundary
// ============================================================================

#[test]
fn rebalancing_boundary_is_exclusive() {
    let mut alloc = Allocation::new(AssetClass::FixedIncome, 50.0).unwrap();
    alloc.set_current(53.0).unwrap();
    assert!(!alloc.rebalancing_required());
    alloc.set_current(47.0).unwrap();
    assert!(!alloc.rebalancing_required());
    alloc.set_current(53.01).unwrap();
    assert!(alloc.rebalancing_required());
}

// ============================================================================
// Labels
// ============================================================================

#[test]
fn unknown_labels_form_their_own_bucket() {
    let mut a = sec("A", 10.0);
    a.sector = Sector::from_label("Fintech");
    let mut b = sec("B", 5.0);
    b.sector = Sector::from_label("");
    let c = sec("C", 7.0);

    let sectors = exposure::sector_exposures(&[a, b, c]);
    assert_eq!(sectors.get("Fintech"), Some(10.0));
    assert_eq!(sectors.get(""), Some(5.0));
    assert_eq!(sectors.get("Government"), Some(7.0));
    assert_eq!(sectors.len(), 3);
}

#[test]
fn labels_parse_case_insensitively() {
    assert_eq!(AssetClass::from_label("  fixed income "), AssetClass::FixedIncome);
    assert_eq!(Region::from_label("east african community"), Region::Eac);
    assert!(!Sector::from_label("Crypto").is_known());
}

// ============================================================================
// Degenerate series
// ============================================================================

#[test]
fn drawdown_skips_zero_peak() {
    // A zero peak makes the ratio non-finite; those points are skipped
    assert_eq!(metrics::max_drawdown(&[0.0, 0.0, 0.0]), 0.0);
    assert_eq!(metrics::max_drawdown(&[0.0, 10.0, 5.0]), 50.0);
}

#[test]
fn monotone_series_has_no_drawdown() {
    assert_eq!(metrics::max_drawdown(&[1.0, 2.0, 3.0, 4.0]), 0.0);
}

#[test]
fn sortino_without_downside_is_zero() {
    assert_eq!(metrics::sortino_ratio(&[0.06, 0.07, 0.08], 0.05), 0.0);
}

#[test]
fn beta_with_zero_weight_is_market() {
    let s = sec("TB-91", 0.0);
    assert_eq!(metrics::portfolio_beta(&[s], &[("TB-91", 0.2)]), 1.0);
}

#[test]
fn duration_ignores_non_fixed_income() {
    let equity = Security::new(
        "CRDB",
        AssetClass::DomesticEquities,
        Sector::Banking,
        Region::Tanzania,
    )
    .with_weights(50.0, 50.0)
    .unwrap();
    assert_eq!(metrics::weighted_duration(&[equity]), 0.0);
}

#[test]
fn weighted_average_zero_weights() {
    assert_eq!(metrics::weighted_average(&[]), 0.0);
    assert_eq!(metrics::weighted_average(&[(0.0, 5.0), (0.0, 7.0)]), 0.0);
}
