//! The portfolio snapshot: aggregate root of the domain model.

use chrono::NaiveDate;

use crate::allocation::Allocation;
use crate::error::{self, ValidationError};
use crate::records::{ComplianceCheck, LiquidityItem, PerformanceMetric, RiskMetric};
use crate::security::Security;
use crate::tactical::TacticalAdjustment;
use crate::types::AssetClass;

/// Portfolio value used by [`PortfolioSnapshot::initial`] (TZS 100 million).
pub const DEFAULT_TOTAL_VALUE: f64 = 100_000_000.0;

/// Everything the monitor knows about the portfolio at a point in time.
///
/// Children have no identity outside their snapshot. The snapshot is
/// replaced wholesale on load and written wholesale on save.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct PortfolioSnapshot {
    /// As-of date (ISO-8601 on the wire).
    pub date: NaiveDate,
    #[cfg_attr(feature = "serde", serde(default))]
    total_value: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub allocations: Vec<Allocation>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub securities: Vec<Security>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub risk_metrics: Vec<RiskMetric>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub liquidity: Vec<LiquidityItem>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tactical_adjustments: Vec<TacticalAdjustment>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub performance_metrics: Vec<PerformanceMetric>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub compliance_checks: Vec<ComplianceCheck>,
}

impl Default for PortfolioSnapshot {
    /// An empty snapshot dated today.
    fn default() -> Self {
        Self::empty(today())
    }
}

/// Today's date in local time.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl PortfolioSnapshot {
    /// A snapshot with every collection empty.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total_value: 0.0,
            allocations: Vec::new(),
            securities: Vec::new(),
            risk_metrics: Vec::new(),
            liquidity: Vec::new(),
            tactical_adjustments: Vec::new(),
            performance_metrics: Vec::new(),
            compliance_checks: Vec::new(),
        }
    }

    /// First-run snapshot: strategic targets and the default IPS tables.
    pub fn initial(date: NaiveDate) -> Self {
        Self {
            date,
            total_value: DEFAULT_TOTAL_VALUE,
            allocations: Allocation::strategic_defaults(),
            securities: Vec::new(),
            risk_metrics: vec![
                RiskMetric::placeholder("Single Security Exposure", "≤10%"),
                RiskMetric::placeholder("Single Sector Exposure", "≤25%"),
                RiskMetric::placeholder("Regional Allocation", "≤10%"),
                RiskMetric::placeholder("Weighted Portfolio Duration", "≤2 yrs"),
                RiskMetric::placeholder("Portfolio Volatility", "5–7% ann."),
                RiskMetric::placeholder("Drawdown Limit", "≤5%"),
                RiskMetric::placeholder("Credit Rating Compliance", "≥Investment Grade"),
            ],
            liquidity: LiquidityItem::defaults(),
            tactical_adjustments: Vec::new(),
            performance_metrics: PerformanceMetric::defaults(),
            compliance_checks: vec![
                ComplianceCheck::passing("Single Security Limit", "≤10%"),
                ComplianceCheck::passing("Single Sector Limit", "≤25%"),
                ComplianceCheck::passing("Regional Allocation Limit", "≤10%"),
                ComplianceCheck::passing("Drawdown Limit", "≤5%"),
                ComplianceCheck::passing("Prohibited Instruments", "None"),
                ComplianceCheck::passing("Credit Rating Compliance", "≥Investment Grade"),
            ],
        }
    }

    // === Value ===

    /// Total portfolio value used to size rebalancing trades.
    #[inline]
    pub fn total_value(&self) -> f64 {
        self.total_value
    }

    /// Set the total portfolio value. Must be finite and non-negative.
    pub fn set_total_value(&mut self, value: f64) -> Result<(), ValidationError> {
        let value = error::finite("totalValue", value)?;
        if value < 0.0 {
            return Err(ValidationError::Negative {
                field: "totalValue",
                value,
            });
        }
        self.total_value = value;
        Ok(())
    }

    // === Securities ===

    /// Add a security, assigning the next numeric id. Returns the id.
    pub fn add_security(&mut self, mut security: Security) -> String {
        let id = next_id(self.securities.iter().map(|s| s.id.as_str()));
        security.id = id.clone();
        self.securities.push(security);
        id
    }

    pub fn security(&self, id: &str) -> Option<&Security> {
        self.securities.iter().find(|s| s.id == id)
    }

    /// Mutable access for edits. Weight setters keep the deviation derived.
    pub fn security_mut(&mut self, id: &str) -> Option<&mut Security> {
        self.securities.iter_mut().find(|s| s.id == id)
    }

    pub fn remove_security(&mut self, id: &str) -> Option<Security> {
        let idx = self.securities.iter().position(|s| s.id == id)?;
        Some(self.securities.remove(idx))
    }

    /// Sum of security market values.
    pub fn market_value(&self) -> f64 {
        self.securities.iter().map(Security::market_value).sum()
    }

    // === Allocations ===

    pub fn allocation(&self, asset_class: &AssetClass) -> Option<&Allocation> {
        self.allocations.iter().find(|a| &a.asset_class == asset_class)
    }

    /// Mutable access for edits. Setters keep deviation and the rebalancing flag derived.
    pub fn allocation_mut(&mut self, asset_class: &AssetClass) -> Option<&mut Allocation> {
        self.allocations
            .iter_mut()
            .find(|a| &a.asset_class == asset_class)
    }

    // === Tactical adjustments ===

    /// Record an adjustment, assigning the next numeric id. Returns the id.
    pub fn add_adjustment(&mut self, mut adjustment: TacticalAdjustment) -> String {
        let id = next_id(self.tactical_adjustments.iter().map(|t| t.id.as_str()));
        adjustment.id = id.clone();
        self.tactical_adjustments.push(adjustment);
        id
    }

    pub fn adjustment_mut(&mut self, id: &str) -> Option<&mut TacticalAdjustment> {
        self.tactical_adjustments.iter_mut().find(|t| t.id == id)
    }

    /// Permanently delete an adjustment.
    pub fn remove_adjustment(&mut self, id: &str) -> Option<TacticalAdjustment> {
        let idx = self.tactical_adjustments.iter().position(|t| t.id == id)?;
        Some(self.tactical_adjustments.remove(idx))
    }
}

/// `max(numeric ids) + 1`, ignoring ids that are not integers.
fn next_id<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    let max = ids.filter_map(|id| id.parse::<u64>().ok()).max().unwrap_or(0);
    (max + 1).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Region, Sector};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()
    }

    fn bond() -> Security {
        Security::new(
            "TGB-26",
            AssetClass::FixedIncome,
            Sector::Government,
            Region::Tanzania,
        )
        .with_weights(25.0, 25.0)
        .unwrap()
    }

    #[test]
    fn empty_snapshot() {
        let snap = PortfolioSnapshot::empty(date());
        assert_eq!(snap.date, date());
        assert!(snap.allocations.is_empty());
        assert!(snap.securities.is_empty());
        assert!(snap.compliance_checks.is_empty());
    }

    #[test]
    fn initial_snapshot_tables() {
        let snap = PortfolioSnapshot::initial(date());
        assert_eq!(snap.total_value(), DEFAULT_TOTAL_VALUE);
        assert_eq!(snap.allocations.len(), 4);
        let total: f64 = snap.allocations.iter().map(Allocation::target).sum();
        assert_eq!(total, 100.0);
        assert_eq!(snap.risk_metrics.len(), 7);
        assert_eq!(snap.liquidity.len(), 3);
        assert_eq!(snap.performance_metrics.len(), 4);
        assert_eq!(snap.compliance_checks.len(), 6);
    }

    #[test]
    fn security_ids_are_sequential() {
        let mut snap = PortfolioSnapshot::empty(date());
        assert_eq!(snap.add_security(bond()), "1");
        assert_eq!(snap.add_security(bond()), "2");
        snap.remove_security("1").unwrap();
        assert_eq!(snap.add_security(bond()), "3");
        assert!(snap.security("1").is_none());
    }

    #[test]
    fn security_edit_keeps_deviation() {
        let mut snap = PortfolioSnapshot::empty(date());
        let id = snap.add_security(bond());
        snap.security_mut(&id).unwrap().set_current_weight(27.5).unwrap();
        assert_eq!(snap.security(&id).unwrap().deviation(), 2.5);
    }

    #[test]
    fn allocation_edit_by_asset_class() {
        let mut snap = PortfolioSnapshot::initial(date());
        let alloc = snap.allocation_mut(&AssetClass::CashEquivalents).unwrap();
        alloc.set_current(14.0).unwrap();
        let alloc = snap.allocation(&AssetClass::CashEquivalents).unwrap();
        assert_eq!(alloc.deviation(), 4.0);
        assert!(alloc.rebalancing_required());
    }

    #[test]
    fn adjustments_delete_permanently() {
        let mut snap = PortfolioSnapshot::empty(date());
        let a = snap.add_adjustment(TacticalAdjustment::new(date()));
        let b = snap.add_adjustment(TacticalAdjustment::new(date()));
        assert_eq!((a.as_str(), b.as_str()), ("1", "2"));

        assert!(snap.remove_adjustment(&a).is_some());
        assert!(snap.remove_adjustment(&a).is_none());
        assert_eq!(snap.tactical_adjustments.len(), 1);
        assert!(snap.adjustment_mut(&b).is_some());
    }

    #[test]
    fn total_value_must_be_finite() {
        let mut snap = PortfolioSnapshot::initial(date());
        assert!(matches!(
            snap.set_total_value(f64::NAN),
            Err(ValidationError::NonFinite { .. })
        ));
        assert!(matches!(
            snap.set_total_value(-1.0),
            Err(ValidationError::Negative { .. })
        ));
        assert_eq!(snap.total_value(), DEFAULT_TOTAL_VALUE);

        snap.set_total_value(250_000_000.0).unwrap();
        assert_eq!(snap.total_value(), 250_000_000.0);
    }

    #[test]
    fn next_id_skips_non_numeric() {
        assert_eq!(next_id(["a", "7", "3"].into_iter()), "8");
        assert_eq!(next_id(std::iter::empty()), "1");
    }
}
