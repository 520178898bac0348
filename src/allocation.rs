//! Strategic allocation rows and reconciliation against target.
//!
//! An [`Allocation`] keeps `deviation` and `rebalancing_required` derived
//! from `current` and `target`. Both are recomputed inside the setter that
//! changes either input, so no caller can observe a stale pair.

use crate::error::{self, ValidationError};
use crate::types::AssetClass;

/// Deviation (percentage points) beyond which an allocation must be rebalanced.
pub const REBALANCING_TOLERANCE: f64 = 3.0;

/// `current - target`.
#[inline]
pub fn deviation(target: f64, current: f64) -> f64 {
    current - target
}

/// Relative deviation in percent of target. Zero when `target` is zero.
pub fn percentage_deviation(target: f64, current: f64) -> f64 {
    if target == 0.0 {
        return 0.0;
    }
    (current - target) / target * 100.0
}

/// True if `|deviation|` exceeds the tolerance. The boundary itself does not trigger.
#[inline]
pub fn needs_rebalancing(deviation: f64) -> bool {
    deviation.abs() > REBALANCING_TOLERANCE
}

/// True if no allocation requires rebalancing (vacuously true when empty).
pub fn check_allocation_compliance(allocations: &[Allocation]) -> bool {
    allocations.iter().all(|a| !a.rebalancing_required())
}

/// One asset-class row of the strategic allocation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", from = "AllocationRecord")
)]
pub struct Allocation {
    pub asset_class: AssetClass,
    target: f64,
    current: f64,
    deviation: f64,
    rebalancing_required: bool,
    pub notes: String,
}

impl Allocation {
    /// Create a row with the given target and zero current allocation.
    pub fn new(asset_class: AssetClass, target: f64) -> Result<Self, ValidationError> {
        let target = error::percent("target", target)?;
        Ok(Self::derived(asset_class, target, 0.0, String::new()))
    }

    /// Builder: attach notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    fn derived(asset_class: AssetClass, target: f64, current: f64, notes: String) -> Self {
        let mut alloc = Self {
            asset_class,
            target,
            current,
            deviation: 0.0,
            rebalancing_required: false,
            notes,
        };
        alloc.rederive();
        alloc
    }

    fn rederive(&mut self) {
        self.deviation = deviation(self.target, self.current);
        self.rebalancing_required = needs_rebalancing(self.deviation);
    }

    /// The IPS strategic targets: 50 / 35 / 5 / 10.
    pub fn strategic_defaults() -> Vec<Allocation> {
        [
            (
                AssetClass::FixedIncome,
                50.0,
                "Government and investment-grade corporate bonds",
            ),
            (AssetClass::DomesticEquities, 35.0, "DSE-listed securities"),
            (
                AssetClass::RegionalEquities,
                5.0,
                "EAC and SADC market exposure",
            ),
            (
                AssetClass::CashEquivalents,
                10.0,
                "Treasury bills and bank deposits",
            ),
        ]
        .into_iter()
        .map(|(class, target, notes)| Self::derived(class, target, 0.0, notes.into()))
        .collect()
    }

    // === Queries ===

    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }

    #[inline]
    pub fn deviation(&self) -> f64 {
        self.deviation
    }

    #[inline]
    pub fn rebalancing_required(&self) -> bool {
        self.rebalancing_required
    }

    // === Edits ===

    /// Set the current allocation, re-deriving deviation and the rebalancing flag.
    pub fn set_current(&mut self, current: f64) -> Result<(), ValidationError> {
        self.current = error::percent("current", current)?;
        self.rederive();
        Ok(())
    }

    /// Set the target allocation, re-deriving deviation and the rebalancing flag.
    pub fn set_target(&mut self, target: f64) -> Result<(), ValidationError> {
        self.target = error::percent("target", target)?;
        self.rederive();
        Ok(())
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct AllocationRecord {
    asset_class: AssetClass,
    target: f64,
    current: f64,
    #[serde(default)]
    notes: String,
}

#[cfg(feature = "serde")]
impl From<AllocationRecord> for Allocation {
    fn from(r: AllocationRecord) -> Self {
        Self::derived(r.asset_class, r.target, r.current, r.notes)
    }
}

/// Reconciliation of current allocation against strategic targets.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReconcileReport {
    pub entries: Vec<ReconcileEntry>,
    /// Sum of current allocations (should be ~100).
    pub total_current: f64,
    /// Sum of targets (should be 100).
    pub total_target: f64,
}

/// One row of a [`ReconcileReport`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReconcileEntry {
    pub asset_class: String,
    pub target: f64,
    pub current: f64,
    pub deviation: f64,
    pub percentage_deviation: f64,
    pub rebalancing_required: bool,
}

impl ReconcileReport {
    /// Build a report from allocation rows.
    pub fn from_allocations(allocations: &[Allocation]) -> Self {
        let entries: Vec<ReconcileEntry> = allocations
            .iter()
            .map(|a| ReconcileEntry {
                asset_class: a.asset_class.label().to_string(),
                target: a.target(),
                current: a.current(),
                deviation: a.deviation(),
                percentage_deviation: percentage_deviation(a.target(), a.current()),
                rebalancing_required: a.rebalancing_required(),
            })
            .collect();

        Self {
            total_current: allocations.iter().map(Allocation::current).sum(),
            total_target: allocations.iter().map(Allocation::target).sum(),
            entries,
        }
    }

    /// True if no row requires rebalancing.
    pub fn is_compliant(&self) -> bool {
        self.entries.iter().all(|e| !e.rebalancing_required)
    }

    /// Rows that require rebalancing.
    pub fn out_of_tolerance(&self) -> impl Iterator<Item = &ReconcileEntry> {
        self.entries.iter().filter(|e| e.rebalancing_required)
    }
}

impl std::fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ALLOCATION:")?;
        writeln!(
            f,
            "  {:30} {:>9} {:>9} {:>9}  {}",
            "Asset class", "Target%", "Current%", "Dev", "Rebalance"
        )?;
        for e in &self.entries {
            writeln!(
                f,
                "  {:30} {:>8.2}% {:>8.2}% {:>+9.2}  {}",
                e.asset_class,
                e.target,
                e.current,
                e.deviation,
                if e.rebalancing_required { "YES" } else { "no" },
            )?;
        }
        writeln!(
            f,
            "\n  Total: {:.1}% of {:.1}% target",
            self.total_current, self.total_target
        )
    }
}
