//! Tactical adjustment audit records.

use chrono::NaiveDate;

use crate::error::{self, ValidationError};

/// Workflow stage of a tactical adjustment.
///
/// Advisory metadata for the audit trail. The expected order is
/// Proposed → Approved → Active → Completed, and completing an adjustment is
/// expected to bring its tactical deviation back to zero. Nothing in this
/// crate moves a record between stages; the investment committee workflow
/// that owns the record does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AdjustmentStage {
    #[default]
    Proposed,
    Approved,
    Active,
    Completed,
}

impl AdjustmentStage {
    /// The stage that follows this one, or `None` once completed.
    pub fn next(self) -> Option<AdjustmentStage> {
        match self {
            AdjustmentStage::Proposed => Some(AdjustmentStage::Approved),
            AdjustmentStage::Approved => Some(AdjustmentStage::Active),
            AdjustmentStage::Active => Some(AdjustmentStage::Completed),
            AdjustmentStage::Completed => None,
        }
    }
}

/// A deliberate, time-bounded deviation from the strategic allocation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct TacticalAdjustment {
    pub id: String,
    pub date: NaiveDate,
    /// What was done, e.g. "Increased Fixed Income by 3%".
    pub tactical_move: String,
    /// Signed deviation from strategic target, in percentage points.
    deviation_percent: f64,
    /// Market signal or rationale.
    pub market_signal: String,
    /// Intended holding period, free text ("2 weeks").
    pub duration: String,
    pub approved_by: String,
    pub notes: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stage: AdjustmentStage,
}

impl TacticalAdjustment {
    /// Create an empty proposed adjustment dated `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: String::new(),
            date,
            tactical_move: String::new(),
            deviation_percent: 0.0,
            market_signal: String::new(),
            duration: String::new(),
            approved_by: String::new(),
            notes: String::new(),
            stage: AdjustmentStage::Proposed,
        }
    }

    /// Builder: describe the move and its signed deviation.
    pub fn with_move(
        mut self,
        tactical_move: impl Into<String>,
        deviation_percent: f64,
    ) -> Result<Self, ValidationError> {
        self.set_deviation_percent(deviation_percent)?;
        self.tactical_move = tactical_move.into();
        Ok(self)
    }

    #[inline]
    pub fn deviation_percent(&self) -> f64 {
        self.deviation_percent
    }

    /// Set the signed deviation. Must be finite.
    pub fn set_deviation_percent(&mut self, value: f64) -> Result<(), ValidationError> {
        self.deviation_percent = error::finite("deviationPercent", value)?;
        Ok(())
    }
}

/// Sum of absolute tactical deviations.
pub fn total_tactical_deviation(adjustments: &[TacticalAdjustment]) -> f64 {
    adjustments.iter().map(|t| t.deviation_percent.abs()).sum()
}

/// Largest absolute tactical deviation (0 if none).
pub fn max_tactical_deviation(adjustments: &[TacticalAdjustment]) -> f64 {
    adjustments
        .iter()
        .map(|t| t.deviation_percent.abs())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    #[test]
    fn stage_order() {
        let mut stage = AdjustmentStage::default();
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            seen.push(next);
            stage = next;
        }
        assert_eq!(
            seen,
            vec![
                AdjustmentStage::Proposed,
                AdjustmentStage::Approved,
                AdjustmentStage::Active,
                AdjustmentStage::Completed,
            ]
        );
    }

    #[test]
    fn totals_use_absolute_values() {
        let adjustments = vec![
            TacticalAdjustment::new(date())
                .with_move("Increased Fixed Income by 3%", 3.0)
                .unwrap(),
            TacticalAdjustment::new(date())
                .with_move("Trimmed domestic equities", -2.5)
                .unwrap(),
        ];
        assert_eq!(total_tactical_deviation(&adjustments), 5.5);
        assert_eq!(max_tactical_deviation(&adjustments), 3.0);
        assert_eq!(max_tactical_deviation(&[]), 0.0);
    }

    #[test]
    fn non_finite_deviation_rejected() {
        assert!(
            TacticalAdjustment::new(date())
                .with_move("bad", f64::NAN)
                .is_err()
        );
    }
}
