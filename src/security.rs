//! Security-level positions.

use crate::error::{self, ValidationError};
use crate::types::{AssetClass, Region, Sector};

/// One holding in the portfolio.
///
/// Weights are percentages of total portfolio value (0–100). `deviation`
/// is derived from the two weights and is only changed through the weight
/// setters, so `deviation == current_weight - target_weight` always holds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", from = "SecurityRecord")
)]
pub struct Security {
    pub id: String,
    pub name: String,
    pub ticker: String,
    /// Descriptive instrument label ("T-Bill", "Government Bond", ...).
    /// Used for duration lookup; may be empty.
    pub instrument: String,
    pub asset_class: AssetClass,
    pub sector: Sector,
    pub geographic_exposure: Region,
    current_weight: f64,
    target_weight: f64,
    deviation: f64,
    market_value: f64,
    quantity: f64,
    purchase_price: f64,
    current_price: f64,
    pub notes: String,
    pub ips_compliant: bool,
}

impl Security {
    /// Create a holding with zero weights and no position data.
    pub fn new(
        ticker: impl Into<String>,
        asset_class: AssetClass,
        sector: Sector,
        geographic_exposure: Region,
    ) -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            ticker: ticker.into(),
            instrument: String::new(),
            asset_class,
            sector,
            geographic_exposure,
            current_weight: 0.0,
            target_weight: 0.0,
            deviation: 0.0,
            market_value: 0.0,
            quantity: 0.0,
            purchase_price: 0.0,
            current_price: 0.0,
            notes: String::new(),
            ips_compliant: true,
        }
    }

    /// Builder form of [`Security::set_weights`].
    pub fn with_weights(mut self, current: f64, target: f64) -> Result<Self, ValidationError> {
        self.set_weights(current, target)?;
        Ok(self)
    }

    /// Builder: set the instrument label.
    pub fn with_instrument(mut self, instrument: impl Into<String>) -> Self {
        self.instrument = instrument.into();
        self
    }

    /// Builder form of [`Security::set_market_value`].
    pub fn with_market_value(mut self, market_value: f64) -> Result<Self, ValidationError> {
        self.set_market_value(market_value)?;
        Ok(self)
    }

    /// Builder form of [`Security::set_position`].
    pub fn with_position(
        mut self,
        quantity: f64,
        purchase_price: f64,
        current_price: f64,
    ) -> Result<Self, ValidationError> {
        self.set_position(quantity, purchase_price, current_price)?;
        Ok(self)
    }

    // === Queries ===

    /// Current weight (percent).
    #[inline]
    pub fn current_weight(&self) -> f64 {
        self.current_weight
    }

    /// Target weight (percent).
    #[inline]
    pub fn target_weight(&self) -> f64 {
        self.target_weight
    }

    /// `current_weight - target_weight`.
    #[inline]
    pub fn deviation(&self) -> f64 {
        self.deviation
    }

    #[inline]
    pub fn market_value(&self) -> f64 {
        self.market_value
    }

    #[inline]
    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    #[inline]
    pub fn purchase_price(&self) -> f64 {
        self.purchase_price
    }

    #[inline]
    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    /// `(current_price - purchase_price) * quantity`.
    pub fn unrealized_gain(&self) -> f64 {
        (self.current_price - self.purchase_price) * self.quantity
    }

    // === Edits ===

    /// Set the current weight and re-derive the deviation.
    pub fn set_current_weight(&mut self, weight: f64) -> Result<(), ValidationError> {
        self.current_weight = error::percent("currentWeight", weight)?;
        self.deviation = self.current_weight - self.target_weight;
        Ok(())
    }

    /// Set the target weight and re-derive the deviation.
    pub fn set_target_weight(&mut self, weight: f64) -> Result<(), ValidationError> {
        self.target_weight = error::percent("targetWeight", weight)?;
        self.deviation = self.current_weight - self.target_weight;
        Ok(())
    }

    /// Set the market value. Must be finite.
    pub fn set_market_value(&mut self, market_value: f64) -> Result<(), ValidationError> {
        self.market_value = error::finite("marketValue", market_value)?;
        Ok(())
    }

    /// Set quantity and prices. All must be finite; either all are applied or none.
    pub fn set_position(
        &mut self,
        quantity: f64,
        purchase_price: f64,
        current_price: f64,
    ) -> Result<(), ValidationError> {
        let quantity = error::finite("quantity", quantity)?;
        let purchase_price = error::finite("purchasePrice", purchase_price)?;
        let current_price = error::finite("currentPrice", current_price)?;
        self.quantity = quantity;
        self.purchase_price = purchase_price;
        self.current_price = current_price;
        Ok(())
    }

    /// Set both weights. Either both are applied or neither is.
    pub fn set_weights(&mut self, current: f64, target: f64) -> Result<(), ValidationError> {
        let current = error::percent("currentWeight", current)?;
        let target = error::percent("targetWeight", target)?;
        self.current_weight = current;
        self.target_weight = target;
        self.deviation = current - target;
        Ok(())
    }
}

/// Wire form of [`Security`]: everything except the derived deviation.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecurityRecord {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    ticker: String,
    #[serde(default)]
    instrument: String,
    asset_class: AssetClass,
    sector: Sector,
    geographic_exposure: Region,
    current_weight: f64,
    target_weight: f64,
    #[serde(default)]
    market_value: f64,
    #[serde(default)]
    quantity: f64,
    #[serde(default)]
    purchase_price: f64,
    #[serde(default)]
    current_price: f64,
    #[serde(default)]
    notes: String,
    #[serde(default = "default_true")]
    ips_compliant: bool,
}

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}

#[cfg(feature = "serde")]
impl From<SecurityRecord> for Security {
    fn from(r: SecurityRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            ticker: r.ticker,
            instrument: r.instrument,
            asset_class: r.asset_class,
            sector: r.sector,
            geographic_exposure: r.geographic_exposure,
            current_weight: r.current_weight,
            target_weight: r.target_weight,
            deviation: r.current_weight - r.target_weight,
            market_value: r.market_value,
            quantity: r.quantity,
            purchase_price: r.purchase_price,
            current_price: r.current_price,
            notes: r.notes,
            ips_compliant: r.ips_compliant,
        }
    }
}
