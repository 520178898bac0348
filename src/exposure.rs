//! Exposure rollups and concentration statistics.
//!
//! Security weights are summed per category label. Buckets keep the order
//! in which their label first appears, so reports built from them are
//! deterministic. Labels are never validated here: an unknown or empty
//! label simply forms its own bucket.

use rustc_hash::FxHashMap;

use crate::security::Security;

/// Number of holdings counted by [`Concentration::top_ten_concentration`].
pub const TOP_N: usize = 10;

/// Category label → summed current weight (percent), in first-seen order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Exposures {
    buckets: Vec<(String, f64)>,
}

impl Exposures {
    /// Sum `(label, weight)` pairs into buckets.
    pub fn from_weights<'a>(items: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        let mut index: FxHashMap<&'a str, usize> = FxHashMap::default();
        let mut buckets: Vec<(String, f64)> = Vec::new();

        for (label, weight) in items {
            match index.get(label) {
                Some(&i) => buckets[i].1 += weight,
                None => {
                    index.insert(label, buckets.len());
                    buckets.push((label.to_string(), weight));
                }
            }
        }

        Self { buckets }
    }

    /// Total weight of `label`, if any security carries it.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.buckets
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, w)| *w)
    }

    /// Iterate `(label, weight)` in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.buckets.iter().map(|(l, w)| (l.as_str(), *w))
    }

    /// Buckets strictly above `limit`.
    pub fn above(&self, limit: f64) -> impl Iterator<Item = (&str, f64)> {
        self.iter().filter(move |(_, w)| *w > limit)
    }

    /// The largest bucket. Ties resolve to the first-seen label.
    pub fn largest(&self) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for (label, w) in self.iter() {
            if best.is_none_or(|(_, bw)| w > bw) {
                best = Some((label, w));
            }
        }
        best
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Exposures {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for (label, weight) in &self.buckets {
            map.serialize_entry(label, weight)?;
        }
        map.end()
    }
}

/// Weight per asset class.
pub fn asset_class_exposures(securities: &[Security]) -> Exposures {
    Exposures::from_weights(
        securities
            .iter()
            .map(|s| (s.asset_class.label(), s.current_weight())),
    )
}

/// Weight per sector.
pub fn sector_exposures(securities: &[Security]) -> Exposures {
    Exposures::from_weights(
        securities
            .iter()
            .map(|s| (s.sector.label(), s.current_weight())),
    )
}

/// Weight per geographic region.
pub fn geographic_exposures(securities: &[Security]) -> Exposures {
    Exposures::from_weights(
        securities
            .iter()
            .map(|s| (s.geographic_exposure.label(), s.current_weight())),
    )
}

/// Concentration statistics over security weights.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Concentration {
    /// Largest single weight (percent).
    pub max_single_security: f64,
    /// Herfindahl-Hirschman Index, `Σ(w/100)² × 10000`. 10000 = one holding.
    pub herfindahl_index: f64,
    /// Sum of the ten largest weights (percent).
    pub top_ten_concentration: f64,
}

/// Compute concentration statistics. All zero for an empty list.
pub fn concentration(securities: &[Security]) -> Concentration {
    if securities.is_empty() {
        return Concentration::default();
    }

    let mut weights: Vec<f64> = securities.iter().map(Security::current_weight).collect();

    let herfindahl_index = weights.iter().map(|w| (w / 100.0).powi(2)).sum::<f64>() * 10_000.0;

    weights.sort_by(|a, b| b.total_cmp(a));
    let max_single_security = weights[0];
    let top_ten_concentration = weights.iter().take(TOP_N).sum();

    Concentration {
        max_single_security,
        herfindahl_index,
        top_ten_concentration,
    }
}

/// Sum of current weights (should be ~100).
pub fn total_weight(securities: &[Security]) -> f64 {
    securities.iter().map(Security::current_weight).sum()
}

/// Mean current weight. Zero for an empty list.
pub fn average_weight(securities: &[Security]) -> f64 {
    if securities.is_empty() {
        return 0.0;
    }
    total_weight(securities) / securities.len() as f64
}

/// All rollups for one security list.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct ExposureSummary {
    pub asset_classes: Exposures,
    pub sectors: Exposures,
    pub regions: Exposures,
    pub concentration: Concentration,
    pub total_weight: f64,
}

impl ExposureSummary {
    pub fn from_securities(securities: &[Security]) -> Self {
        Self {
            asset_classes: asset_class_exposures(securities),
            sectors: sector_exposures(securities),
            regions: geographic_exposures(securities),
            concentration: concentration(securities),
            total_weight: total_weight(securities),
        }
    }
}

impl std::fmt::Display for ExposureSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn section(
            f: &mut std::fmt::Formatter<'_>,
            title: &str,
            exposures: &Exposures,
        ) -> std::fmt::Result {
            writeln!(f, "  {title}:")?;
            for (label, weight) in exposures.iter() {
                let label = if label.is_empty() { "(unlabelled)" } else { label };
                writeln!(f, "    {label:30} {weight:>8.2}%")?;
            }
            Ok(())
        }

        writeln!(f, "EXPOSURES:")?;
        section(f, "Asset class", &self.asset_classes)?;
        section(f, "Sector", &self.sectors)?;
        section(f, "Region", &self.regions)?;
        writeln!(f, "  Total weight:     {:>8.2}%", self.total_weight)?;
        writeln!(
            f,
            "  Largest holding:  {:>8.2}%",
            self.concentration.max_single_security
        )?;
        writeln!(
            f,
            "  Top {TOP_N} share:     {:>8.2}%",
            self.concentration.top_ten_concentration
        )?;
        writeln!(
            f,
            "  HHI:              {:>8.0}",
            self.concentration.herfindahl_index
        )
    }
}
