//! Core types: category labels and status enums.
//!
//! Categories (asset class, sector, region) are closed enums with an
//! `Other(String)` fallback. Parsing is total, so a free-form label is never
//! rejected and never silently folded into a known bucket.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

macro_rules! category {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// Any label outside the known set, trimmed.
            ///
            /// Build it through [`Self::other`] or [`Self::from_label`]. A
            /// hand-built `Other` holding a known label is not canonical: it
            /// compares unequal to the known variant and is folded into it on
            /// the next parse or deserialize.
            Other(String),
        }

        impl $name {
            /// Every known variant, in declaration order.
            pub const KNOWN: &'static [$name] = &[$($name::$variant),+];

            /// Display label. This is also the persisted form.
            pub fn label(&self) -> &str {
                match self {
                    $( $name::$variant => $label, )+
                    $name::Other(label) => label,
                }
            }

            /// Parse a label (case-insensitive, surrounding whitespace ignored).
            ///
            /// Unknown labels, including the empty string, become `Other`.
            pub fn from_label(label: &str) -> Self {
                let trimmed = label.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($label)
                        $(|| trimmed.eq_ignore_ascii_case($alias))*
                    {
                        return $name::$variant;
                    }
                )+
                $name::Other(trimmed.to_string())
            }

            /// Canonical constructor for a free-form label. Known labels map
            /// to their variant, so `other("Banking")` is never `Other`.
            pub fn other(label: &str) -> Self {
                Self::from_label(label)
            }

            /// `false` for the `Other` fallback.
            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Other(_))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl From<&str> for $name {
            fn from(label: &str) -> Self {
                Self::from_label(label)
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::from_label(s))
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let label = <String as serde::Deserialize>::deserialize(deserializer)?;
                Ok(Self::from_label(&label))
            }
        }
    };
}

category! {
    /// Strategic asset class of a holding or allocation row.
    AssetClass {
        FixedIncome => "Fixed Income",
        DomesticEquities => "Domestic Equities",
        RegionalEquities => "Regional (EAC/SADC) Equities" | "Regional Equities",
        CashEquivalents => "Cash & Cash Equivalents" | "Cash & Equivalents",
    }
}

category! {
    /// Issuer sector.
    Sector {
        Government => "Government",
        Banking => "Banking",
        FinancialServices => "Financial Services",
        Insurance => "Insurance",
        Telecommunications => "Telecommunications",
        Manufacturing => "Manufacturing",
        ConsumerGoods => "Consumer Goods",
        Energy => "Energy",
        Mining => "Mining",
        RealEstate => "Real Estate",
        Agriculture => "Agriculture",
    }
}

category! {
    /// Geographic exposure of a holding.
    Region {
        Tanzania => "Tanzania",
        Kenya => "Kenya",
        Uganda => "Uganda",
        Rwanda => "Rwanda",
        Eac => "EAC" | "East African Community",
        Sadc => "SADC",
    }
}

/// Status of a row in the risk-metric table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetricStatus {
    Compliant,
    Warning,
    Breach,
}

impl fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricStatus::Compliant => f.pad("Compliant"),
            MetricStatus::Warning => f.pad("Warning"),
            MetricStatus::Breach => f.pad("Breach"),
        }
    }
}

/// Status of a liquidity item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LiquidityStatus {
    Adequate,
    Warning,
    Critical,
}

impl fmt::Display for LiquidityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiquidityStatus::Adequate => f.pad("Adequate"),
            LiquidityStatus::Warning => f.pad("Warning"),
            LiquidityStatus::Critical => f.pad("Critical"),
        }
    }
}

/// Coarse risk bucket from [`crate::metrics::risk_assessment`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => f.pad("Low"),
            RiskLevel::Medium => f.pad("Medium"),
            RiskLevel::High => f.pad("High"),
        }
    }
}
