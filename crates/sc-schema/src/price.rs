use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// The unit a price is quoted per.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PriceUnit {
    Year,
    Month,
    Hour,
    Gib,
    Gb,
    #[serde(rename = "GB_MONTH")]
    GbMonth,
}

/// A tier bound: either a finite number or the literal `"Infinity"`/
/// `"-Infinity"` JSON lacks a native representation for (§9, Design Notes).
///
/// All price-tier I/O goes through this codec so the in-memory numeric
/// infinities never leak into a JSON document as a bare float, and the
/// on-disk string never leaks into arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TierBound {
    Finite(f64),
    PositiveInfinity,
    NegativeInfinity,
}

impl TierBound {
    pub fn as_f64(self) -> f64 {
        match self {
            TierBound::Finite(v) => v,
            TierBound::PositiveInfinity => f64::INFINITY,
            TierBound::NegativeInfinity => f64::NEG_INFINITY,
        }
    }

    pub fn from_f64(v: f64) -> Self {
        if v == f64::INFINITY {
            TierBound::PositiveInfinity
        } else if v == f64::NEG_INFINITY {
            TierBound::NegativeInfinity
        } else {
            TierBound::Finite(v)
        }
    }
}

impl Serialize for TierBound {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TierBound::Finite(v) => serializer.serialize_f64(*v),
            TierBound::PositiveInfinity => serializer.serialize_str("Infinity"),
            TierBound::NegativeInfinity => serializer.serialize_str("-Infinity"),
        }
    }
}

struct TierBoundVisitor;

impl<'de> Visitor<'de> for TierBoundVisitor {
    type Value = TierBound;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or the string \"Infinity\"/\"-Infinity\"")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
        Ok(TierBound::Finite(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
        Ok(TierBound::Finite(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
        Ok(TierBound::Finite(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
        match v {
            "Infinity" => Ok(TierBound::PositiveInfinity),
            "-Infinity" => Ok(TierBound::NegativeInfinity),
            other => Err(E::custom(format!("invalid tier bound string `{other}`"))),
        }
    }
}

impl<'de> Deserialize<'de> for TierBound {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TierBoundVisitor)
    }
}

/// `float_inf_to_str` (§4.8): map a plain numeric bound (possibly ±∞) to the
/// wire-safe form.
pub fn float_inf_to_str(x: f64) -> String {
    if x == f64::INFINITY {
        "Infinity".to_string()
    } else if x == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        x.to_string()
    }
}

/// One tier of a piecewise-constant tiered price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTier {
    pub lower: TierBound,
    pub upper: TierBound,
    pub price: f64,
}

/// Validate invariant 6: tiers sorted by `lower` ascending, and contiguous
/// (`upper` of tier i equals `lower` of tier i+1) when non-empty.
pub fn validate_price_tiers(table: &'static str, tiers: &[PriceTier]) -> Result<()> {
    for pair in tiers.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if a.lower.as_f64() > b.lower.as_f64() {
            return Err(Error::MalformedPriceTiers {
                table,
                reason: "tiers are not sorted by `lower` ascending".into(),
            });
        }
        if a.upper.as_f64() != b.lower.as_f64() {
            return Err(Error::MalformedPriceTiers {
                table,
                reason: format!(
                    "tier gap: upper={:?} does not connect to next lower={:?}",
                    a.upper, b.lower
                ),
            });
        }
    }
    Ok(())
}

/// The price fields shared by ServerPrice, StoragePrice, TrafficPrice and
/// Ipv4Price (§3.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceFields {
    pub unit: PriceUnit,
    pub price: f64,
    #[serde(default)]
    pub price_upfront: f64,
    #[serde(default)]
    pub price_tiered: Vec<PriceTier>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl PriceFields {
    /// Data-quality guard (§7): a negative price is treated as a validation
    /// failure, not silently accepted.
    pub fn validate(&self, table: &'static str) -> Result<()> {
        if self.price < 0.0 {
            return Err(Error::OutOfRange {
                table,
                field: "price",
                reason: format!("price must be non-negative, got {}", self.price),
            });
        }
        if self.price_upfront < 0.0 {
            return Err(Error::OutOfRange {
                table,
                field: "price_upfront",
                reason: format!("price_upfront must be non-negative, got {}", self.price_upfront),
            });
        }
        validate_price_tiers(table, &self.price_tiered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinity_round_trips_through_json() {
        let tiers = vec![
            PriceTier { lower: TierBound::Finite(0.0), upper: TierBound::Finite(100.0), price: 0.1 },
            PriceTier { lower: TierBound::Finite(100.0), upper: TierBound::PositiveInfinity, price: 0.05 },
        ];
        let json = serde_json::to_string(&tiers).unwrap();
        assert!(json.contains("\"Infinity\""));
        let back: Vec<PriceTier> = serde_json::from_str(&json).unwrap();
        assert_eq!(tiers, back);
    }

    #[test]
    fn rejects_unsorted_tiers() {
        let tiers = vec![
            PriceTier { lower: TierBound::Finite(100.0), upper: TierBound::PositiveInfinity, price: 0.05 },
            PriceTier { lower: TierBound::Finite(0.0), upper: TierBound::Finite(100.0), price: 0.1 },
        ];
        assert!(validate_price_tiers("storage_price", &tiers).is_err());
    }

    #[test]
    fn rejects_disconnected_tiers() {
        let tiers = vec![
            PriceTier { lower: TierBound::Finite(0.0), upper: TierBound::Finite(50.0), price: 0.1 },
            PriceTier { lower: TierBound::Finite(100.0), upper: TierBound::PositiveInfinity, price: 0.05 },
        ];
        assert!(validate_price_tiers("storage_price", &tiers).is_err());
    }
}
