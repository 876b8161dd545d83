//! Storage Pricing
//!
//! Tiered per-unit rates for storage quota purchases. Rates are in whole
//! dollars; amounts handed to the gateway are in cents.

use serde::{Deserialize, Serialize};

use crate::error::{BillingError, Result};

/// Cents per dollar
pub const MINOR_UNITS_PER_MAJOR: u64 = 100;

/// Largest quantity whose price still fits a signed 64-bit cent amount
/// at the most expensive rate.
pub const MAX_STORAGE_QUANTITY: u64 = (i64::MAX as u64) / (4 * MINOR_UNITS_PER_MAJOR);

/// One step of the rate table. `up_to` is inclusive; `None` is unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateTier {
    pub up_to: Option<u64>,
    pub unit_rate: u64,
}

/// Ordered cheapest-last. Boundary values belong to the lower tier.
pub const RATE_TIERS: &[RateTier] = &[
    RateTier { up_to: Some(10), unit_rate: 4 },
    RateTier { up_to: Some(100), unit_rate: 2 },
    RateTier { up_to: None, unit_rate: 1 },
];

/// Requested storage units, validated to be priceable
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct StorageQuantity(u64);

impl StorageQuantity {
    pub fn new(units: u64) -> Result<Self> {
        if units > MAX_STORAGE_QUANTITY {
            return Err(BillingError::InvalidQuantity(format!(
                "{units} exceeds the maximum of {MAX_STORAGE_QUANTITY}"
            )));
        }
        Ok(Self(units))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for StorageQuantity {
    type Error = BillingError;

    fn try_from(units: u64) -> Result<Self> {
        Self::new(units)
    }
}

impl From<StorageQuantity> for u64 {
    fn from(quantity: StorageQuantity) -> Self {
        quantity.0
    }
}

impl std::fmt::Display for StorageQuantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Amount in the currency's minor unit (cents)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonetaryAmount(u64);

impl MonetaryAmount {
    pub const ZERO: Self = Self(0);

    pub const fn from_minor_units(cents: u64) -> Self {
        Self(cents)
    }

    pub fn minor_units(self) -> u64 {
        self.0
    }

    /// Amount as the gateway's signed integer
    pub fn to_i64(self) -> Result<i64> {
        i64::try_from(self.0)
            .map_err(|_| BillingError::InvalidQuantity(format!("amount {} is out of range", self.0)))
    }
}

impl std::fmt::Display for MonetaryAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "${}.{:02}",
            self.0 / MINOR_UNITS_PER_MAJOR,
            self.0 % MINOR_UNITS_PER_MAJOR
        )
    }
}

/// Per-unit rate (whole dollars) for a quantity
pub fn unit_rate(quantity: StorageQuantity) -> u64 {
    RATE_TIERS
        .iter()
        .find(|tier| tier.up_to.is_none_or(|limit| quantity.0 <= limit))
        .map_or(1, |tier| tier.unit_rate)
}

/// Price of `quantity` storage units in cents
pub fn compute_amount(quantity: StorageQuantity) -> MonetaryAmount {
    // Bounded by MAX_STORAGE_QUANTITY, cannot overflow.
    MonetaryAmount(unit_rate(quantity) * quantity.0 * MINOR_UNITS_PER_MAJOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(units: u64) -> u64 {
        compute_amount(StorageQuantity::new(units).unwrap()).minor_units()
    }

    #[test]
    fn test_zero_is_free() {
        assert_eq!(amount(0), 0);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(amount(10), 4000);
        assert_eq!(amount(11), 2200);
        assert_eq!(amount(100), 20000);
        assert_eq!(amount(101), 10100);
    }

    #[test]
    fn test_each_tier_rate() {
        for q in 0..=10 {
            assert_eq!(amount(q), 4 * q * 100);
        }
        for q in 11..=100 {
            assert_eq!(amount(q), 2 * q * 100);
        }
        for q in [101, 500, 10_000, 1_000_000] {
            assert_eq!(amount(q), q * 100);
        }
    }

    #[test]
    fn test_scratch_example_amount() {
        assert_eq!(amount(21), 4200);
    }

    #[test]
    fn test_largest_quantity_fits_gateway_amount() {
        let max = StorageQuantity::new(MAX_STORAGE_QUANTITY).unwrap();
        assert!(compute_amount(max).to_i64().is_ok());
        assert!(StorageQuantity::new(MAX_STORAGE_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_display_in_dollars() {
        assert_eq!(MonetaryAmount::from_minor_units(4200).to_string(), "$42.00");
        assert_eq!(MonetaryAmount::from_minor_units(5).to_string(), "$0.05");
    }
}
