//! Trip container type
//!
//! Only the currency (for rounding at output boundaries) and the status
//! (which gates mutation, never computation) matter to the engine.

use super::error::SettlementError;
use serde::{Deserialize, Serialize};

/// Trip identifier
pub type TripId = String;

/// ISO 4217 currencies without a minor unit
const ZERO_DECIMAL_CURRENCIES: &[&str] = &[
    "BIF", "CLP", "DJF", "GNF", "ISK", "JPY", "KMF", "KRW", "PYG", "RWF", "UGX", "VND", "VUV",
    "XAF", "XOF", "XPF",
];

/// Default minor-unit precision of a currency code
///
/// Zero for the currencies listed above, two for everything else.
pub fn minor_units_for(currency: &str) -> u32 {
    let code = currency.trim().to_ascii_uppercase();
    if ZERO_DECIMAL_CURRENCIES.contains(&code.as_str()) {
        0
    } else {
        2
    }
}

/// Trip lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    /// Expenses and advances may still be added or deleted
    Open,
    /// Archived: all records are immutable
    Closed,
}

/// A bounded travel event with its own member list and currency
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub id: TripId,

    /// ISO 4217 currency code
    pub currency: String,

    /// Number of decimal places of the currency's minor unit
    /// (2 for EUR, 0 for VND or JPY)
    pub minor_units: u32,

    pub status: TripStatus,
}

impl Trip {
    pub fn new(id: impl Into<TripId>, currency: impl Into<String>, minor_units: u32) -> Self {
        Trip {
            id: id.into(),
            currency: currency.into(),
            minor_units,
            status: TripStatus::Open,
        }
    }

    /// Create an open trip with the currency's default precision
    pub fn with_currency(id: impl Into<TripId>, currency: impl Into<String>) -> Self {
        let currency = currency.into();
        let minor_units = minor_units_for(&currency);
        Trip::new(id, currency, minor_units)
    }

    /// Check that the trip still accepts mutations
    ///
    /// # Errors
    ///
    /// Returns `SettlementError::TripClosed` when the trip is archived.
    pub fn ensure_open(&self) -> Result<(), SettlementError> {
        match self.status {
            TripStatus::Open => Ok(()),
            TripStatus::Closed => Err(SettlementError::trip_closed(&self.id)),
        }
    }
}
