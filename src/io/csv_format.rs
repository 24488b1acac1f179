//! CSV format handling for trip records and settlement output
//!
//! This module centralizes all CSV format concerns, providing:
//! - Row structures for deserializing members, expenses and advances
//! - Conversion from CSV rows to domain types (`CsvRow`)
//! - Settlement and transfer output serialization
//!
//! All functions are pure (no I/O) for easy testing.
//!
//! # Field encodings
//!
//! - Timestamps are RFC 3339 (`2024-07-01T08:00:00Z`)
//! - `weights`: `member:weight;member:weight`
//! - `eligible`: empty for legacy expenses, `-` for an explicitly empty
//!   snapshot, otherwise `member;member;...`

use crate::types::{
    Advance, Category, Eligibility, Expense, Member, MemberRole, Settlement, SettlementError,
    SplitMethod, Transfer, WeightEntry,
};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Marker for an explicitly empty eligibility snapshot
pub const EMPTY_SNAPSHOT: &str = "-";

/// A deserializable CSV row that converts into a domain record
pub trait CsvRow: DeserializeOwned {
    /// Domain type produced by the conversion
    type Record;

    /// Validate field formats and build the domain record
    fn convert(self) -> Result<Self::Record, SettlementError>;
}

/// Member row: `id,name,role,joined_at,left_at,user_id`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvMember {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    pub joined_at: String,
    #[serde(default)]
    pub left_at: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Expense row:
/// `id,trip_id,amount,description,category,paid_by,split,weights,eligible,created_at`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvExpense {
    pub id: String,
    pub trip_id: String,
    pub amount: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub paid_by: String,
    pub split: String,
    #[serde(default)]
    pub weights: Option<String>,
    #[serde(default)]
    pub eligible: Option<String>,
    pub created_at: String,
}

/// Advance row: `id,trip_id,amount,description,paid_by,paid_to,created_at`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvAdvance {
    pub id: String,
    pub trip_id: String,
    pub amount: String,
    #[serde(default)]
    pub description: Option<String>,
    pub paid_by: String,
    pub paid_to: String,
    pub created_at: String,
}

impl CsvRow for CsvMember {
    type Record = Member;

    fn convert(self) -> Result<Member, SettlementError> {
        let role = match non_empty(self.role.as_deref()).map(str::to_lowercase).as_deref() {
            None | Some("member") => MemberRole::Member,
            Some("creator") => MemberRole::Creator,
            Some(other) => {
                return Err(SettlementError::parse(format!(
                    "Invalid role '{}' for member {}",
                    other, self.id
                )))
            }
        };

        let left_at = non_empty(self.left_at.as_deref())
            .map(|value| parse_timestamp(value, "left_at", &self.id))
            .transpose()?;

        Ok(Member {
            joined_at: parse_timestamp(&self.joined_at, "joined_at", &self.id)?,
            left_at,
            user_id: non_empty(self.user_id.as_deref()).map(str::to_string),
            role,
            name: self.name,
            id: self.id,
        })
    }
}

impl CsvRow for CsvExpense {
    type Record = Expense;

    fn convert(self) -> Result<Expense, SettlementError> {
        let amount = parse_amount(&self.amount, &self.id)?;

        let split = match self.split.to_lowercase().as_str() {
            "equal" => SplitMethod::Equal,
            "weight" | "weighted" => {
                SplitMethod::Weighted(parse_weights(self.weights.as_deref(), &self.id)?)
            }
            _ => {
                return Err(SettlementError::parse(format!(
                    "Invalid split method '{}' for expense {}",
                    self.split, self.id
                )))
            }
        };

        let eligibility = match non_empty(self.eligible.as_deref()) {
            None => Eligibility::Legacy,
            Some(EMPTY_SNAPSHOT) => Eligibility::Snapshot(Vec::new()),
            Some(list) => Eligibility::Snapshot(
                list.split(';')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
        };

        Ok(Expense {
            created_at: parse_timestamp(&self.created_at, "created_at", &self.id)?,
            amount,
            description: self.description.unwrap_or_default(),
            category: Category::parse(self.category.as_deref().unwrap_or_default()),
            split,
            eligibility,
            paid_by: self.paid_by,
            trip_id: self.trip_id,
            id: self.id,
        })
    }
}

impl CsvRow for CsvAdvance {
    type Record = Advance;

    fn convert(self) -> Result<Advance, SettlementError> {
        Ok(Advance {
            amount: parse_amount(&self.amount, &self.id)?,
            created_at: parse_timestamp(&self.created_at, "created_at", &self.id)?,
            description: self.description.unwrap_or_default(),
            paid_by: self.paid_by,
            paid_to: self.paid_to,
            trip_id: self.trip_id,
            id: self.id,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_amount(value: &str, record_id: &str) -> Result<Decimal, SettlementError> {
    Decimal::from_str(value.trim()).map_err(|_| {
        SettlementError::parse(format!("Invalid amount '{}' for {}", value, record_id))
    })
}

fn parse_timestamp(
    value: &str,
    field: &str,
    record_id: &str,
) -> Result<DateTime<Utc>, SettlementError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            SettlementError::parse(format!(
                "Invalid {} '{}' for {}: {}",
                field, value, record_id, e
            ))
        })
}

fn parse_weights(value: Option<&str>, expense_id: &str) -> Result<Vec<WeightEntry>, SettlementError> {
    let Some(list) = non_empty(value) else {
        return Ok(Vec::new());
    };

    list.split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| -> Result<WeightEntry, SettlementError> {
            let (member_id, weight) = pair.split_once(':').ok_or_else(|| {
                SettlementError::parse(format!(
                    "Invalid weight entry '{}' for expense {}",
                    pair, expense_id
                ))
            })?;
            let weight = Decimal::from_str(weight.trim()).map_err(|_| {
                SettlementError::parse(format!(
                    "Invalid weight '{}' for expense {}",
                    weight.trim(),
                    expense_id
                ))
            })?;
            Ok(WeightEntry::new(member_id.trim(), weight))
        })
        .collect()
}

/// Render an amount at the currency's minor unit
///
/// Rounds midpoint away from zero and never prints a negative zero.
pub fn format_amount(amount: Decimal, minor_units: u32) -> String {
    let rounded = amount.round_dp_with_strategy(minor_units, RoundingStrategy::MidpointAwayFromZero);
    let rounded = if rounded.is_zero() { Decimal::ZERO } else { rounded };
    format!("{:.*}", minor_units as usize, rounded)
}

/// Write settlements to CSV format
///
/// Writes rows in the given (member-list) order with columns:
/// member_id, member_name, total_paid, total_expenses, total_advances, balance
///
/// # Arguments
///
/// * `settlements` - Settlement rows to write
/// * `minor_units` - Decimal places used to render amounts
/// * `output` - Mutable reference to a writer for outputting CSV
pub fn write_settlements_csv(
    settlements: &[Settlement],
    minor_units: u32,
    output: &mut dyn Write,
) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record([
            "member_id",
            "member_name",
            "total_paid",
            "total_expenses",
            "total_advances",
            "balance",
        ])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for settlement in settlements {
        writer
            .write_record(&[
                settlement.member_id.clone(),
                settlement.member_name.clone(),
                format_amount(settlement.total_paid, minor_units),
                format_amount(settlement.total_expenses, minor_units),
                format_amount(settlement.total_advances, minor_units),
                format_amount(settlement.balance, minor_units),
            ])
            .map_err(|e| format!("Failed to write settlement record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write suggested transfers to CSV format with columns: from, to, amount
pub fn write_transfers_csv(
    transfers: &[Transfer],
    minor_units: u32,
    output: &mut dyn Write,
) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["from", "to", "amount"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for transfer in transfers {
        writer
            .write_record(&[
                transfer.from_member_id.clone(),
                transfer.to_member_id.clone(),
                format_amount(transfer.amount, minor_units),
            ])
            .map_err(|e| format!("Failed to write transfer record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
