use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StatsError};

/// Raw recipient code that tags a record as a subset-category member.
pub const SUBSET_MARKER: &str = "0";

/// Column names a raw row must carry to become a [`Record`].
pub mod fields {
    pub const ITEMS: &str = "items";
    pub const TO: &str = "to";
    pub const DATE: &str = "date";
    pub const TOTAL: &str = "total";
    pub const SHIPPING: &str = "shipping";
    pub const SHIPPING_REFUND: &str = "shipping_refund";
    pub const GIFT: &str = "gift";
    pub const VAT: &str = "vat";
    pub const REFUND: &str = "refund";
    pub const PAYMENTS: &str = "payments";
}

/// Which monthly aggregate a query works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Every record of the month.
    All,
    /// Only records flagged as subset-category members.
    Subset,
}

impl From<bool> for Scope {
    fn from(subset: bool) -> Self {
        if subset {
            Scope::Subset
        } else {
            Scope::All
        }
    }
}

/// Who an order was sent to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipient {
    /// The reserved marker code; the order belongs to the subset category.
    SubsetMarker,
    /// Any other recipient, kept verbatim.
    Named(String),
}

impl Recipient {
    /// Classify a raw recipient code.
    pub fn from_code(code: &str) -> Self {
        if code == SUBSET_MARKER {
            Recipient::SubsetMarker
        } else {
            Recipient::Named(code.to_string())
        }
    }
}

/// A single validated purchase entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Free-text description of the ordered items.
    pub items: String,
    /// Recipient of the order.
    pub recipient: Recipient,
    /// Calendar date of the purchase.
    pub date: NaiveDate,
    /// Amount charged for the order.
    pub total: f64,
    pub shipping: f64,
    pub shipping_refund: f64,
    pub gift: f64,
    pub vat: f64,
    pub refund: f64,
    /// Free-text description of the payments.
    pub payments: String,
}

impl Record {
    /// Build a record from a mapping of raw string fields.
    ///
    /// Keys are the lower-case names in [`fields`]. The order identifier is
    /// not part of the mapping; callers extract it beforehand.
    pub fn from_fields(raw: &HashMap<String, String>) -> Result<Self> {
        let recipient = Recipient::from_code(require(raw, fields::TO)?);

        Ok(Self {
            items: require(raw, fields::ITEMS)?.to_string(),
            recipient,
            date: parse_date(require(raw, fields::DATE)?)?,
            total: amount(raw, fields::TOTAL)?,
            shipping: amount(raw, fields::SHIPPING)?,
            shipping_refund: amount(raw, fields::SHIPPING_REFUND)?,
            gift: amount(raw, fields::GIFT)?,
            vat: amount(raw, fields::VAT)?,
            refund: amount(raw, fields::REFUND)?,
            payments: require(raw, fields::PAYMENTS)?.to_string(),
        })
    }

    /// `true` when the record belongs to the subset category.
    pub fn is_subset_member(&self) -> bool {
        self.recipient == Recipient::SubsetMarker
    }
}

/// Parse a strict `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern =
        PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("regex is valid"));

    let trimmed = raw.trim();
    if !pattern.is_match(trimmed) {
        return Err(StatsError::InvalidDate(raw.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| StatsError::InvalidDate(raw.to_string()))
}

/// Parse a locale-formatted amount, `,` being the decimal separator.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let normalised = raw.trim().replace(',', ".");
    normalised.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn require<'a>(raw: &'a HashMap<String, String>, key: &str) -> Result<&'a str> {
    raw.get(key)
        .map(String::as_str)
        .ok_or_else(|| StatsError::MissingField(key.to_string()))
}

fn amount(raw: &HashMap<String, String>, key: &str) -> Result<f64> {
    let value = require(raw, key)?;
    parse_amount(value).ok_or_else(|| StatsError::InvalidAmount {
        field: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn raw_fields(date: &str, total: &str, to: &str) -> HashMap<String, String> {
        [
            (fields::ITEMS, "Book"),
            (fields::TO, to),
            (fields::DATE, date),
            (fields::TOTAL, total),
            (fields::SHIPPING, "0,00"),
            (fields::SHIPPING_REFUND, "0,00"),
            (fields::GIFT, "0,00"),
            (fields::VAT, "1,50"),
            (fields::REFUND, "0,00"),
            (fields::PAYMENTS, "Visa ending in 1234"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    /// Record dated `date` with the given total, optionally subset-tagged.
    pub(crate) fn record(date: &str, total: f64, subset: bool) -> Record {
        let to = if subset { SUBSET_MARKER } else { "Jane Doe" };
        let total = format!("{total:.2}").replace('.', ",");
        Record::from_fields(&raw_fields(date, &total, to)).unwrap()
    }

    // ── from_fields ───────────────────────────────────────────────────────────

    #[test]
    fn test_from_fields_parses_comma_amounts() {
        let rec = Record::from_fields(&raw_fields("2021-03-14", "23,99", "Jane Doe")).unwrap();
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2021, 3, 14).unwrap());
        assert!((rec.total - 23.99).abs() < 1e-9);
        assert!((rec.vat - 1.5).abs() < 1e-9);
        assert_eq!(rec.recipient, Recipient::Named("Jane Doe".to_string()));
        assert!(!rec.is_subset_member());
    }

    #[test]
    fn test_from_fields_subset_marker() {
        let rec = Record::from_fields(&raw_fields("2021-03-14", "9,99", "0")).unwrap();
        assert_eq!(rec.recipient, Recipient::SubsetMarker);
        assert!(rec.is_subset_member());
    }

    #[test]
    fn test_from_fields_numeric_recipient_is_not_marker() {
        let rec = Record::from_fields(&raw_fields("2021-03-14", "9,99", "00")).unwrap();
        assert_eq!(rec.recipient, Recipient::Named("00".to_string()));
    }

    #[test]
    fn test_from_fields_negative_refund() {
        let mut raw = raw_fields("2021-03-14", "9,99", "Jane Doe");
        raw.insert(fields::REFUND.to_string(), "-4,50".to_string());
        let rec = Record::from_fields(&raw).unwrap();
        assert!((rec.refund + 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_from_fields_missing_recipient() {
        let mut raw = raw_fields("2021-03-14", "9,99", "Jane Doe");
        raw.remove(fields::TO);
        let err = Record::from_fields(&raw).unwrap_err();
        assert!(matches!(err, StatsError::MissingField(ref f) if f == "to"));
    }

    #[test]
    fn test_from_fields_malformed_amount() {
        let err = Record::from_fields(&raw_fields("2021-03-14", "12,3x", "Jane Doe")).unwrap_err();
        assert!(matches!(err, StatsError::InvalidAmount { ref field, .. } if field == "total"));
    }

    #[test]
    fn test_from_fields_rejects_infinite_amount() {
        let err = Record::from_fields(&raw_fields("2021-03-14", "inf", "Jane Doe")).unwrap_err();
        assert!(err.is_parse_error());
    }

    // ── parse_date ────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_date_strict_pattern() {
        assert!(parse_date("2021-01-05").is_ok());
        assert!(parse_date("2021-1-5").is_err());
        assert!(parse_date("05.01.2021").is_err());
        assert!(parse_date("2021-01-05T10:00:00").is_err());
    }

    #[test]
    fn test_parse_date_rejects_impossible_day() {
        assert!(matches!(parse_date("2021-02-30"), Err(StatsError::InvalidDate(_))));
    }

    // ── parse_amount ──────────────────────────────────────────────────────────

    #[test]
    fn test_parse_amount_variants() {
        assert_eq!(parse_amount("12,50"), Some(12.5));
        assert_eq!(parse_amount(" 3.25 "), Some(3.25));
        assert_eq!(parse_amount("-0,99"), Some(-0.99));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("NaN"), None);
    }

    #[test]
    fn test_scope_from_bool() {
        assert_eq!(Scope::from(false), Scope::All);
        assert_eq!(Scope::from(true), Scope::Subset);
    }
}
