//! # Domain Types
//!
//! The records that flow through the order engine.
//!
//! ## Type Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐                      ┌─────────────────────────┐  │
//! │  │  ProductRecord  │   + ValidQuantity    │      OrderRecord        │  │
//! │  │  ─────────────  │ ──────────────────►  │  ─────────────────────  │  │
//! │  │  code           │   Order Calculator   │  timestamp              │  │
//! │  │  name           │                      │  code        (copied)   │  │
//! │  │  unit_price     │                      │  product_name (copied)  │  │
//! │  │  min_order_unit │                      │  quantity               │  │
//! │  └─────────────────┘                      │  total_price            │  │
//! │   catalog snapshot                        └─────────────────────────┘  │
//! │   (read-only)                               immutable, no back-ref     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{
    validate_min_order_unit, validate_product_code, validate_product_name, validate_unit_price,
};

// =============================================================================
// Product Record
// =============================================================================

/// One entry of a catalog snapshot.
///
/// ## Invariants (enforced by [`ProductRecord::new`])
/// - `code` is non-empty and stored trimmed
/// - `name` is non-empty
/// - `unit_price` is non-negative
/// - `min_order_unit` is positive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Barcode digits (EAN-13, EAN-8, UPC-A, UPC-E).
    pub code: String,

    /// Display name shown to the operator and copied onto the order.
    pub name: String,

    /// Price per unit in minor currency units.
    pub unit_price: Money,

    /// Quantities must be positive multiples of this value.
    pub min_order_unit: i64,
}

impl ProductRecord {
    /// Builds a validated product record.
    ///
    /// ## Example
    /// ```rust
    /// use janorder_core::{Money, ProductRecord};
    ///
    /// let widget = ProductRecord::new(" 4901234567894 ", "Widget", Money::from_minor(120), 5).unwrap();
    /// assert_eq!(widget.code, "4901234567894");
    /// assert!(ProductRecord::new("4901234567894", "Widget", Money::from_minor(120), 0).is_err());
    /// ```
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money,
        min_order_unit: i64,
    ) -> Result<Self, ValidationError> {
        let code = code.into();
        let name = name.into();

        validate_product_code(&code)?;
        validate_product_name(&name)?;
        validate_unit_price(unit_price)?;
        validate_min_order_unit(min_order_unit)?;

        Ok(ProductRecord {
            code: code.trim().to_string(),
            name,
            unit_price,
            min_order_unit,
        })
    }
}

// =============================================================================
// Order Timestamp
// =============================================================================

/// Wall-clock instant of order finalization, truncated to whole seconds.
///
/// Serialized as `YYYY-MM-DD HH:MM:SS`, which sorts lexicographically in
/// the same order as chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderTimestamp(NaiveDateTime);

impl OrderTimestamp {
    /// Storage format shared by the order store and the display layer.
    pub const FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";

    /// Captures `at`, dropping sub-second precision.
    pub fn from_datetime(at: NaiveDateTime) -> Self {
        OrderTimestamp(at.with_nanosecond(0).unwrap_or(at))
    }

    /// Parses a timestamp previously produced by `Display`.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        NaiveDateTime::parse_from_str(s, Self::FORMAT).map(OrderTimestamp)
    }

    /// The underlying local date-time.
    pub fn as_datetime(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for OrderTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl Serialize for OrderTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// =============================================================================
// Order Record
// =============================================================================

/// A finalized order, ready for the order store.
///
/// Fields are private: an `OrderRecord` is only ever built by
/// [`finalize`](crate::order::finalize) and cannot be altered afterwards.
/// Serialization follows the persisted column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    timestamp: OrderTimestamp,
    code: String,
    product_name: String,
    quantity: i64,
    total_price: Money,
}

/// Column headers in persisted order.
pub const ORDER_COLUMNS: [&str; 5] = ["timestamp", "code", "productName", "quantity", "totalPrice"];

impl OrderRecord {
    pub(crate) fn new(
        timestamp: OrderTimestamp,
        code: String,
        product_name: String,
        quantity: i64,
        total_price: Money,
    ) -> Self {
        OrderRecord {
            timestamp,
            code,
            product_name,
            quantity,
            total_price,
        }
    }

    pub fn timestamp(&self) -> OrderTimestamp {
        self.timestamp
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn total_price(&self) -> Money {
        self.total_price
    }

    /// Renders the record as one tabular row, in [`ORDER_COLUMNS`] order.
    pub fn to_row(&self) -> [String; 5] {
        [
            self.timestamp.to_string(),
            self.code.clone(),
            self.product_name.clone(),
            self.quantity.to_string(),
            self.total_price.minor().to_string(),
        ]
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32, nano: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_nano_opt(h, m, s, nano)
            .unwrap()
    }

    #[test]
    fn test_product_record_trims_code() {
        let product = ProductRecord::new("  4901234567894\n", "Widget", Money::from_minor(120), 5).unwrap();
        assert_eq!(product.code, "4901234567894");
        assert_eq!(product.min_order_unit, 5);
    }

    #[test]
    fn test_product_record_rejects_bad_fields() {
        let price = Money::from_minor(120);
        assert!(ProductRecord::new("", "Widget", price, 5).is_err());
        assert!(ProductRecord::new("4901234567894", "  ", price, 5).is_err());
        assert!(ProductRecord::new("4901234567894", "Widget", Money::from_minor(-1), 5).is_err());
        assert!(ProductRecord::new("4901234567894", "Widget", price, -5).is_err());
        assert!(ProductRecord::new("4901234567894", "Widget", Money::zero(), 1).is_ok());
    }

    #[test]
    fn test_timestamp_truncates_and_formats() {
        let ts = OrderTimestamp::from_datetime(at(9, 5, 7, 999_000_000));
        assert_eq!(ts.to_string(), "2024-03-09 09:05:07");
        assert_eq!(OrderTimestamp::parse("2024-03-09 09:05:07").unwrap(), ts);
    }

    #[test]
    fn test_timestamp_string_order_matches_time_order() {
        let earlier = OrderTimestamp::from_datetime(at(9, 59, 59, 0));
        let later = OrderTimestamp::from_datetime(at(10, 0, 0, 0));
        assert!(earlier < later);
        assert!(earlier.to_string() < later.to_string());
    }

    #[test]
    fn test_order_record_row_and_json_follow_column_order() {
        let record = OrderRecord::new(
            OrderTimestamp::from_datetime(at(12, 0, 0, 0)),
            "4901234567894".to_string(),
            "Widget".to_string(),
            10,
            Money::from_minor(1200),
        );

        assert_eq!(
            record.to_row(),
            ["2024-03-09 12:00:00", "4901234567894", "Widget", "10", "1200"]
        );

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"timestamp":"2024-03-09 12:00:00","code":"4901234567894","productName":"Widget","quantity":10,"totalPrice":1200}"#
        );
        let keys: Vec<&str> = ORDER_COLUMNS.to_vec();
        let mut last = 0;
        for key in keys {
            let pos = json.find(&format!("\"{key}\"")).unwrap();
            assert!(pos >= last);
            last = pos;
        }
    }
}
