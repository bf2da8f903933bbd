//! # Order Calculator
//!
//! Turns a resolved product and a validated quantity into an immutable
//! [`OrderRecord`].
//!
//! ## Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ProductRecord { Widget, unit_price 120, min_order_unit 5 }             │
//! │  ValidQuantity(10)                                                      │
//! │  OrderTimestamp 2024-03-09 12:00:00                                     │
//! │        │                                                                │
//! │        ▼  total = 120 × 10 (checked)                                    │
//! │  OrderRecord { 2024-03-09 12:00:00, 4901..., Widget, 10, 1200 }         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Code and name are copied so the record never refers back to the catalog.
//! The code is stored trimmed, the same key the matcher compared against.

use crate::error::{OrderError, OrderResult};
use crate::types::{OrderRecord, OrderTimestamp, ProductRecord};
use crate::validation::ValidQuantity;

/// Builds the order record for `quantity` units of `product` at `now`.
///
/// Pure: the same inputs always give the same record.
///
/// ## Errors
/// [`OrderError::TotalOverflow`] when `unit_price × quantity` does not fit.
pub fn finalize(
    product: &ProductRecord,
    quantity: ValidQuantity,
    now: OrderTimestamp,
) -> OrderResult<OrderRecord> {
    let total_price = product
        .unit_price
        .checked_mul_quantity(quantity.get())
        .ok_or(OrderError::TotalOverflow {
            quantity: quantity.get(),
            unit_price: product.unit_price,
        })?;

    Ok(OrderRecord::new(
        now,
        product.code.trim().to_string(),
        product.name.clone(),
        quantity.get(),
        total_price,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::validation::validate_quantity;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn noon() -> OrderTimestamp {
        OrderTimestamp::from_datetime(
            NaiveDate::from_ymd_opt(2024, 3, 9)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_finalize_widget_order() {
        let widget = ProductRecord::new("4901234567894", "Widget", Money::from_minor(120), 5).unwrap();
        let quantity = validate_quantity(10, widget.min_order_unit).unwrap();

        let record = finalize(&widget, quantity, noon()).unwrap();

        assert_eq!(record.code(), "4901234567894");
        assert_eq!(record.product_name(), "Widget");
        assert_eq!(record.quantity(), 10);
        assert_eq!(record.total_price(), Money::from_minor(1200));
        assert_eq!(record.timestamp().to_string(), "2024-03-09 12:00:00");
    }

    #[test]
    fn test_finalize_is_deterministic() {
        let widget = ProductRecord::new("4901234567894", "Widget", Money::from_minor(120), 5).unwrap();
        let quantity = validate_quantity(25, 5).unwrap();
        assert_eq!(
            finalize(&widget, quantity, noon()).unwrap(),
            finalize(&widget, quantity, noon()).unwrap()
        );
    }

    #[test]
    fn test_finalize_free_item() {
        let sample = ProductRecord::new("96385074", "Sample", Money::zero(), 1).unwrap();
        let record = finalize(&sample, validate_quantity(3, 1).unwrap(), noon()).unwrap();
        assert!(record.total_price().is_zero());
    }

    #[test]
    fn test_finalize_overflow() {
        let gold = ProductRecord::new("4512345678906", "Gold bar", Money::from_minor(i64::MAX / 2), 1).unwrap();
        let err = finalize(&gold, validate_quantity(3, 1).unwrap(), noon()).unwrap_err();
        assert!(matches!(err, OrderError::TotalOverflow { quantity: 3, .. }));
    }

    #[test]
    fn test_finalize_stores_trimmed_code() {
        // fields are public, so a snapshot row may still carry padding
        let padded = ProductRecord {
            code: " 96385074 ".to_string(),
            name: "Sample".to_string(),
            unit_price: Money::from_minor(50),
            min_order_unit: 1,
        };
        let record = finalize(&padded, validate_quantity(2, 1).unwrap(), noon()).unwrap();
        assert_eq!(record.code(), "96385074");
        assert_eq!(record.to_row()[1], "96385074");
    }

    proptest! {
        /// Property: the total is exactly quantity × unit price, every time.
        #[test]
        fn total_is_exact_product(price in 0i64..1_000_000_000, unit in 1i64..100, k in 1i64..1000) {
            let product = ProductRecord::new("4901234567894", "Item", Money::from_minor(price), unit).unwrap();
            let quantity = validate_quantity(k * unit, unit).unwrap();

            let first = finalize(&product, quantity, noon()).unwrap();
            let second = finalize(&product, quantity, noon()).unwrap();

            prop_assert_eq!(first.total_price().minor(), k * unit * price);
            prop_assert_eq!(first.quantity(), k * unit);
            prop_assert_eq!(first, second);
        }
    }
}
