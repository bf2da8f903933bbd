//! # Catalog Matcher
//!
//! Looks a normalized code up in a catalog snapshot.
//!
//! ## Matching Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  snapshot (ordered as the catalog store returned it)                    │
//! │                                                                         │
//! │   [0] 4901234567894  Widget     ◄── first exact match wins              │
//! │   [1] 4512345678906  Gadget                                             │
//! │   [2] 4901234567894  Widget v2  ◄── duplicate, never returned           │
//! │                                                                         │
//! │  Comparison: exact string equality after trimming both sides.           │
//! │  No prefix matching, no case folding, no fuzzy search.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A miss is `None`, never a panic. The caller turns it into
//! [`OrderError::NotFound`](crate::OrderError::NotFound).

use std::collections::HashMap;

use crate::identifier::NormalizedCode;
use crate::types::ProductRecord;

/// Returns the first record whose trimmed code equals `code`.
///
/// ## Example
/// ```rust
/// use janorder_core::catalog::resolve;
/// use janorder_core::identifier::normalize;
/// use janorder_core::{Money, ProductRecord};
///
/// let catalog = vec![
///     ProductRecord::new("4901234567894", "Widget", Money::from_minor(120), 5).unwrap(),
/// ];
/// let code = normalize("4901234567894").unwrap();
/// assert_eq!(resolve(&catalog, &code).unwrap().name, "Widget");
///
/// let missing = normalize("0000000000000").unwrap();
/// assert!(resolve(&catalog, &missing).is_none());
/// ```
pub fn resolve<'a>(catalog: &'a [ProductRecord], code: &NormalizedCode) -> Option<&'a ProductRecord> {
    catalog
        .iter()
        .find(|record| record.code.trim() == code.as_str())
}

// =============================================================================
// Catalog Index
// =============================================================================

/// Hash index over a snapshot for constant-time lookups.
///
/// Resolves exactly like [`resolve`]: on duplicate codes the record that
/// appears first in the snapshot is kept.
#[derive(Debug)]
pub struct CatalogIndex<'a> {
    by_code: HashMap<&'a str, &'a ProductRecord>,
    duplicates: Vec<&'a str>,
}

impl<'a> CatalogIndex<'a> {
    pub fn build(catalog: &'a [ProductRecord]) -> Self {
        let mut by_code = HashMap::with_capacity(catalog.len());
        let mut duplicates = Vec::new();

        for record in catalog {
            let code = record.code.trim();
            if by_code.contains_key(code) {
                if !duplicates.contains(&code) {
                    duplicates.push(code);
                }
                continue;
            }
            by_code.insert(code, record);
        }

        CatalogIndex { by_code, duplicates }
    }

    pub fn resolve(&self, code: &NormalizedCode) -> Option<&'a ProductRecord> {
        self.by_code.get(code.as_str()).copied()
    }

    /// Codes that occur more than once, in first-seen order.
    pub fn duplicate_codes(&self) -> &[&'a str] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::normalize;
    use crate::money::Money;
    use proptest::prelude::*;

    fn product(code: &str, name: &str) -> ProductRecord {
        ProductRecord::new(code, name, Money::from_minor(120), 5).unwrap()
    }

    fn sample_catalog() -> Vec<ProductRecord> {
        vec![
            product("4901234567894", "Widget"),
            product("4512345678906", "Gadget"),
            product("4901234567894", "Widget v2"),
        ]
    }

    #[test]
    fn test_resolve_exact_match() {
        let catalog = sample_catalog();
        let found = resolve(&catalog, &normalize("4512345678906").unwrap()).unwrap();
        assert_eq!(found.name, "Gadget");
    }

    #[test]
    fn test_resolve_first_duplicate_wins() {
        let catalog = sample_catalog();
        let found = resolve(&catalog, &normalize("4901234567894").unwrap()).unwrap();
        assert_eq!(found.name, "Widget");
    }

    #[test]
    fn test_resolve_trims_catalog_side() {
        // records deserialized straight from storage may carry padding
        let catalog = vec![ProductRecord {
            code: " 96385074 ".to_string(),
            name: "Padded".to_string(),
            unit_price: Money::from_minor(10),
            min_order_unit: 1,
        }];
        assert!(resolve(&catalog, &normalize("96385074").unwrap()).is_some());
    }

    #[test]
    fn test_resolve_is_exact() {
        let catalog = sample_catalog();
        assert!(resolve(&catalog, &normalize("490123456789").unwrap()).is_none());
        assert!(resolve(&catalog, &normalize("49012345678945").unwrap()).is_none());
        assert!(resolve(&[], &normalize("4901234567894").unwrap()).is_none());
    }

    #[test]
    fn test_index_matches_linear_resolve() {
        let catalog = sample_catalog();
        let index = CatalogIndex::build(&catalog);

        assert_eq!(index.len(), 2);
        assert!(!index.is_empty());
        assert_eq!(index.duplicate_codes(), &["4901234567894"]);

        for code in ["4901234567894", "4512345678906", "0000000000000"] {
            let code = normalize(code).unwrap();
            assert_eq!(index.resolve(&code), resolve(&catalog, &code));
        }
    }

    proptest! {
        /// Property: a code absent from the catalog never resolves.
        #[test]
        fn absent_code_is_not_found(codes in prop::collection::vec("[0-9]{13}", 0..20), missing in "[0-9]{12}") {
            let catalog: Vec<ProductRecord> = codes.iter().map(|c| product(c, "Item")).collect();
            // 12 digits can never equal a 13-digit code
            prop_assert!(resolve(&catalog, &normalize(missing.as_str()).unwrap()).is_none());
        }

        /// Property: resolving twice against the same snapshot gives the same record.
        #[test]
        fn resolve_is_idempotent(codes in prop::collection::vec("[0-9]{8}", 1..20), pick in 0usize..20) {
            let catalog: Vec<ProductRecord> = codes.iter().map(|c| product(c, "Item")).collect();
            let code = normalize(codes[pick % codes.len()].as_str()).unwrap();
            let first = resolve(&catalog, &code);
            let second = resolve(&catalog, &code);
            prop_assert!(first.is_some());
            prop_assert!(std::ptr::eq(first.unwrap(), second.unwrap()));
        }
    }
}
