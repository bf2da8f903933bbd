//! # Identifier Module
//!
//! Turns whatever the identifier source produced into a comparable key.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Camera decoder ──► [(EAN13, b"4901234567894"), (QRCODE, ...)]         │
//! │                          │                                              │
//! │                          ▼  ScanOutcome::from_decoded                  │
//! │  Keyboard ─────────► ScanOutcome::Detected(RawIdentifier)              │
//! │                      ScanOutcome::NoCodeDetected (timeout)             │
//! │                          │                                              │
//! │                          ▼  normalize                                  │
//! │                      NormalizedCode("4901234567894")                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Normalization never judges the format. A malformed code simply fails to
//! match anything in the catalog and is reported as not found.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{OrderError, OrderResult};

// =============================================================================
// Raw Identifier
// =============================================================================

/// An identifier exactly as the source produced it.
///
/// Sources hand over text, integers (spreadsheet cells), or decoder bytes;
/// all of them coerce to a string here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIdentifier(String);

impl RawIdentifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RawIdentifier {
    fn from(s: &str) -> Self {
        RawIdentifier(s.to_string())
    }
}

impl From<String> for RawIdentifier {
    fn from(s: String) -> Self {
        RawIdentifier(s)
    }
}

impl From<u64> for RawIdentifier {
    fn from(n: u64) -> Self {
        RawIdentifier(n.to_string())
    }
}

impl From<&[u8]> for RawIdentifier {
    fn from(bytes: &[u8]) -> Self {
        RawIdentifier(String::from_utf8_lossy(bytes).into_owned())
    }
}

impl From<Vec<u8>> for RawIdentifier {
    fn from(bytes: Vec<u8>) -> Self {
        RawIdentifier::from(bytes.as_slice())
    }
}

// =============================================================================
// Normalized Code
// =============================================================================

/// A trimmed, non-empty product code used as the catalog match key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedCode(String);

impl NormalizedCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonicalizes a raw identifier.
///
/// ## Rules
/// - Surrounding whitespace (including scanner CR/LF suffixes) is trimmed
/// - Numeric and byte input is coerced to text first
/// - Empty after trimming → [`OrderError::InvalidIdentifier`]
///
/// ## Example
/// ```rust
/// use janorder_core::identifier::normalize;
///
/// assert_eq!(normalize(" 4901234567894\r\n").unwrap().as_str(), "4901234567894");
/// assert_eq!(normalize(4901234567894_u64).unwrap().as_str(), "4901234567894");
/// assert!(normalize("   ").is_err());
/// ```
pub fn normalize(raw: impl Into<RawIdentifier>) -> OrderResult<NormalizedCode> {
    let raw = raw.into();
    let trimmed = raw.as_str().trim();

    if trimmed.is_empty() {
        return Err(OrderError::InvalidIdentifier);
    }

    Ok(NormalizedCode(trimmed.to_string()))
}

// =============================================================================
// Symbology
// =============================================================================

/// Retail barcode families accepted as product codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbology {
    Ean13,
    Ean8,
    UpcA,
    UpcE,
}

impl Symbology {
    /// Maps a decoder's type name (`EAN13`, `EAN8`, `UPCA`, `UPCE`).
    ///
    /// Any other symbology (QR, Code128, ...) yields `None` and is ignored.
    pub fn from_decoder_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().replace(['-', '_'], "").as_str() {
            "EAN13" => Some(Symbology::Ean13),
            "EAN8" => Some(Symbology::Ean8),
            "UPCA" => Some(Symbology::UpcA),
            "UPCE" => Some(Symbology::UpcE),
            _ => None,
        }
    }

    /// Guesses the family of a typed code from its length.
    ///
    /// 8-digit codes are reported as EAN-8; a full UPC-E symbol is
    /// indistinguishable by length alone.
    pub fn detect(code: &str) -> Option<Self> {
        if !code.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match code.len() {
            13 => Some(Symbology::Ean13),
            12 => Some(Symbology::UpcA),
            8 => Some(Symbology::Ean8),
            _ => None,
        }
    }

    /// Number of digits including the check digit.
    pub const fn digits(&self) -> usize {
        match self {
            Symbology::Ean13 => 13,
            Symbology::UpcA => 12,
            Symbology::Ean8 | Symbology::UpcE => 8,
        }
    }

    /// Verifies the trailing mod-10 check digit.
    ///
    /// UPC-E is checked after expansion, which needs the number-system
    /// digit rules; it is accepted as-is here.
    ///
    /// ## Example
    /// ```rust
    /// use janorder_core::identifier::Symbology;
    ///
    /// assert!(Symbology::Ean13.has_valid_check_digit("4901234567894"));
    /// assert!(!Symbology::Ean13.has_valid_check_digit("4901234567890"));
    /// ```
    pub fn has_valid_check_digit(&self, code: &str) -> bool {
        if code.len() != self.digits() || !code.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        if *self == Symbology::UpcE {
            return true;
        }
        let (body, check) = code.split_at(code.len() - 1);
        check_digit(body) == check.parse::<u32>().ok()
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbology::Ean13 => write!(f, "EAN-13"),
            Symbology::Ean8 => write!(f, "EAN-8"),
            Symbology::UpcA => write!(f, "UPC-A"),
            Symbology::UpcE => write!(f, "UPC-E"),
        }
    }
}

impl FromStr for Symbology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symbology::from_decoder_name(s).ok_or_else(|| format!("Unknown symbology: '{s}'"))
    }
}

/// Computes the GS1 mod-10 check digit for the digits preceding it.
///
/// Weights alternate 3,1 starting from the rightmost body digit.
pub fn check_digit(body: &str) -> Option<u32> {
    let mut sum = 0;
    for (i, ch) in body.chars().rev().enumerate() {
        let digit = ch.to_digit(10)?;
        sum += if i % 2 == 0 { digit * 3 } else { digit };
    }
    Some((10 - sum % 10) % 10)
}

// =============================================================================
// Scan Outcome
// =============================================================================

/// What the identifier source delivered for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// A code was read or typed.
    Detected(RawIdentifier),

    /// The source gave up (timeout, unreadable image).
    NoCodeDetected,
}

impl ScanOutcome {
    pub fn detected(raw: impl Into<RawIdentifier>) -> Self {
        ScanOutcome::Detected(raw.into())
    }

    /// Picks the first retail symbol from a decoder's results.
    ///
    /// Each item is `(decoder type name, payload bytes)`. Non-retail
    /// symbologies are skipped; nothing retail means `NoCodeDetected`.
    pub fn from_decoded<'a, I>(symbols: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [u8])>,
    {
        symbols
            .into_iter()
            .find(|(kind, _)| Symbology::from_decoder_name(kind).is_some())
            .map(|(_, data)| ScanOutcome::Detected(RawIdentifier::from(data)))
            .unwrap_or(ScanOutcome::NoCodeDetected)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims() {
        assert_eq!(normalize("4901234567894").unwrap().as_str(), "4901234567894");
        assert_eq!(normalize("\t4901234567894 \n").unwrap().as_str(), "4901234567894");
        // inner whitespace is not touched; such a code just won't match
        assert_eq!(normalize(" 49 01 ").unwrap().as_str(), "49 01");
    }

    #[test]
    fn test_normalize_coerces_numbers_and_bytes() {
        assert_eq!(normalize(12345670_u64).unwrap().as_str(), "12345670");
        assert_eq!(normalize(&b"4901234567894"[..]).unwrap().as_str(), "4901234567894");
        assert_eq!(normalize(b"96385074\r\n".to_vec()).unwrap().as_str(), "96385074");
    }

    #[test]
    fn test_normalize_does_not_validate_format() {
        assert_eq!(normalize("not-a-barcode").unwrap().as_str(), "not-a-barcode");
    }

    #[test]
    fn test_normalize_empty_is_invalid_identifier() {
        assert!(matches!(normalize(""), Err(OrderError::InvalidIdentifier)));
        assert!(matches!(normalize(" \r\n "), Err(OrderError::InvalidIdentifier)));
    }

    #[test]
    fn test_symbology_from_decoder_name() {
        assert_eq!(Symbology::from_decoder_name("EAN13"), Some(Symbology::Ean13));
        assert_eq!(Symbology::from_decoder_name("ean-8"), Some(Symbology::Ean8));
        assert_eq!(Symbology::from_decoder_name("UPCA"), Some(Symbology::UpcA));
        assert_eq!(Symbology::from_decoder_name("UPC_E"), Some(Symbology::UpcE));
        assert_eq!(Symbology::from_decoder_name("QRCODE"), None);
        assert!("CODE128".parse::<Symbology>().is_err());
    }

    #[test]
    fn test_check_digits() {
        assert_eq!(check_digit("490123456789"), Some(4));
        assert!(Symbology::Ean13.has_valid_check_digit("4901234567894"));
        assert!(Symbology::Ean13.has_valid_check_digit("0000000000000"));
        assert!(Symbology::Ean8.has_valid_check_digit("96385074"));
        assert!(Symbology::UpcA.has_valid_check_digit("036000291452"));
        assert!(!Symbology::UpcA.has_valid_check_digit("036000291453"));
        assert!(!Symbology::Ean13.has_valid_check_digit("49012345678"));
        assert_eq!(check_digit("49x"), None);
    }

    #[test]
    fn test_detect() {
        assert_eq!(Symbology::detect("4901234567894"), Some(Symbology::Ean13));
        assert_eq!(Symbology::detect("036000291452"), Some(Symbology::UpcA));
        assert_eq!(Symbology::detect("96385074"), Some(Symbology::Ean8));
        assert_eq!(Symbology::detect("12345"), None);
        assert_eq!(Symbology::detect("ABCDEFGHIJKLM"), None);
    }

    #[test]
    fn test_from_decoded_skips_non_retail() {
        let decoded: Vec<(&str, &[u8])> = vec![
            ("QRCODE", &b"https://example.com"[..]),
            ("EAN13", &b"4901234567894"[..]),
            ("EAN8", &b"96385074"[..]),
        ];
        assert_eq!(
            ScanOutcome::from_decoded(decoded),
            ScanOutcome::detected("4901234567894")
        );
    }

    #[test]
    fn test_from_decoded_without_retail_symbol() {
        let decoded: Vec<(&str, &[u8])> = vec![("CODE128", &b"ABC-123"[..])];
        assert_eq!(ScanOutcome::from_decoded(decoded), ScanOutcome::NoCodeDetected);
        assert_eq!(
            ScanOutcome::from_decoded(Vec::<(&str, &[u8])>::new()),
            ScanOutcome::NoCodeDetected
        );
    }
}
