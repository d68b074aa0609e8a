//! Brazilian phone number canonicalization.
//!
//! Brazilian subscriber numbers exist in two shapes: the legacy 10-digit form
//! (2-digit DDD area code + 8-digit number) and the current 11-digit mobile
//! form (DDD + a mandatory leading `9` + the same 8-digit number). Both forms
//! of one subscriber reduce to the same 8-digit [`PhoneKey`], which is the
//! value used for matching. Keys are kept as strings so leading zeros survive.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lowest DDD in use; codes 00-10 are not assigned.
pub const MIN_DDD: u32 = 11;
pub const MAX_DDD: u32 = 99;

/// Canonical 8-digit base number shared by the 10- and 11-digit forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneKey(String);

impl PhoneKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PhoneError {
    #[error("phone is required")]
    Required,
    #[error("must have at least 10 digits")]
    TooShort,
    #[error("must have at most 11 digits")]
    TooLong,
    #[error("must have exactly 10 or 11 digits")]
    BadLength,
    #[error("invalid area code: {0}")]
    InvalidAreaCode(String),
    #[error("11-digit numbers must have 9 after area code")]
    MissingMobileNine,
}

/// Single parse path shared by [`normalize_phone`] and [`is_valid_phone`];
/// checks are ordered so the coarsest failure (length) is reported first.
pub fn validate_phone(raw: &str) -> Result<PhoneKey, PhoneError> {
    if raw.trim().is_empty() {
        return Err(PhoneError::Required);
    }

    let digits = digits_of(raw);
    match digits.len() {
        0..=9 => return Err(PhoneError::TooShort),
        10 | 11 => {}
        _ => return Err(PhoneError::TooLong),
    }

    let ddd = &digits[..2];
    // Two ASCII digits always parse; BadLength cannot surface here.
    let ddd_value: u32 = ddd.parse().map_err(|_| PhoneError::BadLength)?;
    if !(MIN_DDD..=MAX_DDD).contains(&ddd_value) {
        return Err(PhoneError::InvalidAreaCode(ddd.to_string()));
    }

    let number = &digits[2..];
    if digits.len() == 11 {
        if !number.starts_with('9') {
            return Err(PhoneError::MissingMobileNine);
        }
        return Ok(PhoneKey(number[1..].to_string()));
    }

    Ok(PhoneKey(number.to_string()))
}

pub fn normalize_phone(raw: &str) -> Option<PhoneKey> {
    validate_phone(raw).ok()
}

pub fn is_valid_phone(raw: &str) -> bool {
    validate_phone(raw).is_ok()
}

/// True iff both inputs normalize and share a key. Two inputs that fail to
/// normalize are never equal, even when their raw strings match.
pub fn phones_match(a: &str, b: &str) -> bool {
    match (normalize_phone(a), normalize_phone(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Display formatting only; never used for comparison. Inputs that are not
/// 10 or 11 digits long come back unchanged.
pub fn format_phone(raw: &str) -> String {
    let digits = digits_of(raw);
    match digits.len() {
        11 => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
        10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        _ => raw.to_string(),
    }
}

fn digits_of(raw: &str) -> String {
    raw.chars().filter(|ch| ch.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::{
        format_phone, is_valid_phone, normalize_phone, phones_match, validate_phone, PhoneError,
    };

    #[test]
    fn normalize_strips_punctuation() {
        let pretty = normalize_phone("(92) 98265-3407").expect("valid");
        let bare = normalize_phone("92982653407").expect("valid");
        assert_eq!(pretty, bare);
        assert_eq!(pretty.as_str(), "82653407");
    }

    #[test]
    fn normalize_is_deterministic() {
        assert_eq!(normalize_phone("11987654321"), normalize_phone("11987654321"));
    }

    #[test]
    fn ten_and_eleven_digit_forms_share_a_key() {
        for ddd in [11u32, 47, 92, 99] {
            let short = format!("{ddd}82653407");
            let long = format!("{ddd}982653407");
            assert!(phones_match(&short, &long), "ddd {ddd}");
        }
    }

    #[test]
    fn distinct_subscribers_do_not_match() {
        assert!(!phones_match("11987654321", "11987654322"));
    }

    #[test]
    fn key_preserves_leading_zeros() {
        let key = normalize_phone("11901234567").expect("valid");
        assert_eq!(key.as_str(), "01234567");
    }

    #[test]
    fn area_codes_below_eleven_are_rejected() {
        assert!(!is_valid_phone("00987654321"));
        assert!(!is_valid_phone("10987654321"));
        assert!(is_valid_phone("11987654321"));
    }

    #[test]
    fn eleven_digits_require_mobile_nine() {
        assert!(!is_valid_phone("11887654321"));
        assert_eq!(
            validate_phone("11887654321"),
            Err(PhoneError::MissingMobileNine)
        );
    }

    #[test]
    fn unnormalizable_inputs_never_match() {
        assert!(!phones_match("123", "123"));
        assert!(!phones_match("", ""));
    }

    #[test]
    fn validate_reports_first_failing_condition() {
        assert_eq!(validate_phone(""), Err(PhoneError::Required));
        assert_eq!(validate_phone("   "), Err(PhoneError::Required));
        assert_eq!(validate_phone("abc"), Err(PhoneError::TooShort));
        assert_eq!(validate_phone("119876543"), Err(PhoneError::TooShort));
        assert_eq!(validate_phone("119876543210"), Err(PhoneError::TooLong));
        assert_eq!(
            validate_phone("0587654321"),
            Err(PhoneError::InvalidAreaCode("05".to_string()))
        );
    }

    #[test]
    fn error_messages_are_user_facing() {
        assert_eq!(PhoneError::Required.to_string(), "phone is required");
        assert_eq!(
            PhoneError::InvalidAreaCode("05".to_string()).to_string(),
            "invalid area code: 05"
        );
        assert_eq!(
            PhoneError::MissingMobileNine.to_string(),
            "11-digit numbers must have 9 after area code"
        );
    }

    #[test]
    fn is_valid_agrees_with_normalize() {
        for raw in [
            "",
            "abc",
            "123",
            "(92) 98265-3407",
            "92982653407",
            "9282653407",
            "11887654321",
            "00987654321",
            "119876543210",
        ] {
            assert_eq!(is_valid_phone(raw), normalize_phone(raw).is_some(), "{raw:?}");
        }
    }

    #[test]
    fn format_for_display() {
        assert_eq!(format_phone("11987654321"), "(11) 98765-4321");
        assert_eq!(format_phone("1187654321"), "(11) 8765-4321");
        assert_eq!(format_phone("abc"), "abc");
        assert_eq!(format_phone("123"), "123");
    }
}
