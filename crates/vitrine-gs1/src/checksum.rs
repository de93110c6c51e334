//! GS1 check-digit engine for EAN-8, UPC-A, EAN-13 and GTIN-14.
//!
//! Pure and total: every input produces a [`ChecksumResult`], nothing panics.
//! Non-digit characters are stripped before the length check, so
//! `"789-1234-567890"` and `"7891234567890"` validate identically.

use serde::{Deserialize, Serialize};

/// Identifier lengths the engine accepts (EAN-8, UPC-A, EAN-13, GTIN-14).
pub const SUPPORTED_LENGTHS: [usize; 4] = [8, 12, 13, 14];

/// Why a validation passed or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumReason {
    /// Length and check digit are both correct.
    Ok,
    /// Digit count is not one of [`SUPPORTED_LENGTHS`].
    Length,
    /// Length is fine but the trailing digit does not match.
    #[serde(rename = "checkdigit")]
    CheckDigit,
}

impl ChecksumReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Length => "length",
            Self::CheckDigit => "checkdigit",
        }
    }
}

impl std::fmt::Display for ChecksumReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksumResult {
    pub valid: bool,
    pub reason: ChecksumReason,

    /// Computed check digit. `None` when `reason` is `length`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<u8>,

    /// Check digit found in the input. `None` when `reason` is `length`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub got: Option<u8>,

    /// Digit count after stripping.
    pub length: usize,
}

/// Keep only ASCII digits, preserving order and leading zeros.
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

pub fn is_supported_length(len: usize) -> bool {
    SUPPORTED_LENGTHS.contains(&len)
}

/// Compute the GS1 check digit for `body` (the identifier without its last
/// digit). Each element must be a digit value 0..=9.
///
/// Walking right to left, the rightmost body digit has weight 3, the next
/// weight 1, alternating.
pub fn compute_check_digit(body: &[u8]) -> u8 {
    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            let weight = if i % 2 == 0 { 3 } else { 1 };
            u32::from(d) * weight
        })
        .sum();

    ((10 - (sum % 10)) % 10) as u8
}

/// Validate an identifier string.
pub fn validate(identifier: &str) -> ChecksumResult {
    let digits: Vec<u8> = identifier
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect();
    let length = digits.len();

    let Some((&got, body)) = digits.split_last().filter(|_| is_supported_length(length)) else {
        return ChecksumResult {
            valid: false,
            reason: ChecksumReason::Length,
            expected: None,
            got: None,
            length,
        };
    };

    let expected = compute_check_digit(body);
    let valid = got == expected;

    ChecksumResult {
        valid,
        reason: if valid {
            ChecksumReason::Ok
        } else {
            ChecksumReason::CheckDigit
        },
        expected: Some(expected),
        got: Some(got),
        length,
    }
}

/// Append the check digit to a 7, 11, 12 or 13 digit body.
///
/// Returns `None` when the stripped body has any other length.
pub fn complete(body: &str) -> Option<String> {
    let digits = digits_only(body);
    if !is_supported_length(digits.len() + 1) {
        return None;
    }
    let values: Vec<u8> = digits.bytes().map(|b| b - b'0').collect();
    let check = compute_check_digit(&values);
    Some(format!("{digits}{check}"))
}
