//! Mobile phone normalization.
//!
//! Accepts any user formatting (spaces, dashes, parentheses, `+`) and keeps
//! only the digits. A number is valid when it has an area code plus a
//! landline (10 digits) or mobile (11 digits) subscriber number.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static NON_DIGITS: OnceLock<Regex> = OnceLock::new();

fn non_digits() -> &'static Regex {
    NON_DIGITS.get_or_init(|| Regex::new(r"\D").expect("Valid regex"))
}

/// A phone number reduced to 10 or 11 digits.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalize raw user input.
    ///
    /// Returns `None` when the input has no digits or the digit count is
    /// not 10 or 11.
    #[must_use]
    pub fn normalize(raw: &str) -> Option<Self> {
        let digits = non_digits().replace_all(raw, "");
        match digits.len() {
            10 | 11 => Some(Self(digits.into_owned())),
            _ => None,
        }
    }

    /// The bare digit string.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// Display form: `(DD) DDDDD-DDDD` for mobiles, `(DD) DDDD-DDDD` for landlines.
    #[must_use]
    pub fn formatted(&self) -> String {
        let d = &self.0;
        if d.len() == 11 {
            format!("({}) {}-{}", &d[..2], &d[2..7], &d[7..])
        } else {
            format!("({}) {}-{}", &d[..2], &d[2..6], &d[6..])
        }
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::normalize(&raw).ok_or_else(|| "phone number must have 10 or 11 digits".to_string())
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.formatted())
    }
}

// Redacted so a stray `{:?}` in a log call never prints the number.
impl std::fmt::Debug for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tail = self.0.get(self.0.len().saturating_sub(2)..).unwrap_or("");
        write!(f, "PhoneNumber(***{tail})")
    }
}
