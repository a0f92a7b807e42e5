use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    // Separators people type between digit groups
    static ref SEPARATORS: Regex = Regex::new(r"[\s\-.()]").unwrap();

    static ref DIALABLE: Regex = Regex::new(r"^\+?[0-9]+$").unwrap();
}

/// Digit count bounds for a full international number, country code included.
const MIN_DIGITS: usize = 10;
const MAX_DIGITS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid phone number: {input:?}")]
pub struct InvalidPhoneNumber {
    pub input: String,
}

/// Canonicalizes phone numbers to E.164 (`+254700000000`).
///
/// Accepted forms: `+<cc><n>`, `00<cc><n>`, `<cc><n>`, national `0<n>`,
/// and bare national numbers, which get the default country code.
#[derive(Debug, Clone)]
pub struct PhoneNormalizer {
    default_country_code: String,
}

impl Default for PhoneNormalizer {
    fn default() -> Self {
        Self::new("254")
    }
}

impl PhoneNormalizer {
    pub fn new(default_country_code: impl Into<String>) -> Self {
        Self {
            default_country_code: default_country_code
                .into()
                .trim_start_matches('+')
                .to_string(),
        }
    }

    pub fn normalize(&self, input: &str) -> Result<String, InvalidPhoneNumber> {
        let invalid = || InvalidPhoneNumber {
            input: input.to_string(),
        };

        let compact = SEPARATORS.replace_all(input.trim(), "");
        if compact.is_empty() || !DIALABLE.is_match(&compact) {
            return Err(invalid());
        }

        let digits = if let Some(rest) = compact.strip_prefix('+') {
            rest.to_string()
        } else if let Some(rest) = compact.strip_prefix("00") {
            rest.to_string()
        } else if let Some(rest) = compact.strip_prefix('0') {
            format!("{}{}", self.default_country_code, rest)
        } else if compact.starts_with(&self.default_country_code) {
            compact.to_string()
        } else {
            format!("{}{}", self.default_country_code, compact)
        };

        if digits.starts_with('0') || !(MIN_DIGITS..=MAX_DIGITS).contains(&digits.len()) {
            return Err(invalid());
        }

        Ok(format!("+{}", digits))
    }
}
