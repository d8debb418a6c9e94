//! # Virtual Payment Address
//!
//! The `Vpa` newtype wraps a UPI virtual payment address
//! (`identifier@bank-or-psp-suffix`). It can only be constructed through
//! [`Vpa::new`], which checks the `localpart@handle` shape, so every
//! [`crate::PaymentIntent`] carries an address that is known to be well
//! formed.
//!
//! ## Validation Levels
//!
//! - [`Vpa::new`] is decoder-grade: exactly one `@`, both sides non-empty,
//!   no whitespace or control characters. QR generators in the field use a
//!   wide range of local-part characters, so nothing stricter is imposed on
//!   scanned payloads.
//! - [`Vpa::is_strict`] is the manual-entry check: ASCII alphanumerics plus
//!   `.`, `-`, `_` in the local part and an alphanumeric handle.
//!
//! The display-name fallback used when a payload carries no payee name also
//! lives here, see [`derive_display_name`].

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Placeholder display name when nothing can be derived from an address.
pub const UNKNOWN_MERCHANT: &str = "Unknown Merchant";

/// A UPI virtual payment address of the form `localpart@handle`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Vpa(String);

impl<'de> Deserialize<'de> for Vpa {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl Vpa {
    /// Create a VPA, validating the `localpart@handle` shape.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidVpa`] if the value has no `@`, more
    /// than one `@`, an empty side, or any whitespace/control character.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    fn validate(s: &str) -> Result<(), ValidationError> {
        let mut parts = s.split('@');
        let local = parts.next().unwrap_or_default();
        let handle = parts.next();
        let extra = parts.next();

        let shaped = match (handle, extra) {
            (Some(handle), None) => !local.is_empty() && !handle.is_empty(),
            _ => false,
        };
        if !shaped || s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ValidationError::InvalidVpa(s.to_string()));
        }
        Ok(())
    }

    /// Access the address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part before the `@`.
    pub fn local_part(&self) -> &str {
        self.split().0
    }

    /// The bank or PSP handle after the `@`.
    pub fn handle(&self) -> &str {
        self.split().1
    }

    fn split(&self) -> (&str, &str) {
        // Validated at construction: exactly one '@'.
        self.0.split_once('@').unwrap_or((&self.0, ""))
    }

    /// Whether the address passes the stricter manual-entry check.
    pub fn is_strict(&self) -> bool {
        let local_ok = self
            .local_part()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        let handle_ok = self.handle().chars().all(|c| c.is_ascii_alphanumeric());
        local_ok && handle_ok
    }

    /// Display name derived from the local part, see [`derive_display_name`].
    pub fn display_name(&self) -> String {
        derive_display_name(&self.0)
    }
}

impl std::fmt::Display for Vpa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Vpa {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Vpa {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive a human-friendly name from a VPA when the payload carries none.
///
/// Takes the part before the `@`, turns every run of `.`, `_` and `-` into
/// a single space, and upper-cases the first letter of each word. The rest
/// of each word is kept as written.
///
/// ```
/// use upi_core::derive_display_name;
///
/// assert_eq!(derive_display_name("amazon.pay@hdfc"), "Amazon Pay");
/// assert_eq!(derive_display_name("coffee.shop_01@bank"), "Coffee Shop 01");
/// assert_eq!(derive_display_name(""), "Unknown Merchant");
/// ```
pub fn derive_display_name(vpa: &str) -> String {
    let local = vpa.split('@').next().unwrap_or_default();

    let spaced = local
        .split(is_name_separator)
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let name = spaced
        .split(' ')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ");

    let name = name.trim();
    if name.is_empty() {
        UNKNOWN_MERCHANT.to_string()
    } else {
        name.to_string()
    }
}

fn is_name_separator(c: char) -> bool {
    matches!(c, '.' | '_' | '-')
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
