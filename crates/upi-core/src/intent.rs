//! # Payment Intent
//!
//! The normalised record every decoder produces: who to pay, how much, and
//! with what metadata. It is a transient value object, built once per
//! decode and handed to the confirmation flow; nothing in this crate
//! mutates or stores it afterwards.
//!
//! ## Invariant
//!
//! `payee_address` is a [`Vpa`], so an intent cannot exist without a
//! well-formed `localpart@handle` address. Decoders that cannot establish
//! one fail instead of returning a partial intent.
//!
//! ## Wire Shape
//!
//! Serialises with camelCase keys (`payeeAddress`, `payeeName`, ...);
//! absent optional fields are omitted.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::vpa::Vpa;

/// Currency label used when a payload names none.
pub const DEFAULT_CURRENCY: &str = "INR";

/// Scheme and path prefix of UPI payment URIs.
pub const UPI_PAY_PREFIX: &str = "upi://pay?";

/// Component encoding: only alphanumerics and the RFC 2396 marks stay literal.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// As [`URI_COMPONENT`], keeping the `@` of an address readable.
const VPA_COMPONENT: &AsciiSet = &URI_COMPONENT.remove(b'@');

/// Which decoder produced an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadFormat {
    /// `upi://pay?...` query string.
    Uri,
    /// EMVCo / BharatQR TLV payload.
    Emv,
    /// Typed in through manual entry.
    Manual,
}

impl PayloadFormat {
    /// Lowercase name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uri => "uri",
            Self::Emv => "emv",
            Self::Manual => "manual",
        }
    }
}

impl std::fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Merchant location carried by EMV payloads (tags 58, 60, 61).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantLocation {
    /// Merchant city.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    /// Postal code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// A decoded UPI payment intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    /// The virtual payment address to pay.
    pub payee_address: Vpa,
    /// Display name, derived from the address when the payload has none.
    pub payee_name: String,
    /// Fixed amount as encoded; `None` means the payer enters one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    /// Transaction note / purpose.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Merchant- or acquirer-supplied reference id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_reference: Option<String>,
    /// Four-digit merchant category code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_category_code: Option<String>,
    /// Currency label (`INR` unless the payload says otherwise).
    pub currency_code: String,
    /// Present only for EMV-decoded intents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_location: Option<MerchantLocation>,
    /// The original undecoded input.
    pub raw_payload: String,
    /// Which decoder produced this intent.
    pub format: PayloadFormat,
}

impl PaymentIntent {
    /// Whether the payload fixes the amount.
    pub fn has_fixed_amount(&self) -> bool {
        self.amount.is_some()
    }

    /// Render as a `upi://pay` URI.
    ///
    /// Values are percent-encoded as URI components (see `URI_COMPONENT`), with
    /// `@` left literal in `pa`. Merchant location has no URI field and is
    /// not rendered.
    pub fn to_upi_uri(&self) -> String {
        let mut uri = format!(
            "{UPI_PAY_PREFIX}pa={}&pn={}",
            utf8_percent_encode(self.payee_address.as_str(), VPA_COMPONENT),
            encode(&self.payee_name),
        );
        let optional = [
            ("am", &self.amount),
            ("tn", &self.note),
            ("tr", &self.transaction_reference),
            ("mc", &self.merchant_category_code),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                uri.push_str(&format!("&{key}={}", encode(value)));
            }
        }
        uri.push_str(&format!("&cu={}", encode(&self.currency_code)));
        uri
    }
}

fn encode(value: &str) -> percent_encoding::PercentEncode<'_> {
    utf8_percent_encode(value, URI_COMPONENT)
}
