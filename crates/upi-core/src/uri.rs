//! # UPI URI Decoder
//!
//! Parses the query-string form `upi://pay?pa=..&pn=..&am=..`. Values are
//! `application/x-www-form-urlencoded` (percent escapes, `+` for space).
//!
//! QR generators disagree on parameter names, so every field resolves
//! through an ordered list of candidate keys ([`FIELD_ALIASES`]); the first
//! key whose first occurrence is non-empty wins. Supporting a new alias is
//! a table edit.

use std::borrow::Cow;

use crate::error::DecodeError;
use crate::intent::{PayloadFormat, PaymentIntent, DEFAULT_CURRENCY};
use crate::vpa::Vpa;

/// A field of the intent that URI parameters map onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UriField {
    /// `pa`
    PayeeAddress,
    /// `pn`
    PayeeName,
    /// `am`
    Amount,
    /// `tn`
    Note,
    /// `tr`, `tid`
    TransactionReference,
    /// `mc`, `mcc`
    MerchantCategoryCode,
    /// `cu`, `curr`
    Currency,
}

/// Candidate query keys per field, in precedence order.
pub const FIELD_ALIASES: &[(UriField, &[&str])] = &[
    (UriField::PayeeAddress, &["pa"]),
    (UriField::PayeeName, &["pn"]),
    (UriField::Amount, &["am"]),
    (UriField::Note, &["tn"]),
    (UriField::TransactionReference, &["tr", "tid"]),
    (UriField::MerchantCategoryCode, &["mc", "mcc"]),
    (UriField::Currency, &["cu", "curr"]),
];

impl UriField {
    /// Candidate keys for this field, in precedence order.
    pub fn keys(self) -> &'static [&'static str] {
        FIELD_ALIASES
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, keys)| *keys)
            .unwrap_or(&[])
    }
}

/// Decoded query parameters in their original order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams<'a> {
    pairs: Vec<(Cow<'a, str>, Cow<'a, str>)>,
}

impl<'a> QueryParams<'a> {
    /// Split and percent-decode a query string.
    pub fn parse(query: &'a str) -> Self {
        Self {
            pairs: url::form_urlencoded::parse(query.as_bytes()).collect(),
        }
    }

    /// Value of the first occurrence of `key`, possibly empty.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_ref())
    }

    /// Resolve a field through its alias chain.
    pub fn field(&self, field: UriField) -> Option<&str> {
        field
            .keys()
            .iter()
            .filter_map(|key| self.first(key))
            .find(|value| !value.is_empty())
    }

    fn owned(&self, field: UriField) -> Option<String> {
        self.field(field).map(str::to_string)
    }
}

/// The query part of a payload: everything after the first `?`, or the
/// whole payload when it has no `?` but carries `pa=`.
pub fn query_component(raw: &str) -> Option<&str> {
    if let Some((_, query)) = raw.split_once('?') {
        return Some(query);
    }
    if raw.to_ascii_lowercase().contains("pa=") {
        return Some(raw);
    }
    None
}

/// Decode a `upi://pay?...` payload (or a bare `pa=...` query string).
///
/// # Errors
///
/// - [`DecodeError::UnrecognizedFormat`] if the payload has no query part.
/// - [`DecodeError::MissingPayeeAddress`] if `pa` is absent or empty.
/// - [`DecodeError::InvalidPayeeAddress`] if `pa` is not `localpart@handle`.
pub fn decode_uri(raw: &str) -> Result<PaymentIntent, DecodeError> {
    let query = query_component(raw).ok_or(DecodeError::UnrecognizedFormat)?;
    let params = QueryParams::parse(query);

    let pa = params
        .field(UriField::PayeeAddress)
        .ok_or(DecodeError::MissingPayeeAddress)?;
    let payee_address = Vpa::new(pa)?;

    let payee_name = params
        .owned(UriField::PayeeName)
        .unwrap_or_else(|| payee_address.display_name());

    Ok(PaymentIntent {
        payee_name,
        amount: params.owned(UriField::Amount),
        note: params.owned(UriField::Note),
        transaction_reference: params.owned(UriField::TransactionReference),
        merchant_category_code: params.owned(UriField::MerchantCategoryCode),
        currency_code: params
            .owned(UriField::Currency)
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        merchant_location: None,
        raw_payload: raw.to_string(),
        format: PayloadFormat::Uri,
        payee_address,
    })
}
