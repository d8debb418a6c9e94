//! # Error Types
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - [`DecodeError`] names why a payload was rejected. The public
//!   [`crate::decode`] entry point collapses every variant into `None`;
//!   [`crate::try_decode`] keeps the reason for diagnostics.
//! - [`TlvError`] is the abort reason of a TLV walk. It never escapes the
//!   EMV layer as a rejection on its own: records read before the abort are
//!   still honoured.
//! - [`ValidationError`] covers validated newtypes such as [`crate::Vpa`].
//! - [`ManualEntryError`] is one field-level complaint about a manually
//!   typed payment; [`ManualEntryRejected`] carries all of them at once.

use thiserror::Error;

/// Why a raw payload did not produce a payment intent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The payload was the empty string.
    #[error("payload is empty")]
    Empty,

    /// Neither a TLV payload nor a query string carrying `pa=`.
    #[error("payload is neither a UPI URI nor an EMV QR payload")]
    UnrecognizedFormat,

    /// URI form without a non-empty `pa` parameter.
    #[error("missing payee address (pa)")]
    MissingPayeeAddress,

    /// A payee address was found but is not `localpart@handle`.
    #[error("invalid payee address: {0}")]
    InvalidPayeeAddress(#[from] ValidationError),

    /// TLV form that does not open with the payload format indicator.
    #[error("payload does not start with the EMV payload format indicator (tag 00)")]
    NotEmv,

    /// TLV form without tag 26, or tag 26 without sub-tag 01.
    #[error("EMV payload carries no UPI merchant account (tag 26, sub-tag 01)")]
    MissingMerchantAccount,
}

/// Abort reason of a TLV walk.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TlvError {
    /// Fewer characters remain than the record header or value needs.
    #[error("record {tag:?} at offset {offset} truncated: needs {needed}, {remaining} remain")]
    Truncated {
        /// Tag of the record being read (may be partial).
        tag: String,
        /// Character offset of the record start.
        offset: usize,
        /// Characters required from the record start.
        needed: usize,
        /// Characters actually available from the record start.
        remaining: usize,
    },

    /// The two length characters are not decimal digits.
    #[error("record {tag:?} at offset {offset} has a non-numeric length {length:?}")]
    InvalidLength {
        /// Tag of the record being read.
        tag: String,
        /// Character offset of the record start.
        offset: usize,
        /// The raw length token.
        length: String,
    },
}

/// Error constructing a validated newtype.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The value is not a virtual payment address of the form `localpart@handle`.
    #[error("not a virtual payment address (expected localpart@handle): {0:?}")]
    InvalidVpa(String),
}

/// One field-level problem with a manually entered payment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManualEntryError {
    /// No UPI ID was entered.
    #[error("UPI ID is required")]
    MissingVpa,

    /// The UPI ID does not match `name@bank`.
    #[error("invalid UPI ID format (e.g. name@bank): {0:?}")]
    InvalidVpa(String),

    /// No amount was entered.
    #[error("amount is required")]
    MissingAmount,

    /// The amount is not a positive number.
    #[error("amount must be a valid positive number: {0:?}")]
    InvalidAmount(String),
}

/// Every problem found while validating a manual entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("manual entry rejected: {}", join_errors(.0))]
pub struct ManualEntryRejected(pub Vec<ManualEntryError>);

impl ManualEntryRejected {
    /// The individual field errors, in field order.
    pub fn errors(&self) -> &[ManualEntryError] {
        &self.0
    }
}

fn join_errors(errors: &[ManualEntryError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_wraps_validation_error() {
        let err: DecodeError = ValidationError::InvalidVpa("nobody".into()).into();
        assert_eq!(
            err,
            DecodeError::InvalidPayeeAddress(ValidationError::InvalidVpa("nobody".into()))
        );
        assert!(err.to_string().contains("nobody"));
    }

    #[test]
    fn tlv_error_display_names_offset() {
        let err = TlvError::InvalidLength {
            tag: "54".into(),
            offset: 12,
            length: "x1".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("offset 12"));
        assert!(msg.contains("\"x1\""));
    }

    #[test]
    fn manual_entry_rejected_joins_all_errors() {
        let rejected = ManualEntryRejected(vec![
            ManualEntryError::MissingVpa,
            ManualEntryError::MissingAmount,
        ]);
        assert_eq!(
            rejected.to_string(),
            "manual entry rejected: UPI ID is required; amount is required"
        );
        assert_eq!(rejected.errors().len(), 2);
    }
}
