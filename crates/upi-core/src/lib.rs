//! # upi-core: UPI Payment-Intent Decoding
//!
//! Turns the payload of a scanned or pasted payment QR code into a single
//! normalised [`PaymentIntent`]. Two incompatible encodings circulate in the
//! Indian UPI ecosystem and both are accepted:
//!
//! - **URI form**: `upi://pay?pa=merchant@psp&pn=Name&am=100.00&...`,
//!   percent-encoded query parameters with historical aliases
//!   (`tr`/`tid`, `mc`/`mcc`, `cu`/`curr`).
//! - **EMV form** (BharatQR): EMVCo merchant-presented TLV records with the
//!   UPI address nested in tag `26`, sub-tag `01`.
//!
//! ## Key Design Principles
//!
//! 1. **No partial intents.** The payee address is a validated [`Vpa`];
//!    a payload that does not yield one is rejected as a whole.
//!
//! 2. **Rejection is a value, not a failure.** [`decode`] returns `None` for
//!    anything that is not a payable code; [`try_decode`] names the reason.
//!    Neither panics on any input.
//!
//! 3. **Bounds-checked TLV.** Every read of the [`tlv`] walker is checked;
//!    a damaged record ends the walk without discarding what came before.
//!
//! 4. **Pure.** No I/O, no shared state, no caching. Every function here is
//!    safe to call from any thread, any number of times.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Logging goes through `tracing`; this crate never installs a subscriber.

pub mod amount;
pub mod decode;
pub mod emv;
pub mod error;
pub mod intent;
pub mod manual;
pub mod tlv;
pub mod uri;
pub mod vpa;

// Re-export primary types for ergonomic imports.
pub use amount::{format_amount, format_amount_grouped, parse_amount};
pub use decode::{decode, decode_first, try_decode};
pub use emv::{currency_label, AdditionalData};
pub use error::{DecodeError, ManualEntryError, ManualEntryRejected, TlvError, ValidationError};
pub use intent::{MerchantLocation, PayloadFormat, PaymentIntent, DEFAULT_CURRENCY};
pub use manual::ManualEntry;
pub use vpa::{derive_display_name, Vpa, UNKNOWN_MERCHANT};

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn public_types_are_thread_safe() {
        assert_send_sync::<PaymentIntent>();
        assert_send_sync::<DecodeError>();
        assert_send_sync::<ManualEntry>();
        assert_send_sync::<tlv::TlvMap<'static>>();
    }

    #[test]
    fn default_currency_is_rupee() {
        assert_eq!(DEFAULT_CURRENCY, "INR");
        assert_eq!(currency_label(emv::INR_NUMERIC), DEFAULT_CURRENCY);
    }
}
