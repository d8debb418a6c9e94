//! # Format Dispatcher
//!
//! Chooses between the EMV and URI decoders for a raw payload.
//!
//! ## Dispatch Order
//!
//! 1. All-digit payloads, and payloads opening with `00`, are tried as EMV
//!    first. A failed EMV attempt falls through instead of rejecting.
//! 2. Everything else (and every EMV fall-through) goes to the URI decoder,
//!    which needs a `?` or a `pa=` to find a query string.
//!
//! Decoding is a pure function of its input. Callers such as a camera loop
//! re-invoke it per frame; nothing is cached between calls.

use crate::emv::decode_emv;
use crate::error::DecodeError;
use crate::intent::PaymentIntent;
use crate::uri::decode_uri;

/// Decode a raw QR / pasted payload into a payment intent.
///
/// Returns `None` for anything that is not a payable UPI code. The reason is
/// logged at debug level; use [`try_decode`] to get it as a value.
///
/// ```
/// let intent = upi_core::decode("upi://pay?pa=foo@bar&am=10").unwrap();
/// assert_eq!(intent.payee_address.as_str(), "foo@bar");
/// assert!(upi_core::decode("hello world").is_none());
/// ```
pub fn decode(raw: &str) -> Option<PaymentIntent> {
    match try_decode(raw) {
        Ok(intent) => Some(intent),
        Err(reason) => {
            tracing::debug!(%reason, len = raw.len(), "payload is not a UPI payment code");
            None
        }
    }
}

/// Decode a raw payload, keeping the rejection reason.
///
/// Accepts and rejects exactly the same inputs as [`decode`].
///
/// # Errors
///
/// Returns the [`DecodeError`] of the last strategy attempted.
pub fn try_decode(raw: &str) -> Result<PaymentIntent, DecodeError> {
    if raw.is_empty() {
        return Err(DecodeError::Empty);
    }

    if looks_like_emv(raw) {
        match decode_emv(raw) {
            Ok(intent) => {
                tracing::trace!(format = "emv", "decoded payment intent");
                return Ok(intent);
            }
            Err(reason) => {
                tracing::trace!(%reason, "EMV attempt failed; trying URI form");
            }
        }
    }

    let intent = decode_uri(raw)?;
    tracing::trace!(format = "uri", "decoded payment intent");
    Ok(intent)
}

/// Decode successive frames until one yields an intent.
///
/// Returns the zero-based index of the first decodable frame with its
/// intent, or `None` when the frames run out first.
pub fn decode_first<I, S>(frames: I) -> Option<(usize, PaymentIntent)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    frames
        .into_iter()
        .enumerate()
        .find_map(|(index, frame)| decode(frame.as_ref()).map(|intent| (index, intent)))
}

fn looks_like_emv(raw: &str) -> bool {
    raw.starts_with("00") || raw.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::PayloadFormat;

    fn rec(tag: &str, value: &str) -> String {
        format!("{tag}{:02}{value}", value.chars().count())
    }

    fn emv_with(vpa: &str) -> String {
        rec("00", "01") + &rec("26", &rec("01", vpa)) + &rec("53", "356")
    }

    #[test]
    fn empty_is_rejected() {
        assert_eq!(try_decode(""), Err(DecodeError::Empty));
        assert!(decode("").is_none());
    }

    #[test]
    fn emv_payload_takes_emv_branch() {
        let intent = decode(&emv_with("merchant@psp")).unwrap();
        assert_eq!(intent.format, PayloadFormat::Emv);
        assert_eq!(intent.payee_address.as_str(), "merchant@psp");
    }

    #[test]
    fn uri_payload_takes_uri_branch() {
        let intent = decode("upi://pay?pa=foo@bar").unwrap();
        assert_eq!(intent.format, PayloadFormat::Uri);
    }

    #[test]
    fn failed_emv_falls_through_to_uri() {
        // Opens with "00" but has no tag 26; the query part still decodes.
        let raw = "00pay?pa=fallback@upi&pn=Fallback";
        let intent = decode(raw).unwrap();
        assert_eq!(intent.format, PayloadFormat::Uri);
        assert_eq!(intent.payee_address.as_str(), "fallback@upi");
    }

    #[test]
    fn all_digit_non_emv_is_rejected() {
        assert_eq!(try_decode("123456789"), Err(DecodeError::UnrecognizedFormat));
    }

    #[test]
    fn emv_without_account_is_rejected() {
        let raw = rec("00", "01") + &rec("59", "Shop");
        assert_eq!(try_decode(&raw), Err(DecodeError::UnrecognizedFormat));
    }

    #[test]
    fn plain_text_is_rejected() {
        assert_eq!(try_decode("hello world"), Err(DecodeError::UnrecognizedFormat));
        assert_eq!(try_decode("https://example.com"), Err(DecodeError::UnrecognizedFormat));
        assert_eq!(
            try_decode("https://example.com/?q=1"),
            Err(DecodeError::MissingPayeeAddress)
        );
    }

    #[test]
    fn decode_and_try_decode_agree() {
        for raw in ["", "hello", "upi://pay?pa=a@b", "upi://pay?pa=ab", "000201"] {
            assert_eq!(decode(raw), try_decode(raw).ok(), "disagree on {raw:?}");
        }
    }

    #[test]
    fn decode_first_returns_first_valid_frame() {
        let frames = [
            "",
            "garbage",
            "upi://pay?pn=NoAddress",
            "upi://pay?pa=shop@upi",
            "upi://pay?pa=later@upi",
        ];
        let (index, intent) = decode_first(frames).unwrap();
        assert_eq!(index, 3);
        assert_eq!(intent.payee_address.as_str(), "shop@upi");
    }

    #[test]
    fn decode_first_without_valid_frame() {
        assert!(decode_first(["a", "b"]).is_none());
        assert!(decode_first(Vec::<String>::new()).is_none());
    }
}
