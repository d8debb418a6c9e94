//! # EMV / BharatQR Decoder
//!
//! Maps the top-level records of an EMVCo merchant-presented QR payload
//! onto a [`PaymentIntent`]. The UPI address sits in the merchant account
//! information template reserved for UPI in India (tag `26`, sub-tag `01`);
//! without it the payload is not payable and decoding fails.
//!
//! | Tag | Field |
//! |-----|-------|
//! | `00` | Payload format indicator (must open the payload) |
//! | `26` | UPI merchant account information, nested `01` = VPA |
//! | `52` | Merchant category code |
//! | `53` | Transaction currency, ISO 4217 numeric |
//! | `54` | Transaction amount |
//! | `58` | Country code, default `IN` |
//! | `59` | Merchant name |
//! | `60` | Merchant city |
//! | `61` | Postal code |
//! | `62` | Additional data template, see [`AdditionalData`] |
//! | `63` | CRC, not validated |

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::intent::{MerchantLocation, PayloadFormat, PaymentIntent, DEFAULT_CURRENCY};
use crate::tlv::{find_first, TlvMap, TlvReader};
use crate::vpa::Vpa;

/// Payload format indicator.
pub const TAG_PAYLOAD_FORMAT: &str = "00";
/// Merchant account information template reserved for UPI.
pub const TAG_UPI_MERCHANT_ACCOUNT: &str = "26";
/// VPA inside the UPI merchant account template.
pub const SUBTAG_VPA: &str = "01";
/// Merchant category code.
pub const TAG_MCC: &str = "52";
/// Transaction currency (ISO 4217 numeric).
pub const TAG_CURRENCY: &str = "53";
/// Transaction amount.
pub const TAG_AMOUNT: &str = "54";
/// Country code (ISO 3166-1 alpha-2).
pub const TAG_COUNTRY: &str = "58";
/// Merchant name.
pub const TAG_MERCHANT_NAME: &str = "59";
/// Merchant city.
pub const TAG_CITY: &str = "60";
/// Postal code.
pub const TAG_POSTAL_CODE: &str = "61";
/// Additional data field template.
pub const TAG_ADDITIONAL_DATA: &str = "62";

/// Country assumed when tag 58 is absent.
pub const DEFAULT_COUNTRY: &str = "IN";

/// ISO 4217 numeric code of the Indian rupee.
pub const INR_NUMERIC: &str = "356";

/// Sub-fields of the additional data template (tag 62).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalData {
    /// Sub-tag 01.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_number: Option<String>,
    /// Sub-tag 05.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    /// Sub-tag 07.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal_id: Option<String>,
    /// Sub-tag 08.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
}

impl AdditionalData {
    /// Walk a tag 62 value. Later duplicates overwrite earlier ones; a
    /// malformed sub-record ends the walk and keeps what was read.
    pub fn parse(template: &str) -> Self {
        let mut data = Self::default();
        for record in TlvReader::new(template).map_while(Result::ok) {
            let slot = match record.tag {
                "01" => &mut data.bill_number,
                "05" => &mut data.reference_id,
                "07" => &mut data.terminal_id,
                "08" => &mut data.store_id,
                _ => continue,
            };
            *slot = Some(record.value.to_string());
        }
        data
    }

    /// Note synthesised from the bill number, e.g. `Bill: INV-42`.
    pub fn bill_note(&self) -> Option<String> {
        self.bill_number
            .as_deref()
            .filter(|b| !b.is_empty())
            .map(|b| format!("Bill: {b}"))
    }
}

/// Translate an ISO 4217 numeric code into the label used on intents.
///
/// Only the rupee has a label; any other code passes through unchanged.
pub fn currency_label(numeric: &str) -> &str {
    match numeric {
        INR_NUMERIC => DEFAULT_CURRENCY,
        other => other,
    }
}

/// Decode an EMVCo / BharatQR payload.
///
/// # Errors
///
/// - [`DecodeError::NotEmv`] if the payload does not start with tag `00`.
/// - [`DecodeError::MissingMerchantAccount`] if no tag `26` / sub-tag `01`
///   was reached before the walk ended or aborted.
/// - [`DecodeError::InvalidPayeeAddress`] if the nested VPA is malformed.
pub fn decode_emv(raw: &str) -> Result<PaymentIntent, DecodeError> {
    if !raw.starts_with(TAG_PAYLOAD_FORMAT) {
        return Err(DecodeError::NotEmv);
    }

    let tags = TlvMap::parse(raw);
    if let Some(abort) = tags.abort() {
        tracing::debug!(%abort, "EMV walk stopped early; using records read so far");
    }

    let vpa = tags
        .get(TAG_UPI_MERCHANT_ACCOUNT)
        .and_then(|account| find_first(account, SUBTAG_VPA))
        .filter(|v| !v.is_empty())
        .ok_or(DecodeError::MissingMerchantAccount)?;
    let payee_address = Vpa::new(vpa)?;

    let payee_name = tags
        .non_empty(TAG_MERCHANT_NAME)
        .map(str::to_string)
        .unwrap_or_else(|| payee_address.display_name());

    let currency_code = tags
        .non_empty(TAG_CURRENCY)
        .map(currency_label)
        .unwrap_or(DEFAULT_CURRENCY)
        .to_string();

    let additional = tags
        .get(TAG_ADDITIONAL_DATA)
        .map(AdditionalData::parse)
        .unwrap_or_default();

    let merchant_location = MerchantLocation {
        city: owned(tags.non_empty(TAG_CITY)),
        country: tags
            .non_empty(TAG_COUNTRY)
            .unwrap_or(DEFAULT_COUNTRY)
            .to_string(),
        postal_code: owned(tags.non_empty(TAG_POSTAL_CODE)),
    };

    Ok(PaymentIntent {
        payee_address,
        payee_name,
        amount: owned(tags.non_empty(TAG_AMOUNT)),
        note: additional.bill_note(),
        transaction_reference: additional.reference_id.filter(|r| !r.is_empty()),
        merchant_category_code: owned(tags.non_empty(TAG_MCC)),
        currency_code,
        merchant_location: Some(merchant_location),
        raw_payload: raw.to_string(),
        format: PayloadFormat::Emv,
    })
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}
