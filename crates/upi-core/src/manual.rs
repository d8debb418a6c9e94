//! # Manual Entry
//!
//! Builds a [`PaymentIntent`] from fields typed into a "pay to UPI ID" form.
//! Unlike scanned payloads, typed input is held to the strict address rule
//! (see [`Vpa::is_strict`]) and must carry a positive amount. All field
//! errors are collected so the form can show them together.

use crate::amount::parse_amount;
use crate::error::{ManualEntryError, ManualEntryRejected};
use crate::intent::{PayloadFormat, PaymentIntent, DEFAULT_CURRENCY};
use crate::vpa::Vpa;

/// Raw form fields as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualEntry {
    /// UPI ID, e.g. `name@bank`.
    pub vpa: String,
    /// Optional payee name.
    pub name: Option<String>,
    /// Amount to pay.
    pub amount: String,
    /// Optional note.
    pub note: Option<String>,
}

impl ManualEntry {
    /// Start an entry with the two required fields.
    pub fn new(vpa: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            vpa: vpa.into(),
            amount: amount.into(),
            ..Self::default()
        }
    }

    /// Set the payee name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the note.
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Validate and convert into an intent.
    ///
    /// The payee name defaults to the UPI ID itself. `raw_payload` holds the
    /// `upi://pay` URI equivalent of the entry.
    ///
    /// # Errors
    ///
    /// Returns every [`ManualEntryError`] found, in field order.
    pub fn into_intent(self) -> Result<PaymentIntent, ManualEntryRejected> {
        let mut errors = Vec::new();

        let vpa = self.vpa.trim();
        let payee_address = if vpa.is_empty() {
            errors.push(ManualEntryError::MissingVpa);
            None
        } else {
            match Vpa::new(vpa) {
                Ok(addr) if addr.is_strict() => Some(addr),
                _ => {
                    errors.push(ManualEntryError::InvalidVpa(vpa.to_string()));
                    None
                }
            }
        };

        let amount = self.amount.trim();
        if amount.is_empty() {
            errors.push(ManualEntryError::MissingAmount);
        } else if !parse_amount(amount).is_some_and(|v| v > 0.0) {
            errors.push(ManualEntryError::InvalidAmount(amount.to_string()));
        }

        let payee_address = match payee_address {
            Some(addr) if errors.is_empty() => addr,
            _ => return Err(ManualEntryRejected(errors)),
        };

        let payee_name = non_blank(self.name).unwrap_or_else(|| payee_address.to_string());
        let mut intent = PaymentIntent {
            payee_address,
            payee_name,
            amount: Some(amount.to_string()),
            note: non_blank(self.note),
            transaction_reference: None,
            merchant_category_code: None,
            currency_code: DEFAULT_CURRENCY.to_string(),
            merchant_location: None,
            raw_payload: String::new(),
            format: PayloadFormat::Manual,
        };
        intent.raw_payload = intent.to_upi_uri();
        Ok(intent)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
