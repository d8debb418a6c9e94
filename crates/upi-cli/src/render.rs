//! # Output Rendering
//!
//! Shared text and JSON writers for command results. Every subcommand
//! writes through these so that `--output json` gives one JSON document per
//! invocation and text output lines up the same way everywhere.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use upi_core::{format_amount, format_amount_grouped, PaymentIntent};

use crate::{OutputFormat, Settings};

const LABEL_WIDTH: usize = 13;

/// Render an amount the way text output shows it.
pub fn amount_text(amount: Option<&str>, grouped: bool) -> String {
    if grouped {
        format_amount_grouped(amount)
    } else {
        format_amount(amount)
    }
}

/// Text block for one intent, one `Label: value` line per present field.
pub fn intent_text(intent: &PaymentIntent, grouped: bool) -> String {
    let mut lines = vec![
        line("Payee", &intent.payee_name),
        line("UPI ID", intent.payee_address.as_str()),
    ];

    let amount = if intent.has_fixed_amount() {
        let text = amount_text(intent.amount.as_deref(), grouped);
        format!("{} {text}", intent.currency_code)
    } else {
        format!("{} (entered by payer)", intent.currency_code)
    };
    lines.push(line("Amount", &amount));

    if let Some(note) = &intent.note {
        lines.push(line("Note", note));
    }
    if let Some(reference) = &intent.transaction_reference {
        lines.push(line("Reference", reference));
    }
    if let Some(mcc) = &intent.merchant_category_code {
        lines.push(line("MCC", mcc));
    }
    if let Some(location) = &intent.merchant_location {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(city) = location.city.as_deref() {
            parts.push(city);
        }
        if let Some(postal) = location.postal_code.as_deref() {
            parts.push(postal);
        }
        parts.push(&location.country);
        lines.push(line("Location", &parts.join(", ")));
    }
    lines.push(line("Format", intent.format.as_str()));
    lines.join("\n")
}

/// Write one intent in the configured output format.
pub fn write_intent(
    out: &mut impl Write,
    intent: &PaymentIntent,
    settings: &Settings,
) -> Result<()> {
    match settings.output {
        OutputFormat::Text => {
            writeln!(out, "{}", intent_text(intent, settings.grouped_amounts))
                .context("failed to write output")
        }
        OutputFormat::Json => write_json(out, intent),
    }
}

/// Write any serialisable value as pretty JSON followed by a newline.
pub fn write_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialise output")?;
    writeln!(out, "{json}").context("failed to write output")
}

fn line(label: &str, value: &str) -> String {
    format!("{:<width$}{value}", format!("{label}:"), width = LABEL_WIDTH)
}
