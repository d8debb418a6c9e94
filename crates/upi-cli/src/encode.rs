//! # Encode Subcommand
//!
//! Validates a "pay to UPI ID" entry and prints the equivalent
//! `upi://pay` URI, ready to be rendered as a receive-money QR code.
//!
//! ```bash
//! upi encode --pa chai.stall@okaxis --am 40 --pn "Chai Stall" --tn "2 cutting"
//! # upi://pay?pa=chai.stall@okaxis&pn=Chai%20Stall&am=40&tn=2%20cutting&cu=INR
//! ```

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use upi_core::ManualEntry;

use crate::render::write_json;
use crate::{OutputFormat, Settings, EXIT_OK, EXIT_REJECTED};

/// Arguments for the `upi encode` subcommand.
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Payee UPI ID, e.g. `name@bank`.
    #[arg(long = "pa", value_name = "VPA")]
    pub vpa: String,

    /// Amount to request.
    #[arg(long = "am", value_name = "AMOUNT", allow_hyphen_values = true)]
    pub amount: String,

    /// Payee name. Defaults to the UPI ID.
    #[arg(long = "pn", value_name = "NAME")]
    pub name: Option<String>,

    /// Transaction note.
    #[arg(long = "tn", value_name = "NOTE")]
    pub note: Option<String>,
}

impl EncodeArgs {
    fn entry(&self) -> ManualEntry {
        ManualEntry {
            vpa: self.vpa.clone(),
            name: self.name.clone(),
            amount: self.amount.clone(),
            note: self.note.clone(),
        }
    }
}

/// Execute the encode subcommand.
pub fn run_encode(args: &EncodeArgs, settings: &Settings) -> Result<u8> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    encode_to(args, settings, &mut out)
}

/// Validate the entry and write either its URI or every field error.
pub fn encode_to(args: &EncodeArgs, settings: &Settings, out: &mut impl Write) -> Result<u8> {
    match args.entry().into_intent() {
        Ok(intent) => {
            tracing::info!(payee = %intent.payee_address, "manual entry accepted");
            match settings.output {
                OutputFormat::Text => {
                    writeln!(out, "{}", intent.raw_payload).context("failed to write output")?
                }
                OutputFormat::Json => {
                    write_json(out, &json!({ "uri": intent.raw_payload, "intent": intent }))?
                }
            }
            Ok(EXIT_OK)
        }
        Err(rejected) => {
            tracing::info!(errors = rejected.errors().len(), "manual entry rejected");
            let messages: Vec<String> = rejected.errors().iter().map(ToString::to_string).collect();
            match settings.output {
                OutputFormat::Text => {
                    for message in &messages {
                        writeln!(out, "REJECTED: {message}").context("failed to write output")?;
                    }
                }
                OutputFormat::Json => write_json(out, &json!({ "errors": messages }))?,
            }
            Ok(EXIT_REJECTED)
        }
    }
}
