//! # Decode Subcommand
//!
//! Decodes a single payload, given as an argument or read from stdin, the
//! way a QR scanner hands its result to the payment screen.
//!
//! A payload read from stdin loses one trailing line ending; the argument
//! form is decoded exactly as given.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use upi_core::try_decode;

use crate::render::{write_intent, write_json};
use crate::{OutputFormat, Settings, EXIT_OK, EXIT_REJECTED};

/// Arguments for the `upi decode` subcommand.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Raw payload text. Read from stdin when omitted.
    pub payload: Option<String>,
}

/// Execute the decode subcommand.
pub fn run_decode(args: &DecodeArgs, settings: &Settings) -> Result<u8> {
    let raw = match &args.payload {
        Some(payload) => payload.clone(),
        None => read_stdin_payload()?,
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    decode_to(&raw, settings, &mut out)
}

/// Decode `raw` and write the result; returns the exit code.
pub fn decode_to(raw: &str, settings: &Settings, out: &mut impl Write) -> Result<u8> {
    match try_decode(raw) {
        Ok(intent) => {
            tracing::info!(
                format = %intent.format,
                payee = %intent.payee_address,
                "decoded payment code"
            );
            write_intent(out, &intent, settings)?;
            Ok(EXIT_OK)
        }
        Err(reason) => {
            tracing::info!(%reason, "payload rejected");
            match settings.output {
                OutputFormat::Text => {
                    writeln!(out, "REJECTED: {reason}").context("failed to write output")?
                }
                OutputFormat::Json => write_json(out, &json!({ "rejected": reason.to_string() }))?,
            }
            Ok(EXIT_REJECTED)
        }
    }
}

fn read_stdin_payload() -> Result<String> {
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("failed to read payload from stdin")?;
    Ok(strip_line_ending(&raw).to_string())
}

/// Remove one trailing `\n` or `\r\n`.
pub(crate) fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
        .unwrap_or(line)
}
