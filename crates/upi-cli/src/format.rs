//! # Format Subcommand
//!
//! Prints the two-decimal display form of an amount string, optionally with
//! Indian digit grouping (`12,34,567.50`).

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use crate::render::{amount_text, write_json};
use crate::{OutputFormat, Settings, EXIT_OK};

/// Arguments for the `upi format` subcommand.
#[derive(Args, Debug)]
pub struct FormatArgs {
    /// Amount as it appears in a payload, e.g. `150` or `99.5`.
    #[arg(allow_hyphen_values = true)]
    pub amount: String,

    /// Group the integer part in lakhs and crores.
    #[arg(long)]
    pub grouped: bool,
}

/// Execute the format subcommand.
pub fn run_format(args: &FormatArgs, settings: &Settings) -> Result<u8> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    format_to(args, settings, &mut out)
}

/// Write the formatted amount. Unreadable input formats as `0.00`.
pub fn format_to(args: &FormatArgs, settings: &Settings, out: &mut impl Write) -> Result<u8> {
    let grouped = args.grouped || settings.grouped_amounts;
    let formatted = amount_text(Some(&args.amount), grouped);
    match settings.output {
        OutputFormat::Text => writeln!(out, "{formatted}").context("failed to write output")?,
        OutputFormat::Json => write_json(
            out,
            &json!({ "input": args.amount, "formatted": formatted, "grouped": grouped }),
        )?,
    }
    Ok(EXIT_OK)
}
