//! # upi-cli: Command Line for UPI Payment Codes
//!
//! Provides the `upi` command-line interface over `upi-core`.
//!
//! ## Subcommands
//!
//! - `upi decode`: Decode one payload (argument or stdin).
//! - `upi scan`: Treat each input line as a camera frame; report the first payable code.
//! - `upi format`: Two-decimal amount rendering.
//! - `upi encode`: Validate a manual entry and print its `upi://pay` URI.
//!
//! ```bash
//! upi decode 'upi://pay?pa=merchant@bank&pn=CoffeeShop&am=150.00'
//! zbarimg --raw frames/*.png | upi scan --output json
//! upi format 1234567.5 --grouped
//! upi encode --pa chai.stall@okaxis --am 40 --pn "Chai Stall"
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: success.
//! - `1`: operational failure (I/O, configuration).
//! - `2`: the input was read but is not a payable code, or the entry was rejected.

pub mod config;
pub mod decode;
pub mod encode;
pub mod format;
pub mod render;
pub mod scan;

use serde::{Deserialize, Serialize};

use crate::config::CliConfig;

/// Exit code for a successful command.
pub const EXIT_OK: u8 = 0;

/// Exit code for a rejected payload or manual entry.
pub const EXIT_REJECTED: u8 = 2;

/// How command results are written to stdout.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned `Label: value` lines.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Effective output settings after merging the config file and flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    pub output: OutputFormat,
    pub grouped_amounts: bool,
}

impl Settings {
    /// Merge a loaded config with the `--output` flag; the flag wins.
    pub fn resolve(config: &CliConfig, output_flag: Option<OutputFormat>) -> Self {
        Self {
            output: output_flag.unwrap_or(config.output),
            grouped_amounts: config.grouped_amounts,
        }
    }
}
