//! # upi CLI entry point
//!
//! Parses command-line arguments, loads the optional config file, installs
//! the tracing subscriber on stderr and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use upi_cli::config::{CliConfig, LogFormat};
use upi_cli::decode::{run_decode, DecodeArgs};
use upi_cli::encode::{run_encode, EncodeArgs};
use upi_cli::format::{run_format, FormatArgs};
use upi_cli::scan::{run_scan, ScanArgs};
use upi_cli::{OutputFormat, Settings};

/// UPI payment code toolkit
///
/// Decodes `upi://pay` URIs and BharatQR (EMVCo TLV) payloads into a single
/// payment intent, formats amounts, and generates payment URIs from a
/// manually entered UPI ID.
#[derive(Parser, Debug)]
#[command(name = "upi", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format. Overrides the config file.
    #[arg(long, value_enum, global = true)]
    output: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode one payload from the argument or stdin.
    Decode(DecodeArgs),

    /// Report the first payable code among lines of input.
    Scan(ScanArgs),

    /// Format an amount with two decimals.
    Format(FormatArgs),

    /// Validate a manual entry and print its upi://pay URI.
    Encode(EncodeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = CliConfig::load_optional(cli.config.as_deref());
    let (log_level, log_format) = match &config {
        Ok(config) => (config.log_level.as_deref(), config.log_format),
        Err(_) => (None, LogFormat::Text),
    };
    init_tracing(&filter_directive(cli.verbose, log_level), log_format);

    tracing::debug!("upi CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };
    let settings = Settings::resolve(&config, cli.output);

    let result = match cli.command {
        Commands::Decode(args) => run_decode(&args, &settings),
        Commands::Scan(args) => run_scan(&args, &settings),
        Commands::Format(args) => run_format(&args, &settings),
        Commands::Encode(args) => run_encode(&args, &settings),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

/// Log filter: the config's `log_level` when set, otherwise by verbosity.
fn filter_directive(verbose: u8, log_level: Option<&str>) -> String {
    if let Some(level) = log_level {
        return level.to_string();
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
    .to_string()
}

fn init_tracing(directive: &str, format: LogFormat) {
    let (filter, rejected) = match EnvFilter::try_new(directive) {
        Ok(filter) => (filter, None),
        Err(e) => (EnvFilter::new("warn"), Some(e)),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }

    if let Some(e) = rejected {
        tracing::warn!(directive, "invalid log_level in config, using warn: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_decode_with_payload() {
        let cli = Cli::try_parse_from(["upi", "decode", "upi://pay?pa=a@b&am=1"]).unwrap();
        if let Commands::Decode(args) = cli.command {
            assert_eq!(args.payload.as_deref(), Some("upi://pay?pa=a@b&am=1"));
        } else {
            panic!("expected decode");
        }
    }

    #[test]
    fn cli_parse_decode_from_stdin() {
        let cli = Cli::try_parse_from(["upi", "decode"]).unwrap();
        if let Commands::Decode(args) = cli.command {
            assert!(args.payload.is_none());
        }
    }

    #[test]
    fn cli_parse_scan() {
        let cli = Cli::try_parse_from(["upi", "scan", "frames.txt"]).unwrap();
        if let Commands::Scan(args) = cli.command {
            assert_eq!(args.file, Some(PathBuf::from("frames.txt")));
        }
        let cli = Cli::try_parse_from(["upi", "scan"]).unwrap();
        assert!(matches!(cli.command, Commands::Scan(ScanArgs { file: None })));
    }

    #[test]
    fn cli_parse_format() {
        let cli = Cli::try_parse_from(["upi", "format", "1234.5", "--grouped"]).unwrap();
        if let Commands::Format(args) = cli.command {
            assert_eq!(args.amount, "1234.5");
            assert!(args.grouped);
        }
    }

    #[test]
    fn cli_parse_format_negative_amount() {
        let cli = Cli::try_parse_from(["upi", "format", "-5"]).unwrap();
        if let Commands::Format(args) = cli.command {
            assert_eq!(args.amount, "-5");
            assert!(!args.grouped);
        }
    }

    #[test]
    fn cli_parse_encode_all_fields() {
        let cli = Cli::try_parse_from([
            "upi",
            "encode",
            "--pa",
            "shop@upi",
            "--am",
            "10",
            "--pn",
            "Shop",
            "--tn",
            "Tea",
        ])
        .unwrap();
        if let Commands::Encode(args) = cli.command {
            assert_eq!(args.vpa, "shop@upi");
            assert_eq!(args.amount, "10");
            assert_eq!(args.name.as_deref(), Some("Shop"));
            assert_eq!(args.note.as_deref(), Some("Tea"));
        }
    }

    #[test]
    fn cli_parse_encode_requires_pa_and_am() {
        assert!(Cli::try_parse_from(["upi", "encode", "--am", "10"]).is_err());
        assert!(Cli::try_parse_from(["upi", "encode", "--pa", "a@b"]).is_err());
    }

    #[test]
    fn cli_parse_verbose_levels() {
        let cli0 = Cli::try_parse_from(["upi", "format", "1"]).unwrap();
        assert_eq!(cli0.verbose, 0);

        let cli2 = Cli::try_parse_from(["upi", "-vv", "format", "1"]).unwrap();
        assert_eq!(cli2.verbose, 2);

        let cli3 = Cli::try_parse_from(["upi", "decode", "x", "-vvv"]).unwrap();
        assert_eq!(cli3.verbose, 3);
    }

    #[test]
    fn cli_parse_global_options() {
        let cli = Cli::try_parse_from([
            "upi", "--config", "upi.yaml", "decode", "x", "--output", "json",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("upi.yaml")));
        assert_eq!(cli.output, Some(OutputFormat::Json));
    }

    #[test]
    fn cli_parse_bad_output_errors() {
        assert!(Cli::try_parse_from(["upi", "--output", "xml", "format", "1"]).is_err());
    }

    #[test]
    fn cli_parse_no_subcommand_errors() {
        assert!(Cli::try_parse_from(["upi"]).is_err());
    }

    #[test]
    fn cli_parse_invalid_subcommand_errors() {
        assert!(Cli::try_parse_from(["upi", "nonexistent"]).is_err());
    }

    #[test]
    fn filter_by_verbosity() {
        assert_eq!(filter_directive(0, None), "warn");
        assert_eq!(filter_directive(1, None), "info");
        assert_eq!(filter_directive(2, None), "debug");
        assert_eq!(filter_directive(7, None), "trace");
    }

    #[test]
    fn config_log_level_wins() {
        assert_eq!(filter_directive(3, Some("upi_core=debug")), "upi_core=debug");
    }

    #[test]
    fn cli_debug_impl() {
        let cli = Cli::try_parse_from(["upi", "format", "1"]).unwrap();
        assert!(format!("{cli:?}").contains("Format"));
    }
}
