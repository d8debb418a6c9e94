//! # Scan Subcommand
//!
//! Replays a stream of QR decoder results, one payload per line, the way a
//! camera loop feeds frames to the decoder: lines that are not payable
//! codes are skipped and the first one that decodes wins.
//!
//! Lines are decoded as they arrive, so a live feed gets its answer as soon
//! as a payable code shows up and nothing after it is read. Lines that are
//! not valid UTF-8 (binary QR content) are decoded lossily rather than
//! ending the scan.
//!
//! ```bash
//! zbarcam --raw | upi scan
//! upi scan captured-frames.txt --output json
//! ```

use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use upi_core::decode_first;

use crate::render::{intent_text, write_json};
use crate::{OutputFormat, Settings, EXIT_OK, EXIT_REJECTED};

/// Arguments for the `upi scan` subcommand.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// File with one payload per line. Read from stdin when omitted.
    pub file: Option<PathBuf>,
}

/// Execute the scan subcommand.
pub fn run_scan(args: &ScanArgs, settings: &Settings) -> Result<u8> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match &args.file {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            scan_to(BufReader::new(file), settings, &mut out)
                .with_context(|| format!("failed to scan {}", path.display()))
        }
        None => scan_to(std::io::stdin().lock(), settings, &mut out),
    }
}

/// Decode lines of `input` in order, stopping at the first payable one,
/// and write it.
///
/// Blank lines count towards the reported line number. A read error ends
/// the scan with an error unless a payable line was already found.
pub fn scan_to(input: impl BufRead, settings: &Settings, out: &mut impl Write) -> Result<u8> {
    let mut lines = 0usize;
    let mut read_error = None;

    let frames = input
        .split(b'\n')
        .map_while(|line| match line {
            Ok(bytes) => Some(frame_text(bytes)),
            Err(e) => {
                read_error = Some(e);
                None
            }
        })
        .inspect(|_| lines += 1);
    let found = decode_first(frames);

    let Some((index, intent)) = found else {
        if let Some(e) = read_error {
            return Err(e).context("failed to read frames");
        }
        tracing::info!(lines, "no payable code found");
        match settings.output {
            OutputFormat::Text => writeln!(out, "NO PAYMENT CODE in {lines} line(s)")
                .context("failed to write output")?,
            OutputFormat::Json => write_json(out, &json!({ "found": false, "lines": lines }))?,
        }
        return Ok(EXIT_REJECTED);
    };

    let line = index + 1;
    tracing::info!(line, format = %intent.format, "payable code found");
    match settings.output {
        OutputFormat::Text => writeln!(
            out,
            "Line {line}:\n{}",
            intent_text(&intent, settings.grouped_amounts)
        )
        .context("failed to write output")?,
        OutputFormat::Json => {
            write_json(out, &json!({ "found": true, "line": line, "intent": intent }))?
        }
    }
    Ok(EXIT_OK)
}

/// One frame from a raw line: trailing `\r` removed, invalid UTF-8 replaced.
fn frame_text(mut bytes: Vec<u8>) -> String {
    if bytes.last() == Some(&b'\r') {
        bytes.pop();
    }
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(
                len = e.as_bytes().len(),
                "frame is not valid UTF-8; decoding lossily"
            );
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}
