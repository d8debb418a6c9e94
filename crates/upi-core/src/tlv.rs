//! # TLV Walker: EMVCo Tag-Length-Value Records
//!
//! EMVCo merchant-presented QR payloads are a flat concatenation of
//! records:
//!
//! ```text
//! +--------+-----------+------------------+
//! | tag(2) | length(2) | value(length)    |  ... repeated to end of input
//! +--------+-----------+------------------+
//! ```
//!
//! Tags are two characters, lengths are two decimal digits, and both the
//! length and the offsets count characters rather than bytes, so merchant
//! names outside ASCII walk correctly.
//!
//! ## Abort Semantics
//!
//! Every read is bounds-checked. A truncated header, a non-numeric length,
//! or a value running past the end of input ends the walk with a single
//! [`TlvError`]; after that the reader is exhausted. Records yielded before
//! the error stay valid, which is what lets the EMV layer honour a VPA found
//! before a damaged trailer.

use std::collections::BTreeMap;

use crate::error::TlvError;

/// Width of the tag id in characters.
pub const TAG_WIDTH: usize = 2;

/// Width of the length field in characters.
pub const LENGTH_WIDTH: usize = 2;

const HEADER_WIDTH: usize = TAG_WIDTH + LENGTH_WIDTH;

/// One record borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlvRecord<'a> {
    /// Two-character tag id.
    pub tag: &'a str,
    /// Record value, exactly `length` characters.
    pub value: &'a str,
    /// Character offset of the record start within the walked input.
    pub offset: usize,
}

/// Iterator over the records of a TLV string.
///
/// Yields `Ok(record)` until the input is exhausted, or one `Err` at the
/// first malformed record and then `None`.
#[derive(Debug, Clone)]
pub struct TlvReader<'a> {
    rest: &'a str,
    offset: usize,
    done: bool,
}

impl<'a> TlvReader<'a> {
    /// Start a walk at the beginning of `input`.
    pub fn new(input: &'a str) -> Self {
        Self {
            rest: input,
            offset: 0,
            done: false,
        }
    }

    fn fail(&mut self, err: TlvError) -> Option<Result<TlvRecord<'a>, TlvError>> {
        self.done = true;
        Some(Err(err))
    }
}

impl<'a> Iterator for TlvReader<'a> {
    type Item = Result<TlvRecord<'a>, TlvError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.rest.is_empty() {
            self.done = true;
            return None;
        }

        let start = self.offset;
        let remaining = self.rest.chars().count();

        let Some((header, body)) = split_chars(self.rest, HEADER_WIDTH) else {
            let tag = self.rest.chars().take(TAG_WIDTH).collect();
            return self.fail(TlvError::Truncated {
                tag,
                offset: start,
                needed: HEADER_WIDTH,
                remaining,
            });
        };
        let (tag, length) = split_chars(header, TAG_WIDTH).unwrap_or((header, ""));

        let Some(len) = parse_length(length) else {
            return self.fail(TlvError::InvalidLength {
                tag: tag.to_string(),
                offset: start,
                length: length.to_string(),
            });
        };

        let Some((value, rest)) = split_chars(body, len) else {
            return self.fail(TlvError::Truncated {
                tag: tag.to_string(),
                offset: start,
                needed: HEADER_WIDTH + len,
                remaining,
            });
        };

        self.rest = rest;
        self.offset = start + HEADER_WIDTH + len;
        Some(Ok(TlvRecord {
            tag,
            value,
            offset: start,
        }))
    }
}

impl std::iter::FusedIterator for TlvReader<'_> {}

/// Top-level records of a TLV string keyed by tag.
///
/// A tag that appears more than once keeps its last value. If the walk
/// aborted, the records before the abort are kept and the reason is
/// available through [`TlvMap::abort`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlvMap<'a> {
    fields: BTreeMap<&'a str, &'a str>,
    abort: Option<TlvError>,
}

impl<'a> TlvMap<'a> {
    /// Walk `input` and collect its records.
    pub fn parse(input: &'a str) -> Self {
        let mut map = Self::default();
        for record in TlvReader::new(input) {
            match record {
                Ok(record) => {
                    map.fields.insert(record.tag, record.value);
                }
                Err(err) => map.abort = Some(err),
            }
        }
        map
    }

    /// Value of `tag`, if the walk reached it.
    pub fn get(&self, tag: &str) -> Option<&'a str> {
        self.fields.get(tag).copied()
    }

    /// Value of `tag` unless it is absent or empty.
    pub fn non_empty(&self, tag: &str) -> Option<&'a str> {
        self.get(tag).filter(|v| !v.is_empty())
    }

    /// Why the walk stopped early, if it did.
    pub fn abort(&self) -> Option<&TlvError> {
        self.abort.as_ref()
    }

    /// Number of distinct tags collected.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no record was collected.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// First value carried by `tag` in `input`, scanning until the walk ends or aborts.
pub fn find_first<'a>(input: &'a str, tag: &str) -> Option<&'a str> {
    TlvReader::new(input)
        .map_while(Result::ok)
        .find(|record| record.tag == tag)
        .map(|record| record.value)
}

fn parse_length(token: &str) -> Option<usize> {
    if token.len() == LENGTH_WIDTH && token.bytes().all(|b| b.is_ascii_digit()) {
        token.parse().ok()
    } else {
        None
    }
}

/// Split `s` after `n` characters; `None` if `s` is shorter than `n` characters.
fn split_chars(s: &str, n: usize) -> Option<(&str, &str)> {
    if n == 0 {
        return Some(("", s));
    }
    match s.char_indices().nth(n) {
        Some((idx, _)) => Some(s.split_at(idx)),
        None if s.chars().count() == n => Some((s, "")),
        None => None,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn record() -> impl Strategy<Value = (String, String)> {
        ("[0-9]{2}", "[ -~]{0,20}")
    }

    proptest! {
        /// The walker never panics and never yields a value past the end of input.
        #[test]
        fn walker_total_on_arbitrary_input(input in "\\PC{0,80}") {
            let mut total = 0usize;
            for rec in TlvReader::new(&input).map_while(Result::ok) {
                total += HEADER_WIDTH + rec.value.chars().count();
            }
            prop_assert!(total <= input.chars().count());
        }

        /// Well-formed concatenations walk back into the same records.
        #[test]
        fn encoded_records_walk_back(recs in prop::collection::vec(record(), 0..8)) {
            let input: String = recs
                .iter()
                .map(|(tag, value)| format!("{tag}{:02}{value}", value.chars().count()))
                .collect();
            let walked: Vec<(String, String)> = TlvReader::new(&input)
                .map(|r| r.map(|rec| (rec.tag.to_string(), rec.value.to_string())))
                .collect::<Result<_, _>>()
                .unwrap();
            prop_assert_eq!(walked, recs);
        }
    }
}
