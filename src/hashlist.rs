//! Hash list normalization.
//!
//! Callers submit hashes either as a JSON array or as a single delimited string.
//! For strings, the delimiter is taken from the request when given, otherwise it
//! is sniffed from the payload in this order:
//!
//! 1. `%0A` (a URL-encoded newline), with leading and trailing occurrences stripped
//! 2. `,`
//! 3. the two characters `\n` (an escaped newline that was never unescaped)
//!
//! Individual hashes are passed through untouched: no trimming, case folding or
//! deduplication.

use thiserror::Error;

pub const ENCODED_NEWLINE: &str = "%0A";
pub const COMMA: &str = ",";
pub const ESCAPED_NEWLINE: &str = "\\n";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HashListError {
    /// Carries the raw payload so the caller can report what it could not split.
    #[error("could not parse hash list: {0}")]
    Unparseable(String),
}

/// The delimiter a hash string was split on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delimiter {
    EncodedNewline,
    Comma,
    EscapedNewline,
    Explicit(String),
}

impl Delimiter {
    pub fn as_str(&self) -> &str {
        match self {
            Delimiter::EncodedNewline => ENCODED_NEWLINE,
            Delimiter::Comma => COMMA,
            Delimiter::EscapedNewline => ESCAPED_NEWLINE,
            Delimiter::Explicit(d) => d,
        }
    }

    /// Picks the first delimiter rule that applies to `raw`.
    pub fn sniff(raw: &str) -> Option<Self> {
        if raw.contains(ENCODED_NEWLINE) {
            Some(Delimiter::EncodedNewline)
        } else if raw.contains(COMMA) {
            Some(Delimiter::Comma)
        } else if raw.contains(ESCAPED_NEWLINE) {
            Some(Delimiter::EscapedNewline)
        } else {
            None
        }
    }

    fn strips_edges(&self) -> bool {
        matches!(self, Delimiter::EncodedNewline | Delimiter::Explicit(_))
    }
}

/// Ordered list of hashes ready for the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashList {
    hashes: Vec<String>,
    delimiter: Option<Delimiter>,
}

impl HashList {
    /// Splits a delimited string. An explicit, non-empty `delimiter` wins over sniffing.
    pub fn parse(raw: &str, delimiter: Option<&str>) -> Result<Self, HashListError> {
        let delimiter = match delimiter.filter(|d| !d.is_empty()) {
            Some(explicit) => Delimiter::Explicit(explicit.to_string()),
            None => Delimiter::sniff(raw)
                .ok_or_else(|| HashListError::Unparseable(raw.to_string()))?,
        };

        let sep = delimiter.as_str();
        let body = if delimiter.strips_edges() {
            strip_sequence(raw, sep)
        } else {
            raw
        };

        if body.is_empty() {
            return Err(HashListError::Unparseable(raw.to_string()));
        }

        Ok(Self {
            hashes: body.split(sep).map(str::to_owned).collect(),
            delimiter: Some(delimiter),
        })
    }

    /// Takes an already-tokenized list as-is.
    pub fn from_entries(entries: Vec<String>) -> Result<Self, HashListError> {
        if entries.is_empty() {
            return Err(HashListError::Unparseable("[]".to_string()));
        }
        Ok(Self {
            hashes: entries,
            delimiter: None,
        })
    }

    pub fn delimiter(&self) -> Option<&Delimiter> {
        self.delimiter.as_ref()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.hashes
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

/// Removes every leading and trailing occurrence of the whole `seq`.
fn strip_sequence<'a>(mut s: &'a str, seq: &str) -> &'a str {
    while let Some(rest) = s.strip_prefix(seq) {
        s = rest;
    }
    while let Some(rest) = s.strip_suffix(seq) {
        s = rest;
    }
    s
}
