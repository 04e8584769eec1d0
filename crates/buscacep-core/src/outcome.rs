//! Per-source lookup outcome and the failure taxonomy.

use std::fmt;

use thiserror::Error;

use crate::CanonicalAddress;

/// The settled result of one source lookup.
pub type LookupOutcome = Result<CanonicalAddress, LookupError>;

/// Where a source lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request could not be built (malformed endpoint URL).
    Build,
    /// Network failure, deadline expiry, or cancellation.
    Transport,
    /// The response body was not the JSON shape the source expects.
    Decode,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Build => "build error",
            ErrorKind::Transport => "transport error",
            ErrorKind::Decode => "decode error",
        };
        f.write_str(name)
    }
}

/// A failed source lookup, attributed to the source that produced it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{source_name}: {kind}: {detail}")]
pub struct LookupError {
    pub source_name: String,
    pub kind: ErrorKind,
    pub detail: String,
}

impl LookupError {
    /// Build an error of any kind; the per-kind constructors below are
    /// shorthands for this.
    pub fn new(source_name: impl Into<String>, kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            kind,
            detail: detail.into(),
        }
    }

    pub fn build(source_name: impl Into<String>, detail: impl fmt::Display) -> Self {
        Self::new(source_name, ErrorKind::Build, detail.to_string())
    }

    pub fn transport(source_name: impl Into<String>, detail: impl fmt::Display) -> Self {
        Self::new(source_name, ErrorKind::Transport, detail.to_string())
    }

    pub fn decode(source_name: impl Into<String>, detail: impl fmt::Display) -> Self {
        Self::new(source_name, ErrorKind::Decode, detail.to_string())
    }
}

/// Name of the source an outcome belongs to, whichever way it settled.
pub fn source_name(outcome: &LookupOutcome) -> &str {
    match outcome {
        Ok(address) => &address.source_name,
        Err(err) => &err.source_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_names_source_and_kind() {
        let err = LookupError::transport("ViaCep", "deadline exceeded");
        assert_eq!(err.kind, ErrorKind::Transport);
        assert_eq!(err.to_string(), "ViaCep: transport error: deadline exceeded");
    }

    #[test]
    fn source_name_reads_both_variants() {
        let ok: LookupOutcome = Ok(CanonicalAddress {
            source_name: "BrasilAPI".into(),
            ..Default::default()
        });
        let err: LookupOutcome = Err(LookupError::decode("ViaCep", "expected value"));
        assert_eq!(source_name(&ok), "BrasilAPI");
        assert_eq!(source_name(&err), "ViaCep");
    }
}
