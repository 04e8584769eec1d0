//! Lookup layer: per-source HTTP clients with bounded deadlines, and the
//! coordinator that fans a postal code out to every registered source.

mod context;
mod coordinator;
mod source;

pub use context::{CancelHandle, DoneReason, LookupContext};
pub use coordinator::Coordinator;
pub use source::{ClientError, DEFAULT_TIMEOUT, SourceClient, SourceSpec, default_sources};

pub use buscacep_core::{CanonicalAddress, ErrorKind, LookupError, LookupOutcome, source_name};
