//! Core types shared by every lookup source: the canonical address, the
//! per-source outcome, and the upstream-specific normalizers.

pub mod address;
pub mod normalize;
pub mod outcome;

pub use address::CanonicalAddress;
pub use normalize::{Decoder, brasil_api, via_cep};
pub use outcome::{ErrorKind, LookupError, LookupOutcome, source_name};
