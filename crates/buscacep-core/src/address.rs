//! The canonical address record every source is normalized into.

use std::fmt;

/// One address record produced by a single successful source lookup.
///
/// Every field may be empty: upstreams omit fields freely, and the
/// normalizers never treat a missing field as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalAddress {
    pub postal_code: String,
    pub state: String,
    pub city: String,
    pub neighborhood: String,
    pub street: String,
    /// Fixed label of the source that produced this record.
    pub source_name: String,
}

impl CanonicalAddress {
    /// True when the upstream answered without any address data, e.g. the
    /// "not found" bodies both upstreams return for unknown CEPs.
    pub fn is_empty(&self) -> bool {
        self.postal_code.is_empty()
            && self.state.is_empty()
            && self.city.is_empty()
            && self.neighborhood.is_empty()
            && self.street.is_empty()
    }
}

impl fmt::Display for CanonicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{postalCode:{} state:{} city:{} neighborhood:{} street:{} sourceName:{}}}",
            self.postal_code,
            self.state,
            self.city,
            self.neighborhood,
            self.street,
            self.source_name
        )
    }
}
