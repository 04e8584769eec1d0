//! Plain-text cards for lookup outcomes.

use buscacep_client::{CanonicalAddress, LookupOutcome, source_name};

const LABEL_WIDTH: usize = 14;

// ── Public API ──

/// Print every outcome as a card, in the order given.
pub fn print_outcomes(outcomes: &[LookupOutcome]) {
    for (i, outcome) in outcomes.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{}", render_outcome(outcome));
    }
}

/// Render one outcome as a card headed by its source name.
pub fn render_outcome(outcome: &LookupOutcome) -> String {
    let mut out = format!("=== {} ===\n", source_name(outcome));
    match outcome {
        Ok(address) => render_address(&mut out, address),
        Err(err) => line(&mut out, "failed", &format!("{}: {}", err.kind, err.detail)),
    }
    out
}

// ── Card rendering ──

fn render_address(out: &mut String, address: &CanonicalAddress) {
    if address.is_empty() {
        line(out, "result", "no address data");
        return;
    }

    let fields = [
        ("postalCode", &address.postal_code),
        ("state", &address.state),
        ("city", &address.city),
        ("neighborhood", &address.neighborhood),
        ("street", &address.street),
    ];
    for (label, value) in fields {
        if !value.is_empty() {
            line(out, label, value);
        }
    }
}

fn line(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!("  {label:<LABEL_WIDTH$} {value}\n"));
}
