//! Developer Tooling: read-only session inspection.
//!
//! # Invariants
//! - Tools never mutate a session.

mod inspector;

pub use inspector::{InteractableInfo, SessionInspector, SessionSummary};

pub fn crate_info() -> &'static str {
    "nexus-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
