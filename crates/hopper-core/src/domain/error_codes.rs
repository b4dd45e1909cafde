//! Vendor code <-> canonical kind lookup.
//!
//! Each processor integration keeps its own table as a static slice of
//! `(code, kind)` pairs. The table is pure data; this type only indexes it.

use std::collections::HashMap;

use tracing::warn;

use super::events::ProcessingErrorEvent;

/// Bidirectional, O(1) mapping between vendor codes and canonical kinds.
///
/// - code -> kind: exact match; unknown codes resolve to `Generic`.
/// - kind -> code: the first code listed for that kind, used when a kind has
///   to be re-emitted in the vendor's vocabulary.
#[derive(Debug, Clone)]
pub struct ErrorCodeTable {
    vendor: String,
    by_code: HashMap<String, ProcessingErrorEvent>,
    by_kind: HashMap<ProcessingErrorEvent, String>,
}

impl ErrorCodeTable {
    pub fn new(vendor: impl Into<String>, entries: &[(&str, ProcessingErrorEvent)]) -> Self {
        let vendor = vendor.into();
        let mut by_code = HashMap::with_capacity(entries.len());
        let mut by_kind = HashMap::new();

        for (code, kind) in entries {
            if by_code.contains_key(*code) {
                warn!(vendor = %vendor, code = %code, "duplicate vendor code ignored");
                continue;
            }
            by_code.insert((*code).to_string(), *kind);
            by_kind.entry(*kind).or_insert_with(|| (*code).to_string());
        }

        Self {
            vendor,
            by_code,
            by_kind,
        }
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    /// Canonical kind for a vendor code. Never fails.
    pub fn kind_for(&self, code: &str) -> ProcessingErrorEvent {
        self.lookup(code).unwrap_or(ProcessingErrorEvent::Generic)
    }

    /// Like [`ErrorCodeTable::kind_for`] but tells mapped and unmapped apart.
    pub fn lookup(&self, code: &str) -> Option<ProcessingErrorEvent> {
        self.by_code.get(code).copied()
    }

    /// Default vendor code for a kind, if the vendor has one.
    pub fn code_for(&self, kind: ProcessingErrorEvent) -> Option<&str> {
        self.by_kind.get(&kind).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}
