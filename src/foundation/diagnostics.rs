use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Class of a recoverable trimming problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// No handler is registered for a call name.
    UnhandledCall,
    /// A call name was resolved through a registered prefix with an unknown suffix.
    ApproximatedName,
    /// A call referenced an object id the trimmer never saw created.
    MissingObject,
    /// A bind named a deleted or never-created object.
    InvalidBinding,
    /// A target or slot argument could not be mapped to a bindpoint.
    UnknownBindpoint,
    /// Per-context state was touched while no context was current.
    NoCurrentContext,
    /// The trace breaks an API rule (double map, unmap without map, ...).
    ProtocolViolation,
    /// An argument had a shape the handler did not expect.
    UnexpectedArgument,
}

impl DiagnosticKind {
    /// Stable snake_case name, used as the log field value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnhandledCall => "unhandled_call",
            Self::ApproximatedName => "approximated_name",
            Self::MissingObject => "missing_object",
            Self::InvalidBinding => "invalid_binding",
            Self::UnknownBindpoint => "unknown_bindpoint",
            Self::NoCurrentContext => "no_current_context",
            Self::ProtocolViolation => "protocol_violation",
            Self::UnexpectedArgument => "unexpected_argument",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulator for recoverable problems met while trimming.
///
/// Each `(kind, key)` pair is logged once through `tracing`; every occurrence is counted.
#[derive(Debug, Default)]
pub struct Diagnostics {
    seen: HashSet<(DiagnosticKind, String)>,
    counts: BTreeMap<DiagnosticKind, u64>,
}

impl Diagnostics {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence. Returns `true` when this `(kind, key)` pair was new and got logged.
    pub fn report(
        &mut self,
        kind: DiagnosticKind,
        key: &str,
        call_no: u64,
        message: impl fmt::Display,
    ) -> bool {
        *self.counts.entry(kind).or_default() += 1;
        if self.seen.contains(&(kind, key.to_owned())) {
            return false;
        }
        self.seen.insert((kind, key.to_owned()));
        tracing::warn!(kind = kind.as_str(), call = call_no, "{message}");
        true
    }

    /// Number of occurrences of `kind`.
    pub fn count(&self, kind: DiagnosticKind) -> u64 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Number of occurrences across all kinds.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Per-kind occurrence counts.
    pub fn counts(&self) -> &BTreeMap<DiagnosticKind, u64> {
        &self.counts
    }

    /// True when nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/diagnostics.rs"]
mod tests;
