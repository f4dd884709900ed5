use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::trace::call::TraceCall;

/// Immutable reference to one trace call. Two records are equal iff their numbers match.
#[derive(Debug, Clone)]
pub struct CallRecord {
    no: u64,
    name: Arc<str>,
}

impl CallRecord {
    /// Record for call `no` named `name`.
    pub fn new(no: u64, name: impl Into<Arc<str>>) -> Self {
        Self {
            no,
            name: name.into(),
        }
    }

    /// Record for `call`.
    pub fn from_call(call: &TraceCall) -> Self {
        Self::new(call.no, call.name.as_str())
    }

    /// Sequence number.
    pub fn no(&self) -> u64 {
        self.no
    }

    /// Entry point name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for CallRecord {
    fn eq(&self, other: &Self) -> bool {
        self.no == other.no
    }
}

impl Eq for CallRecord {}

impl Hash for CallRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.no.hash(state);
    }
}

impl PartialOrd for CallRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CallRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.no.cmp(&other.no)
    }
}

/// De-duplicating set of call records, iterated in sequence order.
#[derive(Debug, Clone, Default)]
pub struct CallSet {
    calls: BTreeMap<u64, CallRecord>,
}

impl CallSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record; returns `false` if a record with the same number was present.
    pub fn insert(&mut self, record: &CallRecord) -> bool {
        if self.calls.contains_key(&record.no) {
            return false;
        }
        self.calls.insert(record.no, record.clone());
        true
    }

    /// True when call `no` is in the set.
    pub fn contains(&self, no: u64) -> bool {
        self.calls.contains_key(&no)
    }

    /// Add every record of `other`.
    pub fn append(&mut self, other: &CallSet) {
        for rec in other.iter() {
            self.insert(rec);
        }
    }

    /// Records sorted by sequence number.
    pub fn iter(&self) -> impl Iterator<Item = &CallRecord> {
        self.calls.values()
    }

    /// Sequence numbers in ascending order.
    pub fn call_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.calls.keys().copied()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

impl<'a> Extend<&'a CallRecord> for CallSet {
    fn extend<T: IntoIterator<Item = &'a CallRecord>>(&mut self, iter: T) {
        for rec in iter {
            self.insert(rec);
        }
    }
}
