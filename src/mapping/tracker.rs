use std::collections::BTreeMap;

use crate::foundation::diagnostics::{DiagnosticKind, Diagnostics};
use crate::foundation::error::{TrimError, TrimResult};
use crate::graph::record::CallRecord;

/// Identity of one mappable piece of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubresourceKey {
    /// Context handle the mapping was made on.
    pub context: u64,
    /// Resource handle or name.
    pub resource: u64,
    /// Subresource index (0 for buffers).
    pub subresource: u32,
}

/// One active CPU mapping and the writes seen through it.
#[derive(Debug, Clone)]
pub struct MappingRecord {
    /// Mapped subresource.
    pub key: SubresourceKey,
    /// First mapped address.
    pub start: u64,
    /// One past the last mapped address.
    pub end: u64,
    /// The mapping invalidates the previous contents.
    pub discard: bool,
    /// Map call, writes and unmap call, in order.
    pub calls: Vec<CallRecord>,
    /// Lowest written offset relative to `start`.
    pub range_min: u64,
    /// One past the highest written offset relative to `start`.
    pub range_max: u64,
}

impl MappingRecord {
    fn new(map_call: &CallRecord, key: SubresourceKey, start: u64, end: u64, discard: bool) -> Self {
        Self {
            key,
            start,
            end,
            discard,
            calls: vec![map_call.clone()],
            range_min: u64::MAX,
            range_max: 0,
        }
    }

    /// True when at least one byte was written.
    pub fn has_writes(&self) -> bool {
        self.range_max > self.range_min
    }

    fn contains(&self, addr: u64) -> bool {
        self.start <= addr && addr < self.end
    }
}

/// Correlates raw memory writes with the mapped subresource they land in.
#[derive(Debug, Default)]
pub struct BufferMappingTracker {
    active: BTreeMap<SubresourceKey, MappingRecord>,
    retained: BTreeMap<SubresourceKey, MappingRecord>,
}

impl BufferMappingTracker {
    /// Empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `[start, end)` for `key`. A second map of a mapped key replaces it.
    pub fn map(
        &mut self,
        record: &CallRecord,
        key: SubresourceKey,
        start: u64,
        end: u64,
        discard: bool,
        diag: &mut Diagnostics,
    ) {
        if self.active.contains_key(&key) {
            diag.report(
                DiagnosticKind::ProtocolViolation,
                record.name(),
                record.no(),
                format_args!(
                    "{}: resource {:#x} subresource {} is already mapped",
                    record.name(),
                    key.resource,
                    key.subresource
                ),
            );
        }
        self.active
            .insert(key, MappingRecord::new(record, key, start, end, discard));
    }

    /// Append the writes retained from an earlier discard mapping of `key`.
    pub fn inherit_retained(&mut self, key: SubresourceKey) {
        let Some(retained) = self.retained.get(&key) else {
            return;
        };
        if let Some(active) = self.active.get_mut(&key) {
            active.calls.extend(retained.calls.iter().cloned());
            if retained.has_writes() {
                active.range_min = active.range_min.min(retained.range_min);
                active.range_max = active.range_max.max(retained.range_max);
            }
        }
    }

    /// Attribute the write `[start, end)` to the mapping that contains `start`.
    ///
    /// A write that starts outside every mapping, or runs past the end of its mapping,
    /// cannot be reproduced and is an error.
    pub fn record_write(
        &mut self,
        record: &CallRecord,
        start: u64,
        end: u64,
    ) -> TrimResult<SubresourceKey> {
        let Some(mapping) = self.active.values_mut().find(|m| m.contains(start)) else {
            return Err(TrimError::unmapped_write(format!(
                "call {} writes [{start:#x}, {end:#x}) outside every mapping",
                record.no()
            )));
        };
        if end > mapping.end {
            return Err(TrimError::mapping_overrun(format!(
                "call {} writes [{start:#x}, {end:#x}) past mapping [{:#x}, {:#x})",
                record.no(),
                mapping.start,
                mapping.end
            )));
        }
        let min = start - mapping.start;
        let max = end - mapping.start;
        if mapping.discard {
            mapping.range_min = min;
            mapping.range_max = max;
        } else {
            mapping.range_min = mapping.range_min.min(min);
            mapping.range_max = mapping.range_max.max(max);
        }
        mapping.calls.push(record.clone());
        Ok(mapping.key)
    }

    /// Finish the mapping of `key`, attaching `record` as its last call.
    pub fn unmap(
        &mut self,
        record: &CallRecord,
        key: SubresourceKey,
        diag: &mut Diagnostics,
    ) -> Option<MappingRecord> {
        let Some(mut mapping) = self.active.remove(&key) else {
            diag.report(
                DiagnosticKind::ProtocolViolation,
                record.name(),
                record.no(),
                format_args!(
                    "{}: resource {:#x} subresource {} is not mapped",
                    record.name(),
                    key.resource,
                    key.subresource
                ),
            );
            return None;
        };
        mapping.calls.push(record.clone());
        Some(mapping)
    }

    /// True when `key` is currently mapped.
    pub fn is_mapped(&self, key: SubresourceKey) -> bool {
        self.active.contains_key(&key)
    }

    /// Keep a finished discard mapping so a later non-discard map of the same key can extend it.
    pub fn retain(&mut self, mapping: MappingRecord) {
        self.retained.insert(mapping.key, mapping);
    }

    /// Retained mapping of `key`.
    pub fn retained(&self, key: SubresourceKey) -> Option<&MappingRecord> {
        self.retained.get(&key)
    }

    /// Forget every retained mapping made on `context`.
    pub fn clear_retained(&mut self, context: u64) {
        self.retained.retain(|k, _| k.context != context);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mapping/tracker.rs"]
mod tests;
