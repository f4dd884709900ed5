use crate::graph::record::CallRecord;

/// Calls that wrote the bytes `[begin, end)` of a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRange {
    /// First byte written.
    pub begin: u64,
    /// One past the last byte written.
    pub end: u64,
    /// Calls needed to reproduce the write.
    pub calls: Vec<CallRecord>,
}

/// Last-writer-wins list of non-overlapping buffer byte ranges.
#[derive(Debug, Clone, Default)]
pub struct UpdateList {
    records: Vec<UpdateRange>,
}

impl UpdateList {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `calls` rewrote `[begin, end)`.
    ///
    /// Older records are trimmed to the bytes the new write leaves intact. A record the
    /// new range lands strictly inside is split in two.
    pub fn update(&mut self, calls: &[CallRecord], begin: u64, end: u64) {
        let mut tails = Vec::new();
        self.records.retain_mut(|u| {
            if !(begin < u.end && u.begin < end) {
                return true;
            }
            match (begin > u.begin, end < u.end) {
                (true, true) => {
                    tails.push(UpdateRange {
                        begin: end,
                        end: u.end,
                        calls: u.calls.clone(),
                    });
                    u.end = begin;
                    true
                }
                (true, false) => {
                    u.end = begin;
                    true
                }
                (false, true) => {
                    u.begin = end;
                    true
                }
                (false, false) => false,
            }
        });
        self.records.extend(tails);
        self.records.push(UpdateRange {
            begin,
            end,
            calls: calls.to_vec(),
        });
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Current records, oldest first.
    pub fn records(&self) -> &[UpdateRange] {
        &self.records
    }

    /// Every call referenced by a record.
    pub fn calls(&self) -> impl Iterator<Item = &CallRecord> {
        self.records.iter().flat_map(|r| r.calls.iter())
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no range is tracked.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mapping/update_list.rs"]
mod tests;
