use std::fmt;
use std::str::FromStr;

use crate::foundation::error::TrimError;

/// Role of the frame a call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrameType {
    /// Outside every selected frame.
    #[default]
    None,
    /// Key frame: its calls are kept but its end-of-frame call is deferred.
    Setup,
    /// Target frame: every call is kept.
    Retain,
}

/// Selection of frame numbers, parsed from `1,3,10-12`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameSet {
    ranges: Vec<(u64, u64)>,
}

impl FrameSet {
    /// Empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection of the inclusive range `first..=last`.
    pub fn range(first: u64, last: u64) -> Self {
        let mut set = Self::new();
        set.insert_range(first, last);
        set
    }

    /// Add the inclusive range `first..=last` (swapped if reversed).
    pub fn insert_range(&mut self, first: u64, last: u64) {
        let (a, b) = if first <= last { (first, last) } else { (last, first) };
        self.ranges.push((a, b));
    }

    /// True when `frame` is selected.
    pub fn contains(&self, frame: u64) -> bool {
        self.ranges.iter().any(|&(a, b)| a <= frame && frame <= b)
    }

    /// Highest selected frame.
    pub fn last(&self) -> Option<u64> {
        self.ranges.iter().map(|&(_, b)| b).max()
    }

    /// True when no frame is selected.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl FromStr for FrameSet {
    type Err = TrimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = Self::new();
        for item in s.split(',').map(str::trim).filter(|i| !i.is_empty()) {
            let parse = |v: &str| {
                v.trim()
                    .parse::<u64>()
                    .map_err(|e| TrimError::config(format!("frame selection '{item}': {e}")))
            };
            match item.split_once('-') {
                Some((a, b)) => set.insert_range(parse(a)?, parse(b)?),
                None => {
                    let f = parse(item)?;
                    set.insert_range(f, f);
                }
            }
        }
        if set.is_empty() {
            return Err(TrimError::config(format!("empty frame selection '{s}'")));
        }
        Ok(set)
    }
}

impl fmt::Display for FrameSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &(a, b)) in self.ranges.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if a == b {
                write!(f, "{a}")?;
            } else {
                write!(f, "{a}-{b}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trace/frames.rs"]
mod tests;
