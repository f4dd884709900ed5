use serde::{Deserialize, Serialize};

/// Knobs that change which calls a trim keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimOptions {
    /// Keep every state call instead of only the last one per state.
    pub keep_all_state_calls: bool,
    /// Keep the end-of-frame calls between setup frames and the target frames, so a
    /// replay can finish rendering the frames it skips.
    pub swaps_to_finish: bool,
}
