/// Index of a node inside a [`crate::DependencyGraph`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(pub(crate) u32);

impl NodeIdx {
    /// Position of the node in its arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Logical API context partition used for bindings.
///
/// `ContextId(0)` is the partition used before any context was made current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ContextId(pub u32);

/// Bindpoint number inside one object registry.
pub type Bindpoint = u32;
