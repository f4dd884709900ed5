use std::collections::{BTreeMap, BTreeSet};

use crate::foundation::ids::NodeIdx;
use crate::graph::record::{CallRecord, CallSet};
use crate::mapping::update_list::UpdateList;

/// Lifecycle facts stored next to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExtraKey {
    /// 1 while the object is alive, 0 after deletion.
    Valid,
    /// Number of the call that created the object.
    CreateCall,
    /// Number of the call that deleted the object.
    DeleteCall,
    /// Number of the create call that reused a name still in the table.
    ReusedCall,
    /// API target the object was first bound or created with.
    Target,
    /// Number of the latest compile or link call on the object.
    RebuildCall,
}

/// Writes applied to a resource through maps, copies and sub-resource updates.
#[derive(Debug, Clone, Default)]
pub(crate) struct ResourceUpdates {
    pub(crate) calls: Vec<CallRecord>,
    pub(crate) deps: BTreeSet<NodeIdx>,
    pub(crate) ranges: UpdateList,
}

impl ResourceUpdates {
    pub(crate) fn clear(&mut self) {
        self.calls.clear();
        self.deps.clear();
        self.ranges.clear();
    }
}

/// One resource or operation in the dependency graph.
#[derive(Debug)]
pub struct GraphNode {
    pub(crate) id: u64,
    pub(crate) init_call: Option<CallRecord>,
    pub(crate) calls: Vec<CallRecord>,
    pub(crate) deps: BTreeSet<NodeIdx>,
    pub(crate) emitted: bool,
    pub(crate) unrolled: bool,
    pub(crate) refcount: u32,
    pub(crate) extra: BTreeMap<ExtraKey, u64>,
    pub(crate) updates: Option<Box<ResourceUpdates>>,
}

impl GraphNode {
    pub(crate) fn new(id: u64) -> Self {
        Self {
            id,
            init_call: None,
            calls: Vec::new(),
            deps: BTreeSet::new(),
            emitted: false,
            unrolled: false,
            refcount: 1,
            extra: BTreeMap::new(),
            updates: None,
        }
    }

    /// API-level id (GL name, COM pointer or call number for synthetic nodes).
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The call that created the node, if any.
    pub fn init_call(&self) -> Option<&CallRecord> {
        self.init_call.as_ref()
    }

    /// Calls owned by the node, in insertion order.
    pub fn calls(&self) -> &[CallRecord] {
        &self.calls
    }

    /// Direct dependencies.
    pub fn dependencies(&self) -> &BTreeSet<NodeIdx> {
        &self.deps
    }

    /// True when the node was emitted and has not changed since.
    pub fn emitted(&self) -> bool {
        self.emitted
    }

    /// True once the node's dependencies were flattened.
    pub fn is_unrolled(&self) -> bool {
        self.unrolled
    }

    /// COM-style reference count; diagnostic only.
    pub fn refcount(&self) -> u32 {
        self.refcount
    }

    /// Lifecycle fact stored under `key`.
    pub fn extra_info(&self, key: ExtraKey) -> Option<u64> {
        self.extra.get(&key).copied()
    }

    pub(crate) fn set_extra(&mut self, key: ExtraKey, value: u64) {
        self.extra.insert(key, value);
    }

    /// Number of the earliest call owned by the node.
    pub fn first_call_no(&self) -> Option<u64> {
        self.init_call
            .as_ref()
            .or_else(|| self.calls.first())
            .map(CallRecord::no)
    }

    pub(crate) fn updates_mut(&mut self) -> &mut ResourceUpdates {
        self.updates.get_or_insert_with(Box::default)
    }

    pub(crate) fn emit_own_calls(&self, out: &mut CallSet) {
        if let Some(init) = &self.init_call {
            out.insert(init);
        }
        out.extend(self.calls.iter());
        if let Some(updates) = &self.updates {
            out.extend(updates.calls.iter());
            out.extend(updates.ranges.calls());
        }
    }

    /// Dependencies plus update dependencies.
    pub(crate) fn all_dependencies(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        self.deps
            .iter()
            .chain(self.updates.iter().flat_map(|u| u.deps.iter()))
            .copied()
    }
}
