use std::collections::{HashMap, HashSet};

use crate::foundation::ids::NodeIdx;
use crate::graph::node::GraphNode;
use crate::graph::record::{CallRecord, CallSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    // Reached through an unrolled parent: own calls only.
    Shallow,
    Full,
}

/// Arena owning every node of one trimmer. Edges are [`NodeIdx`] values, so cycles are fine.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: Vec<GraphNode>,
}

impl DependencyGraph {
    /// Empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node for API object `id`.
    pub fn add_node(&mut self, id: u64) -> NodeIdx {
        let idx = NodeIdx(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(GraphNode::new(id));
        idx
    }

    /// Allocate a node whose creation is `init`.
    pub fn add_node_with_init(&mut self, id: u64, init: &CallRecord) -> NodeIdx {
        let idx = self.add_node(id);
        self.nodes[idx.index()].init_call = Some(init.clone());
        idx
    }

    /// Borrow a node.
    pub fn node(&self, idx: NodeIdx) -> &GraphNode {
        &self.nodes[idx.index()]
    }

    pub(crate) fn node_mut(&mut self, idx: NodeIdx) -> &mut GraphNode {
        &mut self.nodes[idx.index()]
    }

    /// Number of nodes ever allocated.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no node was allocated.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a call; the node becomes emittable again.
    pub fn add_call(&mut self, idx: NodeIdx, record: &CallRecord) {
        let node = self.node_mut(idx);
        node.calls.push(record.clone());
        node.emitted = false;
    }

    /// Replace the node's calls with `record`. The init call is kept.
    pub fn set_call(&mut self, idx: NodeIdx, record: &CallRecord) {
        let node = self.node_mut(idx);
        node.calls.clear();
        node.calls.push(record.clone());
        node.emitted = false;
    }

    /// Drop the node's calls. The init call is kept.
    pub fn clear_calls(&mut self, idx: NodeIdx) {
        self.node_mut(idx).calls.clear();
    }

    /// Set the creating call.
    pub fn set_init_call(&mut self, idx: NodeIdx, record: &CallRecord) {
        let node = self.node_mut(idx);
        node.init_call = Some(record.clone());
        node.emitted = false;
    }

    /// Add the edge `idx -> dep`. A reflexive edge is ignored.
    pub fn add_dependency(&mut self, idx: NodeIdx, dep: NodeIdx) {
        if idx == dep {
            return;
        }
        let node = self.node_mut(idx);
        node.deps.insert(dep);
        node.emitted = false;
    }

    /// Drop every outgoing edge.
    pub fn clear_dependencies(&mut self, idx: NodeIdx) {
        self.node_mut(idx).deps.clear();
    }

    /// Add `dep` as a dependency of the writes applied to `idx`.
    pub fn add_update_dependency(&mut self, idx: NodeIdx, dep: NodeIdx) {
        if idx == dep {
            return;
        }
        let node = self.node_mut(idx);
        node.updates_mut().deps.insert(dep);
        node.emitted = false;
    }

    /// Append a call to the writes applied to `idx`.
    pub fn add_update_call(&mut self, idx: NodeIdx, record: &CallRecord) {
        let node = self.node_mut(idx);
        node.updates_mut().calls.push(record.clone());
        node.emitted = false;
    }

    /// Forget every write applied to `idx` (whole-resource overwrite).
    pub fn clear_updates(&mut self, idx: NodeIdx) {
        if let Some(updates) = self.node_mut(idx).updates.as_mut() {
            updates.clear();
        }
    }

    /// Record that `calls` rewrote bytes `[begin, end)` of buffer `idx`.
    pub fn update_range(&mut self, idx: NodeIdx, calls: &[CallRecord], begin: u64, end: u64) {
        let node = self.node_mut(idx);
        node.updates_mut().ranges.update(calls, begin, end);
        node.emitted = false;
    }

    /// True when the node's earliest call precedes call `no`.
    pub fn created_before(&self, idx: NodeIdx, no: u64) -> bool {
        self.node(idx).first_call_no().is_some_and(|first| first < no)
    }

    /// Insert the calls of `root` and of everything it transitively depends on into `out`.
    ///
    /// Each node is visited at most once per call, so cycles terminate. Nodes reached
    /// through an unrolled node only contribute their own calls.
    pub fn emit_calls_to(&mut self, root: NodeIdx, out: &mut CallSet) {
        let mut visited: HashMap<NodeIdx, Visit> = HashMap::new();
        let mut stack = vec![(root, Visit::Full)];
        while let Some((idx, want)) = stack.pop() {
            let prev = visited.get(&idx).copied();
            match (prev, want) {
                (Some(Visit::Full), _) | (Some(Visit::Shallow), Visit::Shallow) => continue,
                _ => {}
            }
            let node = &mut self.nodes[idx.index()];
            if prev.is_none() {
                node.emit_own_calls(out);
            }
            node.emitted = true;
            visited.insert(idx, want);
            if want == Visit::Full {
                let next = if node.unrolled {
                    Visit::Shallow
                } else {
                    Visit::Full
                };
                stack.extend(node.all_dependencies().map(|d| (d, next)));
            }
        }
    }

    /// Insert only the creating calls of `root` and its transitive dependencies.
    pub fn emit_init_calls_to(&self, root: NodeIdx, out: &mut CallSet) {
        let mut visited = HashSet::new();
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            if !visited.insert(idx) {
                continue;
            }
            let node = self.node(idx);
            if let Some(init) = &node.init_call {
                out.insert(init);
            }
            stack.extend(node.deps.iter().copied());
        }
    }

    /// Flatten the dependencies of command `root`.
    ///
    /// Calls of non-unrolled dependencies are copied into `root`; already unrolled
    /// dependencies are kept as edges together with their own dependencies. Afterwards
    /// walks through `root` no longer re-enter other commands.
    pub fn unroll(&mut self, root: NodeIdx) {
        if self.node(root).unrolled {
            return;
        }
        let mut visited = HashSet::from([root]);
        let mut stack: Vec<NodeIdx> = self.node(root).deps.iter().copied().collect();
        let mut calls = CallSet::new();
        let mut new_deps = std::collections::BTreeSet::new();
        while let Some(idx) = stack.pop() {
            if !visited.insert(idx) {
                continue;
            }
            let node = self.node(idx);
            if node.unrolled {
                new_deps.extend(node.deps.iter().copied());
                new_deps.insert(idx);
                continue;
            }
            node.emit_own_calls(&mut calls);
            stack.extend(node.all_dependencies());
        }
        new_deps.remove(&root);
        let node = self.node_mut(root);
        node.deps = new_deps;
        node.calls.extend(calls.iter().cloned());
        node.unrolled = true;
        node.emitted = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/arena.rs"]
mod tests;
