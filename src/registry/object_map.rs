use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::foundation::diagnostics::{DiagnosticKind, Diagnostics};
use crate::foundation::ids::{Bindpoint, ContextId, NodeIdx};
use crate::graph::arena::DependencyGraph;
use crate::graph::node::ExtraKey;
use crate::graph::record::{CallRecord, CallSet};

/// Id -> node table for one resource kind, with per-context binding points.
///
/// The registry does not know how a call maps to a bindpoint; the API front end computes
/// bindpoints and passes them in.
#[derive(Debug)]
pub struct ObjectRegistry {
    kind: &'static str,
    objects: HashMap<u64, NodeIdx>,
    bindings: BTreeMap<ContextId, BTreeMap<Bindpoint, Option<NodeIdx>>>,
    current: ContextId,
    calls: Vec<CallRecord>,
}

impl ObjectRegistry {
    /// Empty registry for objects of `kind` (used in diagnostics).
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            objects: HashMap::new(),
            bindings: BTreeMap::new(),
            current: ContextId::default(),
            calls: Vec::new(),
        }
    }

    /// Resource kind name.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Select the context whose bindings subsequent calls use.
    pub fn set_current_context(&mut self, ctx: ContextId) {
        self.current = ctx;
    }

    /// Context whose bindings are in use.
    pub fn current_context(&self) -> ContextId {
        self.current
    }

    /// Node registered under `id`.
    pub fn get(&self, id: u64) -> Option<NodeIdx> {
        self.objects.get(&id).copied()
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True when no object is registered.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Register an existing node under `id`.
    pub fn insert(&mut self, id: u64, node: NodeIdx) {
        self.objects.insert(id, node);
    }

    /// Calls owned by the registry itself rather than by an object.
    pub fn calls(&self) -> &[CallRecord] {
        &self.calls
    }

    /// Keep `record` at registry level (unbinds, selector changes).
    pub fn add_call(&mut self, record: &CallRecord) {
        self.calls.push(record.clone());
    }

    /// Create object `id` from `record`.
    pub fn create(&mut self, graph: &mut DependencyGraph, record: &CallRecord, id: u64) -> NodeIdx {
        let reused = self.objects.contains_key(&id);
        let node = graph.add_node_with_init(id, record);
        let n = graph.node_mut(node);
        n.set_extra(ExtraKey::CreateCall, record.no());
        n.set_extra(ExtraKey::Valid, 1);
        if reused {
            n.set_extra(ExtraKey::ReusedCall, record.no());
        }
        self.objects.insert(id, node);
        node
    }

    /// Delete object `id`; the delete call is attached to it.
    pub fn delete(
        &mut self,
        graph: &mut DependencyGraph,
        diag: &mut Diagnostics,
        record: &CallRecord,
        id: u64,
    ) -> Option<NodeIdx> {
        if id == 0 {
            return None;
        }
        let Some(node) = self.get(id) else {
            self.report_missing(diag, record, id);
            return None;
        };
        graph.add_call(node, record);
        let n = graph.node_mut(node);
        n.set_extra(ExtraKey::DeleteCall, record.no());
        n.set_extra(ExtraKey::Valid, 0);
        Some(node)
    }

    /// Create every object of `ids` from one call.
    ///
    /// The objects share the creating call and depend on each other, so keeping one keeps
    /// the whole cohort's creation.
    pub fn generate(
        &mut self,
        graph: &mut DependencyGraph,
        record: &CallRecord,
        ids: &[u64],
    ) -> Vec<NodeIdx> {
        let nodes: Vec<NodeIdx> = ids
            .iter()
            .filter(|&&id| id != 0)
            .map(|&id| self.create(graph, record, id))
            .collect();
        for &a in &nodes {
            for &b in &nodes {
                graph.add_dependency(a, b);
            }
        }
        nodes
    }

    /// Delete every object of `ids` from one call.
    pub fn destroy(
        &mut self,
        graph: &mut DependencyGraph,
        diag: &mut Diagnostics,
        record: &CallRecord,
        ids: &[u64],
    ) -> Vec<NodeIdx> {
        ids.iter()
            .filter_map(|&id| self.delete(graph, diag, record, id))
            .collect()
    }

    /// Bind `id` at `bindpoint` in the current context.
    ///
    /// Id 0 unbinds unless an object is registered under 0 (default framebuffers). An
    /// unknown or deleted id is diagnosed and bound as a placeholder node.
    pub fn bind(
        &mut self,
        graph: &mut DependencyGraph,
        diag: &mut Diagnostics,
        record: &CallRecord,
        bindpoint: Bindpoint,
        id: u64,
    ) -> Option<NodeIdx> {
        let node = match self.get(id) {
            Some(node) => {
                if graph.node(node).extra_info(ExtraKey::Valid) == Some(0) {
                    diag.report(
                        DiagnosticKind::InvalidBinding,
                        record.name(),
                        record.no(),
                        format_args!("{}: {} {id} was deleted", record.name(), self.kind),
                    );
                }
                Some(node)
            }
            None if id == 0 => None,
            None => {
                diag.report(
                    DiagnosticKind::InvalidBinding,
                    record.name(),
                    record.no(),
                    format_args!("{}: {} {id} was never created", record.name(), self.kind),
                );
                let node = graph.add_node(id);
                self.objects.insert(id, node);
                Some(node)
            }
        };
        self.set_binding(bindpoint, node);
        node
    }

    /// Bind `id`, creating it silently when unknown (objects created by their first bind).
    pub fn bind_with_create(
        &mut self,
        graph: &mut DependencyGraph,
        record: &CallRecord,
        bindpoint: Bindpoint,
        id: u64,
    ) -> Option<NodeIdx> {
        let node = match self.get(id) {
            Some(node) => Some(node),
            None if id == 0 => None,
            None => {
                let node = graph.add_node(id);
                graph.node_mut(node).set_extra(ExtraKey::CreateCall, record.no());
                graph.node_mut(node).set_extra(ExtraKey::Valid, 1);
                self.objects.insert(id, node);
                Some(node)
            }
        };
        self.set_binding(bindpoint, node);
        node
    }

    /// Store `node` at `bindpoint` of the current context.
    pub fn set_binding(&mut self, bindpoint: Bindpoint, node: Option<NodeIdx>) {
        self.bindings
            .entry(self.current)
            .or_default()
            .insert(bindpoint, node);
    }

    /// Clear `bindpoint` of the current context.
    pub fn unbind(&mut self, bindpoint: Bindpoint) {
        self.set_binding(bindpoint, None);
    }

    /// Node bound at `bindpoint` of the current context.
    pub fn bound_at(&self, bindpoint: Bindpoint) -> Option<NodeIdx> {
        self.bound_in(self.current, bindpoint)
    }

    /// Node bound at `bindpoint` of `ctx`.
    pub fn bound_in(&self, ctx: ContextId, bindpoint: Bindpoint) -> Option<NodeIdx> {
        self.bindings
            .get(&ctx)
            .and_then(|b| b.get(&bindpoint).copied().flatten())
    }

    /// Bindings of the current context that hold an object.
    pub fn bound_in_current(&self) -> impl Iterator<Item = (Bindpoint, NodeIdx)> + '_ {
        self.bindings
            .get(&self.current)
            .into_iter()
            .flat_map(|b| b.iter().filter_map(|(&bp, n)| n.map(|n| (bp, n))))
    }

    /// Bindings of every context that hold an object.
    pub fn bound_everywhere(&self) -> impl Iterator<Item = (ContextId, Bindpoint, NodeIdx)> + '_ {
        self.bindings.iter().flat_map(|(&ctx, b)| {
            b.iter()
                .filter_map(move |(&bp, n)| n.map(|n| (ctx, bp, n)))
        })
    }

    /// Attach `record` to the object bound at `bindpoint`.
    pub fn call_on_bound(
        &mut self,
        graph: &mut DependencyGraph,
        diag: &mut Diagnostics,
        record: &CallRecord,
        bindpoint: Bindpoint,
    ) -> Option<NodeIdx> {
        let Some(node) = self.bound_at(bindpoint) else {
            diag.report(
                DiagnosticKind::MissingObject,
                record.name(),
                record.no(),
                format_args!("{}: no {} bound", record.name(), self.kind),
            );
            return None;
        };
        graph.add_call(node, record);
        Some(node)
    }

    /// Attach `record` to object `id`. Id 0 is silently ignored.
    pub fn call_on_named(
        &mut self,
        graph: &mut DependencyGraph,
        diag: &mut Diagnostics,
        record: &CallRecord,
        id: u64,
    ) -> Option<NodeIdx> {
        if id == 0 && self.get(0).is_none() {
            return None;
        }
        let Some(node) = self.get(id) else {
            self.report_missing(diag, record, id);
            return None;
        };
        graph.add_call(node, record);
        Some(node)
    }

    /// Attach `record` to the object bound at `bindpoint` and make it depend on `dep`.
    ///
    /// With `reciprocal` the reverse edge is added as well.
    pub fn call_on_bound_with_dep(
        &mut self,
        graph: &mut DependencyGraph,
        diag: &mut Diagnostics,
        record: &CallRecord,
        bindpoint: Bindpoint,
        dep: Option<NodeIdx>,
        reciprocal: bool,
    ) -> Option<NodeIdx> {
        let node = self.call_on_bound(graph, diag, record, bindpoint)?;
        link(graph, node, dep, reciprocal);
        Some(node)
    }

    /// Attach `record` to object `id` and make it depend on `dep`.
    pub fn call_on_named_with_dep(
        &mut self,
        graph: &mut DependencyGraph,
        diag: &mut Diagnostics,
        record: &CallRecord,
        id: u64,
        dep: Option<NodeIdx>,
        reciprocal: bool,
    ) -> Option<NodeIdx> {
        let node = self.call_on_named(graph, diag, record, id)?;
        link(graph, node, dep, reciprocal);
        Some(node)
    }

    /// Emit every bound object of every context and the registry-level calls.
    pub fn emit_bound_objects(&self, graph: &mut DependencyGraph, out: &mut CallSet) {
        let bound: BTreeSet<NodeIdx> = self.bound_everywhere().map(|(_, _, n)| n).collect();
        for node in bound {
            graph.emit_calls_to(node, out);
        }
        out.extend(self.calls.iter());
    }

    /// Make `target` depend on everything bound in the current context.
    pub fn add_bound_as_dependency_to(&self, graph: &mut DependencyGraph, target: NodeIdx) {
        let bound: Vec<NodeIdx> = self.bound_in_current().map(|(_, n)| n).collect();
        for node in bound {
            graph.add_dependency(target, node);
        }
    }

    /// Collect the create calls of objects created at or after `window_start` and not
    /// deleted inside the window.
    ///
    /// Objects created earlier but compiled or linked inside the window contribute that
    /// compile or link call instead.
    pub fn unbalanced_create_calls_in_last_frame(
        &self,
        graph: &DependencyGraph,
        window_start: u64,
        out: &mut BTreeSet<u64>,
    ) {
        for &node in self.objects.values() {
            let n = graph.node(node);
            let deleted_inside = n
                .extra_info(ExtraKey::DeleteCall)
                .is_some_and(|d| d >= window_start);
            if deleted_inside {
                continue;
            }
            match n.extra_info(ExtraKey::CreateCall) {
                Some(created) if created >= window_start => {
                    out.insert(created);
                }
                _ => {
                    if let Some(rebuilt) = n
                        .extra_info(ExtraKey::RebuildCall)
                        .filter(|&no| no >= window_start)
                    {
                        out.insert(rebuilt);
                    }
                }
            }
        }
    }

    fn report_missing(&self, diag: &mut Diagnostics, record: &CallRecord, id: u64) {
        diag.report(
            DiagnosticKind::MissingObject,
            record.name(),
            record.no(),
            format_args!("{}: unknown {} {id}", record.name(), self.kind),
        );
    }
}

fn link(graph: &mut DependencyGraph, node: NodeIdx, dep: Option<NodeIdx>, reciprocal: bool) {
    if let Some(dep) = dep {
        graph.add_dependency(node, dep);
        if reciprocal {
            graph.add_dependency(dep, node);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/registry/object_map.rs"]
mod tests;
