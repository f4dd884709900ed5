use std::collections::BTreeMap;

use crate::d3d11::interfaces::{BindingKind, Stage, StateKind};
use crate::d3d11::model::{BIND_SHADER_RESOURCE, ObjectKinds, Operation};
use crate::foundation::ids::NodeIdx;
use crate::graph::arena::DependencyGraph;
use crate::graph::record::{CallRecord, CallSet};

/// Last call setting one piece of pipeline state, and the state object it bound.
#[derive(Debug, Clone)]
pub(crate) struct StateCall {
    pub(crate) call: CallRecord,
    pub(crate) object: Option<NodeIdx>,
}

/// Pipeline state of one context.
#[derive(Debug, Default)]
pub(crate) struct States {
    states: BTreeMap<StateKind, StateCall>,
    clear_call: Option<CallRecord>,
}

impl States {
    pub(crate) fn set(&mut self, kind: StateKind, call: &CallRecord, object: Option<NodeIdx>) {
        self.states.insert(
            kind,
            StateCall {
                call: call.clone(),
                object,
            },
        );
    }

    /// `ClearState`: every state is back to its default.
    pub(crate) fn clear(&mut self, call: &CallRecord) {
        self.states.clear();
        self.clear_call = Some(call.clone());
    }

    pub(crate) fn depth_stencil_state(&self) -> Option<NodeIdx> {
        self.states.get(&StateKind::DepthStencil)?.object
    }

    /// Make `node` carry the state calls and depend on the bound state objects.
    pub(crate) fn add_to(&self, graph: &mut DependencyGraph, node: NodeIdx) {
        if let Some(clear) = &self.clear_call {
            graph.add_call(node, clear);
        }
        for state in self.states.values() {
            graph.add_call(node, &state.call);
            if let Some(object) = state.object {
                graph.add_dependency(node, object);
            }
        }
    }

    fn emit_to(&self, graph: &mut DependencyGraph, out: &mut CallSet) {
        if let Some(clear) = &self.clear_call {
            out.insert(clear);
        }
        for state in self.states.values() {
            out.insert(&state.call);
            if let Some(object) = state.object {
                graph.emit_calls_to(object, out);
            }
        }
    }
}

/// One bound slot: the node of the binding call and the object it bound, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Binding {
    pub(crate) node: NodeIdx,
    pub(crate) object: Option<NodeIdx>,
}

type Slots = BTreeMap<(Stage, u32), Binding>;

/// Bindings of one context per kind, stage and slot.
#[derive(Debug, Default)]
pub(crate) struct Bindings {
    slots: BTreeMap<BindingKind, Slots>,
    clear_calls: BTreeMap<BindingKind, CallRecord>,
}

impl Bindings {
    pub(crate) fn set(&mut self, kind: BindingKind, stage: Stage, slot: u32, binding: Binding) {
        self.slots
            .entry(kind)
            .or_default()
            .insert((stage, slot), binding);
    }

    /// Drop every binding of `kind`; `call` is what reset them.
    pub(crate) fn clear(&mut self, kind: BindingKind, call: &CallRecord) {
        self.slots.remove(&kind);
        self.clear_calls.insert(kind, call.clone());
    }

    pub(crate) fn clear_all(&mut self, call: &CallRecord) {
        self.slots.clear();
        for kind in [
            BindingKind::Shaders,
            BindingKind::Samplers,
            BindingKind::InputLayout,
            BindingKind::VertexBuffers,
            BindingKind::IndexBuffer,
            BindingKind::ConstantBuffers,
            BindingKind::ShaderResources,
            BindingKind::RenderTargets,
            BindingKind::DepthStencilView,
            BindingKind::UnorderedAccessViews,
            BindingKind::StreamOutTargets,
        ] {
            self.clear_calls.insert(kind, call.clone());
        }
    }

    pub(crate) fn clear_call(&self, kind: BindingKind) -> Option<&CallRecord> {
        self.clear_calls.get(&kind)
    }

    pub(crate) fn of_kind(&self, kind: BindingKind) -> impl Iterator<Item = (Stage, u32, Binding)> + '_ {
        self.slots
            .get(&kind)
            .into_iter()
            .flat_map(|s| s.iter().map(|(&(stage, slot), &b)| (stage, slot, b)))
    }

    fn all(&self) -> impl Iterator<Item = Binding> + '_ {
        self.slots.values().flat_map(|s| s.values().copied())
    }
}

/// An immediate or deferred device context.
#[derive(Debug)]
pub(crate) struct D3dContext {
    pub(crate) node: NodeIdx,
    pub(crate) deferred: bool,
    pub(crate) states: States,
    pub(crate) bindings: Bindings,
    /// Operations recorded on a deferred context and not yet finished into a command list.
    pub(crate) ops: Vec<Operation>,
}

impl D3dContext {
    pub(crate) fn new(node: NodeIdx, deferred: bool) -> Self {
        Self {
            node,
            deferred,
            states: States::default(),
            bindings: Bindings::default(),
            ops: Vec::new(),
        }
    }

    fn add_bound_as_dependency(
        &self,
        graph: &mut DependencyGraph,
        cmd: NodeIdx,
        kind: BindingKind,
        compute: bool,
    ) {
        if let Some(clear) = self.bindings.clear_call(kind) {
            graph.add_call(cmd, clear);
        }
        for (stage, _, binding) in self.bindings.of_kind(kind) {
            if (stage == Stage::Compute) == compute {
                graph.add_dependency(cmd, binding.node);
            }
        }
    }

    fn bound_views(&self, kind: BindingKind, compute: bool) -> impl Iterator<Item = NodeIdx> + '_ {
        self.bindings
            .of_kind(kind)
            .filter(move |&(stage, _, _)| (stage == Stage::Compute) == compute)
            .filter_map(|(_, _, b)| b.object)
    }

    /// Make draw `cmd` depend on the graphics state and bindings. Returns the views the
    /// draw writes that later reads may depend on.
    pub(crate) fn link_draw(
        &self,
        graph: &mut DependencyGraph,
        kinds: &ObjectKinds,
        cmd: NodeIdx,
    ) -> Vec<NodeIdx> {
        self.states.add_to(graph, cmd);
        for kind in [
            BindingKind::Shaders,
            BindingKind::Samplers,
            BindingKind::InputLayout,
            BindingKind::ShaderResources,
            BindingKind::ConstantBuffers,
            BindingKind::VertexBuffers,
            BindingKind::UnorderedAccessViews,
            BindingKind::IndexBuffer,
            BindingKind::RenderTargets,
            BindingKind::DepthStencilView,
        ] {
            self.add_bound_as_dependency(graph, cmd, kind, false);
        }

        // Only render targets that can be read back as shader resources matter later.
        let mut targets: Vec<NodeIdx> = self
            .bound_views(BindingKind::RenderTargets, false)
            .filter(|&view| {
                kinds
                    .view_resource(view)
                    .and_then(|res| kinds.resource(res))
                    .is_some_and(|shape| shape.has_bind_flag(BIND_SHADER_RESOURCE))
            })
            .collect();
        let depth_write = self
            .states
            .depth_stencil_state()
            .is_some_and(|state| kinds.depth_write(state));
        if depth_write {
            targets.extend(self.bound_views(BindingKind::DepthStencilView, false));
        }

        for (_, _, binding) in self.bindings.of_kind(BindingKind::StreamOutTargets) {
            graph.add_dependency(binding.node, cmd);
        }
        targets
    }

    /// Make dispatch `cmd` depend on the compute bindings. Returns the bound compute UAVs.
    pub(crate) fn link_dispatch(&self, graph: &mut DependencyGraph, cmd: NodeIdx) -> Vec<NodeIdx> {
        for kind in [
            BindingKind::Shaders,
            BindingKind::Samplers,
            BindingKind::ShaderResources,
            BindingKind::ConstantBuffers,
            BindingKind::UnorderedAccessViews,
        ] {
            self.add_bound_as_dependency(graph, cmd, kind, true);
        }
        self.bound_views(BindingKind::UnorderedAccessViews, true)
            .collect()
    }

    /// Snapshot: the context, its state calls and every binding.
    pub(crate) fn emit_state(&self, graph: &mut DependencyGraph, out: &mut CallSet) {
        graph.emit_calls_to(self.node, out);
        self.states.emit_to(graph, out);
        out.extend(self.bindings.clear_calls.values());
        for binding in self.bindings.all() {
            graph.emit_calls_to(binding.node, out);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/d3d11/context.rs"]
mod tests;
