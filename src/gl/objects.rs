use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::foundation::diagnostics::{DiagnosticKind, Diagnostics};
use crate::foundation::ids::{ContextId, NodeIdx};
use crate::gl::calls::Reg;
use crate::gl::enums::{GL_DRAW_FRAMEBUFFER, GL_READ_FRAMEBUFFER};
use crate::graph::arena::DependencyGraph;
use crate::graph::record::{CallRecord, CallSet};
use crate::registry::object_map::ObjectRegistry;

/// State owned by one GL context (or sharing group).
#[derive(Debug)]
pub(crate) struct PerContext {
    pub(crate) vertex_arrays: ObjectRegistry,
    pub(crate) pipelines: ObjectRegistry,
    pub(crate) framebuffers: ObjectRegistry,
    pub(crate) active_texture: u32,
    pub(crate) image_units: BTreeMap<u32, NodeIdx>,
}

impl PerContext {
    /// Fresh context with the default framebuffer bound for draw and read.
    pub(crate) fn new(id: ContextId, graph: &mut DependencyGraph) -> Self {
        let mut vertex_arrays = ObjectRegistry::new(Reg::VertexArrays.kind());
        let mut pipelines = ObjectRegistry::new(Reg::Pipelines.kind());
        let mut framebuffers = ObjectRegistry::new(Reg::Framebuffers.kind());
        vertex_arrays.set_current_context(id);
        pipelines.set_current_context(id);
        framebuffers.set_current_context(id);

        let default_fb = graph.add_node(0);
        framebuffers.insert(0, default_fb);
        framebuffers.set_binding(GL_DRAW_FRAMEBUFFER, Some(default_fb));
        framebuffers.set_binding(GL_READ_FRAMEBUFFER, Some(default_fb));

        Self {
            vertex_arrays,
            pipelines,
            framebuffers,
            active_texture: 0,
            image_units: BTreeMap::new(),
        }
    }

    fn registry(&self, reg: Reg) -> Option<&ObjectRegistry> {
        match reg {
            Reg::VertexArrays => Some(&self.vertex_arrays),
            Reg::Pipelines => Some(&self.pipelines),
            Reg::Framebuffers => Some(&self.framebuffers),
            _ => None,
        }
    }

    /// Node bound for drawing, unless it is the default framebuffer.
    pub(crate) fn draw_framebuffer(&self, graph: &DependencyGraph) -> Option<NodeIdx> {
        self.framebuffers
            .bound_at(GL_DRAW_FRAMEBUFFER)
            .filter(|&fb| graph.node(fb).id() != 0)
    }
}

/// Every GL object table plus the context partitioning.
#[derive(Debug)]
pub(crate) struct GlObjects {
    shared: HashMap<Reg, ObjectRegistry>,
    contexts: BTreeMap<ContextId, PerContext>,
    current: ContextId,
}

impl GlObjects {
    pub(crate) fn new() -> Self {
        let shared = Reg::SHARED
            .iter()
            .map(|&reg| (reg, ObjectRegistry::new(reg.kind())))
            .collect();
        Self {
            shared,
            contexts: BTreeMap::new(),
            current: ContextId::default(),
        }
    }

    pub(crate) fn current(&self) -> ContextId {
        self.current
    }

    /// Re-point every shared registry at the bindings of `ctx`.
    pub(crate) fn set_current(&mut self, ctx: ContextId) {
        self.current = ctx;
        for registry in self.shared.values_mut() {
            registry.set_current_context(ctx);
        }
    }

    pub(crate) fn add_context(&mut self, ctx: ContextId, graph: &mut DependencyGraph) {
        self.contexts.insert(ctx, PerContext::new(ctx, graph));
    }

    /// State of the current context; an implicit context is created on first use.
    pub(crate) fn context_mut(
        &mut self,
        graph: &mut DependencyGraph,
        diag: &mut Diagnostics,
        record: &CallRecord,
    ) -> &mut PerContext {
        let id = self.current;
        self.contexts.entry(id).or_insert_with(|| {
            diag.report(
                DiagnosticKind::NoCurrentContext,
                record.name(),
                record.no(),
                format_args!("{}: no context is current", record.name()),
            );
            PerContext::new(id, graph)
        })
    }

    /// State of the current context, if it exists.
    pub(crate) fn context(&self) -> Option<&PerContext> {
        self.contexts.get(&self.current)
    }

    pub(crate) fn contexts(&self) -> impl Iterator<Item = &PerContext> {
        self.contexts.values()
    }

    /// Registry `reg`; per-context registries come from the current context.
    pub(crate) fn get(&self, reg: Reg) -> Option<&ObjectRegistry> {
        if reg.is_per_context() {
            self.context().and_then(|pc| pc.registry(reg))
        } else {
            self.shared.get(&reg)
        }
    }

    /// Mutable registry `reg`, creating the implicit context when needed.
    pub(crate) fn get_mut(
        &mut self,
        reg: Reg,
        graph: &mut DependencyGraph,
        diag: &mut Diagnostics,
        record: &CallRecord,
    ) -> &mut ObjectRegistry {
        if reg.is_per_context() {
            let pc = self.context_mut(graph, diag, record);
            match reg {
                Reg::VertexArrays => &mut pc.vertex_arrays,
                Reg::Pipelines => &mut pc.pipelines,
                _ => &mut pc.framebuffers,
            }
        } else {
            self.shared
                .entry(reg)
                .or_insert_with(|| ObjectRegistry::new(reg.kind()))
        }
    }

    /// Shared registry `reg`.
    pub(crate) fn shared(&self, reg: Reg) -> Option<&ObjectRegistry> {
        self.shared.get(&reg)
    }

    /// Node of object `id` in `reg`.
    pub(crate) fn lookup(&self, reg: Reg, id: u64) -> Option<NodeIdx> {
        self.get(reg).and_then(|r| r.get(id))
    }

    /// Snapshot: everything bound in every registry and context, in a fixed order.
    pub(crate) fn emit_bound_objects(&self, graph: &mut DependencyGraph, out: &mut CallSet) {
        let emit = |reg: Reg, graph: &mut DependencyGraph, out: &mut CallSet| {
            if let Some(registry) = self.shared.get(&reg) {
                registry.emit_bound_objects(graph, out);
            }
        };
        for reg in [
            Reg::Programs,
            Reg::Textures,
            Reg::Buffers,
            Reg::Shaders,
            Reg::Renderbuffers,
            Reg::Samplers,
            Reg::Sync,
        ] {
            emit(reg, graph, out);
        }
        for pc in self.contexts.values() {
            for &image in pc.image_units.values() {
                graph.emit_calls_to(image, out);
            }
            pc.vertex_arrays.emit_bound_objects(graph, out);
            pc.pipelines.emit_bound_objects(graph, out);
            pc.framebuffers.emit_bound_objects(graph, out);
        }
        for reg in [
            Reg::AttribPointers,
            Reg::BufferPointers,
            Reg::LegacyPrograms,
            Reg::Queries,
            Reg::FramebuffersExt,
        ] {
            emit(reg, graph, out);
        }
    }

    pub(crate) fn unbalanced_create_calls(
        &self,
        graph: &DependencyGraph,
        window_start: u64,
        out: &mut BTreeSet<u64>,
    ) {
        for registry in self.shared.values() {
            registry.unbalanced_create_calls_in_last_frame(graph, window_start, out);
        }
        for pc in self.contexts.values() {
            for reg in [Reg::VertexArrays, Reg::Pipelines, Reg::Framebuffers] {
                if let Some(registry) = pc.registry(reg) {
                    registry.unbalanced_create_calls_in_last_frame(graph, window_start, out);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gl/objects.rs"]
mod tests;
