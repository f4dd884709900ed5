use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use smallvec::{SmallVec, smallvec};

use crate::foundation::diagnostics::{DiagnosticKind, Diagnostics};
use crate::foundation::error::TrimResult;
use crate::foundation::ids::{Bindpoint, ContextId, NodeIdx};
use crate::gl::bindpoints::{
    buffer_bindpoint, buffer_kind, framebuffer_bindpoint, framebuffer_bindpoints,
    is_buffer_kind, query_bindpoint, texture_bindpoint, texture_unit_bindpoints,
};
use crate::gl::calls::{GlAction, Reg, build_call_table};
use crate::gl::enums::*;
use crate::gl::matrix::MatrixStacks;
use crate::gl::objects::GlObjects;
use crate::graph::arena::DependencyGraph;
use crate::graph::node::ExtraKey;
use crate::graph::record::{CallRecord, CallSet};
use crate::mapping::tracker::{BufferMappingTracker, SubresourceKey};
use crate::registry::object_map::ObjectRegistry;
use crate::trace::call::TraceCall;
use crate::trace::value::Value;
use crate::trimmer::dispatch::PrefixTable;
use crate::trimmer::frame_trimmer::{FrameWindowState, FrontEnd, TrimContext};
use crate::trimmer::options::TrimOptions;

type Ids = SmallVec<[u64; 8]>;

// Object names from an array argument; a scalar counts as a single name.
fn object_ids(value: &Value) -> Ids {
    match value.as_array() {
        Some(items) => items.iter().map(Value::to_uint).collect(),
        None if value.is_null() => Ids::new(),
        None => smallvec![value.to_uint()],
    }
}

fn report(diag: &mut Diagnostics, kind: DiagnosticKind, record: &CallRecord, message: impl fmt::Display) {
    diag.report(
        kind,
        record.name(),
        record.no(),
        format_args!("{}: {message}", record.name()),
    );
}

fn unit_bindpoints(reg: Reg, unit: u32) -> SmallVec<[Bindpoint; 16]> {
    if reg == Reg::Textures {
        texture_unit_bindpoints(unit).collect()
    } else {
        smallvec![unit]
    }
}

/// OpenGL front end: legacy and core GL plus GLX, EGL and WGL context calls.
///
/// Shared objects (textures, buffers, programs, ...) live in one table per kind; vertex
/// arrays, program pipelines and framebuffers are tracked per context.
#[derive(Debug)]
pub struct GlFrontEnd {
    table: PrefixTable<GlAction>,
    graph: DependencyGraph,
    objects: GlObjects,
    matrices: MatrixStacks,
    state_calls: BTreeMap<String, CallRecord>,
    display_lists: HashMap<u64, NodeIdx>,
    active_list: Option<NodeIdx>,
    mappings: BufferMappingTracker,
    buffer_sizes: HashMap<u64, u64>,
    contexts_by_handle: HashMap<u64, ContextId>,
    thread_contexts: HashMap<u32, ContextId>,
    next_context: u32,
    next_pointer_id: u64,
}

impl GlFrontEnd {
    /// Front end configured by `opts`.
    pub fn new(opts: &TrimOptions) -> Self {
        let mut graph = DependencyGraph::new();
        let matrices = MatrixStacks::new(&mut graph);
        Self {
            table: build_call_table(opts.keep_all_state_calls),
            graph,
            objects: GlObjects::new(),
            matrices,
            state_calls: BTreeMap::new(),
            display_lists: HashMap::new(),
            active_list: None,
            mappings: BufferMappingTracker::new(),
            buffer_sizes: HashMap::new(),
            contexts_by_handle: HashMap::new(),
            thread_contexts: HashMap::new(),
            next_context: 1,
            next_pointer_id: 1,
        }
    }

    /// The object graph built so far.
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Context whose bindings calls currently use.
    pub fn current_context(&self) -> ContextId {
        self.objects.current()
    }

    /// Number of contexts created (explicitly or implicitly) so far.
    pub fn context_count(&self) -> usize {
        self.objects.contexts().count()
    }

    fn split(
        &mut self,
        reg: Reg,
        diag: &mut Diagnostics,
        record: &CallRecord,
    ) -> (&mut ObjectRegistry, &mut DependencyGraph) {
        let registry = self.objects.get_mut(reg, &mut self.graph, diag, record);
        (registry, &mut self.graph)
    }

    fn emit(&mut self, node: Option<NodeIdx>, cx: &mut TrimContext<'_>) {
        if cx.recording
            && let Some(node) = node
        {
            self.graph.emit_calls_to(node, cx.out);
        }
    }

    fn active_unit(&self) -> u32 {
        self.objects.context().map_or(0, |pc| pc.active_texture)
    }

    fn current_vao(&self) -> Option<NodeIdx> {
        self.objects
            .context()
            .and_then(|pc| pc.vertex_arrays.bound_at(0))
    }

    fn bound_buffer(&self, target: u32) -> Option<NodeIdx> {
        let bp = buffer_bindpoint(target, 0)?;
        self.objects.shared(Reg::Buffers)?.bound_at(bp)
    }

    /// Bindpoint a call on `reg` addresses, derived from its first argument.
    fn bindpoint(&self, reg: Reg, call: &TraceCall) -> Option<Bindpoint> {
        let target = call.arg(0).to_u32();
        match reg {
            Reg::Textures => texture_bindpoint(target, self.active_unit()),
            Reg::Buffers => buffer_bindpoint(target, 0),
            Reg::Framebuffers | Reg::FramebuffersExt => framebuffer_bindpoint(target),
            Reg::Queries => query_bindpoint(target, 0),
            Reg::Samplers | Reg::LegacyPrograms => Some(target),
            _ => Some(0),
        }
    }

    fn named_object(
        &self,
        reg: Reg,
        id: u64,
        record: &CallRecord,
        diag: &mut Diagnostics,
    ) -> Option<NodeIdx> {
        if id == 0 {
            return None;
        }
        let node = self.objects.lookup(reg, id);
        if node.is_none() {
            report(
                diag,
                DiagnosticKind::MissingObject,
                record,
                format_args!("unknown {} {id}", reg.kind()),
            );
        }
        node
    }

    fn record_state(&mut self, call: &TraceCall, record: &CallRecord, selectors: u8) {
        let mut key = call.name.clone();
        for i in 0..usize::from(selectors) {
            key.push_str(&format!("_{}", call.arg(i).to_uint()));
        }
        self.state_calls.insert(key, record.clone());
        self.record_in_list(record);
    }

    fn record_in_list(&mut self, record: &CallRecord) {
        if let Some(list) = self.active_list {
            self.graph.add_call(list, record);
        }
    }

    fn gen_lists(&mut self, call: &TraceCall, record: &CallRecord) {
        let range = call.arg(0).to_uint();
        let first = call.ret_value().to_uint();
        if first == 0 {
            return;
        }
        for id in first..first.saturating_add(range) {
            let node = self.graph.add_node_with_init(id, record);
            self.display_lists.insert(id, node);
        }
    }

    fn new_list(&mut self, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        let id = call.arg(0).to_uint();
        match self.display_lists.get(&id) {
            Some(&list) => {
                self.graph.add_call(list, record);
                self.active_list = Some(list);
            }
            None => report(
                cx.diag,
                DiagnosticKind::MissingObject,
                record,
                format_args!("unknown display list {id}"),
            ),
        }
    }

    fn call_list(&mut self, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        let id = call.arg(0).to_uint();
        let Some(&list) = self.display_lists.get(&id) else {
            report(
                cx.diag,
                DiagnosticKind::MissingObject,
                record,
                format_args!("unknown display list {id}"),
            );
            return;
        };
        if let Some(outer) = self.active_list {
            self.graph.add_dependency(outer, list);
            self.graph.add_call(outer, record);
        }
        self.emit(Some(list), cx);
    }

    fn delete_lists(&mut self, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        let first = call.arg(0).to_uint();
        let range = call.arg(1).to_uint();
        for id in first..first.saturating_add(range) {
            match self.display_lists.remove(&id) {
                Some(list) => self.graph.add_call(list, record),
                None => report(
                    cx.diag,
                    DiagnosticKind::MissingObject,
                    record,
                    format_args!("unknown display list {id}"),
                ),
            }
        }
    }

    fn generate(
        &mut self,
        reg: Reg,
        ids: &Value,
        record: &CallRecord,
        cx: &mut TrimContext<'_>,
    ) -> Vec<NodeIdx> {
        let ids = object_ids(ids);
        if ids.is_empty() {
            report(
                cx.diag,
                DiagnosticKind::UnexpectedArgument,
                record,
                "no object names",
            );
        }
        let (registry, graph) = self.split(reg, cx.diag, record);
        registry.generate(graph, record, &ids)
    }

    fn destroy(&mut self, reg: Reg, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        let ids = object_ids(call.arg(1));
        if reg == Reg::Buffers {
            for id in &ids {
                self.buffer_sizes.remove(id);
            }
        }
        let (registry, graph) = self.split(reg, cx.diag, record);
        registry.destroy(graph, cx.diag, record, &ids);
    }

    fn bind_at(
        &mut self,
        reg: Reg,
        bindpoint: Option<Bindpoint>,
        id: u64,
        create: bool,
        record: &CallRecord,
        cx: &mut TrimContext<'_>,
    ) -> Option<NodeIdx> {
        let (registry, graph) = self.split(reg, cx.diag, record);
        let Some(bp) = bindpoint else {
            registry.add_call(record);
            report(
                cx.diag,
                DiagnosticKind::UnknownBindpoint,
                record,
                format_args!("no {} binding point", registry.kind()),
            );
            return None;
        };
        let node = if create {
            registry.bind_with_create(graph, record, bp, id)
        } else {
            registry.bind(graph, cx.diag, record, bp, id)
        };
        match node {
            Some(node) => graph.add_call(node, record),
            None => registry.add_call(record),
        }
        self.emit(node, cx);
        node
    }

    fn bind(
        &mut self,
        reg: Reg,
        id_arg: u8,
        create: bool,
        call: &TraceCall,
        record: &CallRecord,
        cx: &mut TrimContext<'_>,
    ) {
        let id = call.arg(usize::from(id_arg)).to_uint();
        let bp = self.bindpoint(reg, call);
        let node = self.bind_at(reg, bp, id, create, record, cx);
        if reg == Reg::Textures
            && let Some(node) = node
        {
            self.check_texture_target(node, call.arg(0).to_u32(), record, cx.diag);
        }
    }

    // A texture keeps the target it was first bound with.
    fn check_texture_target(
        &mut self,
        node: NodeIdx,
        target: u32,
        record: &CallRecord,
        diag: &mut Diagnostics,
    ) {
        let n = self.graph.node_mut(node);
        match n.extra_info(ExtraKey::Target) {
            None => n.set_extra(ExtraKey::Target, u64::from(target)),
            Some(known) if known != u64::from(target) => report(
                diag,
                DiagnosticKind::UnexpectedArgument,
                record,
                format_args!(
                    "texture {} bound to {target:#x} but created for {known:#x}",
                    n.id()
                ),
            ),
            Some(_) => {}
        }
    }

    fn bind_buffer(&mut self, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        let target = call.arg(0).to_u32();
        let id = call.arg(1).to_uint();
        let node = self.bind_at(Reg::Buffers, buffer_bindpoint(target, 0), id, false, record, cx);
        // The element array binding is vertex array state.
        if target == GL_ELEMENT_ARRAY_BUFFER
            && let Some(buffer) = node
            && let Some(vao) = self.current_vao()
        {
            self.graph.add_dependency(vao, buffer);
        }
    }

    fn bind_buffer_indexed(&mut self, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        let target = call.arg(0).to_u32();
        let index = call.arg(1).to_u32();
        let id = call.arg(2).to_uint();
        let bp = buffer_bindpoint(target, index);
        let node = self.bind_at(Reg::Buffers, bp, id, false, record, cx);
        // Indexed binds also replace the generic binding of the target.
        if bp.is_some()
            && let Some(generic) = buffer_bindpoint(target, 0)
        {
            self.objects
                .get_mut(Reg::Buffers, &mut self.graph, cx.diag, record)
                .set_binding(generic, node);
        }
    }

    fn bind_framebuffer(&mut self, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        let target = call.arg(0).to_u32();
        let id = call.arg(1).to_uint();
        let bindpoints = framebuffer_bindpoints(target);
        let (registry, graph) = self.split(Reg::Framebuffers, cx.diag, record);
        if bindpoints.is_empty() {
            registry.add_call(record);
            report(
                cx.diag,
                DiagnosticKind::UnknownBindpoint,
                record,
                format_args!("unknown framebuffer target {target:#x}"),
            );
            return;
        }
        let mut node = None;
        for &bp in bindpoints {
            node = registry.bind(graph, cx.diag, record, bp, id);
        }
        match node {
            Some(node) => graph.add_call(node, record),
            None => registry.add_call(record),
        }
        if id != 0 {
            self.emit(node, cx);
        }
    }

    fn bind_vertex_array(&mut self, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        let id = call.arg(0).to_uint();
        let node = self.bind_at(Reg::VertexArrays, Some(0), id, false, record, cx);
        if let Some(vao) = node
            && let Some(fb) = self
                .objects
                .context()
                .and_then(|pc| pc.draw_framebuffer(&self.graph))
        {
            self.graph.add_dependency(fb, vao);
        }
    }

    fn bind_multi_texture(&mut self, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        let unit = call.arg(0).to_u32().saturating_sub(GL_TEXTURE0);
        let target = call.arg(1).to_u32();
        let id = call.arg(2).to_uint();
        let node = self.bind_at(
            Reg::Textures,
            texture_bindpoint(target, unit),
            id,
            false,
            record,
            cx,
        );
        if let Some(node) = node {
            self.check_texture_target(node, target, record, cx.diag);
        }
    }

    /// `glBindTextures` / `glBindSamplers`: consecutive units from one name array.
    fn bind_many(&mut self, reg: Reg, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        let first = call.arg(0).to_u32();
        let count = call.arg(1).to_u32();
        let names = call.arg(2).as_array();
        let (registry, graph) = self.split(reg, cx.diag, record);

        let Some(names) = names else {
            for unit in first..first.saturating_add(count) {
                for bp in unit_bindpoints(reg, unit) {
                    registry.unbind(bp);
                }
            }
            registry.add_call(record);
            return;
        };

        let mut bound: SmallVec<[NodeIdx; 8]> = SmallVec::new();
        let ids = names.iter().take(count as usize).map(Value::to_uint);
        for (offset, id) in (0u32..).zip(ids) {
            // Units past the addressable range are skipped.
            let Some(unit) = first.checked_add(offset) else {
                report(
                    cx.diag,
                    DiagnosticKind::UnknownBindpoint,
                    record,
                    format_args!("unit {first} + {offset} out of range"),
                );
                continue;
            };
            if id == 0 {
                for bp in unit_bindpoints(reg, unit) {
                    registry.unbind(bp);
                }
                continue;
            }
            let Some(node) = registry.get(id) else {
                report(
                    cx.diag,
                    DiagnosticKind::MissingObject,
                    record,
                    format_args!("unknown {} {id}", registry.kind()),
                );
                continue;
            };
            let bp = if reg == Reg::Textures {
                let Some(target) = graph.node(node).extra_info(ExtraKey::Target) else {
                    report(
                        cx.diag,
                        DiagnosticKind::UnknownBindpoint,
                        record,
                        format_args!("texture {id} has no known target"),
                    );
                    continue;
                };
                match texture_bindpoint(target as u32, unit) {
                    Some(bp) => bp,
                    None => {
                        report(
                            cx.diag,
                            DiagnosticKind::UnknownBindpoint,
                            record,
                            format_args!("texture {id} on unit {unit} has no bindpoint"),
                        );
                        continue;
                    }
                }
            } else {
                unit
            };
            registry.set_binding(bp, Some(node));
            graph.add_call(node, record);
            bound.push(node);
        }

        if bound.is_empty() {
            registry.add_call(record);
        }
        for &a in &bound {
            for &b in &bound {
                graph.add_dependency(a, b);
            }
        }
        if cx.recording {
            for &node in &bound {
                graph.emit_calls_to(node, cx.out);
            }
        }
    }

    fn bind_image_texture(&mut self, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        let unit = call.arg(0).to_u32();
        let id = call.arg(1).to_uint();
        let node = self.named_object(Reg::Textures, id, record, cx.diag);
        match node {
            Some(texture) => self.graph.add_call(texture, record),
            None => self
                .objects
                .get_mut(Reg::Textures, &mut self.graph, cx.diag, record)
                .add_call(record),
        }
        let pc = self.objects.context_mut(&mut self.graph, cx.diag, record);
        if let Some(texture) = node {
            pc.image_units.insert(unit, texture);
        } else {
            pc.image_units.remove(&unit);
        }
        self.emit(node, cx);
    }

    fn active_texture(&mut self, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        let unit = call.arg(0).to_u32().saturating_sub(GL_TEXTURE0);
        self.objects
            .context_mut(&mut self.graph, cx.diag, record)
            .active_texture = unit;
        self.objects
            .get_mut(Reg::Textures, &mut self.graph, cx.diag, record)
            .add_call(record);
    }

    fn query_target(&self, call: &TraceCall, indexed: bool) -> Option<Bindpoint> {
        let index = if indexed { call.arg(1).to_u32() } else { 0 };
        query_bindpoint(call.arg(0).to_u32(), index)
    }

    fn begin_query(&mut self, indexed: bool, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        let id = call.arg(if indexed { 2 } else { 1 }).to_uint();
        let bp = self.query_target(call, indexed);
        self.bind_at(Reg::Queries, bp, id, true, record, cx);
    }

    fn end_query(&mut self, indexed: bool, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        let Some(bp) = self.query_target(call, indexed) else {
            report(
                cx.diag,
                DiagnosticKind::UnknownBindpoint,
                record,
                "unknown query target",
            );
            return;
        };
        let (registry, graph) = self.split(Reg::Queries, cx.diag, record);
        let node = registry.call_on_bound(graph, cx.diag, record, bp);
        registry.unbind(bp);
        self.emit(node, cx);
    }

    fn call_on_bound_at(
        &mut self,
        reg: Reg,
        bindpoint: Option<Bindpoint>,
        dep: Option<NodeIdx>,
        reciprocal: bool,
        record: &CallRecord,
        cx: &mut TrimContext<'_>,
    ) -> Option<NodeIdx> {
        let (registry, graph) = self.split(reg, cx.diag, record);
        let Some(bp) = bindpoint else {
            registry.add_call(record);
            report(
                cx.diag,
                DiagnosticKind::UnknownBindpoint,
                record,
                format_args!("no {} binding point", registry.kind()),
            );
            return None;
        };
        let node = registry.call_on_bound_with_dep(graph, cx.diag, record, bp, dep, reciprocal);
        self.emit(node, cx);
        node
    }

    fn call_on_named(
        &mut self,
        reg: Reg,
        id: u64,
        dep: Option<NodeIdx>,
        reciprocal: bool,
        record: &CallRecord,
        cx: &mut TrimContext<'_>,
    ) -> Option<NodeIdx> {
        let (registry, graph) = self.split(reg, cx.diag, record);
        let node = registry.call_on_named_with_dep(graph, cx.diag, record, id, dep, reciprocal);
        self.emit(node, cx);
        node
    }

    fn buffer_data(&mut self, named: bool, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        let node = if named {
            self.call_on_named(Reg::Buffers, call.arg(0).to_uint(), None, false, record, cx)
        } else {
            let bp = self.bindpoint(Reg::Buffers, call);
            self.call_on_bound_at(Reg::Buffers, bp, None, false, record, cx)
        };
        if let Some(node) = node {
            let id = self.graph.node(node).id();
            self.buffer_sizes.insert(id, call.arg(1).to_uint());
        }
    }

    // Buffer names are shared between contexts, so mappings are keyed by name only.
    fn mapping_key(buffer: u64) -> SubresourceKey {
        SubresourceKey {
            context: 0,
            resource: buffer,
            subresource: 0,
        }
    }

    fn map_buffer(
        &mut self,
        named: bool,
        range: bool,
        call: &TraceCall,
        record: &CallRecord,
        cx: &mut TrimContext<'_>,
    ) {
        let node = if named {
            self.call_on_named(Reg::Buffers, call.arg(0).to_uint(), None, false, record, cx)
        } else {
            let bp = self.bindpoint(Reg::Buffers, call);
            self.call_on_bound_at(Reg::Buffers, bp, None, false, record, cx)
        };
        let Some(node) = node else {
            return;
        };
        let start = call.ret_value().to_pointer();
        if start == 0 {
            return;
        }
        let buffer = self.graph.node(node).id();
        let (length, discard) = if range {
            let access = call.arg(3).to_uint();
            (
                Some(call.arg(2).to_uint()),
                access & GL_MAP_INVALIDATE_BUFFER_BIT != 0,
            )
        } else {
            (None, false)
        };
        let end = match length.or_else(|| self.buffer_sizes.get(&buffer).copied()) {
            Some(len) => start.saturating_add(len),
            None => u64::MAX,
        };
        self.mappings
            .map(record, Self::mapping_key(buffer), start, end, discard, cx.diag);
    }

    fn unmap_buffer(&mut self, named: bool, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        let node = if named {
            self.call_on_named(Reg::Buffers, call.arg(0).to_uint(), None, false, record, cx)
        } else {
            let bp = self.bindpoint(Reg::Buffers, call);
            self.call_on_bound_at(Reg::Buffers, bp, None, false, record, cx)
        };
        if let Some(node) = node {
            let key = Self::mapping_key(self.graph.node(node).id());
            // Each memcpy already landed on the buffer node.
            let _writes = self.mappings.unmap(record, key, cx.diag);
        }
    }

    fn memcpy(&mut self, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) -> TrimResult<()> {
        let dest = call.arg(0).to_pointer();
        let len = call.arg(2).to_uint();
        let key = self
            .mappings
            .record_write(record, dest, dest.saturating_add(len))?;
        let node = self.objects.lookup(Reg::Buffers, key.resource);
        if let Some(buffer) = node {
            self.graph.add_call(buffer, record);
        }
        self.emit(node, cx);
        Ok(())
    }

    fn copy_buffer_sub_data(&mut self, named: bool, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        if named {
            let src = self.named_object(Reg::Buffers, call.arg(0).to_uint(), record, cx.diag);
            self.call_on_named(Reg::Buffers, call.arg(1).to_uint(), src, false, record, cx);
        } else {
            let src = self.bound_buffer(call.arg(0).to_u32());
            let dst = buffer_bindpoint(call.arg(1).to_u32(), 0);
            self.call_on_bound_at(Reg::Buffers, dst, src, false, record, cx);
        }
    }

    fn copy_image_sub_data(&mut self, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        let image_reg = |target: u32| {
            if target == GL_RENDERBUFFER {
                Reg::Renderbuffers
            } else {
                Reg::Textures
            }
        };
        let src_reg = image_reg(call.arg(1).to_u32());
        let src = self.named_object(src_reg, call.arg(0).to_uint(), record, cx.diag);
        let dst_reg = image_reg(call.arg(7).to_u32());
        self.call_on_named(dst_reg, call.arg(6).to_uint(), src, false, record, cx);
    }

    /// Every pointer call gets its own node, bound at the attribute index.
    fn vertex_pointer(
        &mut self,
        reg: Reg,
        index: u32,
        buffer: Option<NodeIdx>,
        record: &CallRecord,
        cx: &mut TrimContext<'_>,
    ) {
        let id = self.next_pointer_id;
        self.next_pointer_id += 1;
        let node = self.graph.add_node(id);
        self.graph.add_call(node, record);
        if let Some(buffer) = buffer {
            self.graph.add_dependency(node, buffer);
        }
        let registry = self.objects.get_mut(reg, &mut self.graph, cx.diag, record);
        registry.insert(id, node);
        registry.set_binding(index, Some(node));
        if let Some(vao) = self.current_vao() {
            self.graph.add_dependency(vao, node);
        }
        self.emit(Some(node), cx);
    }

    /// Uniform buffers of every context; storage buffers and images of the current one.
    fn link_shader_inputs(&mut self, program: NodeIdx) {
        if let Some(buffers) = self.objects.shared(Reg::Buffers) {
            for (_, bp, buffer) in buffers.bound_everywhere() {
                if is_buffer_kind(bp, buffer_kind::UNIFORM) {
                    self.graph.add_dependency(program, buffer);
                }
            }
            for (bp, buffer) in buffers.bound_in_current() {
                if is_buffer_kind(bp, buffer_kind::SHADER_STORAGE) {
                    self.graph.add_dependency(program, buffer);
                    self.graph.add_dependency(buffer, program);
                }
            }
        }
        if let Some(pc) = self.objects.context() {
            for &image in pc.image_units.values() {
                self.graph.add_dependency(program, image);
                self.graph.add_dependency(image, program);
            }
        }
    }

    fn draw(&mut self, record: &CallRecord, cx: &mut TrimContext<'_>) {
        let program = self
            .objects
            .shared(Reg::Programs)
            .and_then(|r| r.bound_at(0));
        let pipeline = self.objects.context().and_then(|pc| pc.pipelines.bound_at(0));
        for target in [program, pipeline].into_iter().flatten() {
            self.link_shader_inputs(target);
        }

        let fb = self
            .objects
            .context()
            .and_then(|pc| pc.draw_framebuffer(&self.graph))
            .or_else(|| {
                self.objects
                    .shared(Reg::FramebuffersExt)
                    .and_then(|r| r.bound_at(GL_DRAW_FRAMEBUFFER))
            });
        // Draws into the default framebuffer only matter inside the kept frames.
        if let Some(fb) = fb {
            self.graph.add_call(fb, record);
            for reg in [
                Reg::Buffers,
                Reg::Textures,
                Reg::Programs,
                Reg::LegacyPrograms,
                Reg::Samplers,
                Reg::AttribPointers,
                Reg::BufferPointers,
            ] {
                if let Some(registry) = self.objects.shared(reg) {
                    registry.add_bound_as_dependency_to(&mut self.graph, fb);
                }
            }
            if let Some(pc) = self.objects.context() {
                pc.vertex_arrays
                    .add_bound_as_dependency_to(&mut self.graph, fb);
                pc.pipelines.add_bound_as_dependency_to(&mut self.graph, fb);
            }
        }

        if cx.recording {
            for reg in [
                Reg::VertexArrays,
                Reg::AttribPointers,
                Reg::BufferPointers,
                Reg::Buffers,
            ] {
                if let Some(registry) = self.objects.get(reg) {
                    registry.emit_bound_objects(&mut self.graph, cx.out);
                }
            }
        }
    }

    fn dispatch(&mut self, indirect: bool, record: &CallRecord, cx: &mut TrimContext<'_>) {
        let program = self
            .objects
            .shared(Reg::Programs)
            .and_then(|r| r.bound_at(0))
            .or_else(|| self.objects.context().and_then(|pc| pc.pipelines.bound_at(0)));
        let Some(program) = program else {
            report(
                cx.diag,
                DiagnosticKind::MissingObject,
                record,
                "no program bound",
            );
            return;
        };
        self.graph.add_call(program, record);
        self.link_shader_inputs(program);
        if indirect && let Some(buffer) = self.bound_buffer(GL_DISPATCH_INDIRECT_BUFFER) {
            self.graph.add_dependency(program, buffer);
        }
        self.emit(Some(program), cx);
    }

    fn read_buffer(&mut self, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        let mode = call.arg(0).to_u32();
        let read_fb = self
            .objects
            .context()
            .and_then(|pc| pc.framebuffers.bound_at(GL_READ_FRAMEBUFFER));
        if mode == GL_BACK
            && let Some(fb) = read_fb
            && self.graph.node(fb).id() != 0
        {
            report(
                cx.diag,
                DiagnosticKind::UnexpectedArgument,
                record,
                "GL_BACK selected on a framebuffer object",
            );
        }
        self.call_on_bound_at(
            Reg::Framebuffers,
            Some(GL_READ_FRAMEBUFFER),
            None,
            false,
            record,
            cx,
        );
    }

    fn create_context(
        &mut self,
        shared_arg: Option<u8>,
        call: &TraceCall,
        record: &CallRecord,
        cx: &mut TrimContext<'_>,
    ) {
        cx.require(record);
        let handle = call.ret_value().to_pointer();
        if handle == 0 {
            return;
        }
        let shared = shared_arg
            .map(|arg| call.arg(usize::from(arg)).to_pointer())
            .filter(|&h| h != 0);
        let shares_known = shared.is_some_and(|h| self.contexts_by_handle.contains_key(&h));
        if !self.contexts_by_handle.is_empty() && !shares_known {
            tracing::warn!(
                call = record.no(),
                "{}: context {handle:#x} shares no objects with earlier contexts; names are tracked as shared",
                record.name()
            );
        }
        self.add_context(handle);
    }

    fn add_context(&mut self, handle: u64) -> ContextId {
        let id = ContextId(self.next_context);
        self.next_context += 1;
        self.contexts_by_handle.insert(handle, id);
        self.objects.add_context(id, &mut self.graph);
        tracing::debug!(handle, context = id.0, "new GL context");
        id
    }

    fn make_current(&mut self, ctx_arg: u8, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        cx.require(record);
        let handle = call.arg(usize::from(ctx_arg)).to_pointer();
        let ctx = if handle == 0 {
            ContextId::default()
        } else if let Some(&id) = self.contexts_by_handle.get(&handle) {
            id
        } else {
            report(
                cx.diag,
                DiagnosticKind::NoCurrentContext,
                record,
                format_args!("context {handle:#x} was never created"),
            );
            self.add_context(handle)
        };
        self.thread_contexts.insert(call.thread_id, ctx);
        self.objects.set_current(ctx);
    }
}

impl FrontEnd for GlFrontEnd {
    type Action = GlAction;

    fn resolve(&self, name: &str, call_no: u64, diag: &mut Diagnostics) -> Option<GlAction> {
        self.table.resolve(name, call_no, diag)
    }

    fn apply(
        &mut self,
        action: GlAction,
        call: &TraceCall,
        record: &CallRecord,
        cx: &mut TrimContext<'_>,
    ) -> TrimResult<()> {
        match action {
            GlAction::Required => cx.require(record),
            GlAction::IgnoreHistory => {
                if cx.recording {
                    cx.require(record);
                }
            }
            GlAction::State { selectors } => self.record_state(call, record, selectors),
            GlAction::Immediate => self.record_in_list(record),
            GlAction::GenLists => self.gen_lists(call, record),
            GlAction::NewList => self.new_list(call, record, cx),
            GlAction::EndList => {
                self.record_in_list(record);
                self.active_list = None;
            }
            GlAction::CallList => self.call_list(call, record, cx),
            GlAction::DeleteLists => self.delete_lists(call, record, cx),
            GlAction::MatrixMode => {
                self.matrices
                    .mode(&mut self.graph, cx.diag, record, call.arg(0).to_u32());
            }
            GlAction::MatrixLoad => self.matrices.load(&mut self.graph, record),
            GlAction::MatrixOp => self.matrices.apply(&mut self.graph, record),
            GlAction::PushMatrix => self.matrices.push(&mut self.graph, record),
            GlAction::PopMatrix => self.matrices.pop(&mut self.graph, cx.diag, record),
            GlAction::Generate { reg, ids_arg } => {
                self.generate(reg, call.arg(usize::from(ids_arg)), record, cx);
            }
            GlAction::GenerateTextures => {
                let target = call.arg(0).to_uint();
                for node in self.generate(Reg::Textures, call.arg(2), record, cx) {
                    self.graph
                        .node_mut(node)
                        .set_extra(ExtraKey::Target, target);
                }
            }
            GlAction::Destroy(reg) => self.destroy(reg, call, record, cx),
            GlAction::Create(reg) => {
                let id = call.ret_value().to_uint();
                if id != 0 {
                    let (registry, graph) = self.split(reg, cx.diag, record);
                    registry.create(graph, record, id);
                }
            }
            GlAction::Delete(reg) => {
                let id = call.arg(0).to_uint();
                let (registry, graph) = self.split(reg, cx.diag, record);
                registry.delete(graph, cx.diag, record, id);
            }
            GlAction::Bind { reg, id_arg } => self.bind(reg, id_arg, false, call, record, cx),
            GlAction::BindWithCreate { reg, id_arg } => {
                self.bind(reg, id_arg, true, call, record, cx);
            }
            GlAction::BindBuffer => self.bind_buffer(call, record, cx),
            GlAction::BindBufferIndexed => self.bind_buffer_indexed(call, record, cx),
            GlAction::BindFramebuffer => self.bind_framebuffer(call, record, cx),
            GlAction::BindVertexArray => self.bind_vertex_array(call, record, cx),
            GlAction::BindMultiTexture => self.bind_multi_texture(call, record, cx),
            GlAction::BindTextures => self.bind_many(Reg::Textures, call, record, cx),
            GlAction::BindSamplers => self.bind_many(Reg::Samplers, call, record, cx),
            GlAction::BindImageTexture => self.bind_image_texture(call, record, cx),
            GlAction::ActiveTexture => self.active_texture(call, record, cx),
            GlAction::BeginQuery { indexed } => self.begin_query(indexed, call, record, cx),
            GlAction::EndQuery { indexed } => self.end_query(indexed, call, record, cx),
            GlAction::CallOnBound(reg) => {
                let bp = self.bindpoint(reg, call);
                self.call_on_bound_at(reg, bp, None, false, record, cx);
            }
            GlAction::CallOnNamed(reg) => {
                self.call_on_named(reg, call.arg(0).to_uint(), None, false, record, cx);
            }
            GlAction::Rebuild(reg) => {
                if let Some(node) = self.call_on_named(reg, call.arg(0).to_uint(), None, false, record, cx) {
                    self.graph
                        .node_mut(node)
                        .set_extra(ExtraKey::RebuildCall, record.no());
                }
            }
            GlAction::CallOnBoundTo { reg, bindpoint } => {
                self.call_on_bound_at(reg, Some(bindpoint), None, false, record, cx);
            }
            GlAction::BoundWithDep {
                reg,
                dep,
                dep_arg,
                reciprocal,
            } => {
                let dep_id = call.arg(usize::from(dep_arg)).to_uint();
                let dep = self.named_object(dep, dep_id, record, cx.diag);
                let bp = self.bindpoint(reg, call);
                self.call_on_bound_at(reg, bp, dep, reciprocal, record, cx);
            }
            GlAction::NamedWithDep {
                reg,
                dep,
                dep_arg,
                reciprocal,
            } => {
                let dep_id = call.arg(usize::from(dep_arg)).to_uint();
                let dep = self.named_object(dep, dep_id, record, cx.diag);
                self.call_on_named(reg, call.arg(0).to_uint(), dep, reciprocal, record, cx);
            }
            GlAction::BoundWithDepBoundTo { reg, dep, target } => {
                let dep = buffer_bindpoint(target, 0)
                    .and_then(|bp| self.objects.get(dep)?.bound_at(bp));
                let bp = self.bindpoint(reg, call);
                self.call_on_bound_at(reg, bp, dep, false, record, cx);
            }
            GlAction::NamedWithDepBoundTo { reg, dep, target } => {
                let dep = buffer_bindpoint(target, 0)
                    .and_then(|bp| self.objects.get(dep)?.bound_at(bp));
                self.call_on_named(reg, call.arg(0).to_uint(), dep, false, record, cx);
            }
            GlAction::BufferData => self.buffer_data(false, call, record, cx),
            GlAction::NamedBufferData => self.buffer_data(true, call, record, cx),
            GlAction::MapBuffer { named, range } => self.map_buffer(named, range, call, record, cx),
            GlAction::UnmapBuffer { named } => self.unmap_buffer(named, call, record, cx),
            GlAction::Memcpy => self.memcpy(call, record, cx)?,
            GlAction::CopyBufferSubData { named } => {
                self.copy_buffer_sub_data(named, call, record, cx);
            }
            GlAction::CopyImageSubData => self.copy_image_sub_data(call, record, cx),
            GlAction::AttribPointer => {
                let buffer = self.bound_buffer(GL_ARRAY_BUFFER);
                self.vertex_pointer(Reg::AttribPointers, call.arg(0).to_u32(), buffer, record, cx);
            }
            GlAction::BindVertexBuffer => {
                let buffer = self.named_object(Reg::Buffers, call.arg(1).to_uint(), record, cx.diag);
                self.vertex_pointer(Reg::BufferPointers, call.arg(0).to_u32(), buffer, record, cx);
            }
            GlAction::Draw => self.draw(record, cx),
            GlAction::Dispatch { indirect } => self.dispatch(indirect, record, cx),
            GlAction::WaitSync => {
                self.call_on_named(Reg::Sync, call.arg(0).to_pointer(), None, false, record, cx);
            }
            GlAction::Blit => {
                let read = self
                    .objects
                    .context()
                    .and_then(|pc| pc.framebuffers.bound_at(GL_READ_FRAMEBUFFER));
                self.call_on_bound_at(
                    Reg::Framebuffers,
                    Some(GL_DRAW_FRAMEBUFFER),
                    read,
                    false,
                    record,
                    cx,
                );
            }
            GlAction::BlitNamed => {
                let read = self.objects.lookup(Reg::Framebuffers, call.arg(0).to_uint());
                self.call_on_named(Reg::Framebuffers, call.arg(1).to_uint(), read, false, record, cx);
            }
            GlAction::ReadBuffer => self.read_buffer(call, record, cx),
            GlAction::CreateContext { shared_arg } => self.create_context(shared_arg, call, record, cx),
            GlAction::MakeCurrent { ctx_arg } => self.make_current(ctx_arg, call, record, cx),
        }
        Ok(())
    }

    fn emit_state(&mut self, out: &mut CallSet) {
        self.matrices.emit_state(&mut self.graph, out);
        out.extend(self.state_calls.values());
        self.objects.emit_bound_objects(&mut self.graph, out);
    }

    fn skip_delete(&self, call: &TraceCall, window: &FrameWindowState) -> bool {
        let name = call.name.strip_suffix("ARB").unwrap_or(&call.name);
        let (reg, ids) = match name {
            "glDeleteProgram" => (Reg::Programs, object_ids(call.arg(0))),
            "glDeleteSync" => (Reg::Sync, object_ids(call.arg(0))),
            "glDeleteBuffers" => (Reg::Buffers, object_ids(call.arg(1))),
            "glDeleteTextures" => (Reg::Textures, object_ids(call.arg(1))),
            "glDeleteFramebuffers" => (Reg::Framebuffers, object_ids(call.arg(1))),
            "glDeleteFramebuffersEXT" => (Reg::FramebuffersExt, object_ids(call.arg(1))),
            "glDeleteRenderbuffers" => (Reg::Renderbuffers, object_ids(call.arg(1))),
            "glDeleteQueries" => (Reg::Queries, object_ids(call.arg(1))),
            "glDeleteProgramPipelines" => (Reg::Pipelines, object_ids(call.arg(1))),
            _ => return false,
        };
        let Some(registry) = self.objects.get(reg) else {
            return true;
        };
        ids.iter().all(|&id| match registry.get(id) {
            None => true,
            Some(node) => {
                (window.recording && !self.graph.node(node).emitted())
                    || self
                        .graph
                        .created_before(node, window.last_frame_start_call)
            }
        })
    }

    fn switch_thread(&mut self, thread_id: u32, _diag: &mut Diagnostics) {
        let ctx = self
            .thread_contexts
            .get(&thread_id)
            .copied()
            .unwrap_or_default();
        self.objects.set_current(ctx);
    }

    fn unbalanced_create_calls(&self, last_frame_start: u64, out: &mut BTreeSet<u64>) {
        self.objects
            .unbalanced_create_calls(&self.graph, last_frame_start, out);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gl/front_end.rs"]
mod tests;
