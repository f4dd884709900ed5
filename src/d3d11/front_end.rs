use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use smallvec::SmallVec;

use crate::d3d11::context::{Binding, D3dContext};
use crate::d3d11::interfaces::{BindingKind, D3dAction, InterfaceTable, Stage, StateKind};
use crate::d3d11::model::{
    D3dBox, MAP_WRITE_DISCARD, ObjectKind, ObjectKinds, Operation, ResourceShape, execute,
    update_subresource,
};
use crate::foundation::diagnostics::{DiagnosticKind, Diagnostics};
use crate::foundation::error::TrimResult;
use crate::foundation::ids::NodeIdx;
use crate::graph::arena::DependencyGraph;
use crate::graph::node::ExtraKey;
use crate::graph::record::{CallRecord, CallSet};
use crate::mapping::tracker::{BufferMappingTracker, SubresourceKey};
use crate::registry::object_map::ObjectRegistry;
use crate::trace::call::TraceCall;
use crate::trace::value::Value;
use crate::trimmer::frame_trimmer::{FrameWindowState, FrontEnd, TrimContext};

/// `D3D11_KEEP_RENDER_TARGETS_AND_DEPTH_STENCIL` and `D3D11_KEEP_UNORDERED_ACCESS_VIEWS`.
const KEEP_BINDINGS: u32 = u32::MAX;

fn report(diag: &mut Diagnostics, kind: DiagnosticKind, record: &CallRecord, message: impl fmt::Display) {
    diag.report(
        kind,
        record.name(),
        record.no(),
        format_args!("{}: {message}", record.name()),
    );
}

// COM out-parameters are recorded as one-element pointer arrays.
fn out_pointer(call: &TraceCall, arg: usize) -> u64 {
    call.arg(arg).first_element().map_or(0, Value::to_pointer)
}

// Members of the struct a `const DESC *` argument points to.
fn desc(call: &TraceCall, arg: usize) -> &[Value] {
    call.arg(arg)
        .first_element()
        .and_then(Value::as_struct)
        .unwrap_or_default()
}

fn member(members: &[Value], i: usize) -> u64 {
    members.get(i).map_or(0, Value::to_uint)
}

fn pointers(value: &Value) -> SmallVec<[u64; 8]> {
    value
        .as_array()
        .map(|items| items.iter().map(Value::to_pointer).collect())
        .unwrap_or_default()
}

/// Direct3D11 and DXGI front end.
///
/// Every COM object lives in one pointer-keyed registry; what a node stands for is kept in
/// a side table. Reference counts are tracked on the nodes but never free anything.
#[derive(Debug)]
pub struct D3d11FrontEnd {
    table: InterfaceTable,
    graph: DependencyGraph,
    objects: ObjectRegistry,
    kinds: ObjectKinds,
    contexts: BTreeMap<u64, D3dContext>,
    command_lists: HashMap<NodeIdx, Vec<Operation>>,
    mappings: BufferMappingTracker,
}

impl D3d11FrontEnd {
    /// Front end with an empty object table.
    pub fn new() -> Self {
        Self {
            table: InterfaceTable::new(),
            graph: DependencyGraph::new(),
            objects: ObjectRegistry::new("COM object"),
            kinds: ObjectKinds::default(),
            contexts: BTreeMap::new(),
            command_lists: HashMap::new(),
            mappings: BufferMappingTracker::new(),
        }
    }

    /// The object graph built so far.
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Node of the object at `ptr`.
    pub fn object(&self, ptr: u64) -> Option<NodeIdx> {
        if ptr == 0 {
            return None;
        }
        self.objects.get(ptr)
    }

    /// Number of immediate and deferred contexts seen.
    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    fn lookup(&self, ptr: u64, record: &CallRecord, diag: &mut Diagnostics) -> Option<NodeIdx> {
        if ptr == 0 {
            return None;
        }
        let node = self.objects.get(ptr);
        if node.is_none() {
            report(
                diag,
                DiagnosticKind::MissingObject,
                record,
                format_args!("unknown object {ptr:#x}"),
            );
        }
        node
    }

    fn this(&self, call: &TraceCall, record: &CallRecord, diag: &mut Diagnostics) -> Option<NodeIdx> {
        self.lookup(call.arg(0).to_pointer(), record, diag)
    }

    fn context_of(&self, call: &TraceCall, record: &CallRecord, diag: &mut Diagnostics) -> Option<u64> {
        let ptr = call.arg(0).to_pointer();
        if self.contexts.contains_key(&ptr) {
            return Some(ptr);
        }
        report(
            diag,
            DiagnosticKind::MissingObject,
            record,
            format_args!("unknown device context {ptr:#x}"),
        );
        None
    }

    fn record_object(&mut self, node: Option<NodeIdx>, cx: &mut TrimContext<'_>) {
        if cx.recording
            && let Some(node) = node
        {
            self.graph.emit_calls_to(node, cx.out);
        }
    }

    fn record_object_init(&self, node: NodeIdx, cx: &mut TrimContext<'_>) {
        if cx.recording {
            self.graph.emit_init_calls_to(node, cx.out);
        }
    }

    /// Register the object returned through argument `out_arg` if the call succeeded.
    fn create(
        &mut self,
        call: &TraceCall,
        record: &CallRecord,
        parent: Option<NodeIdx>,
        out_arg: usize,
        kind: ObjectKind,
    ) -> Option<NodeIdx> {
        // Void methods have no return value and always succeed.
        if call.ret_value().to_sint() != 0 {
            return None;
        }
        let id = out_pointer(call, out_arg);
        if id == 0 {
            return None;
        }
        let node = self.objects.create(&mut self.graph, record, id);
        self.kinds.insert(node, kind);
        if let Some(parent) = parent {
            self.graph.add_dependency(node, parent);
        }
        Some(node)
    }

    #[allow(clippy::too_many_arguments)]
    fn create_with_dep(
        &mut self,
        call: &TraceCall,
        record: &CallRecord,
        parent: Option<NodeIdx>,
        out_arg: usize,
        dep_arg: usize,
        kind: ObjectKind,
        diag: &mut Diagnostics,
    ) -> Option<NodeIdx> {
        let dep = self.lookup(call.arg(dep_arg).to_pointer(), record, diag);
        let node = self.create(call, record, parent, out_arg, kind)?;
        if let Some(dep) = dep {
            self.graph.add_dependency(node, dep);
        }
        Some(node)
    }

    /// Object returned through the argument called `name`; a known object gains a reference.
    fn get_or_create(
        &mut self,
        call: &TraceCall,
        record: &CallRecord,
        parent: Option<NodeIdx>,
        name: &str,
        kind: ObjectKind,
        diag: &mut Diagnostics,
    ) -> Option<NodeIdx> {
        let Some(arg) = call.find_arg(name) else {
            report(
                diag,
                DiagnosticKind::UnexpectedArgument,
                record,
                format_args!("no argument {name}"),
            );
            return None;
        };
        if let Some(node) = self.object(out_pointer(call, arg)) {
            self.add_ref(node, record);
            return Some(node);
        }
        self.create(call, record, parent, arg, kind)
    }

    /// Node standing for one call (binding, command, update) rather than an API object.
    fn fake_create(&mut self, record: &CallRecord, parent: Option<NodeIdx>) -> NodeIdx {
        let node = self.graph.add_node_with_init(record.no(), record);
        if let Some(parent) = parent {
            self.graph.add_dependency(node, parent);
        }
        node
    }

    fn add_ref(&mut self, node: NodeIdx, record: &CallRecord) {
        self.graph.node_mut(node).refcount += 1;
        self.graph.add_call(node, record);
    }

    fn release(&mut self, call: &TraceCall, record: &CallRecord, diag: &mut Diagnostics) {
        let Some(node) = self.this(call, record, diag) else {
            return;
        };
        self.graph.add_call(node, record);
        let n = self.graph.node_mut(node);
        if n.refcount == 0 {
            report(
                diag,
                DiagnosticKind::ProtocolViolation,
                record,
                "object released more often than referenced",
            );
            return;
        }
        n.refcount -= 1;
        if n.refcount == 0 {
            n.set_extra(ExtraKey::DeleteCall, record.no());
            n.set_extra(ExtraKey::Valid, 0);
        }
    }

    fn immediate_context(
        &mut self,
        call: &TraceCall,
        record: &CallRecord,
        device: NodeIdx,
        diag: &mut Diagnostics,
    ) {
        let Some(node) =
            self.get_or_create(call, record, Some(device), "ppImmediateContext", ObjectKind::Context, diag)
        else {
            return;
        };
        let ptr = self.graph.node(node).id();
        self.contexts
            .entry(ptr)
            .or_insert_with(|| D3dContext::new(node, false));
    }

    fn create_device(
        &mut self,
        device_arg: u8,
        swap_chain: Option<(u8, u8)>,
        call: &TraceCall,
        record: &CallRecord,
        diag: &mut Diagnostics,
    ) {
        let adapter = self.lookup(call.arg(0).to_pointer(), record, diag);
        let Some(device) = self.create(call, record, adapter, usize::from(device_arg), ObjectKind::Device)
        else {
            return;
        };
        self.immediate_context(call, record, device, diag);
        if let Some((desc_arg, out_arg)) = swap_chain {
            self.create_swap_chain(call, record, Some(device), None, desc_arg, out_arg, true);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn create_swap_chain(
        &mut self,
        call: &TraceCall,
        record: &CallRecord,
        parent: Option<NodeIdx>,
        device: Option<NodeIdx>,
        desc_arg: u8,
        out_arg: u8,
        nested: bool,
    ) {
        let desc = desc(call, usize::from(desc_arg));
        // DXGI_SWAP_CHAIN_DESC keeps the size in BufferDesc; DXGI_SWAP_CHAIN_DESC1 holds it directly.
        let size = if nested {
            desc.first().and_then(Value::as_struct).unwrap_or_default()
        } else {
            desc
        };
        let kind = ObjectKind::SwapChain {
            width: member(size, 0),
            height: member(size, 1),
        };
        if let Some(node) = self.create(call, record, parent, usize::from(out_arg), kind)
            && let Some(device) = device
        {
            self.graph.add_dependency(node, device);
        }
    }

    fn get_parent(&mut self, call: &TraceCall, record: &CallRecord, diag: &mut Diagnostics) {
        let Some(this) = self.this(call, record, diag) else {
            return;
        };
        let kind = match self.kinds.get(this) {
            Some(ObjectKind::DxgiDevice) => ObjectKind::Adapter,
            Some(ObjectKind::Adapter | ObjectKind::SwapChain { .. }) => ObjectKind::Factory,
            _ => return,
        };
        self.get_or_create(call, record, Some(this), "ppParent", kind, diag);
    }

    fn query_interface(&mut self, call: &TraceCall, record: &CallRecord, diag: &mut Diagnostics) {
        let Some(this) = self.this(call, record, diag) else {
            return;
        };
        // Devices are queried for their DXGI device; other queries return the object itself.
        let kind = match self.kinds.get(this) {
            Some(ObjectKind::Device) => ObjectKind::DxgiDevice,
            Some(kind) => kind,
            None => ObjectKind::Generic,
        };
        self.get_or_create(call, record, Some(this), "ppvObj", kind, diag);
    }

    fn swap_chain_buffer(&mut self, call: &TraceCall, record: &CallRecord, diag: &mut Diagnostics) {
        let Some(this) = self.this(call, record, diag) else {
            return;
        };
        let height = match self.kinds.get(this) {
            Some(ObjectKind::SwapChain { height, .. }) => height,
            _ => 0,
        };
        let shape = ResourceShape::Texture2D {
            height,
            bind_flags: 0,
        };
        if let Some(buffer) =
            self.get_or_create(call, record, Some(this), "ppSurface", ObjectKind::Resource(shape), diag)
        {
            self.graph.add_dependency(this, buffer);
        }
    }

    fn resize_buffers(&mut self, call: &TraceCall, record: &CallRecord, diag: &mut Diagnostics) {
        let Some(this) = self.this(call, record, diag) else {
            return;
        };
        if let Some(ObjectKind::SwapChain { width, height }) = self.kinds.get_mut(this) {
            *width = call.arg(2).to_uint();
            *height = call.arg(3).to_uint();
        }
        self.graph.add_call(this, record);
    }

    fn create_resource(
        &mut self,
        dims: Option<u8>,
        call: &TraceCall,
        record: &CallRecord,
        diag: &mut Diagnostics,
    ) {
        let device = self.this(call, record, diag);
        let desc = desc(call, 1);
        let shape = match dims {
            None => ResourceShape::Buffer {
                size: member(desc, 0),
            },
            Some(1) => ResourceShape::Texture1D,
            Some(2) => ResourceShape::Texture2D {
                height: member(desc, 1),
                bind_flags: member(desc, 7) as u32,
            },
            Some(_) => ResourceShape::Texture3D {
                depth: member(desc, 2),
            },
        };
        self.create(call, record, device, 3, ObjectKind::Resource(shape));
    }

    fn create_view(&mut self, call: &TraceCall, record: &CallRecord, diag: &mut Diagnostics) {
        let device = self.this(call, record, diag);
        let Some(resource) = self.object(call.arg(1).to_pointer()) else {
            report(
                diag,
                DiagnosticKind::MissingObject,
                record,
                "view of an unknown resource",
            );
            return;
        };
        let kind = ObjectKind::View {
            resource,
            entire: call.arg(2).as_array().is_none(),
        };
        if let Some(view) = self.create(call, record, device, 3, kind) {
            self.graph.add_dependency(view, resource);
        }
    }

    fn create_depth_stencil_state(&mut self, call: &TraceCall, record: &CallRecord, diag: &mut Diagnostics) {
        let device = self.this(call, record, diag);
        // DepthWriteMask and StencilWriteMask of D3D11_DEPTH_STENCIL_DESC.
        let desc = desc(call, 1);
        let write = member(desc, 1) != 0 || member(desc, 5) != 0;
        self.create(call, record, device, 2, ObjectKind::DepthStencilState { write });
    }

    fn add_operation(&mut self, ptr: u64, op: Operation, cx: &mut TrimContext<'_>) {
        let Some(ctx) = self.contexts.get_mut(&ptr) else {
            return;
        };
        if ctx.deferred {
            ctx.ops.push(op);
        } else {
            execute(&op, &mut self.graph, &self.kinds, cx.recording, cx.out);
        }
    }

    fn command(
        &mut self,
        indirect: bool,
        compute: bool,
        call: &TraceCall,
        record: &CallRecord,
        cx: &mut TrimContext<'_>,
    ) {
        let Some(ptr) = self.context_of(call, record, cx.diag) else {
            return;
        };
        let ctx_node = self.contexts.get(&ptr).map(|ctx| ctx.node);
        let cmd = self.fake_create(record, ctx_node);
        if indirect && let Some(args) = self.lookup(call.arg(1).to_pointer(), record, cx.diag) {
            self.graph.add_dependency(cmd, args);
        }
        let Some(ctx) = self.contexts.get(&ptr) else {
            return;
        };
        let targets = if compute {
            ctx.link_dispatch(&mut self.graph, cmd)
        } else {
            ctx.link_draw(&mut self.graph, &self.kinds, cmd)
        };
        self.add_operation(ptr, Operation::Command { node: cmd, targets }, cx);
    }

    #[allow(clippy::too_many_arguments)]
    fn bind_object(
        &mut self,
        ptr: u64,
        kind: BindingKind,
        stage: Stage,
        slot: u32,
        object: u64,
        extras: &[u64],
        record: &CallRecord,
        cx: &mut TrimContext<'_>,
    ) {
        let object = self.lookup(object, record, cx.diag);
        let extras: SmallVec<[NodeIdx; 4]> = extras
            .iter()
            .filter_map(|&p| self.lookup(p, record, cx.diag))
            .collect();
        let node = self.fake_create(record, object);
        for &dep in &extras {
            self.graph.add_dependency(node, dep);
        }
        let Some(ctx) = self.contexts.get_mut(&ptr) else {
            return;
        };
        ctx.bindings.set(kind, stage, slot, Binding { node, object });

        // The objects must exist when the kept frames start binding them.
        for dep in object.into_iter().chain(extras) {
            self.record_object_init(dep, cx);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn bind_objects(
        &mut self,
        ptr: u64,
        kind: BindingKind,
        stage: Stage,
        first_slot: u32,
        objects: &Value,
        record: &CallRecord,
        cx: &mut TrimContext<'_>,
    ) {
        for (slot, object) in (first_slot..).zip(pointers(objects)) {
            self.bind_object(ptr, kind, stage, slot, object, &[], record, cx);
        }
    }

    fn set_render_targets(
        &mut self,
        uavs: bool,
        call: &TraceCall,
        record: &CallRecord,
        cx: &mut TrimContext<'_>,
    ) {
        let Some(ptr) = self.context_of(call, record, cx.diag) else {
            return;
        };
        if call.arg(1).to_u32() != KEEP_BINDINGS {
            if let Some(ctx) = self.contexts.get_mut(&ptr) {
                ctx.bindings.clear(BindingKind::RenderTargets, record);
            }
            self.bind_objects(ptr, BindingKind::RenderTargets, Stage::Pixel, 0, call.arg(2), record, cx);
            let dsv = call.arg(3).to_pointer();
            self.bind_object(ptr, BindingKind::DepthStencilView, Stage::Pixel, 0, dsv, &[], record, cx);
        }
        if uavs && call.arg(5).to_u32() != KEEP_BINDINGS {
            let first = call.arg(4).to_u32();
            self.bind_objects(
                ptr,
                BindingKind::UnorderedAccessViews,
                Stage::Pixel,
                first,
                call.arg(6),
                record,
                cx,
            );
        }
    }

    fn get_render_targets(&mut self, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        if !cx.recording {
            return;
        }
        let Some(ctx) = self
            .context_of(call, record, cx.diag)
            .and_then(|ptr| self.contexts.get(&ptr))
        else {
            return;
        };
        let bound: Vec<NodeIdx> = ctx
            .bindings
            .of_kind(BindingKind::RenderTargets)
            .chain(ctx.bindings.of_kind(BindingKind::DepthStencilView))
            .map(|(_, _, binding)| binding.node)
            .collect();
        for node in bound {
            self.graph.emit_calls_to(node, cx.out);
        }
    }

    fn set_state(
        &mut self,
        state: StateKind,
        with_object: bool,
        call: &TraceCall,
        record: &CallRecord,
        cx: &mut TrimContext<'_>,
    ) {
        let Some(ptr) = self.context_of(call, record, cx.diag) else {
            return;
        };
        let object = if with_object {
            self.lookup(call.arg(1).to_pointer(), record, cx.diag)
        } else {
            None
        };
        if let Some(ctx) = self.contexts.get_mut(&ptr) {
            ctx.states.set(state, record, object);
        }
        self.record_object(object, cx);
    }

    fn finish_command_list(&mut self, call: &TraceCall, record: &CallRecord, diag: &mut Diagnostics) {
        let Some(ptr) = self.context_of(call, record, diag) else {
            return;
        };
        let ctx_node = self.contexts.get(&ptr).map(|ctx| ctx.node);
        let Some(list) = self.create(call, record, ctx_node, 2, ObjectKind::CommandList) else {
            return;
        };
        let Some(ctx) = self.contexts.get_mut(&ptr) else {
            return;
        };
        if !ctx.deferred {
            report(
                diag,
                DiagnosticKind::ProtocolViolation,
                record,
                "command list finished on an immediate context",
            );
        }
        let ops = std::mem::take(&mut ctx.ops);
        for op in &ops {
            self.graph.add_dependency(op.node(), list);
        }
        tracing::debug!(call = record.no(), ops = ops.len(), "finish command list");
        self.command_lists.insert(list, ops);
        self.mappings.clear_retained(ptr);
    }

    fn execute_command_list(&mut self, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        let Some(ptr) = self.context_of(call, record, cx.diag) else {
            return;
        };
        let Some(list) = self.lookup(call.arg(1).to_pointer(), record, cx.diag) else {
            return;
        };
        let ops = self.command_lists.get(&list).cloned().unwrap_or_default();
        let Some(ctx) = self.contexts.get_mut(&ptr) else {
            return;
        };
        if ctx.deferred {
            self.graph.add_call(ctx.node, record);
            self.graph.add_dependency(ctx.node, list);
            ctx.ops.extend(ops);
        } else {
            self.graph.add_call(list, record);
            for op in &ops {
                execute(op, &mut self.graph, &self.kinds, cx.recording, cx.out);
            }
        }
        self.record_object(Some(list), cx);
    }

    fn subresource_key(&self, call: &TraceCall) -> SubresourceKey {
        SubresourceKey {
            context: call.arg(0).to_pointer(),
            resource: call.arg(1).to_pointer(),
            subresource: call.arg(2).to_u32(),
        }
    }

    fn map(&mut self, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        let Some(ptr) = self.context_of(call, record, cx.diag) else {
            return;
        };
        let Some(resource) = self.lookup(call.arg(1).to_pointer(), record, cx.diag) else {
            return;
        };
        let Some(shape) = self.kinds.resource(resource) else {
            report(
                cx.diag,
                DiagnosticKind::UnexpectedArgument,
                record,
                "mapped object is not a resource",
            );
            return;
        };
        // D3D11_MAPPED_SUBRESOURCE: pData, RowPitch, DepthPitch.
        let mapped = desc(call, 5);
        let start = member(mapped, 0);
        let end = start.saturating_add(shape.mapped_size(member(mapped, 1), member(mapped, 2)));
        let discard = call.arg(3).to_sint() == MAP_WRITE_DISCARD;
        let key = self.subresource_key(call);

        self.record_object_init(resource, cx);
        self.mappings.map(record, key, start, end, discard, cx.diag);
        if !discard && self.contexts.get(&ptr).is_some_and(|ctx| ctx.deferred) {
            self.mappings.inherit_retained(key);
        }
    }

    fn unmap(&mut self, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        let Some(ptr) = self.context_of(call, record, cx.diag) else {
            return;
        };
        let key = self.subresource_key(call);
        let Some(mapping) = self.mappings.unmap(record, key, cx.diag) else {
            return;
        };
        let Some(resource) = self.lookup(key.resource, record, cx.diag) else {
            return;
        };
        let Some(ctx) = self.contexts.get(&ptr) else {
            return;
        };
        let (ctx_node, deferred) = (ctx.node, ctx.deferred);
        let node = self.fake_create(record, Some(ctx_node));
        // A later no-overwrite map in the same recording builds on this discard.
        if deferred && mapping.discard {
            self.mappings.retain(mapping.clone());
        }
        self.add_operation(
            ptr,
            Operation::Update {
                node,
                resource,
                mapping,
            },
            cx,
        );
    }

    fn resource_arg(
        &self,
        call: &TraceCall,
        arg: usize,
        record: &CallRecord,
        diag: &mut Diagnostics,
    ) -> Option<(NodeIdx, ResourceShape)> {
        let node = self.lookup(call.arg(arg).to_pointer(), record, diag)?;
        let shape = self.kinds.resource(node)?;
        Some((node, shape))
    }

    fn update_subresource(&mut self, call: &TraceCall, record: &CallRecord, diag: &mut Diagnostics) {
        let Some((resource, shape)) = self.resource_arg(call, 1, record, diag) else {
            return;
        };
        let dst_box = D3dBox::from_value(call.arg(3));
        let size = call.arg(4).blob_len().map(|n| n as u64);
        update_subresource(&mut self.graph, resource, shape, record, dst_box, size);
    }

    fn copy(
        &mut self,
        dst_arg: usize,
        src_arg: usize,
        whole: bool,
        call: &TraceCall,
        record: &CallRecord,
        diag: &mut Diagnostics,
    ) {
        let Some((dst, _)) = self.resource_arg(call, dst_arg, record, diag) else {
            return;
        };
        if whole {
            self.graph.clear_updates(dst);
        }
        self.graph.add_update_call(dst, record);
        if let Some(src) = self.lookup(call.arg(src_arg).to_pointer(), record, diag) {
            self.graph.add_update_dependency(dst, src);
        }
    }

    fn copy_structure_count(&mut self, call: &TraceCall, record: &CallRecord, diag: &mut Diagnostics) {
        let Some((dst, _)) = self.resource_arg(call, 1, record, diag) else {
            return;
        };
        let offset = call.arg(2).to_uint();
        self.graph.update_range(
            dst,
            std::slice::from_ref(record),
            offset,
            offset.saturating_add(4),
        );
        if let Some(view) = self.lookup(call.arg(3).to_pointer(), record, diag) {
            self.graph.add_update_dependency(dst, view);
        }
    }

    /// Write to the resource behind view argument 1; the view's creation travels with it.
    fn update_through_view(&mut self, clear: bool, call: &TraceCall, record: &CallRecord, diag: &mut Diagnostics) {
        let Some(view) = self.lookup(call.arg(1).to_pointer(), record, diag) else {
            return;
        };
        let Some(ObjectKind::View { resource, entire }) = self.kinds.get(view) else {
            report(
                diag,
                DiagnosticKind::UnexpectedArgument,
                record,
                "argument is not a view",
            );
            return;
        };
        if clear {
            if !entire {
                tracing::debug!(call = record.no(), "clear of a partial view drops all earlier writes");
            }
            self.graph.clear_updates(resource);
        }
        if let Some(init) = self.graph.node(view).init_call().cloned() {
            self.graph.add_call(resource, &init);
        }
        self.graph.add_update_call(resource, record);
    }

    fn query(&mut self, end: bool, call: &TraceCall, record: &CallRecord, cx: &mut TrimContext<'_>) {
        let Some(query) = self.lookup(call.arg(1).to_pointer(), record, cx.diag) else {
            return;
        };
        self.graph.add_call(query, record);
        self.record_object(Some(query), cx);
        if end {
            self.graph.clear_calls(query);
        }
    }
}

impl Default for D3d11FrontEnd {
    fn default() -> Self {
        Self::new()
    }
}

impl FrontEnd for D3d11FrontEnd {
    type Action = D3dAction;

    fn resolve(&self, name: &str, _call_no: u64, _diag: &mut Diagnostics) -> Option<D3dAction> {
        self.table.lookup(name)
    }

    fn apply(
        &mut self,
        action: D3dAction,
        call: &TraceCall,
        record: &CallRecord,
        cx: &mut TrimContext<'_>,
    ) -> TrimResult<()> {
        match action {
            D3dAction::CreateFactory => {
                if let Some(arg) = call.find_arg("ppFactory") {
                    self.create(call, record, None, arg, ObjectKind::Factory);
                }
            }
            D3dAction::CreateDevice {
                device_arg,
                swap_chain,
            } => self.create_device(device_arg, swap_chain, call, record, cx.diag),
            D3dAction::Memcpy => {
                let dest = call.arg(0).to_pointer();
                let len = call.arg(2).to_uint();
                self.mappings.record_write(record, dest, dest.saturating_add(len))?;
            }
            D3dAction::AddRef => {
                if let Some(this) = self.this(call, record, cx.diag) {
                    self.add_ref(this, record);
                }
            }
            D3dAction::Release => self.release(call, record, cx.diag),
            D3dAction::QueryInterface => self.query_interface(call, record, cx.diag),
            D3dAction::GetParent => self.get_parent(call, record, cx.diag),
            D3dAction::CreateSwapChain {
                desc_arg,
                out_arg,
                nested,
            } => {
                let factory = self.this(call, record, cx.diag);
                let device = self.lookup(call.arg(1).to_pointer(), record, cx.diag);
                self.create_swap_chain(call, record, factory, device, desc_arg, out_arg, nested);
            }
            D3dAction::EnumAdapters => {
                let factory = self.this(call, record, cx.diag);
                self.get_or_create(call, record, factory, "ppAdapter", ObjectKind::Adapter, cx.diag);
            }
            D3dAction::ResizeBuffers => self.resize_buffers(call, record, cx.diag),
            D3dAction::ResizeTarget => {
                if let Some(this) = self.this(call, record, cx.diag) {
                    self.graph.add_call(this, record);
                }
            }
            D3dAction::GetBuffer => self.swap_chain_buffer(call, record, cx.diag),
            D3dAction::Present => {
                let this = self.this(call, record, cx.diag);
                self.record_object(this, cx);
            }
            D3dAction::GetImmediateContext => {
                if let Some(device) = self.this(call, record, cx.diag) {
                    self.immediate_context(call, record, device, cx.diag);
                }
            }
            D3dAction::CreateDeferredContext => {
                let device = self.this(call, record, cx.diag);
                if let Some(node) = self.create(call, record, device, 2, ObjectKind::Context) {
                    let ptr = self.graph.node(node).id();
                    self.contexts.insert(ptr, D3dContext::new(node, true));
                }
            }
            D3dAction::CreateChild { out_arg, dep_arg } => {
                let device = self.this(call, record, cx.diag);
                let out_arg = usize::from(out_arg);
                match dep_arg {
                    Some(dep_arg) => {
                        self.create_with_dep(
                            call,
                            record,
                            device,
                            out_arg,
                            usize::from(dep_arg),
                            ObjectKind::Generic,
                            cx.diag,
                        );
                    }
                    None => {
                        self.create(call, record, device, out_arg, ObjectKind::Generic);
                    }
                }
            }
            D3dAction::CreateDepthStencilState => {
                self.create_depth_stencil_state(call, record, cx.diag);
            }
            D3dAction::CreateBuffer => self.create_resource(None, call, record, cx.diag),
            D3dAction::CreateTexture { dims } => {
                self.create_resource(Some(dims), call, record, cx.diag);
            }
            D3dAction::CreateView => self.create_view(call, record, cx.diag),
            D3dAction::FinishCommandList => self.finish_command_list(call, record, cx.diag),
            D3dAction::ExecuteCommandList => self.execute_command_list(call, record, cx),
            D3dAction::ClearState => {
                if let Some(ctx) = self
                    .context_of(call, record, cx.diag)
                    .and_then(|ptr| self.contexts.get_mut(&ptr))
                {
                    ctx.states.clear(record);
                    ctx.bindings.clear_all(record);
                }
            }
            D3dAction::BindSlot { kind, arg } => {
                if let Some(ptr) = self.context_of(call, record, cx.diag) {
                    let object = call.arg(usize::from(arg)).to_pointer();
                    self.bind_object(ptr, kind, Stage::Vertex, 0, object, &[], record, cx);
                }
            }
            D3dAction::BindSlots { kind, stage } => {
                if let Some(ptr) = self.context_of(call, record, cx.diag) {
                    let first = call.arg(1).to_u32();
                    self.bind_objects(ptr, kind, stage, first, call.arg(3), record, cx);
                }
            }
            D3dAction::SetObjects { kind, arg } => {
                if let Some(ptr) = self.context_of(call, record, cx.diag) {
                    if let Some(ctx) = self.contexts.get_mut(&ptr) {
                        ctx.bindings.clear(kind, record);
                    }
                    self.bind_objects(ptr, kind, Stage::Vertex, 0, call.arg(usize::from(arg)), record, cx);
                }
            }
            D3dAction::SetState(state) => self.set_state(state, false, call, record, cx),
            D3dAction::BindState(state) => self.set_state(state, true, call, record, cx),
            D3dAction::SetRenderTargets { uavs } => self.set_render_targets(uavs, call, record, cx),
            D3dAction::GetRenderTargets => self.get_render_targets(call, record, cx),
            D3dAction::SetShader(stage) => {
                if let Some(ptr) = self.context_of(call, record, cx.diag) {
                    let shader = call.arg(1).to_pointer();
                    let instances = pointers(call.arg(2));
                    self.bind_object(ptr, BindingKind::Shaders, stage, 0, shader, &instances, record, cx);
                }
            }
            D3dAction::ClearView => self.update_through_view(true, call, record, cx.diag),
            D3dAction::GenerateMips => self.update_through_view(false, call, record, cx.diag),
            D3dAction::Map => self.map(call, record, cx),
            D3dAction::Unmap => self.unmap(call, record, cx),
            D3dAction::UpdateSubresource => self.update_subresource(call, record, cx.diag),
            D3dAction::CopyResource => self.copy(1, 2, true, call, record, cx.diag),
            D3dAction::CopySubresourceRegion => self.copy(1, 6, false, call, record, cx.diag),
            D3dAction::CopyStructureCount => self.copy_structure_count(call, record, cx.diag),
            D3dAction::Begin => self.query(false, call, record, cx),
            D3dAction::End => self.query(true, call, record, cx),
            D3dAction::Draw { indirect } => self.command(indirect, false, call, record, cx),
            D3dAction::Dispatch { indirect } => self.command(indirect, true, call, record, cx),
        }
        Ok(())
    }

    fn emit_state(&mut self, out: &mut CallSet) {
        for ctx in self.contexts.values() {
            ctx.emit_state(&mut self.graph, out);
        }
    }

    fn skip_delete(&self, call: &TraceCall, _window: &FrameWindowState) -> bool {
        call.name.contains("::")
            && call.method_name() == "Release"
            && self.object(call.arg(0).to_pointer()).is_none()
    }

    fn switch_thread(&mut self, _thread_id: u32, _diag: &mut Diagnostics) {
        // Every context call names its context explicitly.
    }

    fn unbalanced_create_calls(&self, last_frame_start: u64, out: &mut BTreeSet<u64>) {
        self.objects
            .unbalanced_create_calls_in_last_frame(&self.graph, last_frame_start, out);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/d3d11/front_end.rs"]
mod tests;
