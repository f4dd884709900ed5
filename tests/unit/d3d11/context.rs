use super::*;
use crate::d3d11::model::{ObjectKind, ResourceShape};

struct Fixture {
    graph: DependencyGraph,
    kinds: ObjectKinds,
    ctx: D3dContext,
}

impl Fixture {
    fn new() -> Self {
        let mut graph = DependencyGraph::new();
        let node = graph.add_node_with_init(0x100, &CallRecord::new(0, "GetImmediateContext"));
        Self {
            graph,
            kinds: ObjectKinds::default(),
            ctx: D3dContext::new(node, false),
        }
    }

    fn object(&mut self, no: u64, kind: ObjectKind) -> NodeIdx {
        let node = self
            .graph
            .add_node_with_init(0x1000 + no, &CallRecord::new(no, "Create"));
        self.kinds.insert(node, kind);
        node
    }

    fn texture(&mut self, no: u64, bind_flags: u32) -> NodeIdx {
        self.object(
            no,
            ObjectKind::Resource(ResourceShape::Texture2D {
                height: 4,
                bind_flags,
            }),
        )
    }

    fn view(&mut self, no: u64, resource: NodeIdx) -> NodeIdx {
        let view = self.object(
            no,
            ObjectKind::View {
                resource,
                entire: true,
            },
        );
        self.graph.add_dependency(view, resource);
        view
    }

    fn bind(&mut self, no: u64, kind: BindingKind, stage: Stage, slot: u32, object: Option<NodeIdx>) {
        let node = self
            .graph
            .add_node_with_init(no, &CallRecord::new(no, "Bind"));
        self.graph.add_dependency(node, self.ctx.node);
        if let Some(object) = object {
            self.graph.add_dependency(node, object);
        }
        self.ctx.bindings.set(kind, stage, slot, Binding { node, object });
    }

    fn command(&mut self, no: u64) -> NodeIdx {
        let node = self
            .graph
            .add_node_with_init(no, &CallRecord::new(no, "Draw"));
        self.graph.add_dependency(node, self.ctx.node);
        node
    }

    fn emitted(&mut self, node: NodeIdx) -> Vec<u64> {
        let mut out = CallSet::new();
        self.graph.emit_calls_to(node, &mut out);
        out.call_ids().collect()
    }
}

#[test]
fn draw_links_graphics_bindings_and_states_only() {
    let mut f = Fixture::new();
    let vs = f.object(1, ObjectKind::Generic);
    let cs = f.object(2, ObjectKind::Generic);
    f.bind(3, BindingKind::Shaders, Stage::Vertex, 0, Some(vs));
    f.bind(4, BindingKind::Shaders, Stage::Compute, 0, Some(cs));
    f.ctx
        .states
        .set(StateKind::Topology, &CallRecord::new(5, "IASetPrimitiveTopology"), None);
    let draw = f.command(6);

    let targets = f.ctx.link_draw(&mut f.graph, &f.kinds, draw);
    assert!(targets.is_empty());
    assert_eq!(f.emitted(draw), vec![0, 1, 3, 5, 6]);
}

#[test]
fn only_readable_render_targets_and_written_depth_are_targets() {
    let mut f = Fixture::new();
    let readable = f.texture(1, BIND_SHADER_RESOURCE);
    let plain = f.texture(2, 0);
    let depth = f.texture(3, 0);
    let rtv0 = f.view(4, readable);
    let rtv1 = f.view(5, plain);
    let dsv = f.view(6, depth);
    f.bind(7, BindingKind::RenderTargets, Stage::Pixel, 0, Some(rtv0));
    f.bind(7, BindingKind::RenderTargets, Stage::Pixel, 1, Some(rtv1));
    f.bind(7, BindingKind::DepthStencilView, Stage::Pixel, 0, Some(dsv));

    let draw = f.command(8);
    assert_eq!(f.ctx.link_draw(&mut f.graph, &f.kinds, draw), vec![rtv0]);

    let no_write = f.object(9, ObjectKind::DepthStencilState { write: false });
    f.ctx.states.set(
        StateKind::DepthStencil,
        &CallRecord::new(10, "OMSetDepthStencilState"),
        Some(no_write),
    );
    let draw = f.command(11);
    assert_eq!(f.ctx.link_draw(&mut f.graph, &f.kinds, draw), vec![rtv0]);

    let write = f.object(12, ObjectKind::DepthStencilState { write: true });
    f.ctx.states.set(
        StateKind::DepthStencil,
        &CallRecord::new(13, "OMSetDepthStencilState"),
        Some(write),
    );
    assert_eq!(f.ctx.states.depth_stencil_state(), Some(write));
    let draw = f.command(14);
    assert_eq!(f.ctx.link_draw(&mut f.graph, &f.kinds, draw), vec![rtv0, dsv]);
    assert!(f.emitted(draw).contains(&13));
}

#[test]
fn stream_out_targets_depend_on_the_draw() {
    let mut f = Fixture::new();
    let buffer = f.object(1, ObjectKind::Resource(ResourceShape::Buffer { size: 64 }));
    f.bind(2, BindingKind::StreamOutTargets, Stage::Vertex, 0, Some(buffer));
    let draw = f.command(3);
    f.ctx.link_draw(&mut f.graph, &f.kinds, draw);

    let (_, _, so) = f
        .ctx
        .bindings
        .of_kind(BindingKind::StreamOutTargets)
        .next()
        .unwrap();
    assert!(f.graph.node(so.node).dependencies().contains(&draw));
}

#[test]
fn dispatch_links_compute_bindings_and_returns_uavs() {
    let mut f = Fixture::new();
    let buffer = f.object(1, ObjectKind::Resource(ResourceShape::Buffer { size: 64 }));
    let uav = f.view(2, buffer);
    let cs = f.object(3, ObjectKind::Generic);
    let vs = f.object(4, ObjectKind::Generic);
    f.bind(5, BindingKind::Shaders, Stage::Compute, 0, Some(cs));
    f.bind(6, BindingKind::Shaders, Stage::Vertex, 0, Some(vs));
    f.bind(7, BindingKind::UnorderedAccessViews, Stage::Compute, 0, Some(uav));
    let dispatch = f.command(8);

    assert_eq!(f.ctx.link_dispatch(&mut f.graph, dispatch), vec![uav]);
    assert_eq!(f.emitted(dispatch), vec![0, 1, 2, 3, 5, 7, 8]);
}

#[test]
fn clear_state_calls_travel_with_later_draws() {
    let mut f = Fixture::new();
    let vs = f.object(1, ObjectKind::Generic);
    f.bind(2, BindingKind::Shaders, Stage::Vertex, 0, Some(vs));
    let clear = CallRecord::new(3, "ClearState");
    f.ctx.states.clear(&clear);
    f.ctx.bindings.clear_all(&clear);
    assert_eq!(f.ctx.states.depth_stencil_state(), None);
    assert_eq!(f.ctx.bindings.of_kind(BindingKind::Shaders).count(), 0);
    assert!(f.ctx.bindings.clear_call(BindingKind::StreamOutTargets).is_some());

    let draw = f.command(4);
    f.ctx.link_draw(&mut f.graph, &f.kinds, draw);
    assert_eq!(f.emitted(draw), vec![0, 3, 4]);
}

#[test]
fn snapshot_emits_context_states_and_bindings() {
    let mut f = Fixture::new();
    let blend = f.object(1, ObjectKind::Generic);
    f.ctx
        .states
        .set(StateKind::Blend, &CallRecord::new(2, "OMSetBlendState"), Some(blend));
    let sampler = f.object(3, ObjectKind::Generic);
    f.bind(4, BindingKind::Samplers, Stage::Pixel, 0, Some(sampler));
    f.ctx
        .bindings
        .clear(BindingKind::RenderTargets, &CallRecord::new(5, "OMSetRenderTargets"));

    let mut out = CallSet::new();
    f.ctx.emit_state(&mut f.graph, &mut out);
    assert_eq!(out.call_ids().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5]);
}
