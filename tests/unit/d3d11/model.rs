use super::*;
use crate::mapping::tracker::SubresourceKey;

fn mapping(calls: std::ops::RangeInclusive<u64>, discard: bool, min: u64, max: u64) -> MappingRecord {
    MappingRecord {
        key: SubresourceKey {
            context: 1,
            resource: 2,
            subresource: 0,
        },
        start: 0x1000,
        end: 0x2000,
        discard,
        calls: calls.map(|no| CallRecord::new(no, "memcpy")).collect(),
        range_min: min,
        range_max: max,
    }
}

fn emitted(graph: &mut DependencyGraph, node: NodeIdx) -> Vec<u64> {
    let mut out = CallSet::new();
    graph.emit_calls_to(node, &mut out);
    out.call_ids().collect()
}

#[test]
fn mapped_size_follows_the_resource_shape() {
    assert_eq!(ResourceShape::Buffer { size: 64 }.mapped_size(0, 0), 64);
    assert_eq!(ResourceShape::Texture1D.mapped_size(256, 0), 256);
    let tex = ResourceShape::Texture2D {
        height: 4,
        bind_flags: BIND_SHADER_RESOURCE,
    };
    assert_eq!(tex.mapped_size(256, 1024), 1024);
    assert!(tex.has_bind_flag(BIND_SHADER_RESOURCE));
    assert_eq!(ResourceShape::Texture3D { depth: 2 }.mapped_size(256, 1024), 2048);
    assert!(!ResourceShape::Texture1D.has_bind_flag(BIND_SHADER_RESOURCE));
}

#[test]
fn box_is_read_from_a_struct_pointer() {
    let value = Value::Array(vec![Value::Struct(
        [4u64, 0, 0, 8, 1, 1].into_iter().map(Value::UInt).collect(),
    )]);
    let b = D3dBox::from_value(&value).unwrap();
    assert_eq!((b.left, b.right), (4, 8));
    assert!(!b.is_empty());
    assert_eq!(D3dBox::from_value(&Value::Null), None);

    let flat = Value::Array(vec![Value::Struct(vec![Value::UInt(3); 6])]);
    assert!(D3dBox::from_value(&flat).unwrap().is_empty());
}

#[test]
fn buffer_mappings_keep_the_latest_writer_per_range() {
    let mut graph = DependencyGraph::new();
    let buffer = graph.add_node_with_init(2, &CallRecord::new(0, "CreateBuffer"));
    let shape = ResourceShape::Buffer { size: 16 };

    apply_mapping(&mut graph, buffer, shape, &mapping(1..=3, false, 0, 16));
    apply_mapping(&mut graph, buffer, shape, &mapping(4..=6, false, 0, 16));
    assert_eq!(emitted(&mut graph, buffer), vec![0, 4, 5, 6]);

    // Without writes a plain mapping leaves the buffer as it was.
    apply_mapping(&mut graph, buffer, shape, &mapping(7..=8, false, u64::MAX, 0));
    assert_eq!(emitted(&mut graph, buffer), vec![0, 4, 5, 6]);
}

#[test]
fn texture_mappings_accumulate_until_discarded() {
    let mut graph = DependencyGraph::new();
    let tex = graph.add_node_with_init(2, &CallRecord::new(0, "CreateTexture2D"));
    let shape = ResourceShape::Texture2D {
        height: 4,
        bind_flags: 0,
    };

    apply_mapping(&mut graph, tex, shape, &mapping(1..=3, false, 0, 16));
    apply_mapping(&mut graph, tex, shape, &mapping(4..=6, false, 0, 16));
    assert_eq!(emitted(&mut graph, tex), vec![0, 1, 2, 3, 4, 5, 6]);

    apply_mapping(&mut graph, tex, shape, &mapping(7..=9, true, 0, 16));
    assert_eq!(emitted(&mut graph, tex), vec![0, 7, 8, 9]);
}

#[test]
fn update_subresource_splits_buffer_ranges() {
    let mut graph = DependencyGraph::new();
    let buffer = graph.add_node_with_init(2, &CallRecord::new(0, "CreateBuffer"));
    let shape = ResourceShape::Buffer { size: 8 };
    let inner = D3dBox {
        left: 4,
        top: 0,
        front: 0,
        right: 8,
        bottom: 1,
        back: 1,
    };

    update_subresource(&mut graph, buffer, shape, &CallRecord::new(1, "UpdateSubresource"), None, Some(8));
    update_subresource(
        &mut graph,
        buffer,
        shape,
        &CallRecord::new(2, "UpdateSubresource"),
        Some(inner),
        Some(4),
    );
    let updates = graph.node(buffer).updates.as_ref().unwrap();
    assert_eq!(updates.ranges.len(), 2);
    assert_eq!(emitted(&mut graph, buffer), vec![0, 1, 2]);

    let empty = D3dBox { right: 4, ..inner };
    update_subresource(
        &mut graph,
        buffer,
        shape,
        &CallRecord::new(3, "UpdateSubresource"),
        Some(empty),
        Some(4),
    );
    assert_eq!(emitted(&mut graph, buffer), vec![0, 1, 2]);
}

#[test]
fn update_near_the_end_of_the_address_space_saturates() {
    let mut graph = DependencyGraph::new();
    let buffer = graph.add_node_with_init(2, &CallRecord::new(0, "CreateBuffer"));
    let far = D3dBox {
        left: u64::MAX - 2,
        top: 0,
        front: 0,
        right: u64::MAX,
        bottom: 1,
        back: 1,
    };
    update_subresource(
        &mut graph,
        buffer,
        ResourceShape::Buffer { size: 16 },
        &CallRecord::new(1, "UpdateSubresource"),
        Some(far),
        Some(16),
    );
    let updates = graph.node(buffer).updates.as_ref().unwrap();
    assert_eq!(updates.ranges.records()[0].end, u64::MAX);
    assert_eq!(emitted(&mut graph, buffer), vec![0, 1]);
}

#[test]
fn executed_command_becomes_a_write_of_its_targets() {
    let mut graph = DependencyGraph::new();
    let mut kinds = ObjectKinds::default();
    let tex = graph.add_node_with_init(10, &CallRecord::new(0, "CreateTexture2D"));
    let view = graph.add_node_with_init(11, &CallRecord::new(1, "CreateRenderTargetView"));
    graph.add_dependency(view, tex);
    kinds.insert(
        tex,
        ObjectKind::Resource(ResourceShape::Texture2D {
            height: 4,
            bind_flags: BIND_SHADER_RESOURCE,
        }),
    );
    kinds.insert(
        view,
        ObjectKind::View {
            resource: tex,
            entire: true,
        },
    );
    let draw = graph.add_node_with_init(2, &CallRecord::new(2, "Draw"));
    graph.add_dependency(draw, view);

    let op = Operation::Command {
        node: draw,
        targets: vec![view],
    };
    assert_eq!(op.node(), draw);
    let mut out = CallSet::new();
    execute(&op, &mut graph, &kinds, true, &mut out);

    assert!(graph.node(draw).is_unrolled());
    assert_eq!(out.call_ids().collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(emitted(&mut graph, tex), vec![0, 1, 2]);
}
