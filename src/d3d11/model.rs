use std::collections::HashMap;

use crate::foundation::ids::NodeIdx;
use crate::graph::arena::DependencyGraph;
use crate::graph::record::{CallRecord, CallSet};
use crate::mapping::tracker::MappingRecord;
use crate::trace::value::Value;

/// `D3D11_BIND_SHADER_RESOURCE`.
pub(crate) const BIND_SHADER_RESOURCE: u32 = 0x8;

/// `D3D11_MAP_WRITE_DISCARD`.
pub(crate) const MAP_WRITE_DISCARD: i64 = 4;

/// Memory layout of a resource, as far as mapping is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResourceShape {
    Buffer { size: u64 },
    Texture1D,
    Texture2D { height: u64, bind_flags: u32 },
    Texture3D { depth: u64 },
}

impl ResourceShape {
    /// Bytes covered by one mapping, given the pitches the runtime returned.
    pub(crate) fn mapped_size(self, row_pitch: u64, depth_pitch: u64) -> u64 {
        match self {
            Self::Buffer { size } => size,
            Self::Texture1D => row_pitch,
            Self::Texture2D { height, .. } => height.saturating_mul(row_pitch),
            Self::Texture3D { depth } => depth.saturating_mul(depth_pitch),
        }
    }

    pub(crate) fn has_bind_flag(self, flag: u32) -> bool {
        matches!(self, Self::Texture2D { bind_flags, .. } if bind_flags & flag != 0)
    }

    pub(crate) fn is_buffer(self) -> bool {
        matches!(self, Self::Buffer { .. })
    }
}

/// What a COM object node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ObjectKind {
    Generic,
    Factory,
    Adapter,
    DxgiDevice,
    SwapChain { width: u64, height: u64 },
    Device,
    Context,
    DepthStencilState { write: bool },
    Resource(ResourceShape),
    View { resource: NodeIdx, entire: bool },
    CommandList,
}

/// Kind of every COM object node.
#[derive(Debug, Default)]
pub(crate) struct ObjectKinds {
    kinds: HashMap<NodeIdx, ObjectKind>,
}

impl ObjectKinds {
    pub(crate) fn insert(&mut self, node: NodeIdx, kind: ObjectKind) {
        self.kinds.insert(node, kind);
    }

    pub(crate) fn get(&self, node: NodeIdx) -> Option<ObjectKind> {
        self.kinds.get(&node).copied()
    }

    pub(crate) fn get_mut(&mut self, node: NodeIdx) -> Option<&mut ObjectKind> {
        self.kinds.get_mut(&node)
    }

    pub(crate) fn resource(&self, node: NodeIdx) -> Option<ResourceShape> {
        match self.get(node)? {
            ObjectKind::Resource(shape) => Some(shape),
            _ => None,
        }
    }

    /// Resource a view looks at.
    pub(crate) fn view_resource(&self, node: NodeIdx) -> Option<NodeIdx> {
        match self.get(node)? {
            ObjectKind::View { resource, .. } => Some(resource),
            _ => None,
        }
    }

    pub(crate) fn depth_write(&self, node: NodeIdx) -> bool {
        matches!(
            self.get(node),
            Some(ObjectKind::DepthStencilState { write: true })
        )
    }
}

/// `D3D11_BOX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct D3dBox {
    pub(crate) left: u64,
    pub(crate) top: u64,
    pub(crate) front: u64,
    pub(crate) right: u64,
    pub(crate) bottom: u64,
    pub(crate) back: u64,
}

impl D3dBox {
    /// Box from a `const D3D11_BOX *` argument; `None` for a null pointer.
    pub(crate) fn from_value(value: &Value) -> Option<Self> {
        let m = value.first_element()?.as_struct()?;
        let at = |i: usize| m.get(i).map_or(0, Value::to_uint);
        Some(Self {
            left: at(0),
            top: at(1),
            front: at(2),
            right: at(3),
            bottom: at(4),
            back: at(5),
        })
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top || self.back <= self.front
    }
}

/// Work a context performs: immediately, or when its command list is executed.
#[derive(Debug, Clone)]
pub(crate) enum Operation {
    /// Writes gathered by one map/unmap pair.
    Update {
        node: NodeIdx,
        resource: NodeIdx,
        mapping: MappingRecord,
    },
    /// Draw or dispatch, with the views it writes.
    Command {
        node: NodeIdx,
        targets: Vec<NodeIdx>,
    },
}

impl Operation {
    pub(crate) fn node(&self) -> NodeIdx {
        match self {
            Self::Update { node, .. } | Self::Command { node, .. } => *node,
        }
    }
}

/// Attach the writes of a finished mapping to `resource`.
///
/// Buffers keep byte ranges; other resources keep the calls. A discard mapping drops
/// everything recorded before.
pub(crate) fn apply_mapping(
    graph: &mut DependencyGraph,
    resource: NodeIdx,
    shape: ResourceShape,
    mapping: &MappingRecord,
) {
    if mapping.discard {
        graph.clear_updates(resource);
    }
    if shape.is_buffer() {
        if mapping.has_writes() {
            graph.update_range(resource, &mapping.calls, mapping.range_min, mapping.range_max);
        }
    } else {
        for call in &mapping.calls {
            graph.add_update_call(resource, call);
        }
    }
}

/// Record a write through `UpdateSubresource`.
pub(crate) fn update_subresource(
    graph: &mut DependencyGraph,
    resource: NodeIdx,
    shape: ResourceShape,
    record: &CallRecord,
    dst_box: Option<D3dBox>,
    size: Option<u64>,
) {
    if dst_box.is_some_and(|b| b.is_empty()) {
        return;
    }
    match size {
        Some(size) if shape.is_buffer() && size > 0 => {
            let left = dst_box.map_or(0, |b| b.left);
            graph.update_range(
                resource,
                std::slice::from_ref(record),
                left,
                left.saturating_add(size),
            );
        }
        _ => graph.add_update_call(resource, record),
    }
}

/// Run `op`: apply resource writes, or unroll a command and make its targets depend on it.
pub(crate) fn execute(
    op: &Operation,
    graph: &mut DependencyGraph,
    kinds: &ObjectKinds,
    recording: bool,
    out: &mut CallSet,
) {
    match op {
        Operation::Update {
            node,
            resource,
            mapping,
        } => {
            let Some(shape) = kinds.resource(*resource) else {
                return;
            };
            apply_mapping(graph, *resource, shape, mapping);
            graph.add_update_dependency(*resource, *node);
        }
        Operation::Command { node, targets } => {
            graph.unroll(*node);
            for &view in targets {
                if let Some(resource) = kinds.view_resource(view) {
                    graph.add_update_dependency(resource, *node);
                }
            }
            if recording {
                graph.emit_calls_to(*node, out);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/d3d11/model.rs"]
mod tests;
