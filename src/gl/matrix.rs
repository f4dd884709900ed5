use crate::foundation::diagnostics::{DiagnosticKind, Diagnostics};
use crate::foundation::ids::NodeIdx;
use crate::gl::enums::{GL_COLOR, GL_MODELVIEW, GL_PROJECTION, GL_TEXTURE};
use crate::graph::arena::DependencyGraph;
use crate::graph::record::{CallRecord, CallSet};

#[derive(Debug, Clone)]
struct MatrixEntry {
    node: NodeIdx,
    // glMatrixMode call that selected this stack when the entry was current.
    select: Option<CallRecord>,
}

/// Legacy fixed-function matrix stacks (modelview, projection, texture, color).
///
/// Each stack entry is a graph node holding the calls that built its current value.
#[derive(Debug)]
pub(crate) struct MatrixStacks {
    stacks: [Vec<MatrixEntry>; 4],
    current: usize,
}

fn stack_index(mode: u32) -> Option<usize> {
    match mode {
        GL_MODELVIEW => Some(0),
        GL_PROJECTION => Some(1),
        GL_TEXTURE => Some(2),
        GL_COLOR => Some(3),
        _ => None,
    }
}

impl MatrixStacks {
    pub(crate) fn new(graph: &mut DependencyGraph) -> Self {
        let modelview = vec![MatrixEntry {
            node: graph.add_node(0),
            select: None,
        }];
        Self {
            stacks: [modelview, Vec::new(), Vec::new(), Vec::new()],
            current: 0,
        }
    }

    fn top(&self) -> Option<&MatrixEntry> {
        self.stacks[self.current].last()
    }

    pub(crate) fn mode(
        &mut self,
        graph: &mut DependencyGraph,
        diag: &mut Diagnostics,
        record: &CallRecord,
        mode: u32,
    ) {
        let Some(index) = stack_index(mode) else {
            diag.report(
                DiagnosticKind::UnexpectedArgument,
                record.name(),
                record.no(),
                format_args!("{}: unknown matrix mode {mode:#x}", record.name()),
            );
            return;
        };
        self.current = index;
        let stack = &mut self.stacks[index];
        if stack.is_empty() {
            stack.push(MatrixEntry {
                node: graph.add_node(0),
                select: None,
            });
        }
        if let Some(top) = stack.last_mut() {
            top.select = Some(record.clone());
            graph.add_call(top.node, record);
        }
    }

    /// `glLoadIdentity` / `glLoadMatrix`: the top no longer depends on earlier values.
    pub(crate) fn load(&mut self, graph: &mut DependencyGraph, record: &CallRecord) {
        let stack = &mut self.stacks[self.current];
        let len = stack.len();
        if len == 0 {
            return;
        }
        if stack[len - 1].select.is_none() && len > 1 {
            stack[len - 1].select = stack[len - 2].select.clone();
        }
        let top = &stack[len - 1];
        graph.clear_dependencies(top.node);
        graph.set_call(top.node, record);
        if let Some(select) = &top.select {
            graph.add_call(top.node, select);
        }
    }

    pub(crate) fn push(&mut self, graph: &mut DependencyGraph, record: &CallRecord) {
        let Some(parent) = self.top().map(|e| e.node) else {
            return;
        };
        let node = graph.add_node(0);
        graph.add_dependency(node, parent);
        graph.add_call(node, record);
        self.stacks[self.current].push(MatrixEntry { node, select: None });
    }

    pub(crate) fn pop(
        &mut self,
        graph: &mut DependencyGraph,
        diag: &mut Diagnostics,
        record: &CallRecord,
    ) {
        let stack = &mut self.stacks[self.current];
        let Some(top) = stack.last() else {
            return;
        };
        graph.add_call(top.node, record);
        if stack.len() == 1 {
            diag.report(
                DiagnosticKind::ProtocolViolation,
                record.name(),
                record.no(),
                format_args!("{}: matrix stack underflow", record.name()),
            );
            return;
        }
        stack.pop();
    }

    /// Multiply-style operation on the current top.
    pub(crate) fn apply(&mut self, graph: &mut DependencyGraph, record: &CallRecord) {
        if let Some(top) = self.top() {
            graph.add_call(top.node, record);
        }
    }

    pub(crate) fn emit_state(&self, graph: &mut DependencyGraph, out: &mut CallSet) {
        for stack in &self.stacks {
            if let Some(top) = stack.last() {
                graph.emit_calls_to(top.node, out);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gl/matrix.rs"]
mod tests;
