use super::*;

fn rec(no: u64, name: &str) -> CallRecord {
    CallRecord::new(no, name)
}

fn emitted(stacks: &MatrixStacks, graph: &mut DependencyGraph) -> Vec<u64> {
    let mut out = CallSet::new();
    stacks.emit_state(graph, &mut out);
    out.call_ids().collect()
}

#[test]
fn load_drops_earlier_operations_but_keeps_the_mode_select() {
    let mut graph = DependencyGraph::new();
    let mut diag = Diagnostics::new();
    let mut m = MatrixStacks::new(&mut graph);

    m.mode(&mut graph, &mut diag, &rec(0, "glMatrixMode"), GL_PROJECTION);
    m.apply(&mut graph, &rec(1, "glOrtho"));
    m.load(&mut graph, &rec(2, "glLoadIdentity"));
    m.apply(&mut graph, &rec(3, "glFrustum"));

    assert_eq!(emitted(&m, &mut graph), vec![0, 2, 3]);
    assert!(diag.is_empty());
}

#[test]
fn push_pop_restores_the_parent() {
    let mut graph = DependencyGraph::new();
    let mut diag = Diagnostics::new();
    let mut m = MatrixStacks::new(&mut graph);

    m.apply(&mut graph, &rec(0, "glTranslatef"));
    m.push(&mut graph, &rec(1, "glPushMatrix"));
    m.apply(&mut graph, &rec(2, "glRotatef"));
    // While pushed, the top depends on the parent.
    assert_eq!(emitted(&m, &mut graph), vec![0, 1, 2]);

    m.pop(&mut graph, &mut diag, &rec(3, "glPopMatrix"));
    assert_eq!(emitted(&m, &mut graph), vec![0]);
}

#[test]
fn pop_of_the_last_entry_is_diagnosed() {
    let mut graph = DependencyGraph::new();
    let mut diag = Diagnostics::new();
    let mut m = MatrixStacks::new(&mut graph);

    m.pop(&mut graph, &mut diag, &rec(0, "glPopMatrix"));
    assert_eq!(diag.count(DiagnosticKind::ProtocolViolation), 1);
    m.apply(&mut graph, &rec(1, "glScalef"));
    assert_eq!(emitted(&m, &mut graph), vec![0, 1]);
}

#[test]
fn unknown_mode_keeps_the_current_stack() {
    let mut graph = DependencyGraph::new();
    let mut diag = Diagnostics::new();
    let mut m = MatrixStacks::new(&mut graph);

    m.mode(&mut graph, &mut diag, &rec(0, "glMatrixMode"), 0x42);
    m.apply(&mut graph, &rec(1, "glScalef"));
    assert_eq!(diag.count(DiagnosticKind::UnexpectedArgument), 1);
    assert_eq!(emitted(&m, &mut graph), vec![1]);
}
