use super::*;
use crate::graph::node::ExtraKey;

fn rec(no: u64) -> CallRecord {
    CallRecord::new(no, format!("call{no}"))
}

fn ids(out: &CallSet) -> Vec<u64> {
    out.call_ids().collect()
}

#[test]
fn add_call_clears_emitted() {
    let mut g = DependencyGraph::new();
    let a = g.add_node(1);
    g.add_call(a, &rec(1));
    let mut out = CallSet::new();
    g.emit_calls_to(a, &mut out);
    assert!(g.node(a).emitted());
    g.add_call(a, &rec(2));
    assert!(!g.node(a).emitted());
}

#[test]
fn reflexive_dependency_is_ignored() {
    let mut g = DependencyGraph::new();
    let a = g.add_node(1);
    g.add_dependency(a, a);
    assert!(g.node(a).dependencies().is_empty());
}

#[test]
fn emission_is_idempotent() {
    let mut g = DependencyGraph::new();
    let a = g.add_node(1);
    let b = g.add_node(2);
    g.add_call(a, &rec(3));
    g.add_call(b, &rec(1));
    g.add_dependency(a, b);

    let mut once = CallSet::new();
    g.emit_calls_to(a, &mut once);
    let mut twice = CallSet::new();
    g.emit_calls_to(a, &mut twice);
    g.emit_calls_to(a, &mut twice);
    assert_eq!(ids(&once), vec![1, 3]);
    assert_eq!(ids(&once), ids(&twice));
}

#[test]
fn cycles_terminate() {
    let mut g = DependencyGraph::new();
    let a = g.add_node(1);
    let b = g.add_node(2);
    g.add_call(a, &rec(1));
    g.add_call(b, &rec(2));
    g.add_dependency(a, b);
    g.add_dependency(b, a);

    let mut out = CallSet::new();
    g.emit_calls_to(a, &mut out);
    assert_eq!(ids(&out), vec![1, 2]);
}

#[test]
fn emits_init_and_update_calls() {
    let mut g = DependencyGraph::new();
    let buf = g.add_node_with_init(1, &rec(0));
    let src = g.add_node_with_init(2, &rec(1));
    g.add_update_call(buf, &rec(4));
    g.add_update_dependency(buf, src);
    g.update_range(buf, &[rec(6)], 0, 16);

    let mut out = CallSet::new();
    g.emit_calls_to(buf, &mut out);
    assert_eq!(ids(&out), vec![0, 1, 4, 6]);

    g.clear_updates(buf);
    let mut out = CallSet::new();
    g.emit_calls_to(buf, &mut out);
    assert_eq!(ids(&out), vec![0]);
}

#[test]
fn init_calls_follow_dependencies_only() {
    let mut g = DependencyGraph::new();
    let dev = g.add_node_with_init(1, &rec(0));
    let tex = g.add_node_with_init(2, &rec(3));
    g.add_call(tex, &rec(5));
    g.add_dependency(tex, dev);

    let mut out = CallSet::new();
    g.emit_init_calls_to(tex, &mut out);
    assert_eq!(ids(&out), vec![0, 3]);
}

#[test]
fn unroll_copies_calls_and_stops_at_unrolled_commands() {
    let mut g = DependencyGraph::new();
    let tex = g.add_node_with_init(1, &rec(0));
    let first_draw = g.add_node_with_init(10, &rec(10));
    g.add_dependency(first_draw, tex);
    g.unroll(first_draw);
    assert!(g.node(first_draw).is_unrolled());
    assert!(g.node(first_draw).dependencies().is_empty());
    assert_eq!(
        g.node(first_draw).calls().iter().map(CallRecord::no).collect::<Vec<_>>(),
        vec![0]
    );

    // The texture is rendered by the first draw and sampled by the second one.
    g.add_update_dependency(tex, first_draw);
    let second_draw = g.add_node_with_init(20, &rec(20));
    g.add_dependency(second_draw, tex);
    g.unroll(second_draw);

    let deps: Vec<_> = g.node(second_draw).dependencies().iter().copied().collect();
    assert_eq!(deps, vec![first_draw]);

    let mut out = CallSet::new();
    g.emit_calls_to(second_draw, &mut out);
    assert_eq!(ids(&out), vec![0, 10, 20]);
}

#[test]
fn created_before_uses_first_call() {
    let mut g = DependencyGraph::new();
    let a = g.add_node(1);
    assert!(!g.created_before(a, 100));
    g.add_call(a, &rec(50));
    assert!(g.created_before(a, 51));
    assert!(!g.created_before(a, 50));
    g.node_mut(a).set_extra(ExtraKey::CreateCall, 50);
    assert_eq!(g.node(a).extra_info(ExtraKey::CreateCall), Some(50));
}
