use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Act {
    Uniform,
    Bind,
    BindRange,
}

fn table() -> PrefixTable<Act> {
    let mut t = PrefixTable::new();
    t.insert("glUniform", Act::Uniform);
    t.insert("glBindBuffer", Act::Bind);
    t.insert("glBindBufferRange", Act::BindRange);
    t.insert("glBindBuffer", Act::BindRange);
    t
}

#[test]
fn longest_prefix_wins_and_first_registration_sticks() {
    let t = table();
    assert_eq!(t.lookup("glBindBuffer"), Some(("glBindBuffer", Act::Bind)));
    assert_eq!(
        t.lookup("glBindBufferRange"),
        Some(("glBindBufferRange", Act::BindRange))
    );
    assert_eq!(t.lookup("glUniform4fv"), Some(("glUniform", Act::Uniform)));
    assert_eq!(t.lookup("glDraw"), None);
    assert_eq!(t.len(), 3);
}

#[test]
fn unknown_suffix_is_diagnosed_once() {
    let t = table();
    let mut diag = Diagnostics::new();
    assert_eq!(t.resolve("glUniform4fv", 1, &mut diag), Some(Act::Uniform));
    assert!(diag.is_empty());
    assert_eq!(t.resolve("glBindBuffersBase", 2, &mut diag), Some(Act::Bind));
    assert_eq!(t.resolve("glBindBuffersBase", 3, &mut diag), Some(Act::Bind));
    assert_eq!(diag.count(DiagnosticKind::ApproximatedName), 2);
}

#[test]
fn dispatcher_resolves_each_name_once() {
    let mut d = Dispatcher::new();
    let mut calls = 0;
    for _ in 0..3 {
        let hit = d.resolve_with("glFlush", |_| {
            calls += 1;
            None::<Act>
        });
        assert_eq!(hit, None);
    }
    assert_eq!(calls, 1);
    assert_eq!(d.len(), 1);
}
