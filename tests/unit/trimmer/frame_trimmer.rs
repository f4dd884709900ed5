use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Act {
    State,
    Draw,
}

#[derive(Default)]
struct Probe {
    last_state: Option<CallRecord>,
    threads: Vec<u32>,
    applied: Vec<u64>,
}

impl FrontEnd for Probe {
    type Action = Act;

    fn resolve(&self, name: &str, _call_no: u64, _diag: &mut Diagnostics) -> Option<Act> {
        match name {
            "glEnable" => Some(Act::State),
            "glDraw" => Some(Act::Draw),
            _ => None,
        }
    }

    fn apply(
        &mut self,
        action: Act,
        _call: &TraceCall,
        record: &CallRecord,
        cx: &mut TrimContext<'_>,
    ) -> TrimResult<()> {
        self.applied.push(record.no());
        if action == Act::State {
            self.last_state = Some(record.clone());
        }
        if action == Act::Draw && cx.recording {
            cx.require(record);
        }
        Ok(())
    }

    fn emit_state(&mut self, out: &mut CallSet) {
        if let Some(s) = &self.last_state {
            out.insert(s);
        }
    }

    fn skip_delete(&self, call: &TraceCall, _window: &FrameWindowState) -> bool {
        call.name == "glDeleteUnused"
    }

    fn switch_thread(&mut self, thread_id: u32, _diag: &mut Diagnostics) {
        self.threads.push(thread_id);
    }

    fn unbalanced_create_calls(&self, last_frame_start: u64, out: &mut BTreeSet<u64>) {
        out.insert(last_frame_start);
    }
}

fn swap(no: u64) -> TraceCall {
    TraceCall::new(no, "glXSwapBuffers").ending_frame()
}

#[test]
fn recording_start_snapshots_state_and_keeps_retained_calls() {
    let mut t = FrameTrimmer::new(Probe::default(), TrimOptions::default());
    t.process_call(&TraceCall::new(0, "glEnable"), FrameType::None).unwrap();
    t.process_call(&TraceCall::new(1, "glEnable"), FrameType::None).unwrap();
    t.process_call(&swap(2), FrameType::None).unwrap();
    t.process_call(&TraceCall::new(3, "glDraw"), FrameType::Retain).unwrap();
    assert!(t.window().recording);
    t.process_call(&swap(4), FrameType::Retain).unwrap();
    t.process_call(&TraceCall::new(5, "glDraw"), FrameType::None).unwrap();
    assert!(!t.window().recording);
    t.end_last_frame();

    // The snapshot holds the last state call; the pending swap 2 goes with the kept swap.
    assert_eq!(t.sorted_call_ids(), vec![1, 2, 3, 4]);
}

#[test]
fn setup_frame_swap_is_deferred_until_the_end() {
    let mut t = FrameTrimmer::new(Probe::default(), TrimOptions::default());
    t.process_call(&TraceCall::new(0, "glDraw"), FrameType::Setup).unwrap();
    t.process_call(&swap(1), FrameType::Setup).unwrap();
    assert_eq!(t.sorted_call_ids(), vec![0]);
    t.end_last_frame();
    assert_eq!(t.sorted_call_ids(), vec![0, 1]);
}

#[test]
fn swaps_to_finish_keeps_intermediate_swaps() {
    let opts = TrimOptions {
        swaps_to_finish: true,
        ..TrimOptions::default()
    };
    let mut t = FrameTrimmer::new(Probe::default(), opts);
    t.process_call(&swap(0), FrameType::None).unwrap();
    t.process_call(&swap(1), FrameType::None).unwrap();
    t.process_call(&swap(2), FrameType::None).unwrap();
    assert_eq!(t.sorted_call_ids(), vec![1, 2]);
    assert_eq!(
        t.swap_to_finish_calls().iter().copied().collect::<Vec<_>>(),
        vec![0, 1]
    );
}

#[test]
fn skipped_deletes_never_reach_the_front_end() {
    let mut t = FrameTrimmer::new(Probe::default(), TrimOptions::default());
    t.process_call(&TraceCall::new(0, "glDeleteUnused"), FrameType::Retain)
        .unwrap();
    t.process_call(&TraceCall::new(1, "glDraw"), FrameType::Retain).unwrap();
    assert_eq!(t.sorted_call_ids(), vec![1]);
    assert_eq!(t.front_end().applied, vec![1]);
}

#[test]
fn unhandled_names_are_reported_once_and_threads_switch() {
    let mut t = FrameTrimmer::new(Probe::default(), TrimOptions::default());
    t.process_call(&TraceCall::new(0, "glFoo"), FrameType::None).unwrap();
    t.process_call(&TraceCall::new(1, "glFoo").on_thread(3), FrameType::None)
        .unwrap();
    t.process_call(&TraceCall::new(2, "glFoo").on_thread(3), FrameType::None)
        .unwrap();
    t.process_call(&swap(3), FrameType::None).unwrap();

    assert_eq!(t.diagnostics().count(DiagnosticKind::UnhandledCall), 3);
    assert_eq!(t.front_end().threads, vec![0, 3, 0]);
}

#[test]
fn call_numbers_must_increase() {
    let mut t = FrameTrimmer::new(Probe::default(), TrimOptions::default());
    t.process_call(&TraceCall::new(5, "glDraw"), FrameType::None).unwrap();
    let err = t
        .process_call(&TraceCall::new(5, "glDraw"), FrameType::None)
        .unwrap_err();
    assert!(matches!(err, TrimError::InvalidTrace(_)));
}

#[test]
fn end_last_frame_runs_finalize() {
    let mut t = FrameTrimmer::new(Probe::default(), TrimOptions::default());
    t.start_last_frame(42);
    t.end_last_frame();
    assert_eq!(
        t.skip_loop_calls().iter().copied().collect::<Vec<_>>(),
        vec![42]
    );
}
