use std::collections::BTreeSet;
use std::fmt;

use crate::foundation::diagnostics::{DiagnosticKind, Diagnostics};
use crate::foundation::error::{TrimError, TrimResult};
use crate::graph::record::{CallRecord, CallSet};
use crate::trace::call::TraceCall;
use crate::trace::frames::FrameType;
use crate::trimmer::dispatch::Dispatcher;
use crate::trimmer::options::TrimOptions;

/// Process-wide recording state of one trim pass.
#[derive(Debug, Clone, Default)]
pub struct FrameWindowState {
    /// Calls of the selected frames are being kept.
    pub recording: bool,
    /// Number of the first call of the last selected frame (0 until known).
    pub last_frame_start_call: u64,
    /// End-of-frame call seen outside the kept frames and not yet placed.
    pub pending_frame_boundary_call: Option<CallRecord>,
}

/// What a handler may touch besides its own front end.
pub struct TrimContext<'a> {
    /// The required-call set.
    pub out: &'a mut CallSet,
    /// True inside the kept frames.
    pub recording: bool,
    /// Recoverable-problem sink.
    pub diag: &'a mut Diagnostics,
    /// Options of the pass.
    pub opts: &'a TrimOptions,
}

impl TrimContext<'_> {
    /// Keep `record` unconditionally.
    pub fn require(&mut self, record: &CallRecord) {
        self.out.insert(record);
    }
}

/// API-specific half of a trimmer: resolves call names and maintains the object graph.
pub trait FrontEnd {
    /// Resolved handler for one call name.
    type Action: Copy + fmt::Debug;

    /// Resolve `name` to a handler.
    fn resolve(&self, name: &str, call_no: u64, diag: &mut Diagnostics) -> Option<Self::Action>;

    /// Run the handler for `call`.
    fn apply(
        &mut self,
        action: Self::Action,
        call: &TraceCall,
        record: &CallRecord,
        cx: &mut TrimContext<'_>,
    ) -> TrimResult<()>;

    /// Emit everything a trace starting at the current call needs to establish state.
    fn emit_state(&mut self, out: &mut CallSet);

    /// True when `call` deletes only objects the trimmed trace never needs.
    fn skip_delete(&self, call: &TraceCall, window: &FrameWindowState) -> bool;

    /// The trace continues on another thread.
    fn switch_thread(&mut self, thread_id: u32, diag: &mut Diagnostics);

    /// Create calls of objects created inside the last-frame window and not released in it.
    fn unbalanced_create_calls(&self, last_frame_start: u64, out: &mut BTreeSet<u64>);
}

/// Object-safe control surface of a trimmer, independent of the graphics API.
pub trait Trimmer {
    /// Feed the next call of the trace.
    fn process_call(&mut self, call: &TraceCall, frame_type: FrameType) -> TrimResult<()>;

    /// Mark call `call_no` as the first call of the last kept frame.
    fn start_last_frame(&mut self, call_no: u64);

    /// Close the pass: run [`Trimmer::finalize`] and keep the pending frame boundary.
    fn end_last_frame(&mut self);

    /// Create calls inside the window starting at `last_frame_start` that a looped replay
    /// would repeat without a matching delete.
    fn finalize(&mut self, last_frame_start: u64) -> BTreeSet<u64>;

    /// Kept call numbers, ascending.
    fn sorted_call_ids(&self) -> Vec<u64>;

    /// Result of the last [`Trimmer::finalize`] run from [`Trimmer::end_last_frame`].
    fn skip_loop_calls(&self) -> &BTreeSet<u64>;

    /// End-of-frame calls kept to let a replay finish skipped frames.
    fn swap_to_finish_calls(&self) -> &BTreeSet<u64>;

    /// Recoverable problems met so far.
    fn diagnostics(&self) -> &Diagnostics;

    /// Recording state.
    fn window(&self) -> &FrameWindowState;
}

/// Frame-window state machine driving one [`FrontEnd`].
pub struct FrameTrimmer<F: FrontEnd> {
    front: F,
    opts: TrimOptions,
    window: FrameWindowState,
    dispatcher: Dispatcher<F::Action>,
    required: CallSet,
    diag: Diagnostics,
    current_thread: Option<u32>,
    last_call_no: Option<u64>,
    swap_calls: BTreeSet<u64>,
    skip_loop_calls: BTreeSet<u64>,
}

impl<F: FrontEnd> FrameTrimmer<F> {
    /// Trimmer around `front`.
    pub fn new(front: F, opts: TrimOptions) -> Self {
        Self {
            front,
            opts,
            window: FrameWindowState::default(),
            dispatcher: Dispatcher::new(),
            required: CallSet::new(),
            diag: Diagnostics::new(),
            current_thread: None,
            last_call_no: None,
            swap_calls: BTreeSet::new(),
            skip_loop_calls: BTreeSet::new(),
        }
    }

    /// The API front end.
    pub fn front_end(&self) -> &F {
        &self.front
    }

    /// The required-call set accumulated so far.
    pub fn required(&self) -> &CallSet {
        &self.required
    }

    fn dispatch(&mut self, call: &TraceCall, record: &CallRecord) -> TrimResult<()> {
        let front = &self.front;
        let diag = &mut self.diag;
        let action = self
            .dispatcher
            .resolve_with(&call.name, |name| front.resolve(name, call.no, diag));
        let Some(action) = action else {
            if !call.is_end_frame() {
                self.diag.report(
                    DiagnosticKind::UnhandledCall,
                    &call.name,
                    call.no,
                    format_args!("no handler for {}", call.name),
                );
            }
            return Ok(());
        };
        let mut cx = TrimContext {
            out: &mut self.required,
            recording: self.window.recording,
            diag: &mut self.diag,
            opts: &self.opts,
        };
        self.front.apply(action, call, record, &mut cx)
    }
}

impl<F: FrontEnd> Trimmer for FrameTrimmer<F> {
    #[tracing::instrument(level = "trace", skip(self, call), fields(no = call.no, name = %call.name))]
    fn process_call(&mut self, call: &TraceCall, frame_type: FrameType) -> TrimResult<()> {
        if let Some(prev) = self.last_call_no
            && call.no <= prev
        {
            return Err(TrimError::invalid_trace(format!(
                "call {} follows call {prev}",
                call.no
            )));
        }
        self.last_call_no = Some(call.no);

        let record = CallRecord::from_call(call);

        if !self.window.recording && frame_type != FrameType::None {
            tracing::debug!(call = call.no, "start recording");
            self.window.recording = true;
            self.front.emit_state(&mut self.required);
        } else if self.window.recording && frame_type == FrameType::None {
            tracing::debug!(call = call.no, "stop recording");
            self.window.recording = false;
        }

        if self.front.skip_delete(call, &self.window) {
            return Ok(());
        }

        if self.current_thread != Some(call.thread_id) {
            self.front.switch_thread(call.thread_id, &mut self.diag);
            self.current_thread = Some(call.thread_id);
        }

        self.dispatch(call, &record)?;

        match frame_type {
            FrameType::None => {
                if call.is_end_frame() {
                    if self.opts.swaps_to_finish
                        && let Some(last) = self.window.pending_frame_boundary_call.take()
                    {
                        self.required.insert(&record);
                        self.swap_calls.insert(last.no());
                    }
                    self.window.pending_frame_boundary_call = Some(record);
                }
            }
            FrameType::Retain | FrameType::Setup => {
                if !call.is_end_frame() {
                    self.required.insert(&record);
                } else if frame_type == FrameType::Retain {
                    self.required.insert(&record);
                    if let Some(last) = self.window.pending_frame_boundary_call.take() {
                        self.required.insert(&last);
                    }
                } else {
                    self.window.pending_frame_boundary_call = Some(record);
                }
            }
        }
        Ok(())
    }

    fn start_last_frame(&mut self, call_no: u64) {
        self.window.last_frame_start_call = call_no;
    }

    fn end_last_frame(&mut self) {
        self.skip_loop_calls = self.finalize(self.window.last_frame_start_call);
        if let Some(last) = self.window.pending_frame_boundary_call.take() {
            self.required.insert(&last);
        }
    }

    fn finalize(&mut self, last_frame_start: u64) -> BTreeSet<u64> {
        let mut out = BTreeSet::new();
        self.front
            .unbalanced_create_calls(last_frame_start, &mut out);
        out
    }

    fn sorted_call_ids(&self) -> Vec<u64> {
        self.required.call_ids().collect()
    }

    fn skip_loop_calls(&self) -> &BTreeSet<u64> {
        &self.skip_loop_calls
    }

    fn swap_to_finish_calls(&self) -> &BTreeSet<u64> {
        &self.swap_calls
    }

    fn diagnostics(&self) -> &Diagnostics {
        &self.diag
    }

    fn window(&self) -> &FrameWindowState {
        &self.window
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trimmer/frame_trimmer.rs"]
mod tests;
