//! Whole-trace driver: frame selection, API detection and the trim report.

use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::d3d11::D3d11FrontEnd;
use crate::foundation::diagnostics::DiagnosticKind;
use crate::foundation::error::{TrimError, TrimResult};
use crate::gl::GlFrontEnd;
use crate::trace::call::TraceCall;
use crate::trace::frames::{FrameSet, FrameType};
use crate::trimmer::frame_trimmer::{FrameTrimmer, Trimmer};
use crate::trimmer::options::TrimOptions;

/// Graphics API a trace was recorded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceApi {
    /// OpenGL with its GLX, WGL, CGL and EGL window-system bindings.
    Gl,
    /// Direct3D11 and DXGI.
    D3D11,
}

const D3D11_GLOBALS: &[&str] = &[
    "D3D11CreateDevice",
    "D3D11CreateDeviceAndSwapChain",
    "CreateDXGIFactory",
    "CreateDXGIFactory1",
    "CreateDXGIFactory2",
];

impl TraceApi {
    /// Guess the API from the first call that names one.
    ///
    /// COM-style `Interface::Method` names and the D3D11/DXGI entry points select
    /// [`TraceApi::D3D11`]; `gl`, `egl`, `glX`, `wgl` and `CGL` prefixes select
    /// [`TraceApi::Gl`]. A trace with neither is treated as OpenGL.
    pub fn detect<'a>(calls: impl IntoIterator<Item = &'a TraceCall>) -> Self {
        calls
            .into_iter()
            .find_map(|call| Self::from_call_name(&call.name))
            .unwrap_or(Self::Gl)
    }

    /// [`TraceApi::detect`] over a lazily read trace; reading stops at the deciding call.
    pub fn detect_stream(
        calls: impl IntoIterator<Item = TrimResult<TraceCall>>,
    ) -> TrimResult<Self> {
        for call in calls {
            if let Some(api) = Self::from_call_name(&call?.name) {
                return Ok(api);
            }
        }
        Ok(Self::Gl)
    }

    fn from_call_name(name: &str) -> Option<Self> {
        if name.contains("::") || D3D11_GLOBALS.contains(&name) {
            return Some(Self::D3D11);
        }
        if ["gl", "egl", "wgl", "CGL"].iter().any(|p| name.starts_with(p)) {
            return Some(Self::Gl);
        }
        None
    }

    /// Name accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gl => "gl",
            Self::D3D11 => "d3d11",
        }
    }
}

impl fmt::Display for TraceApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraceApi {
    type Err = TrimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gl" | "opengl" | "egl" => Ok(Self::Gl),
            "d3d11" | "dx11" => Ok(Self::D3D11),
            other => Err(TrimError::unsupported(format!("graphics api '{other}'"))),
        }
    }
}

/// Build the trimmer for `api`.
pub fn create_trimmer(api: TraceApi, opts: TrimOptions) -> Box<dyn Trimmer> {
    match api {
        TraceApi::Gl => Box::new(FrameTrimmer::new(GlFrontEnd::new(&opts), opts)),
        TraceApi::D3D11 => Box::new(FrameTrimmer::new(D3d11FrontEnd::new(), opts)),
    }
}

/// Which frames a trim keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimSelection {
    /// Target frames; every call is kept.
    pub frames: FrameSet,
    /// Key frames kept without their end-of-frame call.
    pub setup_frames: Option<FrameSet>,
    /// Number of frames to list in [`TrimReport::frame_call_counts`], busiest first.
    pub top_calls_per_frame: usize,
}

impl TrimSelection {
    /// Keep `frames` and nothing else.
    pub fn new(frames: FrameSet) -> Self {
        Self {
            frames,
            setup_frames: None,
            top_calls_per_frame: 0,
        }
    }

    /// Add setup frames.
    pub fn with_setup_frames(mut self, setup_frames: FrameSet) -> Self {
        self.setup_frames = Some(setup_frames);
        self
    }

    /// Report the `n` busiest frames.
    pub fn with_top_calls_per_frame(mut self, n: usize) -> Self {
        self.top_calls_per_frame = n;
        self
    }

    /// Check that the selection can be trimmed to.
    pub fn validate(&self) -> TrimResult<()> {
        let Some(last) = self.frames.last() else {
            return Err(TrimError::config("no frame selected"));
        };
        if let Some(setup_last) = self.setup_frames.as_ref().and_then(FrameSet::last)
            && last < setup_last
        {
            return Err(TrimError::config(format!(
                "last frame to keep ({last}) must not be smaller than the last setup frame ({setup_last})"
            )));
        }
        Ok(())
    }

    /// Role of `frame`. Target frames win over setup frames.
    pub fn frame_type(&self, frame: u64) -> FrameType {
        if self.frames.contains(frame) {
            FrameType::Retain
        } else if self
            .setup_frames
            .as_ref()
            .is_some_and(|s| s.contains(frame))
        {
            FrameType::Setup
        } else {
            FrameType::None
        }
    }
}

/// Number of calls in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameCallCount {
    /// Frame number, starting at 0.
    pub frame: u64,
    /// Calls in the frame, its end-of-frame call included.
    pub calls: u64,
}

/// Per-frame call counts of a trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    /// Total calls.
    pub calls: u64,
    /// Counts in frame order. A trailing frame without end-of-frame call is included.
    pub frames: Vec<FrameCallCount>,
}

impl FrameStats {
    fn push_frame(&mut self, frame: u64, calls: u64) {
        self.frames.push(FrameCallCount { frame, calls });
        self.calls += calls;
    }

    /// The `n` frames with the most calls, busiest first; ties keep frame order.
    pub fn top(&self, n: usize) -> Vec<FrameCallCount> {
        let mut sorted = self.frames.clone();
        sorted.sort_by(|a, b| b.calls.cmp(&a.calls).then(a.frame.cmp(&b.frame)));
        sorted.truncate(n);
        sorted
    }

    /// Mean calls per frame, 0 for an empty trace.
    pub fn mean_calls(&self) -> f64 {
        if self.frames.is_empty() {
            0.0
        } else {
            self.calls as f64 / self.frames.len() as f64
        }
    }
}

/// Count calls per frame over a whole trace.
pub fn frame_stats<'a>(calls: impl IntoIterator<Item = &'a TraceCall>) -> FrameStats {
    let mut stats = FrameStats::default();
    let mut frame = 0u64;
    let mut in_frame = 0u64;
    for call in calls {
        in_frame += 1;
        if call.is_end_frame() {
            stats.push_frame(frame, in_frame);
            frame += 1;
            in_frame = 0;
        }
    }
    if in_frame > 0 {
        stats.push_frame(frame, in_frame);
    }
    stats
}

/// Outcome of [`trim_trace`].
#[derive(Debug, Clone, Serialize)]
pub struct TrimReport {
    /// API the trimmer ran for.
    pub api: TraceApi,
    /// Calls fed to the trimmer.
    pub calls_scanned: u64,
    /// Frames completed while scanning.
    pub frames_scanned: u64,
    /// Kept call numbers, ascending.
    pub call_ids: Vec<u64>,
    /// Create calls a looped replay of the last frame would repeat without a delete.
    pub skip_loop_calls: Vec<u64>,
    /// End-of-frame calls kept so a replay can finish skipped frames.
    pub swap_to_finish_calls: Vec<u64>,
    /// Busiest scanned frames, as many as the selection asked for.
    pub frame_call_counts: Vec<FrameCallCount>,
    /// Recoverable problems per kind.
    pub diagnostics: BTreeMap<DiagnosticKind, u64>,
}

impl TrimReport {
    /// Kept calls as a set, the form [`crate::write_calls`] takes.
    pub fn keep_set(&self) -> BTreeSet<u64> {
        self.call_ids.iter().copied().collect()
    }
}

/// Trim `calls` down to the selected frames and everything they depend on.
///
/// Scanning stops after the last selected frame. Calls must be in trace order.
pub fn trim_trace(
    calls: &[TraceCall],
    api: TraceApi,
    selection: &TrimSelection,
    opts: TrimOptions,
) -> TrimResult<TrimReport> {
    trim_stream(calls.iter().map(Ok::<&TraceCall, TrimError>), api, selection, opts)
}

/// [`trim_trace`] over a lazily read trace such as [`crate::open_trace`].
///
/// Calls after the last selected frame are never pulled from `calls`, so a large trace
/// is neither held in memory nor read past the frames it is trimmed to.
#[tracing::instrument(skip(calls, selection), fields(frames = %selection.frames))]
pub fn trim_stream<I, C>(
    calls: I,
    api: TraceApi,
    selection: &TrimSelection,
    opts: TrimOptions,
) -> TrimResult<TrimReport>
where
    I: IntoIterator<Item = TrimResult<C>>,
    C: Borrow<TraceCall>,
{
    selection.validate()?;
    let last_frame = selection
        .frames
        .last()
        .ok_or_else(|| TrimError::config("no frame selected"))?;

    let mut trimmer = create_trimmer(api, opts);
    let mut stats = FrameStats::default();
    let mut frame = 0u64;
    let mut in_frame = 0u64;
    let mut scanned = 0u64;
    let mut last_frame_started = false;

    for call in calls {
        if frame > last_frame {
            break;
        }
        let call = call?;
        let call: &TraceCall = call.borrow();
        let frame_type = selection.frame_type(frame);
        if frame_type == FrameType::Retain && frame == last_frame && !last_frame_started {
            last_frame_started = true;
            trimmer.start_last_frame(call.no);
        }

        trimmer.process_call(call, frame_type)?;
        scanned += 1;
        in_frame += 1;

        if call.is_end_frame() {
            tracing::trace!(frame, calls = in_frame, ?frame_type, "frame scanned");
            stats.push_frame(frame, in_frame);
            in_frame = 0;
            frame += 1;
        }
    }
    if !last_frame_started {
        tracing::warn!(
            last_frame,
            frames = frame,
            "trace ends before the last selected frame"
        );
    }

    trimmer.end_last_frame();

    let report = TrimReport {
        api,
        calls_scanned: scanned,
        frames_scanned: frame,
        call_ids: trimmer.sorted_call_ids(),
        skip_loop_calls: trimmer.skip_loop_calls().iter().copied().collect(),
        swap_to_finish_calls: trimmer.swap_to_finish_calls().iter().copied().collect(),
        frame_call_counts: stats.top(selection.top_calls_per_frame),
        diagnostics: trimmer.diagnostics().counts().clone(),
    };
    tracing::info!(
        kept = report.call_ids.len(),
        scanned = report.calls_scanned,
        diagnostics = trimmer.diagnostics().total(),
        "trim finished"
    );
    Ok(report)
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
