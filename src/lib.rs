//! frametrim cuts a recorded OpenGL or Direct3D11 call trace down to the calls that a chosen
//! set of frames depends on, so the result still replays those frames faithfully.
//!
//! The crate is organized around one driver and two API front ends:
//!
//! - Read a JSON-lines trace with [`read_trace`] or [`load_trace`]
//! - Pick frames with a [`TrimSelection`] and run [`trim_trace`]
//! - Write the kept calls back with [`write_calls`]
//!
//! For traces too large to hold in memory, [`open_trace`], [`trim_stream`] and
//! [`write_kept_calls`] do the same in two lazy passes over the file.
//!
//! Front ends ([`GlFrontEnd`], [`D3d11FrontEnd`]) turn API calls into a [`DependencyGraph`] of
//! objects and state. [`FrameTrimmer`] drives either one through the frame window and collects
//! the required calls.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod d3d11;
mod foundation;
mod gl;
mod graph;
mod mapping;
mod registry;
mod session;
mod trace;
mod trimmer;

pub use crate::foundation::diagnostics::{DiagnosticKind, Diagnostics};
pub use crate::foundation::error::{TrimError, TrimResult};
pub use crate::foundation::ids::{ContextId, NodeIdx};

pub use crate::graph::arena::DependencyGraph;
pub use crate::graph::node::{ExtraKey, GraphNode};
pub use crate::graph::record::{CallRecord, CallSet};
pub use crate::mapping::tracker::{BufferMappingTracker, MappingRecord, SubresourceKey};
pub use crate::mapping::update_list::{UpdateList, UpdateRange};
pub use crate::registry::object_map::ObjectRegistry;

pub use crate::trace::call::{Arg, CallFlags, TraceCall};
pub use crate::trace::frames::{FrameSet, FrameType};
pub use crate::trace::reader::{load_trace, open_trace, read_trace, write_calls, write_kept_calls};
pub use crate::trace::value::Value;

pub use crate::trimmer::dispatch::{Dispatcher, PrefixTable};
pub use crate::trimmer::frame_trimmer::{
    FrameTrimmer, FrameWindowState, FrontEnd, TrimContext, Trimmer,
};
pub use crate::trimmer::options::TrimOptions;

pub use crate::d3d11::D3d11FrontEnd;
pub use crate::gl::GlFrontEnd;
pub use crate::session::{
    FrameCallCount, FrameStats, TraceApi, TrimReport, TrimSelection, create_trimmer,
    frame_stats, trim_stream, trim_trace,
};
