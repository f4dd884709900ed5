//! Frame-window orchestration shared by every API front end.

pub(crate) mod dispatch;
pub(crate) mod frame_trimmer;
pub(crate) mod options;
