//! Memory-write tracking for mapped buffers.

pub(crate) mod tracker;
pub(crate) mod update_list;
