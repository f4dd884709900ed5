//! OpenGL front end.
//!
//! Calls are resolved by longest registered name prefix, so typed variants such as
//! `glUniform4fv` reach the `glUniform` handler. Objects live in per-kind registries whose
//! bindings follow the GL binding model: buffer targets with indexed slots, texture units,
//! query indices and separate draw/read framebuffers.

pub(crate) mod bindpoints;
pub(crate) mod calls;
pub(crate) mod enums;
pub(crate) mod front_end;
pub(crate) mod matrix;
pub(crate) mod objects;

pub use front_end::GlFrontEnd;
