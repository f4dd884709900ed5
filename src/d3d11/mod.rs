//! Direct3D11 and DXGI front end.
//!
//! Calls arrive as `Interface::Method` strings and are resolved through a table of
//! interfaces flattened with their parents' methods. Draws and dispatches become command
//! nodes linked to the context's states and bindings; deferred contexts queue their
//! operations until a command list is executed.

pub(crate) mod context;
pub(crate) mod front_end;
pub(crate) mod interfaces;
pub(crate) mod model;

pub use front_end::D3d11FrontEnd;
