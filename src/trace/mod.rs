//! Trace call model and the JSON-lines boundary.

pub(crate) mod call;
pub(crate) mod frames;
pub(crate) mod reader;
pub(crate) mod value;

#[cfg(test)]
#[path = "../../tests/unit/trace/mod.rs"]
mod tests;
