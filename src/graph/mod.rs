//! Call records and the dependency graph arena.

pub(crate) mod arena;
pub(crate) mod node;
pub(crate) mod record;
