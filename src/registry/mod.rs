//! Per-resource-kind object tables.

pub(crate) mod object_map;
