use std::collections::{BTreeMap, HashMap};

use crate::foundation::diagnostics::{DiagnosticKind, Diagnostics};

/// Suffixes that distinguish typed variants of one GL entry point.
const COMMON_SUFFIXES: &[&str] = &[
    "ARB", "NV", "EXT", "OES", "SGI", "KHR", "i", "f", "d", "ui", "v", "fv", "iv", "dv", "uiv",
    "1f", "2f", "3f", "4f", "1i", "2i", "3i", "4i", "1d", "2d", "3d", "4d", "1ui", "2ui", "3ui",
    "4ui", "1fv", "2fv", "3fv", "4fv", "1iv", "2iv", "3iv", "4iv", "1dv", "2dv", "3dv", "4dv",
    "1uiv", "2uiv", "3uiv", "4uiv", "2fARB", "3fARB", "4fARB", "fvARB", "1fvARB", "2fvARB",
    "3fvARB", "4fvARB", "ivARB", "1ivARB", "2ivARB", "3ivARB", "4ivARB", "Matrix2fv",
    "Matrix3fv", "Matrix4fv", "Nubv",
];

/// True for a suffix that only selects a typed variant of a known entry point.
pub fn is_common_suffix(suffix: &str) -> bool {
    COMMON_SUFFIXES.contains(&suffix)
}

/// Call names mapped to actions, looked up by longest registered prefix.
#[derive(Debug, Clone)]
pub struct PrefixTable<A> {
    entries: BTreeMap<&'static str, A>,
}

impl<A: Copy> PrefixTable<A> {
    /// Empty table.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Register `name`. The first registration of a name wins.
    pub fn insert(&mut self, name: &'static str, action: A) {
        self.entries.entry(name).or_insert(action);
    }

    /// Register every name of `names` with the same action.
    pub fn insert_all(&mut self, names: &[&'static str], action: A) {
        for &name in names {
            self.insert(name, action);
        }
    }

    /// Longest registered prefix of `name` and its action.
    pub fn lookup(&self, name: &str) -> Option<(&'static str, A)> {
        (1..=name.len())
            .rev()
            .filter(|&len| name.is_char_boundary(len))
            .find_map(|len| self.entries.get_key_value(&name[..len]))
            .map(|(&k, &a)| (k, a))
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A: Copy> Default for PrefixTable<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Copy> PrefixTable<A> {
    /// Resolve `name`, diagnosing a prefix match whose remaining suffix is not a known
    /// typed-variant suffix.
    pub fn resolve(&self, name: &str, call_no: u64, diag: &mut Diagnostics) -> Option<A> {
        let (prefix, action) = self.lookup(name)?;
        let suffix = &name[prefix.len()..];
        if !suffix.is_empty() && !is_common_suffix(suffix) {
            diag.report(
                DiagnosticKind::ApproximatedName,
                name,
                call_no,
                format_args!("handle {name} as {prefix}"),
            );
        }
        Some(action)
    }
}

/// Per-name cache of resolved handlers, owned by one trimmer.
#[derive(Debug)]
pub struct Dispatcher<A> {
    cache: HashMap<String, Option<A>>,
}

impl<A: Copy> Dispatcher<A> {
    /// Empty cache.
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    /// Cached resolution of `name`, running `resolve` on the first sight of a name.
    pub fn resolve_with(&mut self, name: &str, resolve: impl FnOnce(&str) -> Option<A>) -> Option<A> {
        if let Some(&hit) = self.cache.get(name) {
            return hit;
        }
        let action = resolve(name);
        self.cache.insert(name.to_owned(), action);
        action
    }

    /// Number of distinct names seen.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// True before the first lookup.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl<A: Copy> Default for Dispatcher<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trimmer/dispatch.rs"]
mod tests;
