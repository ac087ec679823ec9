//! Expansion context — call-scoped variable bindings and recursion tracking.

use rustc_hash::FxHashMap;

/// State threaded through one top-level flatten call.
///
/// Bindings live exactly as long as the call that created the context.
#[derive(Debug, Clone, Default)]
pub struct ExpansionContext {
    bindings: FxHashMap<String, String>,
    depth: usize,
    /// Set once any branch reached the depth limit.
    truncated: bool,
}

impl ExpansionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to an already flattened value, replacing any prior value.
    pub fn bind(&mut self, name: &str, value: String) {
        self.bindings.insert(name.to_lowercase(), value);
    }

    pub fn binding(&self, name: &str) -> Option<&str> {
        self.bindings.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn into_bindings(self) -> FxHashMap<String, String> {
        self.bindings
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Descend one level. Returns `false`, and marks the context truncated,
    /// when `max_depth` is already reached. Once truncated, every further
    /// descent is refused so the call unwinds without re-expanding.
    pub(crate) fn enter(&mut self, max_depth: usize) -> bool {
        if self.truncated || self.depth >= max_depth {
            self.truncated = true;
            return false;
        }
        self.depth += 1;
        true
    }

    pub(crate) fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn truncated(&self) -> bool {
        self.truncated
    }
}
