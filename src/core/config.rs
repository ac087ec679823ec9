//! Grammar configuration, loadable from RON.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::grammar::GrammarError;

/// Default recursion limit for a single flatten call.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Tunables for the expansion engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GrammarConfig {
    /// Maximum nesting of expansions before the engine stops descending.
    /// Cyclic grammars hit this instead of exhausting the stack.
    pub max_depth: usize,
    /// Keep `[name:rule]` blocks that sit outside any reference in the
    /// output text. When `false` they are evaluated and dropped.
    pub keep_binding_text: bool,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            keep_binding_text: true,
        }
    }
}

impl GrammarConfig {
    pub fn load_from_ron(path: &Path) -> Result<GrammarConfig, GrammarError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<GrammarConfig, GrammarError> {
        Ok(ron::from_str(input)?)
    }
}
