//! Narrative Grammar — recursive text expansion for procedural writing.
//!
//! A grammar maps symbols to candidate rule strings. Expanding a rule
//! substitutes every `#symbol#` reference with a chosen candidate,
//! applies `#symbol.modifier#` chains, and lets `[name:#rule#]` bindings
//! fix a choice so it can be reused for the rest of the expansion.

pub mod core;

pub use crate::core::config::GrammarConfig;
pub use crate::core::grammar::{Grammar, GrammarError};
pub use crate::core::rules::RuleTable;
pub use crate::core::selector::{
    CompositeSelector, FirstSelector, RandomSelector, Selector, SequentialSelector,
    ShuffleSelector,
};
