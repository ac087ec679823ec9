pub mod config;
pub mod context;
pub mod english;
pub mod grammar;
pub mod lint;
pub mod modifiers;
pub mod rules;
pub mod selector;
pub mod syntax;
