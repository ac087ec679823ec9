//! Grammar runtime — rule lookup, modifier chains, variable bindings, and expansion.

use std::path::Path;
use thiserror::Error;

use crate::core::config::GrammarConfig;
use crate::core::context::ExpansionContext;
use crate::core::modifiers::ModifierRegistry;
use crate::core::rules::RuleTable;
use crate::core::selector::Selector;
use crate::core::syntax::{Binding, Reference, Segment, Template, REFERENCE_DELIMITER};

#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("RON serialization error: {0}")]
    RonSerialize(#[from] ron::Error),
    #[error("expansion exceeded the recursion limit of {limit}")]
    RecursionLimit { limit: usize },
}

/// A set of rules plus the modifiers that may be applied to them.
///
/// ```
/// use narrative_grammar::core::grammar::Grammar;
/// use narrative_grammar::core::selector::FirstSelector;
///
/// let mut grammar = Grammar::new();
/// grammar.add_standard_modifiers();
/// grammar.add_rule("animal", ["owl", "fox"]);
/// assert_eq!(grammar.flatten("two #animal.s#", &mut FirstSelector), "two owls");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    rules: RuleTable,
    modifiers: ModifierRegistry,
    config: GrammarConfig,
}

impl Grammar {
    /// An empty grammar with no rules and no modifiers.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: RuleTable) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    /// Load rules from a RON file. No modifiers are registered.
    pub fn load_from_ron(path: &Path) -> Result<Grammar, GrammarError> {
        Ok(Self::from_rules(RuleTable::load_from_ron(path)?))
    }

    pub fn with_config(mut self, config: GrammarConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &GrammarConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GrammarConfig) {
        self.config = config;
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut RuleTable {
        &mut self.rules
    }

    pub fn modifiers(&self) -> &ModifierRegistry {
        &self.modifiers
    }

    pub fn modifiers_mut(&mut self) -> &mut ModifierRegistry {
        &mut self.modifiers
    }

    /// Add or replace a symbol's candidates.
    pub fn add_rule<I, S>(&mut self, name: &str, candidates: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.insert(name, candidates);
        self
    }

    pub fn remove_rule(&mut self, name: &str) -> Option<Vec<String>> {
        self.rules.remove(name)
    }

    /// Register a modifier usable as `#symbol.name#`.
    pub fn add_modifier<F>(&mut self, name: &str, modifier: F) -> &mut Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.modifiers.register(name, modifier);
        self
    }

    /// Register the English modifiers (`s`, `plural`, `capitalize`,
    /// `sentence`, `capitalizeAll`, `title`).
    pub fn add_standard_modifiers(&mut self) -> &mut Self {
        crate::core::english::register_all(&mut self.modifiers);
        self
    }

    /// Fully expand `rule`, choosing candidates with `selector`.
    ///
    /// Variable bindings made during the call are visible to everything
    /// expanded after them and are discarded when the call returns; the
    /// rule table is never modified.
    ///
    /// Malformed syntax and unknown names never fail: an unknown symbol
    /// expands to its own name, an unknown modifier is skipped, and an
    /// empty candidate list expands to nothing. If expansion nests deeper
    /// than [`GrammarConfig::max_depth`], the text at that point is left
    /// unexpanded. Use [`try_flatten`](Self::try_flatten) to detect that.
    pub fn flatten<S: Selector + ?Sized>(&self, rule: &str, selector: &mut S) -> String {
        let mut ctx = ExpansionContext::new();
        self.flatten_with_context(rule, selector, &mut ctx)
    }

    /// Like [`flatten`](Self::flatten), but reports hitting the depth limit
    /// as [`GrammarError::RecursionLimit`].
    pub fn try_flatten<S: Selector + ?Sized>(
        &self,
        rule: &str,
        selector: &mut S,
    ) -> Result<String, GrammarError> {
        let mut ctx = ExpansionContext::new();
        let output = self.flatten_with_context(rule, selector, &mut ctx);
        if ctx.truncated() {
            return Err(GrammarError::RecursionLimit {
                limit: self.config.max_depth,
            });
        }
        Ok(output)
    }

    /// Expand `rule` using a caller-owned context. Bindings already in
    /// `ctx` are visible to the expansion, and new ones remain in it
    /// afterwards.
    pub fn flatten_with_context<S: Selector + ?Sized>(
        &self,
        rule: &str,
        selector: &mut S,
        ctx: &mut ExpansionContext,
    ) -> String {
        let output = self.expand(rule, selector, ctx);
        if ctx.truncated() {
            tracing::warn!(
                limit = self.config.max_depth,
                rule,
                "expansion hit the recursion limit; output left partially unexpanded"
            );
        }
        output
    }

    /// Expand `rule`, then store every variable bound during the call as a
    /// single-candidate rule, replacing any rule of the same name.
    ///
    /// Stored names are lowercased.
    pub fn flatten_persistent<S: Selector + ?Sized>(
        &mut self,
        rule: &str,
        selector: &mut S,
    ) -> String {
        let mut ctx = ExpansionContext::new();
        let output = self.flatten_with_context(rule, selector, &mut ctx);
        for (name, value) in ctx.into_bindings() {
            tracing::debug!(name = %name, value = %value, "persisting binding as rule");
            self.rules.insert(&name, [value]);
        }
        output
    }

    fn expand<S: Selector + ?Sized>(
        &self,
        rule: &str,
        selector: &mut S,
        ctx: &mut ExpansionContext,
    ) -> String {
        if !ctx.enter(self.config.max_depth) {
            return rule.to_string();
        }

        let template = Template::parse(rule);
        let mut output = String::with_capacity(rule.len());

        for segment in &template.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Action { binding, raw } => {
                    self.apply_binding(binding, selector, ctx);
                    if self.config.keep_binding_text {
                        output.push_str(raw);
                    }
                }
                Segment::Reference(reference) => {
                    let text = self.expand_reference(reference, selector, ctx);
                    output.push_str(&text);
                }
            }
        }

        ctx.exit();
        output
    }

    fn expand_reference<S: Selector + ?Sized>(
        &self,
        reference: &Reference,
        selector: &mut S,
        ctx: &mut ExpansionContext,
    ) -> String {
        for binding in &reference.bindings {
            self.apply_binding(binding, selector, ctx);
        }

        let resolved = self.resolve_symbol(&reference.symbol, selector, ctx);
        let expanded = self.expand(&resolved, selector, ctx);

        let modified = reference
            .modifiers
            .iter()
            .fold(expanded, |text, name| self.modifiers.apply(name, text));

        // Modifier output may itself contain references.
        self.expand(&modified, selector, ctx)
    }

    /// Bound variable first, then the rule table, then the name itself.
    fn resolve_symbol<S: Selector + ?Sized>(
        &self,
        symbol: &str,
        selector: &mut S,
        ctx: &ExpansionContext,
    ) -> String {
        if let Some(value) = ctx.binding(symbol) {
            return value.to_string();
        }
        match self.rules.get(symbol) {
            Some(candidates) => selector.select(symbol, candidates),
            None => symbol.to_string(),
        }
    }

    fn apply_binding<S: Selector + ?Sized>(
        &self,
        binding: &Binding,
        selector: &mut S,
        ctx: &mut ExpansionContext,
    ) {
        match binding {
            Binding::Named { name, rule } => {
                let value = self.expand(rule, selector, ctx);
                tracing::trace!(name = %name, value = %value, "bound variable");
                ctx.bind(name, value);
            }
            Binding::Force { name } => {
                let forced = format!("{REFERENCE_DELIMITER}{name}{REFERENCE_DELIMITER}");
                self.expand(&forced, selector, ctx);
            }
        }
    }
}
