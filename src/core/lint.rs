//! Static checks over a grammar: undefined symbols, unknown modifiers,
//! empty rules, and rules whose expansion can never finish.

use rustc_hash::FxHashSet;
use std::fmt;

use crate::core::grammar::Grammar;
use crate::core::syntax::{Binding, Template};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintIssue {
    /// A reference names neither a rule nor any variable bound in the grammar.
    /// It will expand to its own name.
    UndefinedSymbol { rule: String, symbol: String },
    /// A reference uses a modifier that is not registered.
    UnknownModifier { rule: String, modifier: String },
    /// A rule has no candidates and always expands to the empty string.
    EmptyRule { rule: String },
    /// Every candidate of this rule leads back into a cycle, so expansion
    /// only stops at the recursion limit.
    NonTerminating { rule: String },
}

impl LintIssue {
    pub fn severity(&self) -> Severity {
        match self {
            LintIssue::NonTerminating { .. } => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintIssue::UndefinedSymbol { rule, symbol } => {
                write!(f, "rule '{}' references undefined symbol '{}'", rule, symbol)
            }
            LintIssue::UnknownModifier { rule, modifier } => {
                write!(f, "rule '{}' uses unknown modifier '{}'", rule, modifier)
            }
            LintIssue::EmptyRule { rule } => write!(f, "rule '{}' has no candidates", rule),
            LintIssue::NonTerminating { rule } => {
                write!(f, "rule '{}' can never finish expanding", rule)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LintReport {
    pub issues: Vec<LintIssue>,
}

impl LintReport {
    pub fn errors(&self) -> impl Iterator<Item = &LintIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &LintIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// A symbol or modifier use found in a rule string, including inside
/// binding rules.
struct Usage {
    symbols: Vec<String>,
    modifiers: Vec<String>,
    bound: Vec<String>,
}

fn collect_usage(rule: &str) -> Usage {
    let mut usage = Usage {
        symbols: Vec::new(),
        modifiers: Vec::new(),
        bound: Vec::new(),
    };
    collect_into(rule, &mut usage);
    usage
}

fn collect_into(rule: &str, usage: &mut Usage) {
    let template = Template::parse(rule);
    for binding in template.bindings() {
        match binding {
            Binding::Named { name, rule } => {
                usage.bound.push(name.to_lowercase());
                collect_into(rule, usage);
            }
            Binding::Force { name } => collect_into(&format!("#{}#", name), usage),
        }
    }
    for reference in template.references() {
        usage.symbols.push(reference.symbol.clone());
        usage.modifiers.extend(reference.modifiers.iter().cloned());
    }
}

/// Run every check over `grammar`. Issues are ordered by rule name.
pub fn lint(grammar: &Grammar) -> LintReport {
    let rules = grammar.rules();
    let modifiers = grammar.modifiers();

    let mut names: Vec<&str> = rules.names().collect();
    names.sort_by_key(|name| name.to_lowercase());

    let usages: Vec<(&str, Vec<Usage>)> = names
        .iter()
        .map(|&name| {
            let candidates = rules.get(name).unwrap_or_default();
            (name, candidates.iter().map(|c| collect_usage(c)).collect())
        })
        .collect();

    let bound: FxHashSet<&str> = usages
        .iter()
        .flat_map(|(_, per_candidate)| per_candidate.iter())
        .flat_map(|usage| usage.bound.iter().map(String::as_str))
        .collect();

    let terminating = terminating_rules(grammar, &usages);
    let mut issues = Vec::new();

    for (name, per_candidate) in &usages {
        if per_candidate.is_empty() {
            issues.push(LintIssue::EmptyRule {
                rule: name.to_string(),
            });
        }

        let mut reported_symbols = FxHashSet::default();
        let mut reported_modifiers = FxHashSet::default();
        for usage in per_candidate {
            for symbol in &usage.symbols {
                let key = symbol.to_lowercase();
                if !rules.contains(symbol)
                    && !bound.contains(key.as_str())
                    && reported_symbols.insert(key)
                {
                    issues.push(LintIssue::UndefinedSymbol {
                        rule: name.to_string(),
                        symbol: symbol.clone(),
                    });
                }
            }
            for modifier in &usage.modifiers {
                if !modifiers.contains(modifier) && reported_modifiers.insert(modifier.to_lowercase())
                {
                    issues.push(LintIssue::UnknownModifier {
                        rule: name.to_string(),
                        modifier: modifier.clone(),
                    });
                }
            }
        }

        if !terminating.contains(&name.to_lowercase()) {
            issues.push(LintIssue::NonTerminating {
                rule: name.to_string(),
            });
        }
    }

    LintReport { issues }
}

/// Rules with at least one candidate whose references all finish.
/// Empty rules finish immediately.
fn terminating_rules(grammar: &Grammar, usages: &[(&str, Vec<Usage>)]) -> FxHashSet<String> {
    let rules = grammar.rules();
    let mut terminating: FxHashSet<String> = FxHashSet::default();

    loop {
        let mut changed = false;
        for (name, per_candidate) in usages {
            let key = name.to_lowercase();
            if terminating.contains(&key) {
                continue;
            }
            let finishes = per_candidate.is_empty()
                || per_candidate.iter().any(|usage| {
                    usage.symbols.iter().all(|symbol| {
                        !rules.contains(symbol) || terminating.contains(&symbol.to_lowercase())
                    })
                });
            if finishes {
                terminating.insert(key);
                changed = true;
            }
        }
        if !changed {
            return terminating;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_grammar_has_no_issues() {
        let mut grammar = Grammar::new();
        grammar.add_standard_modifiers();
        grammar.add_rule("origin", ["#[hero:#name#]story#"]);
        grammar.add_rule("story", ["#hero.capitalize# saw #animal.s#."]);
        grammar.add_rule("name", ["anna"]);
        grammar.add_rule("animal", ["owl"]);
        let report = lint(&grammar);
        assert!(report.is_clean(), "{:?}", report.issues);
    }

    #[test]
    fn reports_undefined_symbol_once_per_rule() {
        let mut grammar = Grammar::new();
        grammar.add_rule("origin", ["#missing# and #MISSING#", "#missing#"]);
        let report = lint(&grammar);
        assert_eq!(
            report.issues,
            vec![LintIssue::UndefinedSymbol {
                rule: "origin".to_string(),
                symbol: "missing".to_string(),
            }]
        );
        assert!(!report.has_errors());
    }

    #[test]
    fn reports_unknown_modifier_and_empty_rule() {
        let mut grammar = Grammar::new();
        grammar.add_rule("origin", ["#thing.sparkle#"]);
        grammar.add_rule("thing", Vec::<String>::new());
        let report = lint(&grammar);
        assert_eq!(report.warnings().count(), 2);
        assert!(report.issues.contains(&LintIssue::UnknownModifier {
            rule: "origin".to_string(),
            modifier: "sparkle".to_string(),
        }));
        assert!(report.issues.contains(&LintIssue::EmptyRule {
            rule: "thing".to_string(),
        }));
    }

    #[test]
    fn unavoidable_cycle_is_an_error() {
        let mut grammar = Grammar::new();
        grammar.add_rule("a", ["#b#"]);
        grammar.add_rule("b", ["#a#!"]);
        grammar.add_rule("c", ["#a#", "done"]);
        let report = lint(&grammar);
        let errors: Vec<String> = report.errors().map(|e| e.to_string()).collect();
        assert_eq!(
            errors,
            vec![
                "rule 'a' can never finish expanding".to_string(),
                "rule 'b' can never finish expanding".to_string(),
            ]
        );
    }

    #[test]
    fn recursion_with_exit_is_fine() {
        let mut grammar = Grammar::new();
        grammar.add_rule("list", ["#item#", "#item#, #list#"]);
        grammar.add_rule("item", ["apple"]);
        assert!(lint(&grammar).is_clean());

        // Without the exit candidate the same cycle is reported.
        grammar.add_rule("list", ["#item#, #list#"]);
        let errors: Vec<String> = lint(&grammar).errors().map(|e| e.to_string()).collect();
        assert_eq!(errors, vec!["rule 'list' can never finish expanding".to_string()]);
    }

    #[test]
    fn force_binding_counts_as_reference() {
        let mut grammar = Grammar::new();
        grammar.add_rule("origin", ["#[setup]story#"]);
        grammar.add_rule("story", ["ok"]);
        let report = lint(&grammar);
        assert!(report.issues.contains(&LintIssue::UndefinedSymbol {
            rule: "origin".to_string(),
            symbol: "setup".to_string(),
        }));
    }
}
