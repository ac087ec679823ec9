//! Expansion behavior tests — the rule-string contract end to end.

use narrative_grammar::core::english::pluralize;
use narrative_grammar::{FirstSelector, Grammar, RandomSelector, Selector, ShuffleSelector};

fn grammar_with(rules: &[(&str, &[&str])]) -> Grammar {
    let mut grammar = Grammar::new();
    grammar.add_standard_modifiers();
    for (name, candidates) in rules {
        grammar.add_rule(name, candidates.iter().copied());
    }
    grammar
}

#[test]
fn text_without_references_is_returned_as_is() {
    let grammar = grammar_with(&[("name", &["Anna"])]);
    let mut selector = RandomSelector::seeded(3);
    for text in ["", "name", "Plain sentence.", "a.b.c", "colon: here", "ünïcödé ✓"] {
        assert_eq!(grammar.flatten(text, &mut selector), text);
    }
}

#[test]
fn name_scenario_with_first_selector() {
    let grammar = grammar_with(&[("name", &["Anna", "Bob"])]);
    assert_eq!(grammar.flatten("#name#", &mut FirstSelector), "Anna");
    assert_eq!(
        grammar.flatten("#name.s#", &mut FirstSelector),
        pluralize("Anna")
    );
}

#[test]
fn eagle_flew() {
    let grammar = grammar_with(&[("animal", &["eagle"])]);
    assert_eq!(
        grammar.flatten("#[hero:#animal#]hero# flew", &mut FirstSelector),
        "eagle flew"
    );
}

#[test]
fn mystery_passthrough_is_capitalized() {
    let grammar = grammar_with(&[]);
    assert_eq!(
        grammar.flatten("#mystery.capitalize#", &mut FirstSelector),
        "Mystery"
    );
}

#[test]
fn empty_symbol_expands_to_empty_with_any_selector() {
    let grammar = grammar_with(&[("void", &[])]);
    assert_eq!(grammar.flatten("#void#", &mut FirstSelector), "");
    assert_eq!(grammar.flatten("#void#", &mut RandomSelector::seeded(0)), "");
    assert_eq!(grammar.flatten("#void#", &mut ShuffleSelector::seeded(0)), "");
}

#[test]
fn swapping_modifier_order_changes_result() {
    let mut grammar = grammar_with(&[("name", &["robin"])]);
    grammar.add_modifier("upper", |s| s.to_uppercase());
    grammar.add_modifier("exclaim", |s| format!("{}!", s));
    grammar.add_modifier("tag", |s| format!("{}-x", s));

    assert_eq!(grammar.flatten("#name.upper.exclaim#", &mut FirstSelector), "ROBIN!");
    assert_eq!(grammar.flatten("#name.upper.tag#", &mut FirstSelector), "ROBIN-x");
    assert_eq!(grammar.flatten("#name.tag.upper#", &mut FirstSelector), "ROBIN-X");
}

#[test]
fn modifier_names_ignore_case() {
    let grammar = grammar_with(&[("animal", &["wolf"])]);
    assert_eq!(
        grammar.flatten("#animal.PLURAL.CapitalizeAll#", &mut FirstSelector),
        "Wolves"
    );
}

#[test]
fn bound_variable_never_reselects() {
    let grammar = grammar_with(&[("name", &["Anna", "Bob", "Cleo", "Dmitri", "Esme"])]);

    let mut calls = 0usize;
    let mut inner = RandomSelector::seeded(17);
    let mut counting = |key: &str, candidates: &[String]| {
        calls += 1;
        inner.select(key, candidates)
    };
    let out = grammar.flatten(
        "#[hero:#name#]hero# and #hero# and #hero.s#",
        &mut counting,
    );
    assert_eq!(calls, 1, "selector consulted more than once: {:?}", out);

    let parts: Vec<&str> = out.split(" and ").collect();
    assert_eq!(parts[0], parts[1]);
    assert_eq!(parts[2], pluralize(parts[0]));
}

#[test]
fn later_binding_replaces_earlier_one() {
    let grammar = grammar_with(&[("first", &["Anna"]), ("second", &["Bob"])]);
    assert_eq!(
        grammar.flatten(
            "#[hero:#first#]hero#, then #[hero:#second#]hero#, still #hero#",
            &mut FirstSelector,
        ),
        "Anna, then Bob, still Bob"
    );
}

#[test]
fn binding_names_ignore_case() {
    let grammar = grammar_with(&[("name", &["Anna"])]);
    assert_eq!(
        grammar.flatten("#[Hero:#name#]HERO# / #hero#", &mut FirstSelector),
        "Anna / Anna"
    );
}

#[test]
fn binding_to_literal_text() {
    let grammar = grammar_with(&[]);
    assert_eq!(
        grammar.flatten("#[place:the old mill]place.title#", &mut FirstSelector),
        "The Old Mill"
    );
}

#[test]
fn shuffle_selector_story_never_repeats_within_deck() {
    let grammar = grammar_with(&[("card", &["ace", "king", "queen"])]);
    let out = grammar.flatten("#card# #card# #card#", &mut ShuffleSelector::seeded(5));
    let mut cards: Vec<&str> = out.split(' ').collect();
    cards.sort_unstable();
    assert_eq!(cards, vec!["ace", "king", "queen"]);
}
