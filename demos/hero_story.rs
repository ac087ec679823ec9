/// Hero Story example — a short tale whose hero, pet, and pronouns stay
/// consistent across every sentence.
///
/// Run with: cargo run --example hero_story
use narrative_grammar::core::lint::lint;
use narrative_grammar::{
    CompositeSelector, FirstSelector, Grammar, RandomSelector, SequentialSelector,
};
use std::path::Path;

fn main() {
    // --- Load the story grammar ---
    let mut grammar = Grammar::load_from_ron(Path::new("grammars/hero_story.ron"))
        .expect("Failed to load hero story grammar");
    grammar.add_standard_modifiers();

    let report = lint(&grammar);
    for issue in &report.issues {
        println!("[lint] {}", issue);
    }

    println!("========================================");
    println!("   THREE TELLINGS");
    println!("========================================");
    println!();

    for seed in [7, 1999, 2026] {
        let mut selector = RandomSelector::seeded(seed);
        print_telling(&format!("Seed {}", seed), &grammar, &mut selector);
    }

    // --- Deterministic telling ---
    print_telling("First candidates only", &grammar, &mut FirstSelector);

    // --- Routed strategies: the weather cycles, omens always pick the first ---
    grammar.add_rule("forecast*cycle", ["sunny", "rainy", "snowy"]);
    grammar.add_rule("omen*first", ["a red sky", "a black cat"]);
    let mut routed = CompositeSelector::new()
        .with("cycle", SequentialSelector::new())
        .with("first", FirstSelector);

    println!("--- A Week of Weather ---");
    for day in ["Mon", "Tue", "Wed", "Thu"] {
        let line = grammar.flatten(
            &format!("{}: #forecast*cycle#, with #omen*first#.", day),
            &mut routed,
        );
        println!("{}", line);
    }
    println!();

    println!("========================================");
    println!("   FIN");
    println!("========================================");
}

fn print_telling(title: &str, grammar: &Grammar, selector: &mut dyn narrative_grammar::Selector) {
    println!("--- {} ---", title);
    match grammar.try_flatten("#origin#", selector) {
        Ok(text) => println!("{}", text),
        Err(e) => println!("[Generation error: {}]", e),
    }
    println!();
}
