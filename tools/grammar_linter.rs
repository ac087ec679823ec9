/// Grammar Linter — validates rule references, modifiers, and termination.
///
/// Usage: grammar_linter <grammar.ron | grammar_dir> [--no-standard-modifiers]
use narrative_grammar::core::lint::lint;
use narrative_grammar::{Grammar, RuleTable};
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: grammar_linter <grammar.ron | grammar_dir> [--no-standard-modifiers]");
        process::exit(0);
    }

    let grammar_arg = &args[1];
    let mut standard_modifiers = true;

    for arg in &args[2..] {
        match arg.as_str() {
            "--no-standard-modifiers" => standard_modifiers = false,
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
    }

    let mut rules = RuleTable::new();
    let grammar_path = Path::new(grammar_arg);

    if grammar_path.is_file() {
        match RuleTable::load_from_ron(grammar_path) {
            Ok(table) => rules.merge(table),
            Err(e) => {
                eprintln!("ERROR: Failed to load grammar file: {}", e);
                process::exit(1);
            }
        }
    } else if grammar_path.is_dir() {
        load_rules_recursive(grammar_path, &mut rules);
    } else {
        eprintln!("ERROR: Path '{}' does not exist", grammar_arg);
        process::exit(1);
    }

    println!("Loaded {} grammar rules", rules.len());

    let mut grammar = Grammar::from_rules(rules);
    if standard_modifiers {
        grammar.add_standard_modifiers();
    }

    let report = lint(&grammar);

    println!("\n=== Grammar Lint Report ===\n");

    if report.is_clean() {
        println!("All checks passed!");
    }

    for warning in report.warnings() {
        println!("WARNING: {}", warning);
    }

    for error in report.errors() {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        report.errors().count(),
        report.warnings().count()
    );

    if report.has_errors() {
        process::exit(1);
    }
}

fn load_rules_recursive(dir: &Path, rules: &mut RuleTable) {
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                load_rules_recursive(&path, rules);
            } else if path.extension().and_then(|s| s.to_str()) == Some("ron") {
                match RuleTable::load_from_ron(&path) {
                    Ok(table) => {
                        println!("  Loaded: {}", path.display());
                        rules.merge(table);
                    }
                    Err(e) => {
                        eprintln!("  ERROR loading {}: {}", path.display(), e);
                    }
                }
            }
        }
    }
}
