/// Preview — interactive expansion shell for testing grammars.
///
/// Usage: preview --grammar <path> [--config <path>] [--seed <n>]
///                [--rule <text>] [--count <n>]
///
/// With `--rule`, expands the rule `--count` times (default 1) and exits
/// instead of opening the shell.
///
/// Commands:
///   expand <rule text>          — flatten a rule string, e.g. `expand #origin#`
///   bulk <n> <rule text>        — flatten n times with variety stats
///   seed <n>                    — set RNG seed
///   rule <name> <a|b|c>         — add or replace a rule
///   rules                       — list loaded rules
///   help                        — list commands
///   quit                        — exit
///
/// Set `RUST_LOG=narrative_grammar=trace` to watch bindings and skipped modifiers.
use narrative_grammar::core::context::ExpansionContext;
use narrative_grammar::{Grammar, GrammarConfig, RandomSelector, RuleTable};
use std::collections::HashSet;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args[0] == "--help" || args[0] == "-h" {
        print_usage();
        return;
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("{}", msg);
            print_usage();
            std::process::exit(1);
        }
    };
    let Options {
        grammar_path,
        config_path,
        mut seed,
        rule,
        count,
    } = options;

    let rules = match grammar_path {
        Some(ref path) => match RuleTable::load_from_ron(Path::new(path)) {
            Ok(table) => table,
            Err(e) => {
                eprintln!("ERROR: Failed to load grammar '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None => RuleTable::new(),
    };

    let config = match config_path {
        Some(ref path) => match GrammarConfig::load_from_ron(Path::new(path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("ERROR: Failed to load config '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None => GrammarConfig::default(),
    };

    let mut grammar = Grammar::from_rules(rules).with_config(config);
    grammar.add_standard_modifiers();

    if let Some(rule) = rule {
        let mut selector = RandomSelector::seeded(seed);
        if count == 1 {
            match grammar.try_flatten(&rule, &mut selector) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    eprintln!("ERROR: {}", e);
                    std::process::exit(1);
                }
            }
        } else {
            run_bulk(&grammar, &mut selector, count, &rule);
        }
        return;
    }

    println!("Loaded {} grammar rules", grammar.rules().len());
    println!("Seed: {}", seed);
    println!("Type 'help' for commands.\n");

    let mut selector = RandomSelector::seeded(seed);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("preview> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
            None => (line.to_lowercase(), ""),
        };

        match cmd.as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => print_help(),
            "expand" => {
                if rest.is_empty() {
                    println!("Usage: expand <rule text>");
                    continue;
                }
                match grammar.try_flatten(rest, &mut selector) {
                    Ok(text) => {
                        println!("\n--- Generated Text ---");
                        println!("{}", text);
                        println!("--- End ---\n");
                    }
                    Err(e) => println!("ERROR: {}", e),
                }
            }
            "bulk" => {
                let (count, rule) = match rest.split_once(char::is_whitespace) {
                    Some((n, rule)) => (n.parse::<usize>().ok(), rule.trim()),
                    None => (None, ""),
                };
                let count = match count {
                    Some(n) if n > 0 && !rule.is_empty() => n,
                    _ => {
                        println!("Usage: bulk <n> <rule text>");
                        continue;
                    }
                };
                run_bulk(&grammar, &mut selector, count, rule);
            }
            "seed" => {
                if rest.is_empty() {
                    println!("Current seed: {}", seed);
                    continue;
                }
                match rest.parse::<u64>() {
                    Ok(s) => {
                        seed = s;
                        selector = RandomSelector::seeded(seed);
                        println!("Seed set to {}", seed);
                    }
                    Err(_) => println!("Invalid seed: {}", rest),
                }
            }
            "rule" => match rest.split_once(char::is_whitespace) {
                Some((name, candidates)) => {
                    let candidates: Vec<&str> = candidates.split('|').map(str::trim).collect();
                    println!("Rule '{}' set with {} candidates", name, candidates.len());
                    grammar.add_rule(name, candidates);
                }
                None => println!("Usage: rule <name> <a|b|c>"),
            },
            "rules" => {
                let mut names: Vec<(&str, usize)> = grammar
                    .rules()
                    .iter()
                    .map(|(name, candidates)| (name, candidates.len()))
                    .collect();
                names.sort_unstable();
                for (name, count) in names {
                    println!("  {} ({} candidates)", name, count);
                }
            }
            _ => println!("Unknown command '{}'. Type 'help'.", cmd),
        }
    }
}

#[derive(Debug, PartialEq)]
struct Options {
    grammar_path: Option<String>,
    config_path: Option<String>,
    seed: u64,
    /// One-shot mode: expand this rule and exit.
    rule: Option<String>,
    count: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            grammar_path: None,
            config_path: None,
            seed: 42,
            rule: None,
            count: 1,
        }
    }
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut count_given = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--grammar" if i + 1 < args.len() => {
                i += 1;
                options.grammar_path = Some(args[i].clone());
            }
            "--config" if i + 1 < args.len() => {
                i += 1;
                options.config_path = Some(args[i].clone());
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                options.seed = args[i].parse().unwrap_or(42);
            }
            "--rule" if i + 1 < args.len() => {
                i += 1;
                options.rule = Some(args[i].clone());
            }
            "--count" if i + 1 < args.len() => {
                i += 1;
                options.count = match args[i].parse::<usize>() {
                    Ok(n) if n > 0 => n,
                    _ => return Err(format!("Invalid count: {}", args[i])),
                };
                count_given = true;
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
        i += 1;
    }

    if count_given && options.rule.is_none() {
        return Err("--count needs --rule".to_string());
    }
    Ok(options)
}

fn run_bulk(grammar: &Grammar, selector: &mut RandomSelector, count: usize, rule: &str) {
    let mut unique = HashSet::new();
    let mut total_words = 0usize;
    let mut truncated = 0usize;

    for n in 1..=count {
        let mut ctx = ExpansionContext::new();
        let text = grammar.flatten_with_context(rule, selector, &mut ctx);
        if ctx.truncated() {
            truncated += 1;
        }
        total_words += text.split_whitespace().count();
        println!("{:>4}. {}", n, text);
        unique.insert(text);
    }

    println!("\n=== Variety Stats ===");
    println!("Passages:        {}", count);
    println!(
        "Unique:          {} ({:.1}%)",
        unique.len(),
        unique.len() as f64 / count as f64 * 100.0
    );
    println!("Avg words:       {:.1}", total_words as f64 / count as f64);
    if truncated > 0 {
        println!("Hit depth limit: {}", truncated);
    }
}

fn print_usage() {
    println!(
        "Usage: preview --grammar <path> [--config <path>] [--seed <n>] [--rule <text>] [--count <n>]"
    );
}

fn print_help() {
    println!("Commands:");
    println!("  expand <rule text>    flatten a rule string, e.g. expand #origin#");
    println!("  bulk <n> <rule text>  flatten n times and report variety");
    println!("  seed <n>              set RNG seed");
    println!("  rule <name> <a|b|c>   add or replace a rule");
    println!("  rules                 list loaded rules");
    println!("  help                  show this list");
    println!("  quit                  exit");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn shell_mode_by_default() {
        let options = parse_args(&args(&["--grammar", "g.ron", "--seed", "7"])).unwrap();
        assert_eq!(options.grammar_path.as_deref(), Some("g.ron"));
        assert_eq!(options.seed, 7);
        assert_eq!(options.rule, None);
        assert_eq!(options.count, 1);
    }

    #[test]
    fn rule_and_count_select_one_shot_mode() {
        let options = parse_args(&args(&[
            "--grammar", "g.ron", "--rule", "#origin#", "--count", "5", "--config", "c.ron",
        ]))
        .unwrap();
        assert_eq!(options.rule.as_deref(), Some("#origin#"));
        assert_eq!(options.count, 5);
        assert_eq!(options.config_path.as_deref(), Some("c.ron"));
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(parse_args(&args(&["--rule", "#a#", "--count", "0"])).is_err());
        assert!(parse_args(&args(&["--rule", "#a#", "--count", "many"])).is_err());
        assert!(parse_args(&args(&["--count", "3"])).is_err());
        assert!(parse_args(&args(&["--verbose"])).is_err());
        assert!(parse_args(&args(&["--rule"])).is_err());
    }
}
