//! English text modifiers: pluralization, sentence case, and title case.
//!
//! Registered under the conventional Tracery names:
//! `s` / `plural`, `capitalize` / `sentence`, `capitalizeAll` / `title`.

use crate::core::modifiers::ModifierRegistry;

/// Words with no distinct plural form.
const UNCOUNTABLE: &[&str] = &[
    "sheep",
    "fish",
    "deer",
    "moose",
    "series",
    "species",
    "news",
    "information",
    "rice",
    "equipment",
    "aircraft",
];

/// Irregular singular → plural pairs.
const IRREGULAR: &[(&str, &str)] = &[
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("person", "people"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("ox", "oxen"),
    ("die", "dice"),
    ("cactus", "cacti"),
];

/// Nouns ending in `f` or `fe` that take `ves`.
const VES: &[&str] = &[
    "leaf", "loaf", "wolf", "calf", "half", "elf", "shelf", "thief", "knife", "wife", "life",
    "scarf", "self", "sheaf",
];

/// Nouns ending in a consonant + `o` that take `es`.
const OES: &[&str] = &["hero", "potato", "tomato", "echo", "torpedo", "veto", "volcano"];

/// Register every English modifier on `registry`.
pub fn register_all(registry: &mut ModifierRegistry) {
    registry.register("s", pluralize);
    registry.register("plural", pluralize);
    registry.register("capitalize", sentence_case);
    registry.register("sentence", sentence_case);
    registry.register("capitalizeAll", title_case);
    registry.register("title", title_case);
}

/// Pluralize the last word of `text`.
pub fn pluralize(text: &str) -> String {
    let trimmed = text.trim_end();
    let trailing = &text[trimmed.len()..];
    let split = trimmed
        .rfind(char::is_whitespace)
        .map(|i| i + trimmed[i..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(0);
    let (head, word) = trimmed.split_at(split);
    if word.is_empty() {
        return text.to_string();
    }
    format!("{}{}{}", head, pluralize_word(word), trailing)
}

fn pluralize_word(word: &str) -> String {
    let lower = word.to_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }

    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return match_case(word, plural);
    }

    if VES.contains(&lower.as_str()) {
        let cut = if lower.ends_with("fe") {
            2
        } else if lower.ends_with('f') {
            1
        } else {
            0
        };
        let stem = &word[..word.len() - cut];
        return format!("{}{}", stem, suffix_case(word, "ves"));
    }

    if OES.contains(&lower.as_str()) {
        return format!("{}{}", word, suffix_case(word, "es"));
    }

    let ends_with_any = |suffixes: &[&str]| suffixes.iter().any(|s| lower.ends_with(s));

    if ends_with_any(&["s", "x", "z", "ch", "sh"]) {
        return format!("{}{}", word, suffix_case(word, "es"));
    }

    let mut rev = lower.chars().rev();
    if let (Some('y'), Some(before)) = (rev.next(), rev.next()) {
        if !"aeiou".contains(before) {
            let stem = &word[..word.len() - 1];
            return format!("{}{}", stem, suffix_case(word, "ies"));
        }
    }

    format!("{}{}", word, suffix_case(word, "s"))
}

/// Uppercase the suffix when the word is written in all capitals.
fn suffix_case(word: &str, suffix: &str) -> String {
    let has_letters = word.chars().any(char::is_alphabetic);
    if has_letters && word.chars().all(|c| !c.is_lowercase()) && word.chars().count() > 1 {
        suffix.to_uppercase()
    } else {
        suffix.to_string()
    }
}

/// Carry the capitalization of `original` over to `replacement`.
fn match_case(original: &str, replacement: &str) -> String {
    if original.chars().count() > 1 && original.chars().all(|c| !c.is_lowercase()) {
        return replacement.to_uppercase();
    }
    if original.chars().next().is_some_and(char::is_uppercase) {
        return capitalize_first(replacement);
    }
    replacement.to_string()
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Uppercase the first letter of the text, leaving the rest alone.
pub fn sentence_case(text: &str) -> String {
    match text.char_indices().find(|(_, c)| c.is_alphabetic()) {
        Some((index, _)) => format!("{}{}", &text[..index], capitalize_first(&text[index..])),
        None => text.to_string(),
    }
}

/// Uppercase the first letter of every word.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.push(c);
        }
    }
    out
}
