//! Rule-string tokenizer — turns `#symbol.mod#` / `[name:rule]` text into segments.

/// Opens and closes an expansion reference.
pub const REFERENCE_DELIMITER: char = '#';
/// Separates the symbol from its modifier chain, and modifiers from each other.
pub const MODIFIER_DELIMITER: char = '.';
/// Separates a binding's name from its rule.
pub const BINDING_DELIMITER: char = ':';

const BINDING_OPEN: char = '[';
const BINDING_CLOSE: char = ']';

/// A variable binding block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// `[name:rule]` — flatten `rule` and remember it as `name`.
    Named { name: String, rule: String },
    /// `[name]` — expand `#name#` for its side effects and drop the text.
    Force { name: String },
}

impl Binding {
    fn parse(body: &str) -> Binding {
        match body.split_once(BINDING_DELIMITER) {
            Some((name, rule)) => Binding::Named {
                name: name.to_string(),
                rule: rule.to_string(),
            },
            None => Binding::Force {
                name: body.to_string(),
            },
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Binding::Named { name, .. } | Binding::Force { name } => name,
        }
    }
}

/// An expansion reference: `#[bindings]symbol.mod1.mod2#`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Bindings found anywhere in the body, in textual order.
    pub bindings: Vec<Binding>,
    /// The bare symbol name, as written.
    pub symbol: String,
    /// Modifier names in application order.
    pub modifiers: Vec<String>,
}

/// A segment of a parsed rule string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, emitted as-is.
    Literal(String),
    /// A binding block outside any reference. `raw` is the original text
    /// including brackets.
    Action { binding: Binding, raw: String },
    /// An expansion reference.
    Reference(Reference),
}

/// A parsed rule string — a sequence of segments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    pub segments: Vec<Segment>,
}

impl Template {
    /// Tokenize a rule string.
    ///
    /// Parsing never fails. Input the tokenizer cannot balance degrades to
    /// literal text:
    /// - an unterminated `#` or `[` turns the rest of the string into a literal
    /// - `##` (an empty reference) is literal
    /// - a stray `]` is literal
    ///
    /// A `#` inside a binding block belongs to the binding's rule and never
    /// closes the surrounding reference.
    pub fn parse(input: &str) -> Template {
        let chars: Vec<char> = input.chars().collect();
        let len = chars.len();
        let mut segments = Vec::new();
        let mut literal_buf = String::new();
        let mut i = 0;

        while i < len {
            match chars[i] {
                REFERENCE_DELIMITER => match find_reference_end(&chars, i + 1) {
                    Some(end) if end > i + 1 => {
                        flush_literal(&mut segments, &mut literal_buf);
                        let body: String = chars[i + 1..end].iter().collect();
                        segments.push(Segment::Reference(parse_reference(&body)));
                        i = end + 1;
                    }
                    Some(end) => {
                        // `##`
                        literal_buf.extend(&chars[i..=end]);
                        i = end + 1;
                    }
                    None => {
                        literal_buf.extend(&chars[i..]);
                        i = len;
                    }
                },
                BINDING_OPEN => match find_binding_end(&chars, i + 1) {
                    Some(end) => {
                        flush_literal(&mut segments, &mut literal_buf);
                        let body: String = chars[i + 1..end].iter().collect();
                        let raw: String = chars[i..=end].iter().collect();
                        segments.push(Segment::Action {
                            binding: Binding::parse(&body),
                            raw,
                        });
                        i = end + 1;
                    }
                    None => {
                        literal_buf.extend(&chars[i..]);
                        i = len;
                    }
                },
                c => {
                    literal_buf.push(c);
                    i += 1;
                }
            }
        }

        flush_literal(&mut segments, &mut literal_buf);
        Template { segments }
    }

    /// Iterate over the references in this template.
    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Reference(reference) => Some(reference),
            _ => None,
        })
    }

    /// Iterate over every binding, both top-level and inside references.
    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.segments.iter().flat_map(|segment| match segment {
            Segment::Action { binding, .. } => std::slice::from_ref(binding).iter(),
            Segment::Reference(reference) => reference.bindings.iter(),
            Segment::Literal(_) => (&[] as &[Binding]).iter(),
        })
    }

    pub fn has_references(&self) -> bool {
        self.references().next().is_some()
    }
}

fn flush_literal(segments: &mut Vec<Segment>, buf: &mut String) {
    if !buf.is_empty() {
        segments.push(Segment::Literal(std::mem::take(buf)));
    }
}

/// Index of the `#` closing a reference whose body starts at `start`.
fn find_reference_end(chars: &[char], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, &c) in chars[start..].iter().enumerate() {
        match c {
            BINDING_OPEN => depth += 1,
            BINDING_CLOSE => depth = depth.saturating_sub(1),
            REFERENCE_DELIMITER if depth == 0 => return Some(start + offset),
            _ => {}
        }
    }
    None
}

/// Index of the `]` closing a binding whose body starts at `start`.
/// Nested brackets belong to inner bindings.
fn find_binding_end(chars: &[char], start: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (offset, &c) in chars[start..].iter().enumerate() {
        match c {
            BINDING_OPEN => depth += 1,
            BINDING_CLOSE => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split a reference body into its bindings and the `symbol.mods` remainder.
fn parse_reference(body: &str) -> Reference {
    let chars: Vec<char> = body.chars().collect();
    let mut bindings = Vec::new();
    let mut rest = String::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == BINDING_OPEN {
            if let Some(end) = find_binding_end(&chars, i + 1) {
                let inner: String = chars[i + 1..end].iter().collect();
                bindings.push(Binding::parse(&inner));
                i = end + 1;
                continue;
            }
        }
        if chars[i] != BINDING_CLOSE {
            rest.push(chars[i]);
        }
        i += 1;
    }

    let mut parts = rest.split(MODIFIER_DELIMITER);
    let symbol = parts.next().unwrap_or_default().to_string();
    let modifiers = parts
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect();

    Reference {
        bindings,
        symbol,
        modifiers,
    }
}
