//! Rule table — symbol name to candidate expansions, keyed case-insensitively.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Index;
use std::path::Path;

use crate::core::grammar::GrammarError;

/// A symbol and its candidate expansions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// The name as it was authored. Lookups ignore case.
    pub name: String,
    pub candidates: Vec<String>,
}

/// Named rules, keyed by lowercased symbol name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    rules: FxHashMap<String, Rule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a symbol's candidate list. Returns the previous list.
    pub fn insert<I, S>(&mut self, name: &str, candidates: I) -> Option<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rule = Rule {
            name: name.to_string(),
            candidates: candidates.into_iter().map(Into::into).collect(),
        };
        self.rules
            .insert(name.to_lowercase(), rule)
            .map(|old| old.candidates)
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.rules
            .remove(&name.to_lowercase())
            .map(|rule| rule.candidates)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(&name.to_lowercase())
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.rules
            .get(&name.to_lowercase())
            .map(|rule| rule.candidates.as_slice())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Vec<String>> {
        self.rules
            .get_mut(&name.to_lowercase())
            .map(|rule| &mut rule.candidates)
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(&name.to_lowercase())
    }

    /// Iterate `(authored name, candidates)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.rules
            .values()
            .map(|rule| (rule.name.as_str(), rule.candidates.as_slice()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.values().map(|rule| rule.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// Merge another table into this one. Rules from `other` override
    /// rules in `self` with the same name.
    pub fn merge(&mut self, other: RuleTable) {
        self.rules.extend(other.rules);
    }

    /// Load a rule table from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<RuleTable, GrammarError> {
        let contents = std::fs::read_to_string(path)?;
        let table = Self::parse_ron(&contents)?;
        tracing::debug!(path = %path.display(), rules = table.len(), "loaded rule table");
        Ok(table)
    }

    /// Parse a rule table from a RON map of `"symbol": ["candidate", ...]`.
    pub fn parse_ron(input: &str) -> Result<RuleTable, GrammarError> {
        let raw: BTreeMap<String, Vec<String>> = ron::from_str(input)?;
        Ok(raw.into_iter().collect())
    }

    /// Serialize to pretty RON with symbols in sorted order.
    pub fn to_ron(&self) -> Result<String, GrammarError> {
        let sorted: BTreeMap<&str, &[String]> = self.iter().collect();
        Ok(ron::ser::to_string_pretty(
            &sorted,
            ron::ser::PrettyConfig::default(),
        )?)
    }
}

impl Index<&str> for RuleTable {
    type Output = [String];

    /// Panics if the symbol is not defined, like `HashMap` indexing.
    fn index(&self, name: &str) -> &[String] {
        match self.get(name) {
            Some(candidates) => candidates,
            None => panic!("no rule named '{}'", name),
        }
    }
}

impl<S: Into<String>> FromIterator<(String, Vec<S>)> for RuleTable {
    fn from_iter<T: IntoIterator<Item = (String, Vec<S>)>>(iter: T) -> Self {
        let mut table = RuleTable::new();
        table.extend(iter);
        table
    }
}

impl<S: Into<String>> Extend<(String, Vec<S>)> for RuleTable {
    fn extend<T: IntoIterator<Item = (String, Vec<S>)>>(&mut self, iter: T) {
        for (name, candidates) in iter {
            self.insert(&name, candidates);
        }
    }
}

impl Serialize for RuleTable {
    fn serialize<Ser: serde::Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let sorted: BTreeMap<&str, &[String]> = self.iter().collect();
        sorted.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RuleTable {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Vec<String>>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}
