//! Modifier registry — named string transforms applied after a reference resolves.

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// A modifier: takes the expanded text and returns the transformed text.
pub type Modifier = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Named modifiers, looked up case-insensitively.
#[derive(Clone, Default)]
pub struct ModifierRegistry {
    modifiers: FxHashMap<String, Modifier>,
}

impl ModifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the English modifiers from
    /// [`english`](crate::core::english).
    pub fn with_standard() -> Self {
        let mut registry = Self::new();
        crate::core::english::register_all(&mut registry);
        registry
    }

    /// Register a modifier. A later registration under the same name wins.
    pub fn register<F>(&mut self, name: &str, modifier: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.modifiers.insert(name.to_lowercase(), Arc::new(modifier));
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.modifiers.remove(&name.to_lowercase()).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Modifier> {
        self.modifiers.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modifiers.contains_key(&name.to_lowercase())
    }

    /// Apply the named modifier. Unknown names leave the text unchanged.
    pub fn apply(&self, name: &str, text: String) -> String {
        match self.get(name) {
            Some(modifier) => modifier(&text),
            None => {
                tracing::trace!(modifier = name, "skipping unregistered modifier");
                text
            }
        }
    }

    /// Registered names, lowercased.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modifiers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }
}

impl fmt::Debug for ModifierRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("ModifierRegistry")
            .field("modifiers", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_starts_empty() {
        let registry = ModifierRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.apply("upper", "abc".to_string()), "abc");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut registry = ModifierRegistry::new();
        registry.register("Upper", |s| s.to_uppercase());
        assert!(registry.contains("upper"));
        assert!(registry.contains("UPPER"));
        assert_eq!(registry.apply("uPpEr", "abc".to_string()), "ABC");
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = ModifierRegistry::new();
        registry.register("shout", |s| format!("{}!", s));
        registry.register("SHOUT", |s| format!("{}!!!", s));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.apply("shout", "hi".to_string()), "hi!!!");
    }

    #[test]
    fn remove_modifier() {
        let mut registry = ModifierRegistry::new();
        registry.register("upper", |s| s.to_uppercase());
        assert!(registry.remove("UPPER"));
        assert!(!registry.remove("upper"));
        assert_eq!(registry.apply("upper", "abc".to_string()), "abc");
    }

    #[test]
    fn standard_registry_has_english_modifiers() {
        let registry = ModifierRegistry::with_standard();
        for name in ["s", "plural", "capitalize", "sentence", "capitalizeAll", "title"] {
            assert!(registry.contains(name), "missing modifier {}", name);
        }
    }
}
