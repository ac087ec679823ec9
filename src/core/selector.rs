//! Selection strategies — pick one candidate expansion for a symbol.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;

/// Separates a symbol name from the name of the strategy that should
/// expand it, e.g. `weather*cycle`.
pub const STRATEGY_MARKER: char = '*';

/// Chooses one candidate for a symbol.
///
/// `key` is the symbol name as written in the reference. Implementations
/// must return the empty string when `candidates` is empty.
pub trait Selector {
    fn select(&mut self, key: &str, candidates: &[String]) -> String;
}

impl<F> Selector for F
where
    F: FnMut(&str, &[String]) -> String,
{
    fn select(&mut self, key: &str, candidates: &[String]) -> String {
        self(key, candidates)
    }
}

/// Uniform pseudo-random selection.
#[derive(Debug, Clone)]
pub struct RandomSelector<R = StdRng> {
    rng: R,
}

impl<R: Rng> RandomSelector<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomSelector<StdRng> {
    /// A reproducible selector seeded from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Selector for RandomSelector<R> {
    fn select(&mut self, _key: &str, candidates: &[String]) -> String {
        candidates
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_default()
    }
}

/// Always picks the first candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstSelector;

impl Selector for FirstSelector {
    fn select(&mut self, _key: &str, candidates: &[String]) -> String {
        candidates.first().cloned().unwrap_or_default()
    }
}

/// Walks each symbol's candidates in order, wrapping around.
#[derive(Debug, Clone, Default)]
pub struct SequentialSelector {
    cursors: FxHashMap<String, usize>,
}

impl SequentialSelector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Selector for SequentialSelector {
    fn select(&mut self, key: &str, candidates: &[String]) -> String {
        if candidates.is_empty() {
            return String::new();
        }
        let cursor = self.cursors.entry(key.to_lowercase()).or_insert(0);
        let choice = candidates[*cursor % candidates.len()].clone();
        *cursor = (*cursor + 1) % candidates.len();
        choice
    }
}

/// Deals each symbol's candidates from a shuffled deck so that no
/// candidate repeats until all of them have been used.
#[derive(Debug, Clone)]
pub struct ShuffleSelector<R = StdRng> {
    rng: R,
    decks: FxHashMap<String, Vec<usize>>,
}

impl<R: Rng> ShuffleSelector<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            decks: FxHashMap::default(),
        }
    }
}

impl ShuffleSelector<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Selector for ShuffleSelector<R> {
    fn select(&mut self, key: &str, candidates: &[String]) -> String {
        if candidates.is_empty() {
            return String::new();
        }
        let deck = self.decks.entry(key.to_lowercase()).or_default();
        // The candidate list may have been edited since the deck was dealt.
        deck.retain(|&index| index < candidates.len());
        if deck.is_empty() {
            deck.extend(0..candidates.len());
            deck.shuffle(&mut self.rng);
        }
        match deck.pop() {
            Some(index) => candidates[index].clone(),
            None => String::new(),
        }
    }
}

/// Routes each symbol to a named sub-strategy chosen by the suffix after
/// the last [`STRATEGY_MARKER`] in its key.
///
/// A key without the marker is looked up whole. Keys naming no registered
/// strategy expand to the empty string.
#[derive(Default)]
pub struct CompositeSelector {
    strategies: FxHashMap<String, Box<dyn Selector>>,
}

impl CompositeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sub-strategy. Names are case-insensitive; a later
    /// registration replaces an earlier one.
    pub fn register(&mut self, name: &str, selector: impl Selector + 'static) {
        self.strategies
            .insert(name.to_lowercase(), Box::new(selector));
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, name: &str, selector: impl Selector + 'static) -> Self {
        self.register(name, selector);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.strategies.contains_key(&name.to_lowercase())
    }

    fn strategy_name(key: &str) -> &str {
        match key.rfind(STRATEGY_MARKER) {
            Some(index) => &key[index + STRATEGY_MARKER.len_utf8()..],
            None => key,
        }
    }
}

impl Selector for CompositeSelector {
    fn select(&mut self, key: &str, candidates: &[String]) -> String {
        let name = Self::strategy_name(key).to_lowercase();
        match self.strategies.get_mut(&name) {
            Some(strategy) => strategy.select(key, candidates),
            None => {
                tracing::trace!(key, strategy = %name, "no strategy registered");
                String::new()
            }
        }
    }
}

impl std::fmt::Debug for CompositeSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.strategies.keys().collect();
        names.sort();
        f.debug_struct("CompositeSelector")
            .field("strategies", &names)
            .finish()
    }
}
