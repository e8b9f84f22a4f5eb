//! Catalog of rules that can be assigned to players.
//!
//! The catalog is a closed list of `(Rule, weight)` entries. Adding a rule
//! to the game means adding a `Rule` variant and an entry here; nothing
//! else needs rewiring.

use super::rule::{Rule, Script};
use crate::core::RuleRng;

/// A catalog entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CatalogEntry {
    pub rule: Rule,
    pub weight: f32,
}

/// Weighted set of assignable rules.
///
/// ## Example
///
/// ```
/// use ng_chat::core::RuleRng;
/// use ng_chat::rules::RuleCatalog;
///
/// let catalog = RuleCatalog::standard();
/// let mut rng = RuleRng::new(7);
///
/// let rule = catalog.choose(&mut rng);
/// assert!(catalog.contains(&rule));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RuleCatalog {
    entries: Vec<CatalogEntry>,
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleCatalog {
    /// Create a catalog from explicit entries.
    ///
    /// Panics if there is no entry with a positive weight.
    #[must_use]
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        assert!(
            entries.iter().any(|e| e.weight > 0.0),
            "Rule catalog needs at least one entry with positive weight"
        );
        Self { entries }
    }

    /// The game's standard rules, all equally likely.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(
            [
                Rule::LongMessage { min_chars: 30 },
                Rule::ContainsPrime,
                Rule::ZodiacAnimal,
                Rule::EvenScriptCount { script: Script::Hiragana },
            ]
            .into_iter()
            .map(|rule| CatalogEntry { rule, weight: 1.0 })
            .collect(),
        )
    }

    /// A catalog that always assigns `rule`.
    #[must_use]
    pub fn single(rule: Rule) -> Self {
        Self::new(vec![CatalogEntry { rule, weight: 1.0 }])
    }

    /// Add another rule.
    #[must_use]
    pub fn with_rule(mut self, rule: Rule, weight: f32) -> Self {
        self.entries.push(CatalogEntry { rule, weight });
        self
    }

    /// Pick a rule at random, by weight.
    pub fn choose(&self, rng: &mut RuleRng) -> Rule {
        let weights: Vec<f32> = self.entries.iter().map(|e| e.weight).collect();
        // `new` guarantees a positive total weight
        let index = rng.choose_weighted(&weights).unwrap_or(0);
        self.entries[index].rule
    }

    /// Is `rule` assignable from this catalog?
    #[must_use]
    pub fn contains(&self, rule: &Rule) -> bool {
        self.entries.iter().any(|e| e.rule == *rule && e.weight > 0.0)
    }

    /// Iterate over all rules.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.entries.iter().map(|e| &e.rule)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
