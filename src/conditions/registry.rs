//! Condition Registry

use rustc_hash::FxHashMap;

use crate::{bumps::BumpId, conditions::Condition};

/// Compiled top-level conditions for each bump.
///
/// Filled once while configuration loads and only read afterwards. A new configuration load
/// builds a new registry; there is no removal.
#[derive(Debug, Clone, Default)]
pub struct ConditionRegistry {
    conditions: FxHashMap<BumpId, Vec<Condition>>,
}

impl ConditionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append conditions for a bump, creating its entry if absent.
    pub fn register(&mut self, bump: BumpId, conditions: impl IntoIterator<Item = Condition>) {
        self.conditions.entry(bump).or_default().extend(conditions);
    }

    /// Conditions registered for a bump, or an empty slice for unknown bumps.
    pub fn get(&self, bump: BumpId) -> &[Condition] {
        self.conditions.get(&bump).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether the bump has an entry.
    pub fn contains(&self, bump: BumpId) -> bool {
        self.conditions.contains_key(&bump)
    }

    /// Number of bumps with an entry.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Check if no bump has an entry.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}
