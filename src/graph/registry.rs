//! Symbol registry: canonical module name to stable identity.
//!
//! A separately-chained hash table. Chains are index links into the entry
//! storage rather than pointers, and because identities are issued densely the
//! entry at position `i` is always the one holding `ModuleId(i)`.

use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

use super::engine::try_owned;
use super::types::ModuleId;
use crate::error::{PycycleError, Result};

/// Bucket count used by [`SymbolRegistry::new`].
pub const DEFAULT_CAPACITY: usize = 1024;

#[derive(Debug, Clone)]
struct SymbolEntry {
    name: String,
    id: ModuleId,
    /// Next entry in the same bucket.
    next: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct SymbolRegistry {
    /// Head entry of each chain.
    buckets: Vec<Option<usize>>,
    entries: Vec<SymbolEntry>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a registry with `capacity` buckets (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: vec![None; capacity.max(1)],
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current bucket count. Doubles once occupancy reaches it.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Look up the identity of `name` without registering it.
    pub fn get(&self, name: &str) -> Option<ModuleId> {
        let mut cursor = self.buckets[bucket_of(name, self.buckets.len())];
        while let Some(index) = cursor {
            let entry = &self.entries[index];
            if entry.name == name {
                return Some(entry.id);
            }
            cursor = entry.next;
        }
        None
    }

    /// The name registered for `id`.
    pub fn name(&self, id: ModuleId) -> Option<&str> {
        self.entries.get(id.index()).map(|entry| entry.name.as_str())
    }

    /// Return the identity for `name`, registering it on first sight.
    ///
    /// Equal strings always yield the same identity. On allocation failure
    /// nothing is registered and existing mappings are unchanged.
    pub fn resolve_or_create(&mut self, name: &str) -> Result<ModuleId> {
        if let Some(id) = self.get(name) {
            return Ok(id);
        }
        self.insert_new(name)
    }

    /// All registered names in identity order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ModuleId)> + '_ {
        self.entries
            .iter()
            .map(|entry| (entry.name.as_str(), entry.id))
    }

    fn insert_new(&mut self, name: &str) -> Result<ModuleId> {
        if self.entries.len() >= self.buckets.len() {
            self.grow()?;
        }
        self.entries
            .try_reserve(1)
            .map_err(PycycleError::alloc("registry entries"))?;
        let key = try_owned(name, "registry key")?;

        let id = ModuleId::new(self.entries.len());
        let bucket = bucket_of(name, self.buckets.len());
        self.entries.push(SymbolEntry {
            name: key,
            id,
            next: self.buckets[bucket],
        });
        self.buckets[bucket] = Some(id.index());
        Ok(id)
    }

    /// Double the bucket count and relink every chain.
    fn grow(&mut self) -> Result<()> {
        let new_capacity = self.buckets.len().saturating_mul(2);
        let mut buckets: Vec<Option<usize>> = Vec::new();
        buckets
            .try_reserve_exact(new_capacity)
            .map_err(PycycleError::alloc("registry buckets"))?;
        buckets.resize(new_capacity, None);

        for (index, entry) in self.entries.iter_mut().enumerate() {
            let bucket = bucket_of(&entry.name, new_capacity);
            entry.next = buckets[bucket];
            buckets[bucket] = Some(index);
        }

        debug!(
            from = self.buckets.len(),
            to = new_capacity,
            entries = self.entries.len(),
            "registry rehashed"
        );
        self.buckets = buckets;
        Ok(())
    }
}

impl Default for SymbolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn bucket_of(name: &str, capacity: usize) -> usize {
    (xxh3_64(name.as_bytes()) % capacity as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_equal_names_share_identity() {
        let mut registry = SymbolRegistry::new();
        let a = registry.resolve_or_create("app.models").unwrap();
        let b = registry.resolve_or_create("app.views").unwrap();
        let again = registry.resolve_or_create(&String::from("app.models")).unwrap();

        assert_eq!(a, again);
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_identities_are_dense_and_first_seen() {
        let mut registry = SymbolRegistry::new();
        for (i, name) in ["c", "a", "b"].iter().enumerate() {
            assert_eq!(registry.resolve_or_create(name).unwrap(), ModuleId::new(i));
        }
        assert_eq!(registry.resolve_or_create("a").unwrap(), ModuleId::new(1));
        assert_eq!(registry.name(ModuleId::new(2)), Some("b"));
        assert_eq!(registry.name(ModuleId::new(3)), None);
    }

    #[test]
    fn test_get_does_not_register() {
        let registry = SymbolRegistry::new();
        assert_eq!(registry.get("missing"), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_growth_preserves_every_mapping() {
        let mut registry = SymbolRegistry::with_capacity(2);
        let names: Vec<String> = (0..300).map(|i| format!("pkg.mod_{i}")).collect();
        let ids: Vec<ModuleId> = names
            .iter()
            .map(|name| registry.resolve_or_create(name).unwrap())
            .collect();

        assert!(registry.capacity() >= 300);
        for (name, id) in names.iter().zip(&ids) {
            assert_eq!(registry.get(name), Some(*id));
            assert_eq!(registry.name(*id), Some(name.as_str()));
        }
    }

    #[test]
    fn test_single_bucket_rehashes_on_second_insert() {
        let mut registry = SymbolRegistry::with_capacity(1);
        let a = registry.resolve_or_create("a").unwrap();
        assert_eq!(registry.capacity(), 1);
        let b = registry.resolve_or_create("b").unwrap();
        assert_eq!(registry.capacity(), 2);
        assert_eq!(registry.get("a"), Some(a));
        assert_eq!(registry.get("b"), Some(b));
    }

    #[test]
    fn test_iter_is_identity_ordered() {
        let mut registry = SymbolRegistry::with_capacity(4);
        for name in ["x", "y", "z", "w", "v"] {
            registry.resolve_or_create(name).unwrap();
        }
        let names: Vec<&str> = registry.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["x", "y", "z", "w", "v"]);
    }

    proptest! {
        #[test]
        fn prop_identities_match_first_occurrence(
            names in proptest::collection::vec("[a-c]{1,3}(\\.[a-c]{1,2}){0,2}", 0..80)
        ) {
            let mut registry = SymbolRegistry::with_capacity(3);
            let mut seen: Vec<String> = Vec::new();
            for name in &names {
                let id = registry.resolve_or_create(name).unwrap();
                let expected = match seen.iter().position(|s| s == name) {
                    Some(pos) => pos,
                    None => {
                        seen.push(name.clone());
                        seen.len() - 1
                    }
                };
                prop_assert_eq!(id, ModuleId::new(expected));
            }
            prop_assert_eq!(registry.len(), seen.len());
        }
    }
}
