use std::collections::HashMap;
use std::hash::Hash;

/// A mapping that records which keys were written since the last checkpoint.
///
/// Reads behave exactly like the underlying map. Every `insert`/`extend`
/// records the written value under its key; `remove` records the value that
/// was removed. `changes()` exposes the tracked writes and `clear_changes()`
/// checkpoints without touching the data itself.
#[derive(Debug, Clone)]
pub struct DirtyMap<K, V> {
    data: HashMap<K, V>,
    // Allocated on first write; `changes()` hands out an empty map before that.
    changes: Option<HashMap<K, V>>,
}

impl<K, V> DirtyMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        DirtyMap {
            data: HashMap::new(),
            changes: None,
        }
    }

    /// Wrap existing entries without marking them as changes.
    pub fn from_data(data: HashMap<K, V>) -> Self {
        DirtyMap {
            data,
            changes: None,
        }
    }

    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let old = self.data.insert(key.clone(), value.clone());
        self.track(key, value);
        old
    }

    pub fn extend<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            self.insert(key, value);
        }
    }

    /// Remove a key, recording the removed value as a change when it existed.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let old = self.data.remove(key);
        if let Some(old_value) = &old {
            self.track(key.clone(), old_value.clone());
        }
        old
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.data.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.data.get_mut(key)
    }

    /// Mutate a value in place, recording the key as changed when present.
    pub fn update<F>(&mut self, key: &K, f: F) -> bool
    where
        F: FnOnce(&mut V),
    {
        match self.data.get_mut(key) {
            Some(value) => {
                f(value);
                let updated = value.clone();
                self.track(key.clone(), updated);
                true
            }
            None => false,
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.data.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.data.iter()
    }

    pub fn data(&self) -> &HashMap<K, V> {
        &self.data
    }

    /// Writes since the last checkpoint. Empty before the first write.
    pub fn changes(&self) -> HashMap<K, V> {
        self.changes.clone().unwrap_or_default()
    }

    pub fn has_changes(&self) -> bool {
        self.changes.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Discard tracked changes; the data is untouched.
    pub fn clear_changes(&mut self) {
        self.changes = None;
    }

    fn track(&mut self, key: K, value: V) {
        self.changes.get_or_insert_with(HashMap::new).insert(key, value);
    }
}

impl<K, V> Default for DirtyMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        DirtyMap::new()
    }
}

impl<K, V> PartialEq for DirtyMap<K, V>
where
    K: Eq + Hash,
    V: PartialEq,
{
    // Change tracking is bookkeeping; equality is over the data.
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<K, V> FromIterator<(K, V)> for DirtyMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        DirtyMap::from_data(iter.into_iter().collect())
    }
}
