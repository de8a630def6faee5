use std::{collections::HashMap, hash::Hash, sync::RwLock};

/// Generic in-memory key/value repository guarded by a reader/writer lock.
///
/// One instance is meant to be shared by many threads: every method takes
/// `&self` and does its own locking. Reads hand back owned clones, so no
/// reference into the map ever escapes the lock.
#[derive(Debug, Default)]
pub struct InMemoryRepo<T, Id> {
    storage: RwLock<HashMap<Id, T>>,
}

impl<T, Id> InMemoryRepo<T, Id>
where
    Id: Clone + Eq + Hash,
    T: Clone,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: RwLock::new(HashMap::new()),
        }
    }

    /// Insert `item` under `id`, replacing any previous entry.
    pub fn insert(&self, id: Id, item: T) {
        self.storage.write().unwrap().insert(id, item);
    }

    /// Clone of the entry stored under `id`, if any.
    pub fn get(&self, id: &Id) -> Option<T> {
        self.storage.read().unwrap().get(id).cloned()
    }

    /// First entry satisfying `predicate`. Map iteration order is
    /// unspecified, so ties between matching entries are arbitrary.
    pub fn find<P>(&self, predicate: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        self.storage
            .read()
            .unwrap()
            .values()
            .find(|item| predicate(item))
            .cloned()
    }

    /// Mutate the entry under `id` in place and return a clone of the
    /// updated value. Leaves the map untouched when the key is absent.
    pub fn update<F>(&self, id: &Id, f: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let mut storage = self.storage.write().unwrap();
        let item = storage.get_mut(id)?;
        f(item);
        Some(item.clone())
    }

    /// Snapshot of all stored values, in unspecified order.
    #[must_use]
    pub fn values(&self) -> Vec<T> {
        self.storage.read().unwrap().values().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.read().unwrap().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.read().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use super::*;

    #[test]
    fn test_insert_then_get() {
        let repo: InMemoryRepo<String, u32> = InMemoryRepo::new();
        repo.insert(1, "one".to_string());

        assert_eq!(repo.get(&1), Some("one".to_string()));
        assert_eq!(repo.get(&2), None);
    }

    #[test]
    fn test_insert_replaces_existing_entry() {
        let repo: InMemoryRepo<String, u32> = InMemoryRepo::new();
        repo.insert(1, "first".to_string());
        repo.insert(1, "second".to_string());

        assert_eq!(repo.get(&1), Some("second".to_string()));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_find_by_predicate() {
        let repo: InMemoryRepo<String, u32> = InMemoryRepo::new();
        repo.insert(1, "apple".to_string());
        repo.insert(2, "banana".to_string());

        assert_eq!(
            repo.find(|item| item.starts_with('b')),
            Some("banana".to_string())
        );
        assert_eq!(repo.find(|item| item.starts_with('c')), None);
    }

    #[test]
    fn test_update_in_place() {
        let repo: InMemoryRepo<String, u32> = InMemoryRepo::new();
        repo.insert(1, "before".to_string());

        let updated = repo.update(&1, |item| *item = "after".to_string());

        assert_eq!(updated, Some("after".to_string()));
        assert_eq!(repo.get(&1), Some("after".to_string()));
    }

    #[test]
    fn test_update_absent_key_leaves_map_untouched() {
        let repo: InMemoryRepo<String, u32> = InMemoryRepo::new();
        repo.insert(1, "only".to_string());

        assert_eq!(repo.update(&2, |item| item.clear()), None);
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.get(&1), Some("only".to_string()));
    }

    #[test]
    fn test_get_returns_a_copy() {
        let repo: InMemoryRepo<String, u32> = InMemoryRepo::new();
        repo.insert(1, "original".to_string());

        let mut copy = repo.get(&1).unwrap();
        copy.push_str("-mutated");

        assert_eq!(repo.get(&1), Some("original".to_string()));
    }

    #[test]
    fn test_values_and_emptiness() {
        let repo: InMemoryRepo<String, u32> = InMemoryRepo::new();
        assert!(repo.is_empty());
        assert!(repo.values().is_empty());

        repo.insert(1, "a".to_string());
        repo.insert(2, "b".to_string());

        let mut values = repo.values();
        values.sort();
        assert_eq!(values, vec!["a".to_string(), "b".to_string()]);
        assert!(!repo.is_empty());
    }

    #[test]
    fn test_concurrent_inserts_are_not_lost() {
        let repo: Arc<InMemoryRepo<String, u32>> = Arc::new(InMemoryRepo::new());
        let num_threads = 8;
        let inserts_per_thread = 100;

        let handles: Vec<_> = (0..num_threads)
            .map(|thread_id| {
                let repo = Arc::clone(&repo);
                thread::spawn(move || {
                    for i in 0..inserts_per_thread {
                        let key = thread_id * inserts_per_thread + i;
                        repo.insert(key, format!("value-{key}"));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(repo.len() as u32, num_threads * inserts_per_thread);
        for key in 0..(num_threads * inserts_per_thread) {
            assert_eq!(repo.get(&key), Some(format!("value-{key}")));
        }
    }
}
