//! Increment-and-persist for a single entity
//!
//! The first time a process touches an entity its count is loaded from the store, picking up
//! whatever earlier runs accumulated. After that the in-memory value is the truth for this
//! process, and every increment is written straight through.
//!
//! This is not safe against several processes counting the same entity at once. Once a process
//! has loaded a counter it never looks at the store again, so an increment another process makes
//! after that point is overwritten on our next persist. Keys are spread thinly enough (pairs,
//! disjuncts) that such races are rare, but they do happen and the lost increments are not
//! recovered.
use errors::*;
use entity::CountedEntity;
use farm::{FarmMap, new_farm};
use store::CounterStore;

pub struct Counter<S> {
    store: S,
    live: FarmMap<CountedEntity, u64>,
}

impl<S: CounterStore> Counter<S> {
    pub fn new(store: S) -> Self {
        Counter {
            store: store,
            live: new_farm(),
        }
    }

    /// Add one to `entity` and persist it. Returns the new count.
    pub fn count_one(&mut self, entity: &CountedEntity) -> Result<u64> {
        self.count_by(entity, 1)
    }

    /// Add `n` to `entity` and persist it
    pub fn count_by(&mut self, entity: &CountedEntity, n: u64) -> Result<u64> {
        let current = match self.live.get(entity) {
            Some(&count) => count,
            None => {
                let seed = self.store.fetch(entity)?.unwrap_or(0);
                self.live.insert(entity.clone(), seed);
                seed
            }
        };
        let next = current + n;
        if let Err(err) = self.store.persist(entity, next) {
            warn!("Could not persist {:?} = {}: {}", entity, next, err);
            return Err(err);
        }
        self.live.insert(entity.clone(), next);
        Ok(next)
    }

    /// The count this process believes in, if it has touched `entity`
    pub fn cached(&self, entity: &CountedEntity) -> Option<u64> {
        self.live.get(entity).cloned()
    }

    /// Number of entities touched so far
    pub fn touched(&self) -> usize {
        self.live.len()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryStore;

    fn word(w: &str) -> CountedEntity { CountedEntity::WordEntity(w.into()) }

    #[test]
    fn fetches_once_per_key() {
        let mut counter = Counter::new(MemoryStore::new());
        for _ in 0..5 {
            counter.count_one(&word("dog")).unwrap();
        }
        counter.count_one(&word("cat")).unwrap();
        assert_eq!(counter.store().fetches_of(&word("dog")), 1);
        assert_eq!(counter.store().fetches_of(&word("cat")), 1);
        assert_eq!(counter.store().get(&word("dog")), 5);
        assert_eq!(counter.store().persists(), 6);
    }

    #[test]
    fn resumes_from_earlier_runs() {
        let mut store = MemoryStore::new();
        store.set(word("dog"), 41);
        let mut counter = Counter::new(store);
        assert_eq!(counter.count_one(&word("dog")).unwrap(), 42);
        assert_eq!(counter.count_by(&word("dog"), 3).unwrap(), 45);
    }

    #[test]
    fn concurrent_increments_after_first_touch_are_lost() {
        let mut counter = Counter::new(MemoryStore::new());
        counter.count_one(&word("dog")).unwrap();
        // another process adds 10 behind our back
        counter.store_mut().set(word("dog"), 11);
        counter.count_one(&word("dog")).unwrap();
        assert_eq!(counter.store().get(&word("dog")), 2);
    }

    #[test]
    fn failed_persist_keeps_seed_but_not_increment() {
        let mut store = MemoryStore::new();
        store.set(word("dog"), 7);
        store.fail_persist_after(0);
        let mut counter = Counter::new(store);
        assert!(counter.count_one(&word("dog")).unwrap_err().is_store_error());
        assert_eq!(counter.cached(&word("dog")), Some(7));
        assert_eq!(counter.store().get(&word("dog")), 7);

        counter.store_mut().fail_persist_after(10);
        assert_eq!(counter.count_one(&word("dog")).unwrap(), 8);
        assert_eq!(counter.store().fetches_of(&word("dog")), 1);
    }
}
