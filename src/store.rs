//! Counter store contract
//!
//! A store only knows how to load and save one counter by entity. It does no caching; that is up
//! to the caller (see `counter`).
use errors::*;
use entity::CountedEntity;
use farm::{FarmMap, new_farm};

pub trait CounterStore {
    /// Current persisted count, or `None` if the entity was never counted
    fn fetch(&mut self, entity: &CountedEntity) -> Result<Option<u64>>;

    /// Overwrite the persisted count
    fn persist(&mut self, entity: &CountedEntity, count: u64) -> Result<()>;
}

impl<'a, S: CounterStore + ?Sized> CounterStore for &'a mut S {
    fn fetch(&mut self, entity: &CountedEntity) -> Result<Option<u64>> {
        (**self).fetch(entity)
    }
    fn persist(&mut self, entity: &CountedEntity, count: u64) -> Result<()> {
        (**self).persist(entity, count)
    }
}

/// A store that lives only as long as the process
///
/// Keeps track of how often each entity was fetched, and can be told to start failing persists,
/// which is what the tests need.
#[derive(Default)]
pub struct MemoryStore {
    counts: FarmMap<CountedEntity, u64>,
    fetches: FarmMap<CountedEntity, usize>,
    persists: usize,
    fail_after: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            counts: new_farm(),
            fetches: new_farm(),
            persists: 0,
            fail_after: None,
        }
    }

    /// Persisted count, 0 if never persisted
    pub fn get(&self, entity: &CountedEntity) -> u64 {
        *self.counts.get(entity).unwrap_or(&0)
    }

    /// Write a count directly, as another process sharing the store would
    pub fn set(&mut self, entity: CountedEntity, count: u64) {
        self.counts.insert(entity, count);
    }

    pub fn fetches_of(&self, entity: &CountedEntity) -> usize {
        *self.fetches.get(entity).unwrap_or(&0)
    }

    /// Successful persists so far
    pub fn persists(&self) -> usize {
        self.persists
    }

    /// Let `n` more persists succeed, then fail every one after
    pub fn fail_persist_after(&mut self, n: usize) {
        self.fail_after = Some(self.persists + n);
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item=(&CountedEntity, &u64)> {
        self.counts.iter()
    }
}

impl CounterStore for MemoryStore {
    fn fetch(&mut self, entity: &CountedEntity) -> Result<Option<u64>> {
        *self.fetches.entry(entity.clone()).or_insert(0) += 1;
        Ok(self.counts.get(entity).cloned())
    }

    fn persist(&mut self, entity: &CountedEntity, count: u64) -> Result<()> {
        if let Some(limit) = self.fail_after {
            if self.persists >= limit {
                return Err(Error::StoreError(format!("refusing to persist {:?}", entity)));
            }
        }
        self.counts.insert(entity.clone(), count);
        self.persists += 1;
        Ok(())
    }
}
