//! # Caching Module
//!
//! Memoizing wrappers around a [`FitnessComputer`]. Chromosomes are keyed by
//! the exact bit pattern of every gene, so two chromosomes share a cache
//! entry only if they are identical, step and angle genes included.
//!
//! Caching pays off for expensive fitness functions, where the same genome
//! reappears because an unmutated clone survived or because the 1/5-rule
//! mutator re-scores a chromosome it has already seen. The wrapped computer
//! is only called on a miss; the [`FitnessEvaluator`](crate::fitness::FitnessEvaluator)
//! in front of it still counts every request against the budget.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thread_local::ThreadLocal;

use crate::chromosome::{Chromosome, Representation};
use crate::fitness::FitnessComputer;

type CacheKey = Vec<u64>;

/// A fitness computer whose results are shared by every thread through a
/// mutex-guarded map.
pub struct CachedFitness<R, C>
where
    R: Representation,
    C: FitnessComputer<R>,
{
    computer: C,
    cache: Arc<Mutex<HashMap<CacheKey, f64>>>,
    _marker: PhantomData<R>,
}

impl<R, C> CachedFitness<R, C>
where
    R: Representation,
    C: FitnessComputer<R>,
{
    pub fn new(computer: C) -> Self {
        Self {
            computer,
            cache: Arc::new(Mutex::new(HashMap::new())),
            _marker: PhantomData,
        }
    }

    /// Returns a reference to the wrapped computer.
    pub fn inner(&self) -> &C {
        &self.computer
    }

    pub fn cache_size(&self) -> usize {
        self.lock().len()
    }

    pub fn clear_cache(&self) {
        self.lock().clear();
    }

    // A panic in another thread cannot leave a half-written entry behind.
    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, f64>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R, C> fmt::Debug for CachedFitness<R, C>
where
    R: Representation,
    C: FitnessComputer<R>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedFitness")
            .field("representation", &R::NAME)
            .field("cache_size", &self.cache_size())
            .finish()
    }
}

impl<R, C> FitnessComputer<R> for CachedFitness<R, C>
where
    R: Representation,
    C: FitnessComputer<R>,
{
    fn fitness(&self, chromosome: &Chromosome<R>) -> f64 {
        let key = chromosome.cache_key();
        if let Some(score) = self.lock().get(&key) {
            return *score;
        }

        // Computed outside the lock so parallel misses do not serialize.
        let score = self.computer.fitness(chromosome);
        self.lock().insert(key, score);
        score
    }
}

/// A fitness computer with one private cache per worker thread, avoiding
/// lock contention during parallel evaluation at the price of duplicate
/// entries across threads.
pub struct ThreadLocalCachedFitness<R, C>
where
    R: Representation,
    C: FitnessComputer<R>,
{
    computer: C,
    cache: ThreadLocal<RefCell<HashMap<CacheKey, f64>>>,
    _marker: PhantomData<R>,
}

impl<R, C> ThreadLocalCachedFitness<R, C>
where
    R: Representation,
    C: FitnessComputer<R>,
{
    pub fn new(computer: C) -> Self {
        Self {
            computer,
            cache: ThreadLocal::new(),
            _marker: PhantomData,
        }
    }

    pub fn inner(&self) -> &C {
        &self.computer
    }

    /// Number of entries cached by the calling thread.
    pub fn cache_size(&self) -> usize {
        self.cache.get().map_or(0, |cell| cell.borrow().len())
    }

    /// Clears the calling thread's cache.
    pub fn clear_cache(&self) {
        if let Some(cell) = self.cache.get() {
            cell.borrow_mut().clear();
        }
    }

    fn local(&self) -> &RefCell<HashMap<CacheKey, f64>> {
        self.cache.get_or(|| RefCell::new(HashMap::new()))
    }
}

impl<R, C> fmt::Debug for ThreadLocalCachedFitness<R, C>
where
    R: Representation,
    C: FitnessComputer<R>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadLocalCachedFitness")
            .field("representation", &R::NAME)
            .finish_non_exhaustive()
    }
}

impl<R, C> FitnessComputer<R> for ThreadLocalCachedFitness<R, C>
where
    R: Representation,
    C: FitnessComputer<R>,
{
    fn fitness(&self, chromosome: &Chromosome<R>) -> f64 {
        let key = chromosome.cache_key();
        let cache = self.local();
        if let Some(score) = cache.borrow().get(&key) {
            return *score;
        }

        let score = self.computer.fitness(chromosome);
        cache.borrow_mut().insert(key, score);
        score
    }
}
