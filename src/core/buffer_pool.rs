//! Reusable cell-buffer pool
//!
//! Buffers are grouped into power-of-two capacity buckets. Renting a buffer
//! of `n` elements hands out an empty `Vec` whose capacity is the smallest
//! bucket that fits `n`, reusing an idle one when possible. Returned buffers
//! are cleared before they are stored, so a rented buffer never exposes
//! values written by its previous holder.
//!
//! One pool is shared by every grid of the same element type
//! ([`BufferPool::shared`]); custom pools can be created with
//! [`BufferPool::with_config`] and handed to a grid explicitly.

use crate::config::PoolConfig;
use crate::error::Result;
use parking_lot::Mutex;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::{debug, trace};

/// Buffer pool statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferPoolStats {
    /// Total rent requests
    pub rents: u64,
    /// Total buffers handed back
    pub returns: u64,
    /// Rents served from an idle buffer
    pub hits: u64,
    /// Rents that had to allocate
    pub misses: u64,
    /// Returned buffers dropped instead of kept
    pub discarded: u64,
    /// Idle buffers currently held
    pub pooled: usize,
}

impl BufferPoolStats {
    /// Calculate hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

#[derive(Debug)]
struct PoolInner<T> {
    /// Idle buffers keyed by capacity
    buckets: HashMap<usize, Vec<Vec<T>>>,
    rents: u64,
    returns: u64,
    hits: u64,
    misses: u64,
    discarded: u64,
}

impl<T> PoolInner<T> {
    fn new() -> Self {
        PoolInner {
            buckets: HashMap::new(),
            rents: 0,
            returns: 0,
            hits: 0,
            misses: 0,
            discarded: 0,
        }
    }

    fn pooled(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

/// Thread-safe pool of reusable `Vec<T>` buffers
#[derive(Debug)]
pub struct BufferPool<T> {
    config: PoolConfig,
    inner: Mutex<PoolInner<T>>,
}

impl<T> BufferPool<T> {
    /// Create a pool with the default configuration
    pub fn new() -> Self {
        Self::from_valid_config(PoolConfig::default())
    }

    /// Create a pool with a custom configuration
    ///
    /// # Errors
    ///
    /// Returns `Config` if `config` fails [`PoolConfig::validate`].
    pub fn with_config(config: PoolConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: PoolConfig) -> Self {
        BufferPool {
            config,
            inner: Mutex::new(PoolInner::new()),
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Capacity bucket serving `len` elements, or `None` if too large to pool
    fn bucket_for(&self, len: usize) -> Option<usize> {
        let bucket = len.max(1).checked_next_power_of_two()?;
        (bucket <= self.config.max_buffer_len).then_some(bucket)
    }

    /// Rent an empty buffer with capacity for at least `min_len` elements
    ///
    /// The returned `Vec` always has `len() == 0`.
    pub fn rent(&self, min_len: usize) -> Vec<T> {
        let mut inner = self.inner.lock();
        inner.rents += 1;

        let Some(bucket) = self.bucket_for(min_len) else {
            inner.misses += 1;
            drop(inner);
            trace!("Renting unpooled buffer of {} elements", min_len);
            return Vec::with_capacity(min_len);
        };

        if let Some(buffer) = inner.buckets.get_mut(&bucket).and_then(Vec::pop) {
            inner.hits += 1;
            drop(inner);
            trace!("Pool hit for {} elements (bucket {})", min_len, bucket);
            return buffer;
        }

        inner.misses += 1;
        drop(inner);
        trace!("Pool miss for {} elements (bucket {})", min_len, bucket);
        Vec::with_capacity(bucket)
    }

    /// Hand a buffer back to the pool
    ///
    /// The buffer is cleared first. It is kept only if its capacity is an
    /// exact bucket size and that bucket still has room; otherwise it is
    /// dropped.
    pub fn give_back(&self, mut buffer: Vec<T>) {
        buffer.clear();
        let capacity = buffer.capacity();

        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        inner.returns += 1;

        if self.bucket_for(capacity) != Some(capacity) {
            inner.discarded += 1;
            drop(guard);
            trace!("Dropping unpoolable buffer with capacity {}", capacity);
            return;
        }

        let limit = self.config.max_buffers_per_bucket;
        let bucket = inner.buckets.entry(capacity).or_default();
        if bucket.len() >= limit {
            inner.discarded += 1;
            drop(guard);
            debug!(
                "Bucket {} already holds {} buffers, dropping returned buffer",
                capacity, limit
            );
            return;
        }

        bucket.push(buffer);
        trace!("Returned buffer to bucket {}", capacity);
    }

    /// Get buffer pool statistics
    pub fn stats(&self) -> BufferPoolStats {
        let inner = self.inner.lock();
        BufferPoolStats {
            rents: inner.rents,
            returns: inner.returns,
            hits: inner.hits,
            misses: inner.misses,
            discarded: inner.discarded,
            pooled: inner.pooled(),
        }
    }

    /// Drop every idle buffer and reset statistics
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        *inner = PoolInner::new();
    }

    /// Number of idle buffers held
    pub fn len(&self) -> usize {
        self.inner.lock().pooled()
    }

    /// Check if the pool holds no idle buffers
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Send + 'static> BufferPool<T> {
    /// Process-wide pool for element type `T`
    ///
    /// Every call with the same `T` returns the same pool.
    pub fn shared() -> Arc<Self> {
        static REGISTRY: OnceLock<Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>>> =
            OnceLock::new();

        let mut pools = REGISTRY.get_or_init(Default::default).lock();
        let entry = pools
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Arc::new(BufferPool::<T>::new())));

        match entry.downcast_ref::<Arc<Self>>() {
            Some(pool) => Arc::clone(pool),
            None => panic!(
                "invariant violated: shared pool for {} registered with another type",
                std::any::type_name::<T>()
            ),
        }
    }
}

impl<T> Default for BufferPool<T> {
    fn default() -> Self {
        Self::new()
    }
}
