//! Pooled cell storage
//!
//! [`PooledBuffer`] owns exactly one rented buffer and exposes exactly the
//! requested number of cells, even when the pool handed out a larger
//! allocation. The buffer goes back to the pool on [`PooledBuffer::release`]
//! or on drop.

use crate::buffer_pool::BufferPool;
use crate::error::{GridError, Result};
use std::sync::Arc;

/// Exclusively owned, fixed-length cell buffer backed by a [`BufferPool`]
pub struct PooledBuffer<T> {
    /// `None` once released
    data: Option<Vec<T>>,
    pool: Arc<BufferPool<T>>,
}

impl<T: Clone> PooledBuffer<T> {
    /// Rent a buffer of exactly `capacity` cells, each set to `fill`
    ///
    /// # Errors
    ///
    /// Returns `InvalidSize` if `capacity` is zero.
    pub fn allocate(pool: Arc<BufferPool<T>>, capacity: usize, fill: T) -> Result<Self> {
        if capacity == 0 {
            return Err(GridError::InvalidSize(
                "buffer capacity must be at least 1".to_string(),
            ));
        }

        let mut data = pool.rent(capacity);
        data.resize(capacity, fill);

        Ok(PooledBuffer {
            data: Some(data),
            pool,
        })
    }

    /// Copy the cells into a new exactly-sized `Vec`
    pub fn to_vec(&self) -> Vec<T> {
        self.slots().to_vec()
    }
}

impl<T> PooledBuffer<T> {
    /// Adopt an existing `Vec` as the buffer, without copying or refilling
    ///
    /// The `Vec` is handed to `pool` when this buffer is released.
    pub fn from_vec(pool: Arc<BufferPool<T>>, data: Vec<T>) -> Self {
        PooledBuffer {
            data: Some(data),
            pool,
        }
    }

    fn slots(&self) -> &[T] {
        match &self.data {
            Some(data) => data,
            None => panic!("invariant violated: cell buffer accessed after release"),
        }
    }

    fn slots_mut(&mut self) -> &mut [T] {
        match &mut self.data {
            Some(data) => data,
            None => panic!("invariant violated: cell buffer accessed after release"),
        }
    }

    /// Pool this buffer returns to
    pub fn pool(&self) -> &Arc<BufferPool<T>> {
        &self.pool
    }

    /// Number of usable cells
    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if the buffer has gone back to the pool
    pub fn is_released(&self) -> bool {
        self.data.is_none()
    }

    /// # Panics
    ///
    /// Panics if `index` is outside the buffer or the buffer was released.
    #[inline]
    pub fn get(&self, index: usize) -> &T {
        let slots = self.slots();
        let len = slots.len();
        match slots.get(index) {
            Some(value) => value,
            None => panic!(
                "invariant violated: index {} outside buffer of {} cells",
                index, len
            ),
        }
    }

    /// # Panics
    ///
    /// Panics if `index` is outside the buffer or the buffer was released.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> &mut T {
        let slots = self.slots_mut();
        let len = slots.len();
        match slots.get_mut(index) {
            Some(value) => value,
            None => panic!(
                "invariant violated: index {} outside buffer of {} cells",
                index, len
            ),
        }
    }

    /// # Panics
    ///
    /// Panics if `index` is outside the buffer or the buffer was released.
    #[inline]
    pub fn set(&mut self, index: usize, value: T) {
        *self.get_mut(index) = value;
    }

    /// Read-only view of the cells in storage order
    pub fn as_slice(&self) -> &[T] {
        self.slots()
    }

    /// Return the buffer to the pool; calling it again does nothing
    pub fn release(&mut self) {
        if let Some(data) = self.data.take() {
            self.pool.give_back(data);
        }
    }

    /// Take the cells out as an exactly-sized `Vec`
    ///
    /// When the rented allocation is larger than the cell count, the cells
    /// are moved into a fresh `Vec` and the larger allocation goes back to
    /// the pool, so the pool never loses track of one of its buffers.
    pub fn into_vec(mut self) -> Vec<T> {
        let Some(mut data) = self.data.take() else {
            panic!("invariant violated: cell buffer exported after release");
        };

        if data.capacity() == data.len() {
            return data;
        }

        let mut exact = Vec::with_capacity(data.len());
        exact.extend(data.drain(..));
        self.pool.give_back(data);
        exact
    }
}

impl<T: Clone> Clone for PooledBuffer<T> {
    /// Rent a second buffer from the same pool and copy the cells into it
    fn clone(&self) -> Self {
        let slots = self.slots();
        let mut data = self.pool.rent(slots.len());
        data.extend_from_slice(slots);
        PooledBuffer::from_vec(Arc::clone(&self.pool), data)
    }
}

impl<T> Drop for PooledBuffer<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for PooledBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledBuffer")
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}
