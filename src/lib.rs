//! # coordmap - Dense Coordinate-Mapped Grids
//!
//! `coordmap` stores one value per integer cell of a bounded rectangle while
//! keeping track of three coordinate frames:
//!
//! - **World** coordinates, shared by every grid in a larger system
//! - **Local** coordinates, relative to the grid's own declared origin
//! - **Storage** indices into a flat, row-major buffer
//!
//! Cell buffers are rented from a per-element-type [`BufferPool`] and handed
//! back when a grid is disposed, dropped or resized.
//!
//! ## Quick Start
//!
//! ```rust
//! use coordmap::{CoordinateMap, Result};
//!
//! # fn main() -> Result<()> {
//! // 3x3 cells with the lower-left corner at world (0, 0)
//! // and local (0, 0) at world (5, 5)
//! let mut map = CoordinateMap::new(0, 0, 5, 5, 3, 3, 0u8)?;
//!
//! map.set(-5, -5, 7)?;
//! assert_eq!(*map.get(-5, -5)?, 7);
//! assert_eq!(map.world_to_local(0, 0), (-5, -5));
//!
//! // Enumeration is column-major: x outer, y inner
//! for (x, y, value) in &map {
//!     println!("({}, {}) = {}", x, y, value);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Resizing
//!
//! ```rust
//! use coordmap::{CoordinateMapBuilder, GridFrame, Result};
//!
//! # fn main() -> Result<()> {
//! let mut map = CoordinateMapBuilder::new()
//!     .min(0, 0)
//!     .size(4, 4)
//!     .fill(0i32)
//!     .build()?;
//! map.set_world(3, 3, 1)?;
//!
//! // Shift the rectangle by one cell; world positions are kept,
//! // cells that leave the rectangle are dropped
//! let map = map.resize(GridFrame::new(1, 1, 0, 0, 4, 4)?, -1)?;
//! assert_eq!(*map.get_world(3, 3)?, 1);
//! assert_eq!(*map.get_world(4, 4)?, -1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Serialization
//!
//! [`GridRecord`] is the serde shape of a grid: the six frame scalars plus
//! the cells in storage order. [`CoordinateMap::definition`] produces the
//! same record without cells.

pub mod core;

// Re-export core modules internally so crate:: paths in core still work
#[allow(unused_imports)]
pub(crate) use self::core::{buffer_pool, config, element, error, frame, map, record, storage};

pub use crate::core::{
    buffer_pool::{BufferPool, BufferPoolStats},
    config::{PoolConfig, DEFAULT_MAX_BUFFERS_PER_BUCKET, DEFAULT_MAX_BUFFER_LEN},
    element::Element,
    error::{GridError, Result},
    frame::GridFrame,
    map::{Coords, CoordinateMap, Iter, ResizeError},
    record::GridRecord,
    storage::PooledBuffer,
};

use std::sync::Arc;
use tracing::debug;

/// Builder for [`CoordinateMap`] instances
///
/// Unset fields default to: lower-left corner `(0, 0)`, origin `(0, 0)`,
/// fill `T::default()` and the shared pool for `T`. The size has no default.
///
/// # Examples
///
/// ```rust
/// use coordmap::{BufferPool, CoordinateMapBuilder, PoolConfig};
/// use std::sync::Arc;
///
/// let pool = Arc::new(BufferPool::with_config(PoolConfig::default()).unwrap());
/// let map = CoordinateMapBuilder::new()
///     .min(-8, -8)
///     .origin(0, 0)
///     .size(16, 16)
///     .fill(1.0f32)
///     .pool(pool)
///     .build()
///     .unwrap();
///
/// assert_eq!(map.capacity(), 256);
/// assert_eq!(map.local_min_x(), -8);
/// ```
#[derive(Debug)]
pub struct CoordinateMapBuilder<T> {
    min: (i32, i32),
    origin: (i32, i32),
    size: Option<(i32, i32)>,
    fill: Option<T>,
    pool: Option<Arc<BufferPool<T>>>,
}

impl<T: Element> CoordinateMapBuilder<T> {
    /// Create a new builder
    pub fn new() -> Self {
        CoordinateMapBuilder {
            min: (0, 0),
            origin: (0, 0),
            size: None,
            fill: None,
            pool: None,
        }
    }

    /// Set the world coordinate of the rectangle's lower-left corner
    pub fn min(mut self, x: i32, y: i32) -> Self {
        self.min = (x, y);
        self
    }

    /// Set the world coordinate of local `(0, 0)`
    pub fn origin(mut self, x: i32, y: i32) -> Self {
        self.origin = (x, y);
        self
    }

    /// Set the rectangle extents
    pub fn size(mut self, width: i32, height: i32) -> Self {
        self.size = Some((width, height));
        self
    }

    /// Set the initial value of every cell
    pub fn fill(mut self, fill: T) -> Self {
        self.fill = Some(fill);
        self
    }

    /// Rent cell buffers from `pool` instead of the shared pool
    pub fn pool(mut self, pool: Arc<BufferPool<T>>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Build the grid
    ///
    /// # Errors
    ///
    /// Returns `InvalidSize` if no size was set, plus every error of
    /// [`CoordinateMap::new`].
    pub fn build(self) -> Result<CoordinateMap<T>>
    where
        T: Default,
    {
        let (width, height) = self
            .size
            .ok_or_else(|| GridError::InvalidSize("size must be set".to_string()))?;

        let frame = GridFrame::new(
            self.min.0,
            self.min.1,
            self.origin.0,
            self.origin.1,
            width,
            height,
        )?;

        let fill = self.fill.unwrap_or_default();
        let pool = self.pool.unwrap_or_else(BufferPool::shared);
        debug!("Building coordinate map {}", frame);

        CoordinateMap::with_frame_in(frame, fill, pool)
    }
}

impl<T: Element> Default for CoordinateMapBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
