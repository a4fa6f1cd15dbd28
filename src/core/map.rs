//! Dense coordinate-mapped grid
//!
//! [`CoordinateMap`] stores one value per integer cell of a [`GridFrame`]
//! rectangle. Cells are addressed in local coordinates unless a method says
//! otherwise (`*_world`). Storage is row-major; enumeration is column-major
//! (x outer, y inner).

use crate::buffer_pool::BufferPool;
use crate::element::{check_fill, Element};
use crate::error::{GridError, Result};
use crate::frame::GridFrame;
use crate::storage::PooledBuffer;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::{Index, IndexMut};
use std::sync::Arc;
use tracing::debug;

/// Dense rectangular grid with world/local coordinate mapping
///
/// # Examples
///
/// ```
/// use coordmap::CoordinateMap;
///
/// # fn main() -> coordmap::Result<()> {
/// // 3x3 rectangle with its lower-left corner at world (0, 0),
/// // local origin at world (5, 5)
/// let mut map = CoordinateMap::new(0, 0, 5, 5, 3, 3, 0u8)?;
///
/// map.set(-5, -5, 7)?;
/// assert_eq!(*map.get(-5, -5)?, 7);
/// assert_eq!(map.world_to_local(0, 0), (-5, -5));
/// assert!(map.set(-2, -5, 1).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CoordinateMap<T> {
    frame: GridFrame,
    cells: PooledBuffer<T>,
}

impl<T: Element> CoordinateMap<T> {
    /// Create a grid backed by the shared pool for `T`
    ///
    /// # Arguments
    /// * `min_x`, `min_y` - World coordinate of the rectangle's lower-left corner
    /// * `origin_x`, `origin_y` - World coordinate of local `(0, 0)`
    /// * `width`, `height` - Rectangle extents
    /// * `fill` - Initial value of every cell
    ///
    /// # Errors
    ///
    /// - `InvalidSize` if either extent is below 1
    /// - `Overflow` if `width * height` or a rectangle bound leaves `i32`
    /// - `UnsupportedDefault` if `fill` is a non-empty handle
    pub fn new(
        min_x: i32,
        min_y: i32,
        origin_x: i32,
        origin_y: i32,
        width: i32,
        height: i32,
        fill: T,
    ) -> Result<Self> {
        let frame = GridFrame::new(min_x, min_y, origin_x, origin_y, width, height)?;
        Self::with_frame(frame, fill)
    }

    /// Create a grid for an existing frame, backed by the shared pool
    pub fn with_frame(frame: GridFrame, fill: T) -> Result<Self> {
        Self::with_frame_in(frame, fill, BufferPool::shared())
    }

    /// Create a grid for an existing frame, backed by `pool`
    pub fn with_frame_in(frame: GridFrame, fill: T, pool: Arc<BufferPool<T>>) -> Result<Self> {
        check_fill(&fill)?;
        let cells = PooledBuffer::allocate(pool, frame.capacity(), fill)?;
        debug!("Created coordinate map {}", frame);
        Ok(CoordinateMap { frame, cells })
    }

    /// Adopt `data` (storage order) as the cells of `frame` without copying
    ///
    /// # Errors
    ///
    /// Returns `LengthMismatch` unless `data.len() == frame.capacity()`.
    pub fn from_parts(frame: GridFrame, data: Vec<T>) -> Result<Self> {
        Self::from_parts_in(frame, data, BufferPool::shared())
    }

    /// Like [`CoordinateMap::from_parts`], returning the buffer to `pool` later
    pub fn from_parts_in(
        frame: GridFrame,
        data: Vec<T>,
        pool: Arc<BufferPool<T>>,
    ) -> Result<Self> {
        if data.len() != frame.capacity() {
            return Err(GridError::LengthMismatch {
                expected: frame.capacity(),
                actual: data.len(),
            });
        }
        debug!("Imported {} cells into coordinate map {}", data.len(), frame);
        Ok(CoordinateMap {
            frame,
            cells: PooledBuffer::from_vec(pool, data),
        })
    }

    /// Re-define the rectangle and origin, keeping every cell's world position
    ///
    /// Builds a new grid for `frame` filled with `fill`, copies every cell
    /// whose world coordinate lies inside both rectangles, then hands the old
    /// buffer back to the pool. Cells outside the new rectangle are dropped.
    /// Both buffers are alive while cells are copied.
    ///
    /// # Errors
    ///
    /// Fails with `UnsupportedDefault` for a rejected `fill`, or when the new
    /// buffer cannot be set up. The untouched grid is handed back inside the
    /// [`ResizeError`].
    ///
    /// # Examples
    ///
    /// ```
    /// use coordmap::{CoordinateMap, GridFrame};
    ///
    /// # fn main() -> coordmap::Result<()> {
    /// let mut map = CoordinateMap::new(0, 0, 0, 0, 4, 4, 0i32)?;
    /// map.set_world(2, 2, 9)?;
    ///
    /// // grow by two on every side and move the origin
    /// let map = map.resize(GridFrame::new(-2, -2, 10, 10, 8, 8)?, -1)?;
    /// assert_eq!(*map.get_world(2, 2)?, 9);
    /// assert_eq!(*map.get_world(-2, -2)?, -1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn resize(self, frame: GridFrame, fill: T) -> std::result::Result<Self, ResizeError<T>> {
        let pool = Arc::clone(self.cells.pool());
        let mut target = match Self::with_frame_in(frame, fill, pool) {
            Ok(target) => target,
            Err(error) => return Err(ResizeError { map: self, error }),
        };

        let kept = match self.migrate_into(&mut target) {
            Ok(kept) => kept,
            Err(error) => return Err(ResizeError { map: self, error }),
        };

        debug!(
            "Resized coordinate map from {} to {} (kept {} of {} cells)",
            self.frame,
            target.frame,
            kept,
            self.capacity()
        );
        self.dispose();
        Ok(target)
    }

    /// Copy every cell of `self` that `target` covers in world space
    fn migrate_into(&self, target: &mut Self) -> Result<usize> {
        let mut kept = 0;
        for (x, y, value) in self.iter() {
            let (gx, gy) = self.frame.local_to_world(x, y);
            let (tx, ty) = target.frame.world_to_local(gx, gy);
            if target.frame.is_out_of_range(tx, ty) {
                continue;
            }
            let index = target.frame.index_of(tx, ty)?;
            target.cells.set(index, value.clone());
            kept += 1;
        }
        Ok(kept)
    }

    /// Copy of the cells in storage (row-major) order
    pub fn to_vec(&self) -> Vec<T> {
        self.cells.to_vec()
    }
}

impl<T> CoordinateMap<T> {
    pub fn frame(&self) -> &GridFrame {
        &self.frame
    }

    pub fn width(&self) -> i32 {
        self.frame.width()
    }

    pub fn height(&self) -> i32 {
        self.frame.height()
    }

    pub fn capacity(&self) -> usize {
        self.frame.capacity()
    }

    pub fn origin_x(&self) -> i32 {
        self.frame.origin_x()
    }

    pub fn origin_y(&self) -> i32 {
        self.frame.origin_y()
    }

    pub fn min_x(&self) -> i32 {
        self.frame.min_x()
    }

    pub fn min_y(&self) -> i32 {
        self.frame.min_y()
    }

    pub fn world_max_x(&self) -> i32 {
        self.frame.world_max_x()
    }

    pub fn world_max_y(&self) -> i32 {
        self.frame.world_max_y()
    }

    pub fn local_min_x(&self) -> i32 {
        self.frame.local_min_x()
    }

    pub fn local_min_y(&self) -> i32 {
        self.frame.local_min_y()
    }

    pub fn local_max_x(&self) -> i32 {
        self.frame.local_max_x()
    }

    pub fn local_max_y(&self) -> i32 {
        self.frame.local_max_y()
    }

    /// Pool the cell buffer returns to
    pub fn pool(&self) -> &Arc<BufferPool<T>> {
        self.cells.pool()
    }

    #[inline]
    pub fn world_to_local(&self, gx: i32, gy: i32) -> (i32, i32) {
        self.frame.world_to_local(gx, gy)
    }

    #[inline]
    pub fn local_to_world(&self, x: i32, y: i32) -> (i32, i32) {
        self.frame.local_to_world(x, y)
    }

    #[inline]
    pub fn is_out_of_range(&self, x: i32, y: i32) -> bool {
        self.frame.is_out_of_range(x, y)
    }

    #[inline]
    pub fn contains_world(&self, gx: i32, gy: i32) -> bool {
        self.frame.contains_world(gx, gy)
    }

    #[inline]
    fn cell_index(&self, x: i32, y: i32) -> Result<usize> {
        if self.frame.is_out_of_range(x, y) {
            return Err(GridError::OutOfRange { x, y });
        }
        self.frame.index_of(x, y)
    }

    /// # Errors
    ///
    /// Returns `OutOfRange` if `(x, y)` has no cell.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Result<&T> {
        let index = self.cell_index(x, y)?;
        Ok(self.cells.get(index))
    }

    /// # Errors
    ///
    /// Returns `OutOfRange` if `(x, y)` has no cell.
    #[inline]
    pub fn get_mut(&mut self, x: i32, y: i32) -> Result<&mut T> {
        let index = self.cell_index(x, y)?;
        Ok(self.cells.get_mut(index))
    }

    /// # Errors
    ///
    /// Returns `OutOfRange` if `(x, y)` has no cell.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: T) -> Result<()> {
        let index = self.cell_index(x, y)?;
        self.cells.set(index, value);
        Ok(())
    }

    /// Read the cell at a world coordinate
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` (carrying the world coordinate) if the rectangle
    /// does not cover `(gx, gy)`.
    pub fn get_world(&self, gx: i32, gy: i32) -> Result<&T> {
        if !self.frame.contains_world(gx, gy) {
            return Err(GridError::OutOfRange { x: gx, y: gy });
        }
        let (x, y) = self.frame.world_to_local(gx, gy);
        self.get(x, y)
    }

    /// Write the cell at a world coordinate
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` (carrying the world coordinate) if the rectangle
    /// does not cover `(gx, gy)`.
    pub fn set_world(&mut self, gx: i32, gy: i32, value: T) -> Result<()> {
        if !self.frame.contains_world(gx, gy) {
            return Err(GridError::OutOfRange { x: gx, y: gy });
        }
        let (x, y) = self.frame.world_to_local(gx, gy);
        self.set(x, y, value)
    }

    /// Every local coordinate, x outer and y inner
    pub fn coords(&self) -> Coords {
        Coords::new(&self.frame)
    }

    /// Every cell as `(x, y, &value)`, x outer and y inner
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            coords: self.coords(),
            frame: self.frame,
            cells: self.cells.as_slice(),
        }
    }

    /// Visit every cell mutably in the same order as [`CoordinateMap::iter`]
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(i32, i32, &mut T),
    {
        for (x, y) in self.coords() {
            let index = self.frame.offset_of(x, y);
            f(x, y, self.cells.get_mut(index));
        }
    }

    /// Flat view of the cells in storage (row-major) order
    pub fn as_slice(&self) -> &[T] {
        self.cells.as_slice()
    }

    /// One slice per row, from `local_min_y` upwards, each `width` cells long
    pub fn rows(&self) -> std::slice::Chunks<'_, T> {
        self.cells.as_slice().chunks(self.frame.width() as usize)
    }

    /// Split into the frame and an exactly-sized cell `Vec` (storage order)
    pub fn into_parts(self) -> (GridFrame, Vec<T>) {
        let CoordinateMap { frame, cells } = self;
        debug!("Exporting {} cells of coordinate map {}", cells.len(), frame);
        (frame, cells.into_vec())
    }

    /// Hand the cell buffer back to the pool
    ///
    /// Dropping the grid does the same; this only makes the intent explicit.
    pub fn dispose(self) {
        debug!("Disposing coordinate map {}", self.frame);
        drop(self);
    }
}

impl<T: Element> Clone for CoordinateMap<T> {
    fn clone(&self) -> Self {
        CoordinateMap {
            frame: self.frame,
            cells: self.cells.clone(),
        }
    }
}

impl<T: PartialEq> PartialEq for CoordinateMap<T> {
    fn eq(&self, other: &Self) -> bool {
        self.frame == other.frame && self.as_slice() == other.as_slice()
    }
}

impl<T> Index<(i32, i32)> for CoordinateMap<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if the local coordinate has no cell.
    fn index(&self, (x, y): (i32, i32)) -> &T {
        match self.get(x, y) {
            Ok(value) => value,
            Err(error) => panic!("{}", error),
        }
    }
}

impl<T> IndexMut<(i32, i32)> for CoordinateMap<T> {
    /// # Panics
    ///
    /// Panics if the local coordinate has no cell.
    fn index_mut(&mut self, (x, y): (i32, i32)) -> &mut T {
        match self.get_mut(x, y) {
            Ok(value) => value,
            Err(error) => panic!("{}", error),
        }
    }
}

impl<'a, T> IntoIterator for &'a CoordinateMap<T> {
    type Item = (i32, i32, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Failed [`CoordinateMap::resize`], carrying the unchanged grid
pub struct ResizeError<T> {
    map: CoordinateMap<T>,
    error: GridError,
}

impl<T> ResizeError<T> {
    pub fn error(&self) -> &GridError {
        &self.error
    }

    /// Recover the grid that was being resized
    pub fn into_inner(self) -> CoordinateMap<T> {
        self.map
    }

    pub fn into_parts(self) -> (CoordinateMap<T>, GridError) {
        (self.map, self.error)
    }
}

impl<T> fmt::Debug for ResizeError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizeError")
            .field("frame", &self.map.frame)
            .field("error", &self.error)
            .finish()
    }
}

impl<T> fmt::Display for ResizeError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resize of {} failed: {}", self.map.frame, self.error)
    }
}

impl<T> std::error::Error for ResizeError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<T> From<ResizeError<T>> for GridError {
    fn from(err: ResizeError<T>) -> Self {
        err.error
    }
}

/// Column-major walk over the local coordinates of a frame
#[derive(Debug, Clone)]
pub struct Coords {
    x: i32,
    y: i32,
    min_y: i32,
    max_y: i32,
    remaining: usize,
}

impl Coords {
    fn new(frame: &GridFrame) -> Self {
        Coords {
            x: frame.local_min_x(),
            y: frame.local_min_y(),
            min_y: frame.local_min_y(),
            max_y: frame.local_max_y(),
            remaining: frame.capacity(),
        }
    }
}

impl Iterator for Coords {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = (self.x, self.y);
        self.remaining -= 1;
        self.y += 1;
        if self.y == self.max_y {
            self.y = self.min_y;
            self.x += 1;
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Coords {}

impl FusedIterator for Coords {}

/// Column-major walk over the cells of a [`CoordinateMap`]
pub struct Iter<'a, T> {
    coords: Coords,
    frame: GridFrame,
    cells: &'a [T],
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (i32, i32, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let (x, y) = self.coords.next()?;
        let value = &self.cells[self.frame.offset_of(x, y)];
        Some((x, y, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.coords.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            coords: self.coords.clone(),
            frame: self.frame,
            cells: self.cells,
        }
    }
}

impl<T> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("frame", &self.frame)
            .field("remaining", &self.coords.remaining)
            .finish()
    }
}
