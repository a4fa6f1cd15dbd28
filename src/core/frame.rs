//! Grid frame: rectangle, local origin and the coordinate engine
//!
//! A frame ties three coordinate systems together:
//!
//! - **world**: absolute coordinates shared by every grid
//! - **local**: world coordinates shifted so that the frame origin is `(0, 0)`
//! - **storage**: the flat row-major index into the cell buffer
//!
//! Every [`GridFrame`] value is validated on construction (and on
//! deserialization), so the derived bounds never overflow `i32`.

use crate::error::{GridError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Definition of a grid without its cell data
///
/// Holds the world-space rectangle (`min_x`, `min_y`, `width`, `height`)
/// and the world position of the local origin (`origin_x`, `origin_y`).
///
/// # Invariants
/// - `width >= 1` and `height >= 1`
/// - `width * height` fits in `i32`
/// - world and local rectangle bounds fit in `i32`
///
/// # Examples
///
/// ```
/// use coordmap::GridFrame;
///
/// let frame = GridFrame::new(0, 0, 5, 5, 3, 3).unwrap();
/// assert_eq!(frame.world_to_local(0, 0), (-5, -5));
/// assert_eq!(frame.local_min_x(), -5);
/// assert_eq!(frame.local_max_x(), -2);
/// assert!(frame.is_out_of_range(-2, -5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "FrameFields", into = "FrameFields")]
pub struct GridFrame {
    origin_x: i32,
    origin_y: i32,
    min_x: i32,
    min_y: i32,
    width: i32,
    height: i32,
}

/// Unvalidated wire shape of a [`GridFrame`]
#[derive(Serialize, Deserialize)]
struct FrameFields {
    origin_x: i32,
    origin_y: i32,
    min_x: i32,
    min_y: i32,
    width: i32,
    height: i32,
}

impl GridFrame {
    /// Create a validated frame
    ///
    /// # Arguments
    /// * `min_x`, `min_y` - World coordinate of the rectangle's lower-left corner
    /// * `origin_x`, `origin_y` - World coordinate of local `(0, 0)`
    /// * `width`, `height` - Rectangle extents
    ///
    /// # Errors
    ///
    /// - `InvalidSize` if either extent is below 1
    /// - `Overflow` if the capacity or any rectangle bound leaves `i32`
    ///
    /// The bound check is stricter than the capacity check: the world maximum
    /// and both local bounds must fit `i32` too, so a small rectangle far
    /// from its origin can be rejected even though `width * height` fits.
    /// For example `GridFrame::new(-2_000_000_000, 0, 2_000_000_000, 0, 2, 2)`
    /// fails because its local minimum x would be `-4_000_000_000`.
    pub fn new(
        min_x: i32,
        min_y: i32,
        origin_x: i32,
        origin_y: i32,
        width: i32,
        height: i32,
    ) -> Result<Self> {
        let frame = GridFrame {
            origin_x,
            origin_y,
            min_x,
            min_y,
            width,
            height,
        };
        frame.validate()?;
        Ok(frame)
    }

    fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(GridError::InvalidSize(format!(
                "{}x{} (both extents must be at least 1)",
                self.width, self.height
            )));
        }

        self.width.checked_mul(self.height).ok_or_else(|| {
            GridError::Overflow(format!(
                "grid of {}x{} cells is too large",
                self.width, self.height
            ))
        })?;

        let bound = |axis: &str, min: i32, origin: i32, extent: i32| -> Result<()> {
            let overflow = || {
                GridError::Overflow(format!(
                    "{} bounds of rectangle at {} (origin {}, extent {}) leave i32",
                    axis, min, origin, extent
                ))
            };
            min.checked_add(extent).ok_or_else(overflow)?;
            min.checked_sub(origin)
                .and_then(|local_min| local_min.checked_add(extent))
                .ok_or_else(overflow)?;
            Ok(())
        };
        bound("x", self.min_x, self.origin_x, self.width)?;
        bound("y", self.min_y, self.origin_y, self.height)?;

        Ok(())
    }

    pub fn origin_x(&self) -> i32 {
        self.origin_x
    }

    pub fn origin_y(&self) -> i32 {
        self.origin_y
    }

    /// World x of the rectangle's first column
    pub fn min_x(&self) -> i32 {
        self.min_x
    }

    /// World y of the rectangle's first row
    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    /// World x one past the last column
    pub fn world_max_x(&self) -> i32 {
        self.min_x + self.width
    }

    /// World y one past the last row
    pub fn world_max_y(&self) -> i32 {
        self.min_y + self.height
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn local_min_x(&self) -> i32 {
        self.min_x - self.origin_x
    }

    #[inline]
    pub fn local_min_y(&self) -> i32 {
        self.min_y - self.origin_y
    }

    /// Exclusive upper bound of local x
    #[inline]
    pub fn local_max_x(&self) -> i32 {
        self.local_min_x() + self.width
    }

    /// Exclusive upper bound of local y
    #[inline]
    pub fn local_max_y(&self) -> i32 {
        self.local_min_y() + self.height
    }

    /// Number of cells (`width * height`)
    #[inline]
    pub fn capacity(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Project a world coordinate into this frame's local coordinates
    #[inline]
    pub fn world_to_local(&self, gx: i32, gy: i32) -> (i32, i32) {
        (gx.wrapping_sub(self.origin_x), gy.wrapping_sub(self.origin_y))
    }

    /// Project a local coordinate back into world coordinates
    #[inline]
    pub fn local_to_world(&self, x: i32, y: i32) -> (i32, i32) {
        (x.wrapping_add(self.origin_x), y.wrapping_add(self.origin_y))
    }

    /// True when the local coordinate has no cell in this frame
    #[inline]
    pub fn is_out_of_range(&self, x: i32, y: i32) -> bool {
        let local_min_x = self.local_min_x();
        let local_min_y = self.local_min_y();
        x < local_min_x
            || x >= local_min_x + self.width
            || y < local_min_y
            || y >= local_min_y + self.height
    }

    /// True when the world coordinate lies inside the rectangle
    #[inline]
    pub fn contains_world(&self, gx: i32, gy: i32) -> bool {
        gx >= self.min_x && gx < self.world_max_x() && gy >= self.min_y && gy < self.world_max_y()
    }

    /// Storage index of a local coordinate
    ///
    /// Callers must range-check with [`GridFrame::is_out_of_range`] first; this
    /// only guards the index arithmetic itself.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the index cannot be represented.
    #[inline]
    pub fn index_of(&self, x: i32, y: i32) -> Result<usize> {
        let index = x
            .checked_sub(self.local_min_x())
            .zip(y.checked_sub(self.local_min_y()))
            .and_then(|(dx, dy)| dy.checked_mul(self.width)?.checked_add(dx))
            .and_then(|index| usize::try_from(index).ok());

        index.ok_or_else(|| {
            GridError::Overflow(format!("index of local ({}, {}) is not representable", x, y))
        })
    }

    /// Storage index of a coordinate already known to be in range
    #[inline]
    pub(crate) fn offset_of(&self, x: i32, y: i32) -> usize {
        debug_assert!(!self.is_out_of_range(x, y));
        let dx = (x - self.local_min_x()) as usize;
        let dy = (y - self.local_min_y()) as usize;
        dx + dy * self.width as usize
    }

    /// Local coordinate stored at a storage index, if the index is in bounds
    pub fn local_at(&self, index: usize) -> Option<(i32, i32)> {
        if index >= self.capacity() {
            return None;
        }
        let width = self.width as usize;
        let x = self.local_min_x() + (index % width) as i32;
        let y = self.local_min_y() + (index / width) as i32;
        Some((x, y))
    }
}

impl TryFrom<FrameFields> for GridFrame {
    type Error = GridError;

    fn try_from(fields: FrameFields) -> Result<Self> {
        GridFrame::new(
            fields.min_x,
            fields.min_y,
            fields.origin_x,
            fields.origin_y,
            fields.width,
            fields.height,
        )
    }
}

impl From<GridFrame> for FrameFields {
    fn from(frame: GridFrame) -> Self {
        FrameFields {
            origin_x: frame.origin_x,
            origin_y: frame.origin_y,
            min_x: frame.min_x,
            min_y: frame.min_y,
            width: frame.width,
            height: frame.height,
        }
    }
}

impl fmt::Display for GridFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} at ({}, {}), origin ({}, {})",
            self.width, self.height, self.min_x, self.min_y, self.origin_x, self.origin_y
        )
    }
}
