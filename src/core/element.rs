//! Cell element types
//!
//! Any `Clone + Send + 'static` type can live in a grid once it implements
//! [`Element`]. Plain value types accept every fill value. Heap-owning cells
//! accept only their empty value as a fill: `None` for `Option<Box<_>>` and
//! `Option<Arc<_>>`, `""` for `String`, `[]` for `Vec<_>`. Options, tuples
//! and arrays accept a fill when every value they carry does.

use crate::error::{GridError, Result};
use std::sync::Arc;

/// Element stored in a [`CoordinateMap`](crate::CoordinateMap) cell
///
/// Implement this for your own cell types. The default implementation of
/// [`Element::is_valid_fill`] accepts everything; handle-like types should
/// override it to accept only their empty value.
///
/// # Examples
///
/// ```
/// use coordmap::Element;
///
/// #[derive(Clone, Default)]
/// struct Tile {
///     material: u16,
///     lit: bool,
/// }
///
/// impl Element for Tile {}
/// ```
pub trait Element: Clone + Send + 'static {
    /// Whether this value may be written into every slot of a new buffer
    fn is_valid_fill(&self) -> bool {
        true
    }
}

macro_rules! impl_value_element {
    ($($ty:ty),* $(,)?) => {
        $(impl Element for $ty {})*
    };
}

impl_value_element!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char, (),
);

impl<E: Element, const N: usize> Element for [E; N] {
    fn is_valid_fill(&self) -> bool {
        self.iter().all(Element::is_valid_fill)
    }
}

impl<U: Element> Element for Option<U> {
    fn is_valid_fill(&self) -> bool {
        self.as_ref().map_or(true, Element::is_valid_fill)
    }
}

// A bare handle is never a valid fill; `Option<Box<_>>` and `Option<Arc<_>>`
// accept `None` through the impl above.
impl<U: Clone + Send + 'static> Element for Box<U> {
    fn is_valid_fill(&self) -> bool {
        false
    }
}

impl<U: ?Sized + Send + Sync + 'static> Element for Arc<U> {
    fn is_valid_fill(&self) -> bool {
        false
    }
}

impl Element for String {
    fn is_valid_fill(&self) -> bool {
        self.is_empty()
    }
}

impl<U: Clone + Send + 'static> Element for Vec<U> {
    fn is_valid_fill(&self) -> bool {
        self.is_empty()
    }
}

macro_rules! impl_tuple_element {
    ($(($($name:ident: $idx:tt),+)),* $(,)?) => {
        $(
            impl<$($name: Element),+> Element for ($($name,)+) {
                fn is_valid_fill(&self) -> bool {
                    $(self.$idx.is_valid_fill())&&+
                }
            }
        )*
    };
}

impl_tuple_element!(
    (A: 0),
    (A: 0, B: 1),
    (A: 0, B: 1, C: 2),
    (A: 0, B: 1, C: 2, D: 3),
);

/// Reject fill values the element type does not accept
pub(crate) fn check_fill<T: Element>(fill: &T) -> Result<()> {
    if fill.is_valid_fill() {
        Ok(())
    } else {
        Err(GridError::UnsupportedDefault)
    }
}
