//! Grid core: coordinate engine, pooled storage and the grid itself

pub mod buffer_pool;
pub mod config;
pub mod element;
pub mod error;
pub mod frame;
pub mod map;
pub mod record;
pub mod storage;

pub use buffer_pool::{BufferPool, BufferPoolStats};
pub use config::PoolConfig;
pub use element::Element;
pub use error::{GridError, Result};
pub use frame::GridFrame;
pub use map::{Coords, CoordinateMap, Iter, ResizeError};
pub use record::GridRecord;
pub use storage::PooledBuffer;
