//! Serialization record for coordinate maps
//!
//! [`GridRecord`] is the one serialized shape of a grid: the six frame
//! scalars plus, optionally, the cells in storage (row-major) order.
//! A record without `data` is the definition-only projection.
//!
//! ```json
//! {"origin_x":5,"origin_y":5,"min_x":0,"min_y":0,"width":2,"height":1,"data":[7,0]}
//! ```

use crate::buffer_pool::BufferPool;
use crate::element::Element;
use crate::error::{GridError, Result};
use crate::frame::GridFrame;
use crate::map::CoordinateMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Minimal serialized form of a [`CoordinateMap`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRecord<T> {
    pub origin_x: i32,
    pub origin_y: i32,
    pub min_x: i32,
    pub min_y: i32,
    pub width: i32,
    pub height: i32,

    /// Exactly `width * height` cells in storage order, if present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<T>>,
}

impl<T> GridRecord<T> {
    /// Definition-only record for `frame`
    pub fn definition(frame: &GridFrame) -> Self {
        GridRecord {
            origin_x: frame.origin_x(),
            origin_y: frame.origin_y(),
            min_x: frame.min_x(),
            min_y: frame.min_y(),
            width: frame.width(),
            height: frame.height(),
            data: None,
        }
    }

    /// Record for `frame` carrying `data`
    pub fn with_data(frame: &GridFrame, data: Vec<T>) -> Self {
        GridRecord {
            data: Some(data),
            ..Self::definition(frame)
        }
    }

    /// Validated frame described by this record
    pub fn frame(&self) -> Result<GridFrame> {
        GridFrame::new(
            self.min_x,
            self.min_y,
            self.origin_x,
            self.origin_y,
            self.width,
            self.height,
        )
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Drop the cells, keeping only the definition
    pub fn into_definition(self) -> Self {
        GridRecord { data: None, ..self }
    }
}

impl<T: Element> CoordinateMap<T> {
    /// Record with a copy of every cell
    pub fn to_record(&self) -> GridRecord<T> {
        GridRecord::with_data(self.frame(), self.to_vec())
    }

    /// Record that takes over the cells without copying them when possible
    pub fn into_record(self) -> GridRecord<T> {
        let (frame, data) = self.into_parts();
        GridRecord::with_data(&frame, data)
    }

    /// Definition-only record (no cells)
    pub fn definition(&self) -> GridRecord<T> {
        GridRecord::definition(self.frame())
    }

    /// Rebuild a grid from a record, adopting its cells without copying
    ///
    /// # Errors
    ///
    /// - `InvalidSize` / `Overflow` if the frame scalars are invalid
    /// - `MissingData` if the record is definition-only
    /// - `LengthMismatch` if `data` is not exactly `width * height` long
    pub fn from_record(record: GridRecord<T>) -> Result<Self> {
        Self::from_record_in(record, BufferPool::shared())
    }

    /// Like [`CoordinateMap::from_record`], returning the buffer to `pool` later
    pub fn from_record_in(record: GridRecord<T>, pool: Arc<BufferPool<T>>) -> Result<Self> {
        let frame = record.frame()?;
        let data = record.data.ok_or(GridError::MissingData)?;
        debug!("Rebuilding coordinate map {} from record", frame);
        Self::from_parts_in(frame, data, pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CoordinateMap<i32> {
        let mut map = CoordinateMap::new(0, 0, 5, 5, 2, 2, 0).unwrap();
        map.set(-5, -5, 1).unwrap();
        map.set(-4, -5, 2).unwrap();
        map.set(-5, -4, 3).unwrap();
        map
    }

    #[test]
    fn test_record_uses_storage_order() {
        let record = sample().to_record();
        assert_eq!(record.data, Some(vec![1, 2, 3, 0]));
        assert_eq!((record.width, record.height), (2, 2));
        assert_eq!((record.origin_x, record.origin_y), (5, 5));
    }

    #[test]
    fn test_definition_has_no_data() {
        let map = sample();
        let definition = map.definition();
        assert!(!definition.has_data());
        assert_eq!(definition.frame().unwrap(), *map.frame());
        assert_eq!(map.to_record().into_definition(), definition);
    }

    #[test]
    fn test_round_trip_through_record() {
        let map = sample();
        let restored = CoordinateMap::from_record(map.clone().into_record()).unwrap();
        assert_eq!(restored, map);
    }

    #[test]
    fn test_from_record_adopts_data() {
        let frame = GridFrame::new(0, 0, 0, 0, 3, 1).unwrap();
        let data = vec![4, 5, 6];
        let ptr = data.as_ptr();

        let map = CoordinateMap::from_record(GridRecord::with_data(&frame, data)).unwrap();
        assert_eq!(map.as_slice().as_ptr(), ptr);
    }

    #[test]
    fn test_from_record_errors() {
        let frame = GridFrame::new(0, 0, 0, 0, 3, 1).unwrap();

        let definition = GridRecord::<i32>::definition(&frame);
        assert!(matches!(
            CoordinateMap::from_record(definition),
            Err(GridError::MissingData)
        ));

        let short = GridRecord::with_data(&frame, vec![1, 2]);
        assert!(matches!(
            CoordinateMap::from_record(short),
            Err(GridError::LengthMismatch {
                expected: 3,
                actual: 2
            })
        ));

        let mut bad = GridRecord::with_data(&frame, vec![1, 2, 3]);
        bad.width = -3;
        assert!(matches!(
            CoordinateMap::from_record(bad),
            Err(GridError::InvalidSize(_))
        ));
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&sample().definition()).unwrap();
        assert_eq!(
            json,
            r#"{"origin_x":5,"origin_y":5,"min_x":0,"min_y":0,"width":2,"height":2}"#
        );

        let full: GridRecord<i32> = serde_json::from_str(
            r#"{"origin_x":5,"origin_y":5,"min_x":0,"min_y":0,"width":2,"height":1,"data":[7,0]}"#,
        )
        .unwrap();
        let map = CoordinateMap::from_record(full).unwrap();
        assert_eq!(*map.get(-5, -5).unwrap(), 7);
    }
}
