//! Resize scenarios across origins, growth and shrinkage

use coordmap::{CoordinateMap, GridError, GridFrame};

fn numbered(frame: GridFrame) -> CoordinateMap<u32> {
    let mut map = CoordinateMap::with_frame(frame, 0).unwrap();
    let mut next = 1;
    map.for_each_mut(|_, _, value| {
        *value = next;
        next += 1;
    });
    map
}

#[test]
fn test_shift_rect_min_by_one() {
    let frame = GridFrame::new(0, 0, 5, 5, 3, 3).unwrap();
    let map = numbered(frame);
    let before = map.clone();

    let shifted = GridFrame::new(1, 1, 5, 5, 3, 3).unwrap();
    let map = map.resize(shifted, 0).unwrap();

    // interior survives at the same world (and, with an unchanged origin, local) position
    for x in -4..-2 {
        for y in -4..-2 {
            assert_eq!(map.get(x, y).unwrap(), before.get(x, y).unwrap());
        }
    }

    // one new column and one new row at the maximum edge hold the fill value
    for y in map.local_min_y()..map.local_max_y() {
        assert_eq!(*map.get(-2, y).unwrap(), 0);
    }
    for x in map.local_min_x()..map.local_max_x() {
        assert_eq!(*map.get(x, -2).unwrap(), 0);
    }

    // the old minimum column and row are gone
    assert!(matches!(map.get(-5, -4), Err(GridError::OutOfRange { .. })));
    assert!(matches!(map.get(-4, -5), Err(GridError::OutOfRange { .. })));
}

#[test]
fn test_grow_keeps_everything() {
    let frame = GridFrame::new(10, 10, 0, 0, 4, 3).unwrap();
    let map = numbered(frame);
    let before = map.clone();

    let grown = GridFrame::new(5, 5, 0, 0, 20, 20).unwrap();
    let map = map.resize(grown, 0).unwrap();

    for (x, y, value) in before.iter() {
        let (gx, gy) = before.local_to_world(x, y);
        assert_eq!(map.get_world(gx, gy).unwrap(), value);
    }
    let kept = map.iter().filter(|(_, _, &v)| v != 0).count();
    assert_eq!(kept, before.capacity());
}

#[test]
fn test_shrink_drops_outside_cells() {
    let frame = GridFrame::new(0, 0, 0, 0, 10, 10).unwrap();
    let mut map = CoordinateMap::with_frame(frame, 0u8).unwrap();
    map.set_world(0, 0, 1).unwrap();
    map.set_world(9, 9, 2).unwrap();
    map.set_world(5, 5, 3).unwrap();

    let inner = GridFrame::new(4, 4, 0, 0, 2, 2).unwrap();
    let map = map.resize(inner, 0).unwrap();

    assert_eq!(map.capacity(), 4);
    assert_eq!(*map.get_world(5, 5).unwrap(), 3);
    assert!(!map.contains_world(0, 0));
    assert!(!map.contains_world(9, 9));
}

#[test]
fn test_disjoint_rectangles_keep_nothing() {
    let frame = GridFrame::new(0, 0, 0, 0, 3, 3).unwrap();
    let map = numbered(frame);

    let far = GridFrame::new(100, 100, 0, 0, 3, 3).unwrap();
    let map = map.resize(far, 0).unwrap();

    assert!(map.as_slice().iter().all(|&v| v == 0));
}

#[test]
fn test_origin_change_only_moves_local_coordinates() {
    let frame = GridFrame::new(-2, -2, 0, 0, 4, 4).unwrap();
    let map = numbered(frame);
    let before = map.clone();

    let recentred = GridFrame::new(-2, -2, -2, -2, 4, 4).unwrap();
    let map = map.resize(recentred, 0).unwrap();

    // same rectangle, same storage; only the local labels moved
    assert_eq!(map.as_slice(), before.as_slice());
    assert_eq!(map.local_min_x(), 0);
    assert_eq!(map.get(0, 0).unwrap(), before.get(-2, -2).unwrap());
}

#[test]
fn test_repeated_resizes_round_trip() {
    let frame = GridFrame::new(0, 0, 1, 1, 6, 6).unwrap();
    let original = numbered(frame);

    let mut map = original.clone();
    for step in 0..5 {
        let bigger = GridFrame::new(-step, -step, step, -step, 6 + 2 * step, 6 + 2 * step).unwrap();
        map = map.resize(bigger, 0).unwrap();
    }
    let map = map.resize(frame, 0).unwrap();

    assert_eq!(map, original);
}

#[test]
fn test_resize_error_converts_into_grid_error() {
    fn grow(map: CoordinateMap<Option<Box<u8>>>) -> coordmap::Result<CoordinateMap<Option<Box<u8>>>> {
        let frame = GridFrame::new(0, 0, 0, 0, 8, 8)?;
        Ok(map.resize(frame, Some(Box::new(1)))?)
    }

    let map = CoordinateMap::new(0, 0, 0, 0, 2, 2, None).unwrap();
    assert!(matches!(grow(map), Err(GridError::UnsupportedDefault)));
}
