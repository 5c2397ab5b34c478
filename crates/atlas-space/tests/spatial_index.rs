use atlas_core::{Coordinate, RoomId};
use atlas_space::{nearest_free, CoordinateBox, SpatialIndex};

fn c(x: i32, y: i32, z: i32) -> Coordinate {
    Coordinate::new(x, y, z)
}

#[test]
fn range_boundaries_are_inclusive_on_both_sides() {
    let mut index = SpatialIndex::new();
    let lo = c(-2, -2, -1);
    let hi = c(2, 3, 1);
    index.set(lo, RoomId(0));
    index.set(hi, RoomId(1));
    index.set(c(hi.x + 1, hi.y, hi.z), RoomId(2));
    index.set(c(lo.x, lo.y - 1, lo.z), RoomId(3));
    index.set(c(lo.x, lo.y, lo.z - 1), RoomId(4));

    let mut seen = Vec::new();
    index.rooms_in(lo, hi, |pos, id| seen.push((pos, id)));
    assert_eq!(seen, vec![(lo, RoomId(0)), (hi, RoomId(1))]);
}

#[test]
fn placing_rooms_one_by_one_never_collides() {
    let mut index = SpatialIndex::new();
    for i in 0..200u32 {
        let pos = nearest_free(&index, Coordinate::ORIGIN);
        assert_eq!(index.set(pos, RoomId(i)), None);
    }
    assert_eq!(index.len(), 200);

    let reach = index
        .iter()
        .map(|(pos, _)| pos.chebyshev_distance(&Coordinate::ORIGIN))
        .max()
        .unwrap();
    assert!(reach <= 3, "rooms spread to distance {reach}");
}

#[test]
fn filled_area_is_fully_visible_to_range_queries() {
    let mut index = SpatialIndex::new();
    let area = CoordinateBox::new(c(0, 0, 0), c(3, 2, 1));
    let mut next = 0;
    let filled = index.fill_area(area.min, area.max, |_| {
        next += 1;
        RoomId(next)
    });
    assert_eq!(filled as u64, area.volume());
    assert_eq!(index.collect_in(area.max, area.min).len() as u64, area.volume());

    index.remove(&c(1, 1, 0));
    assert_eq!(index.collect_in(area.min, area.max).len() as u64, area.volume() - 1);
    assert_eq!(nearest_free(&index, c(1, 1, 0)), c(1, 1, 0));
}
