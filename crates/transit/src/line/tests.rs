//! Unit tests for line topology edits.

use crate::error::TopologyError;
use crate::position::Position;
use crate::station::{Station, StationShape};
use crate::train::{PathFollower, Train};

use super::*;

const LINE_ID: u32 = 1;

fn station(id: u32, x: f32, y: f32) -> Station {
    Station::new(id, Position::new(x, y), StationShape::Circle)
}

struct Fixture {
    a: Station,
    b: Station,
    c: Station,
    d: Station,
}

fn fixture() -> Fixture {
    Fixture {
        a: station(10, 0.0, 0.0),
        b: station(11, 10.0, 0.0),
        c: station(12, 20.0, 0.0),
        d: Station::new(13, Position::new(5.0, -5.0), StationShape::Square),
    }
}

fn line_ab(f: &Fixture) -> Line {
    Line::new(LINE_ID, &f.a, &f.b, LineColor([255, 0, 0]), Position::new(5.0, 5.0))
}

fn train_on(line: &mut Line, id: u32, pointer: usize) -> Train {
    let mut t = Train::new(id, 1.0);
    line.add_train(&mut t);
    t.set_pointer(pointer);
    t
}

fn assert_shape(line: &Line, stations: &[&Station]) {
    assert_eq!(line.path().len(), 2 * line.station_count() - 1);
    let ids: Vec<u32> = stations.iter().map(|s| s.id).collect();
    assert_eq!(line.stations(), ids.as_slice());
    for (i, s) in stations.iter().enumerate() {
        assert_eq!(line.path()[2 * i], s.position(), "path[{}] mismatch", 2 * i);
    }
}

// -------------------------------------------------------------------------
// Construction and queries
// -------------------------------------------------------------------------

#[test]
fn test_new_line_has_two_stations_and_one_control_point() {
    let f = fixture();
    let line = line_ab(&f);
    assert_eq!(line.stations(), &[f.a.id, f.b.id]);
    assert_eq!(
        line.path(),
        &[f.a.position(), Position::new(5.0, 5.0), f.b.position()]
    );
    assert!(!line.is_loop());
    assert!(!line.is_degenerate());
}

#[test]
fn test_add_allowed_rejects_only_interior_stations() {
    let f = fixture();
    let mut line = line_ab(&f);
    line.extend(&f.c, Position::new(15.0, 5.0));

    assert!(line.add_allowed(f.a.id));
    assert!(!line.add_allowed(f.b.id));
    assert!(line.add_allowed(f.c.id));
    assert!(line.add_allowed(f.d.id));
}

#[test]
fn test_contains_shape() {
    let f = fixture();
    let mut line = line_ab(&f);
    let all = vec![f.a.clone(), f.b.clone(), f.c.clone(), f.d.clone()];

    assert!(line.contains_shape(StationShape::Circle, &all));
    assert!(!line.contains_shape(StationShape::Square, &all));

    line.extend(&f.d, Position::new(8.0, -3.0));
    assert!(line.contains_shape(StationShape::Square, &all));
    assert!(!line.contains_shape(StationShape::Star, &all));
}

#[test]
fn test_is_loop_requires_more_than_one_station() {
    let f = fixture();
    let mut line = line_ab(&f);
    line.extend(&f.a, Position::new(3.0, -3.0));
    assert!(line.is_loop());

    // Trim down to the degenerate single-station line.
    line.remove_loop(f.a.id, LoopEnd::Last, LoopTrimPolicy::Reconciled)
        .unwrap();
    line.remove_station(f.b.id).unwrap();
    assert!(line.is_degenerate());
    assert!(!line.is_loop());
}

// -------------------------------------------------------------------------
// Tail extension
// -------------------------------------------------------------------------

#[test]
fn test_extend_appends_control_then_station() {
    let f = fixture();
    let mut line = line_ab(&f);
    let mut t = train_on(&mut line, 1, 2);

    let edit = line.extend(&f.c, Position::new(10.0, 10.0));
    assert!(edit.is_untouched());
    line.reconcile(&edit, [&mut t]);

    assert_shape(&line, &[&f.a, &f.b, &f.c]);
    assert_eq!(line.path().len(), 5);
    assert_eq!(line.path()[3], Position::new(10.0, 10.0));
    assert_eq!(line.path()[4], f.c.position());
    assert_eq!(t.pointer(), 2);
}

#[test]
fn test_extend_then_remove_tail_restores_lengths() {
    let f = fixture();
    let mut line = line_ab(&f);
    line.extend(&f.c, Position::new(10.0, 10.0));
    let before = (line.station_count(), line.path().len());

    line.extend(&f.d, Position::new(1.0, 1.0));
    line.remove_station(f.d.id).unwrap();
    assert_eq!((line.station_count(), line.path().len()), before);
}

// -------------------------------------------------------------------------
// Indexed insertion
// -------------------------------------------------------------------------

#[test]
fn test_insert_at_unconditional_shifts_every_train() {
    let f = fixture();
    let mut line = line_ab(&f);
    line.extend(&f.c, Position::new(10.0, 10.0));
    let mut ahead = train_on(&mut line, 1, 2);
    let mut behind = train_on(&mut line, 2, 1);

    let edit = line
        .insert_at(1, &f.d, Position::new(1.0, 1.0), InsertShiftPolicy::Unconditional)
        .unwrap();
    line.reconcile(&edit, [&mut ahead, &mut behind]);

    assert_shape(&line, &[&f.a, &f.d, &f.b, &f.c]);
    assert_eq!(ahead.pointer(), 4);
    // Heading for the first control point, but pushed forward anyway.
    assert_eq!(behind.pointer(), 3);
    assert_eq!(edit.membership, MembershipChange::Register(f.d.id));
}

#[test]
fn test_insert_at_ahead_of_insertion_spares_trains_behind() {
    let f = fixture();
    let mut line = line_ab(&f);
    line.extend(&f.c, Position::new(10.0, 10.0));
    let mut ahead = train_on(&mut line, 1, 2);
    let mut behind = train_on(&mut line, 2, 1);

    let edit = line
        .insert_at(1, &f.d, Position::new(1.0, 1.0), InsertShiftPolicy::AheadOfInsertion)
        .unwrap();
    line.reconcile(&edit, [&mut ahead, &mut behind]);

    assert_eq!(ahead.pointer(), 4);
    assert_eq!(behind.pointer(), 1);
    assert_eq!(line.path()[ahead.pointer()], f.b.position());
}

#[test]
fn test_insert_at_head_puts_control_between_new_and_old_head() {
    let f = fixture();
    let mut line = line_ab(&f);
    line.insert_at(0, &f.d, Position::new(2.0, -2.0), InsertShiftPolicy::AheadOfInsertion)
        .unwrap();
    assert_shape(&line, &[&f.d, &f.a, &f.b]);
    assert_eq!(line.path()[1], Position::new(2.0, -2.0));
}

#[test]
fn test_insert_at_end_matches_extend() {
    let f = fixture();
    let mut line = line_ab(&f);
    let mut t = train_on(&mut line, 1, 2);
    let edit = line
        .insert_at(2, &f.c, Position::new(10.0, 10.0), InsertShiftPolicy::AheadOfInsertion)
        .unwrap();
    line.reconcile(&edit, [&mut t]);

    assert_shape(&line, &[&f.a, &f.b, &f.c]);
    assert_eq!(line.path()[3], Position::new(10.0, 10.0));
    assert_eq!(t.pointer(), 2);
}

#[test]
fn test_insert_at_rejects_interior_station_and_bad_index() {
    let f = fixture();
    let mut line = line_ab(&f);
    line.extend(&f.c, Position::new(10.0, 10.0));
    let before = line.clone();

    assert_eq!(
        line.insert_at(1, &f.b, Position::new(0.0, 0.0), InsertShiftPolicy::Unconditional),
        Err(TopologyError::InteriorStation)
    );
    assert_eq!(
        line.insert_at(4, &f.d, Position::new(0.0, 0.0), InsertShiftPolicy::Unconditional),
        Err(TopologyError::IndexOutOfRange { index: 4, len: 3 })
    );
    assert_eq!(line, before);
}

// -------------------------------------------------------------------------
// Link splitting
// -------------------------------------------------------------------------

#[test]
fn test_insert_from_link_replaces_split_control_point() {
    let f = fixture();
    let mut line = line_ab(&f);
    line.extend(&f.c, Position::new(15.0, 5.0));

    let edit = line
        .insert_from_link(2, &f.d, Position::new(12.0, 2.0), Position::new(17.0, 2.0))
        .unwrap();

    assert_shape(&line, &[&f.a, &f.b, &f.d, &f.c]);
    assert_eq!(line.path()[1], Position::new(5.0, 5.0));
    assert_eq!(line.path()[3], Position::new(12.0, 2.0));
    assert_eq!(line.path()[5], Position::new(17.0, 2.0));
    assert!(!line.path().contains(&Position::new(15.0, 5.0)));
    assert_eq!(edit.shift, PointerShift::After { index: 3, delta: 2 });
}

#[test]
fn test_insert_from_link_shifts_only_trains_beyond_split() {
    let f = fixture();
    let mut line = line_ab(&f);
    line.extend(&f.c, Position::new(15.0, 5.0));
    let mut before_split = train_on(&mut line, 1, 2);
    let mut on_split = train_on(&mut line, 2, 3);
    let mut beyond = train_on(&mut line, 3, 4);

    let edit = line
        .insert_from_link(2, &f.d, Position::new(12.0, 2.0), Position::new(17.0, 2.0))
        .unwrap();
    let touched = line.reconcile(&edit, [&mut before_split, &mut on_split, &mut beyond]);

    assert_eq!(touched, 3);
    assert_eq!(before_split.pointer(), 2);
    assert_eq!(on_split.pointer(), 3);
    assert_eq!(beyond.pointer(), 6);
    assert_eq!(line.path()[beyond.pointer()], f.c.position());
}

#[test]
fn test_insert_from_link_requires_existing_segment() {
    let f = fixture();
    let mut line = line_ab(&f);
    assert_eq!(
        line.insert_from_link(0, &f.d, Position::default(), Position::default()),
        Err(TopologyError::IndexOutOfRange { index: 0, len: 2 })
    );
    assert_eq!(
        line.insert_from_link(2, &f.d, Position::default(), Position::default()),
        Err(TopologyError::IndexOutOfRange { index: 2, len: 2 })
    );
}

// -------------------------------------------------------------------------
// Endpoint removal
// -------------------------------------------------------------------------

#[test]
fn test_remove_head_shifts_and_revalidates() {
    let f = fixture();
    let mut line = line_ab(&f);
    let mut t = train_on(&mut line, 1, 2);

    let edit = line.remove_station(f.a.id).unwrap();
    line.reconcile(&edit, [&mut t]);

    assert_eq!(line.stations(), &[f.b.id]);
    assert_eq!(line.path(), &[f.b.position()]);
    assert_eq!(t.pointer(), 0);
    assert_eq!(edit.membership, MembershipChange::Unregister(f.a.id));
    assert!(line.is_degenerate());
}

#[test]
fn test_remove_head_saturates_pointer_at_zero() {
    let f = fixture();
    let mut line = line_ab(&f);
    line.extend(&f.c, Position::new(15.0, 5.0));
    let mut t = train_on(&mut line, 1, 1);

    let edit = line.remove_station(f.a.id).unwrap();
    line.reconcile(&edit, [&mut t]);
    assert_eq!(t.pointer(), 0);
    assert_eq!(line.path()[0], f.b.position());
}

#[test]
fn test_remove_tail_clamps_pointer() {
    let f = fixture();
    let mut line = line_ab(&f);
    line.extend(&f.c, Position::new(15.0, 5.0));
    let mut t = train_on(&mut line, 1, 4);

    let edit = line.remove_station(f.c.id).unwrap();
    assert_eq!(edit.shift, PointerShift::None);
    line.reconcile(&edit, [&mut t]);

    assert_shape(&line, &[&f.a, &f.b]);
    assert_eq!(t.pointer(), 2);
}

#[test]
fn test_remove_station_on_loop_is_refused() {
    let f = fixture();
    let mut line = line_ab(&f);
    line.extend(&f.c, Position::new(15.0, 5.0));
    line.extend(&f.a, Position::new(10.0, -10.0));
    let before = line.clone();

    assert_eq!(
        line.remove_station(f.a.id),
        Err(TopologyError::AmbiguousLoopEndpoint)
    );
    assert_eq!(line, before);
}

#[test]
fn test_remove_station_rejects_interior_missing_and_last() {
    let f = fixture();
    let mut line = line_ab(&f);
    line.extend(&f.c, Position::new(15.0, 5.0));

    assert_eq!(line.remove_station(f.b.id), Err(TopologyError::InteriorStation));
    assert_eq!(line.remove_station(f.d.id), Err(TopologyError::StationNotOnLine));

    line.remove_station(f.c.id).unwrap();
    line.remove_station(f.b.id).unwrap();
    assert_eq!(line.remove_station(f.a.id), Err(TopologyError::LastStation));
    assert_eq!(line.path(), &[f.a.position()]);
}

#[test]
fn test_remove_tail_that_also_appears_earlier() {
    let f = fixture();
    let mut line = line_ab(&f);
    // The unchecked `extend` can revisit the tail.
    line.extend(&f.b, Position::new(12.0, 3.0));
    assert_eq!(line.stations(), &[f.a.id, f.b.id, f.b.id]);

    let edit = line.remove_station(f.b.id).unwrap();
    assert_eq!(edit.shift, PointerShift::None);
    assert_shape(&line, &[&f.a, &f.b]);

    let mut line = line_ab(&f);
    line.extend(&f.c, Position::new(15.0, 5.0));
    line.extend(&f.b, Position::new(15.0, -5.0));
    line.remove_station(f.b.id).unwrap();
    assert_shape(&line, &[&f.a, &f.b, &f.c]);
}

#[test]
fn test_extend_edit_keeps_line_a_simple_path() {
    let f = fixture();
    let mut line = line_ab(&f);
    line.extend(&f.c, Position::new(15.0, 5.0));
    let before = line.clone();
    let extend = |station: &Station| TopologyEdit::Extend {
        station: station.id,
        position: station.position(),
        control: Position::new(0.0, 9.0),
    };

    assert_eq!(
        line.apply_edit(extend(&f.b)),
        Err(TopologyError::InteriorStation)
    );
    assert_eq!(
        line.apply_edit(extend(&f.c)),
        Err(TopologyError::RepeatedStation)
    );
    assert_eq!(line, before);

    // Appending the head closes the loop; once closed, no end may repeat.
    line.apply_edit(extend(&f.a)).unwrap();
    assert!(line.is_loop());
    assert_eq!(
        line.apply_edit(extend(&f.a)),
        Err(TopologyError::RepeatedStation)
    );
}

#[test]
fn test_insert_at_repeats_only_to_close_a_loop() {
    let f = fixture();
    let mut line = line_ab(&f);
    assert_eq!(
        line.insert_at(1, &f.a, Position::new(1.0, 1.0), InsertShiftPolicy::AheadOfInsertion),
        Err(TopologyError::RepeatedStation)
    );
    assert_eq!(
        line.insert_at(2, &f.b, Position::new(1.0, 1.0), InsertShiftPolicy::AheadOfInsertion),
        Err(TopologyError::RepeatedStation)
    );

    line.insert_at(0, &f.b, Position::new(5.0, -5.0), InsertShiftPolicy::AheadOfInsertion)
        .unwrap();
    assert_shape(&line, &[&f.b, &f.a, &f.b]);
    assert!(line.is_loop());
}

// -------------------------------------------------------------------------
// Loop trimming
// -------------------------------------------------------------------------

fn loop_abca(f: &Fixture) -> Line {
    let mut line = line_ab(f);
    line.extend(&f.c, Position::new(15.0, 5.0));
    line.extend(&f.a, Position::new(10.0, -10.0));
    line
}

#[test]
fn test_remove_loop_first_unreconciled_leaves_pointers() {
    let f = fixture();
    let mut line = loop_abca(&f);
    let mut t = train_on(&mut line, 1, 6);

    let edit = line
        .remove_loop(f.a.id, LoopEnd::First, LoopTrimPolicy::Unreconciled)
        .unwrap();
    line.reconcile(&edit, [&mut t]);

    assert_shape(&line, &[&f.b, &f.c, &f.a]);
    assert!(edit.is_untouched());
    // Stale: the path now only has five waypoints.
    assert_eq!(t.pointer(), 6);
}

#[test]
fn test_remove_loop_first_reconciled_keeps_target() {
    let f = fixture();
    let mut line = loop_abca(&f);
    let mut t = train_on(&mut line, 1, 4);

    let edit = line
        .remove_loop(f.a.id, LoopEnd::First, LoopTrimPolicy::Reconciled)
        .unwrap();
    line.reconcile(&edit, [&mut t]);

    assert_eq!(t.pointer(), 2);
    assert_eq!(line.path()[t.pointer()], f.c.position());
    assert_eq!(edit.membership, MembershipChange::None);
}

#[test]
fn test_remove_loop_last_reconciled_clamps() {
    let f = fixture();
    let mut line = loop_abca(&f);
    let mut t = train_on(&mut line, 1, 6);

    let edit = line
        .remove_loop(f.a.id, LoopEnd::Last, LoopTrimPolicy::Reconciled)
        .unwrap();
    line.reconcile(&edit, [&mut t]);

    assert_shape(&line, &[&f.a, &f.b, &f.c]);
    assert!(!line.is_loop());
    assert_eq!(t.pointer(), 4);
}

#[test]
fn test_remove_loop_rejects_non_loop_and_wrong_station() {
    let f = fixture();
    let mut line = line_ab(&f);
    assert_eq!(
        line.remove_loop(f.a.id, LoopEnd::First, LoopTrimPolicy::Reconciled),
        Err(TopologyError::NotALoop)
    );

    let mut looped = loop_abca(&f);
    assert_eq!(
        looped.remove_loop(f.b.id, LoopEnd::First, LoopTrimPolicy::Reconciled),
        Err(TopologyError::StationNotOnLine)
    );
}

// -------------------------------------------------------------------------
// Train assignment and reconciliation scope
// -------------------------------------------------------------------------

#[test]
fn test_add_and_remove_train() {
    let f = fixture();
    let mut line = line_ab(&f);
    let mut t = Train::new(5, 1.0);

    line.add_train(&mut t);
    line.add_train(&mut t);
    assert_eq!(line.trains(), &[5]);
    assert_eq!(t.line(), Some(LINE_ID));

    line.remove_train(&mut t);
    assert!(line.trains().is_empty());
    assert_eq!(t.line(), None);
}

#[test]
fn test_reconcile_skips_foreign_trains() {
    let f = fixture();
    let mut line = line_ab(&f);
    let mut mine = train_on(&mut line, 1, 2);
    let mut other = Train::new(2, 1.0);
    other.set_line(Some(99));
    other.set_pointer(2);

    let edit = line
        .insert_at(0, &f.d, Position::new(1.0, 1.0), InsertShiftPolicy::Unconditional)
        .unwrap();
    let touched = line.reconcile(&edit, [&mut mine, &mut other]);

    assert_eq!(touched, 1);
    assert_eq!(mine.pointer(), 4);
    assert_eq!(other.pointer(), 2);
}

#[test]
fn test_display_lists_one_station_per_row() {
    let f = fixture();
    let mut line = line_ab(&f);
    line.extend(&f.c, Position::new(15.0, 5.0));
    assert_eq!(line.to_string(), "station 10\nstation 11\nstation 12\n");
}

#[test]
fn test_pointer_shift_apply() {
    assert_eq!(PointerShift::None.apply(3), 3);
    assert_eq!(PointerShift::All(-2).apply(1), 0);
    assert_eq!(PointerShift::AtOrAfter { index: 2, delta: 2 }.apply(2), 4);
    assert_eq!(PointerShift::AtOrAfter { index: 2, delta: 2 }.apply(1), 1);
    assert_eq!(PointerShift::After { index: 3, delta: 2 }.apply(3), 3);
    assert_eq!(PointerShift::After { index: 3, delta: 2 }.apply(4), 6);
}
