//! Unit tests for the round-robin assignment ring.

use std::collections::HashSet;

use pr_shepherd::assignment::AssignmentRing;
use pr_shepherd::models::Member;

fn members(n: i64) -> Vec<Member> {
    (1..=n).map(|id| Member::new(id, format!("dev{id}"))).collect()
}

fn draw(ring: &mut AssignmentRing, count: usize) -> Vec<i64> {
    (0..count)
        .map(|_| ring.next_from_ring().expect("non-empty ring").id)
        .collect()
}

#[test]
fn starts_at_offset_and_wraps() {
    let mut ring = AssignmentRing::new(members(4), 2);

    assert_eq!(draw(&mut ring, 6), [3, 4, 1, 2, 3, 4]);
}

#[test]
fn offset_is_taken_modulo_len() {
    let mut ring = AssignmentRing::new(members(3), 7);

    assert_eq!(draw(&mut ring, 3), [2, 3, 1]);
}

#[test]
fn any_window_of_len_draws_covers_every_member_once() {
    let mut ring = AssignmentRing::new(members(5), 3);
    let sequence = draw(&mut ring, 23);

    for window in sequence.windows(5) {
        let distinct: HashSet<i64> = window.iter().copied().collect();
        assert_eq!(distinct.len(), 5, "window {window:?} repeats a member");
    }
}

#[test]
fn single_member_ring_repeats() {
    let mut ring = AssignmentRing::new(members(1), 0);

    assert_eq!(draw(&mut ring, 3), [1, 1, 1]);
}

#[test]
fn empty_ring_yields_nothing() {
    let mut ring = AssignmentRing::new(Vec::new(), 5);

    assert!(ring.is_empty());
    assert_eq!(ring.len(), 0);
    assert!(ring.next_from_ring().is_none());
}
