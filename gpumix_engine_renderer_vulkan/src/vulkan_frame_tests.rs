//! Unit tests for the ring cursor

use crate::vulkan_frame::RingCursor;

#[test]
fn test_cursor_starts_at_zero() {
    let mut cursor = RingCursor::new(3);
    assert_eq!(cursor.advance(), 0);
}

#[test]
fn test_cursor_wraps_around() {
    let mut cursor = RingCursor::new(3);
    let visited: Vec<usize> = (0..7).map(|_| cursor.advance()).collect();
    assert_eq!(visited, vec![0, 1, 2, 0, 1, 2, 0]);
    assert_eq!(cursor.advance(), 1);
}

#[test]
fn test_single_slot_ring_reuses_slot() {
    let mut cursor = RingCursor::new(1);
    assert_eq!(cursor.advance(), 0);
    assert_eq!(cursor.advance(), 0);
}

#[test]
fn test_zero_length_clamped_to_one() {
    let mut cursor = RingCursor::new(0);
    assert_eq!(cursor.advance(), 0);
    assert_eq!(cursor.advance(), 0);
    assert_eq!(cursor, RingCursor::new(1));
}
