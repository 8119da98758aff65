// src/fingers.rs - Extended finger counting
use crate::geometry::{self, Finger};
use crate::landmarks::Hand;

/// Extension flags in thumb..pinky order.
pub fn extended_fingers(hand: &Hand) -> [bool; 5] {
    Finger::ALL.map(|finger| geometry::is_extended(hand, finger))
}

/// Number of extended fingers, 0-5. Recomputed from scratch every frame.
pub fn count_extended(hand: &Hand) -> u8 {
    extended_fingers(hand).iter().filter(|&&up| up).count() as u8
}
