/// Geometry of one staff segment: equally wide slots swept left to right.
///
/// All positions are in the segment's own coordinate space,
/// `0.0..=segment_width()`.
#[derive(Debug, Clone, Copy)]
pub struct SlotRuler {
    slot_width: f64,
    slot_count: usize,
}

impl SlotRuler {
    pub fn new(slot_width: f64, slot_count: usize) -> Self {
        Self {
            slot_width: if slot_width > 0.0 { slot_width } else { 1.0 },
            slot_count: slot_count.max(1),
        }
    }

    pub fn slot_width(&self) -> f64 {
        self.slot_width
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Total sweep width of a segment.
    pub fn segment_width(&self) -> f64 {
        self.slot_width * self.slot_count as f64
    }

    /// Slot a submission at this position is attributed to.
    /// Rounding ties go to the higher index; the result is clamped to the
    /// segment.
    pub fn nearest_index(&self, position: f64) -> usize {
        let index = (position / self.slot_width).round() as i64;
        index.clamp(0, self.slot_count as i64 - 1) as usize
    }

    /// Center of a slot's hit window.
    pub fn slot_center(&self, index: usize) -> f64 {
        index as f64 * self.slot_width + self.slot_width / 2.0
    }

    /// Distance from a position to a slot's window center.
    pub fn window_distance(&self, position: f64, index: usize) -> f64 {
        (position - self.slot_center(index)).abs()
    }

    /// Whether a distance is inside the hit window. The boundary itself
    /// (exactly half a slot width) is accepted.
    pub fn within_window(&self, distance: f64) -> bool {
        distance <= self.slot_width / 2.0
    }

    /// Index of the slot the position is currently inside; every lower
    /// index has been fully passed. Saturates at `slot_count` once the
    /// position reaches the end of the segment.
    pub fn passed_index(&self, position: f64) -> usize {
        let index = (position / self.slot_width).floor() as i64;
        index.clamp(0, self.slot_count as i64) as usize
    }
}

/// Sweep cursor state: position within the current segment, which segment
/// is being swept, and the highest slot index known to be reached.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cursor {
    position: f64,
    segment_index: usize,
    expected_slot_index: usize,
}

impl Cursor {
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn segment_index(&self) -> usize {
        self.segment_index
    }

    /// Monotonically non-decreasing within a segment; resets to 0 when the
    /// cursor hands off to the next segment.
    pub fn expected_slot_index(&self) -> usize {
        self.expected_slot_index
    }

    pub(crate) fn set_position(&mut self, position: f64) {
        self.position = position;
    }

    pub(crate) fn observe_slot(&mut self, index: usize) {
        self.expected_slot_index = self.expected_slot_index.max(index);
    }

    pub(crate) fn advance_segment(&mut self) {
        self.segment_index += 1;
        self.position = 0.0;
        self.expected_slot_index = 0;
    }
}
