/// Position of the displayed record within the current subview.
///
/// The position outlives filter changes; whenever the subview is recomputed
/// it is clamped into `[0, len - 1]` (or held at 0 for an empty subview).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    position: usize,
}

impl Cursor {
    pub fn position(&self) -> usize {
        self.position
    }

    /// Position that is safe to read for a subview of `len` records.
    pub fn clamped(&self, len: usize) -> usize {
        self.position.min(len.saturating_sub(1))
    }

    pub fn clamp(&mut self, len: usize) {
        self.position = self.clamped(len);
    }

    pub fn previous(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    /// Advances within a subview of `len` records. No-op when empty.
    pub fn next(&mut self, len: usize) {
        if self.position + 1 < len {
            self.position += 1;
        }
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }

    pub fn jump(&mut self, position: usize, len: usize) {
        self.position = position;
        self.clamp(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_stops_at_last() {
        let mut cursor = Cursor::default();
        cursor.next(3);
        cursor.next(3);
        cursor.next(3);
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_previous_floors_at_zero() {
        let mut cursor = Cursor::default();
        cursor.previous();
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_next_on_empty_is_noop() {
        let mut cursor = Cursor::default();
        cursor.next(0);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut cursor = Cursor::default();
        cursor.jump(7, 10);
        assert_eq!(cursor.clamped(3), 2);
        cursor.clamp(3);
        assert_eq!(cursor.position(), 2);
        cursor.clamp(0);
        assert_eq!(cursor.position(), 0);
    }
}
