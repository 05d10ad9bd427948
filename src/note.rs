//! Playable note shared by every stage after parsing.

/// A note placed in an output column.
///
/// Offsets and durations are in milliseconds. A zero duration is a tap note, a positive
/// one is a hold note ending at `offset + duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    /// Start time in milliseconds.
    pub offset: i64,
    /// Column index, zero-based from the left.
    pub column: usize,
    /// Hold length in milliseconds, `0` for taps.
    pub duration: u32,
}

impl Note {
    /// Creates a tap note.
    #[must_use]
    pub const fn tap(offset: i64, column: usize) -> Self {
        Self {
            offset,
            column,
            duration: 0,
        }
    }

    /// Creates a note from a possibly negative duration, which is clamped to zero.
    #[must_use]
    pub fn new(offset: i64, column: usize, duration: i64) -> Self {
        Self {
            offset,
            column,
            duration: u32::try_from(duration.max(0)).unwrap_or(u32::MAX),
        }
    }

    /// Whether the note must be held.
    #[must_use]
    pub const fn is_hold(&self) -> bool {
        self.duration > 0
    }

    /// Time the note ends, equal to `offset` for taps. Saturates at `i64::MAX`.
    #[must_use]
    pub const fn end(&self) -> i64 {
        self.offset.saturating_add(self.duration as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_duration_clamps() {
        assert_eq!(Note::new(10, 1, -30), Note::tap(10, 1));
        assert!(!Note::new(10, 1, 0).is_hold());
        let hold = Note::new(10, 1, 40);
        assert!(hold.is_hold());
        assert_eq!(hold.end(), 50);
    }

    #[test]
    fn test_end_saturates() {
        assert_eq!(Note::new(i64::MAX, 0, 100).end(), i64::MAX);
        assert_eq!(Note::new(i64::MAX - 10, 0, 100).end(), i64::MAX);
    }
}
