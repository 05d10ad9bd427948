//! BPM timeline building.

/// A BPM change at an offset.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BpmPoint {
    /// Time of the change in milliseconds.
    pub offset: i64,
    /// Beats per minute from `offset` on.
    pub bpm: f64,
}

impl BpmPoint {
    /// Creates a BPM point.
    #[must_use]
    pub const fn new(offset: i64, bpm: f64) -> Self {
        Self { offset, bpm }
    }

    /// Length of a beat in milliseconds, or `0` for a non-positive BPM.
    #[must_use]
    pub fn beat_duration_ms(&self) -> f64 {
        beat_duration_ms(self.bpm)
    }
}

/// Length of a beat at `bpm` in milliseconds, or `0` when `bpm` is not positive.
#[must_use]
pub fn beat_duration_ms(bpm: f64) -> f64 {
    if bpm > 0.0 && bpm.is_finite() {
        60_000.0 / bpm
    } else {
        0.0
    }
}

/// Orders and repairs BPM points into a timeline ready for emission.
///
/// Points are sorted by offset and every non-positive or non-finite BPM is replaced by
/// `default_bpm`. The first point is moved back onto the beat grid passing through
/// time `0`, so that the song start lines up with a beat; it never moves by a full beat
/// or more. Consecutive points with the same BPM are then merged into the earlier one.
///
/// # Examples
///
/// ```
/// use fnf2osu::timeline::{BpmPoint, normalize};
///
/// let points = [
///     BpmPoint::new(2000, 150.0),
///     BpmPoint::new(0, 100.0),
///     BpmPoint::new(1000, 100.0),
/// ];
/// assert_eq!(
///     normalize(&points, 120.0),
///     vec![BpmPoint::new(0, 100.0), BpmPoint::new(2000, 150.0)]
/// );
/// ```
#[must_use]
#[allow(clippy::float_cmp)]
pub fn normalize(points: &[BpmPoint], default_bpm: f64) -> Vec<BpmPoint> {
    let mut timeline: Vec<BpmPoint> = points
        .iter()
        .map(|point| {
            if point.bpm > 0.0 && point.bpm.is_finite() {
                *point
            } else {
                BpmPoint::new(point.offset, default_bpm)
            }
        })
        .collect();
    timeline.sort_by_key(|point| point.offset);

    if let Some(first) = timeline.first_mut() {
        first.offset = snap_to_grid(first.offset, first.beat_duration_ms());
    }

    timeline.dedup_by(|later, earlier| later.bpm == earlier.bpm);
    timeline
}

/// Moves `offset` back to the previous multiple of `beat`, rounded up to whole ms.
fn snap_to_grid(offset: i64, beat: f64) -> i64 {
    if beat <= 0.0 {
        return offset;
    }
    let offset_ms = offset as f64;
    (offset_ms - offset_ms.rem_euclid(beat)).ceil() as i64
}
