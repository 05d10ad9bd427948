//! Removal of overlapping notes.
//!
//! Each column is turned into a sequence of edges: every note opens at its offset and a
//! hold also closes at its end. Two neighbouring edges closer than the tolerance
//! collide, and one of them is dropped:
//!
//! - when a hold ends right where the next note starts, the hold end is dropped, so the
//!   hold becomes a tap and the next note survives;
//! - otherwise the later edge is dropped.
//!
//! The remaining edges are paired back into notes. An opening edge directly followed
//! by a closing one is a hold, any other opening edge is a tap, and a closing edge with
//! nothing to close is discarded.

use itertools::Itertools;
use log::debug;

use crate::note::Note;

/// Default collision distance in milliseconds.
pub const DEFAULT_TOLERANCE_MS: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeKind {
    Open,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edge {
    offset: i64,
    kind: EdgeKind,
}

impl Edge {
    const fn collides(self, next: Self, tolerance_ms: i64) -> bool {
        tolerance_ms > 0 && next.offset.abs_diff(self.offset) < tolerance_ms as u64
    }
}

/// Reduces `notes` to a sequence without overlaps in any column.
///
/// Notes in a column at or beyond `columns` are dropped. The result is sorted by
/// offset, notes sharing an offset being ordered by column.
///
/// # Examples
///
/// ```
/// use fnf2osu::{note::Note, overlap::resolve_overlaps};
///
/// // The hold would still be running when the tap arrives, so the hold is shortened
/// // into a tap.
/// let notes = [Note::new(0, 0, 490), Note::tap(491, 0)];
/// assert_eq!(
///     resolve_overlaps(&notes, 4, 2),
///     vec![Note::tap(0, 0), Note::tap(491, 0)]
/// );
/// ```
#[must_use]
pub fn resolve_overlaps(notes: &[Note], columns: usize, tolerance_ms: i64) -> Vec<Note> {
    let mut edges: Vec<Vec<Edge>> = vec![Vec::new(); columns];
    for note in notes {
        let Some(column) = edges.get_mut(note.column) else {
            continue;
        };
        column.push(Edge {
            offset: note.offset,
            kind: EdgeKind::Open,
        });
        if note.is_hold() {
            column.push(Edge {
                offset: note.end(),
                kind: EdgeKind::Close,
            });
        }
    }

    let resolved: Vec<Note> = edges
        .into_iter()
        .enumerate()
        .flat_map(|(column, mut edges)| {
            edges.sort_by_key(|edge| edge.offset);
            drop_collisions(&mut edges, tolerance_ms);
            pair_edges(column, &edges)
        })
        .sorted_by_key(|note| note.offset)
        .collect();

    debug!(
        "overlap resolution kept {} of {} notes",
        resolved.len(),
        notes.len()
    );
    resolved
}

fn drop_collisions(edges: &mut Vec<Edge>, tolerance_ms: i64) {
    let mut index = 0;
    while let (Some(&current), Some(&next)) = (edges.get(index), edges.get(index + 1)) {
        if !current.collides(next, tolerance_ms) {
            index += 1;
            continue;
        }
        if (current.kind, next.kind) == (EdgeKind::Close, EdgeKind::Open) {
            edges.remove(index);
        } else {
            edges.remove(index + 1);
        }
    }
}

fn pair_edges(column: usize, edges: &[Edge]) -> Vec<Note> {
    let mut notes = Vec::new();
    let mut edges = edges.iter().peekable();
    while let Some(edge) = edges.next() {
        if edge.kind == EdgeKind::Close {
            continue;
        }
        match edges.next_if(|next| next.kind == EdgeKind::Close) {
            Some(close) => notes.push(Note::new(
                edge.offset,
                column,
                close.offset.saturating_sub(edge.offset),
            )),
            None => notes.push(Note::tap(edge.offset, column)),
        }
    }
    notes
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn resolve(notes: &[Note]) -> Vec<Note> {
        resolve_overlaps(notes, 4, DEFAULT_TOLERANCE_MS)
    }

    #[test]
    fn test_hold_followed_by_tap() {
        let hold = Note::new(0, 0, 490);
        assert_eq!(
            resolve(&[hold, Note::tap(488, 0)]),
            vec![Note::tap(0, 0), Note::new(488, 0, 2)]
        );
        assert_eq!(
            resolve(&[hold, Note::tap(489, 0)]),
            vec![Note::tap(0, 0), Note::tap(489, 0)]
        );
        assert_eq!(
            resolve(&[hold, Note::tap(490, 0)]),
            vec![Note::tap(0, 0), Note::tap(490, 0)]
        );
        assert_eq!(
            resolve(&[hold, Note::tap(491, 0)]),
            vec![Note::tap(0, 0), Note::tap(491, 0)]
        );
        assert_eq!(
            resolve(&[hold, Note::tap(492, 0)]),
            vec![hold, Note::tap(492, 0)]
        );
    }

    #[test]
    fn test_duplicates_merge() {
        assert_eq!(
            resolve(&[Note::tap(100, 1), Note::tap(100, 1), Note::tap(101, 1)]),
            vec![Note::tap(100, 1)]
        );
        // A tap stacked on the start of a hold is absorbed by the hold.
        assert_eq!(
            resolve(&[Note::tap(100, 2), Note::new(100, 2, 300)]),
            vec![Note::new(100, 2, 300)]
        );
    }

    #[test]
    fn test_short_hold_becomes_tap() {
        assert_eq!(resolve(&[Note::new(50, 3, 1)]), vec![Note::tap(50, 3)]);
    }

    #[test]
    fn test_columns_are_independent() {
        let notes = [
            Note::new(0, 0, 500),
            Note::tap(0, 1),
            Note::tap(250, 1),
            Note::tap(100, 7),
        ];
        assert_eq!(
            resolve(&notes),
            vec![Note::new(0, 0, 500), Note::tap(0, 1), Note::tap(250, 1)]
        );
    }

    #[test]
    fn test_stray_close_is_discarded() {
        let edges = [
            Edge {
                offset: 10,
                kind: EdgeKind::Close,
            },
            Edge {
                offset: 20,
                kind: EdgeKind::Open,
            },
        ];
        assert_eq!(pair_edges(2, &edges), vec![Note::tap(20, 2)]);
    }

    #[test]
    fn test_no_overlap_survives() {
        let notes: Vec<Note> = (0..200)
            .map(|i| Note::new((i * 37) % 1500, (i % 4) as usize, (i * 53) % 400 - 100))
            .collect();
        let resolved = resolve(&notes);

        for column in 0..4 {
            let spans: Vec<(i64, i64)> = resolved
                .iter()
                .filter(|note| note.column == column)
                .map(|note| (note.offset, note.end()))
                .collect();
            for pair in spans.windows(2) {
                assert!(pair[1].0 - pair[0].1 > -DEFAULT_TOLERANCE_MS, "{pair:?}");
                assert!(pair[1].0 - pair[0].0 >= DEFAULT_TOLERANCE_MS, "{pair:?}");
            }
        }
        assert!(resolved.windows(2).all(|pair| pair[0].offset <= pair[1].offset));
    }

    #[test]
    fn test_taps_only_count() {
        // 1 merges into 0, then 2 is compared with 0 and survives.
        let notes = [
            Note::tap(0, 0),
            Note::tap(1, 0),
            Note::tap(2, 0),
            Note::tap(10, 0),
        ];
        assert_eq!(resolve(&notes), vec![Note::tap(0, 0), Note::tap(2, 0), Note::tap(10, 0)]);
    }

    #[test]
    fn test_extreme_offsets() {
        let notes = [
            Note::new(i64::MAX, 0, 100),
            Note::tap(i64::MIN, 1),
            Note::tap(i64::MAX, 1),
        ];
        assert_eq!(
            resolve(&notes),
            vec![
                Note::tap(i64::MIN, 1),
                Note::tap(i64::MAX, 0),
                Note::tap(i64::MAX, 1),
            ]
        );
    }
}
