//! Note and BPM queries over a parsed chart.

use super::{FnfChart, PlayerFilter};
use crate::{error::MalformedChart, layout::KeyCount, note::Note, timeline::BpmPoint};

impl FnfChart {
    /// Collects the notes of `filter` for charts with `key_count` lanes per player.
    ///
    /// In a section belonging to the queried player, lanes below `key_count` are kept as
    /// they are and the upper lanes are dropped. In any other section only the upper
    /// lanes are kept (those are the queried player's notes, written from the partner's
    /// point of view) and they are folded with `lane % key_count`. With
    /// [`PlayerFilter::Both`] every lane of every section is folded.
    ///
    /// Offsets and durations are truncated to whole milliseconds and negative durations
    /// become taps. The result is sorted by offset; notes sharing an offset keep their
    /// authored order.
    #[must_use]
    pub fn notes_for(&self, filter: PlayerFilter, key_count: KeyCount) -> Vec<Note> {
        let keys = i64::from(key_count.get());
        let mut notes: Vec<Note> = self
            .sections
            .iter()
            .flat_map(|section| {
                let own = section.belongs_to(filter);
                section.notes.iter().filter_map(move |raw| {
                    let lane = if own {
                        (raw.lane < keys).then_some(raw.lane)?
                    } else if filter == PlayerFilter::Both || raw.lane >= keys {
                        raw.lane % keys
                    } else {
                        return None;
                    };
                    Some(Note::new(
                        raw.offset as i64,
                        lane as usize,
                        raw.duration as i64,
                    ))
                })
            })
            .collect();
        notes.sort_by_key(|note| note.offset);
        notes
    }

    /// Offset of the earliest note of the whole chart, whoever plays it.
    #[must_use]
    pub fn first_offset(&self) -> Option<i64> {
        self.sections
            .iter()
            .flat_map(|section| &section.notes)
            .map(|raw| raw.offset as i64)
            .min()
    }

    /// Resolves the BPM used when nothing better is authored.
    ///
    /// The first positive value among `override_bpm`, the top-level `bpm` and `song.bpm`
    /// wins, otherwise `fallback` is used.
    #[must_use]
    pub fn default_bpm(&self, override_bpm: Option<f64>, fallback: f64) -> f64 {
        [override_bpm, self.bpm, self.song_bpm]
            .into_iter()
            .flatten()
            .find(|bpm| *bpm > 0.0)
            .unwrap_or(fallback)
    }

    /// Collects the BPM change points of the chart.
    ///
    /// With `override_bpm` the whole song uses that BPM from the first note on. Otherwise
    /// every section authoring a `bpm` and holding at least one note yields a point at its
    /// first note. When no section does, a single point at the first note uses
    /// `default_bpm`.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedChart::NoNotes`] when the chart has no note to anchor on.
    pub fn bpm_points(
        &self,
        override_bpm: Option<f64>,
        default_bpm: f64,
    ) -> Result<Vec<BpmPoint>, MalformedChart> {
        let first = self.first_offset().ok_or(MalformedChart::NoNotes)?;
        if let Some(bpm) = override_bpm {
            return Ok(vec![BpmPoint::new(first, bpm)]);
        }

        let points: Vec<BpmPoint> = self
            .sections
            .iter()
            .filter_map(|section| {
                let anchor = section.notes.first()?;
                Some(BpmPoint::new(anchor.offset as i64, section.bpm?))
            })
            .collect();
        if points.is_empty() {
            return Ok(vec![BpmPoint::new(first, default_bpm)]);
        }
        Ok(points)
    }
}
