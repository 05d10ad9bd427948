//! The Friday Night Funkin' chart format.
//!
//! A chart is a JSON object shaped like this (only the keys read by this crate are shown):
//!
//! ```json
//! {
//!     "bpm": 150,
//!     "song": {
//!         "bpm": 150,
//!         "speed": 2.4,
//!         "notes": [
//!             { "mustHitSection": true, "bpm": 150, "sectionNotes": [[0, 1, 0], [400, 6, 250]] }
//!         ]
//!     }
//! }
//! ```
//!
//! Each section holds notes of both characters. When `mustHitSection` is `true` the lanes
//! `0..K` belong to the player (the boyfriend, [`Player::A`]) and the lanes `K..2K` to the
//! opponent ([`Player::B`]); when it is `false` the halves are swapped.
//!
//! Authoring tools produce a lot of slightly broken data, such as note entries carrying
//! extra strings, notes with negative lengths or sections without a BPM. Those are
//! repaired or skipped and reported as [`ChartWarning`]s. Only structural problems make
//! [`parse_chart`] fail.

pub mod extract;
pub mod notes;
pub mod parse;

use thiserror::Error;

pub use self::parse::parse_chart;

/// One of the two characters of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Player {
    /// The character of `mustHitSection: true` sections, the one the game lets you play.
    A,
    /// The opponent.
    B,
}

/// Which notes a query collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerFilter {
    /// Notes of a single player.
    Only(Player),
    /// Notes of both players folded into the same lanes.
    Both,
}

/// A note entry that survived coercion, still in authored units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawNote {
    /// Start time in milliseconds.
    pub offset: f64,
    /// Lane over both characters, `0..2K` for well-formed charts.
    pub lane: i64,
    /// Hold length in milliseconds, possibly negative.
    pub duration: f64,
}

/// A section of the chart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    /// `mustHitSection`, whether the lower lanes belong to [`Player::A`].
    pub must_hit: bool,
    /// BPM authored on this section, if any.
    pub bpm: Option<f64>,
    /// Notes in authored order.
    pub notes: Vec<RawNote>,
}

impl Section {
    /// Whether the section belongs to the queried player.
    ///
    /// No section belongs to [`PlayerFilter::Both`], which makes every lane fold.
    #[must_use]
    pub const fn belongs_to(&self, filter: PlayerFilter) -> bool {
        match filter {
            PlayerFilter::Only(Player::A) => self.must_hit,
            PlayerFilter::Only(Player::B) => !self.must_hit,
            PlayerFilter::Both => false,
        }
    }
}

/// Parsed chart data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FnfChart {
    /// Top-level `bpm`.
    pub bpm: Option<f64>,
    /// `song.bpm`.
    pub song_bpm: Option<f64>,
    /// `song.speed`, the scroll speed.
    pub speed: f64,
    /// `song.notes`.
    pub sections: Vec<Section>,
}

/// A recoverable anomaly found while parsing a chart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[non_exhaustive]
pub enum ChartWarning {
    /// `song.speed` is absent or not a number, `1` is used.
    #[error("`song.speed` is missing or not a number, using 1")]
    MissingScrollSpeed,
    /// A section is not an object and was skipped.
    #[error("section {section} is not an object")]
    InvalidSection {
        /// Index in `song.notes`.
        section: usize,
    },
    /// A section has no boolean `mustHitSection`, it is taken as `false`.
    #[error("section {section} has no boolean `mustHitSection`, assuming false")]
    MissingMustHit {
        /// Index in `song.notes`.
        section: usize,
    },
    /// A section has a `bpm` that is not a number, it was ignored.
    #[error("section {section} has a non-numeric `bpm`")]
    InvalidSectionBpm {
        /// Index in `song.notes`.
        section: usize,
    },
    /// A section has no `sectionNotes` array.
    #[error("section {section} has no `sectionNotes` array")]
    MissingSectionNotes {
        /// Index in `song.notes`.
        section: usize,
    },
    /// A note entry has fewer than three numeric fields and was dropped.
    #[error("note {note} of section {section} has fewer than three numeric fields")]
    MalformedNote {
        /// Index in `song.notes`.
        section: usize,
        /// Index in `sectionNotes`.
        note: usize,
    },
    /// A note entry has a negative lane and was dropped.
    #[error("note {note} of section {section} has a negative lane")]
    NegativeLane {
        /// Index in `song.notes`.
        section: usize,
        /// Index in `sectionNotes`.
        note: usize,
    },
}

/// Output of [`parse_chart`].
#[derive(Debug, Clone, PartialEq)]
pub struct FnfOutput {
    /// The parsed chart.
    pub chart: FnfChart,
    /// Anomalies repaired or skipped while parsing.
    pub warnings: Vec<ChartWarning>,
}
