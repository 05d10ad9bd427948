//! Error taxonomy of the converter.
//!
//! Structural problems (unreadable file, no root object, no notes, unsupported layout,
//! missing resources) surface as [`ConvertError`]. Recoverable anomalies inside a chart
//! are never errors: they are collected as [`crate::fnf::ChartWarning`]s instead.

use std::path::PathBuf;

use thiserror::Error;

use crate::fnf::extract::ExtractError;

/// Why a chart file could not be turned into note data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MalformedChart {
    /// No JSON object could be recovered from the text.
    #[error("no JSON object found: {0}")]
    Extract(#[from] ExtractError),
    /// The recovered object is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    /// A key the chart cannot do without is absent or has the wrong type.
    #[error("missing or invalid `{0}`")]
    MissingField(&'static str),
    /// The chart has no usable note at all.
    #[error("the chart contains no notes")]
    NoNotes,
}

/// Kind of file a [`ConvertError::MissingResource`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A chart JSON file.
    Chart,
    /// An audio track.
    Audio,
    /// The background image.
    Background,
    /// The directory the archive is written into.
    OutputDirectory,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Chart => "chart",
            Self::Audio => "audio track",
            Self::Background => "background image",
            Self::OutputDirectory => "output directory",
        };
        f.write_str(name)
    }
}

/// A requested configuration that the converter does not support.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Key counts per player must be within `4..=9`.
    #[error("unsupported key count {0}, expected 4 to 9")]
    UnsupportedKeyCount(u8),
    /// A numeric mode code that does not name a layout.
    #[error("unknown map mode code {0}")]
    UnknownModeCode(u8),
    /// The legacy hit position table has no entry for this column count.
    #[error("no legacy hit position table for {0} columns")]
    NoLegacyTable(usize),
    /// The song title is empty.
    #[error("the song title is empty")]
    EmptyTitle,
    /// A metadata field exceeds the length limit.
    #[error("the {field} is longer than {max} characters")]
    TooLong {
        /// Name of the field.
        field: &'static str,
        /// Maximum accepted length.
        max: usize,
    },
    /// The meter must be within `1..=7`.
    #[error("unsupported meter {0}/4, expected 1/4 to 7/4")]
    InvalidMeter(u8),
    /// One or two audio tracks are required.
    #[error("expected one or two audio tracks, got {0}")]
    AudioTrackCount(usize),
    /// Every audio track has a volume of zero.
    #[error("every audio track is muted")]
    SilentAudio,
    /// A volume above 100 percent.
    #[error("audio volume {0}% is above 100%")]
    VolumeOutOfRange(u8),
    /// The global BPM override is not a positive finite number.
    #[error("the BPM override {0} is not a positive number")]
    InvalidBpmOverride(f64),
    /// The mapset has nothing to export.
    #[error("the mapset has no difficulty")]
    NoDifficulty,
    /// A difficulty name is empty.
    #[error("a difficulty name is empty")]
    EmptyDifficultyName,
}

/// Errors of the conversion engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// The chart JSON is unparseable or structurally invalid.
    #[error("malformed chart `{}`: {source}", path.display())]
    MalformedInput {
        /// The chart file.
        path: PathBuf,
        /// What was wrong with it.
        #[source]
        source: MalformedChart,
    },
    /// An unsupported layout or an invalid metadata value was requested.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    /// A referenced file does not exist.
    #[error("{kind} `{}` does not exist", path.display())]
    MissingResource {
        /// What the file was expected to be.
        kind: ResourceKind,
        /// The missing path.
        path: PathBuf,
    },
    /// Reading or writing the filesystem failed.
    #[error("I/O failure on `{}`: {source}", path.display())]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type of the conversion engine.
pub type Result<T, E = ConvertError> = std::result::Result<T, E>;
