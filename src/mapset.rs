//! Map-sets: shared metadata and the difficulties converted from charts.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use log::{debug, warn};

use crate::{
    config::ConvertConfig,
    error::{ConfigError, ConvertError, MalformedChart, ResourceKind, Result},
    fnf::{ChartWarning, FnfOutput, parse_chart},
    layout::Layout,
    note::Note,
    overlap::resolve_overlaps,
    timeline::{BpmPoint, normalize},
};

/// Longest accepted title, artist or difficulty name, in characters.
pub const MAX_METADATA_LEN: usize = 127;

/// An audio file of the song and the volume it is mixed at.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AudioTrack {
    /// Source file.
    pub path: PathBuf,
    /// Volume in percent, `0..=100`.
    pub volume: u8,
}

impl AudioTrack {
    /// Creates an audio track.
    pub fn new(path: impl Into<PathBuf>, volume: u8) -> Self {
        Self {
            path: path.into(),
            volume,
        }
    }
}

/// Metadata shared by every difficulty of a map-set.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct MapsetMetadata {
    /// Song title.
    pub title: String,
    /// Song artist, written as `Unknown` when absent.
    pub artist: Option<String>,
    /// osu! user name of the mapper.
    pub creator: String,
    /// Space separated search tags.
    pub tags: String,
    /// Background image.
    pub background: Option<PathBuf>,
    /// One track, or two tracks mixed together (usually the instrumental and the voices).
    pub audio: Vec<AudioTrack>,
    /// A single BPM for the whole song, replacing the BPM authored in charts.
    pub bpm_override: Option<f64>,
    /// Beats per measure, `1..=7`.
    pub meter: u8,
    /// Audio offset in milliseconds. Positive values make the notes come earlier.
    pub audio_offset_ms: i64,
}

impl Default for MapsetMetadata {
    fn default() -> Self {
        Self {
            title: String::new(),
            artist: None,
            creator: String::new(),
            tags: String::new(),
            background: None,
            audio: Vec::new(),
            bpm_override: None,
            meter: 4,
            audio_offset_ms: 0,
        }
    }
}

impl MapsetMetadata {
    /// The artist, or `Unknown` when absent or empty.
    #[must_use]
    pub fn artist_or_unknown(&self) -> &str {
        self.artist
            .as_deref()
            .filter(|artist| !artist.is_empty())
            .unwrap_or(crate::osu::UNKNOWN_ARTIST)
    }

    /// Checks the values of the metadata, not the files it refers to.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title.is_empty() {
            return Err(ConfigError::EmptyTitle);
        }
        if self.title.chars().count() > MAX_METADATA_LEN {
            return Err(ConfigError::TooLong {
                field: "title",
                max: MAX_METADATA_LEN,
            });
        }
        if self
            .artist
            .as_ref()
            .is_some_and(|artist| artist.chars().count() > MAX_METADATA_LEN)
        {
            return Err(ConfigError::TooLong {
                field: "artist",
                max: MAX_METADATA_LEN,
            });
        }
        if !(1..=7).contains(&self.meter) {
            return Err(ConfigError::InvalidMeter(self.meter));
        }
        if !(1..=2).contains(&self.audio.len()) {
            return Err(ConfigError::AudioTrackCount(self.audio.len()));
        }
        if let Some(track) = self.audio.iter().find(|track| track.volume > 100) {
            return Err(ConfigError::VolumeOutOfRange(track.volume));
        }
        if self.audio.iter().all(|track| track.volume == 0) {
            return Err(ConfigError::SilentAudio);
        }
        if let Some(bpm) = self.bpm_override
            && !(bpm > 0.0 && bpm.is_finite())
        {
            return Err(ConfigError::InvalidBpmOverride(bpm));
        }
        Ok(())
    }
}

/// A chart file converted with a layout, one difficulty of a map-set.
///
/// The file is read again by every [`Chart::load`] and [`Chart::resolve`] call, so edits
/// made between two exports are picked up.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chart {
    path: PathBuf,
    layout: Layout,
}

/// A chart converted into notes and timing, ready for [`crate::osu::write_beatmap`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedChart {
    /// Layout the notes are placed in.
    pub layout: Layout,
    /// Notes without overlaps, sorted by offset.
    pub notes: Vec<Note>,
    /// Normalized BPM timeline.
    pub timeline: Vec<BpmPoint>,
    /// BPM whose scroll speed is the reference one.
    pub base_bpm: f64,
    /// Scroll speed of the chart.
    pub scroll_speed: f64,
    /// Anomalies repaired while parsing.
    pub warnings: Vec<ChartWarning>,
}

impl Chart {
    /// Creates a chart of the JSON file at `path`.
    pub fn new(path: impl Into<PathBuf>, layout: Layout) -> Self {
        Self {
            path: path.into(),
            layout,
        }
    }

    /// The chart file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The output layout.
    #[must_use]
    pub const fn layout(&self) -> Layout {
        self.layout
    }

    /// Changes the output layout.
    pub const fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    fn malformed(&self, source: MalformedChart) -> ConvertError {
        ConvertError::MalformedInput {
            path: self.path.clone(),
            source,
        }
    }

    /// Reads and parses the chart file.
    ///
    /// A UTF-8 or UTF-16 byte order mark selects the encoding, otherwise the text is read
    /// as UTF-8 with invalid sequences replaced.
    ///
    /// # Errors
    ///
    /// Fails when the file is missing or unreadable, or when its content is not a chart.
    pub fn load(&self) -> Result<FnfOutput> {
        if !self.path.is_file() {
            return Err(ConvertError::MissingResource {
                kind: ResourceKind::Chart,
                path: self.path.clone(),
            });
        }
        let text = read_chart_source(&self.path)?;
        parse_chart(&text).map_err(|err| self.malformed(err))
    }

    /// Converts the chart into notes and timing.
    ///
    /// # Errors
    ///
    /// Fails like [`Chart::load`], and with [`MalformedChart::NoNotes`] when the chart has
    /// no note to anchor the timing on.
    pub fn resolve(
        &self,
        metadata: &MapsetMetadata,
        config: &ConvertConfig,
    ) -> Result<ResolvedChart> {
        let FnfOutput { chart, warnings } = self.load()?;
        for warning in &warnings {
            warn!("{}: {warning}", self.path.display());
        }

        let override_bpm = metadata.bpm_override;
        let base_bpm = chart.default_bpm(override_bpm, config.default_bpm);
        let points = chart
            .bpm_points(override_bpm, base_bpm)
            .map_err(|err| self.malformed(err))?;
        let timeline = normalize(&points, base_bpm);

        let mapped = self.layout.notes(&chart);
        let notes = resolve_overlaps(&mapped, self.layout.columns(), config.overlap_tolerance_ms);
        debug!(
            "{} as {}: {} notes mapped, {} kept, {} timing points",
            self.path.display(),
            self.layout,
            mapped.len(),
            notes.len(),
            timeline.len() * 2,
        );

        Ok(ResolvedChart {
            layout: self.layout,
            notes,
            timeline,
            base_bpm,
            scroll_speed: chart.speed,
            warnings,
        })
    }
}

/// Reads the text of a chart file.
///
/// A UTF-8 or UTF-16 byte order mark selects the encoding and is stripped, otherwise the
/// text is read as UTF-8 with invalid sequences replaced. Byte offsets in chart errors
/// refer to this text.
///
/// # Errors
///
/// Fails when the file cannot be read.
pub fn read_chart_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|err| ConvertError::io(path, err))?;
    let (text, encoding, _) = encoding_rs::UTF_8.decode(&bytes);
    debug!("decoding {} as {}", path.display(), encoding.name());
    Ok(text.into_owned())
}

/// Metadata and difficulties of a map-set.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mapset {
    /// Shared metadata.
    pub metadata: MapsetMetadata,
    difficulties: BTreeMap<String, Chart>,
}

impl Mapset {
    /// Creates a map-set without difficulties.
    #[must_use]
    pub fn new(metadata: MapsetMetadata) -> Self {
        Self {
            metadata,
            difficulties: BTreeMap::new(),
        }
    }

    /// Adds a difficulty, returning the one it replaces.
    pub fn insert(&mut self, name: impl Into<String>, chart: Chart) -> Option<Chart> {
        self.difficulties.insert(name.into(), chart)
    }

    /// Removes a difficulty if present.
    pub fn remove(&mut self, name: &str) -> Option<Chart> {
        self.difficulties.remove(name)
    }

    /// Gets a difficulty.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Chart> {
        self.difficulties.get(name)
    }

    /// Iterates the difficulties by name.
    pub fn difficulties(&self) -> impl Iterator<Item = (&str, &Chart)> {
        self.difficulties
            .iter()
            .map(|(name, chart)| (name.as_str(), chart))
    }

    /// Number of difficulties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.difficulties.len()
    }

    /// Whether there is no difficulty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.difficulties.is_empty()
    }

    /// Checks that the map-set can be exported: valid metadata, at least one named
    /// difficulty, and every referenced file present.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<()> {
        self.metadata.validate()?;
        if self.difficulties.is_empty() {
            return Err(ConfigError::NoDifficulty.into());
        }
        if self.difficulties.keys().any(String::is_empty) {
            return Err(ConfigError::EmptyDifficultyName.into());
        }
        if self
            .difficulties
            .keys()
            .any(|name| name.chars().count() > MAX_METADATA_LEN)
        {
            return Err(ConfigError::TooLong {
                field: "difficulty name",
                max: MAX_METADATA_LEN,
            }
            .into());
        }

        let audio = self
            .metadata
            .audio
            .iter()
            .map(|track| (ResourceKind::Audio, track.path.as_path()));
        let background = self
            .metadata
            .background
            .as_deref()
            .map(|path| (ResourceKind::Background, path));
        let charts = self
            .difficulties
            .values()
            .map(|chart| (ResourceKind::Chart, chart.path()));
        if let Some((kind, path)) = audio
            .chain(background)
            .chain(charts)
            .find(|(_, path)| !path.is_file())
        {
            return Err(ConvertError::MissingResource {
                kind,
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }
}
