//! osu!mania beatmap (`.osu`, format v14) emission.
//!
//! A beatmap is a text file made of `[Section]` blocks of `Key:Value` lines, followed by
//! the `[TimingPoints]` and `[HitObjects]` blocks of comma-separated records.
//!
//! Every BPM point becomes two timing points at the same time: an uninherited one
//! carrying the beat length and an inherited one carrying a slider velocity of
//! `-100 * bpm / base_bpm`, which keeps the scroll speed constant across BPM changes.
//!
//! Times are shifted by the negated audio offset of the map-set, so moving the audio
//! forward moves the notes backward.

use std::fmt;

use crate::{
    config::{ConvertConfig, HitPosition},
    error::ConfigError,
    mapset::{MapsetMetadata, ResolvedChart},
    timeline::beat_duration_ms,
    util::sanitize_file_name,
};

/// Version line of the emitted format.
pub const FORMAT_HEADER: &str = "osu file format v14";

/// Artist written when the map-set has none.
pub const UNKNOWN_ARTIST: &str = "Unknown";

/// Vertical position of every hit object, unused by osu!mania.
const HIT_OBJECT_Y: u32 = 192;

const TAP: u8 = 1;
const HOLD: u8 = 128;
const NEW_COMBO: u8 = 4;

/// Lane centres used by osu! for 4 to 10 columns, `floor((c + 0.5) * 512 / n)`.
const LEGACY_POSITIONS: [&[u32]; 7] = [
    &[64, 192, 320, 448],
    &[51, 153, 256, 358, 460],
    &[42, 128, 213, 298, 384, 469],
    &[36, 109, 182, 256, 329, 402, 475],
    &[32, 96, 160, 224, 288, 352, 416, 480],
    &[28, 85, 142, 199, 256, 312, 369, 426, 483],
    &[25, 76, 128, 179, 230, 281, 332, 384, 435, 486],
];

/// Horizontal positions of each column.
///
/// # Errors
///
/// Returns [`ConfigError::NoLegacyTable`] for [`HitPosition::Legacy`] with fewer than 4 or
/// more than 10 columns.
pub fn column_positions(columns: usize, config: &ConvertConfig) -> Result<Vec<u32>, ConfigError> {
    match config.hit_position {
        HitPosition::Proportional => Ok((0..columns)
            .map(|column| {
                (column as u64 * u64::from(config.field_width) / columns as u64) as u32
            })
            .collect()),
        HitPosition::Legacy => columns
            .checked_sub(4)
            .and_then(|index| LEGACY_POSITIONS.get(index))
            .map(|positions| positions.to_vec())
            .ok_or(ConfigError::NoLegacyTable(columns)),
    }
}

/// Name of the `.osu` file of a difficulty, already sanitized.
#[must_use]
pub fn beatmap_file_name(metadata: &MapsetMetadata, difficulty: &str, creator: &str) -> String {
    sanitize_file_name(&format!(
        "{} - {} ({creator}) [{difficulty}].osu",
        metadata.artist_or_unknown(),
        metadata.title,
    ))
}

/// A beatmap ready to be rendered with [`fmt::Display`].
#[derive(Debug)]
pub struct Beatmap<'a> {
    metadata: &'a MapsetMetadata,
    chart: &'a ResolvedChart,
    difficulty: &'a str,
    creator: &'a str,
    config: &'a ConvertConfig,
    positions: Vec<u32>,
}

impl<'a> Beatmap<'a> {
    /// Prepares a beatmap.
    ///
    /// # Errors
    ///
    /// Fails when the column layout cannot be placed, see [`column_positions`].
    pub fn new(
        metadata: &'a MapsetMetadata,
        chart: &'a ResolvedChart,
        difficulty: &'a str,
        creator: &'a str,
        config: &'a ConvertConfig,
    ) -> Result<Self, ConfigError> {
        let positions = column_positions(chart.layout.columns(), config)?;
        Ok(Self {
            metadata,
            chart,
            difficulty,
            creator,
            config,
            positions,
        })
    }

    const fn time(&self, offset: i64) -> i64 {
        offset.saturating_sub(self.metadata.audio_offset_ms)
    }

    fn write_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.config;
        let artist = self.metadata.artist_or_unknown();
        let title = &self.metadata.title;

        writeln!(f, "{FORMAT_HEADER}")?;
        writeln!(f)?;
        writeln!(f, "[General]")?;
        writeln!(f, "AudioFilename:{}", config.audio_file_name)?;
        writeln!(f, "AudioLeadIn:0")?;
        writeln!(f, "PreviewTime:-1")?;
        writeln!(f, "Countdown:0")?;
        writeln!(f, "SampleSet:None")?;
        writeln!(f, "StackLeniency:0.7")?;
        writeln!(f, "Mode:3")?;
        writeln!(f, "LetterboxInBreaks:0")?;
        writeln!(f, "SpecialStyle:0")?;
        writeln!(f, "WidescreenStoryboard:0")?;
        writeln!(f)?;
        writeln!(f, "[Editor]")?;
        writeln!(f, "DistanceSpacing:1")?;
        writeln!(f, "BeatDivisor:4")?;
        writeln!(f, "GridSize:32")?;
        writeln!(f, "TimelineZoom:1")?;
        writeln!(f)?;
        writeln!(f, "[Metadata]")?;
        writeln!(f, "Title:{title}")?;
        writeln!(f, "TitleUnicode:{title}")?;
        writeln!(f, "Artist:{artist}")?;
        writeln!(f, "ArtistUnicode:{artist}")?;
        writeln!(f, "Creator:{}", self.creator)?;
        writeln!(f, "Version:{}", self.difficulty)?;
        writeln!(f, "Source:{}", config.source)?;
        writeln!(f, "Tags:{}", self.metadata.tags)?;
        writeln!(f, "BeatmapID:-1")?;
        writeln!(f, "BeatmapSetID:-1")?;
        writeln!(f)?;
        writeln!(f, "[Difficulty]")?;
        writeln!(f, "HPDrainRate:5")?;
        writeln!(f, "CircleSize:{}", self.chart.layout.columns())?;
        writeln!(f, "OverallDifficulty:8")?;
        writeln!(f, "ApproachRate:6.9")?;
        writeln!(f, "SliderMultiplier:{}", self.chart.scroll_speed)?;
        writeln!(f, "SliderTickRate:1")
    }

    fn write_events(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[Events]")?;
        writeln!(f, "//Background and Video events")?;
        if self.metadata.background.is_some() {
            writeln!(f, "0,0,\"{}\",0,0", self.config.background_file_name)?;
        }
        writeln!(f, "//Break Periods")?;
        writeln!(f, "//Storyboard Layer 0 (Background)")?;
        writeln!(f, "//Storyboard Layer 1 (Fail)")?;
        writeln!(f, "//Storyboard Layer 2 (Pass)")?;
        writeln!(f, "//Storyboard Layer 3 (Foreground)")?;
        writeln!(f, "//Storyboard Layer 4 (Overlay)")?;
        writeln!(f, "//Storyboard Sound Samples")
    }

    fn write_timing_points(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ConvertConfig {
            sample_set,
            sample_index,
            hitsound_volume: volume,
            ..
        } = *self.config;
        let meter = self.metadata.meter;

        writeln!(f, "[TimingPoints]")?;
        for point in &self.chart.timeline {
            let time = self.time(point.offset);
            let beat = beat_duration_ms(point.bpm);
            let velocity = -100.0 * point.bpm / self.chart.base_bpm;
            writeln!(
                f,
                "{time},{beat},{meter},{sample_set},{sample_index},{volume},1,0"
            )?;
            writeln!(
                f,
                "{time},{velocity},{meter},{sample_set},{sample_index},{volume},0,0"
            )?;
        }
        Ok(())
    }

    fn write_hit_objects(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ConvertConfig {
            sample_set,
            sample_index,
            hitsound_volume: volume,
            ..
        } = *self.config;

        writeln!(f, "[HitObjects]")?;
        for (index, note) in self.chart.notes.iter().enumerate() {
            let Some(x) = self.positions.get(note.column) else {
                continue;
            };
            let time = self.time(note.offset);
            let combo = if index == 0 { NEW_COMBO } else { 0 };
            if note.is_hold() {
                let end = self.time(note.end());
                writeln!(
                    f,
                    "{x},{HIT_OBJECT_Y},{time},{},0,{end}:{sample_set}:0:{sample_index}:{volume}:",
                    HOLD + combo
                )?;
            } else {
                writeln!(
                    f,
                    "{x},{HIT_OBJECT_Y},{time},{},0,{sample_set}:0:{sample_index}:{volume}:",
                    TAP + combo
                )?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Beatmap<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_header(f)?;
        writeln!(f)?;
        self.write_events(f)?;
        writeln!(f)?;
        self.write_timing_points(f)?;
        writeln!(f)?;
        self.write_hit_objects(f)
    }
}

/// Renders the `.osu` text of a difficulty.
///
/// # Errors
///
/// Fails when the column layout cannot be placed, see [`column_positions`].
pub fn write_beatmap(
    metadata: &MapsetMetadata,
    chart: &ResolvedChart,
    difficulty: &str,
    creator: &str,
    config: &ConvertConfig,
) -> Result<String, ConfigError> {
    Ok(Beatmap::new(metadata, chart, difficulty, creator, config)?.to_string())
}
