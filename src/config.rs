//! Conversion settings.

use crate::overlap::DEFAULT_TOLERANCE_MS;

/// How hit objects are placed horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitPosition {
    /// `floor(column / columns * field_width)`.
    #[default]
    Proportional,
    /// The centre of each lane as laid out by osu!, for 4 to 10 columns.
    Legacy,
}

/// Settings shared by every conversion step.
///
/// The value is passed explicitly to every call, nothing is global.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ConvertConfig {
    /// BPM used when the chart authors none.
    pub default_bpm: f64,
    /// Distance under which two note edges of a column collide.
    pub overlap_tolerance_ms: i64,
    /// Horizontal placement of hit objects.
    pub hit_position: HitPosition,
    /// Width of the playfield for [`HitPosition::Proportional`].
    pub field_width: u32,
    /// Sample set of timing points and hit objects.
    pub sample_set: u8,
    /// Custom sample index.
    pub sample_index: u8,
    /// Hit sound volume in percent.
    pub hitsound_volume: u8,
    /// Name of the audio file inside the map-set.
    pub audio_file_name: String,
    /// Name of the background image inside the map-set.
    pub background_file_name: String,
    /// `Source` metadata of every beatmap.
    pub source: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            default_bpm: 120.0,
            overlap_tolerance_ms: DEFAULT_TOLERANCE_MS,
            hit_position: HitPosition::Proportional,
            field_width: 528,
            sample_set: 1,
            sample_index: 0,
            hitsound_volume: 50,
            audio_file_name: "audio.mp3".to_string(),
            background_file_name: "background.jpg".to_string(),
            source: "Friday Night Funkin".to_string(),
        }
    }
}

#[cfg(feature = "serde")]
impl ConvertConfig {
    /// Loads settings from JSON, missing keys keeping their default value.
    ///
    /// # Errors
    ///
    /// Fails on invalid JSON or on a value of the wrong type.
    ///
    /// # Examples
    ///
    /// ```
    /// use fnf2osu::config::{ConvertConfig, HitPosition};
    ///
    /// let config = ConvertConfig::from_json_str(r#"{"hit_position": "Legacy"}"#).unwrap();
    /// assert_eq!(config.hit_position, HitPosition::Legacy);
    /// assert_eq!(config.field_width, 528);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
