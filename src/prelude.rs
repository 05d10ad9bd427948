//! Prelude module for the crate.
//!
//! You can use `use fnf2osu::prelude::*;` to import the commonly used types at once.

pub use crate::config::{ConvertConfig, HitPosition};
pub use crate::error::{ConfigError, ConvertError, MalformedChart, ResourceKind};
pub use crate::export::{
    AudioTranscoder, CancellationToken, CopyTranscoder, ExportError, ExportJob, Exporter,
    GainTrack, Progress, TranscodeError, audio::percent_to_db,
};
pub use crate::fnf::{
    ChartWarning, FnfChart, FnfOutput, Player, PlayerFilter, extract::ExtractError,
    extract::extract_root_object, parse_chart,
};
pub use crate::layout::{Arrangement, KeyCount, Layout};
pub use crate::mapset::{AudioTrack, Chart, Mapset, MapsetMetadata, ResolvedChart};
pub use crate::note::Note;
pub use crate::osu::{beatmap_file_name, write_beatmap};
pub use crate::overlap::resolve_overlaps;
pub use crate::timeline::{BpmPoint, normalize};
pub use crate::util::sanitize_file_name;
