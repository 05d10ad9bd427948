//! Audio transcoding contract.
//!
//! Mixing and encoding audio is not done by this crate. An [`AudioTranscoder`] receives
//! one or two source tracks, each with a gain in decibels, and must write a single file
//! at the destination, the tracks being mixed from their start.

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::mapset::AudioTrack;

/// Gain of a muted track, in decibels.
pub const SILENCE_DB: f64 = -1e12;

/// Converts a volume in percent to a gain in decibels, `10 * log10(percent / 100)`.
///
/// A volume of `0` gives [`SILENCE_DB`].
///
/// # Examples
///
/// ```
/// use fnf2osu::export::audio::{SILENCE_DB, percent_to_db};
///
/// assert_eq!(percent_to_db(100), 0.0);
/// assert_eq!(percent_to_db(0), SILENCE_DB);
/// assert!((percent_to_db(50) + 3.0103).abs() < 1e-4);
/// ```
#[must_use]
pub fn percent_to_db(percent: u8) -> f64 {
    if percent == 0 {
        return SILENCE_DB;
    }
    10.0 * (f64::from(percent) / 100.0).log10()
}

/// A source track with the gain to apply to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainTrack<'a> {
    /// Source file.
    pub path: &'a Path,
    /// Gain in decibels.
    pub gain_db: f64,
}

impl<'a> From<&'a AudioTrack> for GainTrack<'a> {
    fn from(track: &'a AudioTrack) -> Self {
        Self {
            path: &track.path,
            gain_db: percent_to_db(track.volume),
        }
    }
}

/// Errors of an [`AudioTranscoder`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TranscodeError {
    /// The transcoder cannot handle these tracks.
    #[error("unsupported audio input: {0}")]
    Unsupported(String),
    /// Reading or writing a file failed.
    #[error("I/O failure on `{}`: {source}", path.display())]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The transcoder failed for another reason.
    #[error("transcoding failed: {0}")]
    Failed(String),
}

/// Mixes and encodes the audio of a map-set.
pub trait AudioTranscoder {
    /// Writes `tracks`, gained and mixed, into `dest`.
    ///
    /// # Errors
    ///
    /// Fails when the tracks cannot be read, mixed or encoded.
    fn transcode(&self, tracks: &[GainTrack<'_>], dest: &Path) -> Result<(), TranscodeError>;
}

impl<T: AudioTranscoder + ?Sized> AudioTranscoder for &T {
    fn transcode(&self, tracks: &[GainTrack<'_>], dest: &Path) -> Result<(), TranscodeError> {
        (**self).transcode(tracks, dest)
    }
}

/// Copies a single track at unity gain, byte for byte.
///
/// Useful when the audio is already encoded in the format named by
/// [`crate::config::ConvertConfig::audio_file_name`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyTranscoder;

impl AudioTranscoder for CopyTranscoder {
    fn transcode(&self, tracks: &[GainTrack<'_>], dest: &Path) -> Result<(), TranscodeError> {
        let [track] = tracks else {
            return Err(TranscodeError::Unsupported(format!(
                "cannot mix {} tracks without a transcoder",
                tracks.len()
            )));
        };
        if track.gain_db.abs() > 1e-9 {
            return Err(TranscodeError::Unsupported(format!(
                "cannot apply a gain of {} dB without a transcoder",
                track.gain_db
            )));
        }
        fs::copy(track.path, dest).map_err(|source| TranscodeError::Io {
            path: track.path.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_to_db() {
        assert_eq!(percent_to_db(100), 0.0);
        assert!((percent_to_db(10) + 10.0).abs() < 1e-9);
        assert!((percent_to_db(1) + 20.0).abs() < 1e-9);
        assert_eq!(percent_to_db(0), SILENCE_DB);
    }

    #[test]
    fn test_copy_transcoder() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("Inst.ogg");
        fs::write(&source, b"OggS").unwrap();
        let dest = dir.path().join("audio.mp3");

        let unity = AudioTrack::new(&source, 100);
        CopyTranscoder
            .transcode(&[GainTrack::from(&unity)], &dest)
            .unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"OggS");

        let quiet = AudioTrack::new(&source, 50);
        assert!(matches!(
            CopyTranscoder.transcode(&[GainTrack::from(&quiet)], &dest),
            Err(TranscodeError::Unsupported(_))
        ));
        assert!(matches!(
            CopyTranscoder.transcode(&[GainTrack::from(&unity), GainTrack::from(&unity)], &dest),
            Err(TranscodeError::Unsupported(_))
        ));
    }
}
