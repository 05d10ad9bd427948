//! Export of a map-set into an `.osz` archive.
//!
//! The export runs as a sequence of steps on the calling thread:
//!
//! 1. a folder named `"{artist} - {title}"` is created in the destination directory,
//! 2. the audio tracks are mixed into it by an [`AudioTranscoder`],
//! 3. the background image is copied into it, if any,
//! 4. one `.osu` file is written per difficulty,
//! 5. the folder is compressed into `"{artist} - {title}.osz"`, or `"... (n).osz"` when
//!    that archive already exists,
//! 6. the folder is removed.
//!
//! A [`Progress`] is reported when each step starts and once more when the export is
//! done. A [`CancellationToken`] is checked between steps. When the export is cancelled
//! or fails, the folder and the archive it created are removed again.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use fnf2osu::prelude::*;
//!
//! # fn run(mapset: &Mapset) -> Result<(), ExportError> {
//! let config = ConvertConfig::default();
//! let archive = Exporter::new(mapset, &config, CopyTranscoder)
//!     .export(Path::new("out"), |progress| {
//!         println!("[{:>3}%] {}", progress.percentage(), progress.message);
//!     })?;
//! println!("written {}", archive.display());
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod audio;
pub mod cancel;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{info, warn};
use thiserror::Error;

pub use self::{
    audio::{AudioTranscoder, CopyTranscoder, GainTrack, TranscodeError},
    cancel::CancellationToken,
};
use crate::{
    config::ConvertConfig,
    error::{ConvertError, ResourceKind},
    mapset::Mapset,
    osu::{beatmap_file_name, write_beatmap},
    util::{sanitize_file_name, unused_path},
};

/// State of an export at the start of a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Index of the step, `total` once the export is done.
    pub current: usize,
    /// Number of steps.
    pub total: usize,
    /// Human readable description of the step.
    pub message: String,
}

impl Progress {
    /// Completion in percent, rounded down.
    #[must_use]
    pub const fn percentage(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        self.current * 100 / self.total
    }
}

/// Why an export stopped.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    /// The export was cancelled through its [`CancellationToken`].
    #[error("the export was cancelled")]
    Cancelled,
    /// Validation, conversion or file system failure.
    #[error(transparent)]
    Convert(#[from] ConvertError),
    /// The audio could not be transcoded.
    #[error(transparent)]
    Transcode(#[from] TranscodeError),
}

/// Progress of a running export and the files it created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportJob {
    current: Option<usize>,
    total: usize,
    folder: Option<PathBuf>,
    archive: Option<PathBuf>,
}

impl ExportJob {
    /// Creates a job of `total` steps.
    #[must_use]
    pub const fn new(total: usize) -> Self {
        Self {
            current: None,
            total,
            folder: None,
            archive: None,
        }
    }

    /// Index of the step in progress, if any started.
    #[must_use]
    pub const fn current(&self) -> Option<usize> {
        self.current
    }

    /// Number of steps.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// The map-set folder, while it exists.
    #[must_use]
    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    /// The archive, once its creation started.
    #[must_use]
    pub fn archive(&self) -> Option<&Path> {
        self.archive.as_deref()
    }

    fn advance(&mut self, message: impl Into<String>, on_progress: &mut impl FnMut(&Progress)) {
        let current = self.current.map_or(0, |current| current + 1);
        self.current = Some(current);
        let progress = Progress {
            current,
            total: self.total,
            message: message.into(),
        };
        info!(
            "[{}/{}] {}",
            progress.current, progress.total, progress.message
        );
        on_progress(&progress);
    }

    /// Writes the archive and records it for rollback once this job owns the file.
    fn compress(&mut self, folder: &Path, archive: &Path) -> Result<(), ConvertError> {
        let result = archive::write_archive(folder, archive);
        let foreign = matches!(
            &result,
            Err(ConvertError::Io { path, source })
                if path == archive && source.kind() == io::ErrorKind::AlreadyExists
        );
        if !foreign {
            self.archive = Some(archive.to_path_buf());
        }
        result.map(|_| ())
    }

    /// Removes the folder and the archive created so far.
    fn rollback(&mut self) {
        if let Some(folder) = self.folder.take() {
            remove_quietly(&folder, fs::remove_dir_all(&folder));
        }
        if let Some(archive) = self.archive.take() {
            remove_quietly(&archive, fs::remove_file(&archive));
        }
    }
}

fn remove_quietly(path: &Path, result: io::Result<()>) {
    match result {
        Ok(()) => info!("removed {}", path.display()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => warn!("failed to remove {}: {err}", path.display()),
    }
}

/// Exports a [`Mapset`] with the help of an [`AudioTranscoder`].
#[derive(Debug)]
pub struct Exporter<'a, T> {
    mapset: &'a Mapset,
    config: &'a ConvertConfig,
    transcoder: T,
    cancellation: CancellationToken,
}

impl<'a, T: AudioTranscoder> Exporter<'a, T> {
    /// Creates an exporter that is never cancelled.
    pub fn new(mapset: &'a Mapset, config: &'a ConvertConfig, transcoder: T) -> Self {
        Self {
            mapset,
            config,
            transcoder,
            cancellation: CancellationToken::new(),
        }
    }

    /// Makes the export stop at the next step boundary once `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Number of steps, the final `done` report excluded.
    #[must_use]
    pub fn total_steps(&self) -> usize {
        let background = usize::from(self.mapset.metadata.background.is_some());
        // initialization, folder, audio, compression, folder removal
        5 + background + self.mapset.len()
    }

    /// Runs the export into `dest_dir` and returns the path of the archive.
    ///
    /// # Errors
    ///
    /// Fails with [`ExportError::Cancelled`] when cancelled, and with the cause of the
    /// failure otherwise. Either way, nothing created by the export is left behind.
    pub fn export(
        &self,
        dest_dir: &Path,
        mut on_progress: impl FnMut(&Progress),
    ) -> Result<PathBuf, ExportError> {
        let mut job = ExportJob::new(self.total_steps());
        let result = self.run(&mut job, dest_dir, &mut on_progress);
        if let Err(err) = &result {
            warn!("export failed: {err}");
            job.rollback();
        }
        result
    }

    fn checkpoint(&self) -> Result<(), ExportError> {
        if self.cancellation.is_cancelled() {
            return Err(ExportError::Cancelled);
        }
        Ok(())
    }

    fn run(
        &self,
        job: &mut ExportJob,
        dest_dir: &Path,
        on_progress: &mut impl FnMut(&Progress),
    ) -> Result<PathBuf, ExportError> {
        let metadata = &self.mapset.metadata;

        job.advance("Initialization...", on_progress);
        self.mapset.validate()?;
        if !dest_dir.is_dir() {
            return Err(ConvertError::MissingResource {
                kind: ResourceKind::OutputDirectory,
                path: dest_dir.to_path_buf(),
            }
            .into());
        }
        let name = sanitize_file_name(&format!(
            "{} - {}",
            metadata.artist_or_unknown(),
            metadata.title
        ));

        self.checkpoint()?;
        job.advance("Creating the folder...", on_progress);
        let folder = unused_path(dest_dir, &name, "");
        fs::create_dir(&folder).map_err(|err| ConvertError::io(&folder, err))?;
        job.folder = Some(folder.clone());

        self.checkpoint()?;
        job.advance("Exporting the audio...", on_progress);
        let tracks: Vec<GainTrack<'_>> = metadata.audio.iter().map(GainTrack::from).collect();
        self.transcoder
            .transcode(&tracks, &folder.join(&self.config.audio_file_name))?;

        if let Some(background) = &metadata.background {
            self.checkpoint()?;
            job.advance("Importing the background...", on_progress);
            let dest = folder.join(&self.config.background_file_name);
            fs::copy(background, &dest).map_err(|err| ConvertError::io(background, err))?;
        }

        for (difficulty, chart) in self.mapset.difficulties() {
            self.checkpoint()?;
            job.advance(
                format!("Creating the .osu file for the difficulty '{difficulty}'..."),
                on_progress,
            );
            let resolved = chart.resolve(metadata, self.config)?;
            let text = write_beatmap(
                metadata,
                &resolved,
                difficulty,
                &metadata.creator,
                self.config,
            )
            .map_err(ConvertError::from)?;
            let path = folder.join(beatmap_file_name(metadata, difficulty, &metadata.creator));
            fs::write(&path, text).map_err(|err| ConvertError::io(&path, err))?;
        }

        self.checkpoint()?;
        job.advance("Compressing the generated folder to .osz file...", on_progress);
        let archive = unused_path(dest_dir, &name, "osz");
        job.compress(&folder, &archive)?;

        self.checkpoint()?;
        job.advance("Removing previously generated folder...", on_progress);
        fs::remove_dir_all(&folder).map_err(|err| ConvertError::io(&folder, err))?;
        job.folder = None;

        job.advance("Export done. The .osz has been created.", on_progress);
        Ok(archive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        let progress = |current, total| Progress {
            current,
            total,
            message: String::new(),
        };
        assert_eq!(progress(0, 7).percentage(), 0);
        assert_eq!(progress(3, 7).percentage(), 42);
        assert_eq!(progress(7, 7).percentage(), 100);
        assert_eq!(progress(1, 0).percentage(), 0);
    }

    #[test]
    fn test_job_counts_steps() {
        let mut job = ExportJob::new(2);
        let mut seen = Vec::new();
        job.advance("one", &mut |progress: &Progress| seen.push(progress.clone()));
        job.advance("two", &mut |progress: &Progress| seen.push(progress.clone()));
        assert_eq!(job.current(), Some(1));
        assert_eq!(
            seen.iter().map(|p| (p.current, p.message.as_str())).collect::<Vec<_>>(),
            vec![(0, "one"), (1, "two")]
        );
    }

    #[test]
    fn test_existing_archive_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("set");
        let archive = dir.path().join("set.osz");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("a.osu"), "").unwrap();
        fs::write(&archive, "someone else's").unwrap();

        let mut job = ExportJob {
            folder: Some(folder.clone()),
            ..ExportJob::new(3)
        };
        assert!(job.compress(&folder, &archive).is_err());
        assert_eq!(job.archive(), None);
        job.rollback();
        assert_eq!(fs::read_to_string(&archive).unwrap(), "someone else's");
        assert!(!folder.exists());
    }

    #[test]
    fn test_compressed_archive_is_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("set");
        let archive = dir.path().join("set.osz");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("a.osu"), "").unwrap();

        let mut job = ExportJob::new(3);
        job.compress(&folder, &archive).unwrap();
        assert_eq!(job.archive(), Some(archive.as_path()));
    }

    #[test]
    fn test_rollback_removes_created_files() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("set");
        let archive = dir.path().join("set.osz");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("a.osu"), "").unwrap();

        let mut job = ExportJob {
            folder: Some(folder.clone()),
            archive: Some(archive.clone()),
            ..ExportJob::new(3)
        };
        job.rollback();
        assert!(!folder.exists());
        assert!(!archive.exists());
        assert_eq!(job.folder(), None);
    }
}
