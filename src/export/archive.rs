//! `.osz` archive writing. An `.osz` file is a zip archive of the map-set folder.

use std::{
    fs::{self, File},
    io,
    path::Path,
};

use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::error::ConvertError;

/// Compresses every file directly inside `folder` into a new archive at `archive`.
///
/// Entries are stored at the archive root, sorted by name. Subdirectories are ignored.
///
/// # Errors
///
/// Fails when the folder cannot be listed, a file cannot be read, or the archive
/// cannot be written.
pub fn write_archive(folder: &Path, archive: &Path) -> Result<usize, ConvertError> {
    let mut entries = fs::read_dir(folder)
        .and_then(|dir| dir.collect::<io::Result<Vec<_>>>())
        .map_err(|err| ConvertError::io(folder, err))?;
    entries.retain(|entry| entry.file_type().is_ok_and(|kind| kind.is_file()));
    entries.sort_by_key(fs::DirEntry::file_name);

    let file = File::create_new(archive).map_err(|err| ConvertError::io(archive, err))?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for entry in &entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        writer
            .start_file(name, options)
            .map_err(|err| ConvertError::io(archive, err.into()))?;
        let path = entry.path();
        let mut source = File::open(&path).map_err(|err| ConvertError::io(&path, err))?;
        io::copy(&mut source, &mut writer).map_err(|err| ConvertError::io(archive, err))?;
    }
    writer
        .finish()
        .map_err(|err| ConvertError::io(archive, err.into()))?;
    Ok(entries.len())
}
