//! Builds the `posts.json` manifest from a local directory of posts. Post
//! files are plain text named `YYYY-MM-DD_Title.txt`; the manifest lists
//! them newest first so the front end never has to call a rate-limited
//! directory-listing API.

use crate::post::ManifestEntry;
use serde::Serialize;
use serde_json::Map;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const TEXT_EXTENSION: &str = ".txt";

/// Parses a post file name into a manifest entry. Names without the `.txt`
/// suffix or without a `_` between date and title are not posts.
pub fn entry_from_file_name(file_name: &str) -> Option<ManifestEntry> {
    let stem = file_name.strip_suffix(TEXT_EXTENSION)?;
    let i = stem.find('_')?;
    Some(ManifestEntry {
        date: stem[..i].trim().to_owned(),
        title: stem[i + 1..].trim().to_owned(),
        filename: file_name.to_owned(),
        extra: Map::new(),
    })
}

/// Scans `posts_directory` (not recursively) for post files and returns
/// their entries sorted by date, newest first. Posts sharing a date keep file
/// name order. The directory is created when it does not exist yet.
pub fn scan_posts(posts_directory: &Path) -> Result<Vec<ManifestEntry>> {
    if !posts_directory.exists() {
        log::info!("creating {}", posts_directory.display());
        std::fs::create_dir_all(posts_directory).map_err(|err| Error::CreateDirectory {
            path: posts_directory.to_owned(),
            err,
        })?;
    }

    let mut entries = Vec::new();
    for result in WalkDir::new(posts_directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
    {
        let entry = result?;
        // `Path::is_file` follows symlinks; dangling links are skipped.
        if !entry.path().is_file() {
            continue;
        }
        match entry.file_name().to_str().and_then(entry_from_file_name) {
            Some(manifest_entry) => entries.push(manifest_entry),
            None => log::debug!("skipping {}", entry.path().display()),
        }
    }

    entries.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(entries)
}

/// Writes `entries` as a JSON array indented by four spaces. Non-ASCII text
/// is written as-is.
pub fn write_manifest<W: Write>(entries: &[ManifestEntry], w: W) -> Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(w, formatter);
    entries.serialize(&mut serializer)?;
    Ok(())
}

/// Scans `posts_directory` and writes the manifest to `output`. Returns the
/// number of posts written.
pub fn update_manifest(posts_directory: &Path, output: &Path) -> Result<usize> {
    let entries = scan_posts(posts_directory)?;
    let file = std::fs::File::create(output).map_err(|err| Error::CreateManifest {
        path: output.to_owned(),
        err,
    })?;
    let mut writer = std::io::BufWriter::new(file);
    write_manifest(&entries, &mut writer)?;
    writer.flush().map_err(|err| Error::WriteManifest {
        path: output.to_owned(),
        err,
    })?;
    log::info!("updated {} with {} posts", output.display(), entries.len());
    Ok(entries.len())
}

/// The result of a manifest operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error building the manifest.
#[derive(Debug)]
pub enum Error {
    /// Returned when the posts directory can't be created.
    CreateDirectory { path: PathBuf, err: std::io::Error },

    /// Returned when the manifest file can't be created.
    CreateManifest { path: PathBuf, err: std::io::Error },

    /// Returned when the manifest can't be written out.
    WriteManifest { path: PathBuf, err: std::io::Error },

    /// Returned for errors walking the posts directory.
    WalkDir(walkdir::Error),

    /// Returned for errors serializing the manifest.
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::CreateDirectory { path, err } => {
                write!(f, "creating directory `{}`: {}", path.display(), err)
            }
            Error::CreateManifest { path, err } => {
                write!(f, "creating manifest `{}`: {}", path.display(), err)
            }
            Error::WriteManifest { path, err } => {
                write!(f, "writing manifest `{}`: {}", path.display(), err)
            }
            Error::WalkDir(err) => err.fmt(f),
            Error::Json(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::CreateDirectory { path: _, err } => Some(err),
            Error::CreateManifest { path: _, err } => Some(err),
            Error::WriteManifest { path: _, err } => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Json(err) => Some(err),
        }
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator while walking the posts directory.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Json(err)
    }
}
