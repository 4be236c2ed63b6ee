use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::profile::{FAVICONS_FILE_NAME, PLACES_FILE_NAME};

const WAL_SUFFIX: &str = "-wal";

#[derive(Debug)]
pub enum SnapshotError {
    MissingStore(PathBuf),
    Copy {
        path: PathBuf,
        source: std::io::Error,
    },
    TempDir(std::io::Error),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingStore(path) => write!(f, "store missing: {}", path.display()),
            Self::Copy { path, source } => {
                write!(f, "copy of {} failed: {source}", path.display())
            }
            Self::TempDir(error) => write!(f, "temp dir error: {error}"),
        }
    }
}

impl std::error::Error for SnapshotError {}

/// A private copy of a profile's stores. The copies live in a directory that
/// is removed when the snapshot is dropped.
#[derive(Debug)]
pub struct Snapshot {
    dir: TempDir,
    main_path: PathBuf,
    favicon_path: Option<PathBuf>,
}

impl Snapshot {
    pub fn main_path(&self) -> &Path {
        &self.main_path
    }

    pub fn favicon_path(&self) -> Option<&Path> {
        self.favicon_path.as_deref()
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

pub fn snapshot(profile_dir: &Path, include_favicons: bool) -> Result<Snapshot, SnapshotError> {
    let source_main = profile_dir.join(PLACES_FILE_NAME);
    if !source_main.is_file() {
        return Err(SnapshotError::MissingStore(source_main));
    }

    let dir = tempfile::Builder::new()
        .prefix("foxmarks-db-")
        .tempdir()
        .map_err(SnapshotError::TempDir)?;

    let main_path = dir.path().join(PLACES_FILE_NAME);
    copy_store(&source_main, &main_path)?;

    let favicon_path = if include_favicons {
        copy_favicons(profile_dir, dir.path())
    } else {
        None
    };

    Ok(Snapshot {
        dir,
        main_path,
        favicon_path,
    })
}

fn copy_favicons(profile_dir: &Path, target_dir: &Path) -> Option<PathBuf> {
    let source = profile_dir.join(FAVICONS_FILE_NAME);
    if !source.is_file() {
        crate::logging::warn(&format!(
            "favicon store {} missing; icons disabled for this load",
            source.display()
        ));
        return None;
    }

    let target = target_dir.join(FAVICONS_FILE_NAME);
    match copy_store(&source, &target) {
        Ok(()) => Some(target),
        Err(error) => {
            crate::logging::warn(&format!("{error}; icons disabled for this load"));
            None
        }
    }
}

/// Copies a SQLite file and, when present, its write-ahead log.
fn copy_store(source: &Path, target: &Path) -> Result<(), SnapshotError> {
    std::fs::copy(source, target).map_err(|source_error| SnapshotError::Copy {
        path: source.to_path_buf(),
        source: source_error,
    })?;

    let source_wal = sidecar(source, WAL_SUFFIX);
    if source_wal.is_file() {
        std::fs::copy(&source_wal, sidecar(target, WAL_SUFFIX)).map_err(|source_error| {
            SnapshotError::Copy {
                path: source_wal.clone(),
                source: source_error,
            }
        })?;
    }
    Ok(())
}

fn sidecar(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::sidecar;
    use std::path::Path;

    #[test]
    fn sidecar_appends_suffix_to_full_name() {
        let wal = sidecar(Path::new("/tmp/x/places.sqlite"), "-wal");
        assert_eq!(wal, Path::new("/tmp/x/places.sqlite-wal"));
    }
}
