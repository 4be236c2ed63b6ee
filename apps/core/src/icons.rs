use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};
use tempfile::TempDir;

use crate::model::BookmarkRecord;

/// Host icon spec for the generic browser icon.
pub const FALLBACK_ICON: &str = "xdg:firefox";
const ICON_FILE_PREFIX: &str = "favicon_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconRef {
    File(PathBuf),
    Fallback,
}

impl IconRef {
    pub fn as_host_spec(&self) -> String {
        match self {
            Self::File(path) => path.to_string_lossy().into_owned(),
            Self::Fallback => FALLBACK_ICON.to_string(),
        }
    }
}

impl Serialize for IconRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_host_spec())
    }
}

#[derive(Debug)]
pub struct IconWriteError {
    pub ordinal: usize,
    pub path: PathBuf,
    pub source: std::io::Error,
}

impl Display for IconWriteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "icon {} write to {} failed: {}",
            self.ordinal,
            self.path.display(),
            self.source
        )
    }
}

impl std::error::Error for IconWriteError {}

/// Icon files for one session, addressed by record ordinal. The directory is
/// removed when the store is dropped.
#[derive(Debug, Default)]
pub struct IconStore {
    dir: Option<TempDir>,
}

impl IconStore {
    pub fn empty() -> Self {
        Self { dir: None }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_ref().map(TempDir::path)
    }

    pub fn lookup(&self, ordinal: usize) -> IconRef {
        let Some(dir) = self.dir() else {
            return IconRef::Fallback;
        };
        let path = icon_path(dir, ordinal);
        if path.is_file() {
            IconRef::File(path)
        } else {
            IconRef::Fallback
        }
    }
}

fn icon_path(dir: &Path, ordinal: usize) -> PathBuf {
    dir.join(format!("{ICON_FILE_PREFIX}{ordinal}"))
}

/// Writes every record's icon bytes into a fresh directory. A failed write
/// only costs that record its icon.
pub fn materialize(records: &[BookmarkRecord]) -> (IconStore, Vec<IconWriteError>) {
    let dir = match tempfile::Builder::new().prefix("foxmarks-icons-").tempdir() {
        Ok(dir) => dir,
        Err(error) => {
            crate::logging::warn(&format!("cannot create icon directory: {error}"));
            return (IconStore::empty(), Vec::new());
        }
    };

    let failures = write_icons(dir.path(), records);
    for failure in &failures {
        crate::logging::warn(&failure.to_string());
    }

    (IconStore { dir: Some(dir) }, failures)
}

fn write_icons(dir: &Path, records: &[BookmarkRecord]) -> Vec<IconWriteError> {
    records
        .iter()
        .filter_map(|record| {
            let bytes = record.icon_bytes.as_deref()?;
            let path = icon_path(dir, record.ordinal);
            std::fs::write(&path, bytes)
                .err()
                .map(|source| IconWriteError {
                    ordinal: record.ordinal,
                    path,
                    source,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{write_icons, IconRef, IconStore, FALLBACK_ICON};
    use crate::model::BookmarkRecord;

    #[test]
    fn empty_store_always_falls_back() {
        let store = IconStore::empty();
        assert_eq!(store.lookup(0), IconRef::Fallback);
        assert_eq!(store.lookup(0).as_host_spec(), FALLBACK_ICON);
    }

    #[test]
    fn write_failure_is_isolated_to_one_record() {
        let dir = tempfile::tempdir().unwrap();
        // A directory squatting on ordinal 0's file name makes that write fail.
        std::fs::create_dir(dir.path().join("favicon_0")).unwrap();
        let first = BookmarkRecord::new(0, "a", "https://a.example", None);
        let second = BookmarkRecord::new(1, "b", "https://b.example", None);
        let records = vec![first.with_icon(vec![1]), second.with_icon(vec![2, 3])];

        let failures = write_icons(dir.path(), &records);

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].ordinal, 0);
        let written = std::fs::read(dir.path().join("favicon_1")).unwrap();
        assert_eq!(written, vec![2, 3]);
    }
}
