use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::contract::ResultItem;
use crate::icons::{self, IconStore};
use crate::index::BookmarkIndex;
use crate::loader::{self, LoadError};
use crate::model::Query;
use crate::profile::{self, ProfileError};
use crate::search::QueryEngine;
use crate::snapshot::{self, SnapshotError};

#[derive(Debug)]
pub enum SessionError {
    Profile(ProfileError),
    Snapshot(SnapshotError),
    Load(LoadError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Profile(error) => write!(f, "{error}"),
            Self::Snapshot(error) => write!(f, "snapshot failed: {error}"),
            Self::Load(error) => write!(f, "load failed: {error}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<ProfileError> for SessionError {
    fn from(value: ProfileError) -> Self {
        Self::Profile(value)
    }
}

impl From<SnapshotError> for SessionError {
    fn from(value: SnapshotError) -> Self {
        Self::Snapshot(value)
    }
}

impl From<LoadError> for SessionError {
    fn from(value: LoadError) -> Self {
        Self::Load(value)
    }
}

/// Where a session reads its profile from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileSource {
    /// Explicit directory, falling back to the user's profile registry.
    Default(Option<PathBuf>),
    /// Explicit directory, falling back to the given registry file.
    Registry {
        explicit: Option<PathBuf>,
        registry: PathBuf,
    },
}

impl ProfileSource {
    pub fn from_config(config: &Config) -> Self {
        Self::Default(config.profile_dir.clone())
    }

    fn locate(&self) -> Result<PathBuf, ProfileError> {
        match self {
            Self::Default(explicit) => profile::locate(explicit.as_deref()),
            Self::Registry { explicit, registry } => {
                profile::locate_with_registry(explicit.as_deref(), registry)
            }
        }
    }
}

/// One load-to-teardown cycle: the index and the icon files written for it.
/// Dropping the session removes the icon directory.
#[derive(Debug)]
pub struct Session {
    index: BookmarkIndex,
    icons: IconStore,
    engine: QueryEngine,
    icon_failures: usize,
}

impl Session {
    pub fn empty(config: &Config) -> Self {
        Self {
            index: BookmarkIndex::empty(),
            icons: IconStore::empty(),
            engine: engine_for(config),
            icon_failures: 0,
        }
    }

    /// Loads a session, degrading to an empty one on any failure.
    pub fn start(config: &Config) -> Self {
        Self::start_from(config, &ProfileSource::from_config(config))
    }

    pub fn start_from(config: &Config, source: &ProfileSource) -> Self {
        for warning in &config.load_warnings {
            crate::logging::warn(warning);
        }

        let session = match Self::try_start_from(config, source) {
            Ok(session) => session,
            Err(error) => {
                crate::logging::warn(&format!(
                    "foxmarks: {error}; serving an empty bookmark index"
                ));
                Self::empty(config)
            }
        };
        crate::logging::info(&format!("foxmarks: {} bookmarks indexed", session.len()));
        session
    }

    pub fn try_start(config: &Config) -> Result<Self, SessionError> {
        Self::try_start_from(config, &ProfileSource::from_config(config))
    }

    pub fn try_start_from(config: &Config, source: &ProfileSource) -> Result<Self, SessionError> {
        let profile_dir = source.locate()?;
        Self::load_profile(config, &profile_dir)
    }

    pub fn load_profile(config: &Config, profile_dir: &Path) -> Result<Self, SessionError> {
        let records = {
            let snapshot = snapshot::snapshot(profile_dir, config.use_favicon)?;
            loader::load(snapshot.main_path(), snapshot.favicon_path())?
        };

        let (icons, failures) = if config.use_favicon {
            icons::materialize(&records)
        } else {
            (IconStore::empty(), Vec::new())
        };

        Ok(Self {
            index: BookmarkIndex::new(records),
            icons,
            engine: engine_for(config),
            icon_failures: failures.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &BookmarkIndex {
        &self.index
    }

    pub fn icons(&self) -> &IconStore {
        &self.icons
    }

    pub fn engine(&self) -> QueryEngine {
        self.engine
    }

    pub fn icon_failures(&self) -> usize {
        self.icon_failures
    }

    pub fn query(&self, query: &Query) -> Vec<ResultItem> {
        self.query_with_limit(query, self.engine.limit)
    }

    pub fn query_with_limit(&self, query: &Query, limit: usize) -> Vec<ResultItem> {
        if !query.valid {
            return Vec::new();
        }

        let engine = QueryEngine {
            limit: limit.min(self.engine.limit),
            ..self.engine
        };
        engine
            .search(&self.index, &query.text)
            .into_iter()
            .map(|record| ResultItem::from_record(record, self.icons.lookup(record.ordinal)))
            .collect()
    }
}

fn engine_for(config: &Config) -> QueryEngine {
    QueryEngine::new(config.use_keyword, config.max_results)
}
