use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const PLACES_FILE_NAME: &str = "places.sqlite";
pub const FAVICONS_FILE_NAME: &str = "favicons.sqlite";
const REGISTRY_FILE_NAME: &str = "profiles.ini";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    NotFound { reason: String },
}

impl Display for ProfileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { reason } => write!(f, "profile not found: {reason}"),
        }
    }
}

impl std::error::Error for ProfileError {}

/// `~/.mozilla/firefox/profiles.ini`, when a home directory is known.
pub fn default_registry_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".mozilla/firefox").join(REGISTRY_FILE_NAME))
}

pub fn locate(explicit_dir: Option<&Path>) -> Result<PathBuf, ProfileError> {
    match default_registry_path() {
        Some(registry) => locate_with_registry(explicit_dir, &registry),
        None => explicit_profile(explicit_dir).ok_or_else(|| ProfileError::NotFound {
            reason: "no explicit profile and no home directory".to_string(),
        }),
    }
}

/// Resolves the profile directory: the explicit directory when it holds a
/// places store, else the registry's default profile when that directory exists.
pub fn locate_with_registry(
    explicit_dir: Option<&Path>,
    registry_path: &Path,
) -> Result<PathBuf, ProfileError> {
    if let Some(dir) = explicit_profile(explicit_dir) {
        return Ok(dir);
    }
    if let Some(dir) = explicit_dir {
        crate::logging::warn(&format!(
            "profile_dir {} has no {PLACES_FILE_NAME}; falling back to default profile",
            dir.display()
        ));
    }

    let registry_dir = registry_path.parent().unwrap_or(Path::new("."));

    let from_registry = match std::fs::read_to_string(registry_path) {
        Ok(text) => default_profile_entry(&text),
        Err(error) => {
            crate::logging::warn(&format!(
                "cannot read profile registry {}: {error}",
                registry_path.display()
            ));
            None
        }
    };

    match from_registry.map(|entry| entry.resolve(registry_dir)) {
        Some(dir) if dir.is_dir() => Ok(dir),
        Some(dir) => Err(ProfileError::NotFound {
            reason: format!(
                "default profile {} from {} does not exist",
                dir.display(),
                registry_path.display()
            ),
        }),
        None => Err(ProfileError::NotFound {
            reason: format!("no profile entry in {}", registry_path.display()),
        }),
    }
}

fn explicit_profile(explicit_dir: Option<&Path>) -> Option<PathBuf> {
    let dir = explicit_dir?;
    dir.join(PLACES_FILE_NAME)
        .is_file()
        .then(|| dir.to_path_buf())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileEntry {
    pub path: String,
    pub is_relative: bool,
    pub is_default: bool,
}

impl ProfileEntry {
    pub fn resolve(&self, registry_dir: &Path) -> PathBuf {
        if self.is_relative {
            registry_dir.join(&self.path)
        } else {
            PathBuf::from(&self.path)
        }
    }
}

/// Reads every `[Profile*]` section of a registry file in file order.
pub fn parse_profile_entries(text: &str) -> Vec<ProfileEntry> {
    let mut entries = Vec::new();
    let mut current: Option<ProfileEntry> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(section) = line.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            entries.extend(current.take().filter(|entry| !entry.path.is_empty()));
            if section.trim().starts_with("Profile") {
                current = Some(ProfileEntry::default());
            }
            continue;
        }

        let Some(entry) = current.as_mut() else {
            continue;
        };
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "Path" => entry.path = value.to_string(),
            "IsRelative" => entry.is_relative = value == "1",
            "Default" => entry.is_default = value == "1",
            _ => {}
        }
    }

    entries.extend(current.filter(|entry| !entry.path.is_empty()));
    entries
}

pub fn default_profile_entry(text: &str) -> Option<ProfileEntry> {
    let entries = parse_profile_entries(text);
    let default_index = entries
        .iter()
        .position(|entry| entry.is_default)
        .unwrap_or(0);
    entries.into_iter().nth(default_index)
}
