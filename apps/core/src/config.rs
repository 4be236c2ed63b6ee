use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const DEFAULT_MAX_RESULTS: usize = 10;
pub const DEFAULT_TRIGGER: &str = "f ";
const APP_DIR_NAME: &str = "foxmarks";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub profile_dir: Option<PathBuf>,
    pub use_favicon: bool,
    pub use_keyword: bool,
    pub max_results: usize,
    pub trigger: String,
    pub config_path: PathBuf,
    pub load_warnings: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile_dir: None,
            use_favicon: true,
            use_keyword: false,
            max_results: DEFAULT_MAX_RESULTS,
            trigger: DEFAULT_TRIGGER.to_string(),
            config_path: stable_app_data_dir().join(CONFIG_FILE_NAME),
            load_warnings: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(error) => write!(f, "io error: {error}"),
            Self::Parse(error) => write!(f, "parse error: {error}"),
            Self::Invalid(error) => write!(f, "invalid config: {error}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

pub fn stable_app_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfigFile {
    general: RawGeneral,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawGeneral {
    profile_dir: Option<String>,
    use_favicon: Option<Flag>,
    use_keyword: Option<Flag>,
    max_results: Option<usize>,
    trigger: Option<String>,
}

/// Boolean settings arrive as `"1"`/`"0"` strings in older config files, so
/// every spelling a user may reasonably write is accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl Flag {
    fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::Int(0) => Some(false),
            Self::Int(1) => Some(true),
            Self::Int(_) => None,
            Self::Text(value) => parse_flag(value),
        }
    }
}

pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Loads the config at `path`, or at the stable default location when `None`.
/// A missing file yields defaults; absent optional keys only add warnings.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| stable_app_data_dir().join(CONFIG_FILE_NAME));

    let raw = if config_path.exists() {
        let text = std::fs::read_to_string(&config_path)?;
        parse_raw(&text, &config_path)?
    } else {
        RawConfigFile::default()
    };

    let mut cfg = from_raw(raw.general);
    cfg.config_path = config_path;
    validate(&cfg)?;
    Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.max_results == 0 || cfg.max_results > 100 {
        return Err(ConfigError::Invalid(
            "max_results must be between 1 and 100".into(),
        ));
    }

    if cfg.config_path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid("config_path is required".into()));
    }

    Ok(())
}

fn parse_raw(text: &str, path: &Path) -> Result<RawConfigFile, ConfigError> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("json5"));

    if is_json {
        json5::from_str(text)
            .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))
    } else {
        toml::from_str(text)
            .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))
    }
}

fn from_raw(raw: RawGeneral) -> Config {
    let mut cfg = Config::default();

    match raw.profile_dir.filter(|dir| !dir.trim().is_empty()) {
        Some(dir) => cfg.profile_dir = Some(PathBuf::from(dir.trim())),
        None => cfg
            .load_warnings
            .push("config profile_dir not defined; fallback = default profile".to_string()),
    }

    cfg.use_favicon = resolve_flag(
        "use_favicon",
        raw.use_favicon,
        cfg.use_favicon,
        &mut cfg.load_warnings,
    );
    cfg.use_keyword = resolve_flag(
        "use_keyword",
        raw.use_keyword,
        cfg.use_keyword,
        &mut cfg.load_warnings,
    );

    if let Some(max_results) = raw.max_results {
        cfg.max_results = max_results;
    }
    if let Some(trigger) = raw.trigger {
        cfg.trigger = trigger;
    }

    cfg
}

fn resolve_flag(
    key: &str,
    value: Option<Flag>,
    fallback: bool,
    warnings: &mut Vec<String>,
) -> bool {
    let Some(flag) = value else {
        warnings.push(format!("config {key} not defined; fallback = {fallback}"));
        return fallback;
    };

    match flag.as_bool() {
        Some(parsed) => parsed,
        None => {
            warnings.push(format!(
                "config {key} has unrecognised value {flag:?}; fallback = {fallback}"
            ));
            fallback
        }
    }
}
