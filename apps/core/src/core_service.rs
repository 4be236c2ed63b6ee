use crate::action_executor::{OpenError, SystemUrlOpener, UrlOpener};
use crate::config::{validate, Config, ConfigError};
use crate::contract::{
    parse_result_id, CoreRequest, CoreResponse, OpenResponse, ReloadResponse, ResultAction,
    ResultItem, SearchResponse, OPEN_ACTION_ID,
};
use crate::model::Query;
use crate::session::{ProfileSource, Session};

#[derive(Debug)]
pub enum ServiceError {
    Config(ConfigError),
    Open(OpenError),
    InvalidRequest(String),
    ItemNotFound(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(error) => write!(f, "config error: {error}"),
            Self::Open(error) => write!(f, "open error: {error}"),
            Self::InvalidRequest(message) => write!(f, "invalid request: {message}"),
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<ConfigError> for ServiceError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<OpenError> for ServiceError {
    fn from(value: OpenError) -> Self {
        Self::Open(value)
    }
}

/// The plugin as the host sees it: a loaded session plus the open action.
pub struct CoreService {
    config: Config,
    source: ProfileSource,
    session: Session,
    opener: Box<dyn UrlOpener>,
}

impl CoreService {
    pub fn new(config: Config) -> Result<Self, ServiceError> {
        let source = ProfileSource::from_config(&config);
        Self::with_source(config, source, Box::new(SystemUrlOpener))
    }

    pub fn with_source(
        config: Config,
        source: ProfileSource,
        opener: Box<dyn UrlOpener>,
    ) -> Result<Self, ServiceError> {
        validate(&config)?;
        let session = Session::start_from(&config, &source);
        Ok(Self {
            config,
            source,
            session,
            opener,
        })
    }

    pub fn with_session(
        config: Config,
        session: Session,
        opener: Box<dyn UrlOpener>,
    ) -> Result<Self, ServiceError> {
        validate(&config)?;
        let source = ProfileSource::from_config(&config);
        Ok(Self {
            config,
            source,
            session,
            opener,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn handle_query(&self, query: &Query) -> Vec<ResultItem> {
        self.session.query(query)
    }

    pub fn search(&self, query: &str, limit: usize) -> Vec<ResultItem> {
        let effective_limit = if limit == 0 {
            self.config.max_results
        } else {
            limit.min(self.config.max_results)
        };
        self.session
            .query_with_limit(&Query::new(query), effective_limit)
    }

    pub fn open(&self, result_id: &str) -> Result<String, ServiceError> {
        if result_id.trim().is_empty() {
            return Err(ServiceError::InvalidRequest(
                "result id is empty".to_string(),
            ));
        }
        let record = parse_result_id(result_id)
            .and_then(|ordinal| self.session.index().get(ordinal))
            .ok_or_else(|| ServiceError::ItemNotFound(result_id.to_string()))?;
        self.opener.open_url(&record.url)?;
        Ok(record.url.clone())
    }

    /// Runs an action taken from a result item; the action carries its own URL.
    pub fn trigger(&self, action: &ResultAction) -> Result<(), ServiceError> {
        if action.id != OPEN_ACTION_ID {
            return Err(ServiceError::InvalidRequest(format!(
                "unknown action '{}'",
                action.id
            )));
        }
        self.opener.open_url(&action.url)?;
        Ok(())
    }

    /// Replaces the session wholesale. The old icon directory is removed once
    /// the new session is in place.
    pub fn reload(&mut self) -> usize {
        self.session = Session::start_from(&self.config, &self.source);
        self.session.len()
    }

    pub fn handle_command(&mut self, request: CoreRequest) -> Result<CoreResponse, ServiceError> {
        match request {
            CoreRequest::Search(request) => {
                let results = self
                    .search(&request.query, request.limit.unwrap_or(0))
                    .into_iter()
                    .map(Into::into)
                    .collect();
                Ok(CoreResponse::Search(SearchResponse { results }))
            }
            CoreRequest::Open(request) => {
                let url = self.open(&request.id)?;
                Ok(CoreResponse::Open(OpenResponse { opened: true, url }))
            }
            CoreRequest::Reload => Ok(CoreResponse::Reload(ReloadResponse {
                indexed: self.reload(),
            })),
        }
    }
}

/// Strips the trigger prefix from a raw input line. `None` means the line was
/// not addressed to this plugin.
pub fn strip_trigger<'a>(raw: &'a str, trigger: &str) -> Option<&'a str> {
    if trigger.is_empty() {
        return Some(raw);
    }
    raw.strip_prefix(trigger)
}
