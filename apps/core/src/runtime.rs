use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{self, ConfigError};
use crate::contract::{SearchResponse, SearchResultDto};
use crate::core_service::{strip_trigger, CoreService, ServiceError};
use crate::model::Query;

#[derive(Debug)]
pub enum RuntimeError {
    Config(ConfigError),
    Service(ServiceError),
    Io(std::io::Error),
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(error) => write!(f, "config error: {error}"),
            Self::Service(error) => write!(f, "service error: {error}"),
            Self::Io(error) => write!(f, "io error: {error}"),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<ConfigError> for RuntimeError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<ServiceError> for RuntimeError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub config_path: Option<PathBuf>,
    pub profile_dir: Option<PathBuf>,
    pub keywords: bool,
    pub no_favicons: bool,
    pub limit: Option<usize>,
    pub open_id: Option<String>,
    pub input_line: Option<String>,
    pub serve_stdin: bool,
    pub query: Vec<String>,
}

pub fn parse_cli_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => options.config_path = Some(PathBuf::from(next_value(&mut iter, arg)?)),
            "--profile" => options.profile_dir = Some(PathBuf::from(next_value(&mut iter, arg)?)),
            "--keywords" => options.keywords = true,
            "--no-favicons" => options.no_favicons = true,
            "--limit" => {
                let raw = next_value(&mut iter, arg)?;
                let limit = raw
                    .parse::<usize>()
                    .map_err(|_| format!("invalid --limit value '{raw}'"))?;
                options.limit = Some(limit);
            }
            "--open" => options.open_id = Some(next_value(&mut iter, arg)?.to_string()),
            "--input" => options.input_line = Some(next_value(&mut iter, arg)?.to_string()),
            "--stdin" => options.serve_stdin = true,
            "--" => options.query.extend(iter.by_ref().cloned()),
            flag if flag.starts_with("--") => return Err(format!("unknown flag '{flag}'")),
            word => options.query.push(word.to_string()),
        }
    }

    Ok(options)
}

fn next_value<'a>(iter: &mut std::slice::Iter<'a, String>, flag: &str) -> Result<&'a str, String> {
    iter.next()
        .map(String::as_str)
        .ok_or_else(|| format!("missing value for {flag}"))
}

pub fn run_with_options(options: CliOptions) -> Result<(), RuntimeError> {
    if let Err(error) = crate::logging::init() {
        eprintln!("[foxmarks-core] logging disabled: {error}");
    }

    let mut config = config::load(options.config_path.as_deref())?;
    if options.profile_dir.is_some() {
        config.profile_dir = options.profile_dir.clone();
    }
    if options.keywords {
        config.use_keyword = true;
    }
    if options.no_favicons {
        config.use_favicon = false;
    }

    let mut service = CoreService::new(config)?;
    eprintln!(
        "[foxmarks-core] startup config_path={} indexed_items={}",
        service.config().config_path.display(),
        service.session().len()
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if options.serve_stdin {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let reply = crate::transport::handle_json(&mut service, &line);
            writeln!(out, "{reply}")?;
            out.flush()?;
        }
        return Ok(());
    }

    let results = match &options.input_line {
        Some(raw) => match strip_trigger(raw, &service.config().trigger) {
            Some(text) => service.handle_query(&Query::new(text)),
            None => Vec::new(),
        },
        None => service.search(&options.query.join(" "), options.limit.unwrap_or(0)),
    };

    let response = SearchResponse {
        results: results.into_iter().map(SearchResultDto::from).collect(),
    };
    let encoded = serde_json::to_string_pretty(&response)
        .map_err(|e| RuntimeError::Io(std::io::Error::other(e)))?;
    writeln!(out, "{encoded}")?;

    if let Some(id) = &options.open_id {
        let url = service.open(id)?;
        eprintln!("[foxmarks-core] opened {url}");
    }

    Ok(())
}
