use std::fmt::{Display, Formatter};
use std::process::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenError {
    EmptyUrl,
    LaunchFailed { message: String },
}

impl Display for OpenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "empty url"),
            Self::LaunchFailed { message } => write!(f, "launch failed: {message}"),
        }
    }
}

impl std::error::Error for OpenError {}

/// The host's "open this URL" facility.
pub trait UrlOpener: Send + Sync {
    fn open_url(&self, url: &str) -> Result<(), OpenError>;
}

/// Hands URLs to the desktop's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemUrlOpener;

impl UrlOpener for SystemUrlOpener {
    fn open_url(&self, url: &str) -> Result<(), OpenError> {
        let target = validate_url(url)?;
        match system_open_command(target).spawn() {
            Ok(_) => Ok(()),
            Err(error) => Err(OpenError::LaunchFailed {
                message: error.to_string(),
            }),
        }
    }
}

pub fn validate_url(url: &str) -> Result<&str, OpenError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(OpenError::EmptyUrl);
    }
    Ok(trimmed)
}

#[cfg(target_os = "windows")]
fn system_open_command(target: &str) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg("start").arg("").arg(target);
    command
}

#[cfg(target_os = "macos")]
fn system_open_command(target: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(target);
    command
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn system_open_command(target: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(target);
    command
}
