use serde::{Deserialize, Serialize};

use crate::icons::IconRef;
use crate::model::BookmarkRecord;

pub const RESULT_ID_PREFIX: &str = "FirefoxBookmark_";
pub const OPEN_ACTION_ID: &str = "open";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultAction {
    pub id: String,
    pub label: String,
    pub url: String,
}

impl ResultAction {
    pub fn open(url: &str) -> Self {
        Self {
            id: OPEN_ACTION_ID.to_string(),
            label: "Open".to_string(),
            url: url.to_string(),
        }
    }
}

/// One row handed to the host. Every field is an owned copy taken when the
/// row is built.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResultItem {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub completion: String,
    pub icon: IconRef,
    pub actions: Vec<ResultAction>,
}

impl ResultItem {
    pub fn from_record(record: &BookmarkRecord, icon: IconRef) -> Self {
        Self {
            id: result_id(record.ordinal),
            title: record.title.clone(),
            subtitle: record.url.clone(),
            completion: record.title.clone(),
            icon,
            actions: vec![ResultAction::open(&record.url)],
        }
    }
}

pub fn result_id(ordinal: usize) -> String {
    format!("{RESULT_ID_PREFIX}{ordinal}")
}

pub fn parse_result_id(id: &str) -> Option<usize> {
    id.trim().strip_prefix(RESULT_ID_PREFIX)?.parse().ok()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResultDto {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub icon: String,
    pub actions: Vec<ResultAction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResponse {
    pub results: Vec<SearchResultDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpenRequest {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpenResponse {
    pub opened: bool,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReloadResponse {
    pub indexed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload")]
pub enum CoreRequest {
    Search(SearchRequest),
    Open(OpenRequest),
    Reload,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload")]
pub enum CoreResponse {
    Search(SearchResponse),
    Open(OpenResponse),
    Reload(ReloadResponse),
}

impl From<ResultItem> for SearchResultDto {
    fn from(value: ResultItem) -> Self {
        Self {
            icon: value.icon.as_host_spec(),
            id: value.id,
            title: value.title,
            subtitle: value.subtitle,
            actions: value.actions,
        }
    }
}
