use crate::index::BookmarkIndex;
use crate::model::{normalize_for_search, BookmarkRecord};

/// Query settings fixed for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryEngine {
    pub keyword_enabled: bool,
    pub limit: usize,
}

impl QueryEngine {
    pub fn new(keyword_enabled: bool, limit: usize) -> Self {
        Self {
            keyword_enabled,
            limit,
        }
    }

    pub fn search<'a>(&self, index: &'a BookmarkIndex, query: &str) -> Vec<&'a BookmarkRecord> {
        search(index, query, self.keyword_enabled, self.limit)
    }
}

/// Lowercases and splits on whitespace runs.
pub fn tokenize(query: &str) -> Vec<String> {
    normalize_for_search(query)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

pub fn search<'a>(
    index: &'a BookmarkIndex,
    query: &str,
    keyword_enabled: bool,
    limit: usize,
) -> Vec<&'a BookmarkRecord> {
    search_records(index, &tokenize(query), keyword_enabled, limit)
}

/// Scans `records` in order and stops at the `limit`-th match, so records
/// past it are never evaluated.
pub fn search_records<'a, I>(
    records: I,
    tokens: &[String],
    keyword_enabled: bool,
    limit: usize,
) -> Vec<&'a BookmarkRecord>
where
    I: IntoIterator<Item = &'a BookmarkRecord>,
{
    if limit == 0 {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(limit.min(64));
    for record in records {
        if matches_all(record, tokens, keyword_enabled) {
            out.push(record);
            if out.len() >= limit {
                break;
            }
        }
    }
    out
}

pub fn matches_all(record: &BookmarkRecord, tokens: &[String], keyword_enabled: bool) -> bool {
    tokens
        .iter()
        .all(|token| matches_token(record, token, keyword_enabled))
}

fn matches_token(record: &BookmarkRecord, token: &str, keyword_enabled: bool) -> bool {
    record.normalized_title().contains(token)
        || record.normalized_url().contains(token)
        || (keyword_enabled
            && record
                .normalized_keyword()
                .is_some_and(|keyword| keyword.contains(token)))
}
