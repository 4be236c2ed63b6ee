/// One bookmark as loaded from a profile snapshot.
///
/// Records are immutable once built. The lowercase copies of the searchable
/// fields are computed once here so per-keystroke matching never allocates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkRecord {
    pub ordinal: usize,
    pub title: String,
    pub url: String,
    pub keyword: Option<String>,
    pub icon_bytes: Option<Vec<u8>>,
    normalized_title: String,
    normalized_url: String,
    normalized_keyword: Option<String>,
}

impl BookmarkRecord {
    pub fn new(ordinal: usize, title: &str, url: &str, keyword: Option<&str>) -> Self {
        Self::from_owned(
            ordinal,
            title.to_string(),
            url.to_string(),
            keyword.map(str::to_string),
            None,
        )
    }

    pub fn from_owned(
        ordinal: usize,
        title: String,
        url: String,
        keyword: Option<String>,
        icon_bytes: Option<Vec<u8>>,
    ) -> Self {
        let normalized_title = normalize_for_search(&title);
        let normalized_url = normalize_for_search(&url);
        let normalized_keyword = keyword.as_deref().map(normalize_for_search);
        Self {
            ordinal,
            title,
            url,
            keyword,
            icon_bytes,
            normalized_title,
            normalized_url,
            normalized_keyword,
        }
    }

    pub fn with_icon(mut self, bytes: Vec<u8>) -> Self {
        self.icon_bytes = Some(bytes);
        self
    }

    pub fn normalized_title(&self) -> &str {
        &self.normalized_title
    }

    pub fn normalized_url(&self) -> &str {
        &self.normalized_url
    }

    pub fn normalized_keyword(&self) -> Option<&str> {
        self.normalized_keyword.as_deref()
    }
}

/// A raw query as handed over by the host for one keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    pub valid: bool,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            valid: true,
        }
    }

    /// A query the host has already superseded.
    pub fn invalidated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            valid: false,
        }
    }
}

pub fn normalize_for_search(input: &str) -> String {
    input.to_lowercase()
}
