use crate::model::BookmarkRecord;

/// The bookmarks of one session, in load order. Never mutated after
/// construction; a reload builds a new index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkIndex {
    records: Vec<BookmarkRecord>,
}

impl BookmarkIndex {
    pub fn new(records: Vec<BookmarkRecord>) -> Self {
        debug_assert!(records
            .iter()
            .enumerate()
            .all(|(position, record)| record.ordinal == position));
        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, ordinal: usize) -> Option<&BookmarkRecord> {
        self.records.get(ordinal)
    }

    pub fn records(&self) -> &[BookmarkRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BookmarkRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a BookmarkIndex {
    type Item = &'a BookmarkRecord;
    type IntoIter = std::slice::Iter<'a, BookmarkRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
