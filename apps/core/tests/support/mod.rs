#![allow(dead_code)]

use std::path::Path;

use rusqlite::{params, Connection};
use tempfile::TempDir;

const PLACES_SCHEMA: &str = "
    CREATE TABLE moz_places (
        id INTEGER PRIMARY KEY,
        url LONGVARCHAR,
        title LONGVARCHAR,
        last_visit_date INTEGER
    );
    CREATE TABLE moz_bookmarks (
        id INTEGER PRIMARY KEY,
        type INTEGER,
        fk INTEGER DEFAULT NULL,
        parent INTEGER,
        title LONGVARCHAR
    );
    CREATE TABLE moz_keywords (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        keyword TEXT UNIQUE,
        place_id INTEGER
    );";

const FAVICONS_SCHEMA: &str = "
    CREATE TABLE moz_icons (
        id INTEGER PRIMARY KEY,
        icon_url TEXT NOT NULL,
        width INTEGER NOT NULL DEFAULT 0,
        data BLOB
    );
    CREATE TABLE moz_pages_w_icons (
        id INTEGER PRIMARY KEY,
        page_url TEXT NOT NULL
    );
    CREATE TABLE moz_icons_to_pages (
        page_id INTEGER NOT NULL,
        icon_id INTEGER NOT NULL,
        PRIMARY KEY (page_id, icon_id)
    );";

const INSERT_PLACE: &str = "INSERT INTO moz_places (id, url, last_visit_date) VALUES (?1, ?2, ?3)";
const INSERT_KEYWORD: &str = "INSERT INTO moz_keywords (keyword, place_id) VALUES (?1, ?2)";
const INSERT_BOOKMARK: &str =
    "INSERT INTO moz_bookmarks (id, type, fk, parent, title) VALUES (?1, ?2, ?3, 1, ?4)";
const INSERT_PAGE: &str = "INSERT INTO moz_pages_w_icons (id, page_url) VALUES (?1, ?2)";
const INSERT_ICON: &str =
    "INSERT INTO moz_icons (id, icon_url, width, data) VALUES (?1, ?2, ?3, ?4)";
const INSERT_ICON_LINK: &str =
    "INSERT INTO moz_icons_to_pages (page_id, icon_id) VALUES (?1, ?2)";

struct PlaceSpec {
    url: String,
    last_visit: Option<i64>,
    keyword: Option<String>,
}

struct EntrySpec {
    id: i64,
    kind: i64,
    place: Option<usize>,
    title: Option<String>,
}

struct IconSpec {
    page_url: String,
    width: i64,
    data: Option<Vec<u8>>,
}

/// Builds a Firefox-shaped profile directory in a temp dir.
#[derive(Default)]
pub struct ProfileBuilder {
    places: Vec<PlaceSpec>,
    entries: Vec<EntrySpec>,
    icons: Vec<IconSpec>,
    favicon_store: bool,
}

impl ProfileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bookmark(self, id: i64, title: &str, url: &str, last_visit: Option<i64>) -> Self {
        self.entry(id, 1, Some(title), Some((url, last_visit)))
    }

    pub fn untitled_bookmark(self, id: i64, url: &str, last_visit: Option<i64>) -> Self {
        self.entry(id, 1, None, Some((url, last_visit)))
    }

    pub fn folder(self, id: i64, title: &str) -> Self {
        self.entry(id, 2, Some(title), None)
    }

    pub fn separator(self, id: i64) -> Self {
        self.entry(id, 3, None, None)
    }

    pub fn keyword(mut self, url: &str, keyword: &str) -> Self {
        let place = self.place_for(url, None);
        self.places[place].keyword = Some(keyword.to_string());
        self
    }

    pub fn icon(mut self, page_url: &str, width: i64, data: &[u8]) -> Self {
        self.favicon_store = true;
        self.icons.push(IconSpec {
            page_url: page_url.to_string(),
            width,
            data: Some(data.to_vec()),
        });
        self
    }

    pub fn empty_icon(mut self, page_url: &str, width: i64) -> Self {
        self.favicon_store = true;
        self.icons.push(IconSpec {
            page_url: page_url.to_string(),
            width,
            data: None,
        });
        self
    }

    pub fn with_favicon_store(mut self) -> Self {
        self.favicon_store = true;
        self
    }

    fn entry(
        mut self,
        id: i64,
        kind: i64,
        title: Option<&str>,
        place: Option<(&str, Option<i64>)>,
    ) -> Self {
        let place = place.map(|(url, last_visit)| self.place_for(url, last_visit));
        self.entries.push(EntrySpec {
            id,
            kind,
            place,
            title: title.map(str::to_string),
        });
        self
    }

    fn place_for(&mut self, url: &str, last_visit: Option<i64>) -> usize {
        if let Some(position) = self.places.iter().position(|p| p.url == url) {
            if last_visit.is_some() {
                self.places[position].last_visit = last_visit;
            }
            return position;
        }
        self.places.push(PlaceSpec {
            url: url.to_string(),
            last_visit,
            keyword: None,
        });
        self.places.len() - 1
    }

    pub fn build(self) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        self.write_into(dir.path());
        dir
    }

    pub fn write_into(self, profile_dir: &Path) {
        std::fs::create_dir_all(profile_dir).unwrap();
        let places_path = profile_dir.join("places.sqlite");
        let places = Connection::open(places_path).unwrap();
        places.execute_batch(PLACES_SCHEMA).unwrap();

        for (position, place) in self.places.iter().enumerate() {
            let place_id = position as i64 + 1;
            places
                .execute(INSERT_PLACE, params![place_id, place.url, place.last_visit])
                .unwrap();
            if let Some(keyword) = &place.keyword {
                places
                    .execute(INSERT_KEYWORD, params![keyword, place_id])
                    .unwrap();
            }
        }

        for entry in &self.entries {
            let fk = entry.place.map(|position| position as i64 + 1);
            places
                .execute(
                    INSERT_BOOKMARK,
                    params![entry.id, entry.kind, fk, entry.title],
                )
                .unwrap();
        }
        drop(places);

        if !self.favicon_store {
            return;
        }

        let favicons_path = profile_dir.join("favicons.sqlite");
        let favicons = Connection::open(favicons_path).unwrap();
        favicons.execute_batch(FAVICONS_SCHEMA).unwrap();
        let mut pages: Vec<String> = Vec::new();
        for (position, icon) in self.icons.iter().enumerate() {
            let icon_id = position as i64 + 1;
            let page_id = match pages.iter().position(|url| *url == icon.page_url) {
                Some(existing) => existing as i64 + 1,
                None => {
                    pages.push(icon.page_url.clone());
                    let page_id = pages.len() as i64;
                    favicons
                        .execute(INSERT_PAGE, params![page_id, icon.page_url])
                        .unwrap();
                    page_id
                }
            };
            favicons
                .execute(
                    INSERT_ICON,
                    params![
                        icon_id,
                        format!("{}/favicon-{}.png", icon.page_url, icon.width),
                        icon.width,
                        icon.data
                    ],
                )
                .unwrap();
            favicons
                .execute(INSERT_ICON_LINK, params![page_id, icon_id])
                .unwrap();
        }
    }
}

/// Writes a `profiles.ini` pointing at `profile_name` relative to `root`.
pub fn write_registry(root: &Path, profile_name: &str) -> std::path::PathBuf {
    let registry = root.join("profiles.ini");
    std::fs::write(
        &registry,
        format!(
            "[General]\nStartWithLastProfile=1\n\n\
             [Profile0]\nName=default\nIsRelative=1\nPath={profile_name}\nDefault=1\n"
        ),
    )
    .unwrap();
    registry
}
