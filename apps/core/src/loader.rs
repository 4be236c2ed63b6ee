use std::fmt::{Display, Formatter};
use std::path::Path;

use rusqlite::{params, Connection, OpenFlags, Statement};

use crate::model::BookmarkRecord;

const FAVICON_SCHEMA: &str = "favicons";

// `type = 1` is a bookmark; folders and separators use other values.
const BOOKMARKS_SQL: &str = "
    SELECT bookmark.title,
           place.url,
           MAX(keywords.keyword) AS keyword,
           MAX(place.last_visit_date) AS last_visit,
           MIN(bookmark.id) AS first_id
    FROM moz_bookmarks AS bookmark
    INNER JOIN moz_places AS place ON bookmark.fk = place.id
    LEFT JOIN moz_keywords AS keywords ON place.id = keywords.place_id
    WHERE bookmark.type = 1
      AND place.url NOT LIKE 'place:%'
    GROUP BY bookmark.title, place.url
    ORDER BY last_visit DESC, first_id ASC";

const ICONS_FOR_PAGE_SQL: &str = "
    SELECT icon.data, icon.width
    FROM favicons.moz_pages_w_icons AS page
    INNER JOIN favicons.moz_icons_to_pages AS link ON page.id = link.page_id
    INNER JOIN favicons.moz_icons AS icon ON link.icon_id = icon.id
    WHERE page.page_url = ?1
      AND icon.data IS NOT NULL";

#[derive(Debug)]
pub enum LoadError {
    Open(rusqlite::Error),
    Query(rusqlite::Error),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open(error) => write!(f, "open failed: {error}"),
            Self::Query(error) => write!(f, "query failed: {error}"),
        }
    }
}

impl std::error::Error for LoadError {}

struct BookmarkRow {
    title: Option<String>,
    url: String,
    keyword: Option<String>,
}

/// Reads bookmarks from a snapshot, most recently visited first.
///
/// The connection is owned by this call and dropped before it returns, on
/// both the success and the error path.
pub fn load(
    main_path: &Path,
    favicon_path: Option<&Path>,
) -> Result<Vec<BookmarkRecord>, LoadError> {
    if !main_path.is_file() {
        return Err(LoadError::Open(rusqlite::Error::InvalidPath(
            main_path.to_path_buf(),
        )));
    }

    let conn = Connection::open_with_flags(
        main_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(LoadError::Open)?;

    let rows = read_bookmark_rows(&conn).map_err(LoadError::Query)?;

    let attached = favicon_path.is_some_and(|path| attach_favicons(&conn, path));
    let mut icon_lookup = if attached {
        prepare_icon_lookup(&conn)
    } else {
        None
    };

    let mut records = Vec::with_capacity(rows.len());
    for (ordinal, row) in rows.into_iter().enumerate() {
        let icon_bytes = match icon_lookup.as_mut() {
            Some(stmt) => best_icon(stmt, &row.url),
            None => None,
        };
        records.push(BookmarkRecord::from_owned(
            ordinal,
            row.title.unwrap_or_default(),
            row.url,
            row.keyword,
            icon_bytes,
        ));
    }

    Ok(records)
}

fn read_bookmark_rows(conn: &Connection) -> Result<Vec<BookmarkRow>, rusqlite::Error> {
    let mut stmt = conn.prepare(BOOKMARKS_SQL)?;
    let rows = stmt.query_map([], |row| {
        Ok(BookmarkRow {
            title: row.get(0)?,
            url: row.get(1)?,
            keyword: row.get(2)?,
        })
    })?;
    rows.collect()
}

fn attach_favicons(conn: &Connection, path: &Path) -> bool {
    let Some(path_text) = path.to_str() else {
        crate::logging::warn(&format!(
            "favicon store path is not valid UTF-8: {}",
            path.display()
        ));
        return false;
    };

    match conn.execute(
        &format!("ATTACH DATABASE ?1 AS {FAVICON_SCHEMA}"),
        params![path_text],
    ) {
        Ok(_) => true,
        Err(error) => {
            crate::logging::warn(&format!(
                "cannot attach favicon store {}: {error}",
                path.display()
            ));
            false
        }
    }
}

fn prepare_icon_lookup(conn: &Connection) -> Option<Statement<'_>> {
    match conn.prepare(ICONS_FOR_PAGE_SQL) {
        Ok(stmt) => Some(stmt),
        Err(error) => {
            crate::logging::warn(&format!("favicon store unreadable: {error}"));
            None
        }
    }
}

/// Picks the widest icon stored for `url`; the first one seen wins ties.
fn best_icon(stmt: &mut Statement<'_>, url: &str) -> Option<Vec<u8>> {
    let candidates = stmt.query_map(params![url], |row| {
        let data: Vec<u8> = row.get(0)?;
        let width: Option<i64> = row.get(1)?;
        Ok((width.unwrap_or(0), data))
    });

    let candidates = match candidates {
        Ok(rows) => rows,
        Err(error) => {
            crate::logging::warn(&format!("favicon lookup failed for {url}: {error}"));
            return None;
        }
    };

    let mut best: Option<(i64, Vec<u8>)> = None;
    for candidate in candidates {
        let candidate = match candidate {
            Ok(candidate) => candidate,
            Err(error) => {
                crate::logging::warn(&format!("skipping unreadable icon for {url}: {error}"));
                continue;
            }
        };
        let wider = best
            .as_ref()
            .map_or(true, |(width, _)| candidate.0 > *width);
        if wider {
            best = Some(candidate);
        }
    }
    best.map(|(_, data)| data)
}
