//! SQLite-backed review storage
//!
//! Rows are keyed by an auto-incrementing integer id; every content field
//! is optional free text. The connection sits behind a mutex and every
//! method is a short synchronous call, so handlers never hold the lock
//! across an await point.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, ToSql};

use crate::error::{RelishError, RelishResult};
use crate::types::{Review, ReviewFields, ReviewPatch};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS reviews (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    restaurant TEXT,
    location TEXT,
    review TEXT,
    response TEXT,
    food_item TEXT,
    sentiment TEXT,
    notes TEXT
);

CREATE INDEX IF NOT EXISTS idx_reviews_review_restaurant
    ON reviews (review, restaurant);
"#;

const SELECT_COLUMNS: &str =
    "id, restaurant, location, review, response, food_item, sentiment, notes";

pub struct ReviewStore {
    conn: Mutex<Connection>,
}

impl ReviewStore {
    /// Open (creating if needed) the review database at `path`.
    pub fn open(path: &Path) -> RelishResult<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    /// In-memory store, used by tests and throwaway runs.
    pub fn open_in_memory() -> RelishResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> RelishResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // Lock poisoning means a panic mid-statement; propagating it is
        // the only sound option left.
        self.conn.lock().expect("review store lock poisoned")
    }

    /// All rows, ordered by id.
    pub fn find_all(&self) -> RelishResult<Vec<Review>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM reviews ORDER BY id"
        ))?;
        let rows = stmt.query_map([], row_to_review)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(RelishError::from)
    }

    /// One row by id.
    pub fn get(&self, id: i64) -> RelishResult<Review> {
        fetch(&self.conn(), id)
    }

    /// Insert a new row; the store assigns the id.
    pub fn create(&self, draft: &ReviewFields) -> RelishResult<Review> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO reviews (restaurant, location, review, response, food_item, sentiment, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                draft.restaurant,
                draft.location,
                draft.review,
                draft.response,
                draft.food_item,
                draft.sentiment,
                draft.notes,
            ],
        )?;
        fetch(&conn, conn.last_insert_rowid())
    }

    /// Apply a partial update and return the stored row.
    ///
    /// Only fields present in the patch are written. An empty patch reads
    /// the row back unchanged; an unknown id is an error.
    pub fn update(&self, patch: &ReviewPatch) -> RelishResult<Review> {
        let conn = self.conn();
        let fields = &patch.fields;

        let mut sets: Vec<&str> = Vec::new();
        let mut args: Vec<&dyn ToSql> = Vec::new();
        if let Some(v) = &fields.restaurant {
            sets.push("restaurant = ?");
            args.push(v);
        }
        if let Some(v) = &fields.location {
            sets.push("location = ?");
            args.push(v);
        }
        if let Some(v) = &fields.review {
            sets.push("review = ?");
            args.push(v);
        }
        if let Some(v) = &fields.response {
            sets.push("response = ?");
            args.push(v);
        }
        if let Some(v) = &fields.food_item {
            sets.push("food_item = ?");
            args.push(v);
        }
        if let Some(v) = &fields.sentiment {
            sets.push("sentiment = ?");
            args.push(v);
        }
        if let Some(v) = &fields.notes {
            sets.push("notes = ?");
            args.push(v);
        }

        if sets.is_empty() {
            return fetch(&conn, patch.id);
        }

        args.push(&patch.id);
        let sql = format!("UPDATE reviews SET {} WHERE id = ?", sets.join(", "));
        let changed = conn.execute(&sql, &args[..])?;
        if changed == 0 {
            return Err(RelishError::Validation(format!(
                "review {} not found",
                patch.id
            )));
        }

        fetch(&conn, patch.id)
    }

    /// Delete every row whose id is in `ids`; returns the number removed.
    pub fn delete(&self, ids: &[i64]) -> RelishResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let conn = self.conn();
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("DELETE FROM reviews WHERE id IN ({placeholders})");
        let removed = conn.execute(&sql, rusqlite::params_from_iter(ids.iter()))?;
        Ok(removed)
    }

    /// Force-recreate the table and bulk insert `drafts`.
    ///
    /// Mirrors a from-scratch sync: existing rows and the id sequence are
    /// gone afterwards. The whole load is one transaction.
    pub fn seed(&self, drafts: &[ReviewFields]) -> RelishResult<usize> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute("DROP TABLE IF EXISTS reviews", [])?;
        tx.execute_batch(SCHEMA)?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO reviews (restaurant, location, review, response, food_item, sentiment, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for draft in drafts {
                stmt.execute(params![
                    draft.restaurant,
                    draft.location,
                    draft.review,
                    draft.response,
                    draft.food_item,
                    draft.sentiment,
                    draft.notes,
                ])?;
            }
        }

        tx.commit()?;
        Ok(drafts.len())
    }
}

fn fetch(conn: &Connection, id: i64) -> RelishResult<Review> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM reviews WHERE id = ?1"
    ))?;
    stmt.query_row(params![id], row_to_review)
        .map_err(RelishError::from)
}

fn row_to_review(row: &rusqlite::Row<'_>) -> rusqlite::Result<Review> {
    Ok(Review {
        id: row.get(0)?,
        fields: ReviewFields {
            restaurant: row.get(1)?,
            location: row.get(2)?,
            review: row.get(3)?,
            response: row.get(4)?,
            food_item: row.get(5)?,
            sentiment: row.get(6)?,
            notes: row.get(7)?,
        },
    })
}
