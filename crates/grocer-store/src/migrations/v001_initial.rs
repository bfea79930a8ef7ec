//! v001 -- Initial schema creation.
//!
//! Creates the two tables the client persists: `session` and
//! `pending_cart_items`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Session
-- ----------------------------------------------------------------
-- Single row holding the signed-in user and bearer token as one
-- JSON blob, so neither can exist without the other.
CREATE TABLE IF NOT EXISTS session (
    id   INTEGER PRIMARY KEY CHECK (id = 1),
    json TEXT NOT NULL
);

-- ----------------------------------------------------------------
-- Pending cart items
-- ----------------------------------------------------------------
-- Cart additions captured while signed out.  Replayed in seq order
-- after sign-in, then cleared.
CREATE TABLE IF NOT EXISTS pending_cart_items (
    seq  INTEGER PRIMARY KEY AUTOINCREMENT,
    json TEXT NOT NULL
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
