//! Persistence for the signed-in session.

use grocer_shared::Session;
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::Result;

impl Database {
    /// Persist the session, replacing any previous one.  The user profile
    /// and bearer token are written as a single blob so neither can be
    /// stored without the other.
    pub fn save_session(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_string(session)?;
        self.conn().execute(
            "INSERT OR REPLACE INTO session (id, json) VALUES (1, ?1)",
            params![json],
        )?;
        Ok(())
    }

    /// Load the persisted session, if any.
    pub fn load_session(&self) -> Result<Option<Session>> {
        let row: Option<String> = self
            .conn()
            .query_row("SELECT json FROM session WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        match row {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Remove the persisted session.  Safe to call when none exists.
    pub fn clear_session(&self) -> Result<()> {
        self.conn().execute("DELETE FROM session WHERE id = 1", [])?;
        Ok(())
    }
}
