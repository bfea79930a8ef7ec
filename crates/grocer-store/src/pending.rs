//! The deferred guest-cart queue.

use grocer_shared::PendingCartItem;
use rusqlite::params;

use crate::database::Database;
use crate::error::Result;

impl Database {
    /// Append one deferred addition to the end of the queue.
    pub fn append_pending_item(&self, item: &PendingCartItem) -> Result<()> {
        let json = serde_json::to_string(item)?;
        self.conn().execute(
            "INSERT INTO pending_cart_items (json) VALUES (?1)",
            params![json],
        )?;
        Ok(())
    }

    /// All queued additions, in insertion order.
    pub fn list_pending_items(&self) -> Result<Vec<PendingCartItem>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT json FROM pending_cart_items ORDER BY seq ASC")?;

        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut items = Vec::new();
        for row in rows {
            items.push(serde_json::from_str(&row?)?);
        }
        Ok(items)
    }

    /// Drop the whole queue.  Safe to call when it is already empty.
    pub fn clear_pending_items(&self) -> Result<()> {
        self.conn().execute("DELETE FROM pending_cart_items", [])?;
        Ok(())
    }
}
