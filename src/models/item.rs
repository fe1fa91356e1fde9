use rusqlite::Connection;

use crate::database::DatabaseConnection;
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: i64,
    pub name: String,
}

/// Record kept after an item is checked off. Never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedItem {
    pub id: i64,
    pub name: String,
}

impl Item {
    pub(crate) fn fetch_for_list(conn: &Connection, list_id: i64) -> rusqlite::Result<Vec<Item>> {
        let mut statement =
            conn.prepare("SELECT id, name FROM item WHERE list_id = (?1) ORDER BY id")?;
        let items = statement
            .query_map((list_id,), |row| {
                Ok(Item {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }
}

impl CompletedItem {
    pub async fn fetch_all(connection: DatabaseConnection) -> Result<Vec<CompletedItem>, AppError> {
        let conn = connection.lock().await;
        let mut statement = conn.prepare("SELECT id, name FROM completed_item ORDER BY id")?;
        let completed_items = statement
            .query_map([], |row| {
                Ok(CompletedItem {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(completed_items)
    }
}
