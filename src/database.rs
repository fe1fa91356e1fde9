use log::debug;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

pub type DatabaseConnection = Arc<Mutex<Connection>>;

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Could not open database: {source}")]
    RusqliteError {
        #[from]
        source: rusqlite::Error,
    },
    #[error("Could not apply migrations: {source}")]
    MigrationError {
        #[from]
        source: refinery::Error,
    },
}

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("./sql_migrations");
}

pub fn apply_migrations(connection: &mut Connection) -> Result<(), SqliteDatabaseError> {
    let report = embedded::migrations::runner().run(connection)?;
    debug!("Applied migrations\n{:?}", report);
    Ok(())
}

pub fn create_sqlite_database_on_disk(
    file_path: impl Into<PathBuf>,
) -> Result<Connection, SqliteDatabaseError> {
    let file_path = file_path.into();
    let mut connection = Connection::open(&file_path)?;
    apply_migrations(&mut connection)?;
    Ok(connection)
}

/// Create an in-memory database with all migrations applied.
///
/// Changes to the data in the returned database are never written to any
/// file.
pub fn create_in_memory_database() -> Result<DatabaseConnection, SqliteDatabaseError> {
    let mut connection = Connection::open_in_memory()?;
    apply_migrations(&mut connection)?;
    Ok(Arc::new(Mutex::new(connection)))
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn given_fresh_database_then_default_list_exists() {
        let connection = create_in_memory_database().expect("should be able to create db");
        let conn = connection.lock().await;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM list WHERE name IS NULL", [], |row| {
                row.get(0)
            })
            .expect("should be able to query lists");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn given_fresh_database_then_no_items_exist() {
        let connection = create_in_memory_database().expect("should be able to create db");
        let conn = connection.lock().await;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM item", [], |row| row.get(0))
            .expect("should be able to query items");
        assert_eq!(count, 0);
    }
}
