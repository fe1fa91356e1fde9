use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use rusqlite::{Connection, OptionalExtension};
use std::fmt;

use crate::database::DatabaseConnection;
use crate::error::AppError;
use crate::models::item::{CompletedItem, Item};

const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Identifies a list. The default list is stored like any other list but
/// has no name of its own; it is shown with the current date as title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListName {
    Default,
    Named(String),
}

impl ListName {
    /// "groceries", "GROCERIES" and "Groceries" all name the same list.
    pub fn from_path_segment(segment: &str) -> ListName {
        ListName::Named(capitalize(segment))
    }

    /// Lists are posted back by their title. Only a title equal to `today`
    /// refers to the default list.
    pub fn from_title(title: &str, today: &str) -> ListName {
        if title == today {
            ListName::Default
        } else {
            ListName::Named(title.to_string())
        }
    }

    pub fn title(&self, today: &str) -> String {
        match self {
            ListName::Default => today.to_string(),
            ListName::Named(name) => name.clone(),
        }
    }

    pub fn path(&self) -> String {
        match self {
            ListName::Default => "/".to_string(),
            ListName::Named(name) => format!("/{}", utf8_percent_encode(name, PATH_SEGMENT)),
        }
    }

    /// The default list is refilled with the seed items whenever it is
    /// found empty. Named lists are only seeded when created.
    pub fn reseeds_when_empty(&self) -> bool {
        matches!(self, ListName::Default)
    }

    fn key(&self) -> Option<&str> {
        match self {
            ListName::Default => None,
            ListName::Named(name) => Some(name),
        }
    }
}

impl fmt::Display for ListName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListName::Default => write!(f, "(default)"),
            ListName::Named(name) => write!(f, "{name}"),
        }
    }
}

/// Upper case first character, lower case for the rest.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub id: i64,
    pub name: ListName,
    pub items: Vec<Item>,
}

fn find_list_id(conn: &Connection, name: &ListName) -> rusqlite::Result<Option<i64>> {
    // `IS` also matches the NULL name of the default list.
    conn.query_row(
        "SELECT id FROM list WHERE name IS (?1)",
        (name.key(),),
        |row| row.get(0),
    )
    .optional()
}

impl List {
    pub async fn fetch(
        connection: DatabaseConnection,
        name: &ListName,
    ) -> Result<Option<List>, AppError> {
        let conn = connection.lock().await;
        let Some(id) = find_list_id(&conn, name)? else {
            return Ok(None);
        };
        let items = Item::fetch_for_list(&conn, id)?;
        Ok(Some(List {
            id,
            name: name.clone(),
            items,
        }))
    }

    /// Appends `seed_items` to the list, creating the list first if needed.
    pub async fn seed(
        connection: DatabaseConnection,
        name: &ListName,
        seed_items: &[String],
    ) -> Result<List, AppError> {
        let mut conn = connection.lock().await;
        let transaction = conn.transaction()?;
        let id = match find_list_id(&transaction, name)? {
            Some(id) => id,
            None => {
                transaction.execute("INSERT INTO list (name) VALUES (?1)", (name.key(),))?;
                transaction.last_insert_rowid()
            }
        };
        for item_name in seed_items {
            transaction.execute(
                "INSERT INTO item (list_id, name) VALUES ((?1), (?2))",
                (id, item_name),
            )?;
        }
        let items = Item::fetch_for_list(&transaction, id)?;
        transaction.commit()?;
        log::debug!("Seeded list {} with {} items", name, seed_items.len());
        Ok(List {
            id,
            name: name.clone(),
            items,
        })
    }

    pub async fn add_item(
        connection: DatabaseConnection,
        name: &ListName,
        item_name: &str,
    ) -> Result<Item, AppError> {
        let conn = connection.lock().await;
        let list_id =
            find_list_id(&conn, name)?.ok_or_else(|| AppError::ListNotFound(name.to_string()))?;
        conn.execute(
            "INSERT INTO item (list_id, name) VALUES ((?1), (?2))",
            (list_id, item_name),
        )?;
        Ok(Item {
            id: conn.last_insert_rowid(),
            name: item_name.to_string(),
        })
    }

    /// Moves an item of this list over to the completed items.
    pub async fn complete_item(
        connection: DatabaseConnection,
        name: &ListName,
        item_id: i64,
    ) -> Result<CompletedItem, AppError> {
        let mut conn = connection.lock().await;
        let transaction = conn.transaction()?;
        let list_id = find_list_id(&transaction, name)?
            .ok_or_else(|| AppError::ListNotFound(name.to_string()))?;
        let item_name: String = transaction
            .query_row(
                "SELECT name FROM item WHERE id = (?1) AND list_id = (?2)",
                (item_id, list_id),
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| AppError::ItemNotFound {
                list: name.to_string(),
                item_id,
            })?;
        transaction.execute(
            "INSERT INTO completed_item (name) VALUES (?1)",
            (&item_name,),
        )?;
        let completed_id = transaction.last_insert_rowid();
        transaction.execute("DELETE FROM item WHERE id = (?1)", (item_id,))?;
        transaction.commit()?;
        Ok(CompletedItem {
            id: completed_id,
            name: item_name,
        })
    }
}
