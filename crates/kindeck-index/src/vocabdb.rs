use std::collections::HashMap;
use std::path::Path;

use rusqlite::{Connection, OpenFlags, params};

use crate::error::IndexError;

/// Read-only view over a Kindle `vocab.db`.
///
/// The relevant tables: `BOOK_INFO` (one row per book), `WORDS` (looked-up
/// words), `LOOKUPS` (each lookup event with the sentence it happened in).
pub struct Vocabdb {
    conn: Connection,
}

#[derive(Debug, Clone)]
pub struct Book {
    pub id: String,
    pub asin: Option<String>,
    pub guid: Option<String>,
    pub lang: Option<String>,
    pub title: Option<String>,
    pub authors: Option<String>,
}

#[derive(Debug, Clone)]
pub struct KindleWord {
    pub id: String,
    pub value: String,
    pub stem: Option<String>,
    pub lang: Option<String>,
    pub category: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct KindleLookup {
    pub id: String,
    pub word_id: String,
    pub book_id: String,
    pub usage: Option<String>,
}

impl Vocabdb {
    pub fn open(path: &Path) -> Result<Self, IndexError> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(Self { conn })
    }

    pub fn books(&self) -> Result<Vec<Book>, IndexError> {
        let mut statement = self
            .conn
            .prepare("SELECT id, asin, guid, lang, title, authors FROM BOOK_INFO")?;
        let rows = statement.query_map([], |row| {
            Ok(Book {
                id: row.get(0)?,
                asin: row.get(1)?,
                guid: row.get(2)?,
                lang: row.get(3)?,
                title: row.get(4)?,
                authors: row.get(5)?,
            })
        })?;
        let mut books = Vec::new();
        for row in rows {
            books.push(row?);
        }
        Ok(books)
    }

    pub fn book(&self, book_id: &str) -> Result<Book, IndexError> {
        self.books()?
            .into_iter()
            .find(|book| book.id == book_id)
            .ok_or_else(|| IndexError::UnknownBook {
                book_id: book_id.to_string(),
            })
    }

    /// Words looked up within one book, keyed by word id.
    pub fn words(&self, book_id: &str) -> Result<HashMap<String, KindleWord>, IndexError> {
        let mut statement = self.conn.prepare(
            "SELECT w.id, w.word, w.stem, w.lang, w.category \
             FROM LOOKUPS l JOIN WORDS w ON l.word_key = w.id \
             WHERE l.book_key = ?1",
        )?;
        let rows = statement.query_map(params![book_id], |row| {
            Ok(KindleWord {
                id: row.get(0)?,
                value: row.get(1)?,
                stem: row.get(2)?,
                lang: row.get(3)?,
                category: row.get(4)?,
            })
        })?;
        let mut words = HashMap::new();
        for row in rows {
            let word = row?;
            words.insert(word.id.clone(), word);
        }
        Ok(words)
    }

    pub fn lookups(&self, book_id: &str) -> Result<Vec<KindleLookup>, IndexError> {
        let mut statement = self.conn.prepare(
            "SELECT id, word_key, book_key, usage FROM LOOKUPS WHERE book_key = ?1",
        )?;
        let rows = statement.query_map(params![book_id], |row| {
            Ok(KindleLookup {
                id: row.get(0)?,
                word_id: row.get(1)?,
                book_id: row.get(2)?,
                usage: row.get(3)?,
            })
        })?;
        let mut lookups = Vec::new();
        for row in rows {
            lookups.push(row?);
        }
        Ok(lookups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE BOOK_INFO (id TEXT, asin TEXT, guid TEXT, lang TEXT, title TEXT, authors TEXT);
             CREATE TABLE WORDS (id TEXT, word TEXT, stem TEXT, lang TEXT, category INTEGER, timestamp INTEGER, profileid TEXT);
             CREATE TABLE LOOKUPS (id TEXT, word_key TEXT, book_key TEXT, dict_key TEXT, pos TEXT, usage TEXT, timestamp INTEGER);
             INSERT INTO BOOK_INFO VALUES ('b1', 'A1', 'g1', 'en', 'Moby Dick', 'Melville');
             INSERT INTO WORDS VALUES ('en:whale', 'whale', 'whale', 'en', 100, 0, '');
             INSERT INTO LOOKUPS VALUES ('l1', 'en:whale', 'b1', 'd', '0', 'A whale surfaced.', 0);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn reads_books_words_and_lookups() {
        let db = Vocabdb { conn: seeded() };

        let books = db.books().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title.as_deref(), Some("Moby Dick"));

        let words = db.words("b1").unwrap();
        assert_eq!(words["en:whale"].value, "whale");

        let lookups = db.lookups("b1").unwrap();
        assert_eq!(lookups.len(), 1);
        assert_eq!(lookups[0].usage.as_deref(), Some("A whale surfaced."));
        assert!(db.lookups("b2").unwrap().is_empty());
    }

    #[test]
    fn unknown_book_is_an_error() {
        let db = Vocabdb { conn: seeded() };
        assert!(matches!(
            db.book("nope"),
            Err(IndexError::UnknownBook { .. })
        ));
    }
}
