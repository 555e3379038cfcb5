use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

use kindeck_types::VocabularyEntry;

use crate::error::IndexError;

/// SQLite-backed store of vocabulary entries for one language pair.
///
/// Each pair gets its own table named `{from}_{to}`, keyed by word. Writes
/// are upserts, so re-indexing a word replaces its earlier row.
pub struct VocabularyIndex {
    conn: Connection,
    table: String,
    from_lang: String,
}

impl VocabularyIndex {
    /// Open (creating if needed) the index at `path`.
    pub fn open(path: &Path, from_lang: &str, to_lang: &str) -> Result<Self, IndexError> {
        Self::init(Connection::open(path)?, from_lang, to_lang)
    }

    /// In-memory index, used by tests.
    pub fn open_in_memory(from_lang: &str, to_lang: &str) -> Result<Self, IndexError> {
        Self::init(Connection::open_in_memory()?, from_lang, to_lang)
    }

    fn init(conn: Connection, from_lang: &str, to_lang: &str) -> Result<Self, IndexError> {
        let table = table_name(from_lang, to_lang)?;
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {table} (\
                 word TEXT PRIMARY KEY, \
                 usage_word_index INTEGER, \
                 usage TEXT, \
                 translator TEXT, \
                 translation TEXT)"
            ),
            [],
        )?;
        debug!(table, "vocabulary index ready");
        Ok(Self {
            conn,
            table,
            from_lang: from_lang.to_string(),
        })
    }

    pub fn read_entry(&self, word: &str) -> Result<Option<VocabularyEntry>, IndexError> {
        let entry = self
            .conn
            .query_row(
                &format!(
                    "SELECT word, usage_word_index, usage, translator, translation \
                     FROM {} WHERE word = ?1",
                    self.table
                ),
                params![word],
                |row| entry_from_row(row, &self.from_lang),
            )
            .optional()?;
        Ok(entry)
    }

    pub fn read_entries(&self) -> Result<Vec<VocabularyEntry>, IndexError> {
        let mut statement = self.conn.prepare(&format!(
            "SELECT word, usage_word_index, usage, translator, translation FROM {}",
            self.table
        ))?;
        let rows = statement.query_map([], |row| entry_from_row(row, &self.from_lang))?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    pub fn write_entry(&self, entry: &VocabularyEntry) -> Result<(), IndexError> {
        self.conn.execute(
            &format!(
                "INSERT OR REPLACE INTO {} (word, usage_word_index, usage, translator, translation) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                self.table
            ),
            params![
                entry.word,
                entry.usage_word_index.map(|index| index as i64),
                entry.usage,
                entry.translator,
                entry.translation,
            ],
        )?;
        Ok(())
    }
}

fn entry_from_row(row: &Row<'_>, from_lang: &str) -> rusqlite::Result<VocabularyEntry> {
    Ok(VocabularyEntry {
        lang: from_lang.to_string(),
        word: row.get(0)?,
        usage_word_index: row
            .get::<_, Option<i64>>(1)?
            .map(|index| index.max(0) as usize),
        usage: row.get(2)?,
        translator: row.get(3)?,
        translation: row.get(4)?,
    })
}

/// Language codes become part of a table name, so anything beyond plain
/// ASCII letters is rejected.
fn table_name(from_lang: &str, to_lang: &str) -> Result<String, IndexError> {
    for code in [from_lang, to_lang] {
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(IndexError::InvalidLanguageCode {
                code: code.to_string(),
            });
        }
    }
    Ok(format!(
        "{}_{}",
        from_lang.to_ascii_lowercase(),
        to_lang.to_ascii_lowercase()
    ))
}
