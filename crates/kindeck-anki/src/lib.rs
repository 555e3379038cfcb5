//! Anki output: turns indexed vocabulary into cards via AnkiConnect.

mod client;
mod note;
mod template;

pub use client::AnkiConnectClient;
pub use note::NoteContent;
pub use template::{NOTE_FIELDS, NoteModel};

use std::collections::HashSet;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use kindeck_types::VocabularyEntry;

/// The only translator whose payload the card renderer understands.
pub const SUPPORTED_TRANSLATOR: &str = "word_reference";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PushOutcome {
    pub added: usize,
    /// Notes Anki refused because an identical word already exists.
    pub duplicates: usize,
    /// Entries with no renderable translation payload.
    pub untranslated: usize,
}

/// Pushes one deck's worth of vocabulary into Anki.
pub struct DeckWriter {
    client: AnkiConnectClient,
    model: NoteModel,
    deck: String,
}

impl DeckWriter {
    pub fn new(client: AnkiConnectClient, model: NoteModel, deck: impl Into<String>) -> Self {
        Self {
            client,
            model,
            deck: deck.into(),
        }
    }

    /// Make sure the note model and deck exist, creating them when missing.
    /// A pre-existing model must carry at least our field set.
    pub async fn prepare(&self) -> Result<()> {
        let version = self
            .client
            .check_connection()
            .await
            .context("AnkiConnect not reachable, is Anki running?")?;
        info!(version, "connected to AnkiConnect");

        let models = self.client.model_names().await?;
        if models.iter().any(|name| *name == self.model.name) {
            let existing = self.client.model_field_names(&self.model.name).await?;
            for field in self.model.field_names() {
                if !existing.iter().any(|name| name == field) {
                    bail!(
                        "note model {:?} exists but lacks the {field:?} field",
                        self.model.name
                    );
                }
            }
        } else {
            info!(model = %self.model.name, "creating note model");
            self.client
                .create_model(
                    &self.model.name,
                    self.model.field_names(),
                    &self.model.front,
                    &self.model.back,
                    &self.model.css,
                )
                .await?;
        }

        self.client.create_deck(&self.deck).await?;
        Ok(())
    }

    /// Add one note per translated entry. The same word appearing twice in
    /// `entries` is a caller bug and aborts the push.
    pub async fn push(&self, entries: &[VocabularyEntry]) -> Result<PushOutcome> {
        let mut outcome = PushOutcome::default();
        let mut seen: HashSet<&str> = HashSet::new();

        for entry in entries {
            if !seen.insert(entry.word.as_str()) {
                bail!("duplicate word {:?} in deck input", entry.word);
            }
            if entry.translation.is_none() {
                outcome.untranslated += 1;
                continue;
            }
            if entry.translator.as_deref() != Some(SUPPORTED_TRANSLATOR) {
                warn!(
                    word = %entry.word,
                    translator = entry.translator.as_deref().unwrap_or(""),
                    "skipping entry from an unsupported translator"
                );
                outcome.untranslated += 1;
                continue;
            }

            let note = NoteContent::render(entry)?;
            match self
                .client
                .add_note(&self.deck, &self.model.name, &note.fields, &["kindeck"])
                .await
            {
                Ok(_) => outcome.added += 1,
                // Re-pushing an index into the same deck hits Anki's own
                // duplicate detection; that is expected, not fatal.
                Err(err) if err.to_string().contains("duplicate") => {
                    warn!(word = %entry.word, "note already in collection");
                    outcome.duplicates += 1;
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            added = outcome.added,
            duplicates = outcome.duplicates,
            untranslated = outcome.untranslated,
            deck = %self.deck,
            "deck push finished"
        );
        Ok(outcome)
    }
}
