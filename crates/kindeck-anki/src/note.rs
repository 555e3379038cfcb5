use std::collections::HashMap;

use anyhow::{Context, Result, bail};

use kindeck_types::{TranslationResult, VocabularyEntry};

use crate::template::NOTE_FIELDS;

/// Rendered field values for one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteContent {
    pub fields: HashMap<String, String>,
}

impl NoteContent {
    /// Render an indexed entry into note fields. The entry must carry a
    /// translation payload (the JSON stored by the translator).
    pub fn render(entry: &VocabularyEntry) -> Result<Self> {
        if entry.word.is_empty() {
            bail!("entry without word");
        }
        let payload = entry
            .translation
            .as_deref()
            .context("entry without translation")?;
        let translation: TranslationResult = serde_json::from_str(payload)
            .with_context(|| format!("invalid translation payload for {:?}", entry.word))?;

        let mut fields = HashMap::new();
        fields.insert("word".to_string(), escape(&entry.word));
        fields.insert(
            "pronunciation".to_string(),
            render_pronunciations(&translation),
        );
        fields.insert("meanings".to_string(), render_meanings(&translation));
        fields.insert(
            "usage".to_string(),
            entry.usage.as_deref().map(escape).unwrap_or_default(),
        );
        fields.insert("notes".to_string(), String::new());
        fields.insert("url".to_string(), escape(&translation.source_url));

        debug_assert_eq!(fields.len(), NOTE_FIELDS.len());
        Ok(Self { fields })
    }
}

fn render_pronunciations(translation: &TranslationResult) -> String {
    let mut html = String::new();
    for group in &translation.pronunciations {
        html.push_str(&format!(
            "<span class=\"pronunciation\">{}</span> <span class=\"ipa\">{}</span><br>",
            escape(&group.label),
            escape(&group.variants.join(", ")),
        ));
    }
    html
}

fn render_meanings(translation: &TranslationResult) -> String {
    let mut html = String::new();
    for entry in &translation.entries {
        let mut heading = escape(&entry.source);
        if let Some(grammar) = &entry.grammar {
            heading.push_str(&format!(" <i>{}</i>", escape(grammar)));
        }
        if let Some(sense) = &entry.sense {
            heading.push_str(&format!(" {}", escape(sense)));
        }
        html.push_str(&format!(
            "<span class=\"en gray01\">{heading} =&gt;</span><br>"
        ));

        for rendering in &entry.renderings {
            html.push_str(&format!(
                "<span class=\"es cyan meaning\">{}</span><br>",
                escape(rendering)
            ));
        }
        html.push_str("<br>");

        if let Some(from_example) = &entry.from_example {
            html.push_str(&format!(
                "<span class=\"en ensentence gray02\">{}</span><br>",
                escape(from_example)
            ));
        }
        if let Some(to_example) = entry.to_examples.first() {
            html.push_str(&format!(
                "<span class=\"es essentence gray00\">{}</span><br>",
                escape(to_example)
            ));
        }
        html.push_str("<br>");
    }
    html
}

/// Scraped text goes into card HTML; escape it.
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindeck_types::{PronunciationGroup, TranslationEntry};

    fn entry_with_translation() -> VocabularyEntry {
        let translation = TranslationResult {
            from_lang: "en".to_string(),
            to_lang: "es".to_string(),
            source_url: "https://example.org/enes/pin".to_string(),
            entries: vec![TranslationEntry {
                source: "pin".to_string(),
                grammar: Some("n".to_string()),
                sense: Some("(fastener)".to_string()),
                renderings: vec!["alfiler".to_string(), "clavija".to_string()],
                from_example: Some("She fixed it with a pin.".to_string()),
                to_examples: vec!["Lo sujetó con un alfiler.".to_string()],
            }],
            pronunciations: vec![PronunciationGroup {
                label: "/pɪn/".to_string(),
                variants: vec!["/pen/".to_string()],
            }],
        };

        let mut entry = VocabularyEntry::new("en", "pin");
        entry.usage = Some("She found a pin.".to_string());
        entry.translator = Some("word_reference".to_string());
        entry.translation = Some(serde_json::to_string(&translation).unwrap());
        entry
    }

    #[test]
    fn renders_every_note_field() {
        let note = NoteContent::render(&entry_with_translation()).unwrap();

        for field in NOTE_FIELDS {
            assert!(note.fields.contains_key(*field), "missing field {field}");
        }
        assert_eq!(note.fields["word"], "pin");
        assert_eq!(note.fields["usage"], "She found a pin.");
        assert!(note.fields["pronunciation"].contains("/pɪn/"));
        assert!(note.fields["pronunciation"].contains("/pen/"));
        assert!(note.fields["meanings"].contains("alfiler"));
        assert!(note.fields["meanings"].contains("Lo sujetó con un alfiler."));
        assert_eq!(note.fields["url"], "https://example.org/enes/pin");
    }

    #[test]
    fn scraped_text_is_html_escaped() {
        let mut entry = entry_with_translation();
        entry.usage = Some("a <b>bold</b> claim & more".to_string());

        let note = NoteContent::render(&entry).unwrap();
        assert_eq!(
            note.fields["usage"],
            "a &lt;b&gt;bold&lt;/b&gt; claim &amp; more"
        );
    }

    #[test]
    fn entry_without_translation_is_rejected() {
        let entry = VocabularyEntry::new("en", "pin");
        assert!(NoteContent::render(&entry).is_err());
    }
}
