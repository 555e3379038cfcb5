use serde::{Deserialize, Serialize};

/// Field names every kindeck note carries, in model order.
pub const NOTE_FIELDS: &[&str] = &["word", "pronunciation", "meanings", "usage", "notes", "url"];

/// A note model with a single card template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteModel {
    pub name: String,
    pub front: String,
    pub back: String,
    pub css: String,
}

impl NoteModel {
    /// Default vocabulary card: word and usage sentence up front, the
    /// scraped dictionary data on the back.
    pub fn default_kindle(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            front: "<div class=\"word\">{{word}}</div>\n\
                    <div class=\"usage\">{{usage}}</div>"
                .to_string(),
            back: "{{FrontSide}}\n<hr id=\"answer\">\n\
                   <div class=\"pronunciations\">{{pronunciation}}</div>\n\
                   <div class=\"meanings\">{{meanings}}</div>\n\
                   <div class=\"notes\">{{notes}}</div>\n\
                   <div class=\"source\"><a href=\"{{url}}\">{{url}}</a></div>"
                .to_string(),
            css: ".card { font-family: sans-serif; text-align: center; }\n\
                  .word { font-size: 28px; }\n\
                  .usage { color: #888; font-style: italic; }\n\
                  .pronunciation { font-weight: bold; }\n\
                  .ipa { color: #46a3c6; }\n\
                  .meaning { color: #1ca0a0; }\n\
                  .source { font-size: 11px; }"
                .to_string(),
        }
    }

    pub fn field_names(&self) -> &'static [&'static str] {
        NOTE_FIELDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_reference_only_known_fields() {
        let model = NoteModel::default_kindle("Kindle Vocabulary Note Type");
        let combined = format!("{}{}", model.front, model.back);

        let mut rest = combined.as_str();
        while let Some(start) = rest.find("{{") {
            rest = &rest[start + 2..];
            let end = rest.find("}}").expect("unclosed field reference");
            let field = &rest[..end];
            assert!(
                field == "FrontSide" || NOTE_FIELDS.contains(&field),
                "unknown field {field:?}"
            );
            rest = &rest[end + 2..];
        }
    }
}
