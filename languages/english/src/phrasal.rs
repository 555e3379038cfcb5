use tracing::{debug, warn};

use kindeck_index::EntryTransform;
use kindeck_types::VocabularyEntry;

/// Particles that commonly form phrasal verbs.
const PARTICLES: &[&str] = &[
    "up", "down", "out", "off", "in", "on", "over", "away", "back", "through", "along", "around",
    "about", "forward", "apart", "aside",
];

/// Expands a verb into the phrasal verb its usage sentence actually shows.
///
/// "She looked it up" indexed under "looked" should really be indexed under
/// "looked up" — the dictionary entry for the bare verb misses the meaning
/// the reader met. The detection is a particle-list heuristic over the usage
/// sentence: the word followed by (or separated by one word from) a known
/// particle. When a phrasal form is found it replaces the bare word;
/// otherwise the entry passes through untouched.
pub struct PhrasalVerbTransform;

impl EntryTransform for PhrasalVerbTransform {
    fn transform(&self, from_lang: &str, entry: VocabularyEntry) -> Vec<VocabularyEntry> {
        if from_lang != "en" {
            warn!(from_lang, "phrasal verb transform only handles english");
            return vec![entry];
        }
        let Some(usage) = entry.usage.as_deref() else {
            debug!(word = %entry.word, "no usage sentence, skipping phrasal verb search");
            return vec![entry];
        };

        let mut derived = Vec::new();
        for phrasal in phrasal_forms(&entry.word, usage) {
            debug!(word = %entry.word, phrasal = %phrasal, "found phrasal verb in usage");
            let mut expanded = entry.clone();
            expanded.word = phrasal;
            derived.push(expanded);
        }

        if derived.is_empty() {
            vec![entry]
        } else {
            derived
        }
    }
}

fn phrasal_forms(word: &str, usage: &str) -> Vec<String> {
    let tokens: Vec<&str> = usage
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|t| !t.is_empty())
        .collect();

    let mut forms = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        if !token.eq_ignore_ascii_case(word) {
            continue;
        }
        // Directly adjacent particle ("looked up"), or one word apart
        // ("looked it up").
        for gap in [1, 2] {
            if let Some(next) = tokens.get(i + gap)
                && PARTICLES.iter().any(|p| next.eq_ignore_ascii_case(p))
            {
                let form = format!("{word} {}", next.to_lowercase());
                if !forms.contains(&form) {
                    forms.push(form);
                }
                break;
            }
        }
    }
    forms
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(word: &str, usage: &str) -> VocabularyEntry {
        let mut entry = VocabularyEntry::new("en", word);
        entry.usage = Some(usage.to_string());
        entry.usage_word_index = usage.find(word);
        entry
    }

    #[test]
    fn detects_adjacent_particles() {
        let out = PhrasalVerbTransform.transform("en", entry("looked", "She looked up the word."));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].word, "looked up");
    }

    #[test]
    fn detects_particles_one_word_apart() {
        let out = PhrasalVerbTransform.transform("en", entry("looked", "She looked it up."));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].word, "looked up");
    }

    #[test]
    fn passes_through_when_no_particle_follows() {
        let out = PhrasalVerbTransform.transform("en", entry("whale", "A whale surfaced."));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].word, "whale");
    }

    #[test]
    fn other_languages_pass_through() {
        let out = PhrasalVerbTransform.transform("es", entry("mirar", "Voy a mirar arriba."));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].word, "mirar");
    }
}
