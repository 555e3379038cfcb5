//! Pronunciation-widget grouping.
//!
//! Widgets are `span.pronWR` nodes, visited in document order. A widget
//! without a `dir` attribute opens a new group with its text as the label; a
//! widget carrying `dir` is a regional variant of the most recently opened
//! group. Only the last group is ever extended, so the builder is just a
//! growing vector.

use kindeck_dom::DocumentNode;
use kindeck_types::PronunciationGroup;
use tracing::{debug, warn};

const WIDGET_CLASS: &str = "pronWR";
const VARIANT_ATTR: &str = "dir";

pub(crate) fn pronunciation_groups<N: DocumentNode>(root: &N) -> Vec<PronunciationGroup> {
    let mut groups: Vec<PronunciationGroup> = Vec::new();

    for widget in root.find_all_with_class("span", WIDGET_CLASS) {
        // Nested sub-nodes are decorative (audio glyphs); only the widget's
        // own text is transcription.
        let payload = widget.own_text();
        if payload.is_empty() {
            debug!("skipping pronunciation widget with no transcription text");
            continue;
        }

        if widget.attribute(VARIANT_ATTR).is_some() {
            match groups.last_mut() {
                Some(group) => group.variants.push(payload),
                None => {
                    // Malformed page: a variant before any label. Keep the
                    // data under a synthesized unlabeled group.
                    warn!(variant = %payload, "pronunciation variant precedes any label");
                    groups.push(PronunciationGroup {
                        label: String::new(),
                        variants: vec![payload],
                    });
                }
            }
        } else {
            groups.push(PronunciationGroup::new(payload));
        }
    }

    groups
}
