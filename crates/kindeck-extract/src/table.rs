//! Translation-table walker.
//!
//! Dictionary-result tables carry the `WRD` class. Data rows alternate
//! between the `even` and `odd` classes, starting with `even`; the
//! alternation is purely a boundary marker, so an `even` row following an
//! `odd` one opens a new entry and everything in between merges into the
//! current one. Rows without either class are section headers and reset the
//! alternation.

use kindeck_dom::DocumentNode;
use kindeck_types::TranslationEntry;
use tracing::debug;

const TABLE_CLASS: &str = "WRD";
const SOURCE_CELL_CLASS: &str = "FrWrd";
const TARGET_CELL_CLASS: &str = "ToWrd";
const SOURCE_EXAMPLE_CLASS: &str = "FrEx";
const TARGET_EXAMPLE_CLASS: &str = "ToEx";
const GRAMMAR_CLASS: &str = "POS2";

pub(crate) fn translation_entries<N: DocumentNode>(root: &N) -> Vec<TranslationEntry> {
    let mut entries = Vec::new();
    for table in root.find_all_with_class("table", TABLE_CLASS) {
        walk_table(&table, &mut entries);
    }
    entries
}

#[derive(Clone, Copy, PartialEq)]
enum RowClass {
    Even,
    Odd,
}

fn row_class<N: DocumentNode>(row: &N) -> Option<RowClass> {
    if row.has_class("even") {
        Some(RowClass::Even)
    } else if row.has_class("odd") {
        Some(RowClass::Odd)
    } else {
        None
    }
}

fn walk_table<N: DocumentNode>(table: &N, entries: &mut Vec<TranslationEntry>) {
    let mut current: Option<TranslationEntry> = None;
    let mut previous: Option<RowClass> = None;

    for row in table.find_all("tr") {
        let Some(class) = row_class(&row) else {
            // Section header: whatever follows belongs to a new entry.
            flush(&mut current, entries);
            previous = None;
            continue;
        };

        let boundary = class == RowClass::Even && previous != Some(RowClass::Even);
        if boundary {
            flush(&mut current, entries);
        }
        previous = Some(class);

        merge_row(&row, &mut current);
    }

    flush(&mut current, entries);
}

/// Fold one data row into the entry under construction.
fn merge_row<N: DocumentNode>(row: &N, current: &mut Option<TranslationEntry>) {
    if let Some(cell) = first_cell(row, SOURCE_EXAMPLE_CLASS) {
        if let Some(entry) = current.as_mut() {
            let text = cell.text();
            if !text.is_empty() && entry.from_example.is_none() {
                entry.from_example = Some(text);
            }
        }
        return;
    }
    if let Some(cell) = first_cell(row, TARGET_EXAMPLE_CLASS) {
        if let Some(entry) = current.as_mut() {
            let text = cell.text();
            if !text.is_empty() {
                entry.to_examples.push(text);
            }
        }
        return;
    }

    let source_cell = first_cell(row, SOURCE_CELL_CLASS);
    let target_cell = first_cell(row, TARGET_CELL_CLASS);
    if source_cell.is_none() && target_cell.is_none() {
        debug!("skipping dictionary row without source or target cell");
        return;
    }

    let entry = current.get_or_insert_with(empty_entry);

    if let Some(cell) = source_cell
        && entry.source.is_empty()
    {
        entry.source = source_term(&cell);
        entry.grammar = grammar(&cell);
        if entry.sense.is_none() {
            entry.sense = sense(row);
        }
    }

    if let Some(cell) = target_cell {
        let rendering = cell.own_text();
        if !rendering.is_empty() {
            entry.renderings.push(rendering);
        }
    }
}

fn flush(current: &mut Option<TranslationEntry>, entries: &mut Vec<TranslationEntry>) {
    if let Some(entry) = current.take() {
        // An entry needs a term and at least one rendering; anything less
        // came from malformed rows.
        if entry.source.is_empty() || entry.renderings.is_empty() {
            debug!(source = %entry.source, "dropping incomplete dictionary entry");
            return;
        }
        entries.push(entry);
    }
}

fn empty_entry() -> TranslationEntry {
    TranslationEntry {
        source: String::new(),
        grammar: None,
        sense: None,
        renderings: Vec::new(),
        from_example: None,
        to_examples: Vec::new(),
    }
}

fn first_cell<N: DocumentNode>(row: &N, class: &str) -> Option<N> {
    row.find_all_with_class("td", class).into_iter().next()
}

/// The headword sits in a nested `strong`; older page variants put it
/// directly in the cell.
fn source_term<N: DocumentNode>(cell: &N) -> String {
    let term = cell
        .find_all("strong")
        .into_iter()
        .next()
        .map(|strong| strong.text())
        .unwrap_or_default();
    if term.is_empty() { cell.own_text() } else { term }
}

/// Part-of-speech marker; its visible abbreviation is the cell's own text,
/// with the expanded tooltip nested below it.
fn grammar<N: DocumentNode>(cell: &N) -> Option<String> {
    let marker = cell
        .find_all_with_class("em", GRAMMAR_CLASS)
        .into_iter()
        .next()?;
    let abbrev = marker.own_text();
    let label = if abbrev.is_empty() {
        marker.text()
    } else {
        abbrev
    };
    (!label.is_empty()).then_some(label)
}

/// Usage context lives in the row's unclassed middle cell.
fn sense<N: DocumentNode>(row: &N) -> Option<String> {
    for cell in row.find_all("td") {
        let classed = [
            SOURCE_CELL_CLASS,
            TARGET_CELL_CLASS,
            SOURCE_EXAMPLE_CLASS,
            TARGET_EXAMPLE_CLASS,
        ]
        .iter()
        .any(|class| cell.has_class(class));
        if classed {
            continue;
        }
        let text = cell.own_text();
        if !text.is_empty() {
            return Some(text);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindeck_dom::Element;

    fn source_cell(term: &str, pos: &str) -> Element {
        let mut cell = Element::new("td")
            .attr("class", "FrWrd")
            .child(Element::new("strong").text_node(term));
        if !pos.is_empty() {
            cell = cell.child(
                Element::new("em")
                    .attr("class", "POS2")
                    .text_node(pos)
                    .child(Element::new("span").text_node("noun: refers to a thing")),
            );
        }
        cell
    }

    fn target_cell(rendering: &str) -> Element {
        Element::new("td")
            .attr("class", "ToWrd")
            .text_node(rendering)
            .child(Element::new("em").attr("class", "POS2").text_node("nm"))
    }

    fn table(rows: Vec<Element>) -> Element {
        let mut table = Element::new("table").attr("class", "WRD");
        for row in rows {
            table = table.child(row);
        }
        Element::new("body").child(table)
    }

    #[test]
    fn even_odd_alternation_splits_row_groups() {
        // [even, odd, odd, even, odd] must give exactly two entries.
        let page = table(vec![
            Element::new("tr")
                .attr("class", "even")
                .child(source_cell("pin", "n"))
                .child(target_cell("alfiler")),
            Element::new("tr")
                .attr("class", "odd")
                .child(target_cell("clavija")),
            Element::new("tr")
                .attr("class", "odd")
                .child(target_cell("broche")),
            Element::new("tr")
                .attr("class", "even")
                .child(source_cell("pin", "vtr"))
                .child(target_cell("sujetar")),
            Element::new("tr")
                .attr("class", "odd")
                .child(target_cell("prender")),
        ]);

        let entries = translation_entries(&&page);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].renderings, ["alfiler", "clavija", "broche"]);
        assert_eq!(entries[1].renderings, ["sujetar", "prender"]);
    }

    #[test]
    fn consecutive_even_rows_stay_in_one_group() {
        let page = table(vec![
            Element::new("tr")
                .attr("class", "even")
                .child(source_cell("cat", "n"))
                .child(target_cell("gato")),
            Element::new("tr")
                .attr("class", "even")
                .child(target_cell("minino")),
        ]);

        let entries = translation_entries(&&page);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].renderings, ["gato", "minino"]);
    }

    #[test]
    fn section_header_rows_reset_the_alternation() {
        let page = table(vec![
            Element::new("tr")
                .attr("class", "even")
                .child(source_cell("run", "vi"))
                .child(target_cell("correr")),
            Element::new("tr")
                .attr("class", "wrtopsection")
                .child(Element::new("td").text_node("Additional Translations")),
            Element::new("tr")
                .attr("class", "even")
                .child(source_cell("run", "n"))
                .child(target_cell("carrera")),
        ]);

        let entries = translation_entries(&&page);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].renderings, ["correr"]);
        assert_eq!(entries[1].renderings, ["carrera"]);
    }

    #[test]
    fn captures_grammar_sense_and_examples() {
        let page = table(vec![
            Element::new("tr")
                .attr("class", "even")
                .child(source_cell("pin", "n"))
                .child(Element::new("td").text_node(" (fastener) "))
                .child(target_cell("alfiler")),
            Element::new("tr").attr("class", "even").child(
                Element::new("td")
                    .attr("class", "FrEx")
                    .text_node("She fixed it with a pin."),
            ),
            Element::new("tr").attr("class", "odd").child(
                Element::new("td")
                    .attr("class", "ToEx")
                    .text_node("Lo sujetó con un alfiler."),
            ),
        ]);

        let entries = translation_entries(&&page);
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.source, "pin");
        assert_eq!(entry.grammar.as_deref(), Some("n"));
        assert_eq!(entry.sense.as_deref(), Some("(fastener)"));
        assert_eq!(
            entry.from_example.as_deref(),
            Some("She fixed it with a pin.")
        );
        assert_eq!(entry.to_examples, ["Lo sujetó con un alfiler."]);
    }

    #[test]
    fn malformed_rows_are_skipped_not_fatal() {
        let page = table(vec![
            Element::new("tr")
                .attr("class", "even")
                .child(source_cell("dog", "n"))
                .child(target_cell("perro")),
            // No source or target cell at all.
            Element::new("tr")
                .attr("class", "odd")
                .child(Element::new("td").text_node("noise")),
            Element::new("tr")
                .attr("class", "odd")
                .child(target_cell("can")),
        ]);

        let entries = translation_entries(&&page);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].renderings, ["perro", "can"]);
    }

    #[test]
    fn entry_without_renderings_is_dropped() {
        let page = table(vec![
            Element::new("tr")
                .attr("class", "even")
                .child(source_cell("ghost", "n")),
        ]);
        assert!(translation_entries(&&page).is_empty());
    }

    #[test]
    fn entries_keep_document_order_across_tables() {
        let make = |term: &str, rendering: &str| {
            Element::new("table").attr("class", "WRD").child(
                Element::new("tr")
                    .attr("class", "even")
                    .child(source_cell(term, "n"))
                    .child(target_cell(rendering)),
            )
        };
        // Deliberately not alphabetical: output must follow the page, not
        // any sort.
        let page = Element::new("body")
            .child(make("zebra", "cebra"))
            .child(make("apple", "manzana"))
            .child(make("mango", "mango"));

        let entries = translation_entries(&&page);
        let sources: Vec<_> = entries.iter().map(|e| e.source.as_str()).collect();
        assert_eq!(sources, ["zebra", "apple", "mango"]);
    }
}
