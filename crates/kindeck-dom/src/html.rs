//! Tolerant reader for dictionary-page markup.
//!
//! Turns raw page text into an [`Element`] tree. Tolerance over fidelity:
//! unknown close tags are ignored, misnested table rows and cells are
//! recovered, comments, doctypes, script and style bodies are skipped, and
//! the handful of entities dictionary pages use are decoded. Anything the
//! reader cannot make sense of degrades to text or gets dropped; the only
//! fatal case is input with no elements at all.

use thiserror::Error;

use crate::element::Element;

#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("document contains no markup elements")]
    NoElements,
}

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Read a document into an element tree rooted at a synthetic `document`
/// element.
pub fn parse(input: &str) -> Result<Element, MarkupError> {
    let mut parser = Parser {
        stack: vec![Element::new("document")],
        saw_element: false,
    };

    let mut rest = input;
    while !rest.is_empty() {
        match rest.find('<') {
            Some(lt) => {
                parser.text(&rest[..lt]);
                rest = parser.tag(&rest[lt..]);
            }
            None => {
                parser.text(rest);
                break;
            }
        }
    }

    while parser.stack.len() > 1 {
        parser.close_top();
    }

    if !parser.saw_element {
        return Err(MarkupError::NoElements);
    }

    Ok(parser
        .stack
        .pop()
        .unwrap_or_else(|| Element::new("document")))
}

struct Parser {
    stack: Vec<Element>,
    saw_element: bool,
}

impl Parser {
    fn text(&mut self, raw: &str) {
        if raw.trim().is_empty() {
            return;
        }
        if let Some(top) = self.stack.last_mut() {
            top.push_text(decode_entities(raw));
        }
    }

    /// Consume one construct starting at `<`, returning the remaining input.
    fn tag<'a>(&mut self, rest: &'a str) -> &'a str {
        if let Some(after) = rest.strip_prefix("<!--") {
            return match after.find("-->") {
                Some(end) => &after[end + 3..],
                None => "",
            };
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            return match rest.find('>') {
                Some(end) => &rest[end + 1..],
                None => "",
            };
        }
        if let Some(after) = rest.strip_prefix("</") {
            let end = match scan_tag_end(after) {
                Some(end) => end,
                None => return "",
            };
            let name = after[..end]
                .trim()
                .trim_end_matches('/')
                .to_ascii_lowercase();
            self.close_named(&name);
            return &after[end + 1..];
        }

        let after = &rest[1..];
        let name_len = after
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(after.len());
        if name_len == 0 {
            // Stray '<', keep it as text.
            self.text("<");
            return after;
        }
        let name = after[..name_len].to_ascii_lowercase();

        let end = match scan_tag_end(after) {
            Some(end) => end,
            None => return "",
        };
        let attr_src = &after[name_len..end];
        let self_closing = attr_src.trim_end().ends_with('/');
        let remaining = &after[end + 1..];

        let mut element = Element::new(name.clone());
        parse_attrs(attr_src, &mut element);
        self.saw_element = true;

        while self
            .stack
            .last()
            .is_some_and(|top| closes_implicitly(&name, top.tag()))
        {
            self.close_top();
        }

        if name == "script" || name == "style" {
            // Bodies are never markup we care about.
            self.attach(element);
            let closer = format!("</{name}");
            return match remaining.to_ascii_lowercase().find(&closer) {
                Some(pos) => {
                    let after_close = &remaining[pos..];
                    match after_close.find('>') {
                        Some(gt) => &after_close[gt + 1..],
                        None => "",
                    }
                }
                None => "",
            };
        }

        if self_closing || VOID_TAGS.contains(&name.as_str()) {
            self.attach(element);
        } else {
            self.stack.push(element);
        }
        remaining
    }

    fn attach(&mut self, element: Element) {
        if let Some(top) = self.stack.last_mut() {
            top.push_element(element);
        }
    }

    fn close_top(&mut self) {
        if self.stack.len() > 1
            && let Some(element) = self.stack.pop()
        {
            self.attach(element);
        }
    }

    /// Close up to and including the innermost open element with this tag.
    /// An unmatched close tag is ignored.
    fn close_named(&mut self, name: &str) {
        let Some(depth) = self
            .stack
            .iter()
            .skip(1)
            .rposition(|element| element.tag() == name)
        else {
            tracing::debug!(tag = name, "ignoring unmatched close tag");
            return;
        };
        let target_len = depth + 1;
        while self.stack.len() > target_len {
            self.close_top();
        }
    }
}

/// A new open tag force-closes some still-open ancestors; dictionary pages
/// routinely omit `</td>` and `</tr>`.
fn closes_implicitly(open: &str, top: &str) -> bool {
    match open {
        "tr" => matches!(top, "tr" | "td" | "th"),
        "td" | "th" => matches!(top, "td" | "th"),
        "tbody" | "thead" | "tfoot" => matches!(top, "tr" | "td" | "th"),
        "li" => top == "li",
        "p" => top == "p",
        _ => false,
    }
}

/// Index of the closing `>` of a tag body, skipping quoted attribute values.
fn scan_tag_end(s: &str) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, byte) in s.bytes().enumerate() {
        match quote {
            Some(q) => {
                if byte == q {
                    quote = None;
                }
            }
            None => match byte {
                b'"' | b'\'' => quote = Some(byte),
                b'>' => return Some(i),
                _ => {}
            },
        }
    }
    None
}

fn parse_attrs(src: &str, element: &mut Element) {
    let mut rest = src.trim_start();
    while !rest.is_empty() {
        if rest == "/" {
            break;
        }
        let name_len = rest
            .find(|c: char| c == '=' || c == '/' || c.is_whitespace())
            .unwrap_or(rest.len());
        if name_len == 0 {
            rest = rest[1..].trim_start();
            continue;
        }
        let name = rest[..name_len].to_ascii_lowercase();
        rest = rest[name_len..].trim_start();

        if let Some(after_eq) = rest.strip_prefix('=') {
            let value_src = after_eq.trim_start();
            let (value, remaining) = read_attr_value(value_src);
            element.set_attr(name, decode_entities(value));
            rest = remaining.trim_start();
        } else {
            element.set_attr(name, String::new());
        }
    }
}

fn read_attr_value(src: &str) -> (&str, &str) {
    for quote in ['"', '\''] {
        if let Some(inner) = src.strip_prefix(quote) {
            return match inner.find(quote) {
                Some(end) => (&inner[..end], &inner[end + 1..]),
                None => (inner, ""),
            };
        }
    }
    let end = src
        .find(|c: char| c.is_whitespace() || c == '/')
        .unwrap_or(src.len());
    (&src[..end], &src[end..])
}

fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        // Entity names are short ASCII; bound the lookahead without ever
        // slicing inside a multi-byte character.
        let semi = rest
            .char_indices()
            .take_while(|&(i, _)| i < 12)
            .find_map(|(i, c)| (c == ';').then_some(i));
        if let Some(semi) = semi
            && let Some(decoded) = decode_entity(&rest[1..semi])
        {
            out.push(decoded);
            rest = &rest[semi + 1..];
            continue;
        }
        out.push('&');
        rest = &rest[1..];
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::DocumentNode;

    #[test]
    fn reads_a_dictionary_table_fragment() {
        let page = r#"
            <html><body>
            <!-- header -->
            <table class="WRD">
              <tr class="even">
                <td class="FrWrd"><strong>pin</strong> <em class="POS2">n</em></td>
                <td>(fastener)</td>
                <td class="ToWrd">alfiler <em class="POS2">nm</em></td>
              </tr>
            </table>
            </body></html>"#;
        let root = parse(page).unwrap();
        let root = &root;

        let tables = root.find_all_with_class("table", "WRD");
        assert_eq!(tables.len(), 1);
        let cells = tables[0].find_all("td");
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[2].own_text(), "alfiler");
    }

    #[test]
    fn recovers_from_unclosed_cells_and_rows() {
        let page = r#"<table class="WRD">
            <tr class="even"><td class="FrWrd">cat<td class="ToWrd">gato
            <tr class="odd"><td><td class="ToWrd">minino
            </table>"#;
        let root = parse(page).unwrap();
        let root = &root;

        let rows = (&root.find_all("table")[0]).find_all("tr");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].find_all("td").len(), 2);
        assert_eq!(rows[1].find_all("td").len(), 2);
    }

    #[test]
    fn decodes_entities_in_text_and_attributes() {
        let root = parse(r#"<td class="ToWrd" title="a&quot;b">caf&eacute;X &amp; t&#233;</td>"#)
            .unwrap();
        let root = &root;
        let cell = root.find_all("td")[0];
        // Unknown named entities stay literal, numeric ones decode.
        assert_eq!(cell.text(), "caf&eacute;X & té");
        assert_eq!(cell.attribute("title").as_deref(), Some(r#"a"b"#));
    }

    #[test]
    fn skips_scripts_comments_and_doctype() {
        let page = "<!doctype html><script>let x = '<table>';</script><!-- <b> --><div>ok</div>";
        let root = parse(page).unwrap();
        let root = &root;
        assert!(root.find_all("table").is_empty());
        assert!(root.find_all("b").is_empty());
        assert_eq!(root.find_all("div")[0].text(), "ok");
    }

    #[test]
    fn entity_lookahead_survives_multibyte_text() {
        // A '&' whose lookahead window ends inside an accented character
        // must fall through as a literal ampersand, not panic.
        let root = parse("<div>&0123456789é</div>").unwrap();
        let root = &root;
        assert_eq!(root.find_all("div")[0].text(), "&0123456789é");

        let root = parse(r#"<div title="&0123456789é">x</div>"#).unwrap();
        let root = &root;
        assert_eq!(
            root.find_all("div")[0].attribute("title").as_deref(),
            Some("&0123456789é")
        );
    }

    #[test]
    fn plain_text_is_not_a_document() {
        assert!(matches!(parse("just words"), Err(MarkupError::NoElements)));
    }
}
