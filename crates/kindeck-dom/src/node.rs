/// Read-only view over a parsed markup tree.
///
/// The extraction core is generic over this trait, so any tree that can
/// answer "find descendants by tag and class" and hand out text and
/// attributes will do. All `find_*` methods return nodes in document order,
/// which callers rely on.
pub trait DocumentNode: Sized {
    /// All descendant elements with the given tag name, in document order.
    fn find_all(&self, tag: &str) -> Vec<Self>;

    /// Value of the attribute with the given name, if present.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Trimmed text of this node and all its descendants.
    fn text(&self) -> String;

    /// Trimmed text belonging directly to this node, with the text of any
    /// nested element excluded.
    fn own_text(&self) -> String;

    /// Descendant elements with the given tag carrying the given class.
    fn find_all_with_class(&self, tag: &str, class: &str) -> Vec<Self> {
        self.find_all(tag)
            .into_iter()
            .filter(|node| node.has_class(class))
            .collect()
    }

    /// Whether the space-separated `class` attribute contains `class`.
    fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|value| value.split_whitespace().any(|c| c == class))
    }
}
