use crate::node::DocumentNode;

/// A child of an [`Element`]: either a nested element or a text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An owned markup element.
///
/// Built either by the page reader ([`crate::html::parse`]) or
/// programmatically through the builder methods, which tests use to lay out
/// page fragments without any markup source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: set an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder: append a child element.
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Builder: append a text run.
    pub fn text_node(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub(crate) fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.push((name.into(), value.into()));
    }

    pub(crate) fn push_element(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub(crate) fn push_text(&mut self, text: String) {
        self.children.push(Node::Text(text));
    }

    fn collect_descendants<'a>(&'a self, tag: &str, out: &mut Vec<&'a Element>) {
        for child in &self.children {
            if let Node::Element(element) = child {
                if element.tag == tag {
                    out.push(element);
                }
                element.collect_descendants(tag, out);
            }
        }
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => {
                    out.push_str(text);
                    out.push(' ');
                }
                Node::Element(element) => element.collect_text(out),
            }
        }
    }
}

fn normalize(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    for word in raw.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(word);
    }
    normalized
}

impl<'a> DocumentNode for &'a Element {
    fn find_all(&self, tag: &str) -> Vec<&'a Element> {
        let mut out = Vec::new();
        self.collect_descendants(tag, &mut out);
        out
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attrs
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.clone())
    }

    fn text(&self) -> String {
        let mut raw = String::new();
        self.collect_text(&mut raw);
        normalize(&raw)
    }

    fn own_text(&self) -> String {
        let mut raw = String::new();
        for child in &self.children {
            if let Node::Text(text) = child {
                raw.push_str(text);
                raw.push(' ');
            }
        }
        normalize(&raw)
    }
}
