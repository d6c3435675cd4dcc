//! Markup helpers built on an HTML5 fragment parser
//!
//! Content is opaque markup owned by the rendering layer. The engine only needs
//! its top-level nodes, a few root attributes and plain text for heading
//! numbering and blank checks. Markup is parsed the way a browser parses the
//! children of `<body>`, so implied end tags and character references resolve
//! as they do in the live editor. Nothing below the root element of a block is
//! rewritten.

use scraper::{ElementRef, Html, Node};

/// Elements that never have a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Check if a tag never has a closing tag
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Split markup into its top-level nodes, each serialized on its own.
///
/// Whitespace between root elements and top-level comments are dropped. A bare
/// text run at the top level becomes its own node. Elements left open are
/// closed where the parser closes them (`<p>one<p>two` is two paragraphs), and
/// stray end tags are ignored.
pub fn split_top_level(markup: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(markup);

    fragment
        .root_element()
        .children()
        .filter_map(|node| match node.value() {
            Node::Element(_) => ElementRef::wrap(node).map(|element| element.html()),
            Node::Text(text) => {
                let text = text.trim();
                (!text.is_empty()).then(|| escape_text(text))
            }
            _ => None,
        })
        .collect()
}

/// Name, attributes and inner markup of a block's root element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootElement {
    /// Lowercased tag name
    pub name: String,
    attrs: Vec<(String, String)>,
    inner: String,
}

impl RootElement {
    /// Parse the root element of a block; `None` for a bare text node
    pub fn parse(block: &str) -> Option<Self> {
        let fragment = Html::parse_fragment(block);
        let first = fragment.root_element().children().find(|node| match node.value() {
            Node::Text(text) => !text.trim().is_empty(),
            Node::Comment(_) => false,
            _ => true,
        })?;
        let element = ElementRef::wrap(first)?;

        Some(Self {
            name: element.value().name().to_ascii_lowercase(),
            attrs: element
                .value()
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            inner: element.inner_html(),
        })
    }

    /// Decoded value of an attribute
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    /// Check if the `class` list contains `class`
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|list| list.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Set or replace an attribute, keeping its position when it exists
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(attr, _)| attr == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    /// Remove an attribute; returns whether it was present
    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attrs.len();
        self.attrs.retain(|(attr, _)| attr != name);
        self.attrs.len() != before
    }

    /// Serialize back to markup
    pub fn to_markup(&self) -> String {
        let mut out = String::with_capacity(self.inner.len() + 16 * (self.attrs.len() + 1));
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attribute(value));
            out.push('"');
        }
        out.push('>');

        if !is_void_element(&self.name) {
            out.push_str(&self.inner);
            out.push_str("</");
            out.push_str(&self.name);
            out.push('>');
        }
        out
    }
}

/// Lowercased name of the root element, `None` for a bare text node
pub fn root_tag(block: &str) -> Option<String> {
    RootElement::parse(block).map(|root| root.name)
}

/// Decoded value of an attribute on the root element
pub fn attribute(block: &str, name: &str) -> Option<String> {
    RootElement::parse(block)?.attr(name).map(str::to_string)
}

/// Check if the root element's `class` list contains `class`
pub fn has_class(block: &str, class: &str) -> bool {
    RootElement::parse(block).is_some_and(|root| root.has_class(class))
}

/// Set (or replace) an attribute on the root element
pub fn set_attribute(block: &str, name: &str, value: &str) -> String {
    match RootElement::parse(block) {
        Some(mut root) => {
            root.set_attr(name, value);
            root.to_markup()
        }
        None => block.to_string(),
    }
}

/// Remove an attribute from the root element
pub fn remove_attribute(block: &str, name: &str) -> String {
    match RootElement::parse(block) {
        Some(mut root) => {
            if root.remove_attr(name) {
                root.to_markup()
            } else {
                block.to_string()
            }
        }
        None => block.to_string(),
    }
}

/// Byte offset of the first text character inside the root element.
///
/// Leading inline tags are skipped, so `<h2><b>Intro</b></h2>` points at `I`.
/// Returns `None` when the element holds no text before its first closing tag.
/// Expects serialized markup, where text never holds a raw `<`.
pub fn first_text_offset(block: &str) -> Option<usize> {
    if !block.starts_with('<') {
        return None;
    }
    let bytes = block.as_bytes();
    let mut i = open_tag_end(block, 0)? + 1;

    while i < bytes.len() {
        if bytes[i] == b'<' {
            if bytes.get(i + 1) == Some(&b'/') {
                return None;
            }
            i = open_tag_end(block, i)? + 1;
        } else if bytes[i].is_ascii_whitespace() {
            i += 1;
        } else {
            return Some(i);
        }
    }
    None
}

/// Plain text of a markup fragment with tags removed and character references decoded
pub fn text_content(markup: &str) -> String {
    Html::parse_fragment(markup).root_element().text().collect()
}

/// Escape text for use as element content
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
    out
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('\u{a0}', "&nbsp;")
}

/// Index of the `>` closing the tag that starts at `start`, honoring quotes
fn open_tag_end(markup: &str, start: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (offset, &b) in markup.as_bytes()[start..].iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(start + offset),
            None => {}
        }
    }
    None
}
