//! Minimal XML element tree.
//!
//! Builds an owned tree from `quick-xml` events and offers the handful of
//! path-style lookups the PubMed parser needs. The builder rejects input
//! that is not well-formed: mismatched or stray end tags, unclosed elements,
//! missing or duplicate root elements and text outside the root.

use crate::error::ParseFailure;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// A node inside an element: either a child element or a run of text.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with its attributes and children in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, ParseFailure> {
        let name = decode_name(start.name().as_ref())?;

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = decode_name(attr.key.as_ref())?;
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    /// Tag name, including any namespace prefix
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of the attribute `key`, if present
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Direct child elements in document order
    pub fn child_elements(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// First direct child named `name`
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|el| el.name == name)
    }

    /// First element reached by following `path` through direct children.
    ///
    /// `["AffiliationInfo", "Affiliation"]` finds the first `Affiliation`
    /// under any `AffiliationInfo` child, searching in document order.
    pub fn find_path(&self, path: &[&str]) -> Option<&Element> {
        let (first, rest) = path.split_first()?;
        self.child_elements()
            .filter(|el| el.name == *first)
            .find_map(|el| if rest.is_empty() { Some(el) } else { el.find_path(rest) })
    }

    /// This element followed by all of its descendants, pre-order
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Every element named `name` in this subtree, in document order
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.descendants().filter(move |el| el.name == name)
    }

    /// First element named `name` in this subtree
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.descendants().find(|el| el.name == name)
    }

    /// Concatenated text of this element and its descendants, trimmed.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out.trim().to_string()
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(el) => el.collect_text(out),
            }
        }
    }
}

/// Pre-order iterator over an element subtree
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let el = self.stack.pop()?;
        self.stack.extend(el.child_elements().rev());
        Some(el)
    }
}

/// Parse a complete XML document into its root element.
pub fn parse_document(xml: &str) -> Result<Element, ParseFailure> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().check_end_names = true;

    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if open.is_empty() && root.is_some() {
                    return Err(ParseFailure::TrailingContent);
                }
                open.push(Element::from_start(&start)?);
            }
            Event::Empty(start) => {
                if open.is_empty() && root.is_some() {
                    return Err(ParseFailure::TrailingContent);
                }
                let el = Element::from_start(&start)?;
                close(&mut open, &mut root, el);
            }
            // Unmatched end tags are rejected by the reader (`check_end_names`)
            Event::End(_) => {
                if let Some(el) = open.pop() {
                    close(&mut open, &mut root, el);
                }
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                push_text(&mut open, &text)?;
            }
            Event::CData(data) => {
                let bytes = data.into_inner();
                let text = std::str::from_utf8(&bytes)
                    .map_err(|e| ParseFailure::Encoding(e.to_string()))?;
                push_text(&mut open, text)?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and DOCTYPE carry no data
            _ => {}
        }
    }

    if let Some(unclosed) = open.pop() {
        return Err(ParseFailure::Unclosed(unclosed.name));
    }
    root.ok_or(ParseFailure::NoRoot)
}

fn close(open: &mut [Element], root: &mut Option<Element>, el: Element) {
    match open.last_mut() {
        Some(parent) => parent.children.push(Node::Element(el)),
        None => *root = Some(el),
    }
}

fn push_text(open: &mut [Element], text: &str) -> Result<(), ParseFailure> {
    match open.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Text(text.to_string()));
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(ParseFailure::StrayText),
    }
}

fn decode_name(raw: &[u8]) -> Result<String, ParseFailure> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|e| ParseFailure::Encoding(e.to_string()))
}
