//! Owned XML document tree with typed node selection.
//!
//! Remote documents arrive with no declared schema, so this layer keeps the
//! parsed tree fully generic: elements, attributes and text in document
//! order. Queries use a typed [`Selector`] instead of string XPath;
//! a predicate over a missing child element never matches, mirroring
//! XPath's empty-nodeset comparison semantics.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::XmlError;

/// Result type for XML operations.
pub type Result<T> = std::result::Result<T, XmlError>;

/// A single node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(Element),
    Text(String),
}

/// An element with its attributes and children in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl Element {
    /// Concatenated direct text content, trimmed.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            if let XmlNode::Text(text) = child {
                out.push_str(text);
            }
        }
        out.trim().to_string()
    }

    /// First direct child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find_map(|node| match node {
            XmlNode::Element(element) if element.name == name => Some(element),
            _ => None,
        })
    }

    /// Trimmed text of the first direct child element with the given name.
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).map(Element::text)
    }

    /// Attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A parsed XML document.
#[derive(Debug, Clone)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parse a document from UTF-8 bytes.
    ///
    /// Malformed input is an [`XmlError`]; callers treat it as fatal and
    /// never retry.
    pub fn parse(bytes: &[u8]) -> Result<Document> {
        let text = std::str::from_utf8(bytes).map_err(|e| XmlError::Encoding(e.to_string()))?;
        let mut reader = Reader::from_str(text);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader
                .read_event()
                .map_err(|e| XmlError::Parse(e.to_string()))?
            {
                Event::Start(start) => {
                    stack.push(open_element(&start)?);
                }
                Event::Empty(start) => {
                    let element = open_element(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| XmlError::Parse("unexpected closing tag".to_string()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    let value = text
                        .unescape()
                        .map_err(|e| XmlError::Parse(e.to_string()))?
                        .into_owned();
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(XmlNode::Text(value));
                    }
                }
                Event::CData(cdata) => {
                    let value = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(XmlNode::Text(value));
                    }
                }
                Event::Eof => break,
                // Prolog, comments, processing instructions and doctype carry no data.
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(XmlError::Parse("unexpected end of document".to_string()));
        }

        root.map(|root| Document { root })
            .ok_or_else(|| XmlError::Parse("missing root element".to_string()))
    }

    /// The document's root element.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// All elements (root included) matching the selector, in document order.
    pub fn select<'a>(&'a self, selector: &Selector) -> Vec<&'a Element> {
        let mut out = Vec::new();
        collect(&self.root, selector, &mut out);
        out
    }

    /// Number of elements matching the selector.
    pub fn count(&self, selector: &Selector) -> usize {
        self.select(selector).len()
    }
}

fn collect<'a>(element: &'a Element, selector: &Selector, out: &mut Vec<&'a Element>) {
    if selector.matches(element) {
        out.push(element);
    }
    for child in &element.children {
        if let XmlNode::Element(inner) = child {
            collect(inner, selector, out);
        }
    }
}

fn attach(stack: &mut Vec<Element>, root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(XmlNode::Element(element));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(XmlError::Parse("multiple root elements".to_string())),
    }
}

fn open_element(start: &BytesStart<'_>) -> Result<Element> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| XmlError::Parse(e.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| XmlError::Parse(e.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

/// Descendant-element selection by name, with an optional child-field predicate.
#[derive(Debug, Clone)]
pub struct Selector {
    name: String,
    predicate: Option<Predicate>,
}

/// Predicate over the text of a direct child element.
#[derive(Debug, Clone)]
enum Predicate {
    ChildEquals(String, String),
    ChildNotEquals(String, String),
}

impl Selector {
    /// Select elements with the given name anywhere in the document.
    pub fn element(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            predicate: None,
        }
    }

    /// Keep only elements whose child's text equals the given value.
    pub fn child_equals(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.predicate = Some(Predicate::ChildEquals(field.into(), value.into()));
        self
    }

    /// Keep only elements whose child's text differs from the given value.
    ///
    /// Elements without that child are not matched.
    pub fn child_not_equals(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.predicate = Some(Predicate::ChildNotEquals(field.into(), value.into()));
        self
    }

    fn matches(&self, element: &Element) -> bool {
        if element.name != self.name {
            return false;
        }
        match &self.predicate {
            None => true,
            Some(Predicate::ChildEquals(field, value)) => element
                .child_text(field)
                .is_some_and(|text| text == *value),
            Some(Predicate::ChildNotEquals(field, value)) => element
                .child_text(field)
                .is_some_and(|text| text != *value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const INVOICES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <invoices>
          <invoice><id>1</id><status>paid</status></invoice>
          <invoice><id>2</id><status>open</status></invoice>
          <invoice><id>3</id><status>overdue</status></invoice>
          <invoice><id>4</id></invoice>
        </invoices>"#;

    #[test]
    fn test_parse_and_count() {
        let doc = Document::parse(INVOICES.as_bytes()).unwrap();
        assert_eq!(doc.root().name, "invoices");
        assert_eq!(doc.count(&Selector::element("invoice")), 4);
    }

    #[test]
    fn test_select_with_predicate() {
        let doc = Document::parse(INVOICES.as_bytes()).unwrap();

        let unpaid = Selector::element("invoice").child_not_equals("status", "paid");
        let matched = doc.select(&unpaid);
        let ids: Vec<String> = matched
            .iter()
            .filter_map(|el| el.child_text("id"))
            .collect();
        assert_eq!(ids, vec!["2", "3"]);

        let paid = Selector::element("invoice").child_equals("status", "paid");
        assert_eq!(doc.count(&paid), 1);
    }

    #[test]
    fn test_predicate_over_missing_child_never_matches() {
        let doc = Document::parse(INVOICES.as_bytes()).unwrap();
        // Invoice 4 has no status child and must match neither predicate.
        let unpaid = Selector::element("invoice").child_not_equals("status", "paid");
        assert!(
            doc.select(&unpaid)
                .iter()
                .all(|el| el.child_text("id") != Some("4".to_string()))
        );
    }

    #[test]
    fn test_attributes_and_entities() {
        let doc =
            Document::parse(br#"<a href="x &amp; y">Tom &amp; Jerry</a>"#).unwrap();
        assert_eq!(doc.root().attribute("href"), Some("x & y"));
        assert_eq!(doc.root().text(), "Tom & Jerry");
    }

    #[test]
    fn test_cdata_is_text() {
        let doc = Document::parse(b"<a><![CDATA[<raw>]]></a>").unwrap();
        assert_eq!(doc.root().text(), "<raw>");
    }

    #[test]
    fn test_malformed_is_parse_error() {
        assert!(matches!(
            Document::parse(b"<a><b></a>"),
            Err(XmlError::Parse(_))
        ));
        assert!(matches!(
            Document::parse(b"<a>"),
            Err(XmlError::Parse(_))
        ));
        assert!(matches!(Document::parse(b""), Err(XmlError::Parse(_))));
    }

    #[test]
    fn test_invalid_utf8_is_encoding_error() {
        assert!(matches!(
            Document::parse(&[0x3c, 0x61, 0x3e, 0xff, 0x3c, 0x2f, 0x61, 0x3e]),
            Err(XmlError::Encoding(_))
        ));
    }
}
