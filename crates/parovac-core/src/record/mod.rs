//! Schema-less records mapped from XML nodes.
//!
//! The invoicing service publishes collection resources with no declared
//! schema, so mapped records keep whatever shape the service sent: a scalar
//! string, an ordered list, or an ordered mapping keyed by tag name.
//! Repeated tags promote the field to a list; a single occurrence stays a
//! bare value.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::xml::{Element, XmlNode};

/// Field name used for non-blank text mixed between sibling elements.
pub const TEXT_FIELD: &str = "#text";

/// A schema-less value mapped from an XML fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenericRecord {
    /// Trimmed text content.
    Scalar(String),
    /// Repeated same-named fields, in document order.
    List(Vec<GenericRecord>),
    /// Named fields, in document order. Never empty.
    Map(Vec<(String, GenericRecord)>),
}

impl GenericRecord {
    /// Look up a named field. Only mappings have fields.
    pub fn field(&self, name: &str) -> Option<&GenericRecord> {
        match self {
            GenericRecord::Map(fields) => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Look up a named field and return its scalar text.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(GenericRecord::as_str)
    }

    /// Scalar text, if this record is a scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            GenericRecord::Scalar(text) => Some(text),
            _ => None,
        }
    }

    /// List items, if this record is a list.
    pub fn as_list(&self) -> Option<&[GenericRecord]> {
        match self {
            GenericRecord::List(items) => Some(items),
            _ => None,
        }
    }

    /// Field pairs, if this record is a mapping.
    pub fn fields(&self) -> Option<&[(String, GenericRecord)]> {
        match self {
            GenericRecord::Map(fields) => Some(fields),
            _ => None,
        }
    }
}

impl Serialize for GenericRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GenericRecord::Scalar(text) => serializer.serialize_str(text),
            GenericRecord::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            GenericRecord::Map(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, value) in fields {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }
    }
}

/// Map an XML node into a generic record.
///
/// Returns `None` for nodes with no meaningful content; a mapping is never
/// empty. Never fails on a well-formed tree.
pub fn map_node(node: &XmlNode) -> Option<GenericRecord> {
    match node {
        XmlNode::Text(text) => Some(GenericRecord::Scalar(text.trim().to_string())),
        XmlNode::Element(element) => map_element(element),
    }
}

/// Map an element into a generic record.
pub fn map_element(element: &Element) -> Option<GenericRecord> {
    // An element whose only child is text is a scalar leaf; attributes are
    // discarded.
    if element.children.len() == 1 {
        if let XmlNode::Text(text) = &element.children[0] {
            return Some(GenericRecord::Scalar(text.trim().to_string()));
        }
    }

    let mut fields: Vec<(String, GenericRecord)> = Vec::new();
    for child in &element.children {
        let Some(mapped) = map_node(child) else {
            continue;
        };
        // Whitespace-only text between sibling elements is noise, not data.
        if matches!(child, XmlNode::Text(_)) && mapped.as_str().is_some_and(str::is_empty) {
            continue;
        }
        let name = match child {
            XmlNode::Element(inner) => inner.name.as_str(),
            XmlNode::Text(_) => TEXT_FIELD,
        };
        insert_field(&mut fields, name, mapped);
    }

    if fields.is_empty() {
        None
    } else {
        Some(GenericRecord::Map(fields))
    }
}

/// First occurrence assigns directly; repeats promote the field to a list.
fn insert_field(fields: &mut Vec<(String, GenericRecord)>, name: &str, value: GenericRecord) {
    if let Some((_, existing)) = fields.iter_mut().find(|(field, _)| field == name) {
        match existing {
            GenericRecord::List(items) => items.push(value),
            _ => {
                let first = std::mem::replace(existing, GenericRecord::List(Vec::new()));
                if let GenericRecord::List(items) = existing {
                    items.push(first);
                    items.push(value);
                }
            }
        }
    } else {
        fields.push((name.to_string(), value));
    }
}
