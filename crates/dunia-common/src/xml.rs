//! Owned XML element tree.
//!
//! Converted documents are small enough to hold in memory, and the converter
//! needs random access to an element's children (field lookup by name or hash
//! for discriminators), so XML is parsed into a plain tree first.

use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::{Error, Result};

/// An XML element with its attributes, text and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Tag name.
    pub tag: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Concatenated text content, unescaped and untrimmed.
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Create an empty element with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Add an attribute.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Set the text content.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Add a child element.
    pub fn child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Look up an attribute value by key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over the child elements with the given tag.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Find the first child with the given tag whose attribute `key` equals `value`.
    pub fn find_child(&self, tag: &str, key: &str, value: &str) -> Option<&XmlElement> {
        self.children
            .iter()
            .find(|c| c.tag == tag && c.attribute(key) == Some(value))
    }

    /// Parse an XML document and return its root element.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let mut element = XmlElement::new(String::from_utf8_lossy(e.name().as_ref()));
                    for attr in e.attributes() {
                        let attr = attr.map_err(|e| Error::Xml(e.to_string()))?;
                        element.attributes.push(read_attribute(&attr)?);
                    }
                    stack.push(element);
                }
                Ok(Event::Empty(e)) => {
                    let mut element = XmlElement::new(String::from_utf8_lossy(e.name().as_ref()));
                    for attr in e.attributes() {
                        let attr = attr.map_err(|e| Error::Xml(e.to_string()))?;
                        element.attributes.push(read_attribute(&attr)?);
                    }
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| Error::Xml("unbalanced closing tag".to_string()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(e)) => {
                    if let Some(element) = stack.last_mut() {
                        let text = e.unescape().map_err(|e| Error::Xml(e.to_string()))?;
                        element.text.push_str(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(element) = stack.last_mut() {
                        element.text.push_str(&String::from_utf8_lossy(&e));
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {} // Declarations, comments, processing instructions
                Err(e) => return Err(Error::Xml(format!("XML parse error: {}", e))),
            }
        }

        if !stack.is_empty() {
            return Err(Error::Xml("unexpected end of document".to_string()));
        }

        root.ok_or_else(|| Error::Xml("no root element found in XML".to_string()))
    }

    /// Parse XML bytes.
    pub fn parse_bytes(xml: &[u8]) -> Result<Self> {
        let xml = std::str::from_utf8(xml).map_err(Error::Utf8)?;
        // Tolerate a UTF-8 byte order mark
        Self::parse(xml.strip_prefix('\u{feff}').unwrap_or(xml))
    }

    /// Read and parse an XML file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::parse_bytes(&data)
    }
}

fn read_attribute(attr: &quick_xml::events::attributes::Attribute<'_>) -> Result<(String, String)> {
    let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
    let value = attr
        .unescape_value()
        .map_err(|e| Error::Xml(e.to_string()))?
        .into_owned();
    Ok((key, value))
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    } else {
        return Err(Error::Xml("multiple root elements".to_string()));
    }
    Ok(())
}
