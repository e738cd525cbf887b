//! Small XML helpers shared by the WebDAV verbs.
//!
//! Request bodies are tiny, so they are read into an owned element tree
//! with namespaces already resolved. Responses are written with a
//! tab-indented `quick_xml::Writer`.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use std::fmt::Write as _;

use crate::error::DavError;

/// The WebDAV namespace.
pub const DAV_NS: &str = "DAV:";

#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An element with its namespace URI resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub namespace: Option<String>,
    pub local_name: String,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    fn from_start(ns: &ResolveResult<'_>, start: &BytesStart<'_>) -> Result<Self, DavError> {
        let namespace = match ns {
            ResolveResult::Bound(Namespace(uri)) => Some(String::from_utf8(uri.to_vec())?),
            _ => None,
        };
        Ok(Self {
            namespace,
            local_name: String::from_utf8(start.local_name().as_ref().to_vec())?,
            children: Vec::new(),
        })
    }

    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local_name == local_name
    }

    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            XmlNode::Text(_) => None,
        })
    }

    /// First element in document order (self included) matching the name.
    pub fn find(&self, namespace: &str, local_name: &str) -> Option<&XmlElement> {
        if self.is(namespace, local_name) {
            return Some(self);
        }
        self.elements().find_map(|el| el.find(namespace, local_name))
    }

    /// Concatenated text of all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Text(text) => out.push_str(text),
                XmlNode::Element(el) => el.collect_text(out),
            }
        }
    }
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, el: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(el)),
        None => {
            if root.is_none() {
                *root = Some(el);
            }
        }
    }
}

/// Parse a request body. An empty or whitespace-only body yields `None`.
pub fn parse_document(body: &[u8]) -> Result<Option<XmlElement>, DavError> {
    let mut reader = NsReader::from_reader(body);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_resolved_event()? {
            (ns, Event::Start(start)) => stack.push(XmlElement::from_start(&ns, &start)?),
            (ns, Event::Empty(start)) => {
                let el = XmlElement::from_start(&ns, &start)?;
                attach(&mut stack, &mut root, el);
            }
            (_, Event::End(_)) => {
                if let Some(el) = stack.pop() {
                    attach(&mut stack, &mut root, el);
                }
            }
            (_, Event::Text(text)) => {
                let text = text.unescape()?;
                if let Some(parent) = stack.last_mut()
                    && !text.trim().is_empty()
                {
                    parent.children.push(XmlNode::Text(text.into_owned()));
                }
            }
            (_, Event::CData(data)) => {
                let text = String::from_utf8(data.into_inner().into_owned())?;
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlNode::Text(text));
                }
            }
            (_, Event::Eof) => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(DavError::BadRequest("unclosed element".into()));
    }
    Ok(root)
}

/// Tab-indented writer for response documents.
pub struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    /// Start a document with the given declared encoding.
    pub fn new(encoding: &str) -> Result<Self, DavError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some(encoding), None)))?;
        Ok(Self { writer })
    }

    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), DavError> {
        let mut start = BytesStart::new(name);
        for &attr in attrs {
            start.push_attribute(attr);
        }
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    pub fn end(&mut self, name: &str) -> Result<(), DavError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    pub fn empty(&mut self, name: &str) -> Result<(), DavError> {
        self.empty_with(name, &[])
    }

    pub fn empty_with(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), DavError> {
        let mut start = BytesStart::new(name);
        for &attr in attrs {
            start.push_attribute(attr);
        }
        self.writer.write_event(Event::Empty(start))?;
        Ok(())
    }

    /// `<name attrs>text</name>` on one line.
    pub fn text_element(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> Result<(), DavError> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    pub fn text(&mut self, text: &str) -> Result<(), DavError> {
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

/// Replace every non-ASCII character with a numeric character reference.
pub fn to_ascii(document: &[u8]) -> Vec<u8> {
    let text = String::from_utf8_lossy(document);
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let _ = write!(out, "&#{};", c as u32);
        }
    }
    out.into_bytes()
}
