//! Shared event walk over XML report dialects
//!
//! Adapters implement [`XmlVisitor`] and keep only the state their dialect
//! needs; decoding, BOM handling, root validation and element nesting live
//! here.

use std::fmt::Display;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ReportParseError;

/// An opened element with its attributes, keyed by local name
#[derive(Debug, Clone)]
pub(crate) struct XmlElement {
    pub name: String,
    attributes: Vec<(String, String)>,
}

impl XmlElement {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute that must be present for the report to make sense
    pub fn required(
        &self,
        element: &'static str,
        attribute: &'static str,
    ) -> Result<&str, ReportParseError> {
        self.attr(attribute)
            .ok_or(ReportParseError::MissingAttribute { element, attribute })
    }
}

/// Callbacks driven by [`walk`]. `ancestors` never includes the element
/// being opened or closed; for `text` the last entry is the enclosing element.
pub(crate) trait XmlVisitor {
    fn open(&mut self, ancestors: &[String], element: &XmlElement) -> Result<(), ReportParseError>;

    fn text(&mut self, _path: &[String], _text: &str) {}

    fn close(&mut self, _ancestors: &[String], _name: &str) -> Result<(), ReportParseError> {
        Ok(())
    }
}

/// Decode report bytes, tolerating a UTF-8 byte order mark
pub(crate) fn decode(raw: &[u8]) -> Result<&str, ReportParseError> {
    let text = std::str::from_utf8(raw)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Err(ReportParseError::Empty);
    }
    Ok(text)
}

/// Walk every element of `raw`, rejecting documents whose root is not one of `roots`.
pub(crate) fn walk<V: XmlVisitor>(
    raw: &[u8],
    roots: &[&str],
    visitor: &mut V,
) -> Result<(), ReportParseError> {
    let text = decode(raw)?;
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);

    let mut stack: Vec<String> = Vec::new();
    let mut seen_root = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| xml_error(reader.buffer_position(), e))?;

        match event {
            Event::Start(start) => {
                let element =
                    element(&start).map_err(|e| xml_error(reader.buffer_position(), e))?;
                check_root(&mut seen_root, roots, &element.name)?;
                visitor.open(&stack, &element)?;
                stack.push(element.name);
            }
            Event::Empty(start) => {
                let element =
                    element(&start).map_err(|e| xml_error(reader.buffer_position(), e))?;
                check_root(&mut seen_root, roots, &element.name)?;
                visitor.open(&stack, &element)?;
                visitor.close(&stack, &element.name)?;
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.local_name().as_ref()).into_owned();
                stack.pop();
                visitor.close(&stack, &name)?;
            }
            Event::Text(content) => {
                let text = content
                    .unescape()
                    .map_err(|e| xml_error(reader.buffer_position(), e))?;
                visitor.text(&stack, &text);
            }
            Event::CData(content) => {
                let bytes = content.into_inner();
                visitor.text(&stack, &String::from_utf8_lossy(&bytes));
            }
            Event::Eof => {
                if let Some(open) = stack.last() {
                    return Err(xml_error(
                        reader.buffer_position(),
                        format!("document ends inside <{}>", open),
                    ));
                }
                break;
            }
            _ => {}
        }
    }

    if !seen_root {
        return Err(ReportParseError::Empty);
    }
    Ok(())
}

fn element(start: &BytesStart<'_>) -> Result<XmlElement, String> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|e| e.to_string())?.into_owned();
        attributes.push((key, value));
    }
    Ok(XmlElement { name, attributes })
}

fn check_root(seen_root: &mut bool, roots: &[&str], name: &str) -> Result<(), ReportParseError> {
    if *seen_root {
        return Ok(());
    }
    *seen_root = true;
    if roots.iter().any(|r| *r == name) {
        Ok(())
    } else {
        Err(ReportParseError::UnexpectedRoot {
            found: name.to_string(),
            expected: roots.join(", "),
        })
    }
}

fn xml_error(position: usize, err: impl Display) -> ReportParseError {
    ReportParseError::Xml {
        position: position as u64,
        message: err.to_string(),
    }
}
