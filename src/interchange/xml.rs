//! CSDL XML → node tree.
//!
//! A thin wrapper over quick-xml: elements become [`CsdlNode`]s with their
//! attributes in document order, character content is trimmed onto the
//! enclosing node, and every node is stamped with the line/column of its
//! opening tag. Comments, processing instructions and the declaration are
//! dropped.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::ReadError;
use crate::base::{DocumentId, LineIndex, Location};
use crate::syntax::CsdlNode;

/// Read an XML document into a node tree rooted at its document element.
pub fn read_nodes(text: &str, document: DocumentId) -> Result<CsdlNode, ReadError> {
    let lines = LineIndex::new(text);
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<CsdlNode> = Vec::new();
    let mut root: Option<CsdlNode> = None;

    loop {
        let offset = tag_start(text, reader.buffer_position() as usize);
        let location = Location::new(document, lines.position(offset));
        let error_at = |message: String| ReadError::xml(message, lines.position(offset));

        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                stack.push(start_node(e, location).map_err(error_at)?);
            }
            Ok(Event::Empty(ref e)) => {
                let node = start_node(e, location).map_err(error_at)?;
                attach(&mut stack, &mut root, node).map_err(error_at)?;
            }
            Ok(Event::End(_)) => {
                let Some(node) = stack.pop() else {
                    return Err(error_at("unexpected closing tag".to_string()));
                };
                attach(&mut stack, &mut root, node).map_err(error_at)?;
            }
            Ok(Event::Text(ref t)) => {
                let content = t.unescape().map_err(|e| error_at(e.to_string()))?;
                append_text(&mut stack, content.trim());
            }
            Ok(Event::CData(ref t)) => {
                let content = String::from_utf8_lossy(t);
                append_text(&mut stack, content.trim());
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ReadError::xml(
                    e.to_string(),
                    lines.position(reader.error_position() as usize),
                ));
            }
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ReadError::xml(
            format!("element '{}' is never closed", open.qualified_name()),
            open.location.position,
        ));
    }
    tracing::trace!(document = %document, "read XML node tree");
    root.ok_or(ReadError::Empty)
}

fn start_node(e: &BytesStart<'_>, location: Location) -> Result<CsdlNode, String> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(|e| format!("invalid tag name: {}", e))?
        .to_string();
    let mut node = CsdlNode::qualified(&name).at(location);
    for attr in e.attributes() {
        let attr = attr.map_err(|e| format!("attribute error: {}", e))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| format!("attribute key error: {}", e))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| format!("attribute value error: {}", e))?
            .to_string();
        node.attributes.insert(key.into(), value);
    }
    Ok(node)
}

fn attach(stack: &mut [CsdlNode], root: &mut Option<CsdlNode>, node: CsdlNode) -> Result<(), String> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(node);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(node);
            Ok(())
        }
        None => Err(format!("second root element '{}'", node.qualified_name())),
    }
}

fn append_text(stack: &mut [CsdlNode], content: &str) {
    if content.is_empty() {
        return;
    }
    if let Some(node) = stack.last_mut() {
        match &mut node.text {
            Some(text) => text.push_str(content),
            None => node.text = Some(content.to_string()),
        }
    }
}

/// The reader reports where the previous event ended; skip whitespace to the tag.
fn tag_start(text: &str, offset: usize) -> usize {
    let rest = text.get(offset..).unwrap_or_default();
    offset + (rest.len() - rest.trim_start().len())
}
