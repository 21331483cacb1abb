//! Payload and archive decoding.
//!
//! Topics are collected flat and linked only after the whole payload has
//! been read, so a topic may appear before its parent.

use super::archive::read_archive;
use super::{CodecError, CodecResult};
use crate::model::document::{DocumentError, MapMeta, MindMap, Relation};
use crate::model::node::{Node, Position};
use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// Decodes archive bytes into a linked, validated document.
///
/// Attachments imply `contains_images`, matching
/// [`MindMap::add_attachment`] and the encoder's images element.
pub fn decode(bytes: &[u8]) -> CodecResult<MindMap> {
    let contents = read_archive(bytes)?;
    let mut map = decode_payload(&contents.payload)?;
    if !contents.attachments.is_empty() {
        map.meta.contains_images = true;
    }
    map.attachments = contents.attachments;
    debug!(
        "event=decode module=codec status=ok nodes={} relations={} attachments={}",
        map.len(),
        map.relations.len(),
        map.attachments.len()
    );
    Ok(map)
}

/// Decodes the structured-markup payload alone (no attachments).
pub fn decode_payload(payload: &[u8]) -> CodecResult<MindMap> {
    let text = std::str::from_utf8(payload)
        .map_err(|err| CodecError::MalformedMarkup(format!("payload is not UTF-8: {err}")))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut parsed = PayloadParser::default();
    let mut reader = Reader::from_str(text);
    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                parsed.depth += 1;
                parsed.open(&element, false)?;
            }
            Event::Empty(element) => parsed.open(&element, true)?,
            Event::End(element) => {
                parsed.depth = parsed.depth.saturating_sub(1);
                parsed.close(element.local_name().as_ref())?;
            }
            Event::Text(text) => {
                if let Some(notes) = parsed.note_buffer.as_mut() {
                    notes.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(notes) = parsed.note_buffer.as_mut() {
                    notes.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    parsed.finish()
}

#[derive(Default)]
struct PayloadParser {
    meta: MapMeta,
    nodes: Vec<Node>,
    relations: Vec<Relation>,
    central_theme: Option<String>,
    topic: Option<Node>,
    note_buffer: Option<String>,
    saw_mindmap: bool,
    in_meta: bool,
    depth: usize,
}

impl PayloadParser {
    fn open(&mut self, element: &BytesStart<'_>, is_empty: bool) -> CodecResult<()> {
        let name = element.local_name();
        let attrs = Attributes::read(element)?;

        if self.in_meta {
            self.open_meta(name.as_ref(), &attrs)?;
            return Ok(());
        }

        match name.as_ref() {
            b"mindmap" => self.saw_mindmap = true,
            b"meta" => self.in_meta = !is_empty,
            b"topic" => {
                if self.topic.is_some() {
                    return Err(CodecError::MalformedMarkup(
                        "nested topic elements".to_string(),
                    ));
                }
                let node = topic_from(&attrs)?;
                if is_empty {
                    self.nodes.push(node);
                } else {
                    self.topic = Some(node);
                }
            }
            b"note" => {
                if self.topic.is_some() && !is_empty {
                    self.note_buffer = Some(String::new());
                }
            }
            b"link" => {
                if let Some(topic) = self.topic.as_mut() {
                    topic.url_link = attrs.text("urllink");
                }
            }
            b"layout" => {
                if let Some(topic) = self.topic.as_mut() {
                    topic.layout.mode = attrs.text("mode");
                    topic.layout.direction = attrs.text("direction");
                    topic.layout.flow = attrs.text("flow");
                }
            }
            b"parent-relation" => {
                if let Some(topic) = self.topic.as_mut() {
                    topic.parent_relation_guid = attrs.text("guid");
                }
            }
            b"relation" => self.relations.push(Relation {
                guid: attrs.text("guid"),
                source: attrs.text("source"),
                target: attrs.text("target"),
            }),
            _ => {}
        }
        Ok(())
    }

    fn open_meta(&mut self, name: &[u8], attrs: &Attributes) -> CodecResult<()> {
        match name {
            b"title" => self.meta.title = attrs.text_or("text", &self.meta.title),
            b"guid" => self.meta.guid = attrs.text("guid"),
            b"style" => self.meta.style = attrs.text_or("key", &self.meta.style),
            b"scrollstate" => {
                self.meta.zoom = attrs.zoom("zoom", self.meta.zoom)?;
                self.meta.scroll_x = attrs.number("x")?;
                self.meta.scroll_y = attrs.number("y")?;
            }
            b"images" => {
                self.meta.contains_images =
                    attrs.text("containsImages").eq_ignore_ascii_case("true");
            }
            b"main-centraltheme" => self.central_theme = attrs.get("id").map(str::to_string),
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) -> CodecResult<()> {
        match name {
            b"meta" => self.in_meta = false,
            b"note" => {
                if let (Some(topic), Some(notes)) = (self.topic.as_mut(), self.note_buffer.take()) {
                    topic.notes = notes;
                }
            }
            b"topic" => {
                if let Some(topic) = self.topic.take() {
                    self.nodes.push(topic);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> CodecResult<MindMap> {
        if self.depth != 0 {
            return Err(CodecError::MalformedMarkup(
                "payload ended inside an open element".to_string(),
            ));
        }
        if !self.saw_mindmap {
            return Err(CodecError::MalformedMarkup(
                "payload has no mindmap element".to_string(),
            ));
        }

        let mut map = MindMap::from_nodes(self.meta, self.nodes).map_err(|err| match err {
            DocumentError::DuplicateId(id) => {
                CodecError::MalformedMarkup(format!("duplicate topic id `{id}`"))
            }
            other => CodecError::CorruptTree(other),
        })?;
        if let Some(central_theme) = self.central_theme {
            map.designate_root(&central_theme);
        }
        map.relations = self.relations;
        Ok(map)
    }
}

fn topic_from(attrs: &Attributes) -> CodecResult<Node> {
    let id = attrs.required("id")?;
    let parent_id = attrs.required("parent")?;
    let mut node = Node::new(id, attrs.text("text"), parent_id);
    node.position = Position::new(attrs.number("x")?, attrs.number("y")?);
    node.guid = attrs.text("guid");
    node.palette = attrs.text("palette");
    node.colorinfo = attrs.text("colorinfo");
    node.icon = attrs.text("icon");
    Ok(node)
}

/// Unescaped attributes of one element.
struct Attributes(HashMap<String, String>);

impl Attributes {
    fn read(element: &BytesStart<'_>) -> CodecResult<Self> {
        let mut values = HashMap::new();
        for attribute in element.attributes() {
            let attribute =
                attribute.map_err(|err| CodecError::MalformedMarkup(err.to_string()))?;
            let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
            let value = attribute.unescape_value()?.into_owned();
            values.insert(key, value);
        }
        Ok(Self(values))
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    fn text(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    fn text_or(&self, key: &str, fallback: &str) -> String {
        self.get(key).unwrap_or(fallback).to_string()
    }

    fn required(&self, key: &str) -> CodecResult<String> {
        self.get(key).map(str::to_string).ok_or_else(|| {
            CodecError::MalformedMarkup(format!("topic is missing the `{key}` attribute"))
        })
    }

    fn number(&self, key: &str) -> CodecResult<f64> {
        match self.get(key).map(str::trim) {
            None | Some("") => Ok(0.0),
            Some(raw) => raw.parse::<f64>().map_err(|_| {
                CodecError::MalformedMarkup(format!("attribute `{key}` is not a number: `{raw}`"))
            }),
        }
    }

    fn zoom(&self, key: &str, fallback: i32) -> CodecResult<i32> {
        match self.get(key).map(str::trim) {
            None | Some("") => Ok(fallback),
            Some(_) => Ok(self.number(key)?.round() as i32),
        }
    }
}
