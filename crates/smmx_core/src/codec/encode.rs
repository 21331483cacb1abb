//! Payload and archive encoding.

use super::archive::write_archive;
use super::{CodecError, CodecResult};
use crate::core_version;
use crate::model::defaults::{AUTO_NUMBERING_STYLE, DOC_VERSION, GENERATOR, TEXT_FORMAT};
use crate::model::document::MindMap;
use crate::model::node::Node;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::HashSet;

/// Encodes a document into archive bytes.
///
/// Fails with [`CodecError::CorruptTree`] when the document's parent links
/// do not form a tree.
pub fn encode(map: &MindMap) -> CodecResult<Vec<u8>> {
    let payload = encode_payload(map)?;
    write_archive(&payload, &map.attachments)
}

/// Encodes the structured-markup payload alone.
pub fn encode_payload(map: &MindMap) -> CodecResult<Vec<u8>> {
    map.validate()?;

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;

    let mut document = BytesStart::new("simplemind-mindmaps");
    document.push_attribute(("doc-version", DOC_VERSION));
    document.push_attribute(("generator", GENERATOR));
    document.push_attribute(("gen-version", core_version()));
    emit(&mut writer, Event::Start(document))?;
    emit(&mut writer, Event::Start(BytesStart::new("mindmap")))?;

    write_meta(&mut writer, map)?;
    write_topics(&mut writer, map)?;
    write_relations(&mut writer, map)?;
    emit(&mut writer, Event::Empty(BytesStart::new("node-groups")))?;

    emit(&mut writer, Event::End(BytesEnd::new("mindmap")))?;
    emit(&mut writer, Event::End(BytesEnd::new("simplemind-mindmaps")))?;

    let mut payload = writer.into_inner();
    payload.push(b'\n');
    Ok(payload)
}

fn write_meta(writer: &mut Writer<Vec<u8>>, map: &MindMap) -> CodecResult<()> {
    let meta = &map.meta;
    emit(writer, Event::Start(BytesStart::new("meta")))?;

    empty(writer, "guid", &[("guid", meta.guid.as_str())])?;
    empty(writer, "title", &[("text", meta.title.as_str())])?;
    if meta.contains_images || !map.attachments.is_empty() {
        empty(writer, "images", &[("containsImages", "true")])?;
    }
    empty(writer, "style", &[("key", meta.style.as_str())])?;
    empty(writer, "auto-numbering", &[("style", AUTO_NUMBERING_STYLE)])?;
    empty(
        writer,
        "scrollstate",
        &[
            ("zoom", meta.zoom.to_string().as_str()),
            ("x", fixed(meta.scroll_x).as_str()),
            ("y", fixed(meta.scroll_y).as_str()),
        ],
    )?;
    if let Some(root) = map.root() {
        empty(
            writer,
            "selection",
            &[
                ("guid", root.guid.as_str()),
                ("type", "node"),
                ("id", root.id.as_str()),
            ],
        )?;
        empty(writer, "main-centraltheme", &[("id", root.id.as_str())])?;
    }

    emit(writer, Event::End(BytesEnd::new("meta")))
}

/// Writes topics in pre-order, starting from every top-level node.
fn write_topics(writer: &mut Writer<Vec<u8>>, map: &MindMap) -> CodecResult<()> {
    emit(writer, Event::Start(BytesStart::new("topics")))?;

    let mut written = HashSet::new();
    for top in map.top_level_nodes() {
        let mut stack = vec![top];
        while let Some(node) = stack.pop() {
            if !written.insert(node.id.as_str()) {
                continue;
            }
            write_topic(writer, node)?;
            let children = map.children_of(&node.id).collect::<Vec<_>>();
            stack.extend(children.into_iter().rev());
        }
    }

    emit(writer, Event::End(BytesEnd::new("topics")))
}

fn write_topic(writer: &mut Writer<Vec<u8>>, node: &Node) -> CodecResult<()> {
    let x = fixed(node.position.x);
    let y = fixed(node.position.y);

    let mut topic = BytesStart::new("topic");
    topic.push_attribute(("id", node.id.as_str()));
    topic.push_attribute(("parent", node.parent_id.as_str()));
    topic.push_attribute(("guid", node.guid.as_str()));
    topic.push_attribute(("x", x.as_str()));
    topic.push_attribute(("y", y.as_str()));
    for (key, value) in [
        ("palette", &node.palette),
        ("colorinfo", &node.colorinfo),
        ("icon", &node.icon),
    ] {
        if !value.is_empty() {
            topic.push_attribute((key, value.as_str()));
        }
    }
    topic.push_attribute(("text", node.text.as_str()));
    topic.push_attribute(("textfmt", TEXT_FORMAT));

    let has_body = !node.parent_relation_guid.is_empty()
        || !node.url_link.is_empty()
        || !node.notes.is_empty()
        || !node.layout.is_empty();
    if !has_body {
        return emit(writer, Event::Empty(topic));
    }

    emit(writer, Event::Start(topic))?;
    if !node.parent_relation_guid.is_empty() {
        empty(
            writer,
            "parent-relation",
            &[("guid", node.parent_relation_guid.as_str())],
        )?;
    }
    if !node.url_link.is_empty() {
        empty(writer, "link", &[("urllink", node.url_link.as_str())])?;
    }
    if !node.notes.is_empty() {
        emit(writer, Event::Start(BytesStart::new("note")))?;
        emit(writer, Event::Text(BytesText::new(&node.notes)))?;
        emit(writer, Event::End(BytesEnd::new("note")))?;
    }
    if !node.layout.is_empty() {
        let mut layout = BytesStart::new("layout");
        for (key, value) in [
            ("mode", &node.layout.mode),
            ("direction", &node.layout.direction),
            ("flow", &node.layout.flow),
        ] {
            if !value.is_empty() {
                layout.push_attribute((key, value.as_str()));
            }
        }
        emit(writer, Event::Empty(layout))?;
    }
    emit(writer, Event::End(BytesEnd::new("topic")))
}

fn write_relations(writer: &mut Writer<Vec<u8>>, map: &MindMap) -> CodecResult<()> {
    if map.relations.is_empty() {
        return Ok(());
    }
    emit(writer, Event::Start(BytesStart::new("relations")))?;
    for relation in &map.relations {
        empty(
            writer,
            "relation",
            &[
                ("guid", relation.guid.as_str()),
                ("source", relation.source.as_str()),
                ("target", relation.target.as_str()),
            ],
        )?;
    }
    emit(writer, Event::End(BytesEnd::new("relations")))
}

fn empty(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    attributes: &[(&str, &str)],
) -> CodecResult<()> {
    let mut element = BytesStart::new(name);
    for attribute in attributes {
        element.push_attribute(*attribute);
    }
    emit(writer, Event::Empty(element))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> CodecResult<()> {
    writer
        .write_event(event)
        .map_err(|err| CodecError::Encode(err.to_string()))
}

/// Formats a coordinate with two fixed decimals.
fn fixed(value: f64) -> String {
    format!("{value:.2}")
}
