use smmx_core::codec::{decode, encode, CodecError};
use smmx_core::model::document::{Attachment, Relation};
use smmx_core::{ErrorKind, Layout, MindMap, Node};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const PAYLOAD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<simplemind-mindmaps doc-version="3" generator="SimpleMindPro" gen-version="1.30">
  <mindmap>
    <meta>
      <guid guid="A1B2"/>
      <title text="Project"/>
      <style key="system.soft"/>
      <auto-numbering style="disabled"/>
      <scrollstate zoom="125" x="10.00" y="20.00"/>
      <selection guid="G0" type="node" id="0"/>
      <main-centraltheme id="0"/>
    </meta>
    <topics>
      <topic id="0" parent="-1" guid="G0" x="400.00" y="400.00" palette="1" text="Project" textfmt="plain"/>
      <topic id="1" parent="0" guid="G1" x="600.00" y="400.00" text="Design" textfmt="plain">
        <note>Sketch first</note>
      </topic>
      <topic id="2" parent="1" guid="G2" x="800.00" y="400.00" icon="flag" text="Review" textfmt="plain"/>
      <topic id="3" parent="-1" guid="G3" x="0.00" y="0.00" text="Parking lot" textfmt="plain"/>
    </topics>
    <relations>
      <relation guid="R1" source="2" target="3"/>
    </relations>
  </mindmap>
</simplemind-mindmaps>
"#;

fn archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn built_map() -> MindMap {
    let mut map = MindMap::new("Built");
    map.add_node(Node::root("0", "Center").with_position(400.0, 400.0))
        .unwrap();
    let mut branch = Node::new("1", "Branch", "0").with_notes("one\ntwo");
    branch.colorinfo = "4".to_string();
    branch.layout = Layout {
        mode: "free".to_string(),
        direction: String::new(),
        flow: "auto".to_string(),
    };
    map.add_node(branch).unwrap();
    map.add_node(Node::new("2", "Leaf <b>", "1").with_position(-1.5, 2.25))
        .unwrap();
    map.relations.push(Relation {
        guid: "REL".to_string(),
        source: "2".to_string(),
        target: "0".to_string(),
    });
    map
}

#[test]
fn decodes_archive_written_by_another_producer() {
    let bytes = archive(&[
        ("document/mindmap.xml", PAYLOAD.as_bytes()),
        ("images/CAFE.jpeg", &[0xff, 0xd8]),
        ("thumbnail.png", &[0x89]),
    ]);
    let map = decode(&bytes).unwrap();

    assert_eq!(map.meta.title, "Project");
    assert_eq!(map.meta.zoom, 125);
    assert!(map.meta.contains_images);
    assert_eq!(map.len(), 4);
    assert_eq!(map.root().unwrap().id, "0");
    assert_eq!(map.top_level_nodes().count(), 2);
    assert_eq!(map.get_node("1").unwrap().notes, "Sketch first");
    assert_eq!(map.get_node("2").unwrap().icon, "flag");

    assert_eq!(map.attachments.len(), 1);
    assert_eq!(map.attachments["CAFE"].extension, "jpeg");
}

#[test]
fn decoded_archive_survives_re_encoding() {
    let bytes = archive(&[
        ("document/mindmap.xml", PAYLOAD.as_bytes()),
        ("images/CAFE.jpeg", &[0xff, 0xd8]),
    ]);
    let first = decode(&bytes).unwrap();
    let second = decode(&encode(&first).unwrap()).unwrap();

    assert_eq!(second, first);
    assert_eq!(second.relations[0].target, "3");
    assert_eq!(second.attachments["CAFE"].data, vec![0xff, 0xd8]);
}

#[test]
fn built_document_round_trips_every_field() {
    let map = built_map();
    let decoded = decode(&encode(&map).unwrap()).unwrap();

    assert_eq!(decoded, map);
    let branch = decoded.get_node("1").unwrap();
    assert_eq!(branch.notes, "one\ntwo");
    assert_eq!(branch.layout.flow, "auto");
    assert_eq!(decoded.get_node("2").unwrap().text, "Leaf <b>");
}

#[test]
fn attachments_round_trip_with_their_extension() {
    let mut map = built_map();
    assert!(!map.meta.contains_images);
    map.add_attachment(
        "BEEF",
        Attachment {
            extension: "gif".to_string(),
            data: b"GIF89a".to_vec(),
        },
    );
    assert!(map.meta.contains_images);

    let decoded = decode(&encode(&map).unwrap()).unwrap();
    assert_eq!(decoded, map);
    assert_eq!(decoded.attachments["BEEF"].extension, "gif");
}

#[test]
fn central_theme_picks_root_among_top_level_nodes() {
    let payload = r#"<simplemind-mindmaps doc-version="3"><mindmap>
        <meta><main-centraltheme id="5"/></meta>
        <topics>
          <topic id="2" parent="-1" text="Parking lot"/>
          <topic id="5" parent="-1" text="Center"/>
          <topic id="6" parent="5" text="Branch"/>
          <topic id="7" parent="2" text="Idea"/>
        </topics>
    </mindmap></simplemind-mindmaps>"#;
    let bytes = archive(&[("document/mindmap.xml", payload.as_bytes())]);

    let map = decode(&bytes).unwrap();
    assert_eq!(map.root().unwrap().id, "5");
    assert_eq!(map.top_level_nodes().count(), 2);

    let again = decode(&encode(&map).unwrap()).unwrap();
    assert_eq!(again.root().unwrap().id, "5");
    assert_eq!(again.root().unwrap().text, "Center");
    assert_eq!(again.get_node("2").unwrap().children(), ["7".to_string()]);
    assert_eq!(again, map);
}

#[test]
fn encoding_is_deterministic() {
    let map = built_map();
    assert_eq!(encode(&map).unwrap(), encode(&map).unwrap());
}

#[test]
fn missing_payload_is_a_format_error() {
    let bytes = archive(&[("images/CAFE.png", &[1])]);
    let err = decode(&bytes).unwrap_err();
    assert!(matches!(err, CodecError::MissingPayload(_)));
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn non_archive_bytes_are_a_format_error() {
    let err = decode(b"<simplemind-mindmaps/>").unwrap_err();
    assert!(matches!(err, CodecError::NotAnArchive(_)));
}

#[test]
fn cyclic_payload_is_a_corrupt_tree() {
    let payload = r#"<simplemind-mindmaps><mindmap><topics>
        <topic id="0" parent="-1" text="Root"/>
        <topic id="1" parent="2" text="A"/>
        <topic id="2" parent="1" text="B"/>
    </topics></mindmap></simplemind-mindmaps>"#;
    let bytes = archive(&[("document/mindmap.xml", payload.as_bytes())]);

    let err = decode(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CorruptTree);
}
