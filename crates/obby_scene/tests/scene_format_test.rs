//! # Scene Format Integration Test
//!
//! Renders generated worlds and reads the output back with a plain XML
//! reader, decoding the embedded attribute blocks and tag sets.

use obby_core::{Color3, Primitive, SemanticFlags, ThemeId, Vec3, World};
use obby_procedural::{GeneratorConfig, WorldGenerator, WorldSeed};
use obby_scene::serializer::{REMOTE_EVENTS, REMOTE_FUNCTIONS};
use obby_scene::{
    attributes_from_base64, decode_attributes, encode_attributes, encode_tags, tags_from_base64, to_xml_bytes,
    AttributeMap, AttributeValue, SceneError, SceneMetadata, SceneSerializer, ScriptKind, ScriptSource, TagSet,
};
use quick_xml::events::Event;
use quick_xml::Reader;

fn world(seed: u64, stages: i64) -> World {
    WorldGenerator::new(GeneratorConfig {
        seed: WorldSeed::new(seed),
        ..GeneratorConfig::default()
    })
    .generate(stages, &ThemeId::DEFAULT_SEQUENCE, &[])
}

/// `(class, name, attributes, tags)` for every `Item` in the output.
fn read_items(xml: &[u8]) -> Vec<(String, String, Option<AttributeMap>, Option<TagSet>)> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut items: Vec<(String, String, Option<AttributeMap>, Option<TagSet>)> = Vec::new();
    let mut stack: Vec<usize> = Vec::new();
    let mut current_property: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf).unwrap() {
            Event::Start(e) if e.name().as_ref() == b"Item" => {
                let class = e
                    .try_get_attribute("class")
                    .unwrap()
                    .map(|a| String::from_utf8(a.value.to_vec()).unwrap())
                    .unwrap();
                items.push((class, String::new(), None, None));
                stack.push(items.len() - 1);
            }
            Event::End(e) if e.name().as_ref() == b"Item" => {
                stack.pop();
            }
            Event::Start(e) if matches!(e.name().as_ref(), b"string" | b"BinaryString") => {
                current_property = e
                    .try_get_attribute("name")
                    .unwrap()
                    .map(|a| String::from_utf8(a.value.to_vec()).unwrap());
            }
            Event::Text(t) => {
                let text = t.unescape().unwrap().into_owned();
                if let (Some(property), Some(&item)) = (current_property.take(), stack.last()) {
                    match property.as_str() {
                        "Name" => items[item].1 = text,
                        "AttributesSerialize" => items[item].2 = Some(attributes_from_base64(&text).unwrap()),
                        "Tags" => items[item].3 = Some(tags_from_base64(&text).unwrap()),
                        _ => {}
                    }
                }
            }
            Event::End(_) => current_property = None,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    items
}

/// Test: the documented attribute map survives encode then decode with types intact.
#[test]
fn test_attribute_conformance() {
    let mut map = AttributeMap::new();
    map.insert("MoveAxis", "x");
    map.insert("MoveDistance", 10.0);
    map.insert("MoveSpeed", 4.0);
    map.insert("Stage", 3);
    map.insert("IsKillBrick", true);

    let decoded = decode_attributes(&encode_attributes(&map)).unwrap();
    assert_eq!(decoded, map);
    assert_eq!(decoded.get("Stage"), Some(&AttributeValue::Int32(3)));
    assert_eq!(decoded.get("IsKillBrick"), Some(&AttributeValue::Bool(true)));
    assert_eq!(decoded.get("MoveDistance"), Some(&AttributeValue::Float64(10.0)));

    assert_eq!(encode_attributes(&AttributeMap::new()), [0, 0, 0, 0]);
    let tags: TagSet = ["KillBrick", "Checkpoint"].into_iter().collect();
    assert_eq!(encode_tags(&tags), b"KillBrick\x00Checkpoint");
}

/// Test: the same world renders to identical bytes twice.
#[test]
fn test_output_reproducible() {
    let world = world(7, 20);
    let serializer = SceneSerializer::new("Epic Obby");
    let first = to_xml_bytes(&serializer.serialize_world(&world, &[]).unwrap()).unwrap();
    let second = to_xml_bytes(&serializer.serialize_world(&world, &[]).unwrap()).unwrap();
    assert_eq!(first, second);
}

/// Test: every part is in the file, and kill bricks carry their tag and attribute.
#[test]
fn test_generated_world_reads_back() {
    let world = world(3, 30);
    let doc = SceneSerializer::default().serialize_world(&world, &[]).unwrap();
    let items = read_items(&to_xml_bytes(&doc).unwrap());

    let parts = items.iter().filter(|(class, ..)| class == "Part" || class == "SpawnLocation").count();
    assert_eq!(parts, world.primitives.len());
    assert_eq!(items.iter().filter(|(class, ..)| class == "SpawnLocation").count(), 1);

    let hazards = world.primitives.iter().filter(|p| p.has(SemanticFlags::HAZARD)).count();
    let tagged: Vec<_> = items
        .iter()
        .filter(|(.., tags)| tags.as_ref().is_some_and(|t| t.contains("KillBrick")))
        .collect();
    assert_eq!(tagged.len(), hazards);
    for (_, name, attributes, _) in tagged {
        let attributes = attributes.as_ref().unwrap_or_else(|| panic!("{name} has no attributes"));
        assert_eq!(attributes.get("IsKillBrick"), Some(&AttributeValue::Bool(true)));
    }

    let checkpoints = items
        .iter()
        .filter(|(.., tags)| tags.as_ref().is_some_and(|t| t.contains("Checkpoint")))
        .count();
    assert_eq!(checkpoints, world.primitives.iter().filter(|p| p.has(SemanticFlags::CHECKPOINT)).count());

    let folders = items.iter().filter(|(class, name, ..)| class == "Folder" && name.starts_with("Section")).count();
    assert_eq!(folders, world.sections.len());
}

/// Test: referents are unique across the whole document.
#[test]
fn test_referents_unique() {
    let world = world(11, 16);
    let doc = SceneSerializer::default().serialize_world(&world, &[]).unwrap();
    let mut referents: Vec<_> = doc.iter().map(|(_, n)| n.referent.clone()).collect();
    let total = referents.len();
    referents.sort();
    referents.dedup();
    assert_eq!(referents.len(), total);
}

/// Test: an out-of-range color aborts the document and names the part.
#[test]
fn test_bad_color_is_fatal() {
    let mut world = world(5, 8);
    world.primitives[3].color = Color3::new(1.5, 0.0, 0.0);
    let name = world.primitives[3].name.clone();
    match SceneSerializer::default().serialize_world(&world, &[]) {
        Err(SceneError::InvalidGeometry { item, field, .. }) => {
            assert_eq!(item, name);
            assert_eq!(field, "color");
        }
        other => panic!("expected a geometry error, got {other:?}"),
    }
}

/// Test: a zero-size part is rejected rather than clamped.
#[test]
fn test_zero_size_is_fatal() {
    let part = Primitive::block("Flat", Vec3::new(0.0, 5.0, 0.0), Vec3::new(4.0, 1.0, 4.0));
    let mut flat = part.clone();
    flat.size.y = 0.0;
    assert!(SceneSerializer::default().serialize(&[part], &[], &[], &[]).is_ok());
    assert!(matches!(
        SceneSerializer::default().serialize(&[flat], &[], &[], &[]),
        Err(SceneError::InvalidGeometry { field: "size", .. })
    ));
}

/// Test: scripts land in the container named by their location.
#[test]
fn test_script_placement() {
    let scripts = [
        ScriptSource::new("Client", ScriptKind::LocalScript, "StarterPlayerScripts", "print('hi')"),
        ScriptSource::new("Shared", ScriptKind::ModuleScript, "ReplicatedStorage", "return { a = 1 < 2 }"),
    ];
    let doc = SceneSerializer::default().serialize(&[], &[], &[], &scripts).unwrap();

    let player = doc.find_root("StarterPlayer").unwrap();
    let player_scripts = doc.find_child(player, "StarterPlayerScripts").unwrap();
    let client = doc.find_child(player_scripts, "Client").unwrap();
    assert_eq!(doc.node(client).class, "LocalScript");

    let replicated = doc.find_root("ReplicatedStorage").unwrap();
    assert!(doc.find_child(replicated, "Shared").is_some());
    let remotes = doc.find_child(replicated, "Remotes").unwrap();
    let events = doc.children(remotes);
    assert_eq!(events.len(), REMOTE_EVENTS.len());
    assert!(events.iter().all(|&id| doc.node(id).class == "RemoteEvent"));
    assert!(doc.find_child(remotes, "GetPlayerData").is_none());

    let functions = doc.find_child(replicated, "RemoteFunctions").unwrap();
    let calls = doc.children(functions);
    assert_eq!(calls.len(), REMOTE_FUNCTIONS.len());
    assert!(calls.iter().all(|&id| doc.node(id).class == "RemoteFunction"));
    assert!(doc.find_child(functions, "GetPlayerData").is_some());

    let text = String::from_utf8(to_xml_bytes(&doc).unwrap()).unwrap();
    assert!(text.contains("<![CDATA[return { a = 1 < 2 }]]>"));
}

/// Test: the metadata record summarizes the world.
#[test]
fn test_metadata() {
    let world = world(1, 30);
    let metadata = SceneMetadata::from_world("Epic Obby", &world);
    assert_eq!(metadata.part_count, world.primitives.len());
    assert_eq!(metadata.stage_count, 30);
    assert_eq!(metadata.section_count, 8);
    assert_eq!(metadata.themes_used.first().map(String::as_str), Some("lobby"));
    let json = metadata.to_json().unwrap();
    assert!(json.contains("\"section_count\": 8"));
}
