//! # XML Writer
//!
//! Renders a [`SceneDocument`] as a place file:
//!
//! ```text
//! <?xml version="1.0" encoding="utf-8"?>
//! <roblox xmlns:xmime=... version="4">
//!   <Item class="Workspace" referent="RBX00000001">
//!     <Properties>
//!       <string name="Name">Workspace</string>
//!       ...
//!     </Properties>
//!     <Item ...>
//!   </Item>
//! </roblox>
//! ```
//!
//! Numbers use the shortest text that reads back to the same value, so the
//! output is byte-stable for a given document.

use std::io::Write;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::document::{NodeId, SceneDocument};
use crate::error::{SceneError, SceneResult};
use crate::property::{Property, PropertyValue, CFRAME_KEYS, UDIM2_KEYS};

/// Root element attributes, in emission order.
pub const ROOT_ATTRIBUTES: [(&str, &str); 4] = [
    ("xmlns:xmime", "http://www.w3.org/2005/05/xmlmime"),
    ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
    ("xsi:noNamespaceSchemaLocation", "http://www.roblox.com/roblox.xsd"),
    ("version", "4"),
];

const INDENT: usize = 2;

fn xml_err(e: impl std::fmt::Display) -> SceneError {
    SceneError::Xml(e.to_string())
}

struct SceneWriter<W: Write> {
    inner: Writer<W>,
}

impl<W: Write> SceneWriter<W> {
    fn event(&mut self, event: Event<'_>) -> SceneResult<()> {
        self.inner.write_event(event).map_err(xml_err)
    }

    fn text_element(&mut self, tag: &str, name: Option<&str>, text: &str) -> SceneResult<()> {
        let mut start = BytesStart::new(tag);
        if let Some(name) = name {
            start.push_attribute(("name", name));
        }
        self.event(Event::Start(start))?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.event(Event::End(BytesEnd::new(tag)))
    }

    fn record(&mut self, tag: &str, name: &str, fields: &[(&str, String)]) -> SceneResult<()> {
        let mut start = BytesStart::new(tag);
        start.push_attribute(("name", name));
        self.event(Event::Start(start))?;
        for (key, value) in fields {
            self.text_element(key, None, value)?;
        }
        self.event(Event::End(BytesEnd::new(tag)))
    }

    fn property(&mut self, property: &Property) -> SceneResult<()> {
        let tag = property.value.tag();
        let name = property.name.as_str();
        match &property.value {
            PropertyValue::String(s) | PropertyValue::BinaryString(s) => self.text_element(tag, Some(name), s),
            PropertyValue::ProtectedString(source) => {
                let mut start = BytesStart::new(tag);
                start.push_attribute(("name", name));
                self.event(Event::Start(start))?;
                if source.contains("]]>") {
                    self.event(Event::Text(BytesText::new(source)))?;
                } else {
                    self.event(Event::CData(BytesCData::new(source.as_str())))?;
                }
                self.event(Event::End(BytesEnd::new(tag)))
            }
            PropertyValue::Bool(b) => self.text_element(tag, Some(name), if *b { "true" } else { "false" }),
            PropertyValue::Int(i) => self.text_element(tag, Some(name), &i.to_string()),
            PropertyValue::Float(f) => self.text_element(tag, Some(name), &f.to_string()),
            PropertyValue::Double(d) => self.text_element(tag, Some(name), &d.to_string()),
            PropertyValue::Token(t) | PropertyValue::Color3uint8(t) => self.text_element(tag, Some(name), &t.to_string()),
            PropertyValue::Color3(c) => self.record(
                tag,
                name,
                &[("R", c.r.to_string()), ("G", c.g.to_string()), ("B", c.b.to_string())],
            ),
            PropertyValue::Vector3(v) => self.record(
                tag,
                name,
                &[("X", v.x.to_string()), ("Y", v.y.to_string()), ("Z", v.z.to_string())],
            ),
            PropertyValue::Vector2(x, y) => self.record(tag, name, &[("X", x.to_string()), ("Y", y.to_string())]),
            PropertyValue::CFrame(values) => {
                let fields: Vec<(&str, String)> = CFRAME_KEYS.iter().zip(values).map(|(k, v)| (*k, v.to_string())).collect();
                self.record(tag, name, &fields)
            }
            PropertyValue::UDim2(u) => {
                let values = [
                    u.x_scale.to_string(),
                    u.x_offset.to_string(),
                    u.y_scale.to_string(),
                    u.y_offset.to_string(),
                ];
                let fields: Vec<(&str, String)> = UDIM2_KEYS.iter().copied().zip(values).collect();
                self.record(tag, name, &fields)
            }
            PropertyValue::Ref(target) => self.text_element(tag, Some(name), target.as_deref().unwrap_or("null")),
        }
    }

    fn item(&mut self, doc: &SceneDocument, id: NodeId) -> SceneResult<()> {
        let node = doc.node(id);
        let start = BytesStart::new("Item").with_attributes([("class", node.class.as_str()), ("referent", node.referent.as_str())]);
        self.event(Event::Start(start))?;
        self.event(Event::Start(BytesStart::new("Properties")))?;
        for property in &node.properties {
            self.property(property)?;
        }
        self.event(Event::End(BytesEnd::new("Properties")))?;
        for &child in &node.children {
            self.item(doc, child)?;
        }
        self.event(Event::End(BytesEnd::new("Item")))
    }
}

/// Writes a document to `out`.
///
/// # Errors
///
/// Returns [`SceneError::Xml`] if the underlying writer fails.
pub fn write_document<W: Write>(doc: &SceneDocument, out: W) -> SceneResult<()> {
    let mut writer = SceneWriter {
        inner: Writer::new_with_indent(out, b' ', INDENT),
    };
    writer.event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.event(Event::Start(BytesStart::new("roblox").with_attributes(ROOT_ATTRIBUTES)))?;
    for &root in doc.roots() {
        writer.item(doc, root)?;
    }
    writer.event(Event::End(BytesEnd::new("roblox")))?;
    writer.inner.get_mut().write_all(b"\n").map_err(xml_err)
}

/// Renders a document into memory.
///
/// # Errors
///
/// See [`write_document`].
pub fn to_xml_bytes(doc: &SceneDocument) -> SceneResult<Vec<u8>> {
    let mut out = Vec::with_capacity(doc.len() * 512);
    write_document(doc, &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_and_root() {
        let mut doc = SceneDocument::new();
        doc.add_root("Workspace", "Workspace");
        let text = String::from_utf8(to_xml_bytes(&doc).unwrap()).unwrap();
        assert!(text.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
        assert!(text.contains(r#"version="4""#));
        assert!(text.contains(r#"<Item class="Workspace" referent="RBX00000001">"#));
        assert!(text.contains(r#"<string name="Name">Workspace</string>"#));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut doc = SceneDocument::new();
        doc.add_root("Folder", "A < B & C");
        let text = String::from_utf8(to_xml_bytes(&doc).unwrap()).unwrap();
        assert!(text.contains("A &lt; B &amp; C"));
    }

    #[test]
    fn test_cframe_components() {
        let mut doc = SceneDocument::new();
        let id = doc.add_root("Part", "P");
        doc.set(id, "CFrame", PropertyValue::cframe_at(obby_core::Vec3::new(1.0, 2.5, -3.0)));
        let text = String::from_utf8(to_xml_bytes(&doc).unwrap()).unwrap();
        assert!(text.contains("<Y>2.5</Y>"));
        assert!(text.contains("<R22>1</R22>"));
    }
}
