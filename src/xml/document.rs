//! Flat XML document model
//!
//! A root element holding uniquely-named leaf children. Nested content inside a
//! leaf is skipped on parse; serialization always writes the indented flat form.

use std::io::Write;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::consts::DISPLAY_NAME_ATTR;
use crate::error::XmlStoreError;

/// A leaf node: `<Name displayName="label">text</Name>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct XmlNode {
    pub(crate) name: String,
    pub(crate) display_name: Option<String>,
    pub(crate) text: Option<String>,
}

impl XmlNode {
    fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: None,
            text: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct XmlDocument {
    root: String,
    nodes: Vec<XmlNode>,
}

impl XmlDocument {
    pub(crate) fn new(root: &str) -> Self {
        Self {
            root: root.to_string(),
            nodes: Vec::new(),
        }
    }

    pub(crate) fn root(&self) -> &str {
        &self.root
    }

    pub(crate) fn nodes(&self) -> &[XmlNode] {
        &self.nodes
    }

    pub(crate) fn get(&self, name: &str) -> Option<&XmlNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Text of a node, `""` when the node is missing or has no text
    pub(crate) fn text(&self, name: &str) -> &str {
        self.get(name)
            .and_then(|n| n.text.as_deref())
            .unwrap_or_default()
    }

    /// Create the node if missing, then overwrite its text.
    /// The label is only replaced when one is given.
    pub(crate) fn set(&mut self, name: &str, value: &str, display_name: Option<&str>) {
        let idx = match self.nodes.iter().position(|n| n.name == name) {
            Some(idx) => idx,
            None => {
                self.nodes.push(XmlNode::empty(name));
                self.nodes.len() - 1
            }
        };
        let node = &mut self.nodes[idx];
        node.text = Some(value.to_string());
        if let Some(label) = display_name {
            node.display_name = Some(label.to_string());
        }
    }

    pub(crate) fn parse(content: &str, path: &Path) -> Result<Self, XmlStoreError> {
        let parse_err = |source: quick_xml::Error| XmlStoreError::Parse {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = Reader::from_str(content);
        let mut root: Option<String> = None;
        let mut nodes: Vec<XmlNode> = Vec::new();
        let mut current: Option<XmlNode> = None;
        let mut depth = 0usize;

        loop {
            match reader.read_event().map_err(parse_err)? {
                Event::Start(e) => {
                    match depth {
                        0 => root = Some(element_name(&e)),
                        1 => current = Some(leaf_from(&e).map_err(parse_err)?),
                        _ => {}
                    }
                    depth += 1;
                }
                Event::Empty(e) => match depth {
                    0 => {
                        root = Some(element_name(&e));
                        break;
                    }
                    1 => push_unique(&mut nodes, leaf_from(&e).map_err(parse_err)?),
                    _ => {}
                },
                Event::Text(e) if depth == 2 => {
                    if let Some(node) = current.as_mut() {
                        let text = e.unescape().map_err(parse_err)?;
                        node.text.get_or_insert_with(String::new).push_str(&text);
                    }
                }
                Event::CData(e) if depth == 2 => {
                    if let Some(node) = current.as_mut() {
                        let raw = e.into_inner();
                        node.text
                            .get_or_insert_with(String::new)
                            .push_str(&String::from_utf8_lossy(&raw));
                    }
                }
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                    if depth == 1
                        && let Some(node) = current.take()
                    {
                        push_unique(&mut nodes, node);
                    }
                    if depth == 0 {
                        break;
                    }
                }
                Event::Eof => {
                    return Err(match root {
                        None => XmlStoreError::MissingRoot {
                            path: path.to_path_buf(),
                        },
                        Some(_) => XmlStoreError::Truncated {
                            path: path.to_path_buf(),
                        },
                    });
                }
                _ => {}
            }
        }

        match root {
            Some(root) => Ok(Self { root, nodes }),
            None => Err(XmlStoreError::MissingRoot {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Serialize with an XML declaration, one child per line, two-space indent
    pub(crate) fn write_to<W: Write>(&self, out: W) -> Result<(), quick_xml::Error> {
        let mut writer = Writer::new_with_indent(out, b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let root = BytesStart::new(self.root.as_str());
        if self.nodes.is_empty() {
            writer.write_event(Event::Empty(root))?;
        } else {
            writer.write_event(Event::Start(root.borrow()))?;
            for node in &self.nodes {
                write_leaf(&mut writer, node)?;
            }
            writer.write_event(Event::End(root.to_end()))?;
        }

        writer.get_mut().write_all(b"\n")?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn to_xml_string(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

fn write_leaf<W: Write>(writer: &mut Writer<W>, node: &XmlNode) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new(node.name.as_str());
    if let Some(label) = &node.display_name {
        start.push_attribute((DISPLAY_NAME_ATTR, label.as_str()));
    }
    match node.text.as_deref() {
        Some(text) if !text.is_empty() => {
            writer.write_event(Event::Start(start.borrow()))?;
            writer.write_event(Event::Text(BytesText::new(text)))?;
            writer.write_event(Event::End(start.to_end()))?;
        }
        _ => writer.write_event(Event::Empty(start))?,
    }
    Ok(())
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn leaf_from(e: &BytesStart<'_>) -> Result<XmlNode, quick_xml::Error> {
    let mut node = XmlNode::empty(&element_name(e));
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == DISPLAY_NAME_ATTR.as_bytes() {
            node.display_name = Some(attr.unescape_value()?.into_owned());
        }
    }
    Ok(node)
}

/// Foreign files may repeat a name; the first occurrence wins
fn push_unique(nodes: &mut Vec<XmlNode>, node: XmlNode) {
    if !nodes.iter().any(|n| n.name == node.name) {
        nodes.push(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<XmlDocument, XmlStoreError> {
        XmlDocument::parse(content, Path::new("test.xml"))
    }

    #[test]
    fn test_parse_flat_document() {
        let doc = parse(
            r#"<?xml version='1.0' encoding='utf-8'?>
<data>
  <DateTimeRun displayName="Date/time ran">20250115_093012</DateTimeRun>
  <ToolName>Slope</ToolName>
  <Empty />
</data>"#,
        )
        .unwrap();
        assert_eq!(doc.root(), "data");
        assert_eq!(doc.nodes().len(), 3);
        assert_eq!(doc.text("DateTimeRun"), "20250115_093012");
        assert_eq!(
            doc.get("DateTimeRun").unwrap().display_name.as_deref(),
            Some("Date/time ran")
        );
        assert_eq!(doc.text("ToolName"), "Slope");
        assert_eq!(doc.text("Empty"), "");
        assert_eq!(doc.text("Missing"), "");
    }

    #[test]
    fn test_parse_unescapes_text_and_attributes() {
        let doc = parse(r#"<data><A displayName="a &amp; b">1 &lt; 2</A></data>"#).unwrap();
        let node = doc.get("A").unwrap();
        assert_eq!(node.text.as_deref(), Some("1 < 2"));
        assert_eq!(node.display_name.as_deref(), Some("a & b"));
    }

    #[test]
    fn test_parse_skips_nested_content() {
        let doc = parse("<data><A>x<B>inner</B>y</A><C>z</C></data>").unwrap();
        assert_eq!(doc.text("A"), "xy");
        assert_eq!(doc.text("C"), "z");
        assert!(doc.get("B").is_none());
    }

    #[test]
    fn test_parse_keeps_first_duplicate() {
        let doc = parse("<data><A>first</A><A>second</A></data>").unwrap();
        assert_eq!(doc.nodes().len(), 1);
        assert_eq!(doc.text("A"), "first");
    }

    #[test]
    fn test_parse_empty_root() {
        let doc = parse("<?xml version='1.0'?><data/>").unwrap();
        assert_eq!(doc.root(), "data");
        assert!(doc.nodes().is_empty());
    }

    #[test]
    fn test_parse_missing_root() {
        let err = parse("<?xml version='1.0'?>").unwrap_err();
        assert!(matches!(err, XmlStoreError::MissingRoot { .. }));
    }

    #[test]
    fn test_parse_truncated() {
        let err = parse("<data><A>1</A>").unwrap_err();
        assert!(matches!(
            err,
            XmlStoreError::Truncated { .. } | XmlStoreError::Parse { .. }
        ));
    }

    #[test]
    fn test_parse_mismatched_tags() {
        let err = parse("<data><A>1</B></data>").unwrap_err();
        assert!(matches!(err, XmlStoreError::Parse { .. }));
    }

    #[test]
    fn test_set_overwrites_and_keeps_label() {
        let mut doc = XmlDocument::new("data");
        doc.set("A", "1", Some("First"));
        doc.set("A", "2", None);
        assert_eq!(doc.nodes().len(), 1);
        let node = doc.get("A").unwrap();
        assert_eq!(node.text.as_deref(), Some("2"));
        assert_eq!(node.display_name.as_deref(), Some("First"));
    }

    #[test]
    fn test_serialize_indented() {
        let mut doc = XmlDocument::new("data");
        doc.set("A", "1", Some("First"));
        doc.set("B", "", None);
        let xml = doc.to_xml_string();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<data>\n  <A displayName=\"First\">1</A>\n  <B/>\n</data>\n"
        );
    }

    #[test]
    fn test_serialize_then_parse_preserves_text() {
        let mut doc = XmlDocument::new("data");
        doc.set("Msg", "  spaced <&> \"quoted\" 'text'  ", Some("a \"label\""));
        let reparsed = parse(&doc.to_xml_string()).unwrap();
        assert_eq!(reparsed, doc);
    }
}
