use comfy_table::Color;
use serde::Serialize;

use crate::xml::XmlDocument;

use super::format::{create_styled_table, header_cell, styled_cell};

#[derive(Serialize)]
struct NodeJson<'a> {
    name: &'a str,
    #[serde(rename = "displayName", skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
    value: &'a str,
}

pub(crate) fn output_store_json(doc: &XmlDocument) -> serde_json::Result<String> {
    let nodes: Vec<NodeJson<'_>> = doc
        .nodes()
        .iter()
        .map(|n| NodeJson {
            name: &n.name,
            display_name: n.display_name.as_deref(),
            value: n.text.as_deref().unwrap_or_default(),
        })
        .collect();
    serde_json::to_string_pretty(&nodes)
}

pub(crate) fn print_store_table(doc: &XmlDocument, title: &str, use_color: bool) {
    println!("\n  {} <{}>\n", title, doc.root());

    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Node", use_color),
        header_cell("Display name", use_color),
        header_cell("Value", use_color),
    ]);

    let label_color = use_color.then_some(Color::DarkGrey);
    for node in doc.nodes() {
        table.add_row(vec![
            styled_cell(&node.name, None, true),
            styled_cell(node.display_name.as_deref().unwrap_or(""), label_color, false),
            styled_cell(node.text.as_deref().unwrap_or(""), None, false),
        ]);
    }

    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_json_lists_nodes_in_order() {
        let mut doc = XmlDocument::new("data");
        doc.set("ToolName", "Slope", Some("Tool name"));
        doc.set("DEM", "", None);

        let json: serde_json::Value =
            serde_json::from_str(&output_store_json(&doc).unwrap()).unwrap();
        let arr = json.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["name"], "ToolName");
        assert_eq!(arr[0]["displayName"], "Tool name");
        assert_eq!(arr[0]["value"], "Slope");
        assert!(arr[1].get("displayName").is_none());
        assert_eq!(arr[1]["value"], "");
    }
}
