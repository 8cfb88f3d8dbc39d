//! XML key/value store
//!
//! Reads and writes named leaf values under the root of a flat XML file.
//! Failures are logged and returned; nothing is swallowed at this layer.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::consts::XML_ROOT;
use crate::error::XmlStoreError;
use crate::host::Diagnostics;

use super::document::XmlDocument;

/// One value to write: node name, text, optional display label
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NodeValue {
    pub(crate) name: String,
    pub(crate) value: String,
    pub(crate) display_name: Option<String>,
}

impl NodeValue {
    pub(crate) fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            display_name: None,
        }
    }

    pub(crate) fn labelled(
        name: impl Into<String>,
        value: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            display_name: Some(display_name.into()),
        }
    }
}

/// Open and parse an XML store
pub(crate) fn load(path: &Path) -> Result<XmlDocument, XmlStoreError> {
    let content = fs::read_to_string(path).map_err(|source| XmlStoreError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    XmlDocument::parse(&content, path)
}

/// Fetch the values of `names`, `""` for each missing node.
///
/// With a diagnostics sink, failures are also reported to the caller's
/// diagnostic channel before being returned.
pub(crate) fn read_values(
    path: &Path,
    names: &[&str],
    diagnostics: Option<&dyn Diagnostics>,
) -> Result<Vec<String>, XmlStoreError> {
    let doc = match load(path) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to read XML file");
            if let Some(diag) = diagnostics {
                if matches!(e, XmlStoreError::Open { .. }) {
                    diag.add_error(&format!(
                        "XML File \"{}\" does not exist or cannot be opened",
                        path.display()
                    ));
                }
                diag.add_error("Data not read from XML file");
            }
            return Err(e);
        }
    };

    Ok(names.iter().map(|name| doc.text(name).to_string()).collect())
}

/// Single-node form of [`read_values`]
pub(crate) fn read_value(
    path: &Path,
    name: &str,
    diagnostics: Option<&dyn Diagnostics>,
) -> Result<String, XmlStoreError> {
    let mut values = read_values(path, &[name], diagnostics)?;
    Ok(values.pop().unwrap_or_default())
}

/// Create or update nodes, creating the file with a `data` root if absent.
///
/// The whole tree is re-indented on save. Saves are not atomic: a crash
/// mid-write can leave a truncated file.
pub(crate) fn write_values(path: &Path, values: &[NodeValue]) -> Result<(), XmlStoreError> {
    let result = write_internal(path, values);
    if let Err(e) = &result {
        tracing::error!(path = %path.display(), error = %e, "data not written to XML file");
    }
    result
}

fn write_internal(path: &Path, values: &[NodeValue]) -> Result<(), XmlStoreError> {
    if let Some(bad) = values.iter().find(|v| !is_valid_node_name(&v.name)) {
        return Err(XmlStoreError::InvalidNodeName {
            name: bad.name.clone(),
        });
    }

    let mut doc = if path.exists() {
        load(path)?
    } else {
        XmlDocument::new(XML_ROOT)
    };

    for v in values {
        doc.set(&v.name, &v.value, v.display_name.as_deref());
    }

    save(path, &doc)
}

fn save(path: &Path, doc: &XmlDocument) -> Result<(), XmlStoreError> {
    let save_err = |source: std::io::Error| XmlStoreError::Save {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(save_err)?;
    let mut out = BufWriter::new(file);
    doc.write_to(&mut out)
        .map_err(|source| XmlStoreError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
    out.flush().map_err(save_err)
}

/// XML element names usable as store keys
pub(crate) fn is_valid_node_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
