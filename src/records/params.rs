use std::path::Path;

use chrono::Local;

use crate::error::XmlStoreError;
use crate::utils::run_stamp;
use crate::xml::{NodeValue, write_values};

use super::ProgressFiles;

/// One tool invocation parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ToolParam {
    pub(crate) name: String,
    pub(crate) display_name: String,
    /// `None` when the parameter was left empty
    pub(crate) value_as_text: Option<String>,
}

impl ToolParam {
    pub(crate) fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        value_as_text: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            value_as_text,
        }
    }
}

pub(crate) fn params_as_text(params: &[ToolParam]) -> Vec<Option<String>> {
    params.iter().map(|p| p.value_as_text.clone()).collect()
}

/// Record the run time, tool name and every parameter in `inputs.xml`
pub(crate) fn write_params(
    params: &[ToolParam],
    folder: &Path,
    tool_name: Option<&str>,
) -> Result<(), XmlStoreError> {
    let mut values = vec![NodeValue::labelled(
        "DateTimeRun",
        run_stamp(Local::now()),
        "Date/time ran",
    )];

    if let Some(tool_name) = tool_name {
        values.push(NodeValue::labelled("ToolName", tool_name, "Tool name"));
    }

    for param in params {
        values.push(NodeValue::labelled(
            param.name.as_str(),
            param.value_as_text.clone().unwrap_or_default(),
            param.display_name.as_str(),
        ));
    }

    write_values(&ProgressFiles::in_folder(folder).inputs_file, &values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::load;

    fn params() -> Vec<ToolParam> {
        vec![
            ToolParam::new("DEM", "Elevation model", Some("/data/dem.tif".to_string())),
            ToolParam::new("Buffer", "Buffer distance", None),
        ]
    }

    #[test]
    fn test_params_as_text() {
        assert_eq!(
            params_as_text(&params()),
            vec![Some("/data/dem.tif".to_string()), None]
        );
    }

    #[test]
    fn test_write_params() {
        let dir = tempfile::tempdir().unwrap();
        write_params(&params(), dir.path(), Some("Slope")).unwrap();

        let doc = load(&dir.path().join("inputs.xml")).unwrap();
        let names: Vec<&str> = doc.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["DateTimeRun", "ToolName", "DEM", "Buffer"]);
        assert_eq!(doc.text("DateTimeRun").len(), "20250115_093012".len());
        assert_eq!(doc.text("ToolName"), "Slope");
        assert_eq!(doc.text("DEM"), "/data/dem.tif");
        assert_eq!(doc.text("Buffer"), "");
        assert_eq!(
            doc.get("DEM").unwrap().display_name.as_deref(),
            Some("Elevation model")
        );
    }

    #[test]
    fn test_write_params_rerun_updates_in_place() {
        let dir = tempfile::tempdir().unwrap();
        write_params(&params(), dir.path(), None).unwrap();
        let changed = vec![ToolParam::new(
            "DEM",
            "Elevation model",
            Some("/data/dem2.tif".to_string()),
        )];
        write_params(&changed, dir.path(), None).unwrap();

        let doc = load(&dir.path().join("inputs.xml")).unwrap();
        assert_eq!(doc.nodes().len(), 3);
        assert_eq!(doc.text("DEM"), "/data/dem2.tif");
        assert!(doc.get("ToolName").is_none());
    }
}
