use std::path::{Path, PathBuf};

/// The record files of a run, relative names until resolved against a folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProgressFiles {
    pub(crate) xml_file: PathBuf,
    pub(crate) inputs_file: PathBuf,
    pub(crate) warnings_file: PathBuf,
}

impl Default for ProgressFiles {
    fn default() -> Self {
        Self {
            xml_file: PathBuf::from("progress.xml"),
            inputs_file: PathBuf::from("inputs.xml"),
            warnings_file: PathBuf::from("warnings.xml"),
        }
    }
}

impl ProgressFiles {
    pub(crate) fn in_folder(folder: &Path) -> Self {
        Self::default().resolve(folder)
    }

    /// Join every file onto `folder`
    pub(crate) fn resolve(self, folder: &Path) -> Self {
        Self {
            xml_file: folder.join(self.xml_file),
            inputs_file: folder.join(self.inputs_file),
            warnings_file: folder.join(self.warnings_file),
        }
    }
}
