use std::{
    io,
    path::{Path, PathBuf},
};

use crate::labels::{GO_EXTENSION, OUTPUT_SUFFIX};

/// Name of the generated file for a given input file name.
///
/// `input.go` becomes `input_builder.go`.
pub fn output_file_name(input: &str) -> String {
    let suffix = format!(".{GO_EXTENSION}");
    let stem = input.strip_suffix(&suffix).unwrap_or(input);
    format!("{stem}{OUTPUT_SUFFIX}{suffix}")
}

/// Path of the generated file, next to the input file.
pub fn output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    dir.join(output_file_name(&name))
}

/// A generated file ready to be written.
#[derive(Debug, Clone)]
pub struct OutputFile {
    path: PathBuf,
    content: Vec<u8>,
}

impl OutputFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Write the file, replacing any previous version.
    pub fn write(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, &self.content)
    }
}
