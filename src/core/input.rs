use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where a raw input came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Origin {
    /// A file on disk; the input text is its file name
    File { path: PathBuf },

    /// One record of a multi-sequence file; the input text is its header
    Record {
        source: PathBuf,
        /// Zero-based position of the record in `source`
        index: usize,
        /// Sequence length in bases
        length: u64,
    },
}

/// A single string to be classified, plus a handle to its origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInput {
    /// File name or full record header (id and description)
    pub text: String,

    pub origin: Origin,
}

impl RawInput {
    /// Build an input for a file, using its file name as the text.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let text = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            text,
            origin: Origin::File { path },
        }
    }

    /// Build an input for a sequence record.
    pub fn from_record(
        header: impl Into<String>,
        source: impl Into<PathBuf>,
        index: usize,
        length: u64,
    ) -> Self {
        Self {
            text: header.into(),
            origin: Origin::Record {
                source: source.into(),
                index,
                length,
            },
        }
    }

    /// Filesystem path, for file inputs
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match &self.origin {
            Origin::File { path } => Some(path),
            Origin::Record { .. } => None,
        }
    }

    /// Sequence length, for record inputs
    #[must_use]
    pub fn length(&self) -> Option<u64> {
        match &self.origin {
            Origin::File { .. } => None,
            Origin::Record { length, .. } => Some(*length),
        }
    }

    /// Position within the source file, for record inputs
    #[must_use]
    pub fn record_index(&self) -> Option<usize> {
        match &self.origin {
            Origin::File { .. } => None,
            Origin::Record { index, .. } => Some(*index),
        }
    }

    /// Short label for messages: the path for files, the record id for records.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.origin {
            Origin::File { path } => path.display().to_string(),
            Origin::Record { .. } => self
                .text
                .split_whitespace()
                .next()
                .unwrap_or(&self.text)
                .to_string(),
        }
    }
}

impl std::fmt::Display for RawInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
