//! Directory scanning for sequence files, and the filesystem [`FileSizeProbe`].

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::core::input::RawInput;
use crate::parsing::fasta::is_fasta_file;
use crate::utils::validation::{FileSizeProbe, FileStatus};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {0}")]
    NotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Check if the path has a FASTQ extension (`.fastq`, `.fq`, optionally gzipped)
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub fn is_fastq_file(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    [".fastq", ".fq", ".fastq.gz", ".fq.gz"]
        .iter()
        .any(|ext| name.ends_with(ext))
}

/// FASTQ or FASTA
pub fn is_sequence_file(path: &Path) -> bool {
    is_fastq_file(path) || is_fasta_file(path)
}

/// List files in `dir` accepted by `keep`, sorted by path.
///
/// Hidden entries (names starting with `.`) are skipped.
///
/// # Errors
///
/// Returns `ScanError::NotFound` or `ScanError::NotADirectory` when `dir` is not
/// a readable directory, and `ScanError::Io` if an entry cannot be read.
pub fn list_files(
    dir: &Path,
    recursive: bool,
    keep: impl Fn(&Path) -> bool,
) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.exists() {
        return Err(ScanError::NotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    walk(dir, recursive, &keep, &mut files)?;
    files.sort();
    debug!("Found {} files under {}", files.len(), dir.display());
    Ok(files)
}

fn walk(
    dir: &Path,
    recursive: bool,
    keep: &impl Fn(&Path) -> bool,
    files: &mut Vec<PathBuf>,
) -> Result<(), ScanError> {
    let io_err = |source| ScanError::Io {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let hidden = path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().starts_with('.'));
        if hidden {
            continue;
        }

        if path.is_dir() {
            if recursive {
                walk(&path, recursive, keep, files)?;
            }
        } else if keep(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// List FASTQ files in `dir` as raw inputs, sorted by path.
///
/// # Errors
///
/// See [`list_files`].
pub fn list_fastq_inputs(dir: &Path, recursive: bool) -> Result<Vec<RawInput>, ScanError> {
    Ok(list_files(dir, recursive, is_fastq_file)?
        .into_iter()
        .map(RawInput::from_path)
        .collect())
}

/// Reads file sizes from the filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl FileSizeProbe for FsProbe {
    fn probe(&self, path: &Path) -> FileStatus {
        match fs::metadata(path) {
            Ok(meta) if meta.is_file() => FileStatus::present(meta.len()),
            _ => FileStatus::missing(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_is_fastq_file() {
        assert!(is_fastq_file(Path::new("A_R1.fastq.gz")));
        assert!(is_fastq_file(Path::new("A_1.FQ")));
        assert!(!is_fastq_file(Path::new("A.fasta")));
        assert!(!is_fastq_file(Path::new("A.fastq.bak")));
        assert!(is_sequence_file(Path::new("A.fasta")));
    }

    #[test]
    fn test_list_fastq_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "B_R1.fastq.gz", b"x");
        touch(dir.path(), "A_R2.fq", b"x");
        touch(dir.path(), "notes.txt", b"x");
        touch(dir.path(), ".hidden_R1.fq", b"x");
        touch(dir.path(), "sub/C_R1.fq", b"x");

        let inputs = list_fastq_inputs(dir.path(), false).unwrap();
        let names: Vec<&str> = inputs.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(names, vec!["A_R2.fq", "B_R1.fastq.gz"]);

        let inputs = list_fastq_inputs(dir.path(), true).unwrap();
        assert_eq!(inputs.len(), 3);
    }

    #[test]
    fn test_missing_and_non_directory_targets() {
        let dir = TempDir::new().unwrap();
        let file = touch(dir.path(), "A_R1.fq", b"x");

        assert!(matches!(
            list_fastq_inputs(&dir.path().join("absent"), false),
            Err(ScanError::NotFound(_))
        ));
        assert!(matches!(
            list_fastq_inputs(&file, false),
            Err(ScanError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_fs_probe() {
        let dir = TempDir::new().unwrap();
        let full = touch(dir.path(), "full.fq", b"ACGT");
        let empty = touch(dir.path(), "empty.fq", b"");

        assert_eq!(FsProbe.probe(&full), FileStatus::present(4));
        assert_eq!(FsProbe.probe(&empty), FileStatus::present(0));
        assert_eq!(FsProbe.probe(&dir.path().join("gone.fq")), FileStatus::missing());
    }
}
