use std::path::Path;

use glob::Pattern;

use super::model::FileDescriptor;
use crate::error::{BenchError, Result};

/// List files in `dir` whose name matches `pattern` (e.g. `*.csv`).
///
/// Files come back in directory enumeration order, which is not sorted and
/// can differ between filesystems. Sub-directories are ignored.
pub fn scan(dir: &Path, pattern: &str) -> Result<Vec<FileDescriptor>> {
    let matcher = Pattern::new(pattern)?;
    let entries = std::fs::read_dir(dir).map_err(BenchError::io(dir))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(BenchError::io(dir))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name();
        if !matcher.matches(&name.to_string_lossy()) {
            continue;
        }
        files.push(FileDescriptor::from_path(&path)?);
    }

    log::debug!(
        "Found {} file(s) matching {pattern} in {}",
        files.len(),
        dir.display()
    );
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_matching_files_are_listed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("A.csv"), "date,volume\n").unwrap();
        std::fs::write(dir.path().join("B.csv"), "date,volume\n1,2\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();
        std::fs::create_dir(dir.path().join("nested.csv")).unwrap();

        let mut labels: Vec<String> = scan(dir.path(), "*.csv")
            .unwrap()
            .into_iter()
            .map(|f| f.label)
            .collect();
        labels.sort();
        assert_eq!(labels, vec!["A", "B"]);
    }

    #[test]
    fn listing_order_follows_read_dir() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["Z.csv", "M.csv", "A.csv"] {
            std::fs::write(dir.path().join(name), "x\n").unwrap();
        }
        let expected: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .map(|p| super::super::model::derive_label(&p))
            .collect();

        let labels: Vec<String> = scan(dir.path(), "*.csv")
            .unwrap()
            .into_iter()
            .map(|f| f.label)
            .collect();
        assert_eq!(labels, expected);
    }

    #[test]
    fn no_match_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.parquet"), "").unwrap();
        assert!(scan(dir.path(), "*.csv").unwrap().is_empty());
    }

    #[test]
    fn unreadable_directory_is_io_error() {
        let err = scan(Path::new("/no/such/archive"), "*.csv").unwrap_err();
        assert!(matches!(err, BenchError::Io { .. }));
    }

    #[test]
    fn bad_pattern_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            scan(dir.path(), "[unclosed"),
            Err(BenchError::Pattern(_))
        ));
    }
}
