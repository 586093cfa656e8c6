//! Recode table discovery and reading utilities.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{RecodeError, RecodeResult};

/// Reads the full text of a recode table.
///
/// A missing file is reported as [`RecodeError::FileNotFound`]; any other
/// read failure as [`RecodeError::Io`].
pub fn read_table<P: AsRef<Path>>(path: P) -> RecodeResult<String> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(RecodeError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    Ok(fs::read_to_string(path)?)
}

/// Lists the recode tables (`*.txt` files) in a directory, sorted by name.
///
/// Useful when several table revisions are kept side by side, e.g.
/// `113 ICD-10 Recodes.txt` and `358 ICD-10 Recodes.txt`.
pub fn discover_tables<P: AsRef<Path>>(dir: P) -> RecodeResult<Vec<PathBuf>> {
    let dir = dir.as_ref();

    if !dir.is_dir() {
        return Err(RecodeError::DirectoryNotFound {
            path: dir.display().to_string(),
        });
    }

    let mut tables = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("txt")) {
            tables.push(path);
        }
    }

    tables.sort();
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_table_missing_file() {
        let err = read_table("/definitely/not/here/358 ICD-10 Recodes.txt").unwrap_err();
        assert!(matches!(err, RecodeError::FileNotFound { .. }));
        assert!(err.is_file_access());
    }

    #[test]
    fn test_read_table_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.txt");
        fs::write(&path, "Group:\n    A01 = 00100\n").unwrap();
        assert_eq!(read_table(&path).unwrap(), "Group:\n    A01 = 00100\n");
    }

    #[test]
    fn test_discover_tables_sorted_txt_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("358 ICD-10 Recodes.txt"), "").unwrap();
        fs::write(dir.path().join("113 ICD-10 Recodes.TXT"), "").unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();
        fs::create_dir(dir.path().join("archive.txt")).unwrap();

        let names: Vec<String> = discover_tables(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["113 ICD-10 Recodes.TXT", "358 ICD-10 Recodes.txt"]);
    }

    #[test]
    fn test_discover_tables_missing_dir() {
        let err = discover_tables("/definitely/not/here").unwrap_err();
        assert!(matches!(err, RecodeError::DirectoryNotFound { .. }));
    }
}
