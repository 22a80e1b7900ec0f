//! File I/O utilities with atomic writes
//!
//! Record files are newline-terminated lines. Full rewrites go through a
//! temp file in the same directory followed by a rename; the journal is the
//! only file that is appended to.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::BankError;

/// Read all non-empty lines of a file; a missing file reads as empty
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>, BankError> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)
        .map_err(|e| BankError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

    let mut lines = Vec::new();
    for (line_num, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| {
            BankError::Io(format!(
                "Failed to read {} line {}: {}",
                path.display(),
                line_num + 1,
                e
            ))
        })?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }

    Ok(lines)
}

/// Replace a file's contents atomically (write to temp, then rename)
pub fn write_lines_atomic<P, S>(path: P, lines: &[S]) -> Result<(), BankError>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            BankError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("txt.tmp");

    let file = File::create(&temp_path).map_err(|e| {
        BankError::Storage(format!(
            "Failed to open {} for writing: {}",
            temp_path.display(),
            e
        ))
    })?;

    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{}", line.as_ref())
            .map_err(|e| BankError::Storage(format!("Failed to write data: {}", e)))?;
    }

    writer
        .flush()
        .map_err(|e| BankError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| BankError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        BankError::Storage(format!("Failed to replace {}: {}", path.display(), e))
    })?;

    Ok(())
}

/// Append lines to a file, creating it if needed
pub fn append_lines<P, S>(path: P, lines: &[S]) -> Result<(), BankError>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            BankError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            BankError::Storage(format!(
                "Failed to open {} for appending: {}",
                path.display(),
                e
            ))
        })?;

    // One write call so a leg pair lands together
    let mut buffer = String::new();
    for line in lines {
        buffer.push_str(line.as_ref());
        buffer.push('\n');
    }

    file.write_all(buffer.as_bytes())
        .map_err(|e| BankError::Storage(format!("Failed to append to {}: {}", path.display(), e)))?;

    file.flush()
        .map_err(|e| BankError::Storage(format!("Failed to flush {}: {}", path.display(), e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_nonexistent_returns_empty() {
        let temp_dir = TempDir::new().unwrap();
        let lines = read_lines(temp_dir.path().join("missing.txt")).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("customers.txt");

        write_lines_atomic(&path, &["1000:Alice:555", "1001:Bob:556"]).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "1000:Alice:555\n1001:Bob:556\n");
        assert_eq!(read_lines(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("accounts.txt");

        write_lines_atomic(&path, &["10000:1000:0.00:0"]).unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("accounts.txt.tmp").exists());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("auth.txt");

        write_lines_atomic(&path, &["ACCOUNT:10000:pw"]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_write_empty_truncates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("accounts.txt");

        write_lines_atomic(&path, &["10000:1000:0.00:0"]).unwrap();
        write_lines_atomic::<_, String>(&path, &[]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_append_and_skip_blank_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.txt");

        append_lines(&path, &["a"]).unwrap();
        fs::write(&path, "a\n\n").unwrap();
        append_lines(&path, &["b", "c"]).unwrap();

        assert_eq!(read_lines(&path).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_write_into_missing_location_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();

        let err = write_lines_atomic(blocker.join("x.txt"), &["x"]).unwrap_err();
        assert!(matches!(err, BankError::Storage(_)));
    }
}
