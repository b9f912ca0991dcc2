//! File writer

use super::line::LineWriter;
use crate::core::{LoggerError, Result};
use std::fs::{File, OpenOptions};
use std::io::BufWriter;
use std::path::Path;

/// Line writer over a buffered append-mode file
pub type FileWriter = LineWriter<BufWriter<File>>;

/// Open `path` for logging: create if missing, read + write, append, mode
/// `0o755` on unix.
pub fn open_append(path: &Path) -> Result<File> {
    let mut options = OpenOptions::new();
    options.create(true).read(true).append(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o755);
    }

    options
        .open(path)
        .map_err(|e| LoggerError::file_open(path.display().to_string(), e))
}

impl LineWriter<BufWriter<File>> {
    pub fn file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = open_append(path)?;
        Ok(LineWriter::new(
            BufWriter::new(file),
            format!("file:{}", path.display()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Sink, TimestampFormat};
    use tempfile::TempDir;

    #[test]
    fn test_file_writer_appends() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("append.log");
        std::fs::write(&path, "existing\n").unwrap();

        let mut writer = FileWriter::file(&path)
            .unwrap()
            .with_timestamp(TimestampFormat::None);
        writer.write_line("appended").unwrap();
        writer.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "existing\nappended\n");
        assert!(writer.name().starts_with("file:"));
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("no/such/dir/app.log");

        let err = open_append(&path).unwrap_err();
        assert!(matches!(err, LoggerError::FileOpen { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("mode.log");
        open_append(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        // umask may clear bits but never adds any
        assert_eq!(mode & !0o755 & 0o777, 0);
    }
}
