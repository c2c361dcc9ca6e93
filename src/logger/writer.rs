//! Log writer module
//!
//! Selects where formatted log lines go: stdout, or a file opened for
//! appending and shared behind a mutex.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Log output target
pub enum LogTarget {
    Stdout,
    File(Mutex<File>),
}

impl LogTarget {
    /// Open the target for an optional file path
    pub fn open(path: Option<&str>) -> io::Result<Self> {
        Ok(match path {
            Some(path) => Self::File(Mutex::new(open_log_file(path)?)),
            None => Self::Stdout,
        })
    }

    /// ANSI colors only make sense on a terminal
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    pub fn into_make_writer(self) -> BoxMakeWriter {
        match self {
            Self::Stdout => BoxMakeWriter::new(io::stdout),
            Self::File(file) => BoxMakeWriter::new(file),
        }
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdout_by_default() {
        let target = LogTarget::open(None).unwrap();
        assert!(!target.is_file());
    }

    #[test]
    fn test_file_with_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/nested/server.log");
        let target = LogTarget::open(path.to_str()).unwrap();
        assert!(target.is_file());
        assert!(path.exists());
    }

    #[test]
    fn test_file_is_appended() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.log");
        std::fs::write(&path, "first\n").unwrap();

        if let LogTarget::File(file) = LogTarget::open(path.to_str()).unwrap() {
            writeln!(file.lock().unwrap(), "second").unwrap();
        } else {
            panic!("expected a file target");
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
