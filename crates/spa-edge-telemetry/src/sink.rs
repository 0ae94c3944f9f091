//! Log sinks.
//!
//! A sink receives one serialized log line per accepted telemetry event.
//! Sinks must be safe to call from many concurrent requests; each
//! implementation serializes its writers and appends whole lines only.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use parking_lot::Mutex;
use tracing::info;

/// An append-only destination for telemetry log lines.
pub trait TelemetrySink: Send + Sync {
    /// Append one line (without trailing newline) to the sink.
    fn append(&self, line: &str) -> io::Result<()>;
}

/// Flat append-only file sink.
pub struct FlatFileSink {
    file: Mutex<File>,
}

impl FlatFileSink {
    /// Open (or create) the log file in append mode.
    ///
    /// Parent directories are created if missing.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().append(true).create(true).open(path)?;

        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl TelemetrySink for FlatFileSink {
    fn append(&self, line: &str) -> io::Result<()> {
        // One write_all of the full line under the lock keeps concurrent
        // appends line-atomic.
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        let mut file = self.file.lock();
        file.write_all(buf.as_bytes())?;
        file.flush()
    }
}

/// Sink that echoes each line through the `tracing` pipeline.
///
/// Mirrors the file sinks onto the process's console output, so an operator
/// tailing stdout sees the same envelopes that land in the files.
#[derive(Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Create the sink.
    pub fn new() -> Self {
        Self
    }
}

impl TelemetrySink for TracingSink {
    fn append(&self, line: &str) -> io::Result<()> {
        info!(target: "telemetry", entry = %line);
        Ok(())
    }
}

/// In-memory sink for tests.
///
/// Collects appended lines in a vector so assertions can inspect exactly
/// what would have been written.
#[derive(Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all appended lines.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Number of appended lines.
    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    /// Returns `true` if nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl TelemetrySink for MemorySink {
    fn append(&self, line: &str) -> io::Result<()> {
        self.lines.lock().push(line.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_file_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("telemetry.log");

        let sink = FlatFileSink::open(&path).unwrap();
        sink.append(r#"{"a":1}"#).unwrap();
        sink.append(r#"{"b":2}"#).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\"a\":1}\n{\"b\":2}\n");
    }

    #[test]
    fn test_flat_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/telemetry.log");

        let sink = FlatFileSink::open(&path).unwrap();
        sink.append("x").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_flat_file_reopens_without_truncating() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("telemetry.log");

        FlatFileSink::open(&path).unwrap().append("first").unwrap();
        FlatFileSink::open(&path).unwrap().append("second").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_concurrent_appends_stay_line_atomic() {
        use std::sync::Arc;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("telemetry.log");
        let sink = Arc::new(FlatFileSink::open(&path).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let sink = Arc::clone(&sink);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        sink.append(&format!("thread-{t}-line-{i}")).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 200);
        for line in lines {
            // Every line is exactly one whole append, never a fragment.
            assert!(line.starts_with("thread-"), "corrupt line: {line}");
        }
    }

    #[test]
    fn test_tracing_sink_never_fails() {
        let sink = TracingSink::new();
        sink.append(r#"{"level":"info","telemetry":{}}"#).unwrap();
    }

    #[test]
    fn test_memory_sink_collects() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.append("one").unwrap();
        sink.append("two").unwrap();

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.lines(), vec!["one", "two"]);
    }
}
