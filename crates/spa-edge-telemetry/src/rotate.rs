//! Daily-rotating, date-partitioned sink.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::sink::TelemetrySink;

/// Partition filename prefix (`telemetry-2026-08-24.log`).
const FILE_PREFIX: &str = "telemetry-";
/// Partition filename suffix.
const FILE_SUFFIX: &str = ".log";
/// Date format inside partition filenames.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date-partitioned sink rotated daily.
///
/// Lines are appended to `telemetry-<UTC date>.log` under the configured
/// directory. When the date changes the sink switches to a new partition
/// file and prunes partitions older than the retention period.
pub struct DailyRotatingSink {
    dir: PathBuf,
    retention_days: u32,
    state: Mutex<Option<OpenPartition>>,
}

/// The currently open partition file.
struct OpenPartition {
    date: NaiveDate,
    file: File,
}

impl DailyRotatingSink {
    /// Create a sink writing partitions under `dir`.
    ///
    /// The directory is created if missing. Partitions older than
    /// `retention_days` are pruned at every rotation.
    pub fn open(dir: impl AsRef<Path>, retention_days: u32) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;

        Ok(Self {
            dir,
            retention_days,
            state: Mutex::new(None),
        })
    }

    /// Append `line` to the partition for `today`.
    ///
    /// Factored out of [`TelemetrySink::append`] so rotation can be driven
    /// explicitly in tests.
    fn append_on(&self, line: &str, today: NaiveDate) -> io::Result<()> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        let mut state = self.state.lock();

        let rotate = match state.as_ref() {
            Some(open) => open.date != today,
            None => true,
        };
        if rotate {
            let file = OpenOptions::new()
                .append(true)
                .create(true)
                .open(self.partition_path(today))?;
            *state = Some(OpenPartition { date: today, file });

            debug!(date = %today, "Rotated telemetry partition");
            self.prune(today);
        }

        if let Some(open) = state.as_mut() {
            open.file.write_all(buf.as_bytes())?;
            open.file.flush()?;
        }
        Ok(())
    }

    /// Path of the partition file for `date`.
    fn partition_path(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{FILE_PREFIX}{}{FILE_SUFFIX}", date.format(DATE_FORMAT)))
    }

    /// Remove partition files older than the retention period.
    ///
    /// Unparseable filenames in the directory are left alone.
    fn prune(&self, today: NaiveDate) {
        let Some(cutoff) = today.checked_sub_days(chrono::Days::new(self.retention_days.into()))
        else {
            return;
        };

        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %self.dir.display(), error = %e, "Failed to scan partition directory");
                return;
            }
        };

        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(date) = partition_date(&name.to_string_lossy()) else {
                continue;
            };
            if date < cutoff {
                if let Err(e) = std::fs::remove_file(entry.path()) {
                    warn!(file = %entry.path().display(), error = %e, "Failed to prune partition");
                } else {
                    debug!(file = %entry.path().display(), "Pruned expired telemetry partition");
                }
            }
        }
    }
}

impl TelemetrySink for DailyRotatingSink {
    fn append(&self, line: &str) -> io::Result<()> {
        self.append_on(line, Utc::now().date_naive())
    }
}

/// Parse the date out of a partition filename, if it is one.
fn partition_date(name: &str) -> Option<NaiveDate> {
    let stem = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
    NaiveDate::parse_from_str(stem, DATE_FORMAT).ok()
}
