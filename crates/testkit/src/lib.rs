#![warn(missing_docs)]
//! Deterministic testing surfaces: callback recording, fixed-step frame
//! driving and a JSONL event log.

mod driver;
mod recorder;

use anyhow::{Context, Result};
use reticulum_core::GazeEventRecord;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub use driver::FrameDriver;
pub use recorder::{EventRecorder, RecordedCall};

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: BufWriter<File>,
    written: usize,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create event log {}", path.display()))?;
        tracing::debug!(path = %path.display(), "event log opened");
        Ok(Self {
            file: BufWriter::new(file),
            written: 0,
        })
    }

    /// Append an event to the log.
    pub fn write(&mut self, event: &GazeEventRecord) -> Result<()> {
        let line = serde_json::to_string(event)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Number of events written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush buffered lines to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }
}

/// Read a JSONL event log back into records.
pub fn read_jsonl<P: AsRef<Path>>(path: P) -> Result<Vec<GazeEventRecord>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read event log {}", path.display()))?;
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(n, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("Malformed event on line {} of {}", n + 1, path.display()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reticulum_core::{GazeEventKind, TargetId};
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn jsonl_sink_writes_one_line_per_event() {
        let path = std::env::temp_dir().join(format!(
            "gaze-events-{}/log.jsonl",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let mut sink = JsonlSink::create(&path).expect("sink create");
        sink.write(&GazeEventRecord {
            time: 0.5,
            target: TargetId(7),
            kind: GazeEventKind::Over,
        })
        .expect("write succeeds");
        sink.write(&GazeEventRecord {
            time: 2.5,
            target: TargetId(7),
            kind: GazeEventKind::Long,
        })
        .expect("write succeeds");
        assert_eq!(sink.written(), 2);
        sink.flush().expect("flush");

        let contents = fs::read_to_string(&path).expect("file readable");
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains("\"kind\":\"long\""));

        let records = read_jsonl(&path).expect("log parses");
        assert_eq!(records[1].kind, GazeEventKind::Long);
        assert_eq!(records[0].target, TargetId(7));
    }
}
