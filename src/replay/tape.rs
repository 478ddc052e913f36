use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ReplayError;
use crate::preview::PreviewEvent;

/// One recorded event and its offset from the start of the recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapeEntry {
    #[serde(default)]
    pub at_ms: u64,
    pub event: PreviewEvent,
}

impl TapeEntry {
    pub fn offset(&self) -> Duration {
        Duration::from_millis(self.at_ms)
    }
}

/// An ordered JSONL recording of preview events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventTape {
    pub entries: Vec<TapeEntry>,
}

impl EventTape {
    pub fn read_jsonl_from_path(path: &Path) -> Result<Self, ReplayError> {
        let file = File::open(path)?;
        Self::read_jsonl(BufReader::new(file))
    }

    /// Parse one entry per line. Blank lines are skipped; offsets must not
    /// decrease.
    pub fn read_jsonl(reader: impl BufRead) -> Result<Self, ReplayError> {
        let mut entries: Vec<TapeEntry> = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: TapeEntry = serde_json::from_str(&line).map_err(|source| {
                ReplayError::Parse {
                    line: idx + 1,
                    source,
                }
            })?;
            if entries.last().is_some_and(|last| last.at_ms > entry.at_ms) {
                return Err(ReplayError::OutOfOrder { line: idx + 1 });
            }
            entries.push(entry);
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
