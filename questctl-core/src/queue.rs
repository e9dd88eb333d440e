//! Quest scheduling queue: an ordered list of (user, quest) pairs kept in
//! an external file, one JSON object per line. The file is read fully,
//! mutated in memory, and rewritten wholesale; no locking (single
//! operator, low-frequency scheduling).

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{QuestError, Result};

/// One scheduled quest start. Round-tripped verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub user: String,
    pub quest: String,
}

#[derive(Debug)]
pub struct QuestQueue {
    path: PathBuf,
    entries: Vec<QueueEntry>,
}

impl QuestQueue {
    /// Load the queue; a missing file is an empty queue.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Ok(Self {
                path,
                entries: Vec::new(),
            });
        }

        let content = fs::read_to_string(&path)?;
        let mut entries = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let entry: QueueEntry = serde_json::from_str(line)
                .map_err(|e| QuestError::queue(&path, format!("bad entry {:?}: {}", line, e)))?;
            entries.push(entry);
        }

        Ok(Self { path, entries })
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry to the tail (operator action).
    pub fn push(&mut self, entry: QueueEntry) {
        self.entries.push(entry);
    }

    /// Consume the head of the queue, if any.
    pub fn pop_front(&mut self) -> Option<QueueEntry> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.remove(0))
        }
    }

    /// Rewrite the whole file from memory.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(&self.path)?;
        for entry in &self.entries {
            let line = serde_json::to_string(entry)
                .map_err(|e| QuestError::json("queue entry", e))?;
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(user: &str, quest: &str) -> QueueEntry {
        QueueEntry {
            user: user.to_string(),
            quest: quest.to_string(),
        }
    }

    #[test]
    fn test_missing_file_is_empty_queue() {
        let dir = tempdir().unwrap();
        let queue = QuestQueue::load(dir.path().join("quest-queue.jsonl")).unwrap();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quest-queue.jsonl");

        let mut queue = QuestQueue::load(&path).unwrap();
        queue.push(entry("Alice", "Dragon Hunt"));
        queue.push(entry("Bob", "Rat Patrol"));
        queue.save().unwrap();

        let mut reloaded = QuestQueue::load(&path).unwrap();
        assert_eq!(reloaded.entries().len(), 2);
        assert_eq!(reloaded.pop_front(), Some(entry("Alice", "Dragon Hunt")));
        reloaded.save().unwrap();

        let after_pop = QuestQueue::load(&path).unwrap();
        assert_eq!(after_pop.entries(), &[entry("Bob", "Rat Patrol")]);
    }

    #[test]
    fn test_malformed_line_is_a_queue_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quest-queue.jsonl");
        std::fs::write(&path, "{\"user\":\"Alice\",\"quest\":\"x\"}\nnot json\n").unwrap();
        let err = QuestQueue::load(&path).unwrap_err();
        assert!(matches!(err, QuestError::Queue { .. }));
    }
}
