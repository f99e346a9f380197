//! High score record
//!
//! A single integer in a text file. Read once at start-up; rewritten only when
//! a session beats it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct HighScore {
    path: PathBuf,
    best: u64,
}

impl HighScore {
    /// Read the stored score; a missing or unreadable file counts as 0
    pub fn load(path: &Path) -> Self {
        let best = fs::read_to_string(path)
            .ok()
            .and_then(|text| text.trim().parse::<u64>().ok())
            .unwrap_or(0);
        log::info!("High score {} ({})", best, path.display());

        Self {
            path: path.to_path_buf(),
            best,
        }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Check if a score beats the record
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Store `score` if it beats the record; returns whether it did
    pub fn submit(&mut self, score: u64) -> Result<bool> {
        if !self.qualifies(score) {
            return Ok(false);
        }
        fs::write(&self.path, score.to_string())
            .with_context(|| format!("Failed to write high score {}", self.path.display()))?;
        log::info!("New high score {}", score);
        self.best = score;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_or_garbage_file_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(HighScore::load(&dir.path().join("none.txt")).best(), 0);

        let garbage = dir.path().join("garbage.txt");
        fs::write(&garbage, "lots").unwrap();
        assert_eq!(HighScore::load(&garbage).best(), 0);
    }

    #[test]
    fn test_submit_only_overwrites_when_greater() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("HighScore.txt");
        fs::write(&path, "1500\n").unwrap();

        let mut record = HighScore::load(&path);
        assert_eq!(record.best(), 1500);
        assert!(!record.submit(1500).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "1500\n");

        assert!(record.submit(2600).unwrap());
        assert_eq!(HighScore::load(&path).best(), 2600);
    }

    #[test]
    fn test_submit_reports_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut record = HighScore::load(&dir.path().join("missing_dir").join("HighScore.txt"));
        assert!(record.submit(10).is_err());
    }
}
