//! Append-only log of seen transaction identifiers
//!
//! One identifier per line in discovery order. The line position (1-based,
//! blank lines ignored) is the identifier's sequence index and names its
//! output file, so a rerun finds earlier output under the same name.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub struct TransactionLog {
    path: PathBuf,
    file: File,
    entries: Vec<String>,
    seen: HashSet<String>,
}

impl TransactionLog {
    /// Open (creating if missing) the log at `path` and load its entries
    pub fn open(path: &Path) -> io::Result<Self> {
        let existing = if path.exists() {
            std::fs::read_to_string(path)?
        } else {
            String::new()
        };

        let mut entries = Vec::new();
        let mut seen = HashSet::new();
        for line in existing.lines() {
            let tx = line.trim();
            if !tx.is_empty() && seen.insert(tx.to_string()) {
                entries.push(tx.to_string());
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        // Unterminated last line from an interrupted or hand-edited log
        if !existing.is_empty() && !existing.ends_with('\n') {
            file.write_all(b"\n")?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            file,
            entries,
            seen,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, tx: &str) -> bool {
        self.seen.contains(tx)
    }

    /// Entries in discovery order; position + 1 is the sequence index
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append `tx` and flush; returns its sequence index, or `None` if it
    /// was already logged
    pub fn record(&mut self, tx: &str) -> io::Result<Option<usize>> {
        if self.seen.contains(tx) {
            return Ok(None);
        }

        writeln!(self.file, "{}", tx)?;
        self.file.flush()?;

        self.seen.insert(tx.to_string());
        self.entries.push(tx.to_string());
        Ok(Some(self.entries.len()))
    }
}
