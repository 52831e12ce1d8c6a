//! Durable candidate collection.
//!
//! Loaded once at startup, rewritten in full after every mutation. Writes go to
//! a temp file in the same directory and are renamed over the target, so a
//! crash mid-write leaves the previous collection intact.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::models::candidate::Candidate;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored candidates could not be decoded: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Failed to replace store file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Candidate {0} not found")]
    NotFound(Uuid),

    #[error("Candidate {0} already exists")]
    Duplicate(Uuid),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    candidates: Vec<Candidate>,
}

#[derive(Debug)]
pub struct CandidateStore {
    path: PathBuf,
    candidates: Vec<Candidate>,
}

impl CandidateStore {
    /// Loads the collection at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let candidates = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<StoreFile>(&bytes)?.candidates,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(
            "Loaded {} candidates from {}",
            candidates.len(),
            path.display()
        );
        Ok(Self { path, candidates })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the whole collection atomically.
    pub fn save(&self) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let file = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = BufWriter::new(file.as_file());
            serde_json::to_writer_pretty(
                &mut writer,
                &StoreFileRef {
                    candidates: &self.candidates,
                },
            )?;
            writer.flush()?;
        }
        file.as_file().sync_all()?;
        file.persist(&self.path)?;
        Ok(())
    }

    /// Candidates in insertion order.
    pub fn list(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn get(&self, id: Uuid) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    pub fn insert(&mut self, candidate: Candidate) -> Result<(), StoreError> {
        if self.get(candidate.id).is_some() {
            return Err(StoreError::Duplicate(candidate.id));
        }
        self.candidates.push(candidate);
        if let Err(e) = self.save() {
            self.candidates.pop();
            return Err(e);
        }
        Ok(())
    }

    /// The single mutation entry point: clones the record, applies `f`, swaps
    /// the copy in and persists. On a failed write the previous record is restored.
    pub fn update<F>(&mut self, id: Uuid, f: F) -> Result<&Candidate, StoreError>
    where
        F: FnOnce(&mut Candidate),
    {
        let index = self
            .candidates
            .iter()
            .position(|c| c.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let mut updated = self.candidates[index].clone();
        f(&mut updated);
        let previous = std::mem::replace(&mut self.candidates[index], updated);

        if let Err(e) = self.save() {
            self.candidates[index] = previous;
            return Err(e);
        }
        Ok(&self.candidates[index])
    }

    /// Started-but-unanswered candidates that should be offered for resumption.
    pub fn unfinished(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter().filter(|c| c.is_unfinished())
    }
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    candidates: &'a [Candidate],
}
