use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use serde::de::DeserializeOwned;

use super::domain::{Proposal, Tag, User};

/// Supplies fully loaded record collections to the export job.
pub trait RecordSource {
    fn load_users(&self) -> Result<Vec<User>, SourceError>;
    /// Loads at most `limit` proposals.
    fn load_proposals(&self, limit: usize) -> Result<Vec<Proposal>, SourceError>;
    fn load_tags(&self) -> Result<Vec<Tag>, SourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid records in {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("record source unavailable: {0}")]
    Unavailable(String),
}

/// Reads `users.json`, `proposals.json` and `tags.json` (JSON arrays) from a directory.
#[derive(Debug, Clone)]
pub struct JsonSnapshotSource {
    dir: PathBuf,
}

impl JsonSnapshotSource {
    pub const USERS_FILE: &'static str = "users.json";
    pub const PROPOSALS_FILE: &'static str = "proposals.json";
    pub const TAGS_FILE: &'static str = "tags.json";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read<T: DeserializeOwned>(&self, file_name: &str) -> Result<Vec<T>, SourceError> {
        let path = self.dir.join(file_name);
        let file = File::open(&path).map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;

        serde_json::from_reader(BufReader::new(file))
            .map_err(|source| SourceError::Decode { path, source })
    }
}

impl RecordSource for JsonSnapshotSource {
    fn load_users(&self) -> Result<Vec<User>, SourceError> {
        self.read(Self::USERS_FILE)
    }

    fn load_proposals(&self, limit: usize) -> Result<Vec<Proposal>, SourceError> {
        let mut proposals: Vec<Proposal> = self.read(Self::PROPOSALS_FILE)?;
        proposals.truncate(limit);
        Ok(proposals)
    }

    fn load_tags(&self) -> Result<Vec<Tag>, SourceError> {
        self.read(Self::TAGS_FILE)
    }
}

/// Collections already held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    pub users: Vec<User>,
    pub proposals: Vec<Proposal>,
    pub tags: Vec<Tag>,
}

impl RecordSource for InMemorySource {
    fn load_users(&self) -> Result<Vec<User>, SourceError> {
        Ok(self.users.clone())
    }

    fn load_proposals(&self, limit: usize) -> Result<Vec<Proposal>, SourceError> {
        Ok(self.proposals.iter().take(limit).cloned().collect())
    }

    fn load_tags(&self) -> Result<Vec<Tag>, SourceError> {
        Ok(self.tags.clone())
    }
}
