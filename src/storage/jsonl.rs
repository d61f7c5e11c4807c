//! JSONL (JSON Lines) storage.
//!
//! JSONL is the source of truth for recorded games and penalties.
//! Each line is a valid JSON object representing one record.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::{StorageConfig, StorageError};
use crate::models::{MatchRecord, PenaltyRecord, RecordId};

/// Record collections kept on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Games,
    Penalties,
}

impl Collection {
    /// Get the filename for this collection.
    pub fn filename(&self) -> &'static str {
        match self {
            Collection::Games => "games.jsonl",
            Collection::Penalties => "penalties.jsonl",
        }
    }
}

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    /// Create a new JSONL writer for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Create a writer for a collection under the data directory.
    pub fn for_collection(config: &StorageConfig, collection: Collection) -> Self {
        Self::new(config.path_for(collection))
    }

    /// Ensure the parent directory exists.
    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a single record to the file.
    pub fn append(&self, record: &T) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        let json = serde_json::to_string(record)?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;

        debug!("Appended record to {:?}", self.path);
        Ok(())
    }

    /// Write records, replacing the entire file.
    ///
    /// Writes to a sibling temp file first and renames it into place.
    pub fn write_all(&self, records: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let tmp = self.path.with_extension("jsonl.tmp");
        let file = File::create(&tmp)?;
        let mut writer = BufWriter::new(file);
        let mut count = 0;

        for record in records {
            let json = serde_json::to_string(record)?;
            writeln!(writer, "{}", json)?;
            count += 1;
        }

        writer.flush()?;
        fs::rename(&tmp, &self.path)?;
        info!("Wrote {} records to {:?}", count, self.path);

        Ok(count)
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    /// Create a new JSONL reader for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Create a reader for a collection under the data directory.
    pub fn for_collection(config: &StorageConfig, collection: Collection) -> Self {
        Self::new(config.path_for(collection))
    }

    /// Check if the file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all records from the file. Malformed lines are skipped.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();
        let mut line_num = 0;

        for line in reader.lines() {
            line_num += 1;
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(
                        "Failed to parse line {} in {:?}: {}",
                        line_num, self.path, e
                    );
                }
            }
        }

        debug!("Read {} records from {:?}", records.len(), self.path);
        Ok(records)
    }

    /// Read records matching a predicate.
    pub fn read_where<F>(&self, predicate: F) -> Result<Vec<T>, StorageError>
    where
        F: Fn(&T) -> bool,
    {
        let all = self.read_all()?;
        Ok(all.into_iter().filter(predicate).collect())
    }
}

/// Rewrite `collection` without the record whose id is `id`.
/// Returns the removed record, or `None` if no record matched.
fn remove_by_id<T, F>(
    config: &StorageConfig,
    collection: Collection,
    id: &RecordId,
    id_of: F,
) -> Result<Option<T>, StorageError>
where
    T: Serialize + DeserializeOwned,
    F: Fn(&T) -> &RecordId,
{
    let mut records: Vec<T> = JsonlReader::for_collection(config, collection).read_all()?;
    let Some(pos) = records.iter().position(|r| id_of(r) == id) else {
        return Ok(None);
    };

    let removed = records.remove(pos);
    JsonlWriter::for_collection(config, collection).write_all(&records)?;
    Ok(Some(removed))
}

/// Read every recorded game.
pub fn read_games(config: &StorageConfig) -> Result<Vec<MatchRecord>, StorageError> {
    JsonlReader::for_collection(config, Collection::Games).read_all()
}

/// Read games accepted by `predicate`.
pub fn read_games_where<F>(config: &StorageConfig, predicate: F) -> Result<Vec<MatchRecord>, StorageError>
where
    F: Fn(&MatchRecord) -> bool,
{
    JsonlReader::for_collection(config, Collection::Games).read_where(predicate)
}

pub fn append_game(config: &StorageConfig, game: &MatchRecord) -> Result<(), StorageError> {
    JsonlWriter::for_collection(config, Collection::Games).append(game)
}

pub fn remove_game(config: &StorageConfig, id: &RecordId) -> Result<Option<MatchRecord>, StorageError> {
    remove_by_id(config, Collection::Games, id, |g: &MatchRecord| &g.id)
}

/// Remove every game, returning how many there were.
pub fn clear_games(config: &StorageConfig) -> Result<usize, StorageError> {
    let count = read_games(config)?.len();
    JsonlWriter::<MatchRecord>::for_collection(config, Collection::Games).write_all(&[])?;
    Ok(count)
}

/// Read every recorded penalty.
pub fn read_penalties(config: &StorageConfig) -> Result<Vec<PenaltyRecord>, StorageError> {
    JsonlReader::for_collection(config, Collection::Penalties).read_all()
}

/// Read penalties accepted by `predicate`.
pub fn read_penalties_where<F>(
    config: &StorageConfig,
    predicate: F,
) -> Result<Vec<PenaltyRecord>, StorageError>
where
    F: Fn(&PenaltyRecord) -> bool,
{
    JsonlReader::for_collection(config, Collection::Penalties).read_where(predicate)
}

pub fn append_penalty(config: &StorageConfig, penalty: &PenaltyRecord) -> Result<(), StorageError> {
    JsonlWriter::for_collection(config, Collection::Penalties).append(penalty)
}

pub fn remove_penalty(
    config: &StorageConfig,
    id: &RecordId,
) -> Result<Option<PenaltyRecord>, StorageError> {
    remove_by_id(config, Collection::Penalties, id, |p: &PenaltyRecord| &p.id)
}
