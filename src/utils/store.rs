// Info channel store
// Keeps `info_channels.json` in memory and rewrites it in full on every change

use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::guild::ConfigDocument;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize config document: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// File-backed guild configuration
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    document: ConfigDocument,
}

impl ConfigStore {
    /// Load the document at `path`. A missing file yields the default document.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let document = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("{} not found, starting with an empty config", path.display());
                ConfigDocument::default()
            }
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    /// Write the whole document, replacing the file
    pub fn save(&self) -> Result<(), StoreError> {
        write_document(&self.path, &self.document)
    }

    /// Persist `next` and only then make it the in-memory document
    fn commit(&mut self, next: ConfigDocument) -> Result<(), StoreError> {
        write_document(&self.path, &next)?;
        self.document = next;
        Ok(())
    }

    /// Add `channel_id` to the guild's info channels and persist.
    /// Returns `false` (and writes nothing) when it was already registered.
    pub fn register_channel(&mut self, guild_id: &str, channel_id: &str) -> Result<bool, StoreError> {
        if self.info_channels(guild_id).iter().any(|c| c == channel_id) {
            return Ok(false);
        }

        let mut next = self.document.clone();
        next.servers
            .entry(guild_id.to_string())
            .or_default()
            .info_channels
            .push(channel_id.to_string());
        self.commit(next)?;
        Ok(true)
    }

    /// Remove `channel_id` from the guild's info channels and persist.
    /// Returns `false` when it was not registered.
    pub fn unregister_channel(&mut self, guild_id: &str, channel_id: &str) -> Result<bool, StoreError> {
        if !self.info_channels(guild_id).iter().any(|c| c == channel_id) {
            return Ok(false);
        }

        let mut next = self.document.clone();
        if let Some(guild) = next.servers.get_mut(guild_id) {
            guild.info_channels.retain(|c| c != channel_id);
        }
        self.commit(next)?;
        Ok(true)
    }

    /// Store a per-guild cooldown override and persist
    pub fn set_cooldown(&mut self, guild_id: &str, seconds: u64) -> Result<(), StoreError> {
        let mut next = self.document.clone();
        next.servers
            .entry(guild_id.to_string())
            .or_default()
            .config
            .cooldown = Some(seconds);
        self.commit(next)
    }

    /// Registered channels for a guild, empty when the guild is unknown
    pub fn info_channels(&self, guild_id: &str) -> &[String] {
        self.document
            .servers
            .get(guild_id)
            .map(|guild| guild.info_channels.as_slice())
            .unwrap_or(&[])
    }

    pub fn effective_cooldown(&self, guild_id: &str) -> u64 {
        self.document.effective_cooldown(guild_id)
    }
}

/// Serialize into a temp file next to `path`, then rename it over `path`.
/// The file is always a complete document, never a truncated one.
fn write_document(path: &Path, document: &ConfigDocument) -> Result<(), StoreError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document.serialize(&mut ser)?;

    let write_err = |source: io::Error| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(&buf).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    debug!("Saved config to {}", path.display());
    Ok(())
}
