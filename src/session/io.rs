//! I/O operations for sessions.
//!
//! A session file is an envelope holding the session payload and the SHA-256
//! of that payload's exact text. The payload is kept verbatim when reading,
//! so files written by other tools load as long as their checksum matches
//! the bytes they wrote.

use crate::session::data::{Session, SESSION_VERSION};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Envelope for session files to include integrity checks.
#[derive(Debug, Serialize, Deserialize)]
struct SessionEnvelope {
    /// SHA256 checksum of the `session` text exactly as stored.
    checksum: String,
    /// The session payload, unparsed.
    session: Box<RawValue>,
}

fn checksum(payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl Session {
    /// Saves the session to a file with an integrity checksum.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create session file: {}", path.display()))?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("Failed to write session to: {}", path.display()))?;
        log::debug!("Saved {} item(s) to {}", self.items.len(), path.display());
        Ok(())
    }

    /// Serializes the session to a JSON string with an integrity checksum.
    ///
    /// The payload is written compact inside a pretty-printed envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        let payload = serde_json::to_string(self).context("Failed to serialize session")?;
        let envelope = SessionEnvelope {
            checksum: checksum(&payload),
            session: RawValue::from_string(payload).context("Failed to embed session payload")?,
        };
        serde_json::to_string_pretty(&envelope).context("Failed to serialize session envelope")
    }

    /// Loads a session from a file and verifies its integrity.
    ///
    /// Missing files and repeated paths are logged as warnings; they are not
    /// errors because the engine copes with both.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or parsed, the checksum
    /// doesn't match, or the version is unsupported.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file: {}", path.display()))?;
        let session = Self::from_json(&content)?;

        for item in &session.items {
            if !item.path.exists() {
                log::warn!(
                    "File referenced in session no longer exists: {}",
                    item.path.display()
                );
            }
        }

        log::debug!(
            "Loaded {} item(s) from {}",
            session.items.len(),
            path.display()
        );
        Ok(session)
    }

    /// Parses and verifies a session envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, the checksum doesn't match,
    /// or the version is unsupported.
    pub fn from_json(content: &str) -> Result<Self> {
        let envelope: SessionEnvelope = serde_json::from_str(content).context(
            "Failed to parse session envelope. The file might be corrupted or in an old format.",
        )?;

        let payload = envelope.session.get();
        if checksum(payload) != envelope.checksum {
            anyhow::bail!("Session integrity check failed: checksum mismatch. The file may have been tampered with or corrupted.");
        }

        let session: Session =
            serde_json::from_str(payload).context("Failed to parse session payload")?;
        if session.version != SESSION_VERSION {
            anyhow::bail!(
                "Unsupported session version: {}. Current version is {}.",
                session.version,
                SESSION_VERSION
            );
        }

        let mut seen = HashSet::new();
        for item in &session.items {
            if !seen.insert((&item.group_id, &item.path)) {
                log::warn!(
                    "Path listed twice in group {}: {}",
                    item.group_id,
                    item.path.display()
                );
            }
        }

        Ok(session)
    }
}
