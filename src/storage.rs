use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use sled::Db;
use tracing::warn;
use uuid::Uuid;

use crate::models::SkinNote;

const SKIN_NOTES_KEY: &[u8] = b"skinNotes";
const LAST_DIAGNOSIS_KEY: &[u8] = b"lastDiagnosisResult";
const LAST_DIAGNOSIS_PHOTO_KEY: &[u8] = b"lastDiagnosisPhoto";
const USER_ID_KEY: &[u8] = b"appUserId";

fn key_name(key: &[u8]) -> &str {
    std::str::from_utf8(key).unwrap_or("<binary>")
}

fn open_db(path: &Path) -> Result<Db> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create store dir {:?}", parent))?;
    }
    sled::open(path).with_context(|| format!("failed to open local store at {:?}", path))
}

/// Per-installation key/value store. Every value is a JSON document under a fixed key.
pub struct LocalStore {
    db: Db,
}

impl LocalStore {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self { db: open_db(path)? })
    }

    fn read_json<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>> {
        match self.db.get(key) {
            Ok(Some(value)) => {
                let parsed = serde_json::from_slice(&value)
                    .with_context(|| format!("failed to deserialize {}", key_name(key)))?;
                Ok(Some(parsed))
            }
            Ok(None) => Ok(None),
            Err(err) => Err(err).with_context(|| format!("failed to read {}", key_name(key))),
        }
    }

    /// Unreadable values are treated as absent so the UI can keep going.
    fn read_or_none<T: DeserializeOwned>(&self, key: &[u8]) -> Option<T> {
        match self.read_json(key) {
            Ok(value) => value,
            Err(err) => {
                warn!("[store] ignoring unreadable {}: {:#}", key_name(key), err);
                None
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &[u8], value: &T) -> Result<()> {
        let data = serde_json::to_vec(value)
            .with_context(|| format!("failed to serialize {}", key_name(key)))?;
        self.db
            .insert(key, data)
            .with_context(|| format!("failed to persist {}", key_name(key)))?;
        self.db
            .flush()
            .with_context(|| format!("failed to flush local store after writing {}", key_name(key)))?;
        Ok(())
    }

    pub fn load_notes(&self) -> Vec<SkinNote> {
        self.read_or_none(SKIN_NOTES_KEY).unwrap_or_default()
    }

    pub fn save_notes(&self, notes: &[SkinNote]) -> Result<()> {
        self.write_json(SKIN_NOTES_KEY, notes)
    }

    pub fn load_last_diagnosis(&self) -> Option<Value> {
        self.read_or_none(LAST_DIAGNOSIS_KEY)
    }

    pub fn save_last_diagnosis(&self, raw: &Value) -> Result<()> {
        self.write_json(LAST_DIAGNOSIS_KEY, raw)
    }

    pub fn load_last_photo(&self) -> Option<String> {
        self.read_or_none(LAST_DIAGNOSIS_PHOTO_KEY)
    }

    pub fn save_last_photo(&self, reference: &str) -> Result<()> {
        self.write_json(LAST_DIAGNOSIS_PHOTO_KEY, reference)
    }

    /// Returns the stored anonymous user id, generating one on first use.
    pub fn user_id(&self) -> Result<String> {
        if let Some(id) = self.read_or_none::<String>(USER_ID_KEY) {
            return Ok(id);
        }
        let id = format!("user-{}", Uuid::new_v4().simple());
        self.write_json(USER_ID_KEY, &id)?;
        Ok(id)
    }
}
