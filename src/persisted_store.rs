use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::persisted::{
    Preferences, COLORS_KEY, COLOR_LOCKED_KEY, HISTORY_KEY, LAST_REMOVED_KEY, MEMBERS_KEY,
    MODE_KEY, SOUND_KEY, THEME_KEY,
};
use gacha_wheel_core::{decode, encode, History, Participant, Roster};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage i/o failed for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("value for '{key}' could not be encoded")]
    Encode { key: String },
    #[error("invalid storage key '{key}'")]
    InvalidKey { key: String },
}

/// Key to JSON text. Mirrors a browser's local storage.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(StoreError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        let io_err = |source| StoreError::Io {
            key: key.to_string(),
            source,
        };
        fs::write(&tmp, value).map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// Reads `key`, falling back to `default` when it is missing or unreadable.
pub fn load_or<S, T, F>(storage: &S, key: &str, default: F) -> T
where
    S: Storage + ?Sized,
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    let text = match storage.get(key) {
        Ok(Some(text)) => text,
        Ok(None) => {
            debug!(key, "storage key absent, using default");
            return default();
        }
        Err(err) => {
            warn!(key, error = %err, "storage read failed, using default");
            return default();
        }
    };
    match decode::<T>(&text) {
        Some(value) => value,
        None => {
            warn!(key, "stored value is corrupt, using default");
            default()
        }
    }
}

pub fn save<S, T>(storage: &mut S, key: &str, value: &T) -> Result<(), StoreError>
where
    S: Storage + ?Sized,
    T: Serialize + ?Sized,
{
    let Some(text) = encode(value) else {
        return Err(StoreError::Encode {
            key: key.to_string(),
        });
    };
    storage.set(key, &text)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PersistedState {
    pub roster: Roster,
    pub history: History,
    pub preferences: Preferences,
    pub last_removed: Option<Participant>,
}

pub fn load_state<S: Storage + ?Sized>(storage: &S) -> PersistedState {
    let defaults = Preferences::default();
    let preferences = Preferences {
        mode: load_or(storage, MODE_KEY, || defaults.mode),
        theme: load_or(storage, THEME_KEY, || defaults.theme),
        sound_enabled: load_or(storage, SOUND_KEY, || defaults.sound_enabled),
        color_locked: load_or(storage, COLOR_LOCKED_KEY, || defaults.color_locked),
        custom_colors: load_or(storage, COLORS_KEY, || defaults.custom_colors.clone()),
    };
    PersistedState {
        roster: load_or(storage, MEMBERS_KEY, Roster::with_defaults),
        history: load_or(storage, HISTORY_KEY, History::default),
        preferences,
        last_removed: load_or(storage, LAST_REMOVED_KEY, || None),
    }
}

pub fn save_preferences<S: Storage + ?Sized>(
    storage: &mut S,
    preferences: &Preferences,
) -> Result<(), StoreError> {
    save(storage, MODE_KEY, &preferences.mode)?;
    save(storage, THEME_KEY, &preferences.theme)?;
    save(storage, SOUND_KEY, &preferences.sound_enabled)?;
    save(storage, COLOR_LOCKED_KEY, &preferences.color_locked)?;
    save(storage, COLORS_KEY, &preferences.custom_colors)
}
