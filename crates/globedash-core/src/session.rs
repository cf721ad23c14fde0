//! Mock session storage and the auth context.
//!
//! The session is a single opaque token kept under one key of a small
//! key-value store (`<home>/storage.json`). The token is fabricated locally
//! and is NOT a security mechanism: nothing ever validates it, and a stored
//! token means "logged in" regardless of its contents.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{RestoreIdentity, paths};

/// Storage key holding the serialized session token.
pub const TOKEN_KEY: &str = "mock_token";

/// Identity reported for restored sessions when the real one is unknown.
pub const PLACEHOLDER_IDENTITY: &str = "user@example.com";

fn now_millis_u64() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| u64::try_from(d.as_millis()).ok())
        .unwrap_or(u64::MAX)
}

// ============================================================================
// Key-value storage
// ============================================================================

/// A persistent string key-value slot store.
pub trait KeyValueStore {
    /// Reads a value.
    ///
    /// # Errors
    /// Returns an error if the backing storage is unavailable.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes a value, replacing any previous one.
    ///
    /// # Errors
    /// Returns an error if the backing storage is unavailable.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes a value. Removing a missing key is not an error.
    ///
    /// # Errors
    /// Returns an error if the backing storage is unavailable.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// JSON-file backed store with restricted permissions (0600 on unix).
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<home>/storage.json`.
    pub fn default_location() -> Self {
        Self::new(paths::storage_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads all entries. A missing file is an empty store.
    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read storage from {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse storage from {}", self.path.display()))
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(entries).context("Failed to serialize storage")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

/// In-memory store, lost when dropped.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

// ============================================================================
// Mock token
// ============================================================================

/// Token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub email: String,
    /// Unix millis at issue time.
    pub id: u64,
}

/// JWT-shaped placeholder token. Never signed, never verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockToken {
    pub header: String,
    pub payload: TokenPayload,
    pub signature: String,
}

impl MockToken {
    /// Fabricates a token for `identity`.
    pub fn issue(identity: &str) -> Self {
        Self {
            header: "header".to_string(),
            payload: TokenPayload {
                email: identity.to_string(),
                id: now_millis_u64(),
            },
            signature: random_signature(),
        }
    }

    /// Serializes the token into the opaque string that gets stored.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize session token")
    }

    /// Parses a stored token. Returns `None` for anything that is not a mock token.
    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

/// Short base36 string derived from random uuid bytes.
fn random_signature() -> String {
    const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let id = Uuid::new_v4();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&id.as_bytes()[..8]);
    let mut value = u64::from_le_bytes(bytes);

    let mut out = Vec::new();
    while value > 0 {
        out.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    if out.is_empty() {
        out.push(b'0');
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

// ============================================================================
// Auth context
// ============================================================================

/// An active session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub identity: String,
    pub token: String,
}

/// Session lifecycle (`restore`, `login`, `logout`) over a key-value store.
///
/// Starts in the loading state; callers must not render session-dependent UI
/// until `restore()` has run.
#[derive(Debug)]
pub struct AuthContext<S> {
    store: S,
    session: Option<Session>,
    loading: bool,
    policy: RestoreIdentity,
}

impl<S: KeyValueStore> AuthContext<S> {
    pub fn new(store: S, policy: RestoreIdentity) -> Self {
        Self {
            store,
            session: None,
            loading: true,
            policy,
        }
    }

    /// Rebuilds the session from the stored token, if any.
    ///
    /// Storage errors degrade to "no session".
    pub fn restore(&mut self) -> Option<&Session> {
        self.session = match self.store.get(TOKEN_KEY) {
            Ok(Some(token)) => {
                let identity = self.restored_identity(&token);
                tracing::debug!(%identity, "restored session");
                Some(Session { identity, token })
            }
            Ok(None) => None,
            Err(err) => {
                tracing::warn!("session storage unavailable: {err:#}");
                None
            }
        };
        self.loading = false;
        self.session.as_ref()
    }

    fn restored_identity(&self, token: &str) -> String {
        match self.policy {
            RestoreIdentity::Placeholder => PLACEHOLDER_IDENTITY.to_string(),
            RestoreIdentity::Token => MockToken::decode(token).map_or_else(
                || {
                    tracing::warn!("stored token is not a mock token; using placeholder identity");
                    PLACEHOLDER_IDENTITY.to_string()
                },
                |t| t.payload.email,
            ),
        }
    }

    /// Starts a session for `identity`. The secret is not checked.
    ///
    /// Always succeeds: if the token cannot be persisted the session is still
    /// active for the lifetime of this context.
    pub fn login(&mut self, identity: &str, _secret: &str) -> &Session {
        let token = MockToken::issue(identity);
        let encoded = match token.encode() {
            Ok(encoded) => encoded,
            Err(err) => {
                tracing::warn!("{err:#}");
                String::new()
            }
        };

        if let Err(err) = self.store.set(TOKEN_KEY, &encoded) {
            tracing::warn!("failed to persist session token: {err:#}");
        }
        tracing::info!(identity, "logged in");

        self.loading = false;
        self.session.insert(Session {
            identity: identity.to_string(),
            token: encoded,
        })
    }

    /// Ends the session and clears the stored token.
    pub fn logout(&mut self) {
        if let Err(err) = self.store.remove(TOKEN_KEY) {
            tracing::warn!("failed to clear session token: {err:#}");
        }
        if let Some(session) = self.session.take() {
            tracing::info!(identity = %session.identity, "logged out");
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn identity(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.identity.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
