//! # Session Persistence
//!
//! Saves the authenticated session to `<data_dir>/session.json`: one JSON
//! document holding the access token and the user it belongs to. The pair is
//! stored together, so on disk a session is only ever whole or absent.
//!
//! Earlier releases kept separate files (`access_token` or `authToken` for
//! the token, `user_data` for the user). `load()` migrates that layout once:
//! a complete legacy pair is rewritten under the canonical document and the
//! old files are removed; an incomplete pair is not trusted and is cleaned
//! up.
//!
//! All writes use atomic rename (write `.tmp`, then `rename()`) for crash safety.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::api::types::user_from_value;
use crate::models::User;

const SESSION_FILE: &str = "session.json";
const LEGACY_TOKEN_FILES: [&str; 2] = ["access_token", "authToken"];
const LEGACY_USER_FILE: &str = "user_data";

/// The persisted session. Both halves travel together.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StoredSession {
    pub access_token: String,
    pub user: User,
}

/// On-disk session storage rooted at a single directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SessionStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    /// Persist the session as one atomic document.
    pub fn save(&self, session: &StoredSession) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        atomic_write_json(&self.session_path(), session)?;
        debug!("Session saved for user {}", session.user.id);
        Ok(())
    }

    /// Load the stored session, migrating the legacy split-file layout when
    /// the canonical document is absent. Returns `None` when no complete
    /// session exists.
    pub fn load(&self) -> io::Result<Option<StoredSession>> {
        let path = self.session_path();
        if path.exists() {
            let json = fs::read_to_string(&path)?;
            match serde_json::from_str::<StoredSession>(&json) {
                Ok(session) => return Ok(Some(session)),
                Err(e) => {
                    warn!("Discarding unreadable session file: {}", e);
                    fs::remove_file(&path)?;
                }
            }
        }
        self.migrate_legacy()
    }

    /// Remove the canonical document and any legacy files.
    pub fn clear(&self) -> io::Result<()> {
        remove_if_present(&self.session_path())?;
        self.remove_legacy_files()
    }

    fn migrate_legacy(&self) -> io::Result<Option<StoredSession>> {
        let token = self.read_legacy_token();
        let user = self.read_legacy_user();
        let session = match (token, user) {
            (Some(access_token), Some(user)) => StoredSession { access_token, user },
            (None, None) => return Ok(None),
            _ => {
                // Half a session is no session
                warn!("Incomplete legacy session found, discarding");
                self.remove_legacy_files()?;
                return Ok(None);
            }
        };
        self.save(&session)?;
        self.remove_legacy_files()?;
        info!("Migrated legacy session files to {}", SESSION_FILE);
        Ok(Some(session))
    }

    /// The token was stored as a bare string, sometimes JSON-quoted.
    fn read_legacy_token(&self) -> Option<String> {
        for name in LEGACY_TOKEN_FILES {
            if let Ok(raw) = fs::read_to_string(self.dir.join(name)) {
                let token = raw.trim().trim_matches('"').to_string();
                if !token.is_empty() {
                    return Some(token);
                }
            }
        }
        None
    }

    /// The user was stored as a JSON blob in whatever shape the server of the
    /// day produced; run it through the wire normalizer.
    fn read_legacy_user(&self) -> Option<User> {
        let raw = fs::read_to_string(self.dir.join(LEGACY_USER_FILE)).ok()?;
        let value = serde_json::from_str(&raw).ok()?;
        user_from_value(value).ok()
    }

    fn remove_legacy_files(&self) -> io::Result<()> {
        for name in LEGACY_TOKEN_FILES {
            remove_if_present(&self.dir.join(name))?;
        }
        remove_if_present(&self.dir.join(LEGACY_USER_FILE))
    }
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
