use std::path::PathBuf;

use crate::error::{Result, TgFetchError};

const API_ID_VAR: &str = "TELEGRAM_API_ID";
const API_HASH_VAR: &str = "TELEGRAM_API_HASH";
const SESSION_VAR: &str = "TGFETCH_SESSION";
const SESSION_FILE: &str = "tgfetch.session";

/// Process-scoped configuration, read once at startup and passed into the
/// fetcher explicitly.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_id: i32,
    pub api_hash: String,
    /// Where the grammers session lives. Exclusive use is assumed: one
    /// tgfetch process per session file, no locking.
    pub session_path: PathBuf,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let api_id_raw =
            std::env::var(API_ID_VAR).map_err(|_| TgFetchError::MissingEnv(API_ID_VAR))?;
        let api_id = api_id_raw
            .trim()
            .parse::<i32>()
            .map_err(|_| TgFetchError::InvalidEnv(API_ID_VAR, api_id_raw.clone()))?;

        let api_hash =
            std::env::var(API_HASH_VAR).map_err(|_| TgFetchError::MissingEnv(API_HASH_VAR))?;

        let session_path = match std::env::var(SESSION_VAR) {
            Ok(p) => PathBuf::from(p),
            Err(_) => default_session_path()?,
        };

        Ok(Self {
            api_id,
            api_hash,
            session_path,
        })
    }
}

/// `~/.tgfetch/tgfetch.session`, creating the directory if needed.
fn default_session_path() -> Result<PathBuf> {
    let dir = home_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join(SESSION_FILE))
}

/// The per-user tgfetch directory (session + activity log).
pub(crate) fn home_dir() -> Result<PathBuf> {
    let user_dirs = directories::UserDirs::new()
        .ok_or_else(|| TgFetchError::Other("could not determine home directory".into()))?;
    Ok(user_dirs.home_dir().join(".tgfetch"))
}
