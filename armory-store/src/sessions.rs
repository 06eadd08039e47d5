//! Server-side sessions: opaque random token → user + expiry.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use rusqlite::{params, Connection, OptionalExtension};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use crate::error::StoreError;
use crate::user::User;

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

fn new_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Create a session for `user` valid for `ttl`.
pub fn create_session(
    conn: &Connection,
    user: &User,
    ttl: Duration,
) -> Result<Session, StoreError> {
    let token = new_token();
    let now = Utc::now();
    let expires_at = now + ttl;
    conn.execute(
        "INSERT INTO sessions (token, user_json, created_at, expires_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            token,
            serde_json::to_string(user)?,
            now.to_rfc3339(),
            expires_at.to_rfc3339()
        ],
    )?;
    Ok(Session {
        token,
        user: user.clone(),
        expires_at,
    })
}

/// Look up a session. Expired sessions are deleted and read as absent.
pub fn get_session(conn: &Connection, token: &str) -> Result<Option<User>, StoreError> {
    let row: Option<(String, String)> = conn
        .query_row(
            "SELECT user_json, expires_at FROM sessions WHERE token = ?1",
            params![token],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    let Some((user_json, expires_at)) = row else {
        return Ok(None);
    };

    let expires_at = DateTime::parse_from_rfc3339(&expires_at)
        .map_err(|e| StoreError::Timestamp(e.to_string()))?
        .with_timezone(&Utc);
    if expires_at <= Utc::now() {
        delete_session(conn, token)?;
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(&user_json)?))
}

pub fn delete_session(conn: &Connection, token: &str) -> Result<(), StoreError> {
    conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
    Ok(())
}

/// Drop every expired session. Called at server startup.
pub fn purge_expired(conn: &Connection) -> Result<usize, StoreError> {
    let purged = conn.execute(
        "DELETE FROM sessions WHERE expires_at <= ?1",
        params![Utc::now().to_rfc3339()],
    )?;
    if purged > 0 {
        log::debug!("purged {purged} expired sessions");
    }
    Ok(purged)
}
