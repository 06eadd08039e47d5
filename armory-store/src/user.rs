//! User identity as seen by the store.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Identity from the authentication provider. `id` is the provider's
/// stable subject identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// Storage key prefix for a user: the SHA-256 digest of the stable id,
/// base64-encoded. The raw identifier never appears in storage keys.
pub fn user_prefix(user: &User) -> String {
    let mut hash = Sha256::new();
    hash.update(user.id.as_bytes());
    STANDARD.encode(hash.finalize())
}
