use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Material used to derive a [`CallerId`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityMaterial {
    /// A secret bearer token presented over the HTTP API.
    Token(String),
    /// A named local principal, as used by the command-line environment.
    Principal(String),
}

/// Persistent identity of a caller.
///
/// A `CallerId` is derived deterministically from [`IdentityMaterial`] using
/// BLAKE3: the same material always produces the same identity. It is the
/// primary key of the talent store, so a caller can only ever address the
/// record stored under their own id.
///
/// Serialized as its 64-character hex form so it can be used as a JSON map
/// key and as a URL path segment.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CallerId {
    hash: [u8; 32],
}

impl CallerId {
    /// Derive a `CallerId` from identity material.
    pub fn derive(material: &IdentityMaterial) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"tal-caller-v1:");
        match material {
            IdentityMaterial::Token(token) => {
                hasher.update(b"token:");
                hasher.update(token.as_bytes());
            }
            IdentityMaterial::Principal(name) => {
                hasher.update(b"principal:");
                hasher.update(name.as_bytes());
            }
        }
        Self {
            hash: *hasher.finalize().as_bytes(),
        }
    }

    /// Shorthand for deriving from a named principal.
    pub fn principal(name: &str) -> Self {
        Self::derive(&IdentityMaterial::Principal(name.to_string()))
    }

    /// Shorthand for deriving from a bearer token.
    pub fn token(token: &str) -> Self {
        Self::derive(&IdentityMaterial::Token(token.to_string()))
    }

    /// Full hex-encoded string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Short identifier for logs (first 8 hex characters).
    pub fn short_id(&self) -> String {
        format!("id:{}", hex::encode(&self.hash[..4]))
    }

    /// Parse from a hex string (64 hex characters, optional `id:` prefix).
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let s = s.strip_prefix("id:").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self { hash: arr })
    }
}

impl From<CallerId> for String {
    fn from(id: CallerId) -> Self {
        id.to_hex()
    }
}

impl TryFrom<String> for CallerId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl fmt::Debug for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallerId({})", self.short_id())
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_id())
    }
}
