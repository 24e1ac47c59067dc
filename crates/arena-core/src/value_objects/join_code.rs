//! Shareable challenge join codes

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Six uppercase alphanumeric characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JoinCode(String);

impl JoinCode {
    pub const LEN: usize = 6;

    /// Random code. Uniqueness is enforced by storage, callers retry on collision.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let code = (0..Self::LEN)
            .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
            .collect();
        Self(code)
    }

    /// Normalize user input: trimmed, uppercased, cut to six characters.
    pub fn normalize(input: &str) -> Option<Self> {
        let code: String = input
            .trim()
            .chars()
            .take(Self::LEN)
            .collect::<String>()
            .to_uppercase();
        if code.is_empty() {
            None
        } else {
            Some(Self(code))
        }
    }

    /// Wrap a value read back from storage.
    pub fn from_stored(code: String) -> Self {
        Self(code)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JoinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
