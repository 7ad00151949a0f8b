use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A short key paired with the URL it redirects to.
///
/// Keys are caller-assigned. The only constraint the service places on them
/// is that they are non-empty; the URL is stored as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    /// The short key used for lookups.
    pub key: String,
    /// The redirect target.
    pub url: String,
}

impl Link {
    pub fn new(key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            url: url.into(),
        }
    }
}

impl Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.key, self.url)
    }
}
