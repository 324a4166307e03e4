use std::fmt;

/// Key namespace in the token store.
///
/// State tokens and session tokens live under different prefixes so the two
/// classes can never be mistaken for each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CachePrefix {
    AuthToken,
    Session,
}

impl CachePrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            CachePrefix::AuthToken => "authToken",
            CachePrefix::Session => "session",
        }
    }

    /// Full store key for `token` in this namespace, e.g. `session:<token>`.
    pub fn key(&self, token: &str) -> String {
        format!("{}:{token}", self.as_str())
    }
}

impl fmt::Display for CachePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
