use std::fmt;

use serde::Serialize;
use uuid::Uuid;

/// Correlation id linking a logged failure to the response the client saw
///
/// A UUIDv7: millisecond timestamp plus 74 random bits. Collisions are
/// possible only between ids generated in the same millisecond and even
/// then have probability around 2^-74 per pair. Not a security token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ErrorId(Uuid);

impl ErrorId {
    /// Generate a fresh id; infallible
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for ErrorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn ids_do_not_collide() {
        let ids: HashSet<ErrorId> = (0..20_000).map(|_| ErrorId::generate()).collect();
        assert_eq!(ids.len(), 20_000);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = ErrorId::generate();
        assert_eq!(serde_json::to_value(id).unwrap(), serde_json::Value::String(id.to_string()));
    }
}
