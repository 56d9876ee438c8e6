use serde::{Serialize, Serializer};
use std::fmt;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Client-issued correlation token tying `submit_documents` to the
/// `analyze_error` call that preceded it.
///
/// The backend must treat it as untrusted: one token per submission, never
/// reused, and only valid for a short window after issue. Not `Clone`: a
/// request owns its token outright.
#[derive(Debug, PartialEq, Eq)]
pub struct SessionId {
    id: Uuid,
    issued_at: Instant,
}

impl SessionId {
    pub fn new() -> Self {
        Self::issued_at(Instant::now())
    }

    fn issued_at(issued_at: Instant) -> Self {
        Self {
            id: Uuid::new_v4(),
            issued_at,
        }
    }

    pub fn as_uuid(&self) -> Uuid {
        self.id
    }

    pub fn age(&self) -> Duration {
        self.issued_at.elapsed()
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() > ttl
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.id.fmt(f)
    }
}

impl Serialize for SessionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::SessionId;
    use std::time::{Duration, Instant};

    #[test]
    fn each_submission_gets_a_distinct_id() {
        let first = SessionId::new();
        let second = SessionId::new();
        assert_ne!(first.as_uuid(), second.as_uuid());
        assert_eq!(first.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn serializes_as_plain_string() {
        let session = SessionId::new();
        let value = serde_json::to_value(&session).expect("session id should serialize");
        assert_eq!(value, serde_json::Value::String(session.to_string()));
    }

    #[test]
    fn expires_after_ttl() {
        let fresh = SessionId::new();
        assert!(!fresh.is_expired(Duration::from_secs(60)));

        let Some(past) = Instant::now().checked_sub(Duration::from_secs(120)) else {
            return;
        };
        let stale = SessionId::issued_at(past);
        assert!(stale.is_expired(Duration::from_secs(60)));
    }
}
