//! Session store abstraction for the intake record.
//!
//! The record lives between round 1 and round 3; the backend is injected so
//! deployments can swap the in-memory map for a shared cache without
//! touching the flow itself. Expiry is the backend's concern.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One (question, answer) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// The five fixed intake pairs collected in round 1, in question order.
pub type IntakeRecord = Vec<QaPair>;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the intake record for a session, if one exists.
    async fn load(&self, session_id: &str) -> Result<Option<IntakeRecord>>;

    /// Store the intake record, replacing any prior record for the session.
    async fn save(&self, session_id: &str, record: IntakeRecord) -> Result<()>;

    /// Drop the session's record.
    async fn remove(&self, session_id: &str) -> Result<()>;
}

/// Process-local session store.
#[derive(Default)]
pub struct InMemorySessionStore {
    records: DashMap<String, IntakeRecord>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, session_id: &str) -> Result<Option<IntakeRecord>> {
        Ok(self.records.get(session_id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, session_id: &str, record: IntakeRecord) -> Result<()> {
        self.records.insert(session_id.to_string(), record);
        Ok(())
    }

    async fn remove(&self, session_id: &str) -> Result<()> {
        self.records.remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> IntakeRecord {
        vec![QaPair {
            question: "What is your goal or what do you want to achieve?".to_string(),
            answer: "write a sonnet".to_string(),
        }]
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let store = InMemorySessionStore::new();
        store.save("abc", record()).await.unwrap();

        let loaded = store.load("abc").await.unwrap().unwrap();
        assert_eq!(loaded, record());
    }

    #[tokio::test]
    async fn load_of_unknown_session_is_none() {
        let store = InMemorySessionStore::new();
        assert!(store.load("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_overwrites_the_previous_record() {
        let store = InMemorySessionStore::new();
        store.save("abc", record()).await.unwrap();

        let replacement = vec![QaPair {
            question: "q".to_string(),
            answer: "different".to_string(),
        }];
        store.save("abc", replacement.clone()).await.unwrap();

        assert_eq!(store.load("abc").await.unwrap().unwrap(), replacement);
    }

    #[tokio::test]
    async fn remove_drops_the_record() {
        let store = InMemorySessionStore::new();
        store.save("abc", record()).await.unwrap();
        store.remove("abc").await.unwrap();
        assert!(store.load("abc").await.unwrap().is_none());
    }
}
