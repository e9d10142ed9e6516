//! In-memory session store for per-browser result tables.
//!
//! Holds at most `capacity` sessions. Inserting into a full store first drops
//! expired records, then evicts the record closest to expiry. A background
//! task started with [`ResultSessionStore::spawn_purge`] frees idle sessions.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, ExpiredDeletion, SessionStore};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ResultSessionStore {
    records: Arc<Mutex<HashMap<Id, Record>>>,
    capacity: usize,
}

fn is_active(record: &Record, now: OffsetDateTime) -> bool {
    record.expiry_date > now
}

impl ResultSessionStore {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Sessions currently held, expired or not.
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Deletes expired sessions every `every` until the handle is aborted.
    pub fn spawn_purge(&self, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = store.delete_expired().await {
                    warn!("Failed to purge expired sessions: {}", e);
                }
            }
        })
    }

    fn make_room(&self, records: &mut HashMap<Id, Record>, incoming: &Id) {
        if records.contains_key(incoming) || records.len() < self.capacity {
            return;
        }

        let now = OffsetDateTime::now_utc();
        records.retain(|_, record| is_active(record, now));

        while records.len() >= self.capacity {
            let Some(oldest) = records
                .values()
                .min_by_key(|record| record.expiry_date)
                .map(|record| record.id)
            else {
                break;
            };
            records.remove(&oldest);
            debug!(session_id = %oldest, "Evicted session to stay within capacity");
        }
    }
}

#[async_trait]
impl SessionStore for ResultSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        let mut records = self.records.lock().await;
        while records.contains_key(&record.id) {
            record.id = Id::default();
        }
        self.make_room(&mut records, &record.id);
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        let mut records = self.records.lock().await;
        self.make_room(&mut records, &record.id);
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let now = OffsetDateTime::now_utc();
        Ok(self
            .records
            .lock()
            .await
            .get(session_id)
            .filter(|record| is_active(record, now))
            .cloned())
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.records.lock().await.remove(session_id);
        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for ResultSessionStore {
    async fn delete_expired(&self) -> session_store::Result<()> {
        let now = OffsetDateTime::now_utc();
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, record| is_active(record, now));
        let purged = before - records.len();
        if purged > 0 {
            debug!(purged, remaining = records.len(), "Purged expired sessions");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(expires_in: time::Duration) -> Record {
        Record {
            id: Id::default(),
            data: HashMap::default(),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_expired_sessions_are_hidden_and_purged() {
        let store = ResultSessionStore::new(10);
        let live = record(time::Duration::minutes(5));
        let stale = record(time::Duration::minutes(-5));
        store.save(&live).await.unwrap();
        store.save(&stale).await.unwrap();

        assert!(store.load(&stale.id).await.unwrap().is_none());
        assert_eq!(store.len().await, 2);

        store.delete_expired().await.unwrap();
        assert_eq!(store.len().await, 1);
        assert!(store.load(&live.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_full_store_evicts_session_closest_to_expiry() {
        let store = ResultSessionStore::new(2);
        let soon = record(time::Duration::minutes(1));
        let later = record(time::Duration::minutes(30));
        store.save(&soon).await.unwrap();
        store.save(&later).await.unwrap();

        let mut newest = record(time::Duration::minutes(60));
        store.create(&mut newest).await.unwrap();

        assert_eq!(store.len().await, 2);
        assert!(store.load(&soon.id).await.unwrap().is_none());
        assert!(store.load(&later.id).await.unwrap().is_some());
        assert!(store.load(&newest.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_full_store_prefers_dropping_expired_sessions() {
        let store = ResultSessionStore::new(2);
        let stale = record(time::Duration::minutes(-1));
        let live = record(time::Duration::minutes(1));
        store.save(&stale).await.unwrap();
        store.save(&live).await.unwrap();

        store.save(&record(time::Duration::minutes(10))).await.unwrap();

        assert_eq!(store.len().await, 2);
        assert!(store.load(&live.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_resaving_existing_session_never_evicts() {
        let store = ResultSessionStore::new(1);
        let mut only = record(time::Duration::minutes(5));
        store.save(&only).await.unwrap();

        only.expiry_date += time::Duration::minutes(5);
        store.save(&only).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert!(store.load(&only.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_purge_task_frees_expired_sessions() {
        let store = ResultSessionStore::new(10);
        store.save(&record(time::Duration::minutes(-1))).await.unwrap();

        let handle = store.spawn_purge(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();

        assert!(store.is_empty().await);
    }
}
