//! In-memory survey store for tests and offline use

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::domain::value_objects::{SurveyId, SurveyPayload, SurveyRecord};
use crate::ports::outbound::{StoreError, SurveyStore};

/// Survey store with server semantics: ids from 1, server-stamped timestamps
pub struct InMemorySurveyStore {
    surveys: RwLock<BTreeMap<SurveyId, SurveyRecord>>,
    next_id: AtomicU64,
    creates: AtomicUsize,
    updates: AtomicUsize,
}

impl InMemorySurveyStore {
    pub fn new() -> Self {
        Self {
            surveys: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            creates: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
        }
    }

    /// Store seeded with existing records; new ids continue after the highest one.
    pub fn with_records(records: impl IntoIterator<Item = SurveyRecord>) -> Self {
        let store = Self::new();
        {
            let mut surveys = store.surveys.write();
            for record in records {
                surveys.insert(record.id, record);
            }
            let next = surveys.keys().next_back().map_or(1, |id| id.value() + 1);
            store.next_id.store(next, Ordering::SeqCst);
        }
        store
    }

    /// Number of successful `create` calls
    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    /// Number of successful `update` calls
    pub fn update_calls(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    fn now() -> NaiveDateTime {
        Local::now().naive_local()
    }
}

impl Default for InMemorySurveyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SurveyStore for InMemorySurveyStore {
    async fn create(&self, payload: &SurveyPayload) -> Result<SurveyRecord, StoreError> {
        let id = SurveyId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let now = Self::now();
        let record = SurveyRecord {
            id,
            fields: payload.clone(),
            created_at: now,
            updated_at: now,
        };
        self.surveys.write().insert(id, record.clone());
        self.creates.fetch_add(1, Ordering::SeqCst);
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<SurveyRecord>, StoreError> {
        Ok(self.surveys.read().values().cloned().collect())
    }

    async fn get(&self, id: SurveyId) -> Result<SurveyRecord, StoreError> {
        self.surveys.read().get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn update(&self, id: SurveyId, payload: &SurveyPayload) -> Result<SurveyRecord, StoreError> {
        let mut surveys = self.surveys.write();
        let record = surveys.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        record.fields = payload.clone();
        record.updated_at = Self::now();
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(record.clone())
    }

    async fn delete(&self, id: SurveyId) -> Result<(), StoreError> {
        self.surveys
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.surveys.read().len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{CampusLiked, InterestSource, Recommendation};
    use chrono::NaiveDate;

    fn payload(first_name: &str) -> SurveyPayload {
        SurveyPayload {
            first_name: first_name.into(),
            last_name: "Hopper".into(),
            email: "grace@navy.mil".into(),
            phone_number: None,
            street_address: "1 Main St".into(),
            zip_code: "22030".into(),
            city: "Fairfax".into(),
            state: "VA".into(),
            survey_date: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
            recommendation: Recommendation::Likely,
            campus_liked: [CampusLiked::Students, CampusLiked::Sports].into_iter().collect(),
            interest_source: InterestSource::Friends,
            comments: None,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = InMemorySurveyStore::new();
        let a = store.create(&payload("Grace")).await.unwrap();
        let b = store.create(&payload("Ada")).await.unwrap();
        assert_eq!(a.id, SurveyId::new(1));
        assert_eq!(b.id, SurveyId::new(2));
        assert_eq!(store.count().await.unwrap(), 2);
        assert_eq!(store.create_calls(), 2);
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let store = InMemorySurveyStore::new();
        let created = store.create(&payload("Grace")).await.unwrap();
        let updated = store.update(created.id, &payload("Amazing Grace")).await.unwrap();
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.fields.first_name, "Amazing Grace");
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let store = InMemorySurveyStore::new();
        let missing = SurveyId::new(42);
        assert_eq!(store.get(missing).await, Err(StoreError::NotFound(missing)));
        assert_eq!(store.delete(missing).await, Err(StoreError::NotFound(missing)));
        assert_eq!(
            store.update(missing, &payload("x")).await,
            Err(StoreError::NotFound(missing))
        );
    }

    #[tokio::test]
    async fn test_seeded_store_continues_ids_and_lists_in_order() {
        let first = InMemorySurveyStore::new().create(&payload("Seed")).await.unwrap();
        let mut seeded = first.clone();
        seeded.id = SurveyId::new(7);

        let store = InMemorySurveyStore::with_records(vec![seeded, first]);
        let next = store.create(&payload("Next")).await.unwrap();
        assert_eq!(next.id, SurveyId::new(8));

        let ids: Vec<u64> = store.list().await.unwrap().iter().map(|r| r.id.value()).collect();
        assert_eq!(ids, vec![1, 7, 8]);
    }
}
