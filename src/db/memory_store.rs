//! 프로세스 내 문서 저장소
//!
//! MongoDB 없이 리포지토리를 검증하기 위한 [`DocumentStore`] 구현입니다.
//! `$addToSet`/`$pull` 의미와 유니크 인덱스를 MongoDB 와 동일하게 흉내 내고,
//! 장애 주입(컬렉션 단위 장애, 전체 오프라인, 지연)을 지원합니다.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use super::entity_kind::EntityKind;
use super::store::{DocumentStore, StoreError, StoreResult};

#[derive(Default)]
struct State {
    collections: HashMap<EntityKind, BTreeMap<ObjectId, Document>>,
    /// 컬렉션별 유니크 인덱스 (인덱스 이름 → 필드)
    indexes: HashMap<EntityKind, BTreeMap<String, String>>,
    unavailable: HashSet<EntityKind>,
    offline: bool,
}

impl State {
    fn check(&self, kind: EntityKind) -> StoreResult<()> {
        if self.offline || self.unavailable.contains(&kind) {
            return Err(StoreError::Unavailable(format!("{} is unreachable", kind)));
        }
        Ok(())
    }

    fn collection_mut(&mut self, kind: EntityKind) -> &mut BTreeMap<ObjectId, Document> {
        self.collections.entry(kind).or_default()
    }
}

/// 메모리 문서 저장소
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    latency: Mutex<Option<Duration>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 특정 컬렉션에 대한 모든 연산을 실패시킵니다.
    pub fn set_unavailable(&self, kind: EntityKind, unavailable: bool) {
        if let Ok(mut state) = self.state.lock() {
            if unavailable {
                state.unavailable.insert(kind);
            } else {
                state.unavailable.remove(&kind);
            }
        }
    }

    /// 모든 연산(ping 포함)을 실패시킵니다.
    pub fn set_offline(&self, offline: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.offline = offline;
        }
    }

    /// 모든 연산 앞에 지연을 추가합니다.
    pub fn set_latency(&self, latency: Option<Duration>) {
        if let Ok(mut current) = self.latency.lock() {
            *current = latency;
        }
    }

    /// 컬렉션의 문서 수
    pub fn count(&self, kind: EntityKind) -> usize {
        self.state
            .lock()
            .map(|state| state.collections.get(&kind).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    /// 문서를 직접 조회합니다.
    pub fn document(&self, kind: EntityKind, id: ObjectId) -> Option<Document> {
        self.state
            .lock()
            .ok()
            .and_then(|state| state.collections.get(&kind).and_then(|c| c.get(&id).cloned()))
    }

    /// 컬렉션에 정의된 유니크 인덱스 수
    pub fn index_count(&self, kind: EntityKind) -> usize {
        self.state
            .lock()
            .map(|state| state.indexes.get(&kind).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn delay(&self) {
        let latency = self.latency.lock().ok().and_then(|l| *l);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn upsert(&self, kind: EntityKind, id: ObjectId, mut document: Document) -> StoreResult<()> {
        self.delay().await;
        let mut state = self.lock()?;
        state.check(kind)?;

        document.insert("_id", id);

        let unique_fields: Vec<(String, String)> = state
            .indexes
            .get(&kind)
            .map(|indexes| indexes.iter().map(|(n, f)| (n.clone(), f.clone())).collect())
            .unwrap_or_default();

        let collection = state.collection_mut(kind);
        for (name, field) in &unique_fields {
            let Some(value) = document.get(field) else { continue };
            let conflict = collection
                .iter()
                .any(|(other_id, other)| *other_id != id && other.get(field) == Some(value));
            if conflict {
                return Err(StoreError::DuplicateKey(format!(
                    "E11000 duplicate key error collection: {} index: {} dup key: {{ {}: {} }}",
                    kind, name, field, value
                )));
            }
        }

        collection.insert(id, document);
        Ok(())
    }

    async fn find_one(&self, kind: EntityKind, field: &str, value: Bson) -> StoreResult<Option<Document>> {
        self.delay().await;
        let mut state = self.lock()?;
        state.check(kind)?;

        Ok(state
            .collection_mut(kind)
            .values()
            .find(|document| document.get(field) == Some(&value))
            .cloned())
    }

    async fn find_by_ids(&self, kind: EntityKind, ids: &[ObjectId]) -> StoreResult<Vec<Document>> {
        self.delay().await;
        let mut state = self.lock()?;
        state.check(kind)?;

        // MongoDB 의 `$in` 처럼 요청 순서가 아닌 저장 순서로 반환합니다
        Ok(state
            .collection_mut(kind)
            .iter()
            .filter(|(id, _)| ids.contains(*id))
            .map(|(_, document)| document.clone())
            .collect())
    }

    async fn find_all(&self, kind: EntityKind) -> StoreResult<Vec<Document>> {
        self.delay().await;
        let mut state = self.lock()?;
        state.check(kind)?;

        Ok(state.collection_mut(kind).values().cloned().collect())
    }

    async fn delete_one(&self, kind: EntityKind, id: ObjectId) -> StoreResult<u64> {
        self.delay().await;
        let mut state = self.lock()?;
        state.check(kind)?;

        Ok(state.collection_mut(kind).remove(&id).map_or(0, |_| 1))
    }

    async fn delete_many(&self, kind: EntityKind, ids: &[ObjectId]) -> StoreResult<u64> {
        self.delay().await;
        let mut state = self.lock()?;
        state.check(kind)?;

        let collection = state.collection_mut(kind);
        let deleted = ids.iter().filter(|id| collection.remove(*id).is_some()).count();
        Ok(deleted as u64)
    }

    async fn add_to_set(&self, kind: EntityKind, id: ObjectId, field: &str, value: ObjectId) -> StoreResult<u64> {
        self.delay().await;
        let mut state = self.lock()?;
        state.check(kind)?;

        let Some(document) = state.collection_mut(kind).get_mut(&id) else {
            return Ok(0);
        };

        let value = Bson::ObjectId(value);
        match document.get_array_mut(field) {
            Ok(values) => {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
            Err(_) => {
                document.insert(field, vec![value]);
            }
        }
        Ok(1)
    }

    async fn pull_from_all(&self, kind: EntityKind, field: &str, value: ObjectId) -> StoreResult<u64> {
        self.delay().await;
        let mut state = self.lock()?;
        state.check(kind)?;

        let value = Bson::ObjectId(value);
        let mut modified = 0;
        for document in state.collection_mut(kind).values_mut() {
            if let Ok(values) = document.get_array_mut(field) {
                let before = values.len();
                values.retain(|v| v != &value);
                if values.len() != before {
                    modified += 1;
                }
            }
        }
        Ok(modified)
    }

    async fn ensure_unique_index(&self, kind: EntityKind, field: &str, name: &str) -> StoreResult<()> {
        self.delay().await;
        let mut state = self.lock()?;
        state.check(kind)?;

        // 같은 필드의 유니크 인덱스가 다른 이름으로 있어도 이미 충족된 것으로 봅니다
        let indexes = state.indexes.entry(kind).or_default();
        if !indexes.values().any(|existing| existing == field) {
            indexes.insert(name.to_string(), field.to_string());
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.delay().await;
        let state = self.lock()?;
        if state.offline {
            return Err(StoreError::Unavailable("server selection timeout".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[actix_web::test]
    async fn test_unique_index_rejects_duplicates_after_creation() {
        let store = MemoryStore::new();
        let (a, b) = (ObjectId::new(), ObjectId::new());

        store.upsert(EntityKind::Customers, a, doc! { "username": "u1" }).await.unwrap();
        store.ensure_unique_index(EntityKind::Customers, "username", "username_1").await.unwrap();

        let err = store.upsert(EntityKind::Customers, b, doc! { "username": "u1" }).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(_)));

        // 같은 문서의 교체는 충돌이 아닙니다
        store.upsert(EntityKind::Customers, a, doc! { "username": "u1", "email": "x" }).await.unwrap();
        assert_eq!(store.count(EntityKind::Customers), 1);
    }

    #[actix_web::test]
    async fn test_existing_index_under_other_name_satisfies_constraint() {
        let store = MemoryStore::new();
        store.ensure_unique_index(EntityKind::Customers, "username", "legacy_username").await.unwrap();

        store.ensure_unique_index(EntityKind::Customers, "username", "username_1").await.unwrap();
        assert_eq!(store.index_count(EntityKind::Customers), 1);

        store.upsert(EntityKind::Customers, ObjectId::new(), doc! { "username": "u1" }).await.unwrap();
        let err = store
            .upsert(EntityKind::Customers, ObjectId::new(), doc! { "username": "u1" })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(_)));
    }

    #[actix_web::test]
    async fn test_add_to_set_has_set_semantics() {
        let store = MemoryStore::new();
        let (user, card) = (ObjectId::new(), ObjectId::new());
        store.upsert(EntityKind::Customers, user, doc! { "username": "u1" }).await.unwrap();

        assert_eq!(store.add_to_set(EntityKind::Customers, user, "cards", card).await.unwrap(), 1);
        assert_eq!(store.add_to_set(EntityKind::Customers, user, "cards", card).await.unwrap(), 1);

        let document = store.document(EntityKind::Customers, user).unwrap();
        assert_eq!(document.get_array("cards").unwrap().len(), 1);

        // 없는 문서는 일치 0건
        assert_eq!(store.add_to_set(EntityKind::Customers, ObjectId::new(), "cards", card).await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn test_pull_from_all_touches_only_holders() {
        let store = MemoryStore::new();
        let (u1, u2, u3) = (ObjectId::new(), ObjectId::new(), ObjectId::new());
        let (shared, other) = (ObjectId::new(), ObjectId::new());

        store.upsert(EntityKind::Customers, u1, doc! { "addresses": [shared, other] }).await.unwrap();
        store.upsert(EntityKind::Customers, u2, doc! { "addresses": [shared] }).await.unwrap();
        store.upsert(EntityKind::Customers, u3, doc! { "addresses": [other] }).await.unwrap();

        let modified = store.pull_from_all(EntityKind::Customers, "addresses", shared).await.unwrap();
        assert_eq!(modified, 2);

        let first = store.document(EntityKind::Customers, u1).unwrap();
        assert_eq!(first.get_array("addresses").unwrap(), &vec![Bson::ObjectId(other)]);
    }

    #[actix_web::test]
    async fn test_unavailable_collection_fails_only_that_collection() {
        let store = MemoryStore::new();
        store.set_unavailable(EntityKind::Cards, true);

        assert!(store.find_all(EntityKind::Cards).await.is_err());
        assert!(store.find_all(EntityKind::Addresses).await.is_ok());
        assert!(store.ping().await.is_ok());

        store.set_offline(true);
        assert!(store.ping().await.is_err());
    }
}
