//! 문서 저장소 포트
//!
//! 리포지토리가 저장 백엔드에 요구하는 연산을 정의합니다.
//! 모든 연산은 하나의 문서 또는 하나의 컬렉션에 대해서만 동작하며,
//! 여러 문서에 걸친 원자성은 제공하지 않습니다.
//!
//! # 구현체
//!
//! - [`MongoStore`](super::mongo_store::MongoStore) - 공식 MongoDB 드라이버 기반
//! - [`MemoryStore`](super::memory_store::MemoryStore) - 프로세스 내 구현 (테스트용)

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use thiserror::Error;
use super::entity_kind::EntityKind;

/// 저장소 연산 에러
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// 유니크 인덱스 위반
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// 연결 실패, 타임아웃, 예상하지 못한 서버 응답
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// 컬렉션 단위 문서 저장소
///
/// 문서는 `_id` 필드에 [`ObjectId`] 를 가집니다.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// `_id` 가 `id` 인 문서를 `document` 로 교체하고, 없으면 삽입합니다.
    async fn upsert(&self, kind: EntityKind, id: ObjectId, document: Document) -> StoreResult<()>;

    /// `field == value` 를 만족하는 첫 문서
    async fn find_one(&self, kind: EntityKind, field: &str, value: Bson) -> StoreResult<Option<Document>>;

    /// `_id` 가 `ids` 에 포함된 모든 문서. 없는 ID는 결과에서 빠집니다.
    async fn find_by_ids(&self, kind: EntityKind, ids: &[ObjectId]) -> StoreResult<Vec<Document>>;

    /// 컬렉션의 모든 문서
    async fn find_all(&self, kind: EntityKind) -> StoreResult<Vec<Document>>;

    /// 삭제된 문서 수를 반환합니다 (0 또는 1).
    async fn delete_one(&self, kind: EntityKind, id: ObjectId) -> StoreResult<u64>;

    /// 삭제된 문서 수를 반환합니다.
    async fn delete_many(&self, kind: EntityKind, ids: &[ObjectId]) -> StoreResult<u64>;

    /// 문서 하나의 배열 필드에 값을 집합 의미로 추가합니다 (`$addToSet`).
    ///
    /// 일치한 문서 수를 반환합니다.
    async fn add_to_set(&self, kind: EntityKind, id: ObjectId, field: &str, value: ObjectId) -> StoreResult<u64>;

    /// 컬렉션의 모든 문서에서 배열 필드의 값을 제거합니다 (`$pull`).
    ///
    /// 변경된 문서 수를 반환합니다.
    async fn pull_from_all(&self, kind: EntityKind, field: &str, value: ObjectId) -> StoreResult<u64>;

    /// 유니크 인덱스를 생성합니다. 이미 같은 인덱스가 있으면 아무 일도 하지 않습니다.
    async fn ensure_unique_index(&self, kind: EntityKind, field: &str, name: &str) -> StoreResult<()>;

    async fn ping(&self) -> StoreResult<()>;
}
