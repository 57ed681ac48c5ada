//! MongoDB 기반 문서 저장소
//!
//! 공식 드라이버로 [`DocumentStore`] 를 구현합니다.
//!
//! | 연산 | MongoDB 명령 |
//! |------|-------------|
//! | `upsert` | `replaceOne({_id}, doc, {upsert: true})` |
//! | `find_by_ids` | `find({_id: {$in: ids}})` |
//! | `add_to_set` | `updateOne({_id}, {$addToSet: {field: id}})` |
//! | `pull_from_all` | `updateMany({}, {$pull: {field: id}})` |
//! | `ensure_unique_index` | `createIndex({field: 1}, {unique: true})`, 충돌 시 `listIndexes` |

use async_trait::async_trait;
use futures_util::TryStreamExt;
use log::debug;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Collection, IndexModel};
use super::entity_kind::EntityKind;
use super::store::{DocumentStore, StoreError, StoreResult};
use super::Database;

/// MongoDB 중복 키 에러 코드
const DUPLICATE_KEY_CODE: i32 = 11000;

/// 같은 키의 인덱스가 다른 이름/옵션으로 이미 있을 때의 에러 코드
/// (IndexOptionsConflict, IndexKeySpecsConflict)
const INDEX_CONFLICT_CODES: [i32; 2] = [85, 86];

/// MongoDB 문서 저장소
#[derive(Clone)]
pub struct MongoStore {
    database: mongodb::Database,
}

impl MongoStore {
    pub fn new(database: &Database) -> Self {
        Self {
            database: database.get_database(),
        }
    }

    fn collection(&self, kind: EntityKind) -> Collection<Document> {
        self.database.collection::<Document>(kind.collection_name())
    }

    /// `field` 하나에 대한 오름차순 유니크 인덱스가 이름과 상관없이 있는지 확인합니다.
    async fn has_unique_index(&self, kind: EntityKind, field: &str) -> StoreResult<bool> {
        let indexes: Vec<IndexModel> = self.collection(kind)
            .list_indexes()
            .await
            .map_err(map_error)?
            .try_collect()
            .await
            .map_err(map_error)?;

        Ok(indexes.iter().any(|index| {
            let unique = index.options.as_ref().and_then(|o| o.unique).unwrap_or(false);
            unique && index.keys.len() == 1 && is_ascending(index.keys.get(field))
        }))
    }
}

fn is_ascending(direction: Option<&Bson>) -> bool {
    match direction {
        Some(Bson::Int32(1)) | Some(Bson::Int64(1)) => true,
        Some(Bson::Double(value)) => *value == 1.0,
        _ => false,
    }
}

fn index_conflict(err: &mongodb::error::Error) -> bool {
    matches!(err.kind.as_ref(), ErrorKind::Command(e) if INDEX_CONFLICT_CODES.contains(&e.code))
}

/// 드라이버 에러를 저장소 에러로 변환합니다.
///
/// 중복 키 위반만 구분하고 나머지는 모두 `Unavailable` 로 취급합니다.
fn map_error(err: mongodb::error::Error) -> StoreError {
    let duplicate = match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY_CODE,
        _ => false,
    };

    if duplicate {
        StoreError::DuplicateKey(err.to_string())
    } else {
        StoreError::Unavailable(err.to_string())
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn upsert(&self, kind: EntityKind, id: ObjectId, document: Document) -> StoreResult<()> {
        self.collection(kind)
            .replace_one(doc! { "_id": id }, document)
            .upsert(true)
            .await
            .map_err(map_error)?;
        Ok(())
    }

    async fn find_one(&self, kind: EntityKind, field: &str, value: Bson) -> StoreResult<Option<Document>> {
        self.collection(kind)
            .find_one(doc! { field: value })
            .await
            .map_err(map_error)
    }

    async fn find_by_ids(&self, kind: EntityKind, ids: &[ObjectId]) -> StoreResult<Vec<Document>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let cursor = self.collection(kind)
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .await
            .map_err(map_error)?;

        cursor.try_collect().await.map_err(map_error)
    }

    async fn find_all(&self, kind: EntityKind) -> StoreResult<Vec<Document>> {
        let cursor = self.collection(kind)
            .find(doc! {})
            .await
            .map_err(map_error)?;

        cursor.try_collect().await.map_err(map_error)
    }

    async fn delete_one(&self, kind: EntityKind, id: ObjectId) -> StoreResult<u64> {
        let result = self.collection(kind)
            .delete_one(doc! { "_id": id })
            .await
            .map_err(map_error)?;
        Ok(result.deleted_count)
    }

    async fn delete_many(&self, kind: EntityKind, ids: &[ObjectId]) -> StoreResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = self.collection(kind)
            .delete_many(doc! { "_id": { "$in": ids.to_vec() } })
            .await
            .map_err(map_error)?;
        Ok(result.deleted_count)
    }

    async fn add_to_set(&self, kind: EntityKind, id: ObjectId, field: &str, value: ObjectId) -> StoreResult<u64> {
        let result = self.collection(kind)
            .update_one(doc! { "_id": id }, doc! { "$addToSet": { field: value } })
            .await
            .map_err(map_error)?;
        Ok(result.matched_count)
    }

    async fn pull_from_all(&self, kind: EntityKind, field: &str, value: ObjectId) -> StoreResult<u64> {
        let result = self.collection(kind)
            .update_many(doc! {}, doc! { "$pull": { field: value } })
            .await
            .map_err(map_error)?;
        Ok(result.modified_count)
    }

    async fn ensure_unique_index(&self, kind: EntityKind, field: &str, name: &str) -> StoreResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { field: 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name(name.to_string())
                .build())
            .build();

        // 동일한 키와 옵션의 인덱스가 이미 있으면 서버가 그대로 성공을 반환합니다
        match self.collection(kind).create_index(index).await {
            Ok(_) => {}
            Err(err) if index_conflict(&err) => {
                if !self.has_unique_index(kind, field).await? {
                    return Err(map_error(err));
                }
                debug!("{}.{} 에 다른 이름의 유니크 인덱스가 이미 있습니다", kind, field);
            }
            Err(err) => return Err(map_error(err)),
        }

        debug!("unique index {} ensured on {}.{}", name, kind, field);
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(map_error)?;
        Ok(())
    }
}
