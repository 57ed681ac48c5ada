//! 저장 레코드 형태
//!
//! 각 컬렉션에 실제로 기록되는 문서의 모양입니다. 도메인 엔티티와 달리
//! 식별자는 네이티브 [`ObjectId`] 이며, 고객 레코드는 주소와 카드를 ID 목록으로만 가집니다.
//!
//! 필드 이름은 기존 데이터와의 호환을 위해 모두 소문자입니다
//! (`firstname`, `longnum` 등).

use mongodb::bson::{self, oid::ObjectId, Document};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use crate::db::EntityKind;
use super::super::error::{RepositoryError, RepositoryResult};

/// 한 컬렉션에 저장되는 레코드
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    /// 레코드가 저장되는 컬렉션
    const KIND: EntityKind;

    fn id(&self) -> ObjectId;

    fn to_document(&self) -> RepositoryResult<Document> {
        bson::to_document(self).map_err(|e| {
            RepositoryError::StorageUnavailable(format!("cannot encode {} record: {}", Self::KIND, e))
        })
    }

    fn from_document(document: Document) -> RepositoryResult<Self> {
        bson::from_document(document).map_err(|e| {
            RepositoryError::StorageUnavailable(format!("malformed {} record: {}", Self::KIND, e))
        })
    }
}

/// `customers` 컬렉션 문서
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "firstname", default)]
    pub first_name: String,
    #[serde(rename = "lastname", default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub addresses: Vec<ObjectId>,
    #[serde(default)]
    pub cards: Vec<ObjectId>,
}

impl Record for CustomerRecord {
    const KIND: EntityKind = EntityKind::Customers;

    fn id(&self) -> ObjectId {
        self.id
    }
}

/// `addresses` 컬렉션 문서
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postcode: String,
}

impl Record for AddressRecord {
    const KIND: EntityKind = EntityKind::Addresses;

    fn id(&self) -> ObjectId {
        self.id
    }
}

/// `cards` 컬렉션 문서
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "longnum", default)]
    pub long_num: String,
    #[serde(default)]
    pub expires: String,
    #[serde(default)]
    pub ccv: String,
}

impl Record for CardRecord {
    const KIND: EntityKind = EntityKind::Cards;

    fn id(&self) -> ObjectId {
        self.id
    }
}
