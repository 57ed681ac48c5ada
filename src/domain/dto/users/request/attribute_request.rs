//! 주소/카드 생성 요청 DTO
//!
//! `POST /addresses`, `POST /cards` 는 엔티티 필드와 함께 선택적인
//! `userID` 를 받습니다. 비어 있으면 사용자에 연결하지 않습니다.

use serde::{Deserialize, Serialize};
use crate::domain::entities::users::{Address, Card};

/// `POST /addresses` 본문
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAddressRequest {
    #[serde(rename = "userID", default)]
    pub user_id: String,

    #[serde(flatten)]
    pub address: Address,
}

/// `POST /cards` 본문
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCardRequest {
    #[serde(rename = "userID", default)]
    pub user_id: String,

    #[serde(flatten)]
    pub card: Card,
}

impl CreateAddressRequest {
    pub fn owner(&self) -> Option<&str> {
        non_empty(&self.user_id)
    }
}

impl CreateCardRequest {
    pub fn owner(&self) -> Option<&str> {
        non_empty(&self.user_id)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    Some(value).filter(|v| !v.is_empty())
}
