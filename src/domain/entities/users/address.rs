//! Address Entity

use serde::{Deserialize, Serialize};
use super::related::Identified;

/// 배송 주소
///
/// 독립된 `addresses` 컬렉션에 저장되며, 0명 이상의 사용자가 ID로 참조합니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    /// 저장소가 할당한 식별자 (저장 전에는 빈 문자열)
    pub id: String,
    pub street: String,
    pub number: String,
    pub country: String,
    pub city: String,
    pub postcode: String,
}

impl Identified for Address {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
