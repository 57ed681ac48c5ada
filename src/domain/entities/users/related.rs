//! 사용자에 연결된 하위 엔티티(주소, 카드) 표현
//!
//! 고객 문서는 주소와 카드를 ID 목록으로만 참조합니다. 조회 직후의 사용자는
//! ID만 가진 placeholder 를 들고 있고, 속성 해석(`resolve_attributes`) 이후에야
//! 완전한 엔티티를 들고 있게 됩니다. 두 상태를 [`Related`] 로 구분하여
//! 호출자가 현재 어떤 상태인지 타입으로 확인할 수 있게 합니다.
//!
//! # JSON 표현
//!
//! ```json
//! { "id": "57a98d98e4b00679b4a830af" }                       // Reference
//! { "id": "57a9...", "street": "Main St", "city": "Seoul" }   // Resolved
//! ```
//!
//! 역직렬화는 항상 `Resolved` 를 생성합니다. 외부 입력은 저장할 데이터이지
//! 아직 해석되지 않은 참조가 아니기 때문입니다.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 문자열 식별자를 가진 도메인 엔티티
pub trait Identified {
    /// 엔티티의 식별자. 저장된 적 없는 엔티티는 빈 문자열입니다.
    fn id(&self) -> &str;

    /// 저장소가 할당한 식별자를 기록합니다.
    fn set_id(&mut self, id: String);
}

/// 사용자에 연결된 하위 엔티티
#[derive(Debug, Clone, PartialEq)]
pub enum Related<T> {
    /// ID만 알고 있는 placeholder
    Reference(String),
    /// 모든 속성이 채워진 엔티티
    Resolved(T),
}

impl<T: Identified> Related<T> {
    /// 참조 또는 엔티티의 식별자
    pub fn id(&self) -> &str {
        match self {
            Related::Reference(id) => id,
            Related::Resolved(entity) => entity.id(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Related::Resolved(_))
    }

    pub fn as_resolved(&self) -> Option<&T> {
        match self {
            Related::Resolved(entity) => Some(entity),
            Related::Reference(_) => None,
        }
    }

    pub fn into_resolved(self) -> Option<T> {
        match self {
            Related::Resolved(entity) => Some(entity),
            Related::Reference(_) => None,
        }
    }
}

impl<T> From<T> for Related<T> {
    fn from(entity: T) -> Self {
        Related::Resolved(entity)
    }
}

impl<T: Serialize> Serialize for Related<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Related::Reference(id) => {
                let mut state = serializer.serialize_struct("Reference", 1)?;
                state.serialize_field("id", id)?;
                state.end()
            }
            Related::Resolved(entity) => entity.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Related<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Related::Resolved)
    }
}
