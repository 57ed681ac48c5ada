//! 저장소가 관리하는 엔티티 종류

use std::fmt;
use std::str::FromStr;

/// 세 개의 컬렉션 중 하나
///
/// `Addresses` 와 `Cards` 의 이름은 고객 문서에서 참조 목록 필드의 이름이기도 합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Customers,
    Addresses,
    Cards,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Customers, EntityKind::Addresses, EntityKind::Cards];

    /// MongoDB 컬렉션 이름
    pub fn collection_name(self) -> &'static str {
        match self {
            EntityKind::Customers => "customers",
            EntityKind::Addresses => "addresses",
            EntityKind::Cards => "cards",
        }
    }

    /// 고객 문서에서 이 엔티티를 가리키는 참조 목록 필드 이름
    ///
    /// 고객 자신은 다른 문서가 참조하지 않으므로 `None` 입니다.
    pub fn reference_field(self) -> Option<&'static str> {
        match self {
            EntityKind::Customers => None,
            EntityKind::Addresses => Some("addresses"),
            EntityKind::Cards => Some("cards"),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection_name())
    }
}

/// 알 수 없는 엔티티 이름
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entity kind: {0}")]
pub struct UnknownEntityKind(pub String);

impl FromStr for EntityKind {
    type Err = UnknownEntityKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customers" => Ok(EntityKind::Customers),
            "addresses" => Ok(EntityKind::Addresses),
            "cards" => Ok(EntityKind::Cards),
            other => Err(UnknownEntityKind(other.to_string())),
        }
    }
}
