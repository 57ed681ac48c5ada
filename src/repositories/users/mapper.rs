//! 도메인 엔티티 ↔ 저장 레코드 변환
//!
//! 레코드로 변환할 때 새로 생성된 ID를 넘기면 그 ID를 사용하고,
//! 넘기지 않으면 엔티티가 가진 ID를 해석하여 사용합니다.
//! 사용자 레코드는 절대 하위 엔티티를 내장하지 않고 ID 목록만 가집니다.

use mongodb::bson::oid::ObjectId;
use crate::domain::entities::users::{Address, Card, Identified, Related, User};
use super::ids;
use super::records::{AddressRecord, CardRecord, CustomerRecord, Record};
use super::super::error::RepositoryResult;

fn assign_id(current: &str, generated: Option<ObjectId>) -> RepositoryResult<ObjectId> {
    match generated {
        Some(id) => Ok(id),
        None => ids::decode(current),
    }
}

/// 사용자 문서가 ID 목록으로 참조하는 레코드 (주소, 카드)
pub trait AttributeRecord: Record + Sized {
    type Entity: Identified + Clone + Send;

    /// 고객 문서에서 이 레코드를 가리키는 필드
    const FIELD: &'static str;

    fn from_entity(entity: &Self::Entity, id: Option<ObjectId>) -> RepositoryResult<Self>;

    fn into_entity(self) -> Self::Entity;
}

impl AttributeRecord for AddressRecord {
    type Entity = Address;
    const FIELD: &'static str = "addresses";

    fn from_entity(address: &Address, id: Option<ObjectId>) -> RepositoryResult<Self> {
        Ok(Self {
            id: assign_id(&address.id, id)?,
            street: address.street.clone(),
            number: address.number.clone(),
            country: address.country.clone(),
            city: address.city.clone(),
            postcode: address.postcode.clone(),
        })
    }

    fn into_entity(self) -> Address {
        Address {
            id: ids::encode(&self.id),
            street: self.street,
            number: self.number,
            country: self.country,
            city: self.city,
            postcode: self.postcode,
        }
    }
}

impl AttributeRecord for CardRecord {
    type Entity = Card;
    const FIELD: &'static str = "cards";

    fn from_entity(card: &Card, id: Option<ObjectId>) -> RepositoryResult<Self> {
        Ok(Self {
            id: assign_id(&card.id, id)?,
            long_num: card.long_num.clone(),
            expires: card.expires.clone(),
            ccv: card.ccv.clone(),
        })
    }

    fn into_entity(self) -> Card {
        Card {
            id: ids::encode(&self.id),
            long_num: self.long_num,
            expires: self.expires,
            ccv: self.ccv,
        }
    }
}

impl CustomerRecord {
    /// 사용자를 고객 레코드로 변환합니다.
    ///
    /// 주소/카드 목록은 호출자가 이미 저장하거나 검증한 ID를 넘깁니다.
    pub fn from_user(
        user: &User,
        id: Option<ObjectId>,
        addresses: Vec<ObjectId>,
        cards: Vec<ObjectId>,
    ) -> RepositoryResult<Self> {
        Ok(Self {
            id: assign_id(&user.id, id)?,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            password: user.password.clone(),
            addresses,
            cards,
        })
    }

    /// 주소와 카드가 placeholder 인 사용자로 변환합니다.
    pub fn into_user(self) -> User {
        User {
            id: ids::encode(&self.id),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            username: self.username,
            password: self.password,
            addresses: self.addresses.iter().map(|id| Related::Reference(ids::encode(id))).collect(),
            cards: self.cards.iter().map(|id| Related::Reference(ids::encode(id))).collect(),
            links: Vec::new(),
        }
    }
}
