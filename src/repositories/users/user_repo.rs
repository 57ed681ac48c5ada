//! # 사용자 리포지토리 구현
//!
//! 고객, 주소, 카드 세 컬렉션에 대한 데이터 액세스 계층입니다.
//! 고객 문서는 주소와 카드를 ID 목록으로만 참조하며, 이 리포지토리가
//! 참조 목록과 실제 레코드를 일관되게 유지합니다.
//!
//! ## 특징
//!
//! - **데드라인**: 모든 공개 연산은 설정된 시간 안에 끝나야 하며, 초과 시
//!   [`RepositoryError::StorageUnavailable`] 을 반환합니다.
//! - **식별자 검증 우선**: 외부 ID는 어떤 쓰기보다 먼저 검증됩니다.
//! - **보상 삭제**: 트랜잭션을 사용하지 않습니다. 다단계 쓰기가 중간에 실패하면
//!   이미 생성한 레코드를 최선의 노력으로 삭제합니다.
//! - **부분 성공**: 사용자 생성 중 일부 주소/카드만 실패하면 사용자는 저장되고
//!   [`RepositoryError::PartialWrite`] 로 결과와 실패 목록을 함께 돌려줍니다.

use std::collections::HashMap;
use std::future::Future;
use std::mem;
use std::sync::Arc;
use std::time::Duration;
use log::{debug, info, warn};
use mongodb::bson::{oid::ObjectId, Bson};
use crate::db::{DocumentStore, EntityKind};
use crate::domain::entities::users::{Address, Card, Identified, Related, User};
use super::ids;
use super::mapper::AttributeRecord;
use super::records::{AddressRecord, CardRecord, CustomerRecord, Record};
use super::super::error::{RepositoryError, RepositoryResult};

/// 사용자명 유니크 인덱스 이름
///
/// MongoDB 기본 이름(`필드_1`)을 그대로 써서 기존 데이터베이스의 인덱스와 겹치지 않게 합니다.
pub const USERNAME_INDEX: &str = "username_1";

/// 사용자 데이터 액세스 리포지토리
///
/// 저장소는 [`DocumentStore`] 포트로 주입됩니다. 운영에서는
/// [`MongoStore`](crate::db::MongoStore), 테스트에서는
/// [`MemoryStore`](crate::db::MemoryStore) 를 사용합니다.
///
/// ## 사용 예제
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use crate::db::{Database, MongoStore};
/// use crate::repositories::users::UserRepository;
///
/// let database = Database::connect(&uri, timeout).await?;
/// let repo = UserRepository::new(Arc::new(MongoStore::new(&database)), timeout);
/// repo.ensure_constraints().await?;
///
/// let created = repo.create_user(User::new("u1", "p")).await?;
/// let mut found = repo.get_user(&created.id).await?;
/// repo.resolve_attributes(&mut found).await?;
/// ```
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
    timeout: Duration,
}

/// 쓰기 전에 검증을 마친 속성 항목
enum Pending<T> {
    /// 기존 레코드를 가리키는 placeholder (디코드한 ID, 원래 문자열)
    Existing(ObjectId, String),
    /// 새로 생성할 엔티티
    New(T),
}

/// 사용자 생성 중 한 종류의 속성(주소 또는 카드)을 기록한 결과
struct AttributeWrite<T> {
    /// 결과 사용자에 남길 항목 (실패한 항목은 빠짐)
    entries: Vec<Related<T>>,
    /// 고객 문서에 기록할 ID (새로 만든 것 + 기존 placeholder)
    linked: Vec<ObjectId>,
    /// 이번 호출에서 새로 만든 레코드 ID (보상 삭제 대상)
    created: Vec<ObjectId>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// 연산 하나를 데드라인 안에서 실행합니다.
    async fn within<T>(
        &self,
        operation: &str,
        work: impl Future<Output = RepositoryResult<T>>,
    ) -> RepositoryResult<T> {
        match tokio::time::timeout(self.timeout, work).await {
            Ok(result) => result,
            Err(_) => {
                warn!("⏱️ {} 데드라인 초과 ({:?})", operation, self.timeout);
                Err(RepositoryError::StorageUnavailable(format!(
                    "{} exceeded deadline of {:?}",
                    operation, self.timeout
                )))
            }
        }
    }

    // ---------------------------------------------------------------
    // 사용자
    // ---------------------------------------------------------------

    /// 사용자와 함께 넘어온 주소/카드를 저장하고 사용자 레코드를 생성합니다.
    ///
    /// - `Resolved` 항목은 새 레코드로 생성됩니다.
    /// - `Reference` 항목은 기존 레코드로 보고 ID만 연결합니다.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat`: placeholder ID 형식 오류 (아무것도 쓰지 않음)
    /// - `DuplicateUsername`: 사용자명 중복 (생성한 주소/카드는 보상 삭제)
    /// - `StorageUnavailable`: 고객 레코드 저장 실패 (생성한 주소/카드는 보상 삭제)
    /// - `PartialWrite`: 고객은 저장되었으나 일부 주소/카드 생성 실패
    pub async fn create_user(&self, user: User) -> RepositoryResult<User> {
        self.within("create_user", self.insert_user(user)).await
    }

    async fn insert_user(&self, mut user: User) -> RepositoryResult<User> {
        let addresses = decode_references(mem::take(&mut user.addresses))?;
        let cards = decode_references(mem::take(&mut user.cards))?;

        let mut failures = Vec::new();
        let addresses = self.write_attributes::<AddressRecord>(addresses, &mut failures).await;
        let cards = self.write_attributes::<CardRecord>(cards, &mut failures).await;

        let id = ids::generate();
        let stored = match CustomerRecord::from_user(&user, Some(id), addresses.linked, cards.linked) {
            Ok(record) => self.insert_record(&record).await,
            Err(err) => Err(err),
        };

        if let Err(err) = stored {
            warn!("❌ 고객 저장 실패, 생성한 주소/카드를 되돌립니다: {}", err);
            self.discard(EntityKind::Addresses, &addresses.created).await;
            self.discard(EntityKind::Cards, &cards.created).await;
            return Err(err);
        }

        user.id = ids::encode(&id);
        user.addresses = addresses.entries;
        user.cards = cards.entries;

        if failures.is_empty() {
            info!("✅ 사용자 생성: {} ({})", user.username, user.id);
            Ok(user)
        } else {
            warn!("⚠️ 사용자 {} 생성 중 속성 {}건 실패", user.id, failures.len());
            Err(RepositoryError::PartialWrite {
                user: Box::new(user),
                failures,
            })
        }
    }

    /// 속성 목록을 기록합니다. 항목 하나의 실패는 `failures` 에 모으고 계속 진행합니다.
    async fn write_attributes<R: AttributeRecord>(
        &self,
        entries: Vec<Pending<R::Entity>>,
        failures: &mut Vec<RepositoryError>,
    ) -> AttributeWrite<R::Entity> {
        let mut write = AttributeWrite {
            entries: Vec::with_capacity(entries.len()),
            linked: Vec::with_capacity(entries.len()),
            created: Vec::new(),
        };

        for entry in entries {
            match entry {
                Pending::Existing(id, text) => {
                    write.linked.push(id);
                    write.entries.push(Related::Reference(text));
                }
                Pending::New(mut entity) => {
                    let id = ids::generate();
                    match self.insert_entity::<R>(&entity, id).await {
                        Ok(()) => {
                            entity.set_id(ids::encode(&id));
                            write.linked.push(id);
                            write.created.push(id);
                            write.entries.push(Related::Resolved(entity));
                        }
                        Err(err) => {
                            warn!("{} 생성 실패: {}", R::KIND, err);
                            failures.push(err);
                        }
                    }
                }
            }
        }

        write
    }

    /// 식별자로 사용자를 조회합니다. 주소와 카드는 placeholder 상태입니다.
    pub async fn get_user(&self, id: &str) -> RepositoryResult<User> {
        self.within("get_user", async {
            let oid = ids::decode(id)?;
            self.find_record::<CustomerRecord>(oid)
                .await?
                .map(CustomerRecord::into_user)
                .ok_or_else(|| RepositoryError::NotFound(format!("user {}", id)))
        })
        .await
    }

    /// 사용자명(대소문자 구분, 정확히 일치)으로 조회합니다.
    pub async fn get_user_by_username(&self, username: &str) -> RepositoryResult<User> {
        self.within("get_user_by_username", async {
            let document = self
                .store
                .find_one(EntityKind::Customers, "username", Bson::String(username.to_string()))
                .await?;

            document
                .map(CustomerRecord::from_document)
                .transpose()?
                .map(CustomerRecord::into_user)
                .ok_or_else(|| RepositoryError::NotFound(format!("username {}", username)))
        })
        .await
    }

    /// 모든 사용자. 주소와 카드는 placeholder 상태입니다.
    pub async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        self.within("list_users", async {
            let records = self.all_records::<CustomerRecord>().await?;
            Ok(records.into_iter().map(CustomerRecord::into_user).collect())
        })
        .await
    }

    /// 사용자의 placeholder 를 실제 주소/카드로 교체합니다.
    ///
    /// - 형식이 잘못된 ID가 하나라도 있으면 아무것도 바꾸지 않고 `InvalidFormat`
    /// - 존재하지 않는 ID는 결과에서 조용히 빠집니다 (순서는 참조 순서 유지)
    /// - 한 종류의 조회가 실패하면 그 목록만 그대로 두고 경고를 남깁니다
    pub async fn resolve_attributes(&self, user: &mut User) -> RepositoryResult<()> {
        self.within("resolve_attributes", async {
            let address_ids = ids::decode_all(user.addresses.iter().map(|entry| entry.id()))?;
            let card_ids = ids::decode_all(user.cards.iter().map(|entry| entry.id()))?;

            if let Some(addresses) = self.resolve_kind::<AddressRecord>(&user.id, &address_ids).await {
                user.addresses = addresses;
            }
            if let Some(cards) = self.resolve_kind::<CardRecord>(&user.id, &card_ids).await {
                user.cards = cards;
            }
            Ok(())
        })
        .await
    }

    async fn resolve_kind<R: AttributeRecord>(
        &self,
        owner: &str,
        wanted: &[ObjectId],
    ) -> Option<Vec<Related<R::Entity>>> {
        if wanted.is_empty() {
            return Some(Vec::new());
        }

        match self.find_records::<R>(wanted).await {
            Ok(records) => {
                let found: HashMap<ObjectId, R::Entity> = records
                    .into_iter()
                    .map(|record| (record.id(), record.into_entity()))
                    .collect();

                let resolved: Vec<Related<R::Entity>> = wanted
                    .iter()
                    .filter_map(|id| found.get(id).cloned().map(Related::Resolved))
                    .collect();

                if resolved.len() < wanted.len() {
                    debug!(
                        "사용자 {} 의 {} 참조 {}건이 존재하지 않습니다",
                        owner,
                        R::KIND,
                        wanted.len() - resolved.len()
                    );
                }
                Some(resolved)
            }
            Err(err) => {
                warn!("⚠️ 사용자 {} 의 {} 해석 실패: {}", owner, R::KIND, err);
                None
            }
        }
    }

    // ---------------------------------------------------------------
    // 주소 / 카드
    // ---------------------------------------------------------------

    /// 주소를 생성하고, `user_id` 가 있으면 해당 사용자에 연결합니다.
    ///
    /// 빈 문자열 `user_id` 는 생략으로 취급합니다. 존재하지 않는 사용자는
    /// 에러가 아니며, 주소는 연결되지 않은 채로 남습니다.
    pub async fn create_address(&self, address: Address, user_id: Option<&str>) -> RepositoryResult<Address> {
        self.within("create_address", self.insert_attribute::<AddressRecord>(address, user_id))
            .await
    }

    /// 카드를 생성하고, `user_id` 가 있으면 해당 사용자에 연결합니다.
    pub async fn create_card(&self, card: Card, user_id: Option<&str>) -> RepositoryResult<Card> {
        self.within("create_card", self.insert_attribute::<CardRecord>(card, user_id))
            .await
    }

    async fn insert_attribute<R: AttributeRecord>(
        &self,
        mut entity: R::Entity,
        user_id: Option<&str>,
    ) -> RepositoryResult<R::Entity> {
        let owner = user_id
            .filter(|id| !id.is_empty())
            .map(ids::decode)
            .transpose()?;

        let id = ids::generate();
        self.insert_entity::<R>(&entity, id).await?;

        if let Some(owner) = owner {
            match self
                .store
                .add_to_set(EntityKind::Customers, owner, R::FIELD, id)
                .await
            {
                Ok(0) => debug!("사용자 {} 가 없어 {} {} 를 연결하지 않았습니다", owner, R::KIND, id),
                Ok(_) => debug!("{} {} → 사용자 {}", R::KIND, id, owner),
                Err(err) => {
                    warn!("❌ {} {} 연결 실패, 레코드를 되돌립니다: {}", R::KIND, id, err);
                    self.discard(R::KIND, &[id]).await;
                    return Err(RepositoryError::StorageUnavailable(err.to_string()));
                }
            }
        }

        entity.set_id(ids::encode(&id));
        Ok(entity)
    }

    pub async fn get_address(&self, id: &str) -> RepositoryResult<Address> {
        self.within("get_address", self.find_attribute::<AddressRecord>(id)).await
    }

    pub async fn get_card(&self, id: &str) -> RepositoryResult<Card> {
        self.within("get_card", self.find_attribute::<CardRecord>(id)).await
    }

    pub async fn list_addresses(&self) -> RepositoryResult<Vec<Address>> {
        self.within("list_addresses", self.all_attributes::<AddressRecord>()).await
    }

    pub async fn list_cards(&self) -> RepositoryResult<Vec<Card>> {
        self.within("list_cards", self.all_attributes::<CardRecord>()).await
    }

    async fn find_attribute<R: AttributeRecord>(&self, id: &str) -> RepositoryResult<R::Entity> {
        let oid = ids::decode(id)?;
        self.find_record::<R>(oid)
            .await?
            .map(R::into_entity)
            .ok_or_else(|| RepositoryError::NotFound(format!("{} {}", R::KIND, id)))
    }

    async fn all_attributes<R: AttributeRecord>(&self) -> RepositoryResult<Vec<R::Entity>> {
        let records = self.all_records::<R>().await?;
        Ok(records.into_iter().map(R::into_entity).collect())
    }

    // ---------------------------------------------------------------
    // 삭제 / 관리
    // ---------------------------------------------------------------

    /// 엔티티 하나를 삭제합니다.
    ///
    /// - 고객: 참조하던 주소와 카드를 먼저 삭제한 뒤 고객을 삭제합니다.
    ///   하위 삭제가 실패하면 고객은 그대로 남습니다.
    /// - 주소/카드: 모든 고객의 참조 목록에서 ID를 제거한 뒤 레코드를 삭제합니다.
    pub async fn delete(&self, kind: EntityKind, id: &str) -> RepositoryResult<()> {
        self.within("delete", async {
            let oid = ids::decode(id)?;

            match kind.reference_field() {
                None => {
                    let customer = self
                        .find_record::<CustomerRecord>(oid)
                        .await?
                        .ok_or_else(|| RepositoryError::NotFound(format!("{} {}", kind, id)))?;

                    self.store.delete_many(EntityKind::Addresses, &customer.addresses).await?;
                    self.store.delete_many(EntityKind::Cards, &customer.cards).await?;
                }
                Some(field) => {
                    let detached = self.store.pull_from_all(EntityKind::Customers, field, oid).await?;
                    debug!("{} {} 참조를 고객 {}명에게서 제거", kind, id, detached);
                }
            }

            if self.store.delete_one(kind, oid).await? == 0 {
                return Err(RepositoryError::NotFound(format!("{} {}", kind, id)));
            }

            info!("🗑️ {} {} 삭제", kind, id);
            Ok(())
        })
        .await
    }

    /// 저장소 제약 조건(사용자명 유니크 인덱스)을 보장합니다. 여러 번 호출해도 안전합니다.
    pub async fn ensure_constraints(&self) -> RepositoryResult<()> {
        self.within("ensure_constraints", async {
            self.store
                .ensure_unique_index(EntityKind::Customers, "username", USERNAME_INDEX)
                .await
                .map_err(|e| RepositoryError::StorageUnavailable(e.to_string()))?;

            info!("✅ 인덱스 확인 완료: {}", USERNAME_INDEX);
            Ok(())
        })
        .await
    }

    /// 저장소 연결 상태 확인
    pub async fn ping(&self) -> RepositoryResult<()> {
        self.within("ping", async {
            self.store
                .ping()
                .await
                .map_err(|e| RepositoryError::StorageUnavailable(e.to_string()))
        })
        .await
    }

    // ---------------------------------------------------------------
    // 레코드 헬퍼
    // ---------------------------------------------------------------

    async fn insert_entity<R: AttributeRecord>(&self, entity: &R::Entity, id: ObjectId) -> RepositoryResult<()> {
        let record = R::from_entity(entity, Some(id))?;
        self.insert_record(&record).await
    }

    async fn insert_record<R: Record>(&self, record: &R) -> RepositoryResult<()> {
        let document = record.to_document()?;
        self.store.upsert(R::KIND, record.id(), document).await?;
        Ok(())
    }

    async fn find_record<R: Record>(&self, id: ObjectId) -> RepositoryResult<Option<R>> {
        self.store
            .find_one(R::KIND, "_id", Bson::ObjectId(id))
            .await?
            .map(R::from_document)
            .transpose()
    }

    async fn find_records<R: Record>(&self, wanted: &[ObjectId]) -> RepositoryResult<Vec<R>> {
        self.store
            .find_by_ids(R::KIND, wanted)
            .await?
            .into_iter()
            .map(R::from_document)
            .collect()
    }

    async fn all_records<R: Record>(&self) -> RepositoryResult<Vec<R>> {
        self.store
            .find_all(R::KIND)
            .await?
            .into_iter()
            .map(R::from_document)
            .collect()
    }

    /// 최선의 노력으로 레코드를 삭제합니다. 실패는 로그만 남깁니다.
    async fn discard(&self, kind: EntityKind, created: &[ObjectId]) {
        if created.is_empty() {
            return;
        }

        match self.store.delete_many(kind, created).await {
            Ok(deleted) => debug!("{} {}건 보상 삭제", kind, deleted),
            Err(err) => warn!("⚠️ {} {}건 보상 삭제 실패: {}", kind, created.len(), err),
        }
    }
}

/// placeholder 항목의 ID를 미리 디코드합니다. 하나라도 잘못되면 아무것도 쓰기 전에 실패합니다.
fn decode_references<T>(entries: Vec<Related<T>>) -> RepositoryResult<Vec<Pending<T>>> {
    entries
        .into_iter()
        .map(|entry| match entry {
            Related::Reference(text) => Ok(Pending::Existing(ids::decode(&text)?, text)),
            Related::Resolved(entity) => Ok(Pending::New(entity)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    async fn setup() -> (Arc<MemoryStore>, UserRepository) {
        let store = Arc::new(MemoryStore::new());
        let repo = UserRepository::new(store.clone(), Duration::from_secs(5));
        repo.ensure_constraints().await.unwrap();
        (store, repo)
    }

    fn address(street: &str) -> Address {
        Address {
            street: street.to_string(),
            number: "1".to_string(),
            country: "KR".to_string(),
            city: "Seoul".to_string(),
            postcode: "04524".to_string(),
            ..Address::default()
        }
    }

    fn card(long_num: &str) -> Card {
        Card {
            long_num: long_num.to_string(),
            expires: "08/27".to_string(),
            ccv: "123".to_string(),
            ..Card::default()
        }
    }

    fn user_with(username: &str, addresses: Vec<Address>, cards: Vec<Card>) -> User {
        let mut user = User::new(username, "p");
        user.addresses = addresses.into_iter().map(Related::from).collect();
        user.cards = cards.into_iter().map(Related::from).collect();
        user
    }

    fn without_id(mut address: Address) -> Address {
        address.id.clear();
        address
    }

    #[actix_web::test]
    async fn test_create_user_persists_attributes_and_resolves_in_order() {
        let (store, repo) = setup().await;
        let addresses = vec![address("First St"), address("Second St")];
        let cards = vec![card("4111"), card("5500"), card("3400")];

        let created = repo
            .create_user(user_with("u1", addresses.clone(), cards.clone()))
            .await
            .unwrap();

        assert!(created.is_persisted());
        assert!(created.addresses.iter().all(|a| !a.id().is_empty()));
        assert_eq!(store.count(EntityKind::Addresses), 2);
        assert_eq!(store.count(EntityKind::Cards), 3);

        let mut found = repo.get_user(&created.id).await.unwrap();
        assert!(!found.is_resolved());
        assert_eq!(found.addresses.len(), 2);

        repo.resolve_attributes(&mut found).await.unwrap();
        assert!(found.is_resolved());

        let streets: Vec<Address> = found
            .addresses
            .into_iter()
            .filter_map(Related::into_resolved)
            .map(without_id)
            .collect();
        assert_eq!(streets, addresses);

        let numbers: Vec<&str> = found
            .cards
            .iter()
            .filter_map(Related::as_resolved)
            .map(|c| c.long_num.as_str())
            .collect();
        assert_eq!(numbers, vec!["4111", "5500", "3400"]);
    }

    #[actix_web::test]
    async fn test_lookup_by_username_returns_placeholder_until_resolved() {
        let (_store, repo) = setup().await;

        let created = repo
            .create_user(user_with("u1", vec![Address { street: "Main St".to_string(), ..Address::default() }], vec![]))
            .await
            .unwrap();
        assert!(created.is_persisted());
        assert_eq!(created.addresses.len(), 1);
        let address = created.addresses[0].as_resolved().unwrap();
        assert!(!address.id.is_empty());
        assert_eq!(address.street, "Main St");

        let mut found = repo.get_user_by_username("u1").await.unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.addresses, vec![Related::Reference(address.id.clone())]);

        repo.resolve_attributes(&mut found).await.unwrap();
        assert_eq!(found.addresses[0].as_resolved().unwrap().street, "Main St");
    }

    #[actix_web::test]
    async fn test_end_to_end_customer_lifecycle() {
        let (store, repo) = setup().await;

        let created = repo
            .create_user(user_with("u1", vec![address("Main St")], vec![card("4111")]))
            .await
            .unwrap();

        let extra = repo.create_card(card("5500"), Some(&created.id)).await.unwrap();

        let mut found = repo.get_user_by_username("u1").await.unwrap();
        assert_eq!(found.id, created.id);
        repo.resolve_attributes(&mut found).await.unwrap();
        assert_eq!(found.addresses.len(), 1);
        assert_eq!(found.cards.len(), 2);
        assert_eq!(found.cards[1].id(), extra.id);

        repo.delete(EntityKind::Customers, &created.id).await.unwrap();

        assert!(matches!(repo.get_user(&created.id).await, Err(RepositoryError::NotFound(_))));
        assert!(matches!(repo.get_card(&extra.id).await, Err(RepositoryError::NotFound(_))));
        assert_eq!(store.count(EntityKind::Customers), 0);
        assert_eq!(store.count(EntityKind::Addresses), 0);
        assert_eq!(store.count(EntityKind::Cards), 0);
    }

    #[actix_web::test]
    async fn test_duplicate_username_is_rejected_and_compensated() {
        let (store, repo) = setup().await;
        let first = repo.create_user(User::new("u1", "p")).await.unwrap();

        let result = repo
            .create_user(user_with("u1", vec![address("Orphan St")], vec![card("4111")]))
            .await;

        assert!(matches!(result, Err(RepositoryError::DuplicateUsername(_))));
        assert_eq!(store.count(EntityKind::Customers), 1);
        assert_eq!(store.count(EntityKind::Addresses), 0);
        assert_eq!(store.count(EntityKind::Cards), 0);

        let still_there = repo.get_user_by_username("u1").await.unwrap();
        assert_eq!(still_there.id, first.id);
    }

    #[actix_web::test]
    async fn test_concurrent_creates_with_same_username() {
        let (store, repo) = setup().await;

        let (left, right) = futures_util::join!(
            repo.create_user(user_with("u1", vec![address("Left St")], vec![])),
            repo.create_user(user_with("u1", vec![address("Right St")], vec![]))
        );

        let results = [left, right];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(RepositoryError::DuplicateUsername(_))))
                .count(),
            1
        );
        assert_eq!(store.count(EntityKind::Customers), 1);
        // 진 쪽이 만든 주소는 보상 삭제됩니다
        assert_eq!(store.count(EntityKind::Addresses), 1);
    }

    #[actix_web::test]
    async fn test_malformed_ids_are_invalid_format_everywhere() {
        let (store, repo) = setup().await;
        let bad = "not-an-id";

        assert!(matches!(repo.get_user(bad).await, Err(RepositoryError::InvalidFormat(_))));
        assert!(matches!(repo.get_address(bad).await, Err(RepositoryError::InvalidFormat(_))));
        assert!(matches!(repo.get_card("").await, Err(RepositoryError::InvalidFormat(_))));
        for kind in EntityKind::ALL {
            assert!(matches!(repo.delete(kind, bad).await, Err(RepositoryError::InvalidFormat(_))));
        }

        // 검증은 어떤 쓰기보다 먼저 일어납니다
        assert!(matches!(
            repo.create_card(card("4111"), Some(bad)).await,
            Err(RepositoryError::InvalidFormat(_))
        ));
        assert!(matches!(
            repo.create_address(address("Main St"), Some("zzzzzzzzzzzzzzzzzzzzzzzz")).await,
            Err(RepositoryError::InvalidFormat(_))
        ));

        let mut user = user_with("u1", vec![address("Main St")], vec![]);
        user.cards.push(Related::Reference(bad.to_string()));
        assert!(matches!(repo.create_user(user).await, Err(RepositoryError::InvalidFormat(_))));

        assert_eq!(store.count(EntityKind::Customers), 0);
        assert_eq!(store.count(EntityKind::Addresses), 0);
        assert_eq!(store.count(EntityKind::Cards), 0);
    }

    #[actix_web::test]
    async fn test_well_formed_but_absent_ids_are_not_found() {
        let (_store, repo) = setup().await;
        let absent = ids::encode(&ids::generate());

        assert!(matches!(repo.get_user(&absent).await, Err(RepositoryError::NotFound(_))));
        assert!(matches!(repo.get_address(&absent).await, Err(RepositoryError::NotFound(_))));
        assert!(matches!(repo.get_card(&absent).await, Err(RepositoryError::NotFound(_))));
        assert!(matches!(repo.get_user_by_username("nobody").await, Err(RepositoryError::NotFound(_))));
        for kind in EntityKind::ALL {
            assert!(matches!(repo.delete(kind, &absent).await, Err(RepositoryError::NotFound(_))));
        }
    }

    #[actix_web::test]
    async fn test_username_lookup_is_exact() {
        let (_store, repo) = setup().await;
        repo.create_user(User::new("u1", "p")).await.unwrap();

        assert!(repo.get_user_by_username("u1").await.is_ok());
        assert!(matches!(repo.get_user_by_username("U1").await, Err(RepositoryError::NotFound(_))));
        assert!(matches!(repo.get_user_by_username("u").await, Err(RepositoryError::NotFound(_))));
    }

    #[actix_web::test]
    async fn test_shared_address_is_detached_from_every_user_on_delete() {
        let (_store, repo) = setup().await;

        let first = repo
            .create_user(user_with("u1", vec![address("Shared St"), address("First St")], vec![card("4111")]))
            .await
            .unwrap();
        let shared_id = first.addresses[0].id().to_string();
        let first_own = first.addresses[1].id().to_string();

        let mut second = user_with("u2", vec![address("Second St")], vec![]);
        second.addresses.insert(0, Related::Reference(shared_id.clone()));
        let second = repo.create_user(second).await.unwrap();
        assert_eq!(second.addresses[0].id(), shared_id);
        let second_own = second.addresses[1].id().to_string();

        repo.delete(EntityKind::Addresses, &shared_id).await.unwrap();

        let first_after = repo.get_user(&first.id).await.unwrap();
        assert_eq!(first_after.addresses, vec![Related::Reference(first_own.clone())]);
        assert_eq!(first_after.cards.len(), 1);
        assert_eq!(first_after.cards[0].id(), first.cards[0].id());

        let second_after = repo.get_user(&second.id).await.unwrap();
        assert_eq!(second_after.addresses, vec![Related::Reference(second_own.clone())]);

        assert!(matches!(repo.get_address(&shared_id).await, Err(RepositoryError::NotFound(_))));
        assert!(repo.get_address(&first_own).await.is_ok());
        assert!(repo.get_address(&second_own).await.is_ok());
    }

    #[actix_web::test]
    async fn test_resolve_drops_missing_ids_and_keeps_order() {
        let (_store, repo) = setup().await;
        let kept = repo.create_address(address("Kept St"), None).await.unwrap();
        let also = repo.create_address(address("Also St"), None).await.unwrap();
        let missing = ids::encode(&ids::generate());

        let mut user = User::new("u1", "p");
        user.addresses = vec![
            Related::Reference(also.id.clone()),
            Related::Reference(missing),
            Related::Reference(kept.id.clone()),
        ];

        repo.resolve_attributes(&mut user).await.unwrap();

        let resolved: Vec<&str> = user.addresses.iter().map(|a| a.id()).collect();
        assert_eq!(resolved, vec![also.id.as_str(), kept.id.as_str()]);
        assert!(user.is_resolved());
    }

    #[actix_web::test]
    async fn test_resolve_fails_closed_on_malformed_reference() {
        let (_store, repo) = setup().await;
        let kept = repo.create_address(address("Kept St"), None).await.unwrap();

        let mut user = User::new("u1", "p");
        user.addresses = vec![Related::Reference(kept.id.clone())];
        user.cards = vec![Related::Reference("bad".to_string())];
        let before = user.clone();

        let result = repo.resolve_attributes(&mut user).await;

        assert!(matches!(result, Err(RepositoryError::InvalidFormat(_))));
        assert_eq!(user, before);
    }

    #[actix_web::test]
    async fn test_resolve_degrades_per_kind() {
        let (store, repo) = setup().await;
        let created = repo
            .create_user(user_with("u1", vec![address("Main St")], vec![card("4111")]))
            .await
            .unwrap();

        store.set_unavailable(EntityKind::Cards, true);

        let mut found = repo.get_user(&created.id).await.unwrap();
        repo.resolve_attributes(&mut found).await.unwrap();

        assert!(found.addresses[0].is_resolved());
        assert!(!found.cards[0].is_resolved());
        assert_eq!(found.cards[0].id(), created.cards[0].id());
    }

    #[actix_web::test]
    async fn test_ensure_constraints_is_idempotent() {
        let (store, repo) = setup().await;

        repo.ensure_constraints().await.unwrap();
        repo.ensure_constraints().await.unwrap();

        assert_eq!(store.index_count(EntityKind::Customers), 1);
    }

    #[actix_web::test]
    async fn test_ensure_constraints_accepts_index_under_other_name() {
        let store = Arc::new(MemoryStore::new());
        store
            .ensure_unique_index(EntityKind::Customers, "username", "legacy_username")
            .await
            .unwrap();
        let repo = UserRepository::new(store.clone(), Duration::from_secs(5));

        repo.ensure_constraints().await.unwrap();
        assert_eq!(store.index_count(EntityKind::Customers), 1);

        repo.create_user(User::new("u1", "p")).await.unwrap();
        assert!(matches!(
            repo.create_user(User::new("u1", "p")).await,
            Err(RepositoryError::DuplicateUsername(_))
        ));
    }

    #[actix_web::test]
    async fn test_partial_write_keeps_user_and_reports_failures() {
        let (store, repo) = setup().await;
        store.set_unavailable(EntityKind::Cards, true);

        let result = repo
            .create_user(user_with("u1", vec![address("Main St")], vec![card("4111"), card("5500")]))
            .await;

        let (user, failures) = match result {
            Err(RepositoryError::PartialWrite { user, failures }) => (user, failures),
            other => panic!("expected partial write, got {:?}", other),
        };
        assert_eq!(failures.len(), 2);
        assert!(user.is_persisted());
        assert_eq!(user.addresses.len(), 1);
        assert!(user.cards.is_empty());

        store.set_unavailable(EntityKind::Cards, false);
        let stored = repo.get_user(&user.id).await.unwrap();
        assert_eq!(stored.addresses.len(), 1);
        assert!(stored.cards.is_empty());
    }

    #[actix_web::test]
    async fn test_customer_write_failure_discards_created_attributes() {
        let (store, repo) = setup().await;
        let existing = repo.create_address(address("Existing St"), None).await.unwrap();
        store.set_unavailable(EntityKind::Customers, true);

        let mut user = user_with("u1", vec![address("New St")], vec![card("4111")]);
        user.addresses.push(Related::Reference(existing.id.clone()));
        let result = repo.create_user(user).await;

        assert!(matches!(result, Err(RepositoryError::StorageUnavailable(_))));
        // placeholder 로 연결한 기존 주소는 보상 대상이 아닙니다
        assert_eq!(store.count(EntityKind::Addresses), 1);
        assert_eq!(store.count(EntityKind::Cards), 0);
        assert!(repo.get_address(&existing.id).await.is_ok());
    }

    #[actix_web::test]
    async fn test_create_card_links_with_set_semantics() {
        let (store, repo) = setup().await;
        let user = repo.create_user(User::new("u1", "p")).await.unwrap();

        let linked = repo.create_card(card("4111"), Some(&user.id)).await.unwrap();
        let unlinked = repo.create_card(card("5500"), None).await.unwrap();
        let blank = repo.create_address(address("Main St"), Some("")).await.unwrap();

        let found = repo.get_user(&user.id).await.unwrap();
        assert_eq!(found.cards.len(), 1);
        assert_eq!(found.cards[0].id(), linked.id);
        assert!(found.addresses.is_empty());

        assert_eq!(repo.list_cards().await.unwrap().len(), 2);
        assert!(repo.get_card(&unlinked.id).await.is_ok());
        assert!(repo.get_address(&blank.id).await.is_ok());

        let oid = ids::decode(&user.id).unwrap();
        let document = store.document(EntityKind::Customers, oid).unwrap();
        assert_eq!(document.get_array("cards").unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_create_card_for_absent_user_is_unlinked() {
        let (store, repo) = setup().await;
        let absent = ids::encode(&ids::generate());

        let card = repo.create_card(card("4111"), Some(&absent)).await.unwrap();

        assert!(!card.id.is_empty());
        assert_eq!(store.count(EntityKind::Cards), 1);
        assert_eq!(store.count(EntityKind::Customers), 0);
    }

    #[actix_web::test]
    async fn test_link_failure_discards_new_attribute() {
        let (store, repo) = setup().await;
        let user = repo.create_user(User::new("u1", "p")).await.unwrap();
        store.set_unavailable(EntityKind::Customers, true);

        let result = repo.create_address(address("Main St"), Some(&user.id)).await;

        assert!(matches!(result, Err(RepositoryError::StorageUnavailable(_))));
        assert_eq!(store.count(EntityKind::Addresses), 0);
    }

    #[actix_web::test]
    async fn test_cascade_failure_keeps_customer() {
        let (store, repo) = setup().await;
        let user = repo
            .create_user(user_with("u1", vec![], vec![card("4111")]))
            .await
            .unwrap();
        store.set_unavailable(EntityKind::Cards, true);

        let result = repo.delete(EntityKind::Customers, &user.id).await;

        assert!(matches!(result, Err(RepositoryError::StorageUnavailable(_))));
        assert_eq!(store.count(EntityKind::Customers), 1);
    }

    #[actix_web::test]
    async fn test_list_on_empty_store() {
        let (_store, repo) = setup().await;

        assert!(repo.list_users().await.unwrap().is_empty());
        assert!(repo.list_addresses().await.unwrap().is_empty());
        assert!(repo.list_cards().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_deadline_expiry_is_storage_unavailable() {
        let store = Arc::new(MemoryStore::new());
        let repo = UserRepository::new(store.clone(), Duration::from_millis(20));
        store.set_latency(Some(Duration::from_millis(200)));

        let result = repo.list_users().await;

        assert!(matches!(result, Err(RepositoryError::StorageUnavailable(_))));
    }

    #[actix_web::test]
    async fn test_ping_reflects_store_health() {
        let (store, repo) = setup().await;
        assert!(repo.ping().await.is_ok());

        store.set_offline(true);
        assert!(matches!(repo.ping().await, Err(RepositoryError::StorageUnavailable(_))));
    }
}
