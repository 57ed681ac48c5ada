//! 고객 프로필 서비스 백엔드
//!
//! 이커머스 고객 프로필(사용자, 배송 주소, 결제 카드)을 MongoDB 의 세 컬렉션에
//! 저장하고 REST API 로 제공하는 서비스입니다.
//!
//! # Features
//!
//! - **고객 관리**: 등록, 조회, 사용자명 조회, 삭제(하위 엔티티 연쇄 삭제)
//! - **주소/카드**: 독립 레코드로 저장하고 고객 문서에서 ID로 참조
//! - **참조 무결성**: 주소/카드 삭제 시 모든 고객의 참조 목록에서 제거
//! - **보상 삭제**: 트랜잭션 없이 실패한 다단계 쓰기를 최선의 노력으로 되돌림
//! - **데드라인**: 모든 저장소 연산에 시간 제한 적용
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청/응답 처리
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← 세 컬렉션 간 일관성
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  DocumentStore  │ ← MongoDB / 메모리 구현
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use user_profile_service::db::{Database, MongoStore};
//! use user_profile_service::repositories::users::UserRepository;
//!
//! let database = Database::connect(&uri, timeout).await?;
//! let repo = UserRepository::new(Arc::new(MongoStore::new(&database)), timeout);
//! repo.ensure_constraints().await?;
//!
//! let mut user = repo.get_user_by_username("u1").await?;
//! repo.resolve_attributes(&mut user).await?;
//! ```

pub mod config;
pub mod db;
pub mod domain;
pub mod repositories;
pub mod routes;
pub mod handlers;
pub mod errors;
