//! 사용자 데이터 액세스 계층을 담당하는 리포지토리 모듈
//!
//! [`UserRepository`](user_repo::UserRepository)를 통해 고객, 주소, 카드
//! 세 컬렉션을 관리합니다.
//!
//! # 구성
//!
//! - [`ids`] - 문자열 ↔ 저장소 식별자 변환
//! - [`records`] - 컬렉션에 기록되는 문서 형태
//! - [`mapper`] - 도메인 엔티티 ↔ 레코드 변환
//! - [`user_repo`] - 리포지토리 연산
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::repositories::users::UserRepository;
//!
//! let repo = UserRepository::new(store, timeout);
//! let user = repo.get_user_by_username("u1").await?;
//! ```

pub mod ids;
pub mod mapper;
pub mod records;
pub mod user_repo;

pub use user_repo::{UserRepository, USERNAME_INDEX};
