//! Users Entity Module
//!
//! 고객 프로필 도메인의 엔티티들을 정의하는 모듈입니다.
//!
//! # 주요 구성 요소
//!
//! - [`user::User`] - 주소와 카드를 내장하는 사용자 집합체
//! - [`address::Address`], [`card::Card`] - 사용자와 ID 참조로 연결되는 독립 엔티티
//! - [`related::Related`] - placeholder 와 해석된 엔티티를 구분하는 변형 타입
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use crate::domain::entities::users::{Address, Related, User};
//!
//! let mut user = User::new("u1", "p");
//! user.addresses.push(Related::Resolved(Address {
//!     street: "Main St".to_string(),
//!     ..Address::default()
//! }));
//! ```

pub mod address;
pub mod card;
pub mod related;
pub mod user;

pub use address::Address;
pub use card::Card;
pub use related::{Identified, Related};
pub use user::{Link, User};
