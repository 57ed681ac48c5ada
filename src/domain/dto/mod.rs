//! # Data Transfer Objects
//!
//! HTTP 계층과 도메인 사이에서 주고받는 요청/응답 구조체입니다.
//! 엔티티 자체가 외부 JSON 형태를 가지므로, DTO 는 엔티티에 없는
//! 필드(`userID`, 응답 래퍼)를 다룰 때만 사용합니다.

pub mod users;

pub use users::*;
