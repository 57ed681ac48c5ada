//! # Domain Layer
//!
//! 고객 프로필 서비스의 도메인 계층입니다.
//!
//! ```text
//! Domain Layer
//! ├── entities/     ← 사용자, 주소, 카드 엔티티
//! └── dto/          ← HTTP 요청 데이터 전송 객체
//! ```

pub mod dto;
pub mod entities;
