//! # Domain Entities Module
//!
//! 비즈니스 도메인의 핵심 엔티티들을 정의합니다.
//!
//! 도메인 엔티티는 문자열 식별자를 사용하며 저장소의 네이티브 타입(ObjectId)을
//! 알지 못합니다. 저장소 문서와의 변환은 `repositories::users::mapper` 가 담당합니다.
//!
//! ## 엔티티 관계
//!
//! ```text
//! User ──(ID 목록)──▶ Address   (다대다, 참조로만 연결)
//!      └─(ID 목록)──▶ Card      (다대다, 참조로만 연결)
//! ```
//!
//! ## 주의사항
//!
//! - **순환 참조 금지**: 엔티티 간 직접 참조 대신 ID 참조 사용
//! - **식별자 할당**: 식별자는 생성 시점에 저장소 계층이 한 번만 할당

pub mod users;
