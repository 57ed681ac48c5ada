//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 정의하는 모듈입니다.
//! 핸들러는 요청을 해석하고 [`UserRepository`](crate::repositories::users::UserRepository)
//! 를 호출한 뒤 결과를 JSON 으로 돌려주는 얇은 계층입니다.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Handlers (이 모듈) - HTTP 엔드포인트 처리
//! ├─────────────────────────────────────────────┤
//!   Repositories - 세 컬렉션의 일관성 유지
//! ├─────────────────────────────────────────────┤
//!   DocumentStore - MongoDB / 메모리 구현
//! └─────────────────────────────────────────────┘
//! ```
//!
//! 리포지토리는 `web::Data<UserRepository>` 로 주입됩니다.
//! 모든 핸들러는 `Result<HttpResponse, AppError>` 를 반환하며,
//! 에러는 [`AppError`](crate::errors::AppError) 의 `ResponseError` 구현으로
//! 상태 코드가 결정됩니다.

pub mod addresses;
pub mod cards;
pub mod customers;
pub mod entities;
