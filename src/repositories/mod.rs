//! 데이터 액세스 계층을 담당하는 리포지토리 모듈
//!
//! 리포지토리는 [`DocumentStore`](crate::db::DocumentStore) 포트 위에서 동작하며,
//! 저장 엔진의 에러를 [`RepositoryError`] 의 종류로 변환하여 돌려줍니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::repositories::users::UserRepository;
//!
//! let repo = UserRepository::new(Arc::new(MongoStore::new(&database)), timeout);
//! let user = repo.get_user("57a98d98e4b00679b4a830af").await?;
//! ```

pub mod error;
pub mod users;

pub use error::{RepositoryError, RepositoryResult};
