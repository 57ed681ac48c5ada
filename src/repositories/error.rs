//! 리포지토리 에러
//!
//! 저장 엔진의 에러 타입이 아니라 에러의 "종류"로 계약을 표현합니다.
//! 드라이버 원문은 진단용 문자열로만 전달됩니다.

use thiserror::Error;
use crate::db::StoreError;
use crate::domain::entities::users::User;

/// 리포지토리 연산 에러
#[derive(Error, Debug, Clone)]
pub enum RepositoryError {
    /// 형식이 잘못된 식별자 (항상 호출자 잘못, 재시도 대상 아님)
    #[error("Invalid Id Hex: {0}")]
    InvalidFormat(String),

    /// 형식은 올바르지만 해당 레코드가 없음
    #[error("Not found: {0}")]
    NotFound(String),

    /// 사용자명 유니크 제약 위반
    #[error("Duplicate username: {0}")]
    DuplicateUsername(String),

    /// 백엔드 연결 실패, 데드라인 초과, 예상하지 못한 응답
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// 고객 레코드는 저장되었지만 일부 주소/카드 생성이 실패함
    ///
    /// `user` 는 성공적으로 연결된 하위 엔티티만 가진 사용 가능한 결과입니다.
    /// 메시지에 저장된 고객 ID가 포함되어 호출자가 후속 처리를 결정할 수 있습니다.
    #[error("user {} stored with attribute errors: {}", .user.id, join_failures(.failures))]
    PartialWrite {
        user: Box<User>,
        failures: Vec<RepositoryError>,
    },
}

fn join_failures(failures: &[RepositoryError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<StoreError> for RepositoryError {
    fn from(err: StoreError) -> Self {
        match err {
            // 고객 컬렉션의 유일한 유니크 인덱스는 username 입니다
            StoreError::DuplicateKey(detail) => RepositoryError::DuplicateUsername(detail),
            StoreError::Unavailable(detail) => RepositoryError::StorageUnavailable(detail),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
