//! 식별자 코덱
//!
//! 저장소의 네이티브 식별자([`ObjectId`])와 도메인이 사용하는 문자열 표현 사이를
//! 변환합니다. 문자열은 24자리 16진수입니다.
//!
//! 외부에서 받은 식별자는 조회 키로 쓰기 전에 반드시 [`decode`] 로 검증하여
//! "존재하지 않음"과 "잘못된 요청"을 구분합니다.

use mongodb::bson::oid::ObjectId;
use super::super::error::{RepositoryError, RepositoryResult};

/// 전역적으로 유일한 새 식별자를 생성합니다.
pub fn generate() -> ObjectId {
    ObjectId::new()
}

/// 외부 문자열 표현을 식별자로 해석합니다.
///
/// # Errors
///
/// 길이나 문자 집합이 맞지 않으면 [`RepositoryError::InvalidFormat`]
pub fn decode(text: &str) -> RepositoryResult<ObjectId> {
    ObjectId::parse_str(text)
        .map_err(|_| RepositoryError::InvalidFormat(format!("{:?} is not a valid id", text)))
}

/// 식별자의 정규 문자열 표현
pub fn encode(id: &ObjectId) -> String {
    id.to_hex()
}

/// 모든 문자열을 해석합니다. 하나라도 잘못되면 전체가 실패합니다.
pub fn decode_all<'a, I>(texts: I) -> RepositoryResult<Vec<ObjectId>>
where
    I: IntoIterator<Item = &'a str>,
{
    texts.into_iter().map(decode).collect()
}
