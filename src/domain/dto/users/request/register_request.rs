//! 고객 등록 요청 DTO

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidationError};
use crate::domain::entities::users::{Address, Card, Related, User};

/// `POST /register` 본문
///
/// 주소와 카드는 함께 보낼 수 있으며, 등록 시 새 레코드로 생성됩니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "사용자명은 비어 있을 수 없습니다"))]
    pub username: String,

    #[validate(length(min = 1, message = "비밀번호는 비어 있을 수 없습니다"))]
    pub password: String,

    #[serde(rename = "firstName")]
    pub first_name: String,

    #[serde(rename = "lastName")]
    pub last_name: String,

    #[validate(custom(function = "validate_optional_email"))]
    pub email: String,

    pub addresses: Vec<Address>,

    pub cards: Vec<Card>,
}

impl RegisterRequest {
    /// 저장 전 사용자 엔티티로 변환합니다.
    pub fn into_user(self) -> User {
        User {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            username: self.username,
            password: self.password,
            addresses: self.addresses.into_iter().map(Related::from).collect(),
            cards: self.cards.into_iter().map(Related::from).collect(),
            ..User::default()
        }
    }
}

fn validate_optional_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || email.validate_email() {
        return Ok(());
    }
    Err(ValidationError::new("invalid_email")
        .with_message("유효한 이메일 주소를 입력해주세요".into()))
}
