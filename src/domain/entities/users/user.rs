//! User Entity Implementation
//!
//! 고객 프로필의 도메인 표현입니다.
//! 저장소에서는 주소와 카드를 ID 목록으로만 보관하지만, 도메인 사용자는
//! 이들을 [`Related`] 목록으로 내장합니다.

use serde::{Deserialize, Serialize};
use super::address::Address;
use super::card::Card;
use super::related::Related;

/// 하이퍼미디어 링크
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,
}

/// 사용자 엔티티
///
/// - `id` 가 비어 있으면 아직 저장된 적 없는 사용자입니다.
/// - `username` 은 모든 사용자 사이에서 유일하며, 저장소의 유니크 인덱스로 보장됩니다.
/// - `password` 는 입력으로만 받고 응답에는 포함하지 않습니다. 이 계층은 해싱하지 않습니다.
/// - `links` 가 비어 있으면 JSON 출력에서 생략됩니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub addresses: Vec<Related<Address>>,
    pub cards: Vec<Related<Card>>,
    #[serde(rename = "_links", skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl User {
    /// 사용자명과 비밀번호만으로 새 사용자를 만듭니다.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// 저장된 적이 있는 사용자인지 확인
    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }

    /// 주소와 카드가 모두 해석된 상태인지 확인
    pub fn is_resolved(&self) -> bool {
        self.addresses.iter().all(Related::is_resolved) && self.cards.iter().all(Related::is_resolved)
    }

    /// 고객 리소스에 대한 하이퍼미디어 링크를 채웁니다.
    ///
    /// `domain` 은 링크의 호스트 부분입니다 (예: `user`).
    pub fn add_links(&mut self, domain: &str) {
        let base = format!("http://{}/customers/{}", domain, self.id);
        self.links = vec![
            Link { rel: "customer".to_string(), href: base.clone() },
            Link { rel: "self".to_string(), href: base.clone() },
            Link { rel: "addresses".to_string(), href: format!("{}/addresses", base) },
            Link { rel: "cards".to_string(), href: format!("{}/cards", base) },
        ];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_not_persisted() {
        let user = User::new("u1", "p");

        assert!(!user.is_persisted());
        assert!(user.is_resolved());
        assert!(user.links.is_empty());
    }

    #[test]
    fn test_password_never_serialized_and_empty_links_omitted() {
        let user = User::new("u1", "secret");
        let json = serde_json::to_value(&user).unwrap();

        assert!(json.get("password").is_none());
        assert!(json.get("_links").is_none());
        assert_eq!(json["username"], "u1");
    }

    #[test]
    fn test_password_accepted_on_input() {
        let user: User = serde_json::from_str(
            r#"{ "username": "u1", "password": "p", "firstName": "Kim", "addresses": [{ "street": "Main St" }] }"#,
        )
        .unwrap();

        assert_eq!(user.password, "p");
        assert_eq!(user.first_name, "Kim");
        assert_eq!(user.addresses.len(), 1);
        assert!(user.addresses[0].is_resolved());
    }

    #[test]
    fn test_add_links() {
        let mut user = User::new("u1", "p");
        user.id = "57a98d98e4b00679b4a830af".to_string();
        user.add_links("user");

        let json = serde_json::to_value(&user).unwrap();
        let links = json["_links"].as_array().unwrap();

        assert_eq!(links.len(), 4);
        assert!(user.links.iter().any(|l| l.rel == "cards"
            && l.href == "http://user/customers/57a98d98e4b00679b4a830af/cards"));
    }

    #[test]
    fn test_placeholder_user_is_not_resolved() {
        let mut user = User::new("u1", "p");
        user.addresses.push(Related::Reference("57a98d98e4b00679b4a830af".to_string()));

        assert!(!user.is_resolved());
    }
}
