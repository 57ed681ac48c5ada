//! 응답 DTO

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// 생성 응답: `{"id": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}

impl CreatedResponse {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// 삭제 응답: `{"status": true}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub status: bool,
}

/// 목록 응답
///
/// ```json
/// { "_embedded": { "customer": [ ... ] } }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T: Serialize> {
    #[serde(rename = "_embedded")]
    pub embedded: BTreeMap<&'static str, Vec<T>>,
}

impl<T: Serialize> ListResponse<T> {
    pub fn new(rel: &'static str, items: Vec<T>) -> Self {
        Self {
            embedded: BTreeMap::from([(rel, items)]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_shape() {
        let response = ListResponse::new("address", vec![CreatedResponse::new("a1")]);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json, serde_json::json!({ "_embedded": { "address": [{ "id": "a1" }] } }));
    }
}
