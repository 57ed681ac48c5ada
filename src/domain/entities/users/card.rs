//! Card Entity

use serde::{Deserialize, Serialize};
use super::related::Identified;

/// 결제 카드
///
/// 독립된 `cards` 컬렉션에 저장되며, 0명 이상의 사용자가 ID로 참조합니다.
/// 카드 번호는 이 계층에서 마스킹하지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Card {
    pub id: String,
    #[serde(rename = "longNum")]
    pub long_num: String,
    pub expires: String,
    pub ccv: String,
}

impl Identified for Card {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
