//! Database Connection Management Module
//!
//! MongoDB 연결 관리와 문서 저장소 포트를 담당하는 모듈입니다.
//!
//! # 구성
//!
//! - [`Database`] - MongoDB 클라이언트 연결 래퍼
//! - [`store::DocumentStore`] - 리포지토리가 사용하는 저장소 포트
//! - [`mongo_store::MongoStore`] - MongoDB 구현
//! - [`memory_store::MemoryStore`] - 프로세스 내 구현 (테스트용)
//! - [`entity_kind::EntityKind`] - `customers`, `addresses`, `cards` 세 컬렉션
//!
//! # 기본 사용법
//!
//! ```rust,ignore
//! use crate::db::{Database, MongoStore};
//!
//! let database = Database::connect(&MongoConfig::connection_uri(), timeout).await?;
//! let store = MongoStore::new(&database);
//! ```

pub mod entity_kind;
pub mod memory_store;
pub mod mongo_store;
pub mod store;

pub use entity_kind::EntityKind;
pub use memory_store::MemoryStore;
pub use mongo_store::MongoStore;
pub use store::{DocumentStore, StoreError, StoreResult};

use std::time::Duration;
use log::info;
use mongodb::{bson::doc, options::ClientOptions, Client};
use crate::config::DATABASE_NAME;

/// MongoDB 데이터베이스 연결 래퍼
///
/// MongoDB 클라이언트와 데이터베이스 이름을 보관합니다.
/// 클라이언트는 내부적으로 연결 풀을 가지므로 복제 비용이 낮습니다.
#[derive(Clone)]
pub struct Database {
    /// MongoDB 클라이언트 인스턴스
    client: Client,
    /// 사용할 데이터베이스 이름
    database_name: String,
}

impl Database {
    /// 새 MongoDB 연결을 생성하고 ping 으로 검증합니다.
    ///
    /// 단일 노드 구성에서도 동작하도록 `directConnection` 을 강제하며,
    /// 서버 선택과 연결 시도는 `timeout` 안에 끝나야 합니다.
    ///
    /// 실패 시 재시도하지 않습니다. 재시도 루프는 호출자(시작 코드)의 책임입니다.
    pub async fn connect(uri: &str, timeout: Duration) -> Result<Self, mongodb::error::Error> {
        let mut client_options = ClientOptions::parse(uri).await?;

        client_options.app_name = Some("user_profile_service".to_string());
        client_options.direct_connection = Some(true);
        client_options.connect_timeout = Some(timeout);
        client_options.server_selection_timeout = Some(timeout);

        let client = Client::with_options(client_options)?;

        // 연결 테스트
        client
            .database(DATABASE_NAME)
            .run_command(doc! { "ping": 1 })
            .await?;

        info!("✅ MongoDB 연결 성공: {}", DATABASE_NAME);

        Ok(Self {
            client,
            database_name: DATABASE_NAME.to_string(),
        })
    }

    /// MongoDB 데이터베이스 인스턴스를 반환합니다.
    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    /// 데이터베이스 이름을 반환합니다.
    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}
