//! # Routes Module
//!
//! 애플리케이션의 모든 HTTP 라우트를 한 곳에서 등록합니다.
//!
//! ## 라우트 구성
//!
//! | 그룹 | 경로 |
//! |------|------|
//! | 헬스 체크 | `GET /health` |
//! | 고객 | `POST /register`, `GET /customers`, `/customers/{id}`, `/customers/{id}/{addresses,cards}` |
//! | 주소 | `GET/POST /addresses`, `GET /addresses/{id}` |
//! | 카드 | `GET/POST /cards`, `GET /cards/{id}` |
//! | 삭제 | `DELETE /{entity}/{id}` |

use crate::handlers;
use crate::repositories::users::UserRepository;
use actix_web::{web, HttpResponse};
use log::warn;
use serde_json::json;

/// 모든 라우트를 설정합니다
///
/// `UserRepository` 는 호출자가 `app_data` 로 등록해야 합니다.
///
/// # Arguments
///
/// * `cfg` - Actix-web 서비스 설정 객체
///
/// # Examples
///
/// ```rust,ignore
/// use actix_web::{web, App};
///
/// let app = App::new()
///     .app_data(web::Data::new(repo))
///     .configure(configure_all_routes);
/// ```
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    // Health check endpoint
    cfg.service(health_check);

    configure_customer_routes(cfg);
    configure_attribute_routes(cfg);

    // 가장 일반적인 경로이므로 마지막에 등록합니다
    cfg.service(handlers::entities::delete_entity);
}

/// 고객 관련 라우트
///
/// ```bash
/// curl -X POST http://localhost:8084/register \
///   -H "Content-Type: application/json" \
///   -d '{"username":"u1","password":"p","firstName":"Kim"}'
///
/// curl http://localhost:8084/customers/57a98d98e4b00679b4a830af/cards
/// ```
fn configure_customer_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::customers::register)
        .service(handlers::customers::list_customers)
        .service(handlers::customers::get_customer)
        .service(handlers::customers::get_customer_addresses)
        .service(handlers::customers::get_customer_cards)
        .service(handlers::customers::add_customer_address)
        .service(handlers::customers::add_customer_card);
}

/// 주소/카드 라우트
fn configure_attribute_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::addresses::list_addresses)
        .service(handlers::addresses::get_address)
        .service(handlers::addresses::create_address)
        .service(handlers::cards::list_cards)
        .service(handlers::cards::get_card)
        .service(handlers::cards::create_card);
}

/// 헬스 체크
///
/// 저장소 ping 이 성공하면 200, 실패하면 503 입니다.
///
/// ```json
/// {
///   "status": "healthy",
///   "service": "user_profile_service",
///   "version": "0.1.0",
///   "timestamp": "2024-01-01T00:00:00Z",
///   "database": "MongoDB"
/// }
/// ```
#[actix_web::get("/health")]
async fn health_check(repo: web::Data<UserRepository>) -> HttpResponse {
    let timestamp = chrono::Utc::now().to_rfc3339();

    match repo.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": timestamp,
            "database": "MongoDB"
        })),
        Err(e) => {
            warn!("헬스 체크 실패: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unhealthy",
                "service": env!("CARGO_PKG_NAME"),
                "timestamp": timestamp,
                "error": e.to_string()
            }))
        }
    }
}
