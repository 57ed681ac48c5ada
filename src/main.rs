//! 고객 프로필 서비스 메인 애플리케이션
//!
//! MongoDB 연결과 제약 조건을 준비한 뒤 Actix-web HTTP 서버를 구동합니다.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use user_profile_service::config::{MongoConfig, ServerConfig};
use user_profile_service::db::{Database, MongoStore};
use user_profile_service::repositories::users::UserRepository;
use user_profile_service::routes::configure_all_routes;

/// 저장소 초기화 재시도 간격
const BOOTSTRAP_RETRY: Duration = Duration::from_secs(1);

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    info!("🚀 고객 프로필 서비스 시작중...");

    let repository = bootstrap_repository().await;

    info!("✅ 저장소가 준비되었습니다!");

    // HTTP 서버 시작
    start_http_server(repository).await
}

async fn start_http_server(repository: UserRepository) -> std::io::Result<()> {
    let bind_address = format!("{}:{}", ServerConfig::host(), ServerConfig::port());

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);

    let repository = web::Data::new(repository);

    HttpServer::new(move || {
        App::new()
            .app_data(repository.clone())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            // 라우트 설정
            .configure(configure_all_routes)
    })
        .bind(bind_address)?
        .workers(4) // 워커 스레드 수
        .run()
        .await
}

/// 환경별 설정 파일을 로드합니다
///
/// # Environment Variables
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    info!("Current profile: {}", profile);

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => error!(".env.dev 파일 로드 실패: {}", e),
        },
        _ => {
            dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// * `RUST_LOG` - 로깅 레벨 설정 (기본값: "info,actix_web=debug")
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// 저장소가 준비될 때까지 연결 → ping → 제약 조건 생성을 반복합니다.
///
/// 서비스 전체에서 재시도하는 유일한 경로입니다.
async fn bootstrap_repository() -> UserRepository {
    let uri = MongoConfig::connection_uri();
    let timeout = MongoConfig::operation_timeout();

    info!("🔗 MongoDB 연결 대상: {}", MongoConfig::host());

    loop {
        match connect_repository(&uri, timeout).await {
            Ok(repository) => return repository,
            Err(e) => {
                error!("❌ 저장소 초기화 실패, {:?} 후 재시도: {}", BOOTSTRAP_RETRY, e);
                actix_web::rt::time::sleep(BOOTSTRAP_RETRY).await;
            }
        }
    }
}

async fn connect_repository(uri: &str, timeout: Duration) -> Result<UserRepository, Box<dyn Error>> {
    let database = Database::connect(uri, timeout).await?;
    let repository = UserRepository::new(Arc::new(MongoStore::new(&database)), timeout);

    repository.ping().await?;
    repository.ensure_constraints().await?;

    info!("📦 데이터베이스: {}", database.database_name());
    Ok(repository)
}
