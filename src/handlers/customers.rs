//! # Customer HTTP Handlers
//!
//! 고객 등록과 조회, 고객 하위 리소스(주소/카드) 엔드포인트입니다.
//!
//! | 메서드 | 경로 | 설명 | 상태 코드 |
//! |--------|------|------|-----------|
//! | `POST` | `/register` | 고객 등록 | 200 OK |
//! | `GET` | `/customers` | 고객 목록 | 200 OK |
//! | `GET` | `/customers/{id}` | 고객 조회 | 200 OK |
//! | `GET` | `/customers/{id}/addresses` | 고객 주소 목록 | 200 OK |
//! | `GET` | `/customers/{id}/cards` | 고객 카드 목록 | 200 OK |
//! | `POST` | `/customers/{id}/addresses` | 주소 생성 후 연결 | 200 OK |
//! | `POST` | `/customers/{id}/cards` | 카드 생성 후 연결 | 200 OK |
//!
//! 고객 응답에는 `_links` 하이퍼미디어 링크가 포함됩니다.

use actix_web::{get, post, web, HttpResponse};
use log::info;
use validator::Validate;
use crate::config::LinkConfig;
use crate::domain::dto::users::{CreatedResponse, ListResponse, RegisterRequest};
use crate::domain::entities::users::{Address, Card, User};
use crate::errors::AppError;
use crate::repositories::users::UserRepository;

fn with_links(mut user: User) -> User {
    user.add_links(&LinkConfig::domain());
    user
}

/// 고객 등록
///
/// 함께 보낸 주소와 카드도 생성됩니다. 사용자명이 이미 있으면 409 입니다.
#[post("/register")]
pub async fn register(
    repo: web::Data<UserRepository>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user = repo.create_user(payload.into_inner().into_user()).await?;
    info!("👤 고객 등록: {} ({})", user.username, user.id);

    Ok(HttpResponse::Ok().json(CreatedResponse::new(user.id)))
}

#[get("/customers")]
pub async fn list_customers(repo: web::Data<UserRepository>) -> Result<HttpResponse, AppError> {
    let users: Vec<User> = repo
        .list_users()
        .await?
        .into_iter()
        .map(with_links)
        .collect();

    Ok(HttpResponse::Ok().json(ListResponse::new("customer", users)))
}

#[get("/customers/{id}")]
pub async fn get_customer(
    repo: web::Data<UserRepository>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user = repo.get_user(&id).await?;

    Ok(HttpResponse::Ok().json(with_links(user)))
}

/// 고객의 주소를 해석하여 반환합니다.
#[get("/customers/{id}/addresses")]
pub async fn get_customer_addresses(
    repo: web::Data<UserRepository>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let mut user = repo.get_user(&id).await?;
    repo.resolve_attributes(&mut user).await?;

    Ok(HttpResponse::Ok().json(ListResponse::new("address", user.addresses)))
}

/// 고객의 카드를 해석하여 반환합니다.
#[get("/customers/{id}/cards")]
pub async fn get_customer_cards(
    repo: web::Data<UserRepository>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let mut user = repo.get_user(&id).await?;
    repo.resolve_attributes(&mut user).await?;

    Ok(HttpResponse::Ok().json(ListResponse::new("card", user.cards)))
}

#[post("/customers/{id}/addresses")]
pub async fn add_customer_address(
    repo: web::Data<UserRepository>,
    id: web::Path<String>,
    payload: web::Json<Address>,
) -> Result<HttpResponse, AppError> {
    let address = repo.create_address(payload.into_inner(), Some(id.as_str())).await?;

    Ok(HttpResponse::Ok().json(CreatedResponse::new(address.id)))
}

#[post("/customers/{id}/cards")]
pub async fn add_customer_card(
    repo: web::Data<UserRepository>,
    id: web::Path<String>,
    payload: web::Json<Card>,
) -> Result<HttpResponse, AppError> {
    let card = repo.create_card(payload.into_inner(), Some(id.as_str())).await?;

    Ok(HttpResponse::Ok().json(CreatedResponse::new(card.id)))
}
