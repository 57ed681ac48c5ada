//! # Card HTTP Handlers
//!
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | `GET` | `/cards` | 전체 카드 목록 |
//! | `GET` | `/cards/{id}` | 카드 조회 |
//! | `POST` | `/cards` | 카드 생성 (`userID` 가 있으면 연결) |

use actix_web::{get, post, web, HttpResponse};
use crate::domain::dto::users::{CreateCardRequest, CreatedResponse, ListResponse};
use crate::errors::AppError;
use crate::repositories::users::UserRepository;

#[get("/cards")]
pub async fn list_cards(repo: web::Data<UserRepository>) -> Result<HttpResponse, AppError> {
    let cards = repo.list_cards().await?;

    Ok(HttpResponse::Ok().json(ListResponse::new("card", cards)))
}

#[get("/cards/{id}")]
pub async fn get_card(
    repo: web::Data<UserRepository>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let card = repo.get_card(&id).await?;

    Ok(HttpResponse::Ok().json(card))
}

#[post("/cards")]
pub async fn create_card(
    repo: web::Data<UserRepository>,
    payload: web::Json<CreateCardRequest>,
) -> Result<HttpResponse, AppError> {
    let request = payload.into_inner();
    let owner = request.owner().map(str::to_string);

    let card = repo.create_card(request.card, owner.as_deref()).await?;

    Ok(HttpResponse::Ok().json(CreatedResponse::new(card.id)))
}
