//! # Address HTTP Handlers
//!
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | `GET` | `/addresses` | 전체 주소 목록 |
//! | `GET` | `/addresses/{id}` | 주소 조회 |
//! | `POST` | `/addresses` | 주소 생성 (`userID` 가 있으면 연결) |

use actix_web::{get, post, web, HttpResponse};
use crate::domain::dto::users::{CreateAddressRequest, CreatedResponse, ListResponse};
use crate::errors::AppError;
use crate::repositories::users::UserRepository;

#[get("/addresses")]
pub async fn list_addresses(repo: web::Data<UserRepository>) -> Result<HttpResponse, AppError> {
    let addresses = repo.list_addresses().await?;

    Ok(HttpResponse::Ok().json(ListResponse::new("address", addresses)))
}

#[get("/addresses/{id}")]
pub async fn get_address(
    repo: web::Data<UserRepository>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let address = repo.get_address(&id).await?;

    Ok(HttpResponse::Ok().json(address))
}

#[post("/addresses")]
pub async fn create_address(
    repo: web::Data<UserRepository>,
    payload: web::Json<CreateAddressRequest>,
) -> Result<HttpResponse, AppError> {
    let request = payload.into_inner();
    let owner = request.owner().map(str::to_string);

    let address = repo.create_address(request.address, owner.as_deref()).await?;

    Ok(HttpResponse::Ok().json(CreatedResponse::new(address.id)))
}
