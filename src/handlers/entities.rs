//! # Entity Delete Handler
//!
//! `DELETE /{entity}/{id}` 하나로 고객, 주소, 카드를 삭제합니다.
//! 알 수 없는 엔티티 이름은 404 입니다.

use actix_web::{delete, web, HttpResponse};
use log::debug;
use crate::db::EntityKind;
use crate::domain::dto::users::DeleteResponse;
use crate::errors::AppError;
use crate::repositories::users::UserRepository;

#[delete("/{entity}/{id}")]
pub async fn delete_entity(
    repo: web::Data<UserRepository>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (entity, id) = path.into_inner();
    let kind: EntityKind = entity.parse().map_err(|e| {
        debug!("삭제 요청 거부: {}", e);
        AppError::NotFound(format!("{}", e))
    })?;

    repo.delete(kind, &id).await?;

    Ok(HttpResponse::Ok().json(DeleteResponse { status: true }))
}
