use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use livelum_skills::{SkillId, SkillStatus};

use crate::app::routes::common::{self, HandlerResult};
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_skill).get(list_skills))
        .route("/:id", get(get_skill).put(update_skill).delete(delete_skill))
        .route("/:id/status", patch(change_skill_status))
}

pub async fn create_skill(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateSkillRequest>, JsonRejection>,
) -> HandlerResult {
    let body = common::body(body)?;
    let skill = common::service(services.skills.create(body.into()).await)?;
    Ok(errors::ok(
        StatusCode::CREATED,
        dto::SkillResponse::from(&skill),
        Some("Habilidad creada exitosamente"),
    ))
}

pub async fn list_skills(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::SkillListQuery>, QueryRejection>,
) -> HandlerResult {
    let criteria = common::criteria(common::query(query)?.into_criteria())?;
    let page = common::service(services.skills.search(criteria).await)?;
    let items = page.items.iter().map(dto::SkillResponse::from).collect::<Vec<_>>();
    Ok(errors::ok_page(items, page.total))
}

pub async fn get_skill(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let id: SkillId = common::parse_id(&id)?;
    let skill = common::service(services.skills.get(id).await)?;
    Ok(errors::ok(StatusCode::OK, dto::SkillResponse::from(&skill), None))
}

pub async fn update_skill(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateSkillRequest>, JsonRejection>,
) -> HandlerResult {
    let id: SkillId = common::parse_id(&id)?;
    let body = common::body(body)?;
    let skill = common::service(services.skills.update(id, body.into()).await)?;
    Ok(errors::ok(
        StatusCode::OK,
        dto::SkillResponse::from(&skill),
        Some("Habilidad actualizada exitosamente"),
    ))
}

pub async fn change_skill_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::StatusRequest<SkillStatus>>, JsonRejection>,
) -> HandlerResult {
    let id: SkillId = common::parse_id(&id)?;
    let body = common::body(body)?;
    let skill = common::service(services.skills.change_status(id, body.status).await)?;
    Ok(errors::ok(
        StatusCode::OK,
        dto::SkillResponse::from(&skill),
        Some("Estado de la habilidad actualizado"),
    ))
}

pub async fn delete_skill(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let id: SkillId = common::parse_id(&id)?;
    common::service(services.skills.delete(id).await)?;
    Ok(errors::ok_message("Habilidad eliminada exitosamente"))
}
