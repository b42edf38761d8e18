use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use livelum_objectives::{ObjectiveId, ObjectiveStatus};

use crate::app::routes::common::{self, HandlerResult};
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_objective).get(list_objectives))
        .route("/:id", get(get_objective).put(update_objective).delete(delete_objective))
        .route("/:id/status", patch(change_objective_status))
}

pub async fn create_objective(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateObjectiveRequest>, JsonRejection>,
) -> HandlerResult {
    let body = common::body(body)?;
    let objective = common::service(services.objectives.create(body.into()).await)?;
    Ok(errors::ok(
        StatusCode::CREATED,
        dto::ObjectiveResponse::from(&objective),
        Some("Objetivo creado exitosamente"),
    ))
}

pub async fn list_objectives(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::ObjectiveListQuery>, QueryRejection>,
) -> HandlerResult {
    let criteria = common::criteria(common::query(query)?.into_criteria())?;
    let page = common::service(services.objectives.search(criteria).await)?;
    let items = page.items.iter().map(dto::ObjectiveResponse::from).collect::<Vec<_>>();
    Ok(errors::ok_page(items, page.total))
}

pub async fn get_objective(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let id: ObjectiveId = common::parse_id(&id)?;
    let objective = common::service(services.objectives.get(id).await)?;
    Ok(errors::ok(StatusCode::OK, dto::ObjectiveResponse::from(&objective), None))
}

pub async fn update_objective(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateObjectiveRequest>, JsonRejection>,
) -> HandlerResult {
    let id: ObjectiveId = common::parse_id(&id)?;
    let body = common::body(body)?;
    let objective = common::service(services.objectives.update(id, body.into()).await)?;
    Ok(errors::ok(
        StatusCode::OK,
        dto::ObjectiveResponse::from(&objective),
        Some("Objetivo actualizado exitosamente"),
    ))
}

pub async fn change_objective_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::StatusRequest<ObjectiveStatus>>, JsonRejection>,
) -> HandlerResult {
    let id: ObjectiveId = common::parse_id(&id)?;
    let body = common::body(body)?;
    let objective = common::service(services.objectives.change_status(id, body.status).await)?;
    Ok(errors::ok(
        StatusCode::OK,
        dto::ObjectiveResponse::from(&objective),
        Some("Estado del objetivo actualizado"),
    ))
}

pub async fn delete_objective(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let id: ObjectiveId = common::parse_id(&id)?;
    common::service(services.objectives.delete(id).await)?;
    Ok(errors::ok_message("Objetivo eliminado exitosamente"))
}
