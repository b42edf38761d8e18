use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use livelum_stakeholders::StakeholderId;

use crate::app::routes::common::{self, HandlerResult};
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_stakeholder).get(list_stakeholders))
        .route("/:id", get(get_stakeholder).put(update_stakeholder).delete(delete_stakeholder))
}

pub async fn create_stakeholder(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateStakeholderRequest>, JsonRejection>,
) -> HandlerResult {
    let body = common::body(body)?;
    let stakeholder = common::service(services.stakeholders.create(body.into()).await)?;
    Ok(errors::ok(
        StatusCode::CREATED,
        dto::StakeholderResponse::from(&stakeholder),
        Some("Parte interesada creada exitosamente"),
    ))
}

pub async fn list_stakeholders(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::StakeholderListQuery>, QueryRejection>,
) -> HandlerResult {
    let criteria = common::criteria(common::query(query)?.into_criteria())?;
    let page = common::service(services.stakeholders.search(criteria).await)?;
    let items = page.items.iter().map(dto::StakeholderResponse::from).collect::<Vec<_>>();
    Ok(errors::ok_page(items, page.total))
}

pub async fn get_stakeholder(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let id: StakeholderId = common::parse_id(&id)?;
    let stakeholder = common::service(services.stakeholders.get(id).await)?;
    Ok(errors::ok(StatusCode::OK, dto::StakeholderResponse::from(&stakeholder), None))
}

pub async fn update_stakeholder(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateStakeholderRequest>, JsonRejection>,
) -> HandlerResult {
    let id: StakeholderId = common::parse_id(&id)?;
    let body = common::body(body)?;
    let stakeholder = common::service(services.stakeholders.update(id, body.into()).await)?;
    Ok(errors::ok(
        StatusCode::OK,
        dto::StakeholderResponse::from(&stakeholder),
        Some("Parte interesada actualizada exitosamente"),
    ))
}

pub async fn delete_stakeholder(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let id: StakeholderId = common::parse_id(&id)?;
    common::service(services.stakeholders.delete(id).await)?;
    Ok(errors::ok_message("Parte interesada eliminada exitosamente"))
}
