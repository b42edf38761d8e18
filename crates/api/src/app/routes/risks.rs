use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use livelum_risks::{RiskId, RiskStatus};

use crate::app::routes::common::{self, HandlerResult};
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_risk).get(list_risks))
        .route("/:id", get(get_risk).put(update_risk).delete(delete_risk))
        .route("/:id/status", patch(change_risk_status))
}

pub async fn create_risk(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateRiskRequest>, JsonRejection>,
) -> HandlerResult {
    let body = common::body(body)?;
    let risk = common::service(services.risks.create(body.into()).await)?;
    Ok(errors::ok(
        StatusCode::CREATED,
        dto::RiskResponse::from(&risk),
        Some("Riesgo creado exitosamente"),
    ))
}

pub async fn list_risks(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::RiskListQuery>, QueryRejection>,
) -> HandlerResult {
    let criteria = common::criteria(common::query(query)?.into_criteria())?;
    let page = common::service(services.risks.search(criteria).await)?;
    let items = page.items.iter().map(dto::RiskResponse::from).collect::<Vec<_>>();
    Ok(errors::ok_page(items, page.total))
}

pub async fn get_risk(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let id: RiskId = common::parse_id(&id)?;
    let risk = common::service(services.risks.get(id).await)?;
    Ok(errors::ok(StatusCode::OK, dto::RiskResponse::from(&risk), None))
}

pub async fn update_risk(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateRiskRequest>, JsonRejection>,
) -> HandlerResult {
    let id: RiskId = common::parse_id(&id)?;
    let body = common::body(body)?;
    let risk = common::service(services.risks.update(id, body.into()).await)?;
    Ok(errors::ok(
        StatusCode::OK,
        dto::RiskResponse::from(&risk),
        Some("Riesgo actualizado exitosamente"),
    ))
}

pub async fn change_risk_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::StatusRequest<RiskStatus>>, JsonRejection>,
) -> HandlerResult {
    let id: RiskId = common::parse_id(&id)?;
    let body = common::body(body)?;
    let risk = common::service(services.risks.change_status(id, body.status).await)?;
    Ok(errors::ok(
        StatusCode::OK,
        dto::RiskResponse::from(&risk),
        Some("Estado del riesgo actualizado"),
    ))
}

pub async fn delete_risk(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let id: RiskId = common::parse_id(&id)?;
    common::service(services.risks.delete(id).await)?;
    Ok(errors::ok_message("Riesgo eliminado exitosamente"))
}
