use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use livelum_companies::CompanyStatus;
use livelum_core::CompanyId;

use crate::app::routes::common::{self, HandlerResult};
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_company).get(list_companies))
        .route("/:id", get(get_company).put(update_company).delete(delete_company))
        .route("/:id/status", patch(change_company_status))
}

pub async fn create_company(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateCompanyRequest>, JsonRejection>,
) -> HandlerResult {
    let body = common::body(body)?;
    let company = common::service(services.companies.create(body.into()).await)?;
    Ok(errors::ok(
        StatusCode::CREATED,
        dto::CompanyResponse::from(&company),
        Some("Empresa creada exitosamente"),
    ))
}

pub async fn list_companies(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::CompanyListQuery>, QueryRejection>,
) -> HandlerResult {
    let criteria = common::criteria(common::query(query)?.into_criteria())?;
    let page = common::service(services.companies.search(criteria).await)?;
    let items = page.items.iter().map(dto::CompanyResponse::from).collect::<Vec<_>>();
    Ok(errors::ok_page(items, page.total))
}

pub async fn get_company(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let id: CompanyId = common::parse_id(&id)?;
    let company = common::service(services.companies.get(id).await)?;
    Ok(errors::ok(StatusCode::OK, dto::CompanyResponse::from(&company), None))
}

pub async fn update_company(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateCompanyRequest>, JsonRejection>,
) -> HandlerResult {
    let id: CompanyId = common::parse_id(&id)?;
    let body = common::body(body)?;
    let company = common::service(services.companies.update(id, body.into()).await)?;
    Ok(errors::ok(
        StatusCode::OK,
        dto::CompanyResponse::from(&company),
        Some("Empresa actualizada exitosamente"),
    ))
}

pub async fn change_company_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::StatusRequest<CompanyStatus>>, JsonRejection>,
) -> HandlerResult {
    let id: CompanyId = common::parse_id(&id)?;
    let body = common::body(body)?;
    let company = common::service(services.companies.change_status(id, body.status).await)?;
    Ok(errors::ok(
        StatusCode::OK,
        dto::CompanyResponse::from(&company),
        Some("Estado de la empresa actualizado"),
    ))
}

pub async fn delete_company(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let id: CompanyId = common::parse_id(&id)?;
    common::service(services.companies.delete(id).await)?;
    Ok(errors::ok_message("Empresa eliminada exitosamente"))
}
