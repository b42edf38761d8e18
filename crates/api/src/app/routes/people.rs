use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use livelum_people::{PersonId, PersonStatus};

use crate::app::routes::common::{self, HandlerResult};
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_person).get(list_people))
        .route("/:id", get(get_person).put(update_person).delete(delete_person))
        .route("/:id/status", patch(change_person_status))
        .route("/:id/positions", patch(assign_person_positions))
}

pub async fn create_person(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreatePersonRequest>, JsonRejection>,
) -> HandlerResult {
    let body = common::body(body)?;
    let person = common::service(services.people.create(body.into()).await)?;
    Ok(errors::ok(
        StatusCode::CREATED,
        dto::PersonResponse::from(&person),
        Some("Persona creada exitosamente"),
    ))
}

pub async fn list_people(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::PersonListQuery>, QueryRejection>,
) -> HandlerResult {
    let criteria = common::criteria(common::query(query)?.into_criteria())?;
    let page = common::service(services.people.search(criteria).await)?;
    let items = page.items.iter().map(dto::PersonResponse::from).collect::<Vec<_>>();
    Ok(errors::ok_page(items, page.total))
}

pub async fn get_person(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let id: PersonId = common::parse_id(&id)?;
    let person = common::service(services.people.get(id).await)?;
    Ok(errors::ok(StatusCode::OK, dto::PersonResponse::from(&person), None))
}

pub async fn update_person(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdatePersonRequest>, JsonRejection>,
) -> HandlerResult {
    let id: PersonId = common::parse_id(&id)?;
    let body = common::body(body)?;
    let person = common::service(services.people.update(id, body.into()).await)?;
    Ok(errors::ok(
        StatusCode::OK,
        dto::PersonResponse::from(&person),
        Some("Persona actualizada exitosamente"),
    ))
}

pub async fn change_person_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::StatusRequest<PersonStatus>>, JsonRejection>,
) -> HandlerResult {
    let id: PersonId = common::parse_id(&id)?;
    let body = common::body(body)?;
    let person = common::service(services.people.change_status(id, body.status).await)?;
    Ok(errors::ok(
        StatusCode::OK,
        dto::PersonResponse::from(&person),
        Some("Estado de la persona actualizado"),
    ))
}

pub async fn assign_person_positions(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::AssignPositionsRequest>, JsonRejection>,
) -> HandlerResult {
    let id: PersonId = common::parse_id(&id)?;
    let body = common::body(body)?;
    let person = common::service(services.people.assign_positions(id, body.position_ids).await)?;
    Ok(errors::ok(
        StatusCode::OK,
        dto::PersonResponse::from(&person),
        Some("Cargos asignados exitosamente"),
    ))
}

pub async fn delete_person(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let id: PersonId = common::parse_id(&id)?;
    common::service(services.people.delete(id).await)?;
    Ok(errors::ok_message("Persona eliminada exitosamente"))
}
