use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use livelum_documents::{DocumentId, DocumentStatus};

use crate::app::routes::common::{self, HandlerResult};
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_document).get(list_documents))
        .route("/:id", get(get_document).put(update_document).delete(delete_document))
        .route("/:id/status", patch(change_document_status))
}

pub async fn create_document(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateDocumentRequest>, JsonRejection>,
) -> HandlerResult {
    let body = common::body(body)?;
    let document = common::service(services.documents.create(body.into()).await)?;
    Ok(errors::ok(
        StatusCode::CREATED,
        dto::DocumentResponse::from(&document),
        Some("Documento creado exitosamente"),
    ))
}

pub async fn list_documents(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::DocumentListQuery>, QueryRejection>,
) -> HandlerResult {
    let criteria = common::criteria(common::query(query)?.into_criteria())?;
    let page = common::service(services.documents.search(criteria).await)?;
    let items = page.items.iter().map(dto::DocumentResponse::from).collect::<Vec<_>>();
    Ok(errors::ok_page(items, page.total))
}

pub async fn get_document(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let id: DocumentId = common::parse_id(&id)?;
    let document = common::service(services.documents.get(id).await)?;
    Ok(errors::ok(StatusCode::OK, dto::DocumentResponse::from(&document), None))
}

pub async fn update_document(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateDocumentRequest>, JsonRejection>,
) -> HandlerResult {
    let id: DocumentId = common::parse_id(&id)?;
    let body = common::body(body)?;
    let document = common::service(services.documents.update(id, body.into()).await)?;
    Ok(errors::ok(
        StatusCode::OK,
        dto::DocumentResponse::from(&document),
        Some("Documento actualizado exitosamente"),
    ))
}

pub async fn change_document_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::StatusRequest<DocumentStatus>>, JsonRejection>,
) -> HandlerResult {
    let id: DocumentId = common::parse_id(&id)?;
    let body = common::body(body)?;
    let document = common::service(services.documents.change_status(id, body.status).await)?;
    Ok(errors::ok(
        StatusCode::OK,
        dto::DocumentResponse::from(&document),
        Some("Estado del documento actualizado"),
    ))
}

pub async fn delete_document(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let id: DocumentId = common::parse_id(&id)?;
    common::service(services.documents.delete(id).await)?;
    Ok(errors::ok_message("Documento eliminado exitosamente"))
}
