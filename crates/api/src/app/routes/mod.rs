use axum::Router;

pub mod common;
pub mod companies;
pub mod documents;
pub mod objectives;
pub mod people;
pub mod risks;
pub mod skills;
pub mod stakeholders;
pub mod system;

/// Router for every module endpoint.
pub fn router() -> Router {
    Router::new()
        .nest("/companies", companies::router())
        .nest("/people", people::router())
        .nest("/skills", skills::router())
        .nest("/stakeholders", stakeholders::router())
        .nest("/documents", documents::router())
        .nest("/risks", risks::router())
        .nest("/objectives", objectives::router())
}
