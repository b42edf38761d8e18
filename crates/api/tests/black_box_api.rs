use std::sync::Arc;

use livelum_api::app::{AppServices, build_app};
use reqwest::StatusCode;
use serde_json::{Value, json};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory storage, ephemeral port.
        let app = build_app(Arc::new(AppServices::in_memory()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn company_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

fn person_body(company_id: &str, documento: &str) -> Value {
    json!({
        "firstName": "Ana",
        "lastName": "Pérez",
        "documento": documento,
        "email": "ana@example.com",
        "companyId": company_id,
    })
}

fn timestamp(value: &Value) -> chrono::DateTime<chrono::FixedOffset> {
    chrono::DateTime::parse_from_rfc3339(value.as_str().unwrap()).unwrap()
}

async fn post_json(client: &reqwest::Client, url: String, body: &Value) -> (StatusCode, Value) {
    let res = client.post(url).json(body).send().await.unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn person_without_documento_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let body = json!({
        "firstName": "Ana",
        "lastName": "Pérez",
        "companyId": company_id(),
    });
    let (status, body) = post_json(&client, srv.url("/people"), &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn skill_lifecycle_create_update_status_delete() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let company = company_id();

    let (status, created) = post_json(
        &client,
        srv.url("/skills"),
        &json!({ "title": "Rust", "category": "TECHNICAL", "companyId": company }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["success"], true);
    assert_eq!(created["data"]["number"], 1);
    assert_eq!(created["data"]["status"], "ACTIVE");
    assert_eq!(created["data"]["isActive"], true);
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let res = client
        .put(srv.url(&format!("/skills/{id}")))
        .json(&json!({ "title": "Rust avanzado" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["data"]["title"], "Rust avanzado");
    assert!(timestamp(&updated["data"]["updatedAt"]) > timestamp(&created["data"]["updatedAt"]));

    let res = client
        .patch(srv.url(&format!("/skills/{id}/status")))
        .json(&json!({ "status": "INACTIVE" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["isActive"], false);

    let res = client.delete(srv.url(&format!("/skills/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);

    let res = client.get(srv.url(&format!("/skills/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn blank_title_is_a_400_with_the_domain_message() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = post_json(
        &client,
        srv.url("/skills"),
        &json!({ "title": "   ", "category": "SOFT", "companyId": company_id() }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "El título de la habilidad es requerido");
}

#[tokio::test]
async fn malformed_id_is_a_400() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/risks/not-a-uuid")).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_documento_is_a_409() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let company = company_id();

    let (status, _) = post_json(&client, srv.url("/people"), &person_body(&company, "12345678")).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(&client, srv.url("/people"), &person_body(&company, "12345678")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "conflict");
}

#[tokio::test]
async fn people_positions_and_derived_fields() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (_, created) = post_json(&client, srv.url("/people"), &person_body(&company_id(), "1")).await;
    assert_eq!(created["data"]["fullName"], "Ana Pérez");
    assert_eq!(created["data"]["documento"], "1");
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let res = client
        .patch(srv.url(&format!("/people/{id}/positions")))
        .json(&json!({ "positionIds": ["jefe", "auditor", "jefe"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["positionIds"], json!(["jefe", "auditor"]));
}

#[tokio::test]
async fn list_filters_paginates_and_reports_total() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let company = company_id();

    for (title, probability) in [("Corte de energía", 5), ("Falla de proveedor", 1), ("Fuga de datos", 4)] {
        let (status, _) = post_json(
            &client,
            srv.url("/risks"),
            &json!({ "title": title, "probability": probability, "impact": 5, "companyId": company }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let res = client
        .get(srv.url(&format!("/risks?companyId={company}&limit=2&page=1&sortBy=score&sortOrder=desc")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["total"], 3);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["score"], 25);
    assert_eq!(data[0]["level"], "CRITICAL");

    let res = client
        .get(srv.url(&format!("/risks?companyId={company}&title=FALLA")))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["total"], 1);

    let res = client.get(srv.url("/risks?limit=500")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stakeholders_keep_spanish_keys() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, created) = post_json(
        &client,
        srv.url("/stakeholders"),
        &json!({
            "nombre": "Clientes",
            "tipo": "EXTERNAL",
            "requisitos": "Entrega a tiempo",
            "companyId": company_id(),
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["nombre"], "Clientes");
    assert_eq!(created["data"]["numero"], 1);
    assert_eq!(created["data"]["metodoEvaluacion"], "");
    assert_eq!(created["data"]["isInternal"], false);
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let res = client
        .put(srv.url(&format!("/stakeholders/{id}")))
        .json(&json!({ "requisitos": " Entrega a tiempo ", "metodoEvaluacion": " Encuesta " }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["data"]["requisitos"], "Entrega a tiempo");
    assert_eq!(updated["data"]["metodoEvaluacion"], "Encuesta");
}

#[tokio::test]
async fn objective_progress_is_capped() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, created) = post_json(
        &client,
        srv.url("/objectives"),
        &json!({
            "title": "Capacitar al personal",
            "targetValue": 20,
            "currentValue": 30,
            "dueDate": "2026-12-31",
            "companyId": company_id(),
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["progress"], 100.0);
    assert_eq!(created["data"]["dueDate"], "2026-12-31");
}

#[tokio::test]
async fn companies_crud_and_unique_tax_id() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let body = json!({ "name": "Acme SA", "taxId": "20123456789" });
    let (status, created) = post_json(&client, srv.url("/companies"), &body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["isActive"], true);

    let (status, _) = post_json(&client, srv.url("/companies"), &body).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let res = client.get(srv.url("/companies?search=acme")).send().await.unwrap();
    let list: Value = res.json().await.unwrap();
    assert_eq!(list["total"], 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_get_distinct_numbers() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let company = company_id();

    let requests = (0..2).map(|i| {
        let client = client.clone();
        let url = srv.url("/documents");
        let body = json!({
            "code": format!("PR-00{i}"),
            "title": "Procedimiento",
            "kind": "PROCEDURE",
            "companyId": company,
        });
        tokio::spawn(async move { post_json(&client, url, &body).await })
    });

    let mut numbers = Vec::new();
    for handle in requests.collect::<Vec<_>>() {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        numbers.push(body["data"]["number"].as_u64().unwrap());
    }
    numbers.sort_unstable();
    assert_eq!(numbers, vec![1, 2]);
}
