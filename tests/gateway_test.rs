mod common;

use std::collections::HashMap;

use axum::extract::{Path, Query as AxumQuery};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::{Value, json};

use common::token_with;
use gactifs::config::Config;
use gactifs::error::ConsoleError;
use gactifs::gateway::{Gateway, Query};
use gactifs::models::{AuthorKind, Category, Intervention};
use gactifs::session::SessionContext;

const ADMIN_EXP: i64 = 2_000_000_000;

fn admin_token() -> String {
    token_with(&json!({ "sub": "ada@example.org", "role": "ADMIN", "exp": ADMIN_EXP }))
}

fn bearer_ok(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer ") && v.len() > "Bearer ".len())
}

async fn authenticate(Json(body): Json<Value>) -> impl IntoResponse {
    if body["password"] == "s3cret" {
        (
            StatusCode::OK,
            Json(json!({
                "access_token": admin_token(),
                "user": {
                    "id": "u-1",
                    "email": body["email"],
                    "firstName": "Ada",
                    "lastName": "Lovelace",
                },
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Bad credentials" })),
        )
    }
}

async fn categories() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": [
            { "id": 1, "nom": "Informatique", "code": "INFO", "actif": true },
            { "id": 2, "nom": "Topographie", "code": "TOPO", "actif": false },
        ],
        "message": "ok",
    }))
}

async fn check_code(AxumQuery(params): AxumQuery<HashMap<String, String>>) -> Json<Value> {
    Json(json!({ "exists": params.get("code").map(String::as_str) == Some("INFO") }))
}

async fn asset(Path(id): Path<i64>) -> impl IntoResponse {
    match id {
        1 => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": { "id": 1, "nom": "Laptop" } })),
        ),
        2 => (
            StatusCode::OK,
            Json(json!({
                "success": false,
                "message": "validation failed",
                "errors": ["nom is mandatory"],
            })),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "no such asset" })),
        ),
    }
}

async fn interventions(
    headers: HeaderMap,
    AxumQuery(params): AxumQuery<HashMap<String, String>>,
) -> impl IntoResponse {
    if !bearer_ok(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({}))).into_response();
    }
    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
    let content = match page {
        0 => json!([{ "id": 1, "titre": "Replace disk" }, { "id": 2, "titre": "Calibrate" }]),
        _ => json!([{ "id": 3, "titre": "Reinstall" }]),
    };
    Json(json!({
        "content": content,
        "totalElements": 3,
        "totalPages": 2,
        "size": 100,
        "number": page,
        "last": page >= 1,
    }))
    .into_response()
}

fn technicien_directory() -> Value {
    json!([
        { "id": 5, "nom": "Sarr", "prenom": "Moussa", "specialite": "Réseaux", "actif": true },
        { "id": 6, "nom": "Fall", "prenom": "Aminata", "actif": false },
        { "id": 7, "nom": "Ba", "prenom": "Ousmane", "specialite": "Froid", "actif": true },
    ])
}

async fn techniciens() -> Json<Value> {
    Json(technicien_directory())
}

async fn techniciens_actifs() -> Json<Value> {
    let active: Vec<Value> = technicien_directory()
        .as_array()
        .into_iter()
        .flatten()
        .filter(|t| t["actif"] == true)
        .cloned()
        .collect();
    Json(Value::Array(active))
}

async fn commentaires(Path(id): Path<i64>) -> impl IntoResponse {
    if id != 8 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "no such reclamation" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!([
            {
                "id": 1,
                "contenu": "L'imprimante ne répond plus",
                "auteur": "Awa Ndiaye",
                "typeAuteur": "RECLAMANT",
                "dateCreation": "2024-06-01T09:00:00",
            },
            {
                "id": 2,
                "contenu": "Passage prévu demain",
                "auteur": "Moussa Sarr",
                "typeAuteur": "TECHNICIEN",
                "dateCreation": "2024-06-01T11:30:00",
            },
        ])),
    )
}

async fn ajouter_commentaire(
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if !bearer_ok(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "id": 3,
            "contenu": body["contenu"],
            "auteur": "Ada Lovelace",
            "typeAuteur": "ADMIN",
            "dateCreation": "2024-06-02T08:00:00",
            "reclamationId": id,
        })),
    )
}

async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/api/auth/authenticate", post(authenticate))
        .route("/api/categories", get(categories))
        .route("/api/categories/check-code", get(check_code))
        .route("/api/assets/{id}", get(asset))
        .route("/api/interventions", get(interventions))
        .route("/api/techniciens", get(techniciens))
        .route("/api/techniciens/actifs", get(techniciens_actifs))
        .route(
            "/api/reclamations/{id}/commentaires",
            get(commentaires).post(ajouter_commentaire),
        );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock backend");
    let addr = listener.local_addr().expect("Failed to read mock address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{addr}/api")
}

fn gateway(base_url: &str, session: SessionContext) -> Gateway {
    let mut config = Config::default();
    config.api.base_url = base_url.to_string();
    Gateway::new(&config, session).expect("gateway should build")
}

#[tokio::test]
async fn test_login_installs_token_and_role() {
    let url = spawn_backend().await;
    let session = SessionContext::new();
    let gateway = gateway(&url, session.clone());

    let response = gateway
        .auth()
        .login("ada@example.org", &SecretString::from("s3cret"))
        .await
        .expect("login should succeed");

    assert!(response.has_token());
    assert!(session.has_token());
    assert_eq!(session.role_name().as_deref(), Some("ADMIN"));
    assert!(session.guard().is_ok());
    let user = session.current_user().expect("user should be installed");
    assert_eq!(user.display_name(), "Ada Lovelace");
}

#[tokio::test]
async fn test_login_with_bad_password_is_reported_plainly() {
    let url = spawn_backend().await;
    let session = SessionContext::new();
    let gateway = gateway(&url, session.clone());

    let err = gateway
        .auth()
        .login("ada@example.org", &SecretString::from("wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("invalid email or password"));
    assert!(!session.has_token());
}

#[tokio::test]
async fn test_detect_shape_accepts_envelope_and_raw_bodies() {
    let url = spawn_backend().await;
    let gateway = gateway(&url, SessionContext::new());
    let categories = gateway.resource::<Category>();

    let all = categories.list(&Query::new()).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].code, "TOPO");
    assert!(!all[1].actif);

    assert!(gateway.categories().code_exists("INFO", None).await.unwrap());
    assert!(!gateway.categories().code_exists("VEHI", Some(4)).await.unwrap());
}

#[tokio::test]
async fn test_enveloped_rejection_and_status_mapping() {
    let url = spawn_backend().await;
    let gateway = gateway(&url, SessionContext::new());
    let assets = gateway.assets();

    let laptop = assets.get(&1).await.unwrap();
    assert_eq!(laptop.nom, "Laptop");

    let rejected = assets.get(&2).await.unwrap_err();
    assert!(matches!(rejected, ConsoleError::Rejected(_)));
    assert!(rejected.to_string().contains("validation failed (nom is mandatory)"));

    let missing = assets.get(&9).await.unwrap_err();
    assert_eq!(missing.status(), Some(404));
    assert_eq!(missing.to_string(), "asset not found");
}

#[tokio::test]
async fn test_paged_listing_is_walked_with_bearer() {
    let url = spawn_backend().await;

    let anonymous = gateway(&url, SessionContext::new());
    let err = anonymous
        .resource::<Intervention>()
        .list(&Query::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ConsoleError::Unauthenticated));

    let session = SessionContext::new();
    session.establish(admin_token(), None, None);
    let authed = gateway(&url, session);
    let all = authed
        .resource::<Intervention>()
        .list(&Query::new())
        .await
        .unwrap();
    let titles: Vec<&str> = all.iter().map(|i| i.titre.as_str()).collect();
    assert_eq!(titles, ["Replace disk", "Calibrate", "Reinstall"]);
}

#[tokio::test]
async fn test_technician_directory_and_active_subset() {
    let url = spawn_backend().await;
    let gateway = gateway(&url, SessionContext::new());
    let technicians = gateway.technicians();

    let all = technicians.list(&Query::new()).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].full_name(), "Moussa Sarr");

    let active = technicians.active().await.unwrap();
    let ids: Vec<Option<i64>> = active.iter().map(|t| t.id).collect();
    assert_eq!(ids, [Some(5), Some(7)]);
    assert!(active.iter().all(|t| t.actif == Some(true)));
}

#[tokio::test]
async fn test_reclamation_comment_thread() {
    let url = spawn_backend().await;
    let session = SessionContext::new();
    session.establish(admin_token(), None, None);
    let gateway = gateway(&url, session);
    let reclamations = gateway.reclamations();

    let thread = reclamations.comments(8).await.unwrap();
    assert_eq!(thread.len(), 2);
    assert_eq!(thread[0].type_auteur, Some(AuthorKind::Reclamant));
    assert_eq!(thread[1].auteur.as_deref(), Some("Moussa Sarr"));

    let missing = reclamations.comments(99).await.unwrap_err();
    assert_eq!(missing.status(), Some(404));

    let added = reclamations
        .add_comment(8, "  Cartouche remplacée ")
        .await
        .unwrap();
    assert_eq!(added.id, Some(3));
    assert_eq!(added.contenu, "Cartouche remplacée");
    assert_eq!(added.type_auteur, Some(AuthorKind::Admin));

    let empty = reclamations.add_comment(8, "   ").await.unwrap_err();
    assert!(matches!(empty, ConsoleError::InvalidInput(_)));
}
