//! Client and service tests against an in-process fake of the catalog
//! backend, bound to an ephemeral port.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use biblio_client::{CatalogClient, CatalogService, ClientError, FileSessionStore, FALLBACK_MESSAGE};
use biblio_core::{MemorySessionStore, Price, Role, Session, SessionKey, SessionStore};
use serde_json::{json, Value};
use tempfile::TempDir;
use url::Url;

// =============================================================================
// Fake Backend
// =============================================================================

const TOKEN: &str = "fake-jwt-token";

#[derive(Debug)]
struct FakeState {
    books: Vec<Value>,
    next_id: i64,
    accepted_token: String,
    echo_books: bool,
    list_fails: bool,
    requests: usize,
    last_login: Option<Value>,
    last_auth: Option<String>,
}

type Shared = Arc<Mutex<FakeState>>;

impl FakeState {
    fn seeded() -> Self {
        FakeState {
            books: vec![
                json!({"id": 1, "titulo": "Ficciones", "autor": "Jorge Luis Borges", "precio": 15.5}),
                json!({"id": 2, "titulo": "Rayuela", "autor": "Julio Cortázar", "precio": 12.0}),
                json!({"id": 3, "titulo": "El Aleph", "autor": "Jorge Luis Borges", "precio": 9.99}),
            ],
            next_id: 4,
            accepted_token: TOKEN.to_string(),
            echo_books: false,
            list_fails: false,
            requests: 0,
            last_login: None,
            last_auth: None,
        }
    }

    fn authorized(&mut self, headers: &HeaderMap) -> bool {
        self.requests += 1;
        self.last_auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.last_auth.as_deref() == Some(format!("Bearer {}", self.accepted_token).as_str())
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.books.iter().position(|b| b["id"] == json!(id))
    }
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"error": "Token inválido"}))).into_response()
}

fn not_found() -> Response {
    // Flask's default 404 page: no JSON message.
    (StatusCode::NOT_FOUND, "<h1>Not Found</h1>").into_response()
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    state.requests += 1;
    state.last_login = Some(body.clone());

    if body["password"] == "wrong" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Credenciales incorrectas"})),
        )
            .into_response();
    }

    Json(json!({
        "token": TOKEN,
        "rol": body["rol"],
        "username": body["username"],
    }))
    .into_response()
}

async fn list_books(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    if !state.authorized(&headers) {
        return unauthorized();
    }
    if state.list_fails {
        return (StatusCode::INTERNAL_SERVER_ERROR, "").into_response();
    }
    Json(Value::Array(state.books.clone())).into_response()
}

async fn get_book(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.lock().unwrap();
    if !state.authorized(&headers) {
        return unauthorized();
    }
    match state.position(id) {
        Some(i) => Json(state.books[i].clone()).into_response(),
        None => not_found(),
    }
}

async fn create_book(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if !state.authorized(&headers) {
        return unauthorized();
    }

    match body["titulo"].as_str() {
        Some("explode") => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Error al crear el libro"})),
            )
                .into_response()
        }
        Some("crash") => return (StatusCode::INTERNAL_SERVER_ERROR, "").into_response(),
        _ => {}
    }

    let id = state.next_id;
    state.next_id += 1;
    let book = json!({"id": id, "titulo": body["titulo"], "autor": body["autor"], "precio": body["precio"]});
    state.books.push(book.clone());

    if state.echo_books {
        (StatusCode::CREATED, Json(book)).into_response()
    } else {
        (StatusCode::CREATED, Json(json!({"mensaje": "Libro añadido"}))).into_response()
    }
}

async fn update_book(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let Some(i) = state.position(id) else {
        return not_found();
    };

    let book = json!({"id": id, "titulo": body["titulo"], "autor": body["autor"], "precio": body["precio"]});
    state.books[i] = book.clone();

    if state.echo_books {
        Json(book).into_response()
    } else {
        Json(json!({"mensaje": "Libro actualizado"})).into_response()
    }
}

async fn delete_book(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.lock().unwrap();
    if !state.authorized(&headers) {
        return unauthorized();
    }
    match state.position(id) {
        Some(i) => {
            state.books.remove(i);
            Json(json!({"mensaje": "Libro eliminado"})).into_response()
        }
        None => not_found(),
    }
}

struct TestServer {
    base_url: Url,
    state: Shared,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let state: Shared = Arc::new(Mutex::new(FakeState::seeded()));
        let app = Router::new()
            .route("/login", post(login))
            .route("/libros/", get(list_books))
            .route("/libros/nuevo", post(create_book))
            .route("/libros/{id}", get(get_book).put(update_book))
            .route("/libros/eliminar/{id}", delete(delete_book))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = Url::parse(&format!("http://{}/", addr)).unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            state,
            handle,
        }
    }

    fn client(&self) -> CatalogClient {
        CatalogClient::new(self.base_url.clone())
    }

    fn service_as(&self, role: Role) -> CatalogService<MemorySessionStore> {
        let mut store = MemorySessionStore::new();
        Session::new(TOKEN, role, "tester").save(&mut store).unwrap();
        CatalogService::new(self.client(), store)
    }

    fn requests(&self) -> usize {
        self.state.lock().unwrap().requests
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn titles<'a>(books: impl Iterator<Item = &'a biblio_core::Book>) -> Vec<String> {
    books.map(|b| b.title.clone()).collect()
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn login_stores_session() {
    let srv = TestServer::spawn().await;
    let mut service = CatalogService::new(srv.client(), MemorySessionStore::new());

    let session = service.login("  ana ", "mod_secret", "moderador").await.unwrap();
    assert_eq!(session.current_role(), Role::Moderator);
    assert_eq!(session.username(), "ana");

    let body = srv.state.lock().unwrap().last_login.clone().unwrap();
    assert_eq!(body, json!({"username": "ana", "password": "mod_secret", "rol": "moderador"}));

    let store = service.store();
    assert_eq!(store.get(SessionKey::Token).as_deref(), Some(TOKEN));
    assert_eq!(store.get(SessionKey::UserRole).as_deref(), Some("moderador"));
    assert_eq!(store.get(SessionKey::Username).as_deref(), Some("ana"));
}

#[tokio::test]
async fn login_failure_surfaces_backend_message() {
    let srv = TestServer::spawn().await;
    let mut service = CatalogService::new(srv.client(), MemorySessionStore::new());

    let err = service.login("ana", "wrong", "usuario").await.unwrap_err();
    assert!(err.is_auth_error());
    assert_eq!(err.user_message(), "Credenciales incorrectas");
    assert!(!service.session().is_authenticated());
}

#[tokio::test]
async fn invalid_credential_sends_nothing() {
    let srv = TestServer::spawn().await;
    let mut service = CatalogService::new(srv.client(), MemorySessionStore::new());

    let err = service.login("ana", "secret", "admin").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(srv.requests(), 0);
}

// =============================================================================
// Reads
// =============================================================================

#[tokio::test]
async fn refresh_sends_bearer_token_and_fills_cache() {
    let srv = TestServer::spawn().await;
    let mut service = srv.service_as(Role::User);

    let catalog = service.refresh().await.unwrap();
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.get(1).unwrap().price, Price::from_cents(1550));

    assert_eq!(
        srv.state.lock().unwrap().last_auth.as_deref(),
        Some("Bearer fake-jwt-token")
    );
    assert_eq!(titles(service.search("borges")), vec!["Ficciones", "El Aleph"]);
    assert_eq!(service.search("").count(), 3);
}

#[tokio::test]
async fn fetch_missing_book_is_not_found() {
    let srv = TestServer::spawn().await;
    let mut service = srv.service_as(Role::User);

    assert_eq!(service.fetch(2).await.unwrap().title, "Rayuela");

    let err = service.fetch(99).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.user_message(), "Book not found");
}

#[tokio::test]
async fn expired_token_logs_out() {
    let srv = TestServer::spawn().await;
    let mut service = srv.service_as(Role::Admin);
    srv.state.lock().unwrap().accepted_token = "rotated".to_string();

    let err = service.refresh().await.unwrap_err();
    assert!(matches!(err, ClientError::Auth { .. }));
    assert_eq!(err.user_message(), "Token inválido");
    assert!(!service.session().is_authenticated());

    let err = service.refresh().await.unwrap_err();
    assert!(matches!(err, ClientError::NotLoggedIn));
}

// =============================================================================
// Mutations
// =============================================================================

#[tokio::test]
async fn create_reloads_catalog() {
    let srv = TestServer::spawn().await;
    let mut service = srv.service_as(Role::Moderator);

    let created = service
        .create(" Pedro Páramo ", "Juan Rulfo", "12.5")
        .await
        .unwrap();
    assert!(created.is_none());

    assert_eq!(service.catalog().len(), 4);
    let book = service.catalog().get(4).unwrap();
    assert_eq!(book.title, "Pedro Páramo");
    assert_eq!(book.price, Price::from_cents(1250));
}

#[tokio::test]
async fn create_returns_echoed_book() {
    let srv = TestServer::spawn().await;
    srv.state.lock().unwrap().echo_books = true;
    let mut service = srv.service_as(Role::Admin);

    let created = service.create("Pedro Páramo", "Juan Rulfo", "7").await.unwrap();
    let created = created.unwrap();
    assert_eq!(created.id, 4);
    assert_eq!(created.price, Price::from_cents(700));
}

#[tokio::test]
async fn user_cannot_create_and_nothing_is_sent() {
    let srv = TestServer::spawn().await;
    let mut service = srv.service_as(Role::User);

    let err = service.create("T", "A", "1").await.unwrap_err();
    assert!(matches!(err, ClientError::Forbidden { .. }));
    assert_eq!(srv.requests(), 0);
}

#[tokio::test]
async fn invalid_book_is_not_sent() {
    let srv = TestServer::spawn().await;
    let mut service = srv.service_as(Role::Admin);

    let err = service.create("T", "A", "9999.991").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(srv.requests(), 0);
}

#[tokio::test]
async fn server_error_message_is_verbatim_or_fallback() {
    let srv = TestServer::spawn().await;
    let mut service = srv.service_as(Role::Admin);
    service.refresh().await.unwrap();

    let err = service.create("explode", "A", "1").await.unwrap_err();
    assert_eq!(err.user_message(), "Error al crear el libro");

    let err = service.create("crash", "A", "1").await.unwrap_err();
    assert!(err.is_unexpected());
    assert_eq!(err.user_message(), FALLBACK_MESSAGE);

    // Failed calls leave the cache as it was.
    assert_eq!(service.catalog().len(), 3);
}

#[tokio::test]
async fn failed_reload_does_not_undo_successful_create() {
    let srv = TestServer::spawn().await;
    let mut service = srv.service_as(Role::Admin);
    service.refresh().await.unwrap();
    srv.state.lock().unwrap().list_fails = true;

    let result = service.create("Pedro Páramo", "Juan Rulfo", "7").await;
    assert!(result.is_ok());
    assert_eq!(srv.state.lock().unwrap().books.len(), 4);
    assert!(service.is_stale());
    assert_eq!(service.catalog().len(), 3);

    let result = service.update(1, "Ficciones (ed. 2)", "Jorge Luis Borges", "16").await;
    assert!(result.is_ok());
    assert!(service.is_stale());

    srv.state.lock().unwrap().list_fails = false;
    assert_eq!(service.refresh().await.unwrap().len(), 4);
    assert!(!service.is_stale());
    assert_eq!(service.catalog().get(1).unwrap().title, "Ficciones (ed. 2)");
}

#[tokio::test]
async fn update_replaces_fields() {
    let srv = TestServer::spawn().await;
    let mut service = srv.service_as(Role::Moderator);

    service
        .update(2, "Rayuela (ed. 2)", "Julio Cortázar", "14")
        .await
        .unwrap();
    let book = service.catalog().get(2).unwrap();
    assert_eq!(book.title, "Rayuela (ed. 2)");
    assert_eq!(book.price, Price::from_cents(1400));

    let err = service.update(99, "X", "Y", "1").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn admin_delete_removes_row_after_success() {
    let srv = TestServer::spawn().await;
    let mut service = srv.service_as(Role::Admin);
    service.refresh().await.unwrap();

    let removed = service.delete(2).await.unwrap();
    assert_eq!(removed.unwrap().title, "Rayuela");
    assert_eq!(titles(service.catalog().iter()), vec!["Ficciones", "El Aleph"]);
    assert_eq!(srv.state.lock().unwrap().books.len(), 2);
}

#[tokio::test]
async fn failed_delete_keeps_row() {
    let srv = TestServer::spawn().await;
    let mut service = srv.service_as(Role::Admin);
    service.refresh().await.unwrap();

    let err = service.delete(99).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(service.catalog().len(), 3);
}

#[tokio::test]
async fn moderator_delete_is_not_sent() {
    let srv = TestServer::spawn().await;
    let mut service = srv.service_as(Role::Moderator);

    let err = service.delete(1).await.unwrap_err();
    assert!(matches!(err, ClientError::Forbidden { .. }));
    assert_eq!(srv.requests(), 0);
    assert_eq!(srv.state.lock().unwrap().books.len(), 3);
}

// =============================================================================
// Session File
// =============================================================================

#[tokio::test]
async fn file_session_survives_restart() {
    let srv = TestServer::spawn().await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.toml");

    let mut first = CatalogService::new(srv.client(), FileSessionStore::open(&path));
    first.login("root", "secret@1", "admin").await.unwrap();
    drop(first);

    let mut second = CatalogService::new(srv.client(), FileSessionStore::open(&path));
    assert_eq!(second.session().current_role(), Role::Admin);
    assert_eq!(second.refresh().await.unwrap().len(), 3);

    second.logout().unwrap();
    assert!(!path.exists());
}
