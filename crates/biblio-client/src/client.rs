//! # Catalog HTTP Client
//!
//! Thin typed wrapper over the backend's REST endpoints.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Method  Path                       Body                 Answer        │
//! │  ──────  ─────────────────────────  ───────────────────  ────────────  │
//! │  POST    login                      {username,password,  {token,rol,   │
//! │                                      rol}                 username}    │
//! │  GET     libros/                    -                    [Book]        │
//! │  GET     libros/{id}                -                    Book          │
//! │  POST    libros/nuevo               {titulo,autor,       Book or       │
//! │                                      precio}              {mensaje}    │
//! │  PUT     libros/{id}                {titulo,autor,       Book or       │
//! │                                      precio}              {mensaje}    │
//! │  DELETE  libros/eliminar/{id}       -                    any 2xx       │
//! │                                                                         │
//! │  Authorization: Bearer <token> on everything but login                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No retries and no timeouts are configured: each call resolves once.

use biblio_core::{Book, BookId, ValidBook, ValidCredential};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Body of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,

    /// Role echoed by the backend; resolved leniently by the caller.
    #[serde(default)]
    pub rol: Option<String>,

    #[serde(default)]
    pub username: Option<String>,
}

/// HTTP client for the catalog backend.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl CatalogClient {
    /// Creates a client for `base_url` (which should end with `/`).
    pub fn new(base_url: Url) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    /// Creates a client sharing an existing `reqwest::Client`.
    pub fn with_http(http: reqwest::Client, base_url: Url) -> Self {
        CatalogClient {
            http,
            base_url,
            token: None,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sets or clears the bearer token sent with catalog requests.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|t| !t.trim().is_empty());
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    // =========================================================================
    // Endpoints
    // =========================================================================

    /// `POST /login`.
    pub async fn login(&self, credential: &ValidCredential) -> ClientResult<LoginResponse> {
        let request = self.request(Method::POST, "login", false)?.json(credential);
        let response = send(request).await?;
        decode(response).await
    }

    /// `GET /libros/`.
    pub async fn list_books(&self) -> ClientResult<Vec<Book>> {
        let request = self.request(Method::GET, "libros/", true)?;
        let response = send(request).await?;
        decode(response).await
    }

    /// `GET /libros/{id}`.
    pub async fn get_book(&self, id: BookId) -> ClientResult<Book> {
        let request = self.request(Method::GET, &format!("libros/{}", id), true)?;
        let response = send(request).await?;
        decode(response).await
    }

    /// `POST /libros/nuevo`. Returns the created book when the backend
    /// echoes it.
    pub async fn create_book(&self, book: &ValidBook) -> ClientResult<Option<Book>> {
        let request = self.request(Method::POST, "libros/nuevo", true)?.json(book);
        let response = send(request).await?;
        decode_optional_book(response).await
    }

    /// `PUT /libros/{id}`. Returns the updated book when the backend
    /// echoes it.
    pub async fn update_book(&self, id: BookId, book: &ValidBook) -> ClientResult<Option<Book>> {
        let request = self
            .request(Method::PUT, &format!("libros/{}", id), true)?
            .json(book);
        let response = send(request).await?;
        decode_optional_book(response).await
    }

    /// `DELETE /libros/eliminar/{id}`. Any 2xx counts as deleted.
    pub async fn delete_book(&self, id: BookId) -> ClientResult<()> {
        let request = self.request(Method::DELETE, &format!("libros/eliminar/{}", id), true)?;
        send(request).await?;
        Ok(())
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    fn request(&self, method: Method, path: &str, authed: bool) -> ClientResult<RequestBuilder> {
        let url = self.base_url.join(path)?;
        debug!(%method, %url, "Sending request");

        let mut request = self.http.request(method, url);
        if authed {
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }
        }
        Ok(request)
    }
}

/// Sends the request and turns any non-2xx status into a [`ClientError`].
async fn send(request: RequestBuilder) -> ClientResult<Response> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        debug!(status = status.as_u16(), "Request succeeded");
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);
    warn!(status = status.as_u16(), message = ?message, "Request rejected");

    Err(ClientError::from_status(status.as_u16(), message))
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Decodes a body that is either a book or just a confirmation message.
async fn decode_optional_book(response: Response) -> ClientResult<Option<Book>> {
    let body = response.bytes().await?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let value: Value = serde_json::from_slice(&body)?;
    if value.get("id").is_some() {
        Ok(Some(serde_json::from_value(value)?))
    } else {
        debug!(body = %value, "Backend confirmed without returning the book");
        Ok(None)
    }
}

/// Extracts the human-readable message from an error body.
///
/// Looks for a string under `error`, then `message`. Anything else
/// (HTML error pages, empty bodies) yields `None`.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_keys() {
        assert_eq!(
            error_message(r#"{"error": "Credenciales incorrectas"}"#).as_deref(),
            Some("Credenciales incorrectas")
        );
        assert_eq!(
            error_message(r#"{"message": "Token expired"}"#).as_deref(),
            Some("Token expired")
        );
        assert_eq!(
            error_message(r#"{"error": "first", "message": "second"}"#).as_deref(),
            Some("first")
        );
    }

    #[test]
    fn test_error_message_absent() {
        assert_eq!(error_message(""), None);
        assert_eq!(error_message("<h1>Not Found</h1>"), None);
        assert_eq!(error_message(r#"{"error": 42}"#), None);
        assert_eq!(error_message(r#"{"error": "  "}"#), None);
        assert_eq!(error_message(r#"["error"]"#), None);
    }

    #[test]
    fn test_blank_token_is_not_sent() {
        let mut client = CatalogClient::new(Url::parse("http://localhost:5000/").unwrap());
        client.set_token(Some("   ".to_string()));
        assert!(!client.has_token());

        client.set_token(Some("abc".to_string()));
        assert!(client.has_token());
    }

    #[test]
    fn test_endpoint_urls() {
        let client = CatalogClient::new(Url::parse("http://books.local/api/").unwrap());
        let request = client
            .request(Method::DELETE, "libros/eliminar/7", true)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "http://books.local/api/libros/eliminar/7");
        assert!(request.headers().get("authorization").is_none());
    }
}
