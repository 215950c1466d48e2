//! Stateless HTTP request builder and response parser for the Directus API.
//!
//! # Design
//! `DirectusClient` holds only the base URL and an optional static access
//! token, and carries no mutable state between calls. Each operation is split
//! into a `build_*` method that produces an `HttpRequest` and a `parse_*`
//! method that consumes an `HttpResponse`. The caller executes the actual
//! HTTP round-trip, keeping the core deterministic and free of I/O.
//!
//! Resource-specific operations live on lightweight service handles
//! (`client.items("articles")`, `client.users()`, ...) that borrow the
//! client; the request plumbing and envelope decoding they share is here.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::QuerySpec;
use crate::services::{
    CollectionsService, FilesService, FlowsService, ItemsService, RelationsService, RolesService,
    ServerService, SettingsService, UsersService,
};
use crate::types::{Meta, Page};

pub const ENV_URL: &str = "DIRECTUS_URL";
pub const ENV_TOKEN: &str = "DIRECTUS_TOKEN";

/// Synchronous, stateless client for the Directus REST API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct DirectusClient {
    base_url: Url,
    token: Option<String>,
}

impl DirectusClient {
    /// Trailing slashes are ignored; a base path such as
    /// `https://example.com/directus` is kept in front of every endpoint.
    pub fn new(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ApiError::InvalidBaseUrl("base URL is required".to_string()));
        }
        let url = Url::parse(trimmed).map_err(|e| ApiError::InvalidBaseUrl(format!("{trimmed}: {e}")))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl(format!("{trimmed}: not an http(s) URL")));
        }
        Ok(Self {
            base_url: url,
            token: None,
        })
    }

    /// Reads `DIRECTUS_URL` and, when set and non-empty, `DIRECTUS_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(ENV_URL)
            .map_err(|_| ApiError::InvalidBaseUrl(format!("{ENV_URL} is not set")))?;
        let client = Self::new(&base_url)?;
        Ok(match std::env::var(ENV_TOKEN) {
            Ok(token) if !token.trim().is_empty() => client.with_token(token.trim()),
            _ => client,
        })
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn items(&self, collection: impl Into<String>) -> ItemsService<'_> {
        ItemsService::new(self, collection.into())
    }

    pub fn collections(&self) -> CollectionsService<'_> {
        CollectionsService::new(self)
    }

    pub fn files(&self) -> FilesService<'_> {
        FilesService::new(self)
    }

    pub fn users(&self) -> UsersService<'_> {
        UsersService::new(self)
    }

    pub fn roles(&self) -> RolesService<'_> {
        RolesService::new(self)
    }

    pub fn relations(&self) -> RelationsService<'_> {
        RelationsService::new(self)
    }

    pub fn flows(&self) -> FlowsService<'_> {
        FlowsService::new(self)
    }

    pub fn settings(&self) -> SettingsService<'_> {
        SettingsService::new(self)
    }

    pub fn server(&self) -> ServerService<'_> {
        ServerService::new(self)
    }

    /// Absolute URL for `segments` under the base URL, each segment
    /// percent-encoded on its own.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.into()
    }

    /// A bodyless request carrying `query`.
    pub(crate) fn request(&self, method: HttpMethod, segments: &[&str], query: &QuerySpec) -> HttpRequest {
        let request = HttpRequest {
            method,
            path: self.endpoint(segments),
            query: query.to_query_pairs(),
            headers: self.headers(false),
            body: None,
        };
        log_request(&request);
        request
    }

    pub(crate) fn request_with_body<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        segments: &[&str],
        body: &B,
    ) -> Result<HttpRequest> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let request = HttpRequest {
            method,
            path: self.endpoint(segments),
            query: Vec::new(),
            headers: self.headers(true),
            body: Some(body),
        };
        log_request(&request);
        Ok(request)
    }

    fn headers(&self, has_body: bool) -> Vec<(String, String)> {
        let mut headers = vec![("accept".to_string(), "application/json".to_string())];
        if let Some(token) = &self.token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        if has_body {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        headers
    }
}

fn log_request(request: &HttpRequest) {
    tracing::debug!(
        method = request.method.as_str(),
        path = %request.path,
        query_params = request.query.len(),
        has_body = request.body.is_some(),
        "built request"
    );
}

/// Any 2xx is success; everything else maps to the matching `ApiError`.
pub(crate) fn check_status(response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    let err = ApiError::from_response(response);
    tracing::warn!(status = response.status, error = %err, "unexpected response status");
    Err(err)
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    meta: Option<Meta>,
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// `data` of a `{data, meta}` envelope. `null` or missing `data` is
/// `MissingData`, and so is a 204 or an empty body: Directus answers that
/// way when the token may write but not read the result.
pub(crate) fn parse_data<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    check_status(response)?;
    if response.status == 204 || response.body.trim().is_empty() {
        return Err(ApiError::MissingData);
    }
    decode::<Envelope<T>>(&response.body)?.data.ok_or(ApiError::MissingData)
}

/// A list envelope. `null` data or an empty body is read as an empty page.
pub(crate) fn parse_page<T: DeserializeOwned>(response: &HttpResponse) -> Result<Page<T>> {
    check_status(response)?;
    if response.body.trim().is_empty() {
        return Ok(Page {
            data: Vec::new(),
            meta: None,
        });
    }
    let envelope = decode::<Envelope<Vec<T>>>(&response.body)?;
    Ok(Page {
        data: envelope.data.unwrap_or_default(),
        meta: envelope.meta,
    })
}

/// A body that is not wrapped in an envelope.
pub(crate) fn parse_bare<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    check_status(response)?;
    decode(&response.body)
}

/// Deletes answer 204, or 200 on some deployments; the body is ignored.
pub(crate) fn parse_empty(response: &HttpResponse) -> Result<()> {
    check_status(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryBuilder;

    #[test]
    fn trailing_slash_is_stripped() {
        let client = DirectusClient::new("http://localhost:8055/").unwrap();
        assert_eq!(client.endpoint(&["items", "articles"]), "http://localhost:8055/items/articles");
    }

    #[test]
    fn base_path_is_kept() {
        let client = DirectusClient::new("https://example.com/cms/").unwrap();
        assert_eq!(client.endpoint(&["server", "ping"]), "https://example.com/cms/server/ping");
    }

    #[test]
    fn segments_are_percent_encoded() {
        let client = DirectusClient::new("http://localhost:8055").unwrap();
        assert_eq!(
            client.endpoint(&["items", "my items", "a/b"]),
            "http://localhost:8055/items/my%20items/a%2Fb"
        );
    }

    #[test]
    fn invalid_base_urls_are_rejected() {
        for bad in ["", "   ", "not a url", "mailto:someone@example.com", "ftp://example.com"] {
            assert!(
                matches!(DirectusClient::new(bad), Err(ApiError::InvalidBaseUrl(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn token_adds_bearer_header() {
        let client = DirectusClient::new("http://localhost:8055").unwrap().with_token("secret");
        let req = client.request(HttpMethod::Get, &["users", "me"], &QuerySpec::default());
        assert_eq!(req.header("authorization"), Some("Bearer secret"));
        assert_eq!(req.header("accept"), Some("application/json"));
        assert_eq!(req.header("content-type"), None);
    }

    #[test]
    fn request_carries_encoded_query() {
        let client = DirectusClient::new("http://localhost:8055").unwrap();
        let spec = QueryBuilder::new().select(["id"]).limit(5).build();
        let req = client.request(HttpMethod::Get, &["items", "articles"], &spec);
        assert_eq!(req.query_param("fields"), Some("id"));
        assert_eq!(req.query_param("limit"), Some("5"));
        assert!(req.body.is_none());
    }

    #[test]
    fn body_requests_are_json() {
        let client = DirectusClient::new("http://localhost:8055").unwrap();
        let req = client
            .request_with_body(HttpMethod::Post, &["items", "articles"], &serde_json::json!({"title": "x"}))
            .unwrap();
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some(r#"{"title":"x"}"#));
        assert!(req.query.is_empty());
    }

    #[test]
    fn null_data_is_missing_data() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"data":null}"#.to_string(),
        };
        let err = parse_data::<serde_json::Value>(&response).unwrap_err();
        assert!(matches!(err, ApiError::MissingData));
    }

    #[test]
    fn page_reads_meta() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"data":[{"id":1}],"meta":{"total_count":10,"filter_count":1}}"#.to_string(),
        };
        let page = parse_page::<serde_json::Value>(&response).unwrap();
        assert_eq!(page.data.len(), 1);
        let meta = page.meta.unwrap();
        assert_eq!(meta.total_count, Some(10));
        assert_eq!(meta.filter_count, Some(1));
    }

    #[test]
    fn bad_json_is_deserialization_error() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: "not json".to_string(),
        };
        let err = parse_page::<serde_json::Value>(&response).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn any_2xx_is_success() {
        for status in [200, 201, 204, 299] {
            assert!(check_status(&response(status, "")).is_ok(), "{status}");
        }
        for status in [199, 300, 304, 400, 500] {
            assert!(check_status(&response(status, "")).is_err(), "{status}");
        }
    }

    #[test]
    fn no_content_is_missing_data() {
        let err = parse_data::<serde_json::Value>(&response(204, "")).unwrap_err();
        assert!(matches!(err, ApiError::MissingData));
        let err = parse_data::<serde_json::Value>(&response(200, "  ")).unwrap_err();
        assert!(matches!(err, ApiError::MissingData));
        let created = parse_data::<serde_json::Value>(&response(201, r#"{"data":{"id":1}}"#)).unwrap();
        assert_eq!(created["id"], 1);
    }

    #[test]
    fn empty_list_body_is_empty_page() {
        let page = parse_page::<serde_json::Value>(&response(204, "")).unwrap();
        assert!(page.data.is_empty());
        assert!(page.meta.is_none());
    }

    #[test]
    fn from_env_reads_url_and_token() {
        // Only this test touches these variables.
        std::env::set_var(ENV_URL, "http://cms.example.com/");
        std::env::set_var(ENV_TOKEN, "  env-token ");
        let client = DirectusClient::from_env().unwrap();
        assert_eq!(client.base_url(), "http://cms.example.com/");
        assert_eq!(client.token(), Some("env-token"));

        std::env::set_var(ENV_TOKEN, "");
        assert_eq!(DirectusClient::from_env().unwrap().token(), None);

        std::env::remove_var(ENV_URL);
        std::env::remove_var(ENV_TOKEN);
        assert!(matches!(DirectusClient::from_env(), Err(ApiError::InvalidBaseUrl(_))));
    }
}
