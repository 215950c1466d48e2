use crate::client::{check_status, parse_bare, parse_data, DirectusClient};
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::QuerySpec;
use crate::types::{ServerHealth, ServerInfo};

/// Server information and liveness endpoints (`/server`).
#[derive(Debug, Clone, Copy)]
pub struct ServerService<'a> {
    client: &'a DirectusClient,
}

impl<'a> ServerService<'a> {
    pub(crate) fn new(client: &'a DirectusClient) -> Self {
        Self { client }
    }

    pub fn build_info(&self) -> HttpRequest {
        self.client
            .request(HttpMethod::Get, &["server", "info"], &QuerySpec::default())
    }

    pub fn build_health(&self) -> HttpRequest {
        self.client
            .request(HttpMethod::Get, &["server", "health"], &QuerySpec::default())
    }

    pub fn build_ping(&self) -> HttpRequest {
        self.client
            .request(HttpMethod::Get, &["server", "ping"], &QuerySpec::default())
    }

    pub fn parse_info(&self, response: HttpResponse) -> Result<ServerInfo> {
        parse_data(&response)
    }

    /// The health body is not wrapped in `data`. Directus answers 503 with
    /// the same body when a check fails; that is still decoded so callers
    /// see which check failed.
    pub fn parse_health(&self, response: HttpResponse) -> Result<ServerHealth> {
        if response.status == 503 {
            if let Ok(health) = serde_json::from_str(&response.body) {
                return Ok(health);
            }
        }
        parse_bare(&response)
    }

    /// Plain-text `pong`.
    pub fn parse_ping(&self, response: HttpResponse) -> Result<()> {
        check_status(&response)?;
        match response.body.trim() {
            "pong" => Ok(()),
            other => Err(ApiError::Deserialization(format!("unexpected ping body: {other:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{client, response};

    #[test]
    fn build_ping_path() {
        let client = client();
        let req = client.server().build_ping();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8055/server/ping");
    }

    #[test]
    fn parse_ping_accepts_pong_only() {
        let client = client();
        let server = client.server();
        assert!(server.parse_ping(response(200, "pong")).is_ok());
        assert!(server.parse_ping(response(200, "pong\n")).is_ok());
        assert!(matches!(
            server.parse_ping(response(200, "nope")),
            Err(ApiError::Deserialization(_))
        ));
        assert!(matches!(
            server.parse_ping(response(502, "Bad Gateway")),
            Err(ApiError::Api { status: 502, .. })
        ));
    }

    #[test]
    fn parse_health_reads_bare_body() {
        let client = client();
        let health = client
            .server()
            .parse_health(response(200, r#"{"status":"ok","releaseId":"11.1.0","serviceId":"abc"}"#))
            .unwrap();
        assert!(health.is_ok());
        assert_eq!(health.release_id.as_deref(), Some("11.1.0"));
    }

    #[test]
    fn parse_health_decodes_failing_checks() {
        let client = client();
        let health = client
            .server()
            .parse_health(response(
                503,
                r#"{"status":"error","checks":{"database:responseTime":[{"status":"error"}]}}"#,
            ))
            .unwrap();
        assert_eq!(health.status, "error");
        assert!(health.checks.is_some());

        assert!(client.server().parse_health(response(503, "down")).is_err());
    }

    #[test]
    fn parse_info_reads_project() {
        let client = client();
        let info = client
            .server()
            .parse_info(response(
                200,
                r#"{"data":{"project":{"project_name":"Docs","default_language":"en-US"},"version":"11.1.0"}}"#,
            ))
            .unwrap();
        assert_eq!(info.project.unwrap().project_name.as_deref(), Some("Docs"));
        assert_eq!(info.extra["version"], "11.1.0");
    }
}
