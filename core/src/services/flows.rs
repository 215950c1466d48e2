use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::client::{check_status, parse_data, parse_empty, parse_page, DirectusClient};
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::QuerySpec;
use crate::types::{Flow, NewFlow, Page};

/// Automation flows (`/flows`).
#[derive(Debug, Clone, Copy)]
pub struct FlowsService<'a> {
    client: &'a DirectusClient,
}

impl<'a> FlowsService<'a> {
    pub(crate) fn new(client: &'a DirectusClient) -> Self {
        Self { client }
    }

    pub fn build_list(&self, query: &QuerySpec) -> HttpRequest {
        self.client.request(HttpMethod::Get, &["flows"], query)
    }

    pub fn build_get(&self, id: Uuid) -> HttpRequest {
        let id = id.to_string();
        self.client
            .request(HttpMethod::Get, &["flows", &id], &QuerySpec::default())
    }

    pub fn build_create(&self, flow: &NewFlow) -> Result<HttpRequest> {
        self.client.request_with_body(HttpMethod::Post, &["flows"], flow)
    }

    /// Any subset of flow fields; a `NewFlow` with only the changed fields
    /// set works as well as a JSON object.
    pub fn build_update<T: Serialize + ?Sized>(&self, id: Uuid, changes: &T) -> Result<HttpRequest> {
        let id = id.to_string();
        self.client
            .request_with_body(HttpMethod::Patch, &["flows", &id], changes)
    }

    pub fn build_delete(&self, id: Uuid) -> HttpRequest {
        let id = id.to_string();
        self.client
            .request(HttpMethod::Delete, &["flows", &id], &QuerySpec::default())
    }

    /// Runs a flow with a webhook trigger, `payload` becoming its `$trigger.body`.
    pub fn build_trigger<T: Serialize + ?Sized>(&self, id: Uuid, payload: &T) -> Result<HttpRequest> {
        let id = id.to_string();
        self.client
            .request_with_body(HttpMethod::Post, &["flows", "trigger", &id], payload)
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<Page<Flow>> {
        parse_page(&response)
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<Flow> {
        parse_data(&response)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<Flow> {
        parse_data(&response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<Flow> {
        parse_data(&response)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<()> {
        parse_empty(&response)
    }

    /// The flow's response body, or `None` when it answered 204 or returned
    /// nothing.
    pub fn parse_trigger<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<Option<T>> {
        if response.status == 204 {
            return Ok(None);
        }
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}
