use crate::client::{parse_data, DirectusClient};
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::QuerySpec;
use crate::types::Settings;

/// The project's singleton settings object (`/settings`).
#[derive(Debug, Clone, Copy)]
pub struct SettingsService<'a> {
    client: &'a DirectusClient,
}

impl<'a> SettingsService<'a> {
    pub(crate) fn new(client: &'a DirectusClient) -> Self {
        Self { client }
    }

    pub fn build_get(&self) -> HttpRequest {
        self.client
            .request(HttpMethod::Get, &["settings"], &QuerySpec::default())
    }

    /// Fields left as `None` are not sent and stay unchanged.
    pub fn build_update(&self, settings: &Settings) -> Result<HttpRequest> {
        self.client
            .request_with_body(HttpMethod::Patch, &["settings"], settings)
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<Settings> {
        parse_data(&response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<Settings> {
        parse_data(&response)
    }
}
