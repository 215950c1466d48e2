use uuid::Uuid;

use crate::client::{parse_data, parse_empty, parse_page, DirectusClient};
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::QuerySpec;
use crate::types::{NewRole, Page, Role, RoleUpdate};

/// Roles (`/roles`).
#[derive(Debug, Clone, Copy)]
pub struct RolesService<'a> {
    client: &'a DirectusClient,
}

impl<'a> RolesService<'a> {
    pub(crate) fn new(client: &'a DirectusClient) -> Self {
        Self { client }
    }

    pub fn build_list(&self, query: &QuerySpec) -> HttpRequest {
        self.client.request(HttpMethod::Get, &["roles"], query)
    }

    pub fn build_get(&self, id: Uuid) -> HttpRequest {
        let id = id.to_string();
        self.client
            .request(HttpMethod::Get, &["roles", &id], &QuerySpec::default())
    }

    pub fn build_create(&self, role: &NewRole) -> Result<HttpRequest> {
        self.client.request_with_body(HttpMethod::Post, &["roles"], role)
    }

    pub fn build_update(&self, id: Uuid, update: &RoleUpdate) -> Result<HttpRequest> {
        let id = id.to_string();
        self.client
            .request_with_body(HttpMethod::Patch, &["roles", &id], update)
    }

    pub fn build_delete(&self, id: Uuid) -> HttpRequest {
        let id = id.to_string();
        self.client
            .request(HttpMethod::Delete, &["roles", &id], &QuerySpec::default())
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<Page<Role>> {
        parse_page(&response)
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<Role> {
        parse_data(&response)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<Role> {
        parse_data(&response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<Role> {
        parse_data(&response)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<()> {
        parse_empty(&response)
    }
}
