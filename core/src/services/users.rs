use uuid::Uuid;

use crate::client::{parse_data, parse_empty, parse_page, DirectusClient};
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::QuerySpec;
use crate::types::{NewUser, Page, User, UserUpdate};

/// User accounts (`/users`).
#[derive(Debug, Clone, Copy)]
pub struct UsersService<'a> {
    client: &'a DirectusClient,
}

impl<'a> UsersService<'a> {
    pub(crate) fn new(client: &'a DirectusClient) -> Self {
        Self { client }
    }

    pub fn build_list(&self, query: &QuerySpec) -> HttpRequest {
        self.client.request(HttpMethod::Get, &["users"], query)
    }

    pub fn build_get(&self, id: Uuid, query: &QuerySpec) -> HttpRequest {
        let id = id.to_string();
        self.client.request(HttpMethod::Get, &["users", &id], query)
    }

    /// The user the configured token belongs to.
    pub fn build_me(&self, query: &QuerySpec) -> HttpRequest {
        self.client.request(HttpMethod::Get, &["users", "me"], query)
    }

    pub fn build_create(&self, user: &NewUser) -> Result<HttpRequest> {
        self.client.request_with_body(HttpMethod::Post, &["users"], user)
    }

    pub fn build_update(&self, id: Uuid, update: &UserUpdate) -> Result<HttpRequest> {
        let id = id.to_string();
        self.client
            .request_with_body(HttpMethod::Patch, &["users", &id], update)
    }

    pub fn build_delete(&self, id: Uuid) -> HttpRequest {
        let id = id.to_string();
        self.client
            .request(HttpMethod::Delete, &["users", &id], &QuerySpec::default())
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<Page<User>> {
        parse_page(&response)
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<User> {
        parse_data(&response)
    }

    pub fn parse_me(&self, response: HttpResponse) -> Result<User> {
        parse_data(&response)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<User> {
        parse_data(&response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<User> {
        parse_data(&response)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<()> {
        parse_empty(&response)
    }
}
