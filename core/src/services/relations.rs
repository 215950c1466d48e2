use crate::client::{parse_data, parse_empty, parse_page, DirectusClient};
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::QuerySpec;
use crate::types::{Page, Relation};

/// Relations between collections (`/relations`), addressed by the
/// collection and field that hold the foreign key.
#[derive(Debug, Clone, Copy)]
pub struct RelationsService<'a> {
    client: &'a DirectusClient,
}

impl<'a> RelationsService<'a> {
    pub(crate) fn new(client: &'a DirectusClient) -> Self {
        Self { client }
    }

    pub fn build_list(&self) -> HttpRequest {
        self.client
            .request(HttpMethod::Get, &["relations"], &QuerySpec::default())
    }

    pub fn build_list_for(&self, collection: &str) -> HttpRequest {
        self.client
            .request(HttpMethod::Get, &["relations", collection], &QuerySpec::default())
    }

    pub fn build_get(&self, collection: &str, field: &str) -> HttpRequest {
        self.client.request(
            HttpMethod::Get,
            &["relations", collection, field],
            &QuerySpec::default(),
        )
    }

    pub fn build_create(&self, relation: &Relation) -> Result<HttpRequest> {
        self.client
            .request_with_body(HttpMethod::Post, &["relations"], relation)
    }

    pub fn build_update(&self, relation: &Relation) -> Result<HttpRequest> {
        self.client.request_with_body(
            HttpMethod::Patch,
            &["relations", &relation.collection, &relation.field],
            relation,
        )
    }

    pub fn build_delete(&self, collection: &str, field: &str) -> HttpRequest {
        self.client.request(
            HttpMethod::Delete,
            &["relations", collection, field],
            &QuerySpec::default(),
        )
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<Page<Relation>> {
        parse_page(&response)
    }

    pub fn parse_list_for(&self, response: HttpResponse) -> Result<Page<Relation>> {
        parse_page(&response)
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<Relation> {
        parse_data(&response)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<Relation> {
        parse_data(&response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<Relation> {
        parse_data(&response)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<()> {
        parse_empty(&response)
    }
}
