use serde::Serialize;

use crate::client::{parse_data, parse_empty, parse_page, DirectusClient};
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::QuerySpec;
use crate::types::{Collection, CollectionMeta, Page};

/// Collection schema management (`/collections`).
#[derive(Debug, Clone, Copy)]
pub struct CollectionsService<'a> {
    client: &'a DirectusClient,
}

#[derive(Serialize)]
struct MetaPatch<'m> {
    meta: &'m CollectionMeta,
}

impl<'a> CollectionsService<'a> {
    pub(crate) fn new(client: &'a DirectusClient) -> Self {
        Self { client }
    }

    pub fn build_list(&self) -> HttpRequest {
        self.client
            .request(HttpMethod::Get, &["collections"], &QuerySpec::default())
    }

    pub fn build_get(&self, name: &str) -> HttpRequest {
        self.client
            .request(HttpMethod::Get, &["collections", name], &QuerySpec::default())
    }

    pub fn build_create(&self, collection: &Collection) -> Result<HttpRequest> {
        self.client
            .request_with_body(HttpMethod::Post, &["collections"], collection)
    }

    /// Only the `meta` block of an existing collection can be changed.
    pub fn build_update(&self, name: &str, meta: &CollectionMeta) -> Result<HttpRequest> {
        self.client
            .request_with_body(HttpMethod::Patch, &["collections", name], &MetaPatch { meta })
    }

    pub fn build_delete(&self, name: &str) -> HttpRequest {
        self.client
            .request(HttpMethod::Delete, &["collections", name], &QuerySpec::default())
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<Page<Collection>> {
        parse_page(&response)
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<Collection> {
        parse_data(&response)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<Collection> {
        parse_data(&response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<Collection> {
        parse_data(&response)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<()> {
        parse_empty(&response)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ApiError;
    use crate::services::test_support::{body_json, client, response};
    use crate::types::CollectionSchema;

    #[test]
    fn build_create_sends_schema() {
        let client = client();
        let collection = Collection {
            collection: "articles".to_string(),
            meta: Some(CollectionMeta {
                icon: Some("article".to_string()),
                ..CollectionMeta::default()
            }),
            schema: Some(CollectionSchema {
                name: "articles".to_string(),
                comment: None,
            }),
            fields: Vec::new(),
        };
        let req = client.collections().build_create(&collection).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8055/collections");
        let body = body_json(&req);
        assert_eq!(body["collection"], "articles");
        assert_eq!(body["meta"]["icon"], "article");
        assert_eq!(body["schema"], json!({"name": "articles"}));
        assert!(body.get("fields").is_none());
    }

    #[test]
    fn build_update_wraps_meta() {
        let client = client();
        let meta = CollectionMeta {
            note: Some("Blog posts".to_string()),
            hidden: true,
            ..CollectionMeta::default()
        };
        let req = client.collections().build_update("articles", &meta).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.path, "http://localhost:8055/collections/articles");
        let body = body_json(&req);
        assert_eq!(body["meta"]["note"], "Blog posts");
        assert_eq!(body["meta"]["hidden"], true);
    }

    #[test]
    fn parse_get_reads_collection() {
        let client = client();
        let collection = client
            .collections()
            .parse_get(response(
                200,
                r#"{"data":{"collection":"articles","meta":{"singleton":true},"schema":{"name":"articles"}}}"#,
            ))
            .unwrap();
        assert_eq!(collection.collection, "articles");
        assert!(collection.meta.unwrap().singleton);
    }

    #[test]
    fn parse_delete_forbidden() {
        let client = client();
        let err = client
            .collections()
            .parse_delete(response(
                403,
                r#"{"errors":[{"message":"You don't have permission to access this.","extensions":{"code":"FORBIDDEN"}}]}"#,
            ))
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden { .. }));
    }
}
