use uuid::Uuid;

use crate::client::{parse_data, parse_empty, parse_page, DirectusClient};
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::QuerySpec;
use crate::types::{File, FileUpdate, ImportFile, Page};

/// File metadata (`/files`). Uploading file contents is left to the host;
/// `build_import` asks the server to fetch a file from a URL instead.
#[derive(Debug, Clone, Copy)]
pub struct FilesService<'a> {
    client: &'a DirectusClient,
}

impl<'a> FilesService<'a> {
    pub(crate) fn new(client: &'a DirectusClient) -> Self {
        Self { client }
    }

    pub fn build_list(&self, query: &QuerySpec) -> HttpRequest {
        self.client.request(HttpMethod::Get, &["files"], query)
    }

    pub fn build_get(&self, id: Uuid) -> HttpRequest {
        let id = id.to_string();
        self.client
            .request(HttpMethod::Get, &["files", &id], &QuerySpec::default())
    }

    pub fn build_import(&self, import: &ImportFile) -> Result<HttpRequest> {
        self.client
            .request_with_body(HttpMethod::Post, &["files", "import"], import)
    }

    pub fn build_update(&self, id: Uuid, update: &FileUpdate) -> Result<HttpRequest> {
        let id = id.to_string();
        self.client
            .request_with_body(HttpMethod::Patch, &["files", &id], update)
    }

    pub fn build_delete(&self, id: Uuid) -> HttpRequest {
        let id = id.to_string();
        self.client
            .request(HttpMethod::Delete, &["files", &id], &QuerySpec::default())
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<Page<File>> {
        parse_page(&response)
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<File> {
        parse_data(&response)
    }

    pub fn parse_import(&self, response: HttpResponse) -> Result<File> {
        parse_data(&response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<File> {
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
    use crate::nullable::Nullable;
    use crate::services::test_support::{body_json, client, response};

    #[test]
    fn build_import_posts_url_and_metadata() {
        let client = client();
        let import = ImportFile {
            url: "https://example.com/cat.jpg".to_string(),
            data: Some(FileUpdate {
                title: Nullable::Present("Cat".to_string()),
                ..FileUpdate::default()
            }),
        };
        let req = client.files().build_import(&import).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8055/files/import");
        assert_eq!(
            body_json(&req),
            json!({"url": "https://example.com/cat.jpg", "data": {"title": "Cat"}})
        );
    }

    #[test]
    fn build_update_can_clear_fields() {
        let client = client();
        let update = FileUpdate {
            description: Nullable::Null,
            tags: Nullable::Present(vec!["pets".to_string()]),
            ..FileUpdate::default()
        };
        let req = client.files().build_update(Uuid::nil(), &update).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(
            req.path,
            "http://localhost:8055/files/00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(body_json(&req), json!({"description": null, "tags": ["pets"]}));
    }

    #[test]
    fn parse_list_reads_files() {
        let client = client();
        let page = client
            .files()
            .parse_list(response(
                200,
                r#"{"data":[{"id":"4f4b14fa-a43a-46d0-b7ad-90af5919bebb","type":"image/png","filesize":"1024"}]}"#,
            ))
            .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].filesize, Some(1024));
        assert_eq!(page.data[0].mime_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn build_list_forwards_query() {
        let client = client();
        let spec = QuerySpec {
            search: Some("cat".to_string()),
            ..QuerySpec::default()
        };
        let req = client.files().build_list(&spec);
        assert_eq!(req.query_param("search"), Some("cat"));
    }
}
