//! Items of user-defined collections (`/items/{collection}`).
//!
//! Payloads are generic: pass any `Serialize` value to the create and update
//! builders, and pick the target type on the parse side. `Item` (a JSON
//! object) works for collections without a dedicated struct.

use std::fmt::Display;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::{parse_data, parse_empty, parse_page, DirectusClient};
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::QuerySpec;
use crate::types::Page;

#[derive(Serialize)]
struct Keys<'k, K> {
    keys: &'k [K],
}

#[derive(Serialize)]
struct KeyedChanges<'k, K, T: ?Sized> {
    keys: &'k [K],
    data: &'k T,
}

#[derive(Debug, Clone)]
pub struct ItemsService<'a> {
    client: &'a DirectusClient,
    collection: String,
}

impl<'a> ItemsService<'a> {
    pub(crate) fn new(client: &'a DirectusClient, collection: String) -> Self {
        Self { client, collection }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn checked_collection(&self) -> Result<&str> {
        let name = self.collection.trim();
        if name.is_empty() {
            return Err(ApiError::MissingCollection);
        }
        Ok(name)
    }

    pub fn build_list(&self, query: &QuerySpec) -> Result<HttpRequest> {
        let collection = self.checked_collection()?;
        Ok(self.client.request(HttpMethod::Get, &["items", collection], query))
    }

    /// `query` may narrow `fields` or set `deep`/`alias` for the single item.
    pub fn build_get(&self, id: impl Display, query: &QuerySpec) -> Result<HttpRequest> {
        let collection = self.checked_collection()?;
        let id = id.to_string();
        Ok(self.client.request(HttpMethod::Get, &["items", collection, &id], query))
    }

    pub fn build_create<T: Serialize + ?Sized>(&self, item: &T) -> Result<HttpRequest> {
        let collection = self.checked_collection()?;
        self.client.request_with_body(HttpMethod::Post, &["items", collection], item)
    }

    /// Same endpoint as `build_create`; an array body creates several items.
    pub fn build_create_many<T: Serialize>(&self, items: &[T]) -> Result<HttpRequest> {
        let collection = self.checked_collection()?;
        self.client.request_with_body(HttpMethod::Post, &["items", collection], items)
    }

    pub fn build_update<T: Serialize + ?Sized>(&self, id: impl Display, changes: &T) -> Result<HttpRequest> {
        let collection = self.checked_collection()?;
        let id = id.to_string();
        self.client
            .request_with_body(HttpMethod::Patch, &["items", collection, &id], changes)
    }

    /// Applies the same `changes` to every item in `keys`.
    pub fn build_update_many<K: Serialize, T: Serialize + ?Sized>(
        &self,
        keys: &[K],
        changes: &T,
    ) -> Result<HttpRequest> {
        let collection = self.checked_collection()?;
        self.client.request_with_body(
            HttpMethod::Patch,
            &["items", collection],
            &KeyedChanges { keys, data: changes },
        )
    }

    pub fn build_delete(&self, id: impl Display) -> Result<HttpRequest> {
        let collection = self.checked_collection()?;
        let id = id.to_string();
        Ok(self
            .client
            .request(HttpMethod::Delete, &["items", collection, &id], &QuerySpec::default()))
    }

    pub fn build_delete_many<K: Serialize>(&self, keys: &[K]) -> Result<HttpRequest> {
        let collection = self.checked_collection()?;
        self.client
            .request_with_body(HttpMethod::Delete, &["items", collection], &Keys { keys })
    }

    pub fn parse_list<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<Page<T>> {
        parse_page(&response)
    }

    pub fn parse_get<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T> {
        parse_data(&response)
    }

    pub fn parse_create<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T> {
        parse_data(&response)
    }

    pub fn parse_create_many<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<Vec<T>> {
        parse_data(&response)
    }

    pub fn parse_update<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T> {
        parse_data(&response)
    }

    pub fn parse_update_many<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<Vec<T>> {
        parse_data(&response)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<()> {
        parse_empty(&response)
    }

    pub fn parse_delete_many(&self, response: HttpResponse) -> Result<()> {
        parse_empty(&response)
    }
}
