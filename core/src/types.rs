//! Domain DTOs for the Directus API.
//!
//! # Design
//! Read models use `Option` generously: Directus omits or nulls most fields
//! depending on the `fields` parameter and the caller's permissions. Create
//! payloads are separate `New*` structs without server-assigned fields.
//! Update payloads use `Nullable` so "clear this field" and "leave it alone"
//! stay distinct on the wire.
//!
//! These types are defined independently of the mock-server crate;
//! integration tests catch schema drift.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::nullable::Nullable;

/// An item of any collection, as returned by the API.
pub type Item = Map<String, Value>;

/// Counters requested through the `meta` query parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_count: Option<u64>,
}

/// The items of a list response together with its `meta` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: Option<Meta>,
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub collection: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<CollectionMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<CollectionSchema>,
    /// Only used when creating a collection together with its fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_template: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub singleton: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    pub field: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub id: Uuid,
    #[serde(default)]
    pub storage: Option<String>,
    #[serde(default)]
    pub filename_disk: Option<String>,
    #[serde(default)]
    pub filename_download: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub uploaded_by: Option<String>,
    #[serde(default)]
    pub uploaded_on: Option<String>,
    #[serde(default)]
    pub modified_on: Option<String>,
    /// Directus sends big integers as strings; both forms are accepted.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

/// Body of `POST /files/import`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportFile {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<FileUpdate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileUpdate {
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub title: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub description: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub folder: Nullable<Uuid>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub location: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub tags: Nullable<Vec<String>>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub filename_download: Nullable<String>,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Role id, or the expanded role object when requested via `fields`.
    #[serde(default)]
    pub role: Option<Value>,
    #[serde(default)]
    pub last_access: Option<String>,
    #[serde(default)]
    pub last_page: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub external_identifier: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewUser {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub email: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub password: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub first_name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub last_name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub role: Nullable<Uuid>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub status: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub title: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub description: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub location: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub language: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub avatar: Nullable<Uuid>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub tags: Nullable<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent: Option<Uuid>,
    #[serde(default)]
    pub ip_access: Option<Vec<String>>,
    #[serde(default)]
    pub enforce_tfa: bool,
    #[serde(default)]
    pub admin_access: bool,
    #[serde(default)]
    pub app_access: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewRole {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleUpdate {
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub icon: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub description: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub parent: Nullable<Uuid>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub ip_access: Nullable<Vec<String>>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub enforce_tfa: Nullable<bool>,
}

// ---------------------------------------------------------------------------
// Relations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub collection: String,
    pub field: String,
    #[serde(default)]
    pub related_collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<RelationMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub many_collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub many_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub junction_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_deselect_action: Option<String>,
}

// ---------------------------------------------------------------------------
// Flows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// `event`, `webhook`, `schedule`, `operation` or `manual`.
    #[serde(default)]
    pub trigger: Option<String>,
    #[serde(default)]
    pub accountability: Option<String>,
    #[serde(default)]
    pub options: Option<Value>,
    /// First operation of the flow.
    #[serde(default)]
    pub operation: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewFlow {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accountability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Project settings. Doubles as the PATCH body: unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_foreground: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_login_attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_password_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_asset_transform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_asset_presets: Option<Vec<AssetPreset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetPreset {
    pub key: String,
    #[serde(default)]
    pub fit: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub quality: Option<u8>,
    #[serde(default, rename = "withoutEnlargement")]
    pub without_enlargement: bool,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    #[serde(default)]
    pub project: Option<ProjectInfo>,
    /// Version, rate limiter and extension details, present for admins.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub project_descriptor: Option<String>,
    #[serde(default)]
    pub project_logo: Option<String>,
    #[serde(default)]
    pub project_color: Option<String>,
    #[serde(default)]
    pub default_language: Option<String>,
    #[serde(default)]
    pub public_foreground: Option<String>,
    #[serde(default)]
    pub public_background: Option<String>,
    #[serde(default)]
    pub public_note: Option<String>,
    #[serde(default)]
    pub custom_css: Option<String>,
}

/// Body of `/server/health`, which is not wrapped in a `data` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerHealth {
    /// `ok`, `warn` or `error`.
    pub status: String,
    #[serde(default, rename = "releaseId", alias = "release_id")]
    pub release_id: Option<String>,
    #[serde(default, rename = "serviceId", alias = "service_id")]
    pub service_id: Option<String>,
    #[serde(default)]
    pub checks: Option<Value>,
}

impl ServerHealth {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        Text(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
