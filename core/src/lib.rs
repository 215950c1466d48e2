//! Synchronous client core for the Directus headless CMS API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `DirectusClient` is stateless: a base URL and an optional static token.
//! - Resources are reached through borrowed service handles
//!   (`client.items("articles")`, `client.users()`, ...), each operation
//!   split into `build_*` (produces request) and `parse_*` (consumes response).
//! - Read requests carry a `QuerySpec`, usually assembled with `QueryBuilder`
//!   from `Filter` expressions.
//! - Partial updates use `Nullable<T>` to tell "set to null" from "leave as is".
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.
//!
//! ```
//! use directus_core::{DirectusClient, QueryBuilder};
//!
//! let client = DirectusClient::new("http://localhost:8055")?.with_token("static-token");
//! let query = QueryBuilder::new()
//!     .select(["id", "title"])
//!     .where_("status", "_eq", "published")
//!     .order_by_desc("date_created")
//!     .limit(10)
//!     .build();
//! let request = client.items("articles").build_list(&query)?;
//! assert_eq!(request.query_param("sort"), Some("-date_created"));
//! # Ok::<(), directus_core::ApiError>(())
//! ```

pub mod client;
pub mod error;
pub mod http;
pub mod nullable;
pub mod query;
pub mod services;
pub mod types;

pub use client::DirectusClient;
pub use error::{ApiError, ErrorDetail, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use nullable::Nullable;
pub use query::{Filter, Operator, QueryBuilder, QuerySpec};
pub use types::{Item, Meta, Page};
