//! Per-resource request builders and response parsers.
//!
//! # Design
//! Each service is a small handle borrowing the `DirectusClient`, obtained
//! through an accessor such as `client.users()`. Handles are free to create
//! and hold no state of their own beyond the borrowed client (and, for items,
//! the collection name). Every operation is a `build_*` / `parse_*` pair.

mod collections;
mod files;
mod flows;
mod items;
mod relations;
mod roles;
mod server;
mod settings;
mod users;

pub use collections::CollectionsService;
pub use files::FilesService;
pub use flows::FlowsService;
pub use items::ItemsService;
pub use relations::RelationsService;
pub use roles::RolesService;
pub use server::ServerService;
pub use settings::SettingsService;
pub use users::UsersService;
