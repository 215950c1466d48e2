//! Query expression model: filters, query specifications, and the fluent
//! builder that produces them. Pure data, no I/O.

pub mod builder;
pub mod filter;
pub mod spec;

pub use builder::QueryBuilder;
pub use filter::{Filter, Operator};
pub use spec::{Aggregate, QuerySpec, Sort, SortDirection};
