//! Query-string → MongoDB query translation for list endpoints.

pub mod builder;
pub mod fields;
pub mod filter;

pub use builder::{CompiledQuery, Pagination, QueryParams};
pub use filter::{Comparison, FieldType, FilterExpr, FilterValue, QueryError};
