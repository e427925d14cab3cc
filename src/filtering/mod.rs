//! # Filtering & Pagination
//!
//! List endpoints accept three JSON-encoded query parameters next to `page`
//! and `limit`:
//!
//! ```text
//! GET /api/admin/users
//!     ?page=2&limit=10
//!     &filters={"role":["ADMIN","EMPLOYEE"]}
//!     &searchFilters={"name":"jo"}
//!     &rangedFilters=[{"key":"createdAt","start":"2024-01-01","end":"2024-01-31"}]
//! ```
//!
//! - `filters`: equality, or set membership when the value is an array
//! - `searchFilters`: case-insensitive substring per field
//! - `rangedFilters`: inclusive interval per field
//!
//! Decoding lives in [`parser`], composition into a Sea-ORM `Condition` in
//! [`predicate`], and offset/limit arithmetic in [`pagination`].

pub mod pagination;
pub mod parser;
pub mod predicate;

pub use pagination::{Pagination, total_pages};
pub use parser::{
    FilterParam, FilterQuery, FilterValue, MalformedFilterInput, ParsedFilters, RangedFilter,
    Scalar, SearchFilterQuery, parse_filters, parse_ranged_filters, parse_search_filters,
};
pub use predicate::{
    BaseConstraints, DropReason, DroppedKey, Predicate, SearchMode, Term, build_like_condition,
    build_predicate,
};
