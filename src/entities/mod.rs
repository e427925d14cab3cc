//! Sea-ORM entities and their list-facing representations.
//!
//! Each module pairs a `Model` (database row) with an API struct that drops
//! private columns and implements [`crate::core::ListResource`].

pub mod attendance;
pub mod shift;
pub mod time_zone;
pub mod user;
