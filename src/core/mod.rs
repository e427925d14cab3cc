pub mod store;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use store::{EntityStore, SeaOrmStore};
pub use traits::{ListResource, ModelOf};
