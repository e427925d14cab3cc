use sea_orm::{ColumnTrait, EntityTrait, Order};

/// Shorthand for the Sea-ORM model behind a resource.
pub type ModelOf<R> = <<R as ListResource>::EntityType as EntityTrait>::Model;

/// A collection that can be listed through the paginated query layer.
///
/// The column lists double as allow-lists: a client key that appears in none
/// of them never reaches the database.
pub trait ListResource: Sized + Send + Sync + 'static
where
    Self: From<<Self::EntityType as EntityTrait>::Model>,
{
    type EntityType: EntityTrait + Sync;
    type ColumnType: ColumnTrait + Copy + std::fmt::Debug + Send + Sync + 'static;

    const ID_COLUMN: Self::ColumnType;
    const RESOURCE_NAME_SINGULAR: &'static str;
    const RESOURCE_NAME_PLURAL: &'static str;

    /// Keys usable in `filters` (equality and set membership).
    #[must_use]
    fn filterable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![("id", Self::ID_COLUMN)]
    }

    /// Keys usable in `searchFilters` (case-insensitive substring).
    #[must_use]
    fn searchable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![]
    }

    /// Keys usable in `rangedFilters` (inclusive interval).
    #[must_use]
    fn rangeable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![]
    }

    /// Ordering used when the caller does not supply one.
    #[must_use]
    fn default_order() -> Vec<(Self::ColumnType, Order)> {
        vec![]
    }

    /// Resolve an external key against every list above.
    #[must_use]
    fn column_for(key: &str) -> Option<Self::ColumnType> {
        Self::filterable_columns()
            .into_iter()
            .chain(Self::searchable_columns())
            .chain(Self::rangeable_columns())
            .find(|(name, _)| *name == key)
            .map(|(_, column)| column)
    }
}
