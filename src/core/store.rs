use async_trait::async_trait;
use sea_orm::{
    Condition, DatabaseConnection, DbErr, EntityTrait, Order, PaginatorTrait, PrimaryKeyTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use super::traits::{ListResource, ModelOf};

/// The operations the list and bulk-delete layers need from persistence.
///
/// `find_many` and `count` must be called with the same condition for a page
/// and its total to agree.
#[async_trait]
pub trait EntityStore<R: ListResource>: Send + Sync {
    async fn find_many(
        &self,
        condition: Condition,
        offset: u64,
        limit: u64,
        ordering: Vec<(R::ColumnType, Order)>,
    ) -> Result<Vec<ModelOf<R>>, DbErr>;

    async fn count(&self, condition: Condition) -> Result<u64, DbErr>;

    async fn find_unique(&self, id: Uuid) -> Result<Option<ModelOf<R>>, DbErr>;

    /// Delete one row. Returns `DbErr::RecordNotFound` when nothing was removed.
    async fn delete(&self, id: Uuid) -> Result<(), DbErr>;
}

/// `EntityStore` over a Sea-ORM connection, for any resource keyed by `Uuid`.
#[derive(Clone, Copy)]
pub struct SeaOrmStore<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SeaOrmStore<'a> {
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<'a, R> EntityStore<R> for SeaOrmStore<'a>
where
    R: ListResource,
    ModelOf<R>: Sync,
    <<R::EntityType as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    async fn find_many(
        &self,
        condition: Condition,
        offset: u64,
        limit: u64,
        ordering: Vec<(R::ColumnType, Order)>,
    ) -> Result<Vec<ModelOf<R>>, DbErr> {
        let mut query = R::EntityType::find().filter(condition);
        for (column, direction) in ordering {
            query = query.order_by(column, direction);
        }
        query.offset(offset).limit(limit).all(self.db).await
    }

    async fn count(&self, condition: Condition) -> Result<u64, DbErr> {
        let query = R::EntityType::find().filter(condition);
        PaginatorTrait::count(query, self.db).await
    }

    async fn find_unique(&self, id: Uuid) -> Result<Option<ModelOf<R>>, DbErr> {
        R::EntityType::find_by_id(id).one(self.db).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), DbErr> {
        let res = R::EntityType::delete_by_id(id).exec(self.db).await?;
        match res.rows_affected {
            0 => Err(DbErr::RecordNotFound(format!(
                "{} not found",
                R::RESOURCE_NAME_SINGULAR
            ))),
            _ => Ok(()),
        }
    }
}
