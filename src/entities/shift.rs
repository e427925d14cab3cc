use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Order;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::ListResource;

/// A named work shift; clock times are `HH:MM` strings.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "shifts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub clock_in: String,
    pub clock_out: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: Uuid,
    pub name: String,
    pub clock_in: String,
    pub clock_out: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Model> for Shift {
    fn from(model: Model) -> Self {
        Shift {
            id: model.id,
            name: model.name,
            clock_in: model.clock_in,
            clock_out: model.clock_out,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl ListResource for Shift {
    type EntityType = Entity;
    type ColumnType = Column;

    const ID_COLUMN: Self::ColumnType = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "shift";
    const RESOURCE_NAME_PLURAL: &'static str = "shifts";

    fn filterable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![
            ("id", Column::Id),
            ("isActive", Column::IsActive),
            ("clockIn", Column::ClockIn),
            ("clockOut", Column::ClockOut),
        ]
    }

    fn searchable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![("name", Column::Name)]
    }

    fn rangeable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![("createdAt", Column::CreatedAt), ("updatedAt", Column::UpdatedAt)]
    }

    fn default_order() -> Vec<(Self::ColumnType, Order)> {
        vec![(Column::CreatedAt, Order::Desc)]
    }
}
