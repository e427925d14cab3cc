use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Order;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::ListResource;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "time_zones")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    /// Short label such as `WIB`.
    pub name_code: String,
    /// UTC offset such as `+07:00`.
    pub time_code: String,
    /// IANA identifier such as `Asia/Jakarta`.
    pub timezone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeZone {
    pub id: Uuid,
    pub name: String,
    pub name_code: String,
    pub time_code: String,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Model> for TimeZone {
    fn from(model: Model) -> Self {
        TimeZone {
            id: model.id,
            name: model.name,
            name_code: model.name_code,
            time_code: model.time_code,
            timezone: model.timezone,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl ListResource for TimeZone {
    type EntityType = Entity;
    type ColumnType = Column;

    const ID_COLUMN: Self::ColumnType = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "time zone";
    const RESOURCE_NAME_PLURAL: &'static str = "time zones";

    fn filterable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![
            ("id", Column::Id),
            ("nameCode", Column::NameCode),
            ("timeCode", Column::TimeCode),
            ("timezone", Column::Timezone),
        ]
    }

    fn searchable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![
            ("name", Column::Name),
            ("nameCode", Column::NameCode),
            ("timezone", Column::Timezone),
        ]
    }

    fn rangeable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![("createdAt", Column::CreatedAt), ("updatedAt", Column::UpdatedAt)]
    }

    fn default_order() -> Vec<(Self::ColumnType, Order)> {
        vec![(Column::CreatedAt, Order::Desc)]
    }
}
