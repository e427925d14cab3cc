use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Order;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::ListResource;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum AttendanceStatus {
    #[sea_orm(string_value = "PRESENT")]
    Present,
    #[sea_orm(string_value = "LATE")]
    Late,
    #[sea_orm(string_value = "ABSENT")]
    Absent,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkMode {
    #[sea_orm(string_value = "OFFICE")]
    Office,
    #[sea_orm(string_value = "HOME")]
    Home,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "attendances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
    pub work_mode: WorkMode,
    pub status: AttendanceStatus,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Restrict"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: Uuid,
    pub user_id: Uuid,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
    pub work_mode: WorkMode,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Model> for Attendance {
    fn from(model: Model) -> Self {
        Attendance {
            id: model.id,
            user_id: model.user_id,
            check_in: model.check_in,
            check_out: model.check_out,
            work_mode: model.work_mode,
            status: model.status,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl ListResource for Attendance {
    type EntityType = Entity;
    type ColumnType = Column;

    const ID_COLUMN: Self::ColumnType = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "attendance";
    const RESOURCE_NAME_PLURAL: &'static str = "attendances";

    fn filterable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![
            ("id", Column::Id),
            ("userId", Column::UserId),
            ("status", Column::Status),
            ("workMode", Column::WorkMode),
        ]
    }

    fn searchable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![("notes", Column::Notes)]
    }

    fn rangeable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![
            ("createdAt", Column::CreatedAt),
            ("checkIn", Column::CheckIn),
            ("checkOut", Column::CheckOut),
        ]
    }

    fn default_order() -> Vec<(Self::ColumnType, Order)> {
        vec![(Column::CreatedAt, Order::Desc)]
    }
}
