//! Schema for the four tables the API reads.

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(CreateUsersTable),
            Box::new(CreateMasterDataTables),
            Box::new(CreateAttendancesTable),
        ]
    }
}

fn timestamps(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(
            ColumnDef::new(Alias::new("created_at"))
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Alias::new("updated_at"))
                .timestamp_with_time_zone()
                .not_null(),
        )
}

pub struct CreateUsersTable;

impl MigrationName for CreateUsersTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_users_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateUsersTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Users::Table)
            .if_not_exists()
            .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Users::Name).string().not_null())
            .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
            .col(ColumnDef::new(Users::Role).string().not_null())
            .col(ColumnDef::new(Users::Token).string().null().unique_key())
            .col(
                ColumnDef::new(Users::IsActive)
                    .boolean()
                    .not_null()
                    .default(true),
            );
        manager.create_table(timestamps(&mut table).to_owned()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

pub struct CreateMasterDataTables;

impl MigrationName for CreateMasterDataTables {
    fn name(&self) -> &'static str {
        "m20240101_000002_create_master_data_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateMasterDataTables {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut shifts = Table::create();
        shifts
            .table(Shifts::Table)
            .if_not_exists()
            .col(ColumnDef::new(Shifts::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Shifts::Name).string().not_null())
            .col(ColumnDef::new(Shifts::ClockIn).string_len(5).not_null())
            .col(ColumnDef::new(Shifts::ClockOut).string_len(5).not_null())
            .col(
                ColumnDef::new(Shifts::IsActive)
                    .boolean()
                    .not_null()
                    .default(true),
            );
        manager.create_table(timestamps(&mut shifts).to_owned()).await?;

        let mut time_zones = Table::create();
        time_zones
            .table(TimeZones::Table)
            .if_not_exists()
            .col(ColumnDef::new(TimeZones::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(TimeZones::Name).string().not_null())
            .col(ColumnDef::new(TimeZones::NameCode).string().not_null())
            .col(ColumnDef::new(TimeZones::TimeCode).string().not_null())
            .col(ColumnDef::new(TimeZones::Timezone).string().not_null());
        manager
            .create_table(timestamps(&mut time_zones).to_owned())
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TimeZones::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Shifts::Table).to_owned())
            .await
    }
}

pub struct CreateAttendancesTable;

impl MigrationName for CreateAttendancesTable {
    fn name(&self) -> &'static str {
        "m20240101_000003_create_attendances_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateAttendancesTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Attendances::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Attendances::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(Attendances::UserId).uuid().not_null())
            .col(
                ColumnDef::new(Attendances::CheckIn)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .col(
                ColumnDef::new(Attendances::CheckOut)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .col(ColumnDef::new(Attendances::WorkMode).string().not_null())
            .col(ColumnDef::new(Attendances::Status).string().not_null())
            .col(ColumnDef::new(Attendances::Notes).text().null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_attendances_user_id")
                    .from(Attendances::Table, Attendances::UserId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Restrict),
            );
        manager.create_table(timestamps(&mut table).to_owned()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attendances::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    Role,
    Token,
    IsActive,
}

#[derive(DeriveIden)]
enum Shifts {
    Table,
    Id,
    Name,
    ClockIn,
    ClockOut,
    IsActive,
}

#[derive(DeriveIden)]
enum TimeZones {
    Table,
    Id,
    Name,
    NameCode,
    TimeCode,
    Timezone,
}

#[derive(DeriveIden)]
enum Attendances {
    Table,
    Id,
    UserId,
    CheckIn,
    CheckOut,
    WorkMode,
    Status,
    Notes,
}
