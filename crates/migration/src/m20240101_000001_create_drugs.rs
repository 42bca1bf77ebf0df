//! Create `drugs` table.
//! Single inventory table; each deployment owns its own store and runs this
//! migration on startup.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Drugs::Table)
                    .if_not_exists()
                    .col(pk_auto(Drugs::Id))
                    .col(string_len(Drugs::Name, 255))
                    .col(integer(Drugs::Quantity).default(0))
                    .col(double(Drugs::Price).default(0.0))
                    .col(string_len(Drugs::ExpiryDate, 50))
                    .col(string_len(Drugs::Category, 100))
                    .to_owned(),
            )
            .await?;

        // Low-stock scans filter and sort on quantity
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_drugs_quantity")
                    .table(Drugs::Table)
                    .col(Drugs::Quantity)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Drugs::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Drugs {
    Table,
    Id,
    Name,
    Quantity,
    Price,
    ExpiryDate,
    Category,
}
