//! Migrator for the single `drugs` table.
//! Every migration is written with `IF NOT EXISTS` so running `up` against a
//! store that already has the schema is a no-op.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_drugs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_drugs::Migration)]
    }
}
