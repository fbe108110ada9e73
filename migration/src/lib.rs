pub use sea_orm_migration::prelude::*;

mod catalog_data;
mod m20250301_000001_create_tables;
mod m20250301_000002_create_system_settings;
mod m20250302_000001_seed_catalog;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_tables::Migration),
            Box::new(m20250301_000002_create_system_settings::Migration),
            Box::new(m20250302_000001_seed_catalog::Migration),
        ]
    }
}
