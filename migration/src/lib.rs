pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_lotto_results;
mod m20250901_000002_create_recommendation_history;
mod m20250901_000003_create_generated_numbers;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_lotto_results::Migration),
            Box::new(m20250901_000002_create_recommendation_history::Migration),
            Box::new(m20250901_000003_create_generated_numbers::Migration),
        ]
    }
}
