pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users_and_ingredients;
mod m20250101_000002_create_recipes;
mod m20250101_000003_create_user_relations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users_and_ingredients::Migration),
            Box::new(m20250101_000002_create_recipes::Migration),
            Box::new(m20250101_000003_create_user_relations::Migration),
        ]
    }
}
