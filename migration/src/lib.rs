pub use sea_orm_migration::prelude::*;

mod m20260830_000001_create_user_table;
mod m20260830_000002_create_post_table;
mod m20260830_000003_create_tag_table;
mod m20260830_000004_create_post_tag_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260830_000001_create_user_table::Migration),
            Box::new(m20260830_000002_create_post_table::Migration),
            Box::new(m20260830_000003_create_tag_table::Migration),
            Box::new(m20260830_000004_create_post_tag_table::Migration),
        ]
    }
}
