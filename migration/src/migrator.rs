use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202508290001_create_users::Migration),
            Box::new(migrations::m202508290002_create_courses::Migration),
            Box::new(migrations::m202508290003_create_modules::Migration),
            Box::new(migrations::m202508290004_create_module_items::Migration),
            Box::new(migrations::m202508290005_create_item_completions::Migration),
        ]
    }
}
