use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder};
use serde::Serialize;

/// A single piece of content inside a module (page, quiz, assignment, ...).
///
/// Whether an item is complete for a user is recorded externally in
/// `item_completions`; this table only carries the requirement flag.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "module_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub module_id: i64,
    pub title: String,
    pub position: i32,
    /// Only required items count towards module completion.
    pub required: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::module::Entity",
        from = "Column::ModuleId",
        to = "super::module::Column::Id"
    )]
    Module,

    #[sea_orm(has_many = "super::item_completion::Entity")]
    ItemCompletion,
}

impl Related<super::module::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Module.def()
    }
}

impl Related<super::item_completion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemCompletion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// All items of the given modules, in position order.
    pub async fn find_for_modules<C: ConnectionTrait>(
        conn: &C,
        module_ids: Vec<i64>,
    ) -> Result<Vec<Self>, DbErr> {
        if module_ids.is_empty() {
            return Ok(Vec::new());
        }
        Entity::find()
            .filter(Column::ModuleId.is_in(module_ids))
            .order_by_asc(Column::Position)
            .all(conn)
            .await
    }
}
