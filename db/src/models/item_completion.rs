use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, ConnectionTrait, QueryFilter, Set};
use serde::Serialize;

/// Records that a user has completed a specific module item.
///
/// This is the persisted face of the item-level completion evaluator; the
/// progression logic only reads it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "item_completions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,

    #[sea_orm(primary_key, auto_increment = false)]
    pub item_id: i64,

    pub completed_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::module_item::Entity",
        from = "Column::ItemId",
        to = "super::module_item::Column::Id"
    )]
    ModuleItem,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::module_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ModuleItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Marks an item complete for a user at the given instant. Idempotent:
    /// an existing record keeps its original timestamp.
    pub async fn record<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        item_id: i64,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, DbErr> {
        if let Some(existing) = Entity::find_by_id((user_id, item_id)).one(conn).await? {
            return Ok(existing);
        }

        ActiveModel {
            user_id: Set(user_id),
            item_id: Set(item_id),
            completed_at: Set(completed_at),
        }
        .insert(conn)
        .await
    }

    /// All completion records of a user across the given items.
    pub async fn find_for_user<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        item_ids: Vec<i64>,
    ) -> Result<Vec<Self>, DbErr> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        Entity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::ItemId.is_in(item_ids))
            .all(conn)
            .await
    }
}
