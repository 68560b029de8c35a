use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, Set};
use serde::Serialize;

/// A course: the container and ordering context for content modules.
///
/// `updated_at` doubles as the cache-invalidation marker; external caches key
/// their module listings on it, so any change to the module set must `touch`
/// the course.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub code: String,
    pub title: String,
    /// When set, newly created modules start `unpublished` instead of `active`.
    pub draft_mode: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::module::Entity")]
    Module,
}

impl Related<super::module::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Module.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        code: &str,
        title: &str,
        draft_mode: bool,
    ) -> Result<Self, DbErr> {
        let now = Utc::now();
        ActiveModel {
            code: Set(code.to_owned()),
            title: Set(title.to_owned()),
            draft_mode: Set(draft_mode),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Bumps `updated_at` so downstream caches invalidate. Generic over the
    /// connection so it can run inside an ordering transaction.
    pub async fn touch<C: ConnectionTrait>(conn: &C, course_id: i64) -> Result<(), DbErr> {
        let course = ActiveModel {
            id: Set(course_id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        course.update(conn).await?;
        Ok(())
    }
}
