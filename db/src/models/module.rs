use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, FromJsonQueryResult, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// An ordered, prerequisite-linked container of learning content inside a
/// course.
///
/// Positions of non-deleted modules in a course are kept contiguous starting
/// at 1; renumbering lives in `services::module_ordering`, never here.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "modules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    /// 1-based rank among the course's non-deleted modules.
    pub position: i32,
    pub workflow_state: WorkflowState,
    /// Before this instant the module is locked for everyone.
    pub unlock_at: Option<DateTime<Utc>>,
    pub require_sequential_progress: bool,
    /// Ordered prerequisite references. Written permissively; entries that
    /// point at deleted, missing, or not-strictly-lower-position modules are
    /// ignored when progression is evaluated.
    pub prerequisite_module_ids: PrerequisiteIds,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle state of a module. Deletion is always soft: deleted rows stay in
/// the table but drop out of position sequencing and prerequisite evaluation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "module_workflow_state")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum WorkflowState {
    #[sea_orm(string_value = "active")]
    Active,

    #[sea_orm(string_value = "unpublished")]
    Unpublished,

    #[sea_orm(string_value = "deleted")]
    Deleted,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,

    #[sea_orm(has_many = "super::module_item::Entity")]
    ModuleItem,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::module_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ModuleItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The course's non-deleted modules in position order.
    pub async fn find_ordered<C: ConnectionTrait>(
        conn: &C,
        course_id: i64,
    ) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::WorkflowState.ne(WorkflowState::Deleted))
            .order_by_asc(Column::Position)
            .all(conn)
            .await
    }

    /// One non-deleted module of the course, if present.
    pub async fn find_in_course<C: ConnectionTrait>(
        conn: &C,
        course_id: i64,
        module_id: i64,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(module_id)
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::WorkflowState.ne(WorkflowState::Deleted))
            .one(conn)
            .await
    }

    pub fn is_deleted(&self) -> bool {
        self.workflow_state == WorkflowState::Deleted
    }

    pub fn prerequisite_ids(&self) -> &[i64] {
        &self.prerequisite_module_ids.0
    }
}

/// JSON-typed ordered set of prerequisite module ids.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct PrerequisiteIds(pub Vec<i64>);

impl From<Vec<i64>> for PrerequisiteIds {
    fn from(ids: Vec<i64>) -> Self {
        Self(ids)
    }
}
