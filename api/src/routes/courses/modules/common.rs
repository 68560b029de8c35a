//! Shared response shapes and helpers for the module route group.

use sea_orm::{DbErr, EntityTrait};
use serde::{Deserialize, Deserializer, Serialize};

use db::models::course::{Entity as CourseEntity, Model as Course};
use db::models::module::{Model as Module, WorkflowState};
use sea_orm::DatabaseConnection;
use services::progression::{Progression, ProgressionState};

/// The documented module JSON shape. `state` and `completed_at` carry the
/// requesting user's progression and are null when it was not evaluated.
#[derive(Debug, Serialize, Default)]
pub struct ModuleResponse {
    pub id: i64,
    pub workflow_state: Option<WorkflowState>,
    pub position: i32,
    pub name: String,
    pub unlock_at: Option<String>,
    pub require_sequential_progress: bool,
    pub prerequisite_module_ids: Vec<i64>,
    pub state: Option<ProgressionState>,
    pub completed_at: Option<String>,
}

impl ModuleResponse {
    pub fn from_model(module: Module, progression: Option<Progression>) -> Self {
        Self {
            id: module.id,
            workflow_state: Some(module.workflow_state),
            position: module.position,
            name: module.name,
            unlock_at: module.unlock_at.map(|t| t.to_rfc3339()),
            require_sequential_progress: module.require_sequential_progress,
            prerequisite_module_ids: module.prerequisite_module_ids.0,
            state: progression.map(|p| p.state),
            completed_at: progression
                .and_then(|p| p.completed_at)
                .map(|t| t.to_rfc3339()),
        }
    }
}

/// Loads the course for a module route. `Ok(None)` means 404; a database
/// failure is propagated so the handler can answer 500 instead.
pub async fn find_course(db: &DatabaseConnection, course_id: i64) -> Result<Option<Course>, DbErr> {
    CourseEntity::find_by_id(course_id).one(db).await
}

/// Deserializes a nullable, omittable field into `Option<Option<T>>`:
/// missing → `None`, `null` → `Some(None)`, value → `Some(Some(v))`.
pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}
