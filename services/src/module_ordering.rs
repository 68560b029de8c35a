//! Ordering and lifecycle operations over a course's module sequence.
//!
//! All mutations here run inside a single transaction per invocation; that
//! transaction is the serialization point for concurrent callers reordering
//! the same course. Positions of non-deleted modules always form the exact
//! set `{1..N}` on commit.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use strum::{Display, EnumString};

use db::models::{
    course,
    module::{self, ActiveModel as ModuleActiveModel, Column as ModuleCol, Entity as ModuleEntity,
        PrerequisiteIds, WorkflowState},
};

use crate::error::OrderingError;

/// Batch lifecycle events applied to a set of modules. Parsed from exactly
/// `publish`, `unpublish`, or `delete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ModuleEvent {
    Publish,
    Unpublish,
    Delete,
}

/// Fields a module can be created with. Position is optional; absent means
/// "append at the end".
#[derive(Debug, Clone)]
pub struct CreateModule {
    pub name: String,
    pub unlock_at: Option<chrono::DateTime<Utc>>,
    pub require_sequential_progress: bool,
    pub prerequisite_module_ids: Vec<i64>,
    pub position: Option<u32>,
}

/// The explicit update whitelist: exactly the fields a caller may change.
/// `unlock_at` is doubly optional so "clear the timestamp" is expressible.
#[derive(Debug, Clone, Default)]
pub struct ModuleUpdate {
    pub name: Option<String>,
    pub unlock_at: Option<Option<chrono::DateTime<Utc>>>,
    pub require_sequential_progress: Option<bool>,
    pub prerequisite_module_ids: Option<Vec<i64>>,
    pub position: Option<u32>,
}

/// Places `module_id` at `target_position` within its course and renumbers
/// the rest of the sequence, preserving the relative order of all other
/// modules.
///
/// The target is clamped into `[1, count]`; `0` (or a module id outside the
/// course's non-deleted set) is `InvalidPosition`. The course is touched once
/// before and once after the batch so an external cache invalidates around
/// the whole renumber instead of per module save.
///
/// Returns the full renumbered sequence. Nothing is committed on failure.
pub async fn insert_at_position(
    db: &DatabaseConnection,
    course_id: i64,
    module_id: i64,
    target_position: u32,
) -> Result<Vec<module::Model>, OrderingError> {
    if target_position == 0 {
        return Err(OrderingError::InvalidPosition);
    }

    let txn = db.begin().await?;

    course::Model::touch(&txn, course_id).await?;

    let mut modules = module::Model::find_ordered(&txn, course_id).await?;
    let count = modules.len();

    let current = modules
        .iter()
        .position(|m| m.id == module_id)
        .ok_or(OrderingError::InvalidPosition)?;

    let slot = (target_position as usize).min(count);
    let moved = modules.remove(current);
    modules.insert(slot - 1, moved);

    let now = Utc::now();
    for (index, m) in modules.iter_mut().enumerate() {
        let wanted = (index + 1) as i32;
        if m.position != wanted {
            ModuleActiveModel {
                id: Set(m.id),
                position: Set(wanted),
                updated_at: Set(now),
                ..Default::default()
            }
            .update(&txn)
            .await?;
            m.position = wanted;
            m.updated_at = now;
        }
    }

    course::Model::touch(&txn, course_id).await?;
    txn.commit().await?;

    Ok(modules)
}

/// Creates a module in the course. The initial workflow state follows the
/// course's draft-mode flag; an explicit position triggers a renumbering
/// insert, otherwise the module is appended.
///
/// Prerequisite ids are stored as given: referential validity is checked
/// leniently at evaluation time, never on write.
pub async fn create_module(
    db: &DatabaseConnection,
    course: &course::Model,
    req: CreateModule,
) -> Result<module::Model, OrderingError> {
    if req.position == Some(0) {
        return Err(OrderingError::InvalidPosition);
    }

    let initial_state = if course.draft_mode {
        WorkflowState::Unpublished
    } else {
        WorkflowState::Active
    };

    let count = module::Model::find_ordered(db, course.id).await?.len();
    let now = Utc::now();

    let created = ModuleActiveModel {
        course_id: Set(course.id),
        name: Set(req.name),
        position: Set((count + 1) as i32),
        workflow_state: Set(initial_state),
        unlock_at: Set(req.unlock_at),
        require_sequential_progress: Set(req.require_sequential_progress),
        prerequisite_module_ids: Set(PrerequisiteIds(req.prerequisite_module_ids)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let created = match req.position {
        Some(position) if (position as usize) <= count => {
            let reordered = insert_at_position(db, course.id, created.id, position).await?;
            reordered
                .into_iter()
                .find(|m| m.id == created.id)
                .unwrap_or(created)
        }
        _ => {
            course::Model::touch(db, course.id).await?;
            created
        }
    };

    Ok(created)
}

/// Applies a whitelisted update to one module. A position change is routed
/// through `insert_at_position` so the sequence invariant holds.
pub async fn update_module(
    db: &DatabaseConnection,
    course: &course::Model,
    module_id: i64,
    update: ModuleUpdate,
) -> Result<module::Model, OrderingError> {
    // An unusable position must abort the whole update before any field is
    // written, so a rejected request leaves the module untouched.
    if update.position == Some(0) {
        return Err(OrderingError::InvalidPosition);
    }

    let existing = module::Model::find_in_course(db, course.id, module_id)
        .await?
        .ok_or(OrderingError::NoModulesFound)?;

    let mut active: ModuleActiveModel = existing.into();

    if let Some(name) = update.name {
        active.name = Set(name);
    }
    if let Some(unlock_at) = update.unlock_at {
        active.unlock_at = Set(unlock_at);
    }
    if let Some(flag) = update.require_sequential_progress {
        active.require_sequential_progress = Set(flag);
    }
    if let Some(ids) = update.prerequisite_module_ids {
        active.prerequisite_module_ids = Set(PrerequisiteIds(ids));
    }
    active.updated_at = Set(Utc::now());

    let mut updated = active.update(db).await?;

    if let Some(position) = update.position {
        let reordered = insert_at_position(db, course.id, module_id, position).await?;
        if let Some(m) = reordered.into_iter().find(|m| m.id == module_id) {
            updated = m;
        }
    } else {
        course::Model::touch(db, course.id).await?;
    }

    Ok(updated)
}

/// Applies `event` to every module of `course_id` whose id appears in
/// `module_ids`. Ids that resolve to nothing (unknown, other course, already
/// deleted) are dropped silently; the returned list holds the ids actually
/// processed, including no-op transitions.
///
/// Fails with `NoModulesFound` only when the whole list resolves to an empty
/// set, in which case nothing is mutated.
pub async fn bulk_update(
    db: &DatabaseConnection,
    course_id: i64,
    module_ids: &[i64],
    event: ModuleEvent,
) -> Result<Vec<i64>, OrderingError> {
    let txn = db.begin().await?;

    let targets = ModuleEntity::find()
        .filter(ModuleCol::CourseId.eq(course_id))
        .filter(ModuleCol::Id.is_in(module_ids.to_vec()))
        .filter(ModuleCol::WorkflowState.ne(WorkflowState::Deleted))
        .order_by_asc(ModuleCol::Position)
        .all(&txn)
        .await?;

    if targets.is_empty() {
        return Err(OrderingError::NoModulesFound);
    }

    if event == ModuleEvent::Delete {
        course::Model::touch(&txn, course_id).await?;
    }

    let wanted_state = match event {
        ModuleEvent::Publish => WorkflowState::Active,
        ModuleEvent::Unpublish => WorkflowState::Unpublished,
        ModuleEvent::Delete => WorkflowState::Deleted,
    };

    let now = Utc::now();
    let mut completed = Vec::with_capacity(targets.len());
    for m in &targets {
        if m.workflow_state != wanted_state {
            ModuleActiveModel {
                id: Set(m.id),
                workflow_state: Set(wanted_state),
                updated_at: Set(now),
                ..Default::default()
            }
            .update(&txn)
            .await?;
        }
        completed.push(m.id);
    }

    // Deleting modules leaves gaps; compact the survivors back to {1..N}.
    if event == ModuleEvent::Delete {
        let survivors = module::Model::find_ordered(&txn, course_id).await?;
        for (index, m) in survivors.iter().enumerate() {
            let wanted = (index + 1) as i32;
            if m.position != wanted {
                ModuleActiveModel {
                    id: Set(m.id),
                    position: Set(wanted),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .update(&txn)
                .await?;
            }
        }
    }

    course::Model::touch(&txn, course_id).await?;
    txn.commit().await?;

    tracing::debug!(course_id, event = %event, count = completed.len(), "bulk module update applied");

    Ok(completed)
}

/// Soft-deletes one module and compacts the remaining sequence.
pub async fn soft_delete(
    db: &DatabaseConnection,
    course_id: i64,
    module_id: i64,
) -> Result<(), OrderingError> {
    bulk_update(db, course_id, &[module_id], ModuleEvent::Delete).await?;
    Ok(())
}
