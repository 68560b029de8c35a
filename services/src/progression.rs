//! Per-user progression evaluation over a course's module sequence.
//!
//! Progression is derived on demand, never persisted. The pure evaluator
//! walks the non-deleted modules in ascending position order and memoizes
//! each state, which makes prerequisite evaluation transitive and guarantees
//! termination: a valid prerequisite always sits at a strictly lower
//! position, so its state is already known when it is consulted.

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;
use std::collections::HashMap;
use strum::Display;

use db::models::{item_completion, module, module_item};

/// Derived state of a module for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProgressionState {
    Locked,
    Unlocked,
    Started,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progression {
    pub state: ProgressionState,
    pub completed_at: Option<DateTime<Utc>>,
}

/// What the item-level completion evaluator reports for one item: whether it
/// counts towards completion, and when (if ever) the user completed it.
#[derive(Debug, Clone)]
pub struct ItemStatus {
    pub item_id: i64,
    pub required: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Evaluates every module in `modules` (the course's non-deleted set) for one
/// user, returning a map keyed by module id.
///
/// Rules, in order:
/// - `locked` when `unlock_at` is in the future, or any valid prerequisite is
///   not itself `completed` under this same evaluation. Prerequisite entries
///   pointing at unknown modules or at positions not strictly lower than the
///   module's own are ignored.
/// - `completed` when the module has at least one required item and all of
///   them are complete; `completed_at` is the latest item completion.
/// - `started` when any of the module's items has a completion record.
/// - `unlocked` otherwise; no applicable rules means unlocked by default.
pub fn evaluate_all(
    modules: &[module::Model],
    items: &HashMap<i64, Vec<ItemStatus>>,
    now: DateTime<Utc>,
) -> HashMap<i64, Progression> {
    let mut ordered: Vec<&module::Model> = modules.iter().filter(|m| !m.is_deleted()).collect();
    ordered.sort_by_key(|m| m.position);

    let position_of: HashMap<i64, i32> = ordered.iter().map(|m| (m.id, m.position)).collect();

    let mut evaluated: HashMap<i64, Progression> = HashMap::with_capacity(ordered.len());

    for m in ordered {
        let time_locked = m.unlock_at.is_some_and(|t| t > now);

        let prereq_unmet = m.prerequisite_ids().iter().any(|pid| {
            match position_of.get(pid) {
                // Equal or higher position, or unknown/deleted target: not a
                // real prerequisite.
                Some(pos) if *pos < m.position => evaluated
                    .get(pid)
                    .map(|p| p.state != ProgressionState::Completed)
                    .unwrap_or(true),
                _ => false,
            }
        });

        let progression = if time_locked || prereq_unmet {
            Progression {
                state: ProgressionState::Locked,
                completed_at: None,
            }
        } else {
            let statuses: &[ItemStatus] = items.get(&m.id).map(Vec::as_slice).unwrap_or(&[]);
            let required: Vec<&ItemStatus> = statuses.iter().filter(|s| s.required).collect();

            let all_required_done =
                !required.is_empty() && required.iter().all(|s| s.completed_at.is_some());

            if all_required_done {
                Progression {
                    state: ProgressionState::Completed,
                    completed_at: required.iter().filter_map(|s| s.completed_at).max(),
                }
            } else if statuses.iter().any(|s| s.completed_at.is_some()) {
                Progression {
                    state: ProgressionState::Started,
                    completed_at: None,
                }
            } else {
                Progression {
                    state: ProgressionState::Unlocked,
                    completed_at: None,
                }
            }
        };

        evaluated.insert(m.id, progression);
    }

    evaluated
}

/// Loads the course's module set, items, and the user's completion records,
/// then evaluates the whole course for that user.
pub async fn evaluate_course(
    db: &DatabaseConnection,
    course_id: i64,
    user_id: i64,
) -> Result<HashMap<i64, Progression>, DbErr> {
    let modules = module::Model::find_ordered(db, course_id).await?;

    let module_ids: Vec<i64> = modules.iter().map(|m| m.id).collect();
    let all_items = module_item::Model::find_for_modules(db, module_ids).await?;

    let item_ids: Vec<i64> = all_items.iter().map(|i| i.id).collect();
    let completions = item_completion::Model::find_for_user(db, user_id, item_ids).await?;
    let completed_at: HashMap<i64, DateTime<Utc>> = completions
        .into_iter()
        .map(|c| (c.item_id, c.completed_at))
        .collect();

    let mut items: HashMap<i64, Vec<ItemStatus>> = HashMap::new();
    for item in all_items {
        items.entry(item.module_id).or_default().push(ItemStatus {
            item_id: item.id,
            required: item.required,
            completed_at: completed_at.get(&item.id).copied(),
        });
    }

    Ok(evaluate_all(&modules, &items, Utc::now()))
}

/// Evaluates a single module for a user. `None` when the module is not part
/// of the course's non-deleted set.
pub async fn evaluate_for(
    db: &DatabaseConnection,
    course_id: i64,
    module_id: i64,
    user_id: i64,
) -> Result<Option<Progression>, DbErr> {
    let all = evaluate_course(db, course_id, user_id).await?;
    Ok(all.get(&module_id).copied())
}
