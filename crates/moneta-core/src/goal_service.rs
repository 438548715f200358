//! Savings goals: progress derivation, funding, completion.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use moneta_domain::{ceil_days_between, SavingsGoal};

use crate::error::{CoreError, CoreResult};
use crate::storage::Store;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
/// Derived progress figures for one goal.
pub struct GoalProgress {
    pub percentage: f64,
    pub days_remaining: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalView {
    pub goal: SavingsGoal,
    pub percentage: f64,
    pub days_remaining: Option<i64>,
}

pub struct GoalService;

impl GoalService {
    /// Progress percentage clamped to `[0, 100]` (0 when the target is not
    /// positive) and days remaining until the target date, floored at 0.
    pub fn progress(goal: &SavingsGoal, now: DateTime<Utc>) -> GoalProgress {
        let percentage = if goal.target_amount <= 0.0 {
            0.0
        } else {
            (goal.current_amount / goal.target_amount * 100.0).clamp(0.0, 100.0)
        };
        let days_remaining = goal
            .target_date
            .map(|target| ceil_days_between(now, target).max(0));
        GoalProgress {
            percentage,
            days_remaining,
        }
    }

    pub fn create(store: &dyn Store, goal: SavingsGoal) -> CoreResult<SavingsGoal> {
        if goal.target_amount <= 0.0 {
            return Err(CoreError::validation("goal target amount must be positive"));
        }
        if goal.current_amount < 0.0 {
            return Err(CoreError::validation("goal current amount must not be negative"));
        }
        store.insert_goal(&goal)?;
        Ok(goal)
    }

    pub fn get(
        store: &dyn Store,
        user_id: Uuid,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> CoreResult<GoalView> {
        Ok(view(load_owned(store, user_id, id)?, now))
    }

    pub fn update(store: &dyn Store, user_id: Uuid, changes: SavingsGoal) -> CoreResult<SavingsGoal> {
        load_owned(store, user_id, changes.id)?;
        if changes.target_amount <= 0.0 {
            return Err(CoreError::validation("goal target amount must be positive"));
        }
        store.update_goal(&changes)?;
        Ok(changes)
    }

    pub fn delete(store: &dyn Store, user_id: Uuid, id: Uuid) -> CoreResult<()> {
        load_owned(store, user_id, id)?;
        store.delete_goal(id)
    }

    pub fn list(store: &dyn Store, user_id: Uuid, now: DateTime<Utc>) -> CoreResult<Vec<GoalView>> {
        Ok(store
            .goals(user_id)?
            .into_iter()
            .map(|goal| view(goal, now))
            .collect())
    }

    /// Adds funds to an open goal. Crossing the target flips `completed` as
    /// a side effect; a completed goal rejects further funding.
    pub fn add_funds(
        store: &dyn Store,
        user_id: Uuid,
        id: Uuid,
        amount: f64,
    ) -> CoreResult<SavingsGoal> {
        if amount <= 0.0 {
            return Err(CoreError::validation("funding amount must be positive"));
        }
        let mut goal = load_owned(store, user_id, id)?;
        if goal.completed {
            return Err(CoreError::forbidden("savings goal is already completed"));
        }
        goal.current_amount += amount;
        if goal.current_amount >= goal.target_amount {
            goal.completed = true;
            debug!(goal = %goal.id, "savings goal reached its target");
        }
        store.update_goal(&goal)?;
        Ok(goal)
    }

    /// Marks a goal completed regardless of the amount saved.
    pub fn complete(store: &dyn Store, user_id: Uuid, id: Uuid) -> CoreResult<SavingsGoal> {
        let mut goal = load_owned(store, user_id, id)?;
        if goal.completed {
            return Err(CoreError::forbidden("savings goal is already completed"));
        }
        goal.completed = true;
        store.update_goal(&goal)?;
        Ok(goal)
    }
}

fn view(goal: SavingsGoal, now: DateTime<Utc>) -> GoalView {
    let progress = GoalService::progress(&goal, now);
    GoalView {
        goal,
        percentage: progress.percentage,
        days_remaining: progress.days_remaining,
    }
}

fn load_owned(store: &dyn Store, user_id: Uuid, id: Uuid) -> CoreResult<SavingsGoal> {
    let goal = store.goal(id)?.ok_or(CoreError::GoalNotFound(id))?;
    if goal.user_id != user_id {
        return Err(CoreError::forbidden("savings goal belongs to another user"));
    }
    Ok(goal)
}
