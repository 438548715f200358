//! Category lifecycle: default seeding, CRUD, and referential guards.

use once_cell::sync::Lazy;
use tracing::info;
use uuid::Uuid;

use moneta_domain::{Category, CategoryKind};

use crate::error::{CoreError, CoreResult};
use crate::storage::{Store, TransactionFilter};

/// Seed set applied to every new user. Name, kind, color, icon.
static DEFAULT_CATEGORIES: Lazy<Vec<(&'static str, CategoryKind, &'static str, &'static str)>> =
    Lazy::new(|| {
        vec![
            ("Salary", CategoryKind::Income, "#22c55e", "briefcase"),
            ("Other Income", CategoryKind::Income, "#10b981", "coins"),
            ("Housing", CategoryKind::Expense, "#ef4444", "home"),
            ("Groceries", CategoryKind::Expense, "#f59e0b", "shopping-cart"),
            ("Transport", CategoryKind::Expense, "#3b82f6", "car"),
            ("Utilities", CategoryKind::Expense, "#6366f1", "zap"),
            ("Health", CategoryKind::Expense, "#ec4899", "heart"),
            ("Entertainment", CategoryKind::Expense, "#8b5cf6", "film"),
            ("Dining Out", CategoryKind::Expense, "#f97316", "utensils"),
            ("Other", CategoryKind::Expense, "#6b7280", "tag"),
        ]
    });

pub struct CategoryService;

impl CategoryService {
    /// Creates the default category set for a user. Idempotent: a user that
    /// already has default rows keeps them untouched.
    pub fn seed_defaults(store: &dyn Store, user_id: Uuid) -> CoreResult<Vec<Category>> {
        let existing = store.categories(user_id)?;
        if existing.iter().any(|category| category.is_default) {
            return Ok(existing.into_iter().filter(|c| c.is_default).collect());
        }
        let mut seeded = Vec::with_capacity(DEFAULT_CATEGORIES.len());
        for (name, kind, color, icon) in DEFAULT_CATEGORIES.iter() {
            let category = Category::new(user_id, *name, *kind, *color, *icon).as_default();
            store.insert_category(&category)?;
            seeded.push(category);
        }
        info!(user = %user_id, count = seeded.len(), "seeded default categories");
        Ok(seeded)
    }

    pub fn create(store: &dyn Store, category: Category) -> CoreResult<Category> {
        validate_name(store, category.user_id, None, &category.name)?;
        store.insert_category(&category)?;
        Ok(category)
    }

    pub fn get(store: &dyn Store, user_id: Uuid, id: Uuid) -> CoreResult<Category> {
        load_owned(store, user_id, id)
    }

    pub fn update(store: &dyn Store, user_id: Uuid, changes: Category) -> CoreResult<Category> {
        let existing = load_owned(store, user_id, changes.id)?;
        if existing.is_default {
            return Err(CoreError::forbidden("default categories cannot be edited"));
        }
        validate_name(store, user_id, Some(changes.id), &changes.name)?;
        store.update_category(&changes)?;
        Ok(changes)
    }

    /// Deletes a category that is not a default and is not referenced by any
    /// transaction or bill.
    pub fn delete(store: &dyn Store, user_id: Uuid, id: Uuid) -> CoreResult<()> {
        let existing = load_owned(store, user_id, id)?;
        if existing.is_default {
            return Err(CoreError::forbidden("default categories cannot be deleted"));
        }
        let filter = TransactionFilter {
            category_id: Some(id),
            ..TransactionFilter::default()
        };
        if !store.transactions(user_id, &filter)?.is_empty() {
            return Err(CoreError::forbidden(
                "category is still referenced by transactions",
            ));
        }
        if store.bills(user_id)?.iter().any(|bill| bill.category_id == id) {
            return Err(CoreError::forbidden("category is still referenced by bills"));
        }
        store.delete_category(id)
    }

    pub fn list(
        store: &dyn Store,
        user_id: Uuid,
        kind: Option<CategoryKind>,
    ) -> CoreResult<Vec<Category>> {
        let mut categories = store.categories(user_id)?;
        if let Some(kind) = kind {
            categories.retain(|category| category.kind == kind);
        }
        Ok(categories)
    }
}

fn load_owned(store: &dyn Store, user_id: Uuid, id: Uuid) -> CoreResult<Category> {
    let category = store.category(id)?.ok_or(CoreError::CategoryNotFound(id))?;
    if category.user_id != user_id {
        return Err(CoreError::forbidden("category belongs to another user"));
    }
    Ok(category)
}

fn validate_name(
    store: &dyn Store,
    user_id: Uuid,
    exclude: Option<Uuid>,
    candidate: &str,
) -> CoreResult<()> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation("category name must not be empty"));
    }
    let normalized = trimmed.to_ascii_lowercase();
    let duplicate = store.categories(user_id)?.iter().any(|category| {
        category.name.trim().to_ascii_lowercase() == normalized
            && exclude.map_or(true, |id| category.id != id)
    });
    if duplicate {
        Err(CoreError::validation(format!(
            "category `{trimmed}` already exists"
        )))
    } else {
        Ok(())
    }
}
