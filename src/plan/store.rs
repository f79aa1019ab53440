//! Persisted plan list and active-plan pointer.
//!
//! The store keeps an in-memory copy of every plan and writes the whole
//! list back to the key-value backend after each mutation. The cached list
//! only changes after the backend accepted the write, so a failed save
//! never leaves memory and storage out of step.

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use super::presets::{builtin_presets, is_preset_id};
use super::validation::{validate_with, PlanDefaults, ValidationError};
use super::{Plan, PlanDraft};
use crate::storage::{KeyValueStore, StorageError, ACTIVE_PLAN_KEY, PLANS_KEY};

// ============================================================================
// PlanStoreError
// ============================================================================

/// Errors returned by plan store mutations.
#[derive(Debug, Error)]
pub enum PlanStoreError {
    /// The draft violated one or more constraints.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The draft tried to overwrite a built-in plan.
    #[error("Preset plans are read-only: {0}")]
    ReadOnlyPreset(String),

    /// The backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl PlanStoreError {
    /// Human-readable messages suitable for listing in a UI.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Validation(err) => err.messages.clone(),
            other => vec![other.to_string()],
        }
    }
}

// ============================================================================
// PlanStore
// ============================================================================

/// Owns the plan list of one application session.
pub struct PlanStore<S: KeyValueStore> {
    backend: S,
    plans: Vec<Plan>,
    active_id: Option<String>,
    presets: Vec<Plan>,
    defaults: PlanDefaults,
}

impl<S: KeyValueStore> PlanStore<S> {
    /// Loads the plan list and active pointer from `backend`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read or the stored plan
    /// list is not valid JSON.
    pub fn open(backend: S) -> Result<Self, StorageError> {
        let plans = match backend.get(PLANS_KEY)? {
            Some(json) => serde_json::from_str::<Vec<Plan>>(&json)
                .map_err(|e| StorageError::serialization(PLANS_KEY, e))?,
            None => Vec::new(),
        };
        let active_id = backend
            .get(ACTIVE_PLAN_KEY)?
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        tracing::debug!("Loaded {} stored plans", plans.len());

        Ok(Self {
            backend,
            plans,
            active_id,
            presets: builtin_presets(),
            defaults: PlanDefaults::default(),
        })
    }

    /// Sets the values used for optional draft fields.
    pub fn with_defaults(mut self, defaults: PlanDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Validates and stores `draft`, returning the plan id.
    ///
    /// A draft whose id matches a stored plan replaces it in place, keeping
    /// its id, creation time and usage statistics. Any other draft becomes a
    /// new plan with a freshly generated id, appended to the list.
    ///
    /// # Errors
    ///
    /// Nothing is stored when validation fails, the id names a built-in
    /// plan, or the backend rejects the write.
    pub fn save(&mut self, draft: &PlanDraft) -> Result<String, PlanStoreError> {
        let validated = validate_with(draft, &self.defaults)?;

        if let Some(id) = validated.id.as_deref().filter(|id| is_preset_id(id)) {
            return Err(PlanStoreError::ReadOnlyPreset(id.to_string()));
        }

        let mut plans = self.plans.clone();
        let existing = validated
            .id
            .as_deref()
            .and_then(|id| plans.iter().position(|p| p.id == id));

        let id = match existing {
            Some(pos) => {
                let plan = &mut plans[pos];
                plan.name = validated.name;
                plan.description = validated.description;
                plan.mode = validated.mode;
                tracing::info!("Updated plan {}", plan.id);
                plan.id.clone()
            }
            None => {
                let plan = Plan {
                    id: Uuid::new_v4().to_string(),
                    name: validated.name,
                    description: validated.description,
                    mode: validated.mode,
                    created_at: Utc::now(),
                    last_used: None,
                    usage_count: 0,
                    is_preset: false,
                };
                tracing::info!("Created plan {}", plan.id);
                let id = plan.id.clone();
                plans.push(plan);
                id
            }
        };

        self.commit(plans)?;
        Ok(id)
    }

    /// Removes a stored plan. Returns whether a plan was removed.
    ///
    /// Clears the active pointer when it referenced the removed plan.
    pub fn delete_by_id(&mut self, id: &str) -> Result<bool, StorageError> {
        let Some(pos) = self.plans.iter().position(|p| p.id == id) else {
            return Ok(false);
        };

        let mut plans = self.plans.clone();
        plans.remove(pos);
        self.commit(plans)?;
        tracing::info!("Deleted plan {}", id);

        if self.active_id.as_deref() == Some(id) {
            // A stale persisted pointer never resolves to a plan.
            if let Err(e) = self.clear_active() {
                tracing::warn!("Failed to clear active plan pointer: {}", e);
                self.active_id = None;
            }
        }
        Ok(true)
    }

    /// Returns a stored plan, falling back to the built-in presets.
    pub fn get_by_id(&self, id: &str) -> Option<Plan> {
        self.plans
            .iter()
            .chain(self.presets.iter())
            .find(|p| p.id == id)
            .cloned()
    }

    /// Stored plans in insertion order.
    pub fn list_all(&self) -> &[Plan] {
        &self.plans
    }

    /// Built-in plans.
    pub fn presets(&self) -> &[Plan] {
        &self.presets
    }

    /// Points the active-plan pointer at `id`.
    ///
    /// Returns `false` (pointer unchanged) when no stored or built-in plan
    /// has that id.
    pub fn set_active(&mut self, id: &str) -> Result<bool, StorageError> {
        if self.get_by_id(id).is_none() {
            return Ok(false);
        }
        self.backend.set(ACTIVE_PLAN_KEY, id)?;
        self.active_id = Some(id.to_string());
        tracing::info!("Active plan set to {}", id);
        Ok(true)
    }

    /// Returns the active plan id, if any.
    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// Returns the active plan, if the pointer resolves.
    pub fn active_plan(&self) -> Option<Plan> {
        self.active_id().and_then(|id| self.get_by_id(id))
    }

    /// Clears the active-plan pointer.
    pub fn clear_active(&mut self) -> Result<(), StorageError> {
        self.backend.remove(ACTIVE_PLAN_KEY)?;
        self.active_id = None;
        Ok(())
    }

    /// Records one activation of a stored plan.
    ///
    /// Returns `false` when `id` is not a stored plan (built-in plans keep
    /// no statistics).
    pub fn increment_usage(&mut self, id: &str) -> Result<bool, StorageError> {
        let Some(pos) = self.plans.iter().position(|p| p.id == id) else {
            return Ok(false);
        };

        let mut plans = self.plans.clone();
        let plan = &mut plans[pos];
        plan.last_used = Some(Utc::now());
        plan.usage_count = plan.usage_count.saturating_add(1);
        self.commit(plans)?;
        Ok(true)
    }

    fn commit(&mut self, plans: Vec<Plan>) -> Result<(), StorageError> {
        let json =
            serde_json::to_string(&plans).map_err(|e| StorageError::serialization(PLANS_KEY, e))?;
        self.backend.set(PLANS_KEY, &json)?;
        self.plans = plans;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
