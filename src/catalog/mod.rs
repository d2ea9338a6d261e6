// Exercise template catalog: read-through cache keyed by workout type.
//
// Every selection takes a generation ticket under the cache lock. A response whose
// ticket is no longer current is dropped, so the last selection always wins.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use crate::api::{ApiError, WorkoutBackend};
use crate::models::{ExerciseTemplate, WorkoutType, WorkoutTypeId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Unknown workout type {0}")]
    UnknownWorkoutType(WorkoutTypeId),

    #[error("Templates for workout type {workout_type_id} were superseded by a newer selection")]
    Superseded { workout_type_id: WorkoutTypeId },

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Default)]
struct CatalogState {
    generation: u64,
    cached: Option<(WorkoutTypeId, Vec<ExerciseTemplate>)>,
}

pub struct TemplateCatalog<B: ?Sized> {
    backend: Arc<B>,
    state: Mutex<CatalogState>,
}

impl<B: WorkoutBackend + ?Sized> TemplateCatalog<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            state: Mutex::new(CatalogState::default()),
        }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// All workout types offered by the backend (not cached)
    pub async fn workout_types(&self) -> Result<Vec<WorkoutType>, CatalogError> {
        Ok(self.backend.workout_types().await?)
    }

    /// Templates for `workout_type_id`; an empty list is a valid answer
    pub async fn list_templates(
        &self,
        workout_type_id: WorkoutTypeId,
    ) -> Result<Vec<ExerciseTemplate>, CatalogError> {
        let ticket = {
            let mut state = self.lock();
            state.generation += 1;

            if let Some((cached_id, templates)) = &state.cached {
                if *cached_id == workout_type_id {
                    tracing::debug!("Template cache hit for workout type {}", workout_type_id);
                    return Ok(templates.clone());
                }
            }

            state.generation
        };

        tracing::debug!("Fetching templates for workout type {}", workout_type_id);
        let result = self.backend.exercise_templates(workout_type_id).await;

        let mut state = self.lock();
        if state.generation != ticket {
            tracing::debug!(
                "Discarding stale templates for workout type {}",
                workout_type_id
            );
            return Err(CatalogError::Superseded { workout_type_id });
        }

        match result {
            Ok(templates) => {
                state.cached = Some((workout_type_id, templates.clone()));
                Ok(templates)
            }
            Err(ApiError::NotFound(_)) => Err(CatalogError::UnknownWorkoutType(workout_type_id)),
            Err(e) => Err(CatalogError::Api(e)),
        }
    }

    /// Cached templates, if `workout_type_id` is the cached selection
    pub fn cached(&self, workout_type_id: WorkoutTypeId) -> Option<Vec<ExerciseTemplate>> {
        match &self.lock().cached {
            Some((id, templates)) if *id == workout_type_id => Some(templates.clone()),
            _ => None,
        }
    }

    /// Drop the cache and retire any fetch still in flight
    pub fn invalidate(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.cached = None;
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
