use async_trait::async_trait;

use super::ApiError;
use crate::models::{
    ExerciseTemplate, Workout, WorkoutId, WorkoutPayload, WorkoutType, WorkoutTypeId,
};

/// Persistence collaborator used by the template catalog and the workout form
#[async_trait]
pub trait WorkoutBackend: Send + Sync {
    /// `GET /workout_types`
    async fn workout_types(&self) -> Result<Vec<WorkoutType>, ApiError>;

    /// `GET /workout_types/{id}/exercises`
    async fn exercise_templates(
        &self,
        workout_type_id: WorkoutTypeId,
    ) -> Result<Vec<ExerciseTemplate>, ApiError>;

    /// `POST /workouts`
    async fn create_workout(&self, payload: &WorkoutPayload) -> Result<Workout, ApiError>;

    /// `PATCH /workouts/{id}`
    async fn update_workout(
        &self,
        id: WorkoutId,
        payload: &WorkoutPayload,
    ) -> Result<Workout, ApiError>;
}
