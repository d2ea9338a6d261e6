pub mod exercise;
pub mod progress;
pub mod serde_helpers;
pub mod template;
pub mod workout;

pub use exercise::{ExerciseEntry, ExerciseId, Measurement};
pub use progress::{PersonalBest, ProgressSummary};
pub use template::{
    ExerciseCategory, ExerciseTemplate, TemplateFilter, TemplateId, WorkoutType, WorkoutTypeId,
};
pub use workout::{Workout, WorkoutFilter, WorkoutId, WorkoutPayload};
