use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::exercise::ExerciseEntry;
use super::serde_helpers::flexible_datetime;
use super::template::WorkoutTypeId;

/// Identifier assigned by the backend to a persisted workout
pub type WorkoutId = i64;

/// Workout record owning an ordered list of exercise entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    #[serde(default)]
    pub id: Option<WorkoutId>,
    pub workout_name: String,
    pub workout_type_id: WorkoutTypeId,
    #[serde(with = "flexible_datetime")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub intensity: Option<f64>,
    #[serde(default)]
    pub duration: Option<u32>, // minutes
    #[serde(default)]
    pub exercises: Vec<ExerciseEntry>,
}

impl Workout {
    /// Sum of exercise durations; entries without a duration count as 0
    pub fn exercise_duration(&self) -> u32 {
        sum_durations(&self.exercises)
    }

    /// Explicit duration, or the exercise sum when none was given
    pub fn effective_duration(&self) -> u32 {
        self.duration.unwrap_or_else(|| self.exercise_duration())
    }

    /// Total distance over all exercises (km)
    pub fn total_distance(&self) -> f64 {
        self.exercises.iter().filter_map(|e| e.distance()).sum()
    }

    /// Persistence payload for this workout, with the duration fallback applied
    pub fn to_payload(&self) -> WorkoutPayload {
        WorkoutPayload {
            workout_name: self.workout_name.clone(),
            workout_type_id: self.workout_type_id,
            date: self.date,
            notes: self.notes.clone(),
            intensity: self.intensity,
            duration: Some(self.effective_duration()),
            exercises: self.exercises.clone(),
        }
    }
}

/// Body of `POST /workouts` and `PATCH /workouts/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPayload {
    pub workout_name: String,
    pub workout_type_id: WorkoutTypeId,
    #[serde(with = "flexible_datetime")]
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub intensity: Option<f64>,
    pub duration: Option<u32>,
    pub exercises: Vec<ExerciseEntry>,
}

impl WorkoutPayload {
    /// Workout as it will exist once the backend assigns `id`
    pub fn into_workout(self, id: Option<WorkoutId>) -> Workout {
        Workout {
            id,
            workout_name: self.workout_name,
            workout_type_id: self.workout_type_id,
            date: self.date,
            notes: self.notes,
            intensity: self.intensity,
            duration: self.duration,
            exercises: self.exercises,
        }
    }
}

pub(crate) fn sum_durations(exercises: &[ExerciseEntry]) -> u32 {
    exercises
        .iter()
        .map(|e| e.duration().unwrap_or(0))
        .fold(0u32, |acc, d| acc.saturating_add(d))
}

/// Filter criteria for listing workouts
#[derive(Debug, Default)]
pub struct WorkoutFilter {
    pub search: Option<String>,
    pub workout_type_id: Option<WorkoutTypeId>,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
}

impl WorkoutFilter {
    pub fn matches(&self, workout: &Workout) -> bool {
        if let Some(ref term) = self.search {
            let term = term.trim().to_lowercase();
            let in_name = workout.workout_name.to_lowercase().contains(&term);
            let in_notes = workout
                .notes
                .as_deref()
                .map(|n| n.to_lowercase().contains(&term))
                .unwrap_or(false);
            if !term.is_empty() && !in_name && !in_notes {
                return false;
            }
        }

        if let Some(type_id) = self.workout_type_id {
            if workout.workout_type_id != type_id {
                return false;
            }
        }

        if let Some(from) = self.from_date {
            if workout.date < from {
                return false;
            }
        }

        if let Some(to) = self.to_date {
            if workout.date > to {
                return false;
            }
        }

        true
    }
}
