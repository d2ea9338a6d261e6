use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::serde_helpers::{lenient_date, lenient_f64, lenient_u32};

/// Best recorded values for one exercise name; each facet is tracked independently
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalBest {
    pub exercise_name: String,
    #[serde(default)]
    pub max_weight: Option<f64>,
    #[serde(default)]
    pub max_reps: Option<u32>,
    #[serde(default)]
    pub max_duration: Option<u32>,
    #[serde(default)]
    pub max_distance: Option<f64>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date_achieved: Option<NaiveDate>,
}

/// Read projection over a set of workouts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub total_workouts: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub total_exercises: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub calories_burned: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub avg_workout_duration: u32, // minutes
    #[serde(default, deserialize_with = "lenient_u32")]
    pub current_streak: u32, // days
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_distance: f64, // km
    #[serde(default)]
    pub personal_bests: Vec<PersonalBest>,
}
