// Client-side progress aggregation over fetched workouts.
// Produces the same projection the backend serves from /progress and /personal-bests.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use std::collections::{BTreeMap, BTreeSet};

use crate::config::ProgressConfig;
use crate::models::{ExerciseCategory, PersonalBest, ProgressSummary, Workout};

/// MET used when a workout has no exercises
pub const DEFAULT_MET: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct ProgressOptions {
    pub body_weight_kg: f64,
    /// Offset at which calendar days are decided
    pub utc_offset: FixedOffset,
}

impl Default for ProgressOptions {
    fn default() -> Self {
        Self {
            body_weight_kg: 70.0,
            utc_offset: Utc.fix(),
        }
    }
}

impl From<&ProgressConfig> for ProgressOptions {
    fn from(config: &ProgressConfig) -> Self {
        Self {
            body_weight_kg: config.body_weight_kg,
            utc_offset: config.utc_offset(),
        }
    }
}

/// Aggregate with default options (70 kg, days in UTC)
pub fn aggregate(workouts: &[Workout]) -> ProgressSummary {
    aggregate_with(workouts, &ProgressOptions::default())
}

pub fn aggregate_with(workouts: &[Workout], options: &ProgressOptions) -> ProgressSummary {
    let total_workouts = clamp_u32(workouts.len() as u64);
    let total_exercises = clamp_u32(workouts.iter().map(|w| w.exercises.len() as u64).sum());

    let avg_workout_duration = if workouts.is_empty() {
        0
    } else {
        let total: u64 = workouts.iter().map(|w| u64::from(w.duration.unwrap_or(0))).sum();
        (total as f64 / workouts.len() as f64).round() as u32
    };

    let calories: f64 = workouts
        .iter()
        .map(|w| estimate_calories(w, options.body_weight_kg))
        .sum();

    tracing::debug!("Aggregated progress over {} workouts", workouts.len());

    ProgressSummary {
        total_workouts,
        total_exercises,
        calories_burned: clamp_u32(calories.max(0.0).round() as u64),
        avg_workout_duration,
        current_streak: current_streak(workouts, options.utc_offset),
        total_distance: workouts.iter().map(Workout::total_distance).sum(),
        personal_bests: personal_bests(workouts, options.utc_offset),
    }
}

fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Metabolic equivalent of a category
pub fn met_for(category: ExerciseCategory) -> f64 {
    match category {
        ExerciseCategory::Strength => 5.0,
        ExerciseCategory::Cardio => 8.0,
        ExerciseCategory::Flexibility => 2.5,
        ExerciseCategory::Balance => 3.0,
        ExerciseCategory::Sports => 7.0,
        ExerciseCategory::Functional => 6.0,
    }
}

/// kcal for one workout: weight x hours x mean MET of its exercises
pub fn estimate_calories(workout: &Workout, body_weight_kg: f64) -> f64 {
    let met = if workout.exercises.is_empty() {
        DEFAULT_MET
    } else {
        let total: f64 = workout.exercises.iter().map(|e| met_for(e.category)).sum();
        total / workout.exercises.len() as f64
    };

    let hours = f64::from(workout.effective_duration()) / 60.0;
    body_weight_kg * hours * met
}

/// Consecutive calendar days with a workout, walking back from the most recent one
pub fn current_streak(workouts: &[Workout], offset: FixedOffset) -> u32 {
    let days: BTreeSet<NaiveDate> = workouts.iter().map(|w| local_day(w.date, offset)).collect();

    let Some(&latest) = days.iter().next_back() else {
        return 0;
    };

    let mut streak = 0;
    let mut day = Some(latest);
    while let Some(d) = day.filter(|d| days.contains(d)) {
        streak += 1;
        day = d.pred_opt();
    }
    streak
}

fn local_day(date: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    date.with_timezone(&offset).date_naive()
}

/// Highest value of one facet; ties go to the most recent workout
#[derive(Debug, Clone, Copy)]
struct Best<T> {
    value: T,
    date: DateTime<Utc>,
}

fn record<T: PartialOrd + Copy>(slot: &mut Option<Best<T>>, value: Option<T>, date: DateTime<Utc>) {
    let Some(value) = value else {
        return;
    };

    let replace = match slot {
        None => true,
        Some(best) => value > best.value || (value == best.value && date > best.date),
    };
    if replace {
        *slot = Some(Best { value, date });
    }
}

#[derive(Debug, Default)]
struct Facets {
    weight: Option<Best<f64>>,
    reps: Option<Best<u32>>,
    duration: Option<Best<u32>>,
    distance: Option<Best<f64>>,
}

impl Facets {
    fn latest_date(&self) -> Option<DateTime<Utc>> {
        [
            self.weight.map(|b| b.date),
            self.reps.map(|b| b.date),
            self.duration.map(|b| b.date),
            self.distance.map(|b| b.date),
        ]
        .into_iter()
        .flatten()
        .max()
    }
}

/// Personal bests per exercise name, sorted by name.
///
/// Exercises that never recorded a value are left out.
pub fn personal_bests(workouts: &[Workout], offset: FixedOffset) -> Vec<PersonalBest> {
    let mut by_name: BTreeMap<&str, Facets> = BTreeMap::new();

    for workout in workouts {
        for exercise in &workout.exercises {
            let facets = by_name.entry(exercise.name.as_str()).or_default();
            record(&mut facets.weight, exercise.weight(), workout.date);
            record(&mut facets.reps, exercise.reps(), workout.date);
            record(&mut facets.duration, exercise.duration(), workout.date);
            record(&mut facets.distance, exercise.distance(), workout.date);
        }
    }

    by_name
        .into_iter()
        .filter_map(|(name, facets)| {
            let latest = facets.latest_date()?;
            Some(PersonalBest {
                exercise_name: name.to_string(),
                max_weight: facets.weight.map(|b| b.value),
                max_reps: facets.reps.map(|b| b.value),
                max_duration: facets.duration.map(|b| b.value),
                max_distance: facets.distance.map(|b| b.value),
                date_achieved: Some(local_day(latest, offset)),
            })
        })
        .collect()
}
