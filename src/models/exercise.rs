use serde::{Deserialize, Serialize};

use super::template::{ExerciseCategory, ExerciseTemplate, TemplateId};

/// Identifier assigned by the backend to a persisted exercise entry
pub type ExerciseId = i64;

/// Primary measurement of an exercise entry, fixed by its category
#[derive(Debug, Clone, PartialEq)]
pub enum Measurement {
    Strength {
        sets: Option<u32>,
        reps: Option<u32>,
        weight: Option<f64>, // kg
    },
    Timed {
        duration: Option<u32>, // minutes
    },
}

impl Measurement {
    /// Empty measurement matching the given category
    pub fn empty_for(category: ExerciseCategory) -> Self {
        if category.is_strength() {
            Measurement::Strength {
                sets: None,
                reps: None,
                weight: None,
            }
        } else {
            Measurement::Timed { duration: None }
        }
    }

    pub fn fits(&self, category: ExerciseCategory) -> bool {
        matches!(self, Measurement::Strength { .. }) == category.is_strength()
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Measurement::Strength { sets, reps, weight } => {
                sets.is_none() && reps.is_none() && weight.is_none()
            }
            Measurement::Timed { duration } => duration.is_none(),
        }
    }
}

/// A concrete exercise inside a workout.
///
/// `name`, `category` and `supports_distance` are a snapshot of the template taken
/// when the entry was created and are never re-synced with the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ExerciseRecord", into = "ExerciseRecord")]
pub struct ExerciseEntry {
    pub id: Option<ExerciseId>,
    pub template_id: TemplateId,
    pub name: String,
    pub category: ExerciseCategory,
    pub supports_distance: bool,
    measurement: Measurement,
    distance: Option<f64>, // km
}

impl ExerciseEntry {
    /// Materialize a fresh, unpersisted entry from a catalog template
    pub fn from_template(template: &ExerciseTemplate) -> Self {
        Self {
            id: None,
            template_id: template.id,
            name: template.name.clone(),
            category: template.category,
            supports_distance: template.supports_distance,
            measurement: Measurement::empty_for(template.category),
            distance: None,
        }
    }

    pub fn measurement(&self) -> &Measurement {
        &self.measurement
    }

    /// Replace the measurement; rejected when it does not fit the category
    pub fn set_measurement(&mut self, measurement: Measurement) -> bool {
        if !measurement.fits(self.category) {
            return false;
        }
        self.measurement = measurement;
        true
    }

    /// Set the distance; rejected unless the template supports distance
    pub fn set_distance(&mut self, distance: Option<f64>) -> bool {
        if !self.supports_distance {
            return false;
        }
        self.distance = distance;
        true
    }

    pub fn with_strength(mut self, sets: Option<u32>, reps: Option<u32>, weight: Option<f64>) -> Self {
        self.set_measurement(Measurement::Strength { sets, reps, weight });
        self
    }

    pub fn with_duration(mut self, duration: Option<u32>) -> Self {
        self.set_measurement(Measurement::Timed { duration });
        self
    }

    pub fn with_distance(mut self, distance: Option<f64>) -> Self {
        self.set_distance(distance);
        self
    }

    pub fn sets(&self) -> Option<u32> {
        match self.measurement {
            Measurement::Strength { sets, .. } => sets,
            Measurement::Timed { .. } => None,
        }
    }

    pub fn reps(&self) -> Option<u32> {
        match self.measurement {
            Measurement::Strength { reps, .. } => reps,
            Measurement::Timed { .. } => None,
        }
    }

    pub fn weight(&self) -> Option<f64> {
        match self.measurement {
            Measurement::Strength { weight, .. } => weight,
            Measurement::Timed { .. } => None,
        }
    }

    pub fn duration(&self) -> Option<u32> {
        match self.measurement {
            Measurement::Timed { duration } => duration,
            Measurement::Strength { .. } => None,
        }
    }

    pub fn distance(&self) -> Option<f64> {
        self.distance
    }
}

/// Flat JSON shape used by the backend for exercise entries
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ExerciseRecord {
    #[serde(default)]
    id: Option<ExerciseId>,
    exercise_template_id: TemplateId,
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    category: Option<ExerciseCategory>,
    #[serde(default)]
    supports_distance: bool,
    #[serde(default)]
    sets: Option<u32>,
    #[serde(default)]
    reps: Option<u32>,
    #[serde(default)]
    weight: Option<f64>,
    #[serde(default)]
    duration: Option<u32>,
    #[serde(default)]
    distance: Option<f64>,
}

impl From<ExerciseRecord> for ExerciseEntry {
    fn from(record: ExerciseRecord) -> Self {
        // Records without a type are classified by the fields they carry
        let category = record.category.unwrap_or_else(|| {
            if record.sets.is_some() || record.reps.is_some() || record.weight.is_some() {
                ExerciseCategory::Strength
            } else {
                ExerciseCategory::Cardio
            }
        });

        let measurement = if category.is_strength() {
            Measurement::Strength {
                sets: record.sets,
                reps: record.reps,
                weight: record.weight,
            }
        } else {
            Measurement::Timed {
                duration: record.duration,
            }
        };

        Self {
            id: record.id,
            template_id: record.exercise_template_id,
            name: record.name,
            category,
            supports_distance: record.supports_distance,
            measurement,
            distance: record.distance.filter(|_| record.supports_distance),
        }
    }
}

impl From<ExerciseEntry> for ExerciseRecord {
    fn from(entry: ExerciseEntry) -> Self {
        let (sets, reps, weight, duration) = match entry.measurement {
            Measurement::Strength { sets, reps, weight } => (sets, reps, weight, None),
            Measurement::Timed { duration } => (None, None, None, duration),
        };

        Self {
            id: entry.id,
            exercise_template_id: entry.template_id,
            name: entry.name,
            category: Some(entry.category),
            supports_distance: entry.supports_distance,
            sets,
            reps,
            weight,
            duration,
            distance: entry.distance,
        }
    }
}
