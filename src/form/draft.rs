use std::fmt;
use std::str::FromStr;

use crate::models::{
    ExerciseCategory, ExerciseEntry, ExerciseId, ExerciseTemplate, TemplateId,
};

/// Editable numeric field of an exercise entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseField {
    Sets,
    Reps,
    Weight,
    Duration,
    Distance,
}

impl fmt::Display for ExerciseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseField::Sets => write!(f, "sets"),
            ExerciseField::Reps => write!(f, "reps"),
            ExerciseField::Weight => write!(f, "weight"),
            ExerciseField::Duration => write!(f, "duration"),
            ExerciseField::Distance => write!(f, "distance"),
        }
    }
}

impl FromStr for ExerciseField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sets" => Ok(ExerciseField::Sets),
            "reps" => Ok(ExerciseField::Reps),
            "weight" => Ok(ExerciseField::Weight),
            "duration" => Ok(ExerciseField::Duration),
            "distance" => Ok(ExerciseField::Distance),
            _ => Err(anyhow::anyhow!("Invalid exercise field: {}", s)),
        }
    }
}

/// Raw text typed into the primary measurement of a draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftMeasurement {
    Strength {
        sets: String,
        reps: String,
        weight: String,
    },
    Timed {
        duration: String,
    },
}

impl DraftMeasurement {
    fn empty_for(category: ExerciseCategory) -> Self {
        if category.is_strength() {
            DraftMeasurement::Strength {
                sets: String::new(),
                reps: String::new(),
                weight: String::new(),
            }
        } else {
            DraftMeasurement::Timed {
                duration: String::new(),
            }
        }
    }
}

/// Where a draft entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOrigin {
    /// Toggled on from the current catalog
    Selected,
    /// Loaded from the workout being edited; kept across catalog changes
    Preserved,
}

/// An exercise entry while it is being edited in the form
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseDraft {
    pub id: Option<ExerciseId>,
    pub template_id: TemplateId,
    pub name: String,
    pub category: ExerciseCategory,
    pub supports_distance: bool,
    pub origin: EntryOrigin,
    measurement: DraftMeasurement,
    distance: Option<String>,
}

impl ExerciseDraft {
    /// Fresh draft with every numeric field empty
    pub fn from_template(template: &ExerciseTemplate) -> Self {
        Self {
            id: None,
            template_id: template.id,
            name: template.name.clone(),
            category: template.category,
            supports_distance: template.supports_distance,
            origin: EntryOrigin::Selected,
            measurement: DraftMeasurement::empty_for(template.category),
            distance: template.supports_distance.then(String::new),
        }
    }

    /// Draft pre-populated from a persisted entry
    pub fn from_entry(entry: &ExerciseEntry) -> Self {
        let measurement = if entry.category.is_strength() {
            DraftMeasurement::Strength {
                sets: display(entry.sets()),
                reps: display(entry.reps()),
                weight: display(entry.weight()),
            }
        } else {
            DraftMeasurement::Timed {
                duration: display(entry.duration()),
            }
        };

        Self {
            id: entry.id,
            template_id: entry.template_id,
            name: entry.name.clone(),
            category: entry.category,
            supports_distance: entry.supports_distance,
            origin: EntryOrigin::Preserved,
            measurement,
            distance: entry
                .supports_distance
                .then(|| display(entry.distance())),
        }
    }

    pub fn measurement(&self) -> &DraftMeasurement {
        &self.measurement
    }

    /// Fields that apply to this entry, in display order
    pub fn editable_fields(&self) -> Vec<ExerciseField> {
        let mut fields = match self.measurement {
            DraftMeasurement::Strength { .. } => {
                vec![ExerciseField::Sets, ExerciseField::Reps, ExerciseField::Weight]
            }
            DraftMeasurement::Timed { .. } => vec![ExerciseField::Duration],
        };
        if self.distance.is_some() {
            fields.push(ExerciseField::Distance);
        }
        fields
    }

    /// Raw text of `field`, or `None` when the field does not apply to this entry
    pub fn field(&self, field: ExerciseField) -> Option<&str> {
        match (field, &self.measurement) {
            (ExerciseField::Sets, DraftMeasurement::Strength { sets, .. }) => Some(sets.as_str()),
            (ExerciseField::Reps, DraftMeasurement::Strength { reps, .. }) => Some(reps.as_str()),
            (ExerciseField::Weight, DraftMeasurement::Strength { weight, .. }) => {
                Some(weight.as_str())
            }
            (ExerciseField::Duration, DraftMeasurement::Timed { duration }) => Some(duration.as_str()),
            (ExerciseField::Distance, _) => self.distance.as_deref(),
            _ => None,
        }
    }

    /// Replace the raw text of `field`; false when the field does not apply
    pub fn set_field(&mut self, field: ExerciseField, value: String) -> bool {
        let slot = match (field, &mut self.measurement) {
            (ExerciseField::Sets, DraftMeasurement::Strength { sets, .. }) => sets,
            (ExerciseField::Reps, DraftMeasurement::Strength { reps, .. }) => reps,
            (ExerciseField::Weight, DraftMeasurement::Strength { weight, .. }) => weight,
            (ExerciseField::Duration, DraftMeasurement::Timed { duration }) => duration,
            (ExerciseField::Distance, _) => match self.distance.as_mut() {
                Some(distance) => distance,
                None => return false,
            },
            _ => return false,
        };
        *slot = value;
        true
    }

    /// True when no numeric field holds any text
    pub fn is_blank(&self) -> bool {
        let measurement_blank = match &self.measurement {
            DraftMeasurement::Strength { sets, reps, weight } => {
                sets.trim().is_empty() && reps.trim().is_empty() && weight.trim().is_empty()
            }
            DraftMeasurement::Timed { duration } => duration.trim().is_empty(),
        };
        measurement_blank && self.distance.as_deref().map_or(true, |d| d.trim().is_empty())
    }

    /// Coerced duration in minutes
    pub fn duration(&self) -> Option<u32> {
        self.field(ExerciseField::Duration).and_then(coerce_whole)
    }

    /// Template snapshot this draft carries
    pub fn snapshot(&self) -> ExerciseTemplate {
        ExerciseTemplate {
            id: self.template_id,
            name: self.name.clone(),
            category: self.category,
            supports_distance: self.supports_distance,
        }
    }

    /// Typed entry with lenient numeric coercion applied
    pub fn to_entry(&self) -> ExerciseEntry {
        let mut entry = ExerciseEntry::from_template(&self.snapshot());
        entry.id = self.id;

        let entry = match &self.measurement {
            DraftMeasurement::Strength { sets, reps, weight } => entry.with_strength(
                coerce_whole(sets),
                coerce_whole(reps),
                coerce_decimal(weight),
            ),
            DraftMeasurement::Timed { duration } => entry.with_duration(coerce_whole(duration)),
        };

        match self.distance.as_deref() {
            Some(distance) => entry.with_distance(coerce_decimal(distance)),
            None => entry,
        }
    }
}

fn display<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Whole number from user text; anything unusable becomes `None`.
///
/// Fractional input is truncated (`"12.7"` is 12). Empty, negative and
/// non-numeric text is not an error.
pub fn coerce_whole(input: &str) -> Option<u32> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(value) = input.parse::<u32>() {
        return Some(value);
    }

    match input.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 && value <= u32::MAX as f64 => {
            Some(value.trunc() as u32)
        }
        _ => None,
    }
}

/// Non-negative decimal from user text; anything unusable becomes `None`
pub fn coerce_decimal(input: &str) -> Option<f64> {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
        _ => None,
    }
}
