use std::collections::BTreeMap;
use std::fmt;

use crate::models::TemplateId;

pub const WORKOUT_NAME_REQUIRED: &str = "Workout name is required";
pub const WORKOUT_TYPE_REQUIRED: &str = "Workout type is required";
pub const EXERCISES_REQUIRED: &str = "At least one exercise is required";
pub const INTENSITY_OUT_OF_RANGE: &str = "Intensity must be between 0 and 10";

/// A form field that can carry a validation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    WorkoutName,
    WorkoutType,
    Exercises,
    Intensity,
    /// The exercise entry seeded from this template
    Exercise(TemplateId),
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormField::WorkoutName => write!(f, "workout_name"),
            FormField::WorkoutType => write!(f, "workout_type_id"),
            FormField::Exercises => write!(f, "exercises"),
            FormField::Intensity => write!(f, "intensity"),
            FormField::Exercise(id) => write!(f, "exercises[{}]", id),
        }
    }
}

/// Field-scoped validation messages; empty means valid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<FormField, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: FormField) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Drop every exercise-scoped message
    pub(crate) fn clear_exercises(&mut self) {
        self.0.retain(|field, _| !matches!(field, FormField::Exercise(_)));
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}
