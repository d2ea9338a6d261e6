// Workout form controller: drafting, validation and the single submission of a workout.
//
// Phases: Drafting -> Validating -> Submitting -> Done, falling back to Drafting on
// any failure with every entered value kept.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

use crate::api::{ApiError, WorkoutBackend};
use crate::catalog::{CatalogError, TemplateCatalog};
use crate::models::workout::sum_durations;
use crate::models::{
    ExerciseTemplate, TemplateId, Workout, WorkoutId, WorkoutPayload, WorkoutType,
    WorkoutTypeId,
};

pub mod draft;
pub mod validation;

pub use draft::{
    coerce_decimal, coerce_whole, DraftMeasurement, EntryOrigin, ExerciseDraft, ExerciseField,
};
pub use validation::{FormField, ValidationErrors};

use validation::{
    EXERCISES_REQUIRED, INTENSITY_OUT_OF_RANGE, WORKOUT_NAME_REQUIRED, WORKOUT_TYPE_REQUIRED,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Drafting,
    Validating,
    Submitting,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(WorkoutId),
}

/// Outcome of `update_exercise_field`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUpdate {
    Applied,
    /// No entry for that template; nothing changed
    NoSuchEntry,
    /// The field does not exist for this exercise category
    NotApplicable,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    #[error("Please fix the highlighted fields: {0}")]
    Invalid(ValidationErrors),

    #[error("A submission is already in progress")]
    InFlight,

    #[error("This workout has already been saved")]
    AlreadySubmitted,

    #[error("Session expired: {0}. Please log in again")]
    AuthExpired(String),

    #[error("Failed to save workout: {0}")]
    Persistence(ApiError),
}

/// Top-level workout fields as typed by the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutFields {
    pub workout_name: String,
    pub notes: String,
    pub intensity: String,
    pub duration: String,
    pub date: Option<DateTime<Utc>>,
}

pub struct WorkoutForm<B: ?Sized> {
    catalog: TemplateCatalog<B>,
    mode: FormMode,
    phase: FormPhase,
    fields: WorkoutFields,
    workout_type_id: Option<WorkoutTypeId>,
    templates: Vec<ExerciseTemplate>,
    exercises: Vec<ExerciseDraft>,
    errors: ValidationErrors,
}

impl<B: WorkoutBackend + ?Sized> WorkoutForm<B> {
    /// Empty form for a new workout
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            catalog: TemplateCatalog::new(backend),
            mode: FormMode::Create,
            phase: FormPhase::Drafting,
            fields: WorkoutFields::default(),
            workout_type_id: None,
            templates: Vec::new(),
            exercises: Vec::new(),
            errors: ValidationErrors::new(),
        }
    }

    /// Form pre-populated from `workout`. A workout without an id is treated as a new one.
    ///
    /// Its exercises are kept through any later catalog change; call
    /// `refresh_templates` to load the catalog for its workout type.
    pub fn edit(backend: Arc<B>, workout: &Workout) -> Self {
        let mut form = Self::new(backend);

        form.mode = workout.id.map_or(FormMode::Create, FormMode::Edit);
        form.fields = WorkoutFields {
            workout_name: workout.workout_name.clone(),
            notes: workout.notes.clone().unwrap_or_default(),
            intensity: workout.intensity.map(|i| i.to_string()).unwrap_or_default(),
            duration: workout.duration.map(|d| d.to_string()).unwrap_or_default(),
            date: Some(workout.date),
        };
        form.workout_type_id = Some(workout.workout_type_id);
        form.exercises = workout.exercises.iter().map(ExerciseDraft::from_entry).collect();

        form
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn fields(&self) -> &WorkoutFields {
        &self.fields
    }

    pub fn workout_type_id(&self) -> Option<WorkoutTypeId> {
        self.workout_type_id
    }

    /// Templates of the selected workout type
    pub fn templates(&self) -> &[ExerciseTemplate] {
        &self.templates
    }

    /// Entries in toggle order
    pub fn exercises(&self) -> &[ExerciseDraft] {
        &self.exercises
    }

    /// Errors from the last failed submission, minus fields edited since
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn is_selected(&self, template_id: TemplateId) -> bool {
        self.exercises.iter().any(|e| e.template_id == template_id)
    }

    pub fn can_submit(&self) -> bool {
        self.phase == FormPhase::Drafting
    }

    pub fn set_workout_name(&mut self, name: impl Into<String>) {
        self.fields.workout_name = name.into();
        self.errors.remove(FormField::WorkoutName);
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.fields.notes = notes.into();
    }

    pub fn set_intensity(&mut self, intensity: impl Into<String>) {
        self.fields.intensity = intensity.into();
        self.errors.remove(FormField::Intensity);
    }

    pub fn set_duration(&mut self, duration: impl Into<String>) {
        self.fields.duration = duration.into();
    }

    pub fn set_date(&mut self, date: Option<DateTime<Utc>>) {
        self.fields.date = date;
    }

    pub async fn load_workout_types(&self) -> Result<Vec<WorkoutType>, CatalogError> {
        self.catalog.workout_types().await
    }

    /// Select a workout type and load its templates.
    ///
    /// The type is committed together with its templates once they arrive, so a
    /// cancelled or superseded call leaves the previous selection in place.
    /// Selected entries whose template is not offered by the new type are dropped;
    /// entries loaded for editing are always kept.
    /// Any other failure clears the selection and the template list.
    pub async fn select_workout_type(
        &mut self,
        workout_type_id: WorkoutTypeId,
    ) -> Result<&[ExerciseTemplate], CatalogError> {
        if self.workout_type_id != Some(workout_type_id) {
            self.catalog.invalidate();
        }

        match self.catalog.list_templates(workout_type_id).await {
            Ok(templates) => {
                self.workout_type_id = Some(workout_type_id);
                self.templates = templates;
                self.errors.remove(FormField::WorkoutType);

                let templates = &self.templates;
                let before = self.exercises.len();
                self.exercises.retain(|entry| {
                    entry.origin == EntryOrigin::Preserved
                        || templates.iter().any(|t| t.id == entry.template_id)
                });
                if self.exercises.len() != before {
                    tracing::debug!(
                        "Dropped {} exercises not offered by workout type {}",
                        before - self.exercises.len(),
                        workout_type_id
                    );
                }
                self.errors.clear_exercises();

                Ok(self.templates.as_slice())
            }
            Err(e @ CatalogError::Superseded { .. }) => Err(e),
            Err(e) => {
                tracing::warn!(
                    "Could not load templates for workout type {}: {}",
                    workout_type_id,
                    e
                );
                self.workout_type_id = None;
                self.templates.clear();
                Err(e)
            }
        }
    }

    /// Reload the templates of the current workout type
    pub async fn refresh_templates(&mut self) -> Result<&[ExerciseTemplate], CatalogError> {
        match self.workout_type_id {
            Some(id) => self.select_workout_type(id).await,
            None => Ok(self.templates.as_slice()),
        }
    }

    /// Add an entry for `template`, or remove it when already present.
    ///
    /// Returns true when the entry was added. Re-adding starts from empty fields.
    pub fn toggle_exercise(&mut self, template: &ExerciseTemplate) -> bool {
        if let Some(index) = self
            .exercises
            .iter()
            .position(|e| e.template_id == template.id)
        {
            self.exercises.remove(index);
            self.errors.remove(FormField::Exercise(template.id));
            return false;
        }

        self.exercises.push(ExerciseDraft::from_template(template));
        self.errors.remove(FormField::Exercises);
        true
    }

    pub fn update_exercise_field(
        &mut self,
        template_id: TemplateId,
        field: ExerciseField,
        value: impl Into<String>,
    ) -> FieldUpdate {
        let Some(entry) = self
            .exercises
            .iter_mut()
            .find(|e| e.template_id == template_id)
        else {
            return FieldUpdate::NoSuchEntry;
        };

        if entry.set_field(field, value.into()) {
            FieldUpdate::Applied
        } else {
            FieldUpdate::NotApplicable
        }
    }

    /// True when `entry` is offered by the current catalog or was loaded for editing
    fn resolves(&self, entry: &ExerciseDraft) -> bool {
        entry.origin == EntryOrigin::Preserved
            || self.templates.iter().any(|t| t.id == entry.template_id)
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if self.fields.workout_name.trim().is_empty() {
            errors.insert(FormField::WorkoutName, WORKOUT_NAME_REQUIRED);
        }

        if self.workout_type_id.is_none() {
            errors.insert(FormField::WorkoutType, WORKOUT_TYPE_REQUIRED);
        }

        if self.exercises.is_empty() {
            errors.insert(FormField::Exercises, EXERCISES_REQUIRED);
        }

        if let Some(intensity) = coerce_decimal(&self.fields.intensity) {
            if intensity > 10.0 {
                errors.insert(FormField::Intensity, INTENSITY_OUT_OF_RANGE);
            }
        }

        for entry in self.exercises.iter().filter(|e| !self.resolves(e)) {
            errors.insert(
                FormField::Exercise(entry.template_id),
                format!("Exercise '{}' is not available for this workout type", entry.name),
            );
        }

        errors
    }

    /// Sum of the durations entered on the exercises
    pub fn suggested_duration(&self) -> u32 {
        self.exercises
            .iter()
            .map(|e| e.duration().unwrap_or(0))
            .fold(0u32, |acc, d| acc.saturating_add(d))
    }

    /// Payload for persistence. Unusable numeric text becomes `None`, a missing
    /// duration is the sum of exercise durations and a missing date is now.
    pub fn build_payload(&self) -> Result<WorkoutPayload, ValidationErrors> {
        let workout_type_id = self.workout_type_id.ok_or_else(|| {
            let mut errors = ValidationErrors::new();
            errors.insert(FormField::WorkoutType, WORKOUT_TYPE_REQUIRED);
            errors
        })?;

        let exercises: Vec<_> = self.exercises.iter().map(ExerciseDraft::to_entry).collect();
        let duration =
            coerce_whole(&self.fields.duration).unwrap_or_else(|| sum_durations(&exercises));
        let notes = self.fields.notes.trim();

        Ok(WorkoutPayload {
            workout_name: self.fields.workout_name.trim().to_string(),
            workout_type_id,
            date: self.fields.date.unwrap_or_else(Utc::now),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
            intensity: coerce_decimal(&self.fields.intensity),
            duration: Some(duration),
            exercises,
        })
    }

    /// Validate and persist the workout with exactly one backend call.
    ///
    /// If this future is dropped mid-request the form stays in `Submitting`
    /// until `abandon_submission` is called.
    pub async fn submit(&mut self) -> Result<Workout, SubmitError> {
        match self.phase {
            FormPhase::Submitting | FormPhase::Validating => return Err(SubmitError::InFlight),
            FormPhase::Done => return Err(SubmitError::AlreadySubmitted),
            FormPhase::Drafting => {}
        }

        self.phase = FormPhase::Validating;
        let payload = match self.checked_payload() {
            Ok(payload) => payload,
            Err(errors) => {
                tracing::debug!("Workout form invalid: {}", errors);
                self.errors = errors.clone();
                self.phase = FormPhase::Drafting;
                return Err(SubmitError::Invalid(errors));
            }
        };
        self.errors = ValidationErrors::new();

        self.phase = FormPhase::Submitting;
        let backend = Arc::clone(self.catalog.backend());
        let result = match self.mode {
            FormMode::Create => backend.create_workout(&payload).await,
            FormMode::Edit(id) => backend.update_workout(id, &payload).await,
        };

        match result {
            Ok(workout) => {
                self.phase = FormPhase::Done;
                tracing::info!("Saved workout '{}'", workout.workout_name);
                Ok(workout)
            }
            Err(e) => {
                self.phase = FormPhase::Drafting;
                tracing::warn!("Workout submission failed: {}", e);
                match e {
                    ApiError::AuthExpired(message) => Err(SubmitError::AuthExpired(message)),
                    other => Err(SubmitError::Persistence(other)),
                }
            }
        }
    }

    /// Return a form whose submit future was dropped to `Drafting`, keeping every
    /// entered value. Returns false when no submission was outstanding.
    ///
    /// The dropped request may still have reached the backend; submitting again
    /// after this can store the workout twice.
    pub fn abandon_submission(&mut self) -> bool {
        if self.phase != FormPhase::Submitting {
            return false;
        }
        tracing::warn!("Abandoning a submission whose outcome is unknown");
        self.phase = FormPhase::Drafting;
        true
    }

    fn checked_payload(&self) -> Result<WorkoutPayload, ValidationErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        self.build_payload()
    }
}
