mod common;

use assert_matches::assert_matches;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

use common::{
    bench_press, cycling, date, running, squat, FakeBackend, CARDIO_DAY, REST_DAY, STRENGTH_DAY,
};
use fittrack::api::{ApiError, WorkoutBackend};
use fittrack::catalog::CatalogError;
use fittrack::form::{
    EntryOrigin, ExerciseField, FieldUpdate, FormField, FormMode, FormPhase, SubmitError,
    WorkoutForm,
};
use fittrack::models::{
    ExerciseEntry, ExerciseTemplate, Workout, WorkoutId, WorkoutPayload, WorkoutType,
    WorkoutTypeId,
};

fn new_form() -> (Arc<FakeBackend>, WorkoutForm<FakeBackend>) {
    common::init_test_logging();
    let backend = Arc::new(FakeBackend::new());
    let form = WorkoutForm::new(backend.clone());
    (backend, form)
}

async fn cardio_form() -> (Arc<FakeBackend>, WorkoutForm<FakeBackend>) {
    let (backend, mut form) = new_form();
    form.set_workout_name("Evening Cardio");
    form.select_workout_type(CARDIO_DAY).await.unwrap();
    (backend, form)
}

#[tokio::test]
async fn test_toggle_on_off_on_resets_fields() {
    let (_, mut form) = new_form();
    form.select_workout_type(STRENGTH_DAY).await.unwrap();

    assert!(form.toggle_exercise(&bench_press()));
    form.update_exercise_field(10, ExerciseField::Sets, "4");
    form.update_exercise_field(10, ExerciseField::Reps, "8");
    form.update_exercise_field(10, ExerciseField::Weight, "70");

    assert!(!form.toggle_exercise(&bench_press()));
    assert!(form.exercises().is_empty());

    assert!(form.toggle_exercise(&bench_press()));
    let entry = &form.exercises()[0];
    assert_eq!(entry.field(ExerciseField::Sets), Some(""));
    assert_eq!(entry.field(ExerciseField::Reps), Some(""));
    assert_eq!(entry.field(ExerciseField::Weight), Some(""));
    assert!(entry.is_blank());

    let payload = form.build_payload().unwrap();
    let built = &payload.exercises[0];
    assert_eq!((built.sets(), built.reps(), built.weight()), (None, None, None));
}

#[tokio::test]
async fn test_exercises_follow_toggle_order() {
    let (_, mut form) = cardio_form().await;

    form.toggle_exercise(&cycling());
    form.toggle_exercise(&running());

    let ids: Vec<_> = form.exercises().iter().map(|e| e.template_id).collect();
    assert_eq!(ids, vec![21, 20]);
}

#[tokio::test]
async fn test_validate_reports_only_missing_name() {
    let (_, mut form) = new_form();
    form.select_workout_type(CARDIO_DAY).await.unwrap();
    form.toggle_exercise(&running());
    form.set_workout_name("");

    let errors = form.validate();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get(FormField::WorkoutName), Some("Workout name is required"));
}

#[tokio::test]
async fn test_validate_empty_form() {
    let (_, form) = new_form();

    let errors = form.validate();
    let fields: Vec<_> = errors.fields().collect();

    assert_eq!(
        fields,
        vec![FormField::WorkoutName, FormField::WorkoutType, FormField::Exercises]
    );
    assert_eq!(errors.get(FormField::Exercises), Some("At least one exercise is required"));
}

#[tokio::test]
async fn test_validate_intensity_range() {
    let (_, mut form) = cardio_form().await;
    form.toggle_exercise(&running());

    form.set_intensity("11");
    assert!(form.validate().contains(FormField::Intensity));

    form.set_intensity("7.5");
    assert!(form.validate().is_empty());

    // Unusable text is coerced away rather than rejected
    form.set_intensity("hard");
    assert!(form.validate().is_empty());
    assert_eq!(form.build_payload().unwrap().intensity, None);
}

#[tokio::test]
async fn test_update_exercise_field_outcomes() {
    let (_, mut form) = cardio_form().await;
    form.toggle_exercise(&running());

    assert_eq!(
        form.update_exercise_field(20, ExerciseField::Duration, "30"),
        FieldUpdate::Applied
    );
    assert_eq!(
        form.update_exercise_field(20, ExerciseField::Sets, "3"),
        FieldUpdate::NotApplicable
    );
    assert_eq!(
        form.update_exercise_field(21, ExerciseField::Duration, "30"),
        FieldUpdate::NoSuchEntry
    );

    assert_eq!(form.exercises().len(), 1);
    assert_eq!(form.exercises()[0].field(ExerciseField::Duration), Some("30"));
}

#[tokio::test]
async fn test_changing_type_drops_unavailable_exercises() {
    common::init_test_logging();
    let backend = Arc::new(FakeBackend::new());
    backend.set_templates(CARDIO_DAY, vec![running(), squat()]);
    let mut form = WorkoutForm::new(backend);

    form.select_workout_type(CARDIO_DAY).await.unwrap();
    form.toggle_exercise(&running());
    form.toggle_exercise(&squat());

    form.select_workout_type(STRENGTH_DAY).await.unwrap();

    let ids: Vec<_> = form.exercises().iter().map(|e| e.template_id).collect();
    assert_eq!(ids, vec![11]);
}

#[tokio::test]
async fn test_empty_catalog_clears_selected_exercises() {
    let (_, mut form) = cardio_form().await;
    form.toggle_exercise(&running());

    let templates = form.select_workout_type(REST_DAY).await.unwrap();
    assert!(templates.is_empty());
    assert!(form.exercises().is_empty());
}

#[tokio::test]
async fn test_unknown_type_clears_selection() {
    let (_, mut form) = cardio_form().await;

    let result = form.select_workout_type(42).await;

    assert_matches!(result, Err(CatalogError::UnknownWorkoutType(42)));
    assert_eq!(form.workout_type_id(), None);
    assert!(form.templates().is_empty());
    assert!(form.validate().contains(FormField::WorkoutType));
}

#[tokio::test]
async fn test_cancelled_type_change_keeps_previous_selection() {
    let (backend, mut form) = new_form();
    form.set_workout_name("Push Day");
    form.select_workout_type(STRENGTH_DAY).await.unwrap();
    form.toggle_exercise(&bench_press());

    let _release = backend.gate(CARDIO_DAY);
    let pending =
        tokio::time::timeout(Duration::from_millis(20), form.select_workout_type(CARDIO_DAY))
            .await;
    assert!(pending.is_err());

    // Type and catalog still agree, so bench press stays valid under strength day
    assert_eq!(form.workout_type_id(), Some(STRENGTH_DAY));
    let template_ids: Vec<_> = form.templates().iter().map(|t| t.id).collect();
    assert_eq!(template_ids, vec![10, 11]);
    assert!(form.validate().is_empty());
    assert_eq!(form.build_payload().unwrap().workout_type_id, STRENGTH_DAY);

    form.select_workout_type(CARDIO_DAY).await.unwrap();
    assert_eq!(form.workout_type_id(), Some(CARDIO_DAY));
    assert!(form.exercises().is_empty());
    assert!(form.validate().contains(FormField::Exercises));
}

#[tokio::test]
async fn test_duration_defaults_to_exercise_sum() {
    let (_, mut form) = cardio_form().await;
    let rowing = ExerciseTemplate {
        id: 22,
        name: "Rowing".to_string(),
        ..cycling()
    };
    form.toggle_exercise(&running());
    form.toggle_exercise(&cycling());
    form.toggle_exercise(&rowing);
    form.update_exercise_field(20, ExerciseField::Duration, "20");
    form.update_exercise_field(22, ExerciseField::Duration, "15");

    assert_eq!(form.suggested_duration(), 35);
    assert_eq!(form.build_payload().unwrap().duration, Some(35));

    form.set_duration("50");
    assert_eq!(form.build_payload().unwrap().duration, Some(50));

    form.set_duration("about an hour");
    assert_eq!(form.build_payload().unwrap().duration, Some(35));
}

#[tokio::test]
async fn test_build_payload_coerces_leniently() {
    let (_, mut form) = cardio_form().await;
    form.toggle_exercise(&running());
    form.update_exercise_field(20, ExerciseField::Duration, "");
    form.update_exercise_field(20, ExerciseField::Distance, "5.5");
    form.set_notes("   ");

    let before = chrono::Utc::now();
    let payload = form.build_payload().unwrap();

    assert_eq!(payload.workout_name, "Evening Cardio");
    assert_eq!(payload.workout_type_id, CARDIO_DAY);
    assert_eq!(payload.notes, None);
    assert_eq!(payload.duration, Some(0));
    assert_eq!(payload.exercises[0].duration(), None);
    assert_eq!(payload.exercises[0].distance(), Some(5.5));
    assert!(payload.date >= before);
}

#[tokio::test]
async fn test_build_payload_requires_type() {
    let (_, form) = new_form();

    let errors = form.build_payload().unwrap_err();
    assert!(errors.contains(FormField::WorkoutType));
}

#[tokio::test]
async fn test_submit_creates_once() {
    let (backend, mut form) = cardio_form().await;
    form.toggle_exercise(&running());
    form.update_exercise_field(20, ExerciseField::Duration, "30");
    form.set_date(Some(date(2025, 6, 22, 18)));

    let workout = form.submit().await.unwrap();

    assert_eq!(form.phase(), FormPhase::Done);
    assert_eq!(workout.id, Some(100));
    assert_eq!(workout.duration, Some(30));
    assert_eq!(backend.submission_count(), 1);
    assert_eq!(backend.last_submission().unwrap().0, None);

    assert_matches!(form.submit().await, Err(SubmitError::AlreadySubmitted));
    assert_eq!(backend.submission_count(), 1);
}

#[tokio::test]
async fn test_invalid_submit_keeps_drafting() {
    let (backend, mut form) = new_form();
    form.set_workout_name("Leg Day");

    let result = form.submit().await;

    assert_matches!(result, Err(SubmitError::Invalid(ref errors)) if errors.len() == 2);
    assert_eq!(form.phase(), FormPhase::Drafting);
    assert_eq!(form.fields().workout_name, "Leg Day");
    assert_eq!(backend.submission_count(), 0);
    assert!(form.errors().contains(FormField::Exercises));

    form.select_workout_type(STRENGTH_DAY).await.unwrap();
    assert!(!form.errors().contains(FormField::WorkoutType));

    form.toggle_exercise(&squat());
    assert!(form.errors().is_empty());
}

#[tokio::test]
async fn test_setters_clear_field_errors() {
    let (_, mut form) = new_form();
    form.set_intensity("12");
    let _ = form.submit().await;
    assert!(form.errors().contains(FormField::WorkoutName));
    assert!(form.errors().contains(FormField::Intensity));

    form.set_workout_name("Push");
    form.set_intensity("6");

    assert!(!form.errors().contains(FormField::WorkoutName));
    assert!(!form.errors().contains(FormField::Intensity));
}

#[tokio::test]
async fn test_failed_submit_preserves_state_and_allows_retry() {
    let (backend, mut form) = cardio_form().await;
    form.toggle_exercise(&running());
    form.update_exercise_field(20, ExerciseField::Duration, "42");
    backend.fail_next_write(ApiError::Transport("connection reset".to_string()));

    let result = form.submit().await;

    assert_matches!(result, Err(SubmitError::Persistence(ApiError::Transport(_))));
    assert_eq!(form.phase(), FormPhase::Drafting);
    assert_eq!(form.exercises()[0].field(ExerciseField::Duration), Some("42"));
    assert_eq!(backend.submission_count(), 1);

    let workout = form.submit().await.unwrap();
    assert_eq!(workout.exercises[0].duration(), Some(42));
    assert_eq!(backend.submission_count(), 2);
}

#[tokio::test]
async fn test_auth_expiry_is_reported() {
    let (backend, mut form) = cardio_form().await;
    form.toggle_exercise(&running());
    backend.fail_next_write(ApiError::AuthExpired("token expired".to_string()));

    let result = form.submit().await;

    assert_eq!(result, Err(SubmitError::AuthExpired("token expired".to_string())));
    assert_eq!(form.phase(), FormPhase::Drafting);
}

fn existing_workout() -> Workout {
    let mut run = ExerciseEntry::from_template(&running())
        .with_duration(Some(25))
        .with_distance(Some(4.2));
    run.id = Some(501);

    // Template 30 has since been removed from the catalog
    let mut sprint = ExerciseEntry::from_template(&ExerciseTemplate {
        id: 30,
        name: "Hill Sprints".to_string(),
        ..running()
    })
    .with_duration(Some(10));
    sprint.id = Some(502);

    Workout {
        id: Some(77),
        workout_name: "Tempo Run".to_string(),
        workout_type_id: CARDIO_DAY,
        date: date(2025, 6, 20, 7),
        notes: Some("windy".to_string()),
        intensity: Some(7.0),
        duration: None,
        exercises: vec![run, sprint],
    }
}

#[tokio::test]
async fn test_edit_mode_preserves_loaded_exercises() {
    common::init_test_logging();
    let backend = Arc::new(FakeBackend::new());
    let workout = existing_workout();
    let mut form = WorkoutForm::edit(backend.clone(), &workout);

    assert_eq!(form.mode(), FormMode::Edit(77));
    assert_eq!(form.fields().workout_name, "Tempo Run");
    assert_eq!(form.fields().intensity, "7");

    form.refresh_templates().await.unwrap();

    assert_eq!(form.exercises().len(), 2);
    assert!(form
        .exercises()
        .iter()
        .all(|e| e.origin == EntryOrigin::Preserved));
    assert!(form.validate().is_empty());

    let saved = form.submit().await.unwrap();

    let (id, payload) = backend.last_submission().unwrap();
    assert_eq!(id, Some(77));
    assert_eq!(payload.duration, Some(35));
    assert_eq!(payload.exercises[1].name, "Hill Sprints");
    assert_eq!(payload.exercises[1].id, Some(502));
    assert_eq!(saved.id, Some(77));
}

#[tokio::test]
async fn test_edit_mode_survives_type_change() {
    let backend = Arc::new(FakeBackend::new());
    let mut form = WorkoutForm::edit(backend, &existing_workout());

    form.select_workout_type(STRENGTH_DAY).await.unwrap();
    form.toggle_exercise(&bench_press());

    let names: Vec<_> = form.exercises().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Running", "Hill Sprints", "Bench Press"]);
}

#[tokio::test]
async fn test_exercise_from_another_catalog_fails_validation() {
    let (_, mut form) = cardio_form().await;
    form.toggle_exercise(&running());
    form.toggle_exercise(&bench_press());

    let errors = form.validate();

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.get(FormField::Exercise(10)),
        Some("Exercise 'Bench Press' is not available for this workout type")
    );
}

/// Backend whose writes never complete
struct StalledBackend;

#[async_trait]
impl WorkoutBackend for StalledBackend {
    async fn workout_types(&self) -> Result<Vec<WorkoutType>, ApiError> {
        Ok(Vec::new())
    }

    async fn exercise_templates(
        &self,
        _workout_type_id: WorkoutTypeId,
    ) -> Result<Vec<ExerciseTemplate>, ApiError> {
        Ok(vec![running()])
    }

    async fn create_workout(&self, _payload: &WorkoutPayload) -> Result<Workout, ApiError> {
        std::future::pending().await
    }

    async fn update_workout(
        &self,
        _id: WorkoutId,
        _payload: &WorkoutPayload,
    ) -> Result<Workout, ApiError> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn test_abandoned_submission_blocks_resubmit() {
    let mut form = WorkoutForm::new(Arc::new(StalledBackend));
    form.set_workout_name("Stalled");
    form.select_workout_type(CARDIO_DAY).await.unwrap();
    form.toggle_exercise(&running());

    let timed_out = tokio::time::timeout(Duration::from_millis(20), form.submit()).await;
    assert!(timed_out.is_err());

    assert_eq!(form.phase(), FormPhase::Submitting);
    assert!(!form.can_submit());
    assert_matches!(form.submit().await, Err(SubmitError::InFlight));
}

#[tokio::test]
async fn test_abandoned_submission_can_be_reopened() {
    let mut form = WorkoutForm::new(Arc::new(StalledBackend));
    form.set_workout_name("Stalled");
    form.select_workout_type(CARDIO_DAY).await.unwrap();
    form.toggle_exercise(&running());
    form.update_exercise_field(20, ExerciseField::Duration, "25");

    assert!(!form.abandon_submission());

    let timed_out = tokio::time::timeout(Duration::from_millis(20), form.submit()).await;
    assert!(timed_out.is_err());

    assert!(form.abandon_submission());
    assert_eq!(form.phase(), FormPhase::Drafting);
    assert!(form.can_submit());
    assert_eq!(form.fields().workout_name, "Stalled");
    assert_eq!(form.exercises()[0].field(ExerciseField::Duration), Some("25"));
    assert!(!form.abandon_submission());
}
