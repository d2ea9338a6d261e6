#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Mutex, Once};
use tokio::sync::oneshot;

use fittrack::api::{ApiError, WorkoutBackend};
use fittrack::models::{
    ExerciseCategory, ExerciseTemplate, TemplateId, Workout, WorkoutId, WorkoutPayload,
    WorkoutType, WorkoutTypeId,
};

static INIT: Once = Once::new();

/// Initialize test logging
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

pub const STRENGTH_DAY: WorkoutTypeId = 1;
pub const CARDIO_DAY: WorkoutTypeId = 2;
pub const REST_DAY: WorkoutTypeId = 3;

pub fn template(
    id: TemplateId,
    name: &str,
    category: ExerciseCategory,
    supports_distance: bool,
) -> ExerciseTemplate {
    ExerciseTemplate {
        id,
        name: name.to_string(),
        category,
        supports_distance,
    }
}

pub fn bench_press() -> ExerciseTemplate {
    template(10, "Bench Press", ExerciseCategory::Strength, false)
}

pub fn squat() -> ExerciseTemplate {
    template(11, "Back Squat", ExerciseCategory::Strength, false)
}

pub fn running() -> ExerciseTemplate {
    template(20, "Running", ExerciseCategory::Cardio, true)
}

pub fn cycling() -> ExerciseTemplate {
    template(21, "Cycling", ExerciseCategory::Cardio, true)
}

pub fn date(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

/// In-memory backend. Template requests for a gated workout type wait until released.
pub struct FakeBackend {
    templates: Mutex<HashMap<WorkoutTypeId, Vec<ExerciseTemplate>>>,
    gates: Mutex<HashMap<WorkoutTypeId, oneshot::Receiver<()>>>,
    failures: Mutex<Vec<ApiError>>,
    pub template_calls: AtomicUsize,
    pub submissions: Mutex<Vec<(Option<WorkoutId>, WorkoutPayload)>>,
    next_id: AtomicI64,
}

impl FakeBackend {
    /// Strength day, cardio day and a rest day without templates
    pub fn new() -> Self {
        let mut templates = HashMap::new();
        templates.insert(STRENGTH_DAY, vec![bench_press(), squat()]);
        templates.insert(CARDIO_DAY, vec![running(), cycling()]);
        templates.insert(REST_DAY, Vec::new());

        Self {
            templates: Mutex::new(templates),
            gates: Mutex::new(HashMap::new()),
            failures: Mutex::new(Vec::new()),
            template_calls: AtomicUsize::new(0),
            submissions: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(100),
        }
    }

    pub fn set_templates(&self, workout_type_id: WorkoutTypeId, templates: Vec<ExerciseTemplate>) {
        self.templates
            .lock()
            .unwrap()
            .insert(workout_type_id, templates);
    }

    /// Hold the next template request for `workout_type_id` until the sender fires
    pub fn gate(&self, workout_type_id: WorkoutTypeId) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(workout_type_id, rx);
        tx
    }

    /// Fail the next write with `error`
    pub fn fail_next_write(&self, error: ApiError) {
        self.failures.lock().unwrap().push(error);
    }

    pub fn template_calls(&self) -> usize {
        self.template_calls.load(Ordering::SeqCst)
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    pub fn last_submission(&self) -> Option<(Option<WorkoutId>, WorkoutPayload)> {
        self.submissions.lock().unwrap().last().cloned()
    }

    fn persist(&self, id: Option<WorkoutId>, payload: &WorkoutPayload) -> Result<Workout, ApiError> {
        self.submissions
            .lock()
            .unwrap()
            .push((id, payload.clone()));

        if let Some(error) = self.failures.lock().unwrap().pop() {
            return Err(error);
        }

        let id = id.unwrap_or_else(|| self.next_id.fetch_add(1, Ordering::SeqCst));
        let mut workout = payload.clone().into_workout(Some(id));
        for (offset, exercise) in workout.exercises.iter_mut().enumerate() {
            if exercise.id.is_none() {
                exercise.id = Some(id * 100 + offset as i64);
            }
        }
        Ok(workout)
    }
}

#[async_trait]
impl WorkoutBackend for FakeBackend {
    async fn workout_types(&self) -> Result<Vec<WorkoutType>, ApiError> {
        Ok(vec![
            WorkoutType {
                id: STRENGTH_DAY,
                name: "Strength Day".to_string(),
            },
            WorkoutType {
                id: CARDIO_DAY,
                name: "Cardio Day".to_string(),
            },
            WorkoutType {
                id: REST_DAY,
                name: "Rest Day".to_string(),
            },
        ])
    }

    async fn exercise_templates(
        &self,
        workout_type_id: WorkoutTypeId,
    ) -> Result<Vec<ExerciseTemplate>, ApiError> {
        self.template_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.gates.lock().unwrap().remove(&workout_type_id);
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        self.templates
            .lock()
            .unwrap()
            .get(&workout_type_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("Workout type not found".to_string()))
    }

    async fn create_workout(&self, payload: &WorkoutPayload) -> Result<Workout, ApiError> {
        self.persist(None, payload)
    }

    async fn update_workout(
        &self,
        id: WorkoutId,
        payload: &WorkoutPayload,
    ) -> Result<Workout, ApiError> {
        self.persist(Some(id), payload)
    }
}
