mod common;

use pretty_assertions::assert_eq;
use serde_json::json;

use common::{bench_press, date, running};
use fittrack::models::{ExerciseCategory, ExerciseEntry, Measurement, Workout, WorkoutPayload};

fn mixed_payload() -> WorkoutPayload {
    WorkoutPayload {
        workout_name: "Push and Run".to_string(),
        workout_type_id: 1,
        date: date(2025, 6, 21, 7),
        notes: Some("felt strong".to_string()),
        intensity: Some(7.5),
        duration: Some(55),
        exercises: vec![
            ExerciseEntry::from_template(&bench_press()).with_strength(Some(4), Some(8), Some(72.5)),
            ExerciseEntry::from_template(&running())
                .with_duration(Some(25))
                .with_distance(Some(4.2)),
        ],
    }
}

#[test]
fn test_server_echo_matches_payload() {
    let payload = mixed_payload();

    let mut echoed = serde_json::to_value(&payload).unwrap();
    echoed["id"] = json!(41);
    let workout: Workout = serde_json::from_value(echoed).unwrap();

    assert_eq!(workout, payload.into_workout(Some(41)));
}

#[test]
fn test_payload_wire_shape() {
    let value = serde_json::to_value(mixed_payload()).unwrap();

    assert_eq!(value["date"], "2025-06-21T07:00:00Z");
    assert_eq!(value["exercises"][0]["exercise_template_id"], 10);
    assert_eq!(value["exercises"][0]["type"], "strength");
    assert_eq!(value["exercises"][0]["duration"], serde_json::Value::Null);
    assert_eq!(value["exercises"][1]["sets"], serde_json::Value::Null);
    assert_eq!(value["exercises"][1]["distance"], 4.2);
}

#[test]
fn test_untyped_record_is_classified_by_fields() {
    let workout: Workout = serde_json::from_value(json!({
        "id": 3,
        "workout_name": "Old import",
        "workout_type_id": 1,
        "date": "2024-11-02",
        "exercises": [
            {"exercise_template_id": 10, "name": "Bench Press", "reps": 10},
            {"exercise_template_id": 20, "name": "Running", "duration": 30}
        ]
    }))
    .unwrap();

    assert_eq!(workout.date, date(2024, 11, 2, 0));
    assert_eq!(workout.exercises[0].category, ExerciseCategory::Strength);
    assert_eq!(workout.exercises[1].category, ExerciseCategory::Cardio);
    assert_eq!(
        workout.exercises[1].measurement(),
        &Measurement::Timed { duration: Some(30) }
    );
}

#[test]
fn test_distance_dropped_without_support() {
    let entry: ExerciseEntry = serde_json::from_value(json!({
        "exercise_template_id": 10,
        "name": "Bench Press",
        "type": "strength",
        "distance": 3.0
    }))
    .unwrap();

    assert_eq!(entry.distance(), None);
}
