use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use colored::Colorize;
use dialoguer::{Confirm, Input, MultiSelect, Select};
use std::sync::Arc;

use super::{spinner, AppContext};
use crate::api::ApiClient;
use crate::form::{ExerciseField, FormField, SubmitError, WorkoutForm};
use crate::models::serde_helpers::parse_timestamp;
use crate::models::{Workout, WorkoutFilter, WorkoutId, WorkoutTypeId};

#[derive(Args)]
pub struct ListArgs {
    /// Search workout names and notes
    #[arg(short, long)]
    search: Option<String>,

    /// Filter by workout type ID
    #[arg(short = 't', long)]
    type_id: Option<WorkoutTypeId>,

    /// Filter from date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,

    /// Filter to date (YYYY-MM-DD, inclusive)
    #[arg(long)]
    to: Option<String>,

    /// Number of workouts to show (defaults to ui.list_limit)
    #[arg(short, long)]
    limit: Option<usize>,
}

/// `YYYY-MM-DD` as the start or end of that day, or any timestamp the backend accepts
fn parse_date_arg(input: &str, end_of_day: bool) -> Result<DateTime<Utc>> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|day| {
            if end_of_day {
                day.and_hms_opt(23, 59, 59)
            } else {
                day.and_hms_opt(0, 0, 0)
            }
        })
        .map(|naive| naive.and_utc())
        .or_else(|| parse_timestamp(input))
        .with_context(|| format!("Invalid date: {}", input))
}

pub async fn list_workouts(ctx: &AppContext, args: ListArgs) -> Result<()> {
    let filter = WorkoutFilter {
        search: args.search,
        workout_type_id: args.type_id,
        from_date: args.from.as_deref().map(|d| parse_date_arg(d, false)).transpose()?,
        to_date: args.to.as_deref().map(|d| parse_date_arg(d, true)).transpose()?,
    };
    let limit = args.limit.unwrap_or(ctx.config.ui.list_limit);

    let client = ctx.authenticated_client()?;
    let mut workouts: Vec<Workout> = client
        .list_workouts()
        .await?
        .into_iter()
        .filter(|w| filter.matches(w))
        .collect();
    workouts.sort_by(|a, b| b.date.cmp(&a.date));

    println!("{}", "Recent Workouts".bold());
    println!();

    if workouts.is_empty() {
        println!("No workouts found.");
        return Ok(());
    }

    let date_format = ctx.config.ui.date_format.as_str();
    for workout in workouts.iter().take(limit) {
        println!(
            "  {:>5}  {}  {:<28} {:>4} min  {} exercises",
            workout.id.map(|id| id.to_string()).unwrap_or_default(),
            workout.date.format(date_format),
            workout.workout_name,
            workout.effective_duration(),
            workout.exercises.len()
        );
    }

    if workouts.len() > limit {
        println!();
        println!("Showing {} of {} workouts.", limit, workouts.len());
    }

    Ok(())
}

pub async fn show_workout(ctx: &AppContext, id: WorkoutId) -> Result<()> {
    let client = ctx.authenticated_client()?;
    let workout = client.get_workout(id).await?;

    print_workout(&workout, &ctx.config.ui.date_format);

    Ok(())
}

fn print_workout(workout: &Workout, date_format: &str) {
    println!("{}", workout.workout_name.bold());
    println!("────────────────────────────────");
    println!("  Date:      {}", workout.date.format(date_format));
    println!("  Duration:  {} min", workout.effective_duration());
    if let Some(intensity) = workout.intensity {
        println!("  Intensity: {}/10", intensity);
    }
    let distance = workout.total_distance();
    if distance > 0.0 {
        println!("  Distance:  {:.2} km", distance);
    }
    if let Some(notes) = workout.notes.as_deref() {
        println!("  Notes:     {}", notes);
    }

    println!();
    println!("  Exercises:");
    for exercise in &workout.exercises {
        let mut parts = Vec::new();
        if exercise.category.is_strength() {
            if let Some(sets) = exercise.sets() {
                parts.push(format!("{} sets", sets));
            }
            if let Some(reps) = exercise.reps() {
                parts.push(format!("{} reps", reps));
            }
            if let Some(weight) = exercise.weight() {
                parts.push(format!("{} kg", weight));
            }
        } else if let Some(duration) = exercise.duration() {
            parts.push(format!("{} min", duration));
        }
        if let Some(distance) = exercise.distance() {
            parts.push(format!("{} km", distance));
        }

        println!(
            "    - {} ({}) {}",
            exercise.name,
            exercise.category.to_string().cyan(),
            parts.join(", ")
        );
    }
}

pub async fn log_workout(ctx: &AppContext, type_id: Option<WorkoutTypeId>) -> Result<()> {
    println!("Log a workout");
    println!();

    let client = Arc::new(ctx.authenticated_client()?);
    let mut form = WorkoutForm::new(client);

    if let Some(type_id) = type_id {
        form.select_workout_type(type_id).await?;
    }

    fill_form(&mut form, type_id.is_none()).await?;
    let workout = submit_form(&mut form).await?;

    println!();
    println!("{} Workout logged successfully!", "✓".green());
    println!();
    print_workout(&workout, &ctx.config.ui.date_format);

    Ok(())
}

pub async fn edit_workout(ctx: &AppContext, id: WorkoutId) -> Result<()> {
    let client = Arc::new(ctx.authenticated_client()?);
    let workout = client.get_workout(id).await?;

    println!("Edit Workout: {}", workout.workout_name);
    println!();

    let mut form = WorkoutForm::edit(client, &workout);
    if let Err(e) = form.refresh_templates().await {
        println!("{} Could not load exercises for this workout type: {}", "!".yellow(), e);
    }

    fill_form(&mut form, true).await?;
    let workout = submit_form(&mut form).await?;

    println!();
    println!("{} Workout updated!", "✓".green());
    println!();
    print_workout(&workout, &ctx.config.ui.date_format);

    Ok(())
}

pub async fn delete_workout(ctx: &AppContext, id: WorkoutId, force: bool) -> Result<()> {
    let client = ctx.authenticated_client()?;

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete workout {}?", id))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    client.delete_workout(id).await?;
    println!("{} Workout {} deleted", "✓".green(), id);

    Ok(())
}

fn field_label(field: ExerciseField) -> &'static str {
    match field {
        ExerciseField::Sets => "Sets",
        ExerciseField::Reps => "Reps",
        ExerciseField::Weight => "Weight (kg)",
        ExerciseField::Duration => "Duration (min)",
        ExerciseField::Distance => "Distance (km)",
    }
}

fn prompt_text(prompt: &str, initial: &str) -> Result<String> {
    let value = Input::<String>::new()
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()?;
    Ok(value)
}

/// Walk the user through every field of the form
async fn fill_form(form: &mut WorkoutForm<ApiClient>, ask_type: bool) -> Result<()> {
    let name = prompt_text("Workout name", &form.fields().workout_name)?;
    form.set_workout_name(name);

    if ask_type || form.workout_type_id().is_none() {
        let types = form.load_workout_types().await?;
        if types.is_empty() {
            bail!("The server offers no workout types");
        }

        let names: Vec<&str> = types.iter().map(|t| t.name.as_str()).collect();
        let current = form
            .workout_type_id()
            .and_then(|id| types.iter().position(|t| t.id == id))
            .unwrap_or(0);
        let index = Select::new()
            .with_prompt("Workout type")
            .items(&names)
            .default(current)
            .interact()?;

        form.select_workout_type(types[index].id).await?;
    }

    let templates = form.templates().to_vec();
    if templates.is_empty() {
        println!("No exercises are offered for this workout type.");
    } else {
        let labels: Vec<String> = templates
            .iter()
            .map(|t| format!("{} ({})", t.name, t.category))
            .collect();
        let defaults: Vec<bool> = templates.iter().map(|t| form.is_selected(t.id)).collect();

        let chosen = MultiSelect::new()
            .with_prompt("Exercises (space to toggle, enter to confirm)")
            .items(&labels)
            .defaults(&defaults)
            .interact()?;

        for (index, template) in templates.iter().enumerate() {
            if chosen.contains(&index) != form.is_selected(template.id) {
                form.toggle_exercise(template);
            }
        }
    }

    let drafts = form.exercises().to_vec();
    for draft in &drafts {
        println!("{}", draft.name.bold());
        for field in draft.editable_fields() {
            let current = draft.field(field).unwrap_or_default();
            let value = prompt_text(&format!("  {}", field_label(field)), current)?;
            form.update_exercise_field(draft.template_id, field, value);
        }
    }

    let duration = prompt_text(
        &format!(
            "Duration in minutes (blank for {})",
            form.suggested_duration()
        ),
        &form.fields().duration,
    )?;
    form.set_duration(duration);

    let intensity = prompt_text("Intensity 0-10 (optional)", &form.fields().intensity)?;
    form.set_intensity(intensity);

    let notes = prompt_text("Notes (optional)", &form.fields().notes)?;
    form.set_notes(notes);

    let current_date = form
        .fields()
        .date
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    loop {
        let date = prompt_text("Date (YYYY-MM-DD [HH:MM], blank for now)", &current_date)?;
        if date.trim().is_empty() {
            form.set_date(None);
            break;
        }
        match parse_timestamp(&date) {
            Some(date) => {
                form.set_date(Some(date));
                break;
            }
            None => println!("{} Invalid date: {}", "✗".red(), date),
        }
    }

    Ok(())
}

/// Submit once per attempt; validation and persistence failures keep the draft
async fn submit_form(form: &mut WorkoutForm<ApiClient>) -> Result<Workout> {
    loop {
        let progress = spinner("Saving workout...");
        let result = form.submit().await;
        progress.finish_and_clear();

        match result {
            Ok(workout) => return Ok(workout),
            Err(SubmitError::Invalid(errors)) => {
                println!("{} Please fix the following:", "✗".red());
                for (field, message) in errors.iter() {
                    println!("  {}: {}", field, message);
                }

                let again = Confirm::new()
                    .with_prompt("Edit the workout and try again?")
                    .default(true)
                    .interact()?;
                if !again {
                    bail!("Workout not saved");
                }
                fill_form(form, errors.contains(FormField::WorkoutType)).await?;
            }
            Err(e @ SubmitError::Persistence(_)) => {
                println!("{} {}", "✗".red(), e);

                let retry = Confirm::new()
                    .with_prompt("Retry?")
                    .default(true)
                    .interact()?;
                if !retry {
                    return Err(e.into());
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
}
