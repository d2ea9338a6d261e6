use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::{spinner, AppContext};
use crate::api::{ApiClient, ApiError};
use crate::models::ProgressSummary;
use crate::progress::{aggregate_with, ProgressOptions};

#[derive(Args)]
pub struct ProgressCommand {
    /// Compute progress from your workouts instead of asking the server
    #[arg(long)]
    local: bool,
}

impl ProgressCommand {
    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        let client = ctx.authenticated_client()?;
        let options = ProgressOptions::from(&ctx.config.progress);

        let progress = spinner("Loading progress...");
        let summary = if self.local || ctx.config.progress.prefer_local {
            local_summary(&client, &options).await
        } else {
            match client.progress().await {
                Ok(summary) => Ok(summary),
                Err(e) if e.is_auth_expired() || e == ApiError::NotLoggedIn => Err(e),
                Err(e) => {
                    tracing::warn!("Server progress unavailable ({}), computing locally", e);
                    local_summary(&client, &options).await
                }
            }
        };
        progress.finish_and_clear();

        print_summary(&summary?, &ctx.config.ui.date_format);

        Ok(())
    }
}

async fn local_summary(
    client: &ApiClient,
    options: &ProgressOptions,
) -> Result<ProgressSummary, ApiError> {
    let workouts = client.list_workouts().await?;
    Ok(aggregate_with(&workouts, options))
}

fn print_summary(summary: &ProgressSummary, date_format: &str) {
    println!("{}", "Training Progress".bold());
    println!("────────────────────────────────");
    println!("  Workouts:         {}", summary.total_workouts);
    println!("  Exercises:        {}", summary.total_exercises);
    println!("  Calories burned:  {} kcal", summary.calories_burned);
    println!("  Average duration: {} min", summary.avg_workout_duration);
    println!("  Current streak:   {} days", summary.current_streak);
    println!("  Total distance:   {:.2} km", summary.total_distance);

    if summary.personal_bests.is_empty() {
        return;
    }

    println!();
    println!("{}", "Personal Bests".bold());
    for best in &summary.personal_bests {
        let mut parts = Vec::new();
        if let Some(weight) = best.max_weight {
            parts.push(format!("{} kg", weight));
        }
        if let Some(reps) = best.max_reps {
            parts.push(format!("{} reps", reps));
        }
        if let Some(duration) = best.max_duration {
            parts.push(format!("{} min", duration));
        }
        if let Some(distance) = best.max_distance {
            parts.push(format!("{} km", distance));
        }

        let date = best
            .date_achieved
            .map(|d| d.format(date_format).to_string())
            .unwrap_or_default();

        println!(
            "  {:<28} {:<32} {}",
            best.exercise_name,
            parts.join(", "),
            date.dimmed()
        );
    }
}
