use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::sync::Arc;

use super::AppContext;
use crate::catalog::TemplateCatalog;
use crate::models::{ExerciseCategory, TemplateFilter, WorkoutTypeId};

#[derive(Args)]
pub struct TemplatesCommand {
    /// Workout type ID
    type_id: WorkoutTypeId,

    /// Only show exercises whose name contains this text
    #[arg(short, long)]
    search: Option<String>,

    /// Only show one category (strength, cardio, flexibility, balance, sports, functional)
    #[arg(short, long)]
    category: Option<ExerciseCategory>,
}

impl TemplatesCommand {
    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        let client = Arc::new(ctx.authenticated_client()?);
        let catalog = TemplateCatalog::new(client);

        let templates = catalog.list_templates(self.type_id).await?;

        let filter = TemplateFilter {
            search: self.search,
            category: self.category,
        };
        let matching = filter.apply(&templates);

        println!("{}", format!("Exercises for workout type {}", self.type_id).bold());
        println!();

        if matching.is_empty() {
            println!("No exercises found.");
            return Ok(());
        }

        for template in matching {
            let distance = if template.supports_distance {
                " +distance"
            } else {
                ""
            };
            println!(
                "  {:>4}  {:<30} {}{}",
                template.id,
                template.name,
                template.category.to_string().cyan(),
                distance.dimmed()
            );
        }

        Ok(())
    }
}
