use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::AppContext;

#[derive(Args)]
pub struct TypesCommand {}

impl TypesCommand {
    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        let client = ctx.authenticated_client()?;
        let types = client.workout_types().await?;

        println!("{}", "Workout Types".bold());
        println!();

        if types.is_empty() {
            println!("No workout types available.");
            return Ok(());
        }

        for workout_type in &types {
            println!("  {:>4}  {}", workout_type.id, workout_type.name);
        }

        println!();
        println!("Use 'fittrack templates <TYPE_ID>' to see the exercises of a type.");

        Ok(())
    }
}
