use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::AppContext;

#[derive(Args)]
pub struct LogoutCommand {}

impl LogoutCommand {
    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        if !ctx.session().is_authenticated() {
            println!("You are not logged in.");
            return Ok(());
        }

        ctx.client()?.logout();

        println!("{} Logged out successfully!", "✓".green());

        Ok(())
    }
}
