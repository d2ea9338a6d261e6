use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::AppContext;

#[derive(Args)]
pub struct WhoamiCommand {}

impl WhoamiCommand {
    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        if !ctx.session().is_authenticated() {
            println!("You are not logged in.");
            println!();
            println!("Use 'fittrack login' to authenticate.");
            return Ok(());
        }

        println!("Fetching user information...");
        println!();

        let client = ctx.client()?;

        match client.profile().await {
            Ok(user) => {
                println!("{} Authenticated as:", "✓".green());
                println!();
                println!("  Username: {}", user.username);
                println!("  Email:    {}", user.email);
                println!("  User ID:  {}", user.id);

                Ok(())
            }
            Err(e) => {
                println!("{} Failed to fetch user information: {}", "✗".red(), e);
                Err(e.into())
            }
        }
    }
}
