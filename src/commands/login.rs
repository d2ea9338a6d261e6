use anyhow::Result;
use clap::Args;
use colored::Colorize;
use dialoguer::{Input, Password};

use super::AppContext;

#[derive(Args)]
pub struct LoginCommand {
    /// Account email (prompted when omitted)
    #[arg(short, long)]
    email: Option<String>,
}

impl LoginCommand {
    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        println!("FitTrack - Login");
        println!();

        let email = match self.email {
            Some(email) => email,
            None => Input::new().with_prompt("Email").interact_text()?,
        };

        let password = Password::new().with_prompt("Password").interact()?;

        println!();
        println!("Logging in as {}...", email);

        let client = ctx.client()?;

        match client.login(&email, &password).await {
            Ok(response) => {
                println!("{} Login successful!", "✓".green());
                if let Some(user) = response.user {
                    println!();
                    println!("Welcome, {}!", user.username);
                }
                println!();
                println!("You can now use FitTrack CLI commands.");

                Ok(())
            }
            Err(e) => {
                println!("{} Login failed: {}", "✗".red(), e);
                Err(e.into())
            }
        }
    }
}
