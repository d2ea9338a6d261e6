use anyhow::Result;
use clap::Args;
use colored::Colorize;
use dialoguer::{Input, Password};

use super::AppContext;
use crate::api::RegisterRequest;

#[derive(Args)]
pub struct RegisterCommand {
    /// Username (prompted when omitted)
    #[arg(short, long)]
    username: Option<String>,

    /// Email (prompted when omitted)
    #[arg(short, long)]
    email: Option<String>,
}

impl RegisterCommand {
    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        println!("FitTrack - Create account");
        println!();

        let username = match self.username {
            Some(username) => username,
            None => Input::new().with_prompt("Username").interact_text()?,
        };

        let email = match self.email {
            Some(email) => email,
            None => Input::new().with_prompt("Email").interact_text()?,
        };

        let password = Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?;

        let request = RegisterRequest {
            username,
            email,
            password,
        };

        let client = ctx.client()?;

        match client.register(&request).await {
            Ok(_) => {
                println!("{} Account created for {}!", "✓".green(), request.email);
                println!();
                println!("You are now logged in.");
                Ok(())
            }
            Err(e) => {
                println!("{} Registration failed: {}", "✗".red(), e);
                Err(e.into())
            }
        }
    }
}
