use anyhow::Result;
use colored::Colorize;

use super::AppContext;
use crate::config::Config;

pub fn show_config(ctx: &AppContext) -> Result<()> {
    let mut config = ctx.config.clone();
    if config.is_authenticated() {
        config.auth.token = "********".to_string();
    }
    let config_str = toml::to_string_pretty(&config)?;

    println!("Current Configuration ({})", ctx.config_path().display());
    println!("────────────────────────────────");
    println!();
    println!("{}", config_str);

    Ok(())
}

pub fn init_config(ctx: &AppContext, force: bool) -> Result<()> {
    let config_file = ctx.config_path();

    if config_file.exists() && !force {
        println!(
            "Configuration file already exists at: {}",
            config_file.display()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    Config::default().save_to(config_file)?;

    println!(
        "{} Configuration initialized at: {}",
        "✓".green(),
        config_file.display()
    );

    Ok(())
}
