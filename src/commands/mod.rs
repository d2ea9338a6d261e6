mod config_cmd;
mod login;
mod logout;
mod progress;
mod register;
mod templates;
mod types;
mod whoami;
mod workout;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::ApiClient;
use crate::config::Config;
use crate::models::WorkoutTypeId;
use crate::session::Session;

pub use login::LoginCommand;
pub use logout::LogoutCommand;
pub use progress::ProgressCommand;
pub use register::RegisterCommand;
pub use templates::TemplatesCommand;
pub use types::TypesCommand;
pub use whoami::WhoamiCommand;
pub use workout::ListArgs;

#[derive(Parser)]
#[command(name = "fittrack")]
#[command(about = "Log workouts and follow your training progress", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "FITTRACK_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Login to FitTrack
    Login(LoginCommand),

    /// Create a FitTrack account
    Register(RegisterCommand),

    /// Logout from FitTrack
    Logout(LogoutCommand),

    /// Show current user information
    Whoami(WhoamiCommand),

    /// List workout types
    Types(TypesCommand),

    /// List exercise templates of a workout type
    Templates(TemplatesCommand),

    /// Manage workouts
    #[command(subcommand)]
    Workout(WorkoutSubcommands),

    /// Show training progress
    Progress(ProgressCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum WorkoutSubcommands {
    /// Log a new workout
    Log {
        /// Preselect a workout type
        #[arg(short = 't', long)]
        type_id: Option<WorkoutTypeId>,
    },

    /// List recent workouts
    List(ListArgs),

    /// Show workout details
    Show {
        /// Workout ID
        id: i64,
    },

    /// Edit a workout
    Edit {
        /// Workout ID
        id: i64,
    },

    /// Delete a workout
    Delete {
        /// Workout ID
        id: i64,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub async fn execute(self) -> Result<()> {
        if self.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Commands::Completions { shell } = self.command {
            generate_completions(shell);
            return Ok(());
        }

        let config_path = Config::resolve_path(self.config.as_deref())?;
        let mut ctx = AppContext::load(config_path)?;

        let result = match self.command {
            Commands::Login(cmd) => cmd.execute(&ctx).await,
            Commands::Register(cmd) => cmd.execute(&ctx).await,
            Commands::Logout(cmd) => cmd.execute(&ctx).await,
            Commands::Whoami(cmd) => cmd.execute(&ctx).await,
            Commands::Types(cmd) => cmd.execute(&ctx).await,
            Commands::Templates(cmd) => cmd.execute(&ctx).await,
            Commands::Workout(subcmd) => match subcmd {
                WorkoutSubcommands::Log { type_id } => workout::log_workout(&ctx, type_id).await,
                WorkoutSubcommands::List(args) => workout::list_workouts(&ctx, args).await,
                WorkoutSubcommands::Show { id } => workout::show_workout(&ctx, id).await,
                WorkoutSubcommands::Edit { id } => workout::edit_workout(&ctx, id).await,
                WorkoutSubcommands::Delete { id, force } => {
                    workout::delete_workout(&ctx, id, force).await
                }
            },
            Commands::Progress(cmd) => cmd.execute(&ctx).await,
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config(&ctx),
                ConfigSubcommands::Init { force } => config_cmd::init_config(&ctx, force),
            },
            Commands::Completions { .. } => Ok(()),
        };

        ctx.sync_session()?;
        result
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

/// State shared by the subcommands of one invocation.
///
/// Owns the session: the stored token is rewritten only by `sync_session`.
pub struct AppContext {
    pub config: Config,
    pub config_path: PathBuf,
    session: Session,
}

impl AppContext {
    pub fn load(config_path: PathBuf) -> Result<Self> {
        let config = Config::load_from(&config_path)?;
        let session = Session::resume(config.auth.token.clone());

        Ok(Self {
            config,
            config_path,
            session,
        })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Client sharing this invocation's session
    pub fn client(&self) -> Result<ApiClient> {
        ApiClient::new(&self.config, self.session.clone())
    }

    /// Client for commands that need a stored login
    pub fn authenticated_client(&self) -> Result<ApiClient> {
        if !self.session.is_authenticated() {
            bail!("You are not logged in. Use 'fittrack login' to authenticate.");
        }
        self.client()
    }

    /// Mirror the session into the config file when it changed
    pub fn sync_session(&mut self) -> Result<()> {
        let token = self.session.token().unwrap_or_default();
        if token == self.config.auth.token {
            return Ok(());
        }

        if token.is_empty() {
            self.config.clear_token();
        } else {
            self.config.set_token(token);
        }
        self.config.save_to(&self.config_path)?;

        if self.session.is_expired() {
            println!();
            println!(
                "{} Your session has expired. Use 'fittrack login' to authenticate again.",
                "!".yellow().bold()
            );
        }

        Ok(())
    }
}

pub(crate) fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
