mod config_cmd;
mod dashboard;
mod dossier;
mod login;
mod logout;
mod register;
mod whoami;

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

use crate::api::{ApiClient, Session};
use crate::config::Config;

pub use dashboard::DashboardCommand;
pub use dossier::AddCommand;
pub use login::LoginCommand;
pub use logout::LogoutCommand;
pub use register::RegisterCommand;
pub use whoami::WhoamiCommand;

#[derive(Parser)]
#[command(name = "dossiers")]
#[command(about = "Terminal client for tracking administrative dossiers", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "DOSSIERS_CONFIG")]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true, env = "DOSSIERS_BASE_URL")]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session tokens
    Login(LoginCommand),

    /// Create a new account
    Register(RegisterCommand),

    /// Forget the stored session
    Logout(LogoutCommand),

    /// Show who the stored session belongs to
    Whoami(WhoamiCommand),

    /// Launch the interactive dashboard
    Dashboard(DashboardCommand),

    /// Manage dossiers
    #[command(subcommand)]
    Dossier(DossierSubcommands),

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
enum DossierSubcommands {
    /// List dossiers with summary counts
    List,

    /// Create a dossier (prompts for fields not given as flags)
    Add(AddCommand),

    /// Delete a dossier
    Delete {
        /// Dossier number
        numero: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Edit configuration file
    Edit,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

/// Resolved configuration shared by the commands
pub struct CliContext {
    pub config: Config,
    pub config_path: PathBuf,
}

impl CliContext {
    pub fn load(config: Option<PathBuf>, base_url: Option<String>) -> Result<Self> {
        let config_path = Config::resolve_path(config.as_deref())?;
        let mut config = Config::load_from(&config_path)?;

        if let Some(base_url) = base_url {
            config = config.with_base_url(base_url);
        }

        Ok(Self {
            config,
            config_path,
        })
    }

    /// API client backed by the persisted session
    pub fn client(&self) -> Result<ApiClient> {
        let session = Session::open(Config::session_file(&self.config_path))?;
        ApiClient::new(&self.config, session)
    }
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        if self.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        let ctx = CliContext::load(self.config, self.base_url)?;

        match self.command {
            Commands::Login(cmd) => cmd.execute(&ctx).await,
            Commands::Register(cmd) => cmd.execute(&ctx).await,
            Commands::Logout(cmd) => cmd.execute(&ctx).await,
            Commands::Whoami(cmd) => cmd.execute(&ctx).await,
            Commands::Dashboard(cmd) => cmd.execute(&ctx).await,
            Commands::Dossier(subcmd) => match subcmd {
                DossierSubcommands::List => dossier::list_dossiers(&ctx).await,
                DossierSubcommands::Add(cmd) => cmd.execute(&ctx).await,
                DossierSubcommands::Delete { numero, force } => {
                    dossier::delete_dossier(&ctx, &numero, force).await
                }
            },
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config(&ctx).await,
                ConfigSubcommands::Edit => config_cmd::edit_config(&ctx).await,
                ConfigSubcommands::Init { force } => config_cmd::init_config(&ctx, force).await,
            },
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

/// Spinner shown while a request is in flight
fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
