use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::login::prompt_credentials;
use super::{spinner, CliContext};

#[derive(Args)]
pub struct RegisterCommand {
    /// Username (prompted when omitted)
    #[arg(short, long)]
    username: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long, env = "DOSSIERS_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl RegisterCommand {
    pub async fn execute(self, ctx: &CliContext) -> Result<()> {
        println!("Dossiers - Create an account");
        println!();

        let (username, password) = prompt_credentials(self.username, self.password)?;

        let client = ctx.client()?;

        let progress = spinner("Creating account...");
        let result = client.register(&username, &password).await;
        progress.finish_and_clear();

        match result {
            Ok(account) => {
                let name = account.username.unwrap_or(username);
                println!("{}", format!("✓ Account {} created!", name).green());
                println!();
                println!("Use 'dossiers login' to sign in.");

                Ok(())
            }
            Err(e) => {
                println!("{} {}", "✗ Registration failed:".red(), e);
                Err(e)
            }
        }
    }
}
