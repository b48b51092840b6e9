use anyhow::Result;
use clap::Args;
use colored::Colorize;
use dialoguer::{Input, Password};

use super::{spinner, CliContext};

#[derive(Args)]
pub struct LoginCommand {
    /// Username (prompted when omitted)
    #[arg(short, long)]
    username: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long, env = "DOSSIERS_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

/// Ask for whatever credentials were not passed on the command line
pub(super) fn prompt_credentials(
    username: Option<String>,
    password: Option<String>,
) -> Result<(String, String)> {
    let username = match username {
        Some(username) => username,
        None => Input::new().with_prompt("Username").interact_text()?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new().with_prompt("Password").interact()?,
    };

    Ok((username, password))
}

impl LoginCommand {
    pub async fn execute(self, ctx: &CliContext) -> Result<()> {
        println!("Dossiers - Login");
        println!();

        let (username, password) = prompt_credentials(self.username, self.password)?;

        let client = ctx.client()?;

        let progress = spinner(&format!("Logging in as {}...", username));
        let result = client.login(&username, &password).await;
        progress.finish_and_clear();

        match result {
            Ok(_) => {
                println!("{}", "✓ Login successful!".green());
                println!();
                println!("Welcome, {}!", username);
                println!("Use 'dossiers dashboard' or 'dossiers dossier list' to see your dossiers.");

                Ok(())
            }
            Err(e) => {
                println!("{} {}", "✗ Login failed:".red(), e);
                Err(e)
            }
        }
    }
}
