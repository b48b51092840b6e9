use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::CliContext;

#[derive(Args)]
pub struct WhoamiCommand {}

impl WhoamiCommand {
    pub async fn execute(self, ctx: &CliContext) -> Result<()> {
        let client = ctx.client()?;

        if client.session().refresh_token().is_none() {
            println!("You are not logged in.");
            println!();
            println!("Use 'dossiers login' to authenticate.");
            return Ok(());
        }

        match client.refresh_token().await {
            Some(refreshed) => {
                println!("{}", "✓ Authenticated".green());
                if let Some(username) = refreshed.username {
                    println!();
                    println!("  Username: {}", username);
                }
                println!("  API:      {}", client.base_url());

                Ok(())
            }
            None => {
                println!("{}", "✗ Your session could not be refreshed.".red());
                println!();
                println!("Use 'dossiers login' to authenticate again.");
                Ok(())
            }
        }
    }
}
