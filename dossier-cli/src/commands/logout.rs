use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::CliContext;

#[derive(Args)]
pub struct LogoutCommand {}

impl LogoutCommand {
    pub async fn execute(self, ctx: &CliContext) -> Result<()> {
        let client = ctx.client()?;
        let session = client.session();

        if !session.is_authenticated() && session.refresh_token().is_none() {
            println!("You are not logged in.");
            return Ok(());
        }

        client.logout()?;

        println!("{}", "✓ Logged out successfully!".green());

        Ok(())
    }
}
