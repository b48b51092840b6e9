use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::dossier::mount;
use super::CliContext;
use crate::ui::Dashboard;

#[derive(Args)]
pub struct DashboardCommand {}

impl DashboardCommand {
    pub async fn execute(self, ctx: &CliContext) -> Result<()> {
        let client = ctx.client()?;
        let app = mount(&client).await?;

        let app = Dashboard::new(app, &client)?.run().await?;

        if app.logged_out {
            println!("{}", "✓ Logged out successfully!".green());
        }

        Ok(())
    }
}
