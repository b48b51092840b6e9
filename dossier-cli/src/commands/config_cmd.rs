use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;

use super::CliContext;
use crate::config::Config;

pub async fn show_config(ctx: &CliContext) -> Result<()> {
    let config_str = toml::to_string_pretty(&ctx.config)?;

    println!("Current Configuration ({})", ctx.config_path.display());
    println!("────────────────────────────────");
    println!();
    println!("{}", config_str);
    println!(
        "Session file: {}",
        Config::session_file(&ctx.config_path).display()
    );

    Ok(())
}

pub async fn edit_config(ctx: &CliContext) -> Result<()> {
    let config_file = &ctx.config_path;

    // Ensure config file exists
    if !config_file.exists() {
        Config::default().save_to(config_file)?;
    }

    // Open in default editor
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    let status = Command::new(&editor)
        .arg(config_file)
        .status()
        .with_context(|| format!("Failed to launch editor {}", editor))?;

    if !status.success() {
        anyhow::bail!("Editor exited with {}", status);
    }

    // Refuse to leave a file behind that the next run cannot parse
    Config::load_from(config_file)?;

    println!("{}", "✓ Configuration saved!".green());

    Ok(())
}

pub async fn init_config(ctx: &CliContext, force: bool) -> Result<()> {
    let config_file = &ctx.config_path;

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
        "{} {}",
        "✓ Configuration initialized at:".green(),
        config_file.display()
    );
    println!();
    println!("You can edit it with: dossiers config edit");

    Ok(())
}
