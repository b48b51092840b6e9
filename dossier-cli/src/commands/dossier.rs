use anyhow::Result;
use clap::Args;
use colored::Colorize;
use dialoguer::{Confirm, Input};

use super::{spinner, CliContext};
use crate::api::{ApiClient, ApiError};
use crate::models::{Dossier, DossierStatus, FormField, NewDossier};
use crate::ui::App;

/// Refresh the session and load the dossiers, reporting an expired session
pub(super) async fn mount(client: &ApiClient) -> Result<App> {
    let progress = spinner("Loading dossiers...");
    let result = App::mount(client).await;
    progress.finish_and_clear();

    if let Err(e) = &result {
        if matches!(e.downcast_ref::<ApiError>(), Some(ApiError::SessionExpired)) {
            println!("{}", "✗ Your session has expired.".red());
            println!("Use 'dossiers login' to authenticate again.");
        }
    }

    result
}

fn print_dossier(dossier: &Dossier) {
    let badge = match dossier.statut {
        DossierStatus::Done => "Done".green(),
        DossierStatus::Pending => "Pending".yellow(),
    };

    println!("{}  [{}]", dossier.numero.bold(), badge);
    println!(
        "  Type: {}   Owner: {}",
        Dossier::display(&dossier.dostype),
        Dossier::display(&dossier.responsable)
    );
    println!(
        "  Dosdef: {}   TEF: {}   Bon caisse: {}   Mandat: {}",
        Dossier::display(&dossier.dosdef),
        Dossier::display(&dossier.tef),
        Dossier::display(&dossier.bon_caisse),
        Dossier::display(&dossier.mandat_paiement)
    );
}

pub async fn list_dossiers(ctx: &CliContext) -> Result<()> {
    let client = ctx.client()?;
    let app = mount(&client).await?;
    let summary = app.summary();

    if !app.username.is_empty() {
        println!("Hello, {}", app.username);
        println!();
    }

    println!(
        "Total: {}   Done: {}   Pending: {}",
        summary.total.to_string().bold(),
        summary.done.to_string().green(),
        summary.pending.to_string().yellow()
    );
    println!("────────────────────────────────");

    if app.dossiers.is_empty() {
        println!("No dossiers yet. Use 'dossiers dossier add' to create one.");
        return Ok(());
    }

    for dossier in &app.dossiers {
        println!();
        print_dossier(dossier);
    }

    Ok(())
}

#[derive(Args, Default)]
pub struct AddCommand {
    /// Dossier number (required)
    #[arg(short, long)]
    numero: Option<String>,

    /// Dossier type
    #[arg(short = 't', long = "type")]
    dostype: Option<String>,

    #[arg(long)]
    dosdef: Option<String>,

    #[arg(long)]
    tef: Option<String>,

    #[arg(long)]
    bon_caisse: Option<String>,

    #[arg(long)]
    mandat_paiement: Option<String>,
}

impl AddCommand {
    fn value(&self, field: FormField) -> Option<&String> {
        match field {
            FormField::Numero => self.numero.as_ref(),
            FormField::Dostype => self.dostype.as_ref(),
            FormField::Dosdef => self.dosdef.as_ref(),
            FormField::Tef => self.tef.as_ref(),
            FormField::BonCaisse => self.bon_caisse.as_ref(),
            FormField::MandatPaiement => self.mandat_paiement.as_ref(),
        }
    }

    /// Fill the form from flags; with no flags at all, prompt for every field
    fn into_form(self) -> Result<NewDossier> {
        let interactive = FormField::ALL.iter().all(|f| self.value(*f).is_none());
        let mut form = NewDossier::default();

        for field in FormField::ALL {
            let value = match self.value(field) {
                Some(value) => value.clone(),
                None if interactive => Input::new()
                    .with_prompt(field.label())
                    .allow_empty(true)
                    .interact_text()?,
                None => String::new(),
            };
            *form.field_mut(field) = value;
        }

        Ok(form)
    }

    pub async fn execute(self, ctx: &CliContext) -> Result<()> {
        let form = self.into_form()?;

        // Rejected before anything is sent
        if let Err(e) = form.validate() {
            println!("{} {}", "✗".red(), e);
            return Err(ApiError::from(e).into());
        }

        let client = ctx.client()?;
        let mut app = mount(&client).await?;

        let progress = spinner("Creating dossier...");
        let created = app.add_dossier(&client, &form).await;
        progress.finish_and_clear();

        if created? {
            if let Some(dossier) = app.dossiers.last() {
                println!("{}", "✓ Dossier created!".green());
                println!();
                print_dossier(dossier);
            }
        } else {
            println!("{}", "✗ The dossier could not be created.".red());
        }

        Ok(())
    }
}

pub async fn delete_dossier(ctx: &CliContext, numero: &str, force: bool) -> Result<()> {
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Really delete dossier {}?", numero))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let client = ctx.client()?;
    let mut app = mount(&client).await?;

    if !app.dossiers.iter().any(|d| d.numero == numero) {
        tracing::warn!("Dossier {} is not in the loaded list", numero);
    }

    let progress = spinner(&format!("Deleting dossier {}...", numero));
    let deleted = app.delete_dossier(&client, numero).await;
    progress.finish_and_clear();

    if deleted {
        let summary = app.summary();
        println!("{}", format!("✓ Dossier {} deleted.", numero).green());
        println!(
            "Total: {}   Done: {}   Pending: {}",
            summary.total, summary.done, summary.pending
        );
    } else {
        println!("{}", format!("✗ Dossier {} could not be deleted.", numero).red());
    }

    Ok(())
}
