use anyhow::{Context, Result};

use super::{ApiClient, ApiRequest};
use crate::models::{Dossier, NewDossier};

const DOSSIERS_PATH: &str = "/api/dossiers/";

/// Path of a single dossier, with the number encoded as one segment
pub fn dossier_path(numero: &str) -> String {
    format!("{}{}/", DOSSIERS_PATH, urlencoding::encode(numero))
}

impl ApiClient {
    pub async fn list_dossiers(&self) -> Result<Vec<Dossier>> {
        let response = self
            .send_with_auth(&ApiRequest::get(DOSSIERS_PATH), false)
            .await?;

        let dossiers: Vec<Dossier> = response
            .json()
            .await
            .context("Failed to parse dossier list")?;

        tracing::debug!("Fetched {} dossiers", dossiers.len());
        Ok(dossiers)
    }

    /// Validate the form, then create the dossier owned by `responsable`.
    ///
    /// An invalid form never reaches the network.
    pub async fn create_dossier(&self, form: &NewDossier, responsable: &str) -> Result<Dossier> {
        form.validate().map_err(super::ApiError::from)?;

        let payload = form.to_request(responsable);
        tracing::debug!(
            "Creating dossier {} with status {}",
            payload.numero,
            payload.statut.as_str()
        );

        let response = self
            .send_with_auth(&ApiRequest::post(DOSSIERS_PATH, &payload)?, false)
            .await?;

        response
            .json()
            .await
            .context("Failed to parse created dossier")
    }

    pub async fn delete_dossier(&self, numero: &str) -> Result<()> {
        self.send_with_auth(&ApiRequest::delete(dossier_path(numero)), false)
            .await?;

        tracing::debug!("Deleted dossier {}", numero);
        Ok(())
    }
}
