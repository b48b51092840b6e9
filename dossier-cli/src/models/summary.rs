use super::dossier::{Dossier, DossierStatus};

/// Counts shown above the dossier list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DossierSummary {
    pub total: usize,
    pub done: usize,
    pub pending: usize,
}

impl DossierSummary {
    pub fn from_dossiers(dossiers: &[Dossier]) -> Self {
        let done = count_with_status(dossiers, DossierStatus::Done);

        Self {
            total: dossiers.len(),
            done,
            pending: dossiers.len() - done,
        }
    }
}

pub fn count_with_status(dossiers: &[Dossier], status: DossierStatus) -> usize {
    dossiers.iter().filter(|d| d.statut == status).count()
}
