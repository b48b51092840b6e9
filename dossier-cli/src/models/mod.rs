pub mod dossier;
pub mod summary;

pub use dossier::{
    CreateDossierRequest, Dossier, DossierStatus, FormField, NewDossier, ValidationError,
};
pub use summary::{count_with_status, DossierSummary};
