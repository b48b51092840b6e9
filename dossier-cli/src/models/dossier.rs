use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Completion status of a dossier.
///
/// Decided once, when the dossier is submitted, and never recomputed.
/// On the wire the backend uses `"termine"` and `"en_attente"`; anything else
/// it sends back is read as pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DossierStatus {
    Done,
    #[default]
    Pending,
}

impl DossierStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DossierStatus::Done => "termine",
            DossierStatus::Pending => "en_attente",
        }
    }
}

impl From<String> for DossierStatus {
    fn from(value: String) -> Self {
        if value == "termine" {
            DossierStatus::Done
        } else {
            DossierStatus::Pending
        }
    }
}

impl From<DossierStatus> for String {
    fn from(status: DossierStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for DossierStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DossierStatus::Done => write!(f, "Done"),
            DossierStatus::Pending => write!(f, "Pending"),
        }
    }
}

/// Shown for fields left empty
pub const EMPTY_FIELD: &str = "none";

/// Dossier record as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dossier {
    #[serde(default, deserialize_with = "nullable_string")]
    pub numero: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub dostype: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub responsable: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub dosdef: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub tef: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub bon_caisse: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub mandat_paiement: String,
    #[serde(default, deserialize_with = "nullable_status")]
    pub statut: DossierStatus,
}

impl Dossier {
    /// Field value for display, with `"none"` standing in for blanks
    pub fn display(value: &str) -> &str {
        if value.trim().is_empty() {
            EMPTY_FIELD
        } else {
            value
        }
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_status<'de, D>(deserializer: D) -> Result<DossierStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .map(DossierStatus::from)
        .unwrap_or_default())
}

/// Client-side form validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("The dossier number is required")]
    MissingNumero,
}

/// Field of the creation form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Numero,
    Dostype,
    Dosdef,
    Tef,
    BonCaisse,
    MandatPaiement,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Numero,
        FormField::Dostype,
        FormField::Dosdef,
        FormField::Tef,
        FormField::BonCaisse,
        FormField::MandatPaiement,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Numero => "Number",
            FormField::Dostype => "Type",
            FormField::Dosdef => "Dosdef",
            FormField::Tef => "TEF",
            FormField::BonCaisse => "Bon caisse",
            FormField::MandatPaiement => "Mandat paiement",
        }
    }
}

/// Values typed into the creation form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewDossier {
    pub numero: String,
    pub dostype: String,
    pub dosdef: String,
    pub tef: String,
    pub bon_caisse: String,
    pub mandat_paiement: String,
}

impl NewDossier {
    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Numero => &self.numero,
            FormField::Dostype => &self.dostype,
            FormField::Dosdef => &self.dosdef,
            FormField::Tef => &self.tef,
            FormField::BonCaisse => &self.bon_caisse,
            FormField::MandatPaiement => &self.mandat_paiement,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Numero => &mut self.numero,
            FormField::Dostype => &mut self.dostype,
            FormField::Dosdef => &mut self.dosdef,
            FormField::Tef => &mut self.tef,
            FormField::BonCaisse => &mut self.bon_caisse,
            FormField::MandatPaiement => &mut self.mandat_paiement,
        }
    }

    /// The number is the only mandatory field
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.numero.trim().is_empty() {
            return Err(ValidationError::MissingNumero);
        }
        Ok(())
    }

    /// Done when every field is filled in, pending otherwise
    pub fn status(&self) -> DossierStatus {
        let complete = FormField::ALL
            .iter()
            .all(|field| !self.field(*field).trim().is_empty());

        if complete {
            DossierStatus::Done
        } else {
            DossierStatus::Pending
        }
    }

    /// Payload for `POST /api/dossiers/`, owned by `responsable`
    pub fn to_request(&self, responsable: &str) -> CreateDossierRequest {
        CreateDossierRequest {
            numero: self.numero.trim().to_string(),
            dostype: self.dostype.trim().to_string(),
            dosdef: self.dosdef.trim().to_string(),
            tef: self.tef.trim().to_string(),
            bon_caisse: self.bon_caisse.trim().to_string(),
            mandat_paiement: self.mandat_paiement.trim().to_string(),
            responsable: responsable.to_string(),
            statut: self.status(),
        }
    }
}

/// Body sent when creating a dossier
#[derive(Debug, Clone, Serialize)]
pub struct CreateDossierRequest {
    pub numero: String,
    pub dostype: String,
    pub dosdef: String,
    pub tef: String,
    pub bon_caisse: String,
    pub mandat_paiement: String,
    pub responsable: String,
    pub statut: DossierStatus,
}
