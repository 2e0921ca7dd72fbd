//! Adoption record models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A persisted link between a pet and the person who adopted it.
///
/// Records outlive the pet's `adopted` flag: reverting a pet to available
/// keeps the historical record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adoption {
    pub id: String,
    pub pet_id: String,
    pub adopter_name: String,
    pub adopter_cpf: String,
    pub adopter_phone: String,
    pub adoption_date: NaiveDate,
    pub created_at: String,
}

/// Request body for recording an adoption.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdoptionRequest {
    pub adopter_name: String,
    pub adopter_cpf: String,
    pub adopter_phone: String,
    /// Defaults to today when omitted.
    #[serde(default)]
    pub adoption_date: Option<NaiveDate>,
}

/// Adoption record joined with the pet it references, for the admin listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionRecord {
    #[serde(flatten)]
    pub adoption: Adoption,
    pub pet_name: String,
}
