//! Pet catalog and admin pet-management endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::db::NewAdoption;
use crate::errors::AppError;
use crate::models::{
    filter_pets, Adoption, CreateAdoptionRequest, CreatePetRequest, Pet, PetFilter, PetSize,
    PetType,
};
use crate::validation;
use crate::AppState;

/// Catalog query parameters. `"all"` (or omission) disables a criterion.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    #[serde(rename = "type")]
    pub pet_type: Option<String>,
    pub size: Option<String>,
    pub vaccinated: Option<bool>,
    pub neutered: Option<bool>,
    /// When true, pets already adopted are excluded.
    pub available: Option<bool>,
}

impl CatalogQuery {
    fn into_filter(self) -> Result<PetFilter, AppError> {
        let pet_type = match self.pet_type.as_deref() {
            None | Some("all") => None,
            Some(s) => Some(
                PetType::from_str(s)
                    .ok_or_else(|| AppError::Validation(format!("Unknown pet type: {}", s)))?,
            ),
        };
        let size = match self.size.as_deref() {
            None | Some("all") => None,
            Some(s) => Some(
                PetSize::from_str(s)
                    .ok_or_else(|| AppError::Validation(format!("Unknown pet size: {}", s)))?,
            ),
        };

        Ok(PetFilter {
            pet_type,
            size,
            vaccinated: self.vaccinated,
            neutered: self.neutered,
            available_only: self.available.unwrap_or(false),
        })
    }
}

/// GET /api/pets - List pets, most recent first, filtered in memory.
pub async fn list_pets(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> ApiResult<Vec<Pet>> {
    let filter = query.into_filter()?;
    let pets = state.repo.list_pets().await?;
    success(filter_pets(&pets, &filter))
}

/// GET /api/pets/:id - Get a single pet.
pub async fn get_pet(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Pet> {
    match state.repo.get_pet(&id).await? {
        Some(pet) => success(pet),
        None => Err(AppError::NotFound(format!("Pet {} not found", id))),
    }
}

/// WhatsApp deep link for scheduling a visit.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitLink {
    pub url: String,
}

/// GET /api/pets/:id/visit-link - Deep link with pre-filled visit message.
pub async fn get_visit_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<VisitLink> {
    let Some(pet) = state.repo.get_pet(&id).await? else {
        return Err(AppError::NotFound(format!("Pet {} not found", id)));
    };

    let message = format!(
        "Olá, gostaria de agendar uma visita para conhecer melhor {}.",
        pet.name
    );
    let url = format!(
        "https://wa.me/{}?text={}",
        state.config.visit_phone,
        urlencoding::encode(&message)
    );

    success(VisitLink { url })
}

/// POST /api/admin/pets - Register a new pet.
pub async fn create_pet(
    State(state): State<AppState>,
    Json(request): Json<CreatePetRequest>,
) -> ApiResult<Pet> {
    // Required text fields, checked at the data layer rather than trusting inputs
    let required = [
        ("Name", &request.name),
        ("Breed", &request.breed),
        ("Age", &request.age),
        ("Description", &request.description),
        ("History", &request.history),
        ("Image", &request.image),
        ("Address", &request.address),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{} is required", field)));
        }
    }

    let pet = state.repo.create_pet(&request).await?;
    tracing::info!("Pet registered: {} ({})", pet.name, pet.id);
    success(pet)
}

/// POST /api/admin/pets/:id/adopt - Record an adoption and mark the pet adopted.
pub async fn adopt_pet(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CreateAdoptionRequest>,
) -> ApiResult<Adoption> {
    if request.adopter_name.trim().is_empty() {
        return Err(AppError::Validation("Adopter name is required".to_string()));
    }
    if request.adopter_phone.trim().is_empty() {
        return Err(AppError::Validation(
            "Adopter phone is required".to_string(),
        ));
    }
    let adopter_cpf = validation::normalize_cpf(&request.adopter_cpf).ok_or_else(|| {
        AppError::Validation("CPF must contain exactly 11 digits".to_string())
    })?;

    let adoption = state
        .repo
        .adopt_pet(
            &id,
            &NewAdoption {
                adopter_name: request.adopter_name.trim().to_string(),
                adopter_cpf,
                adopter_phone: request.adopter_phone.trim().to_string(),
                adoption_date: request
                    .adoption_date
                    .unwrap_or_else(|| Utc::now().date_naive()),
            },
        )
        .await?;

    tracing::info!("Pet {} adopted by {}", id, adoption.adopter_name);
    success(adoption)
}

/// POST /api/admin/pets/:id/available - Mark a pet available again.
pub async fn set_pet_available(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Pet> {
    let pet = state.repo.set_pet_available(&id).await?;
    tracing::info!("Pet {} marked available", id);
    success(pet)
}
