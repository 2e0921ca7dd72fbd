//! Database repository for CRUD operations.
//!
//! Uses prepared statements and transactions for data integrity.

use chrono::{NaiveDate, Utc};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    Adoption, AdoptionRecord, CreatePetRequest, Pet, PetGender, PetSize, PetType, Session, User,
};

/// User fields persisted at signup, with the password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub phone: Option<String>,
    pub birth_date: NaiveDate,
}

/// Adopter fields persisted when a pet is marked adopted, CPF already normalized.
#[derive(Debug, Clone)]
pub struct NewAdoption {
    pub adopter_name: String,
    pub adopter_cpf: String,
    pub adopter_phone: String,
    pub adoption_date: NaiveDate,
}

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== USER OPERATIONS ====================

    /// Create a new user.
    pub async fn create_user(&self, new_user: &NewUser) -> Result<User, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, name, cpf, phone, birth_date, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.name)
        .bind(&new_user.cpf)
        .bind(&new_user.phone)
        .bind(new_user.birth_date)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(User {
            id,
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            name: new_user.name.clone(),
            cpf: new_user.cpf.clone(),
            phone: new_user.phone.clone(),
            birth_date: new_user.birth_date,
            created_at: now,
        })
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, name, cpf, phone, birth_date, created_at FROM users WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Get a user by email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, name, cpf, phone, birth_date, created_at FROM users WHERE email = ?"
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    // ==================== ROLE OPERATIONS ====================

    /// Grant a role to a user. Granting an already-held role is a no-op.
    pub async fn add_role(&self, user_id: &str, role: &str) -> Result<(), AppError> {
        sqlx::query("INSERT OR IGNORE INTO user_roles (user_id, role) VALUES (?, ?)")
            .bind(user_id)
            .bind(role)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List the roles held by a user.
    pub async fn list_roles(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        let rows = sqlx::query("SELECT role FROM user_roles WHERE user_id = ? ORDER BY role")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|row| row.get("role")).collect())
    }

    // ==================== SESSION OPERATIONS ====================

    /// Persist a new session.
    pub async fn insert_session(&self, session: &Session) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO sessions (id, secret, user_id, created_at, expires_at) VALUES (?, ?, ?, ?, ?)"
        )
        .bind(&session.id)
        .bind(&session.secret)
        .bind(&session.user_id)
        .bind(&session.created_at)
        .bind(&session.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a session by ID.
    pub async fn get_session(&self, id: &str) -> Result<Option<Session>, AppError> {
        let row = sqlx::query(
            "SELECT id, secret, user_id, created_at, expires_at FROM sessions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Session {
            id: row.get("id"),
            secret: row.get("secret"),
            user_id: row.get("user_id"),
            created_at: row.get("created_at"),
            expires_at: row.get("expires_at"),
        }))
    }

    /// Delete a session. Deleting an absent session is a no-op.
    pub async fn delete_session(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // ==================== PET OPERATIONS ====================

    /// List all pets, most recently registered first.
    pub async fn list_pets(&self) -> Result<Vec<Pet>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, name, type, breed, age, gender, size, vaccinated, neutered,
                      description, history, image, address, adopted, created_at
               FROM pets ORDER BY created_at DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(pet_from_row).collect())
    }

    /// Get a pet by ID.
    pub async fn get_pet(&self, id: &str) -> Result<Option<Pet>, AppError> {
        let row = sqlx::query(
            r#"SELECT id, name, type, breed, age, gender, size, vaccinated, neutered,
                      description, history, image, address, adopted, created_at
               FROM pets WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(pet_from_row))
    }

    /// Register a new pet, available for adoption.
    pub async fn create_pet(&self, request: &CreatePetRequest) -> Result<Pet, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO pets (
                id, name, type, breed, age, gender, size, vaccinated, neutered,
                description, history, image, address, adopted, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?)"#,
        )
        .bind(&id)
        .bind(&request.name)
        .bind(request.pet_type.as_str())
        .bind(&request.breed)
        .bind(&request.age)
        .bind(request.gender.as_str())
        .bind(request.size.as_str())
        .bind(request.vaccinated as i32)
        .bind(request.neutered as i32)
        .bind(&request.description)
        .bind(&request.history)
        .bind(&request.image)
        .bind(&request.address)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Pet {
            id,
            name: request.name.clone(),
            pet_type: request.pet_type,
            breed: request.breed.clone(),
            age: request.age.clone(),
            gender: request.gender,
            size: request.size,
            vaccinated: request.vaccinated,
            neutered: request.neutered,
            description: request.description.clone(),
            history: request.history.clone(),
            image: request.image.clone(),
            address: request.address.clone(),
            adopted: false,
            created_at: now,
        })
    }

    /// Record an adoption and mark the pet adopted.
    ///
    /// Both writes happen in one transaction so an adoption record can never
    /// reference a pet still marked available.
    pub async fn adopt_pet(
        &self,
        pet_id: &str,
        adopter: &NewAdoption,
    ) -> Result<Adoption, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT adopted FROM pets WHERE id = ?")
            .bind(pet_id)
            .fetch_optional(&mut *tx)
            .await?;

        let adopted: i32 = match row {
            Some(row) => row.get("adopted"),
            None => return Err(AppError::NotFound(format!("Pet {} not found", pet_id))),
        };
        if adopted != 0 {
            return Err(AppError::Conflict(format!(
                "Pet {} is already adopted",
                pet_id
            )));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO adoptions (id, pet_id, adopter_name, adopter_cpf, adopter_phone, adoption_date, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(pet_id)
        .bind(&adopter.adopter_name)
        .bind(&adopter.adopter_cpf)
        .bind(&adopter.adopter_phone)
        .bind(adopter.adoption_date)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE pets SET adopted = 1 WHERE id = ?")
            .bind(pet_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Adoption {
            id,
            pet_id: pet_id.to_string(),
            adopter_name: adopter.adopter_name.clone(),
            adopter_cpf: adopter.adopter_cpf.clone(),
            adopter_phone: adopter.adopter_phone.clone(),
            adoption_date: adopter.adoption_date,
            created_at: now,
        })
    }

    /// Mark a pet available again. Idempotent; prior adoption records are kept.
    pub async fn set_pet_available(&self, pet_id: &str) -> Result<Pet, AppError> {
        let result = sqlx::query("UPDATE pets SET adopted = 0 WHERE id = ?")
            .bind(pet_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Pet {} not found", pet_id)));
        }

        self.get_pet(pet_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Pet {} not found", pet_id)))
    }

    // ==================== ADOPTION OPERATIONS ====================

    /// List all adoption records with the referenced pet's name, newest first.
    pub async fn list_adoptions(&self) -> Result<Vec<AdoptionRecord>, AppError> {
        let rows = sqlx::query(
            r#"SELECT a.id, a.pet_id, a.adopter_name, a.adopter_cpf, a.adopter_phone,
                      a.adoption_date, a.created_at, p.name AS pet_name
               FROM adoptions a
               JOIN pets p ON p.id = a.pet_id
               ORDER BY a.created_at DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| AdoptionRecord {
                adoption: adoption_from_row(row),
                pet_name: row.get("pet_name"),
            })
            .collect())
    }

    // ==================== SETTING OPERATIONS ====================

    /// Get a persisted setting value.
    pub async fn get_setting(&self, key: &str) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get("value")))
    }

    /// Store a setting value, replacing any previous one.
    pub async fn set_setting(&self, key: &str, value: &str) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value"
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// Helper functions for row conversion

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        name: row.get("name"),
        cpf: row.get("cpf"),
        phone: row.get("phone"),
        birth_date: row.get("birth_date"),
        created_at: row.get("created_at"),
    }
}

fn pet_from_row(row: &sqlx::sqlite::SqliteRow) -> Pet {
    let vaccinated: i32 = row.get("vaccinated");
    let neutered: i32 = row.get("neutered");
    let adopted: i32 = row.get("adopted");
    let type_str: String = row.get("type");
    let gender_str: String = row.get("gender");
    let size_str: String = row.get("size");

    Pet {
        id: row.get("id"),
        name: row.get("name"),
        pet_type: PetType::from_str(&type_str).unwrap_or(PetType::Dog),
        breed: row.get("breed"),
        age: row.get("age"),
        gender: PetGender::from_str(&gender_str).unwrap_or(PetGender::Male),
        size: PetSize::from_str(&size_str).unwrap_or(PetSize::Medium),
        vaccinated: vaccinated != 0,
        neutered: neutered != 0,
        description: row.get("description"),
        history: row.get("history"),
        image: row.get("image"),
        address: row.get("address"),
        adopted: adopted != 0,
        created_at: row.get("created_at"),
    }
}

fn adoption_from_row(row: &sqlx::sqlite::SqliteRow) -> Adoption {
    Adoption {
        id: row.get("id"),
        pet_id: row.get("pet_id"),
        adopter_name: row.get("adopter_name"),
        adopter_cpf: row.get("adopter_cpf"),
        adopter_phone: row.get("adopter_phone"),
        adoption_date: row.get("adoption_date"),
        created_at: row.get("created_at"),
    }
}
