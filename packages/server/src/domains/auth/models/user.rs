use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

/// User - a person who signed up by phone OTP or Google sign-in
///
/// `phone_number` is the primary login key for OTP users and is unique when
/// present. Users created through Google have no phone until they add one.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    #[serde(skip_serializing)]
    pub google_id: Option<String>,
    pub profile_photo: Option<String>,
    pub is_phone_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a new user row.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub google_id: Option<String>,
    pub profile_photo: Option<String>,
    pub is_phone_verified: bool,
}

/// The user shape returned by the auth endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub profile_photo: Option<String>,
    pub is_phone_verified: bool,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            profile_photo: user.profile_photo.clone(),
            is_phone_verified: user.is_phone_verified,
        }
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl User {
    pub async fn find_by_id(id: i64, pool: &PgPool) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_phone(phone_number: &str, pool: &PgPool) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE phone_number = $1")
            .bind(phone_number)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_email(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_google_id(google_id: &str, pool: &PgPool) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE google_id = $1")
            .bind(google_id)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
            .fetch_all(pool)
            .await?;
        Ok(users)
    }

    pub async fn count_by_phone(phone_number: &str, pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE phone_number = $1",
        )
        .bind(phone_number)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    pub async fn create(new: NewUser, pool: &PgPool) -> Result<Self> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, phone_number, google_id, profile_photo, is_phone_verified)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(new.username)
        .bind(new.email)
        .bind(new.phone_number)
        .bind(new.google_id)
        .bind(new.profile_photo)
        .bind(new.is_phone_verified)
        .fetch_one(pool)
        .await?;
        Ok(user)
    }

    /// Find the user for a phone, creating an unverified one if absent.
    ///
    /// Concurrent first requests for the same phone resolve to one row.
    pub async fn find_or_create_by_phone(phone_number: &str, pool: &PgPool) -> Result<Self> {
        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (phone_number, is_phone_verified)
            VALUES ($1, false)
            ON CONFLICT (phone_number) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(phone_number)
        .fetch_optional(pool)
        .await?;

        if let Some(user) = inserted {
            return Ok(user);
        }

        Self::find_by_phone(phone_number, pool)
            .await?
            .ok_or_else(|| anyhow::anyhow!("user for {} vanished after conflict", phone_number))
    }

    /// Persist every mutable column of this user.
    pub async fn save(&self, pool: &PgPool) -> Result<Self> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $2,
                email = $3,
                phone_number = $4,
                google_id = $5,
                profile_photo = $6,
                is_phone_verified = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(&self.username)
        .bind(&self.email)
        .bind(&self.phone_number)
        .bind(&self.google_id)
        .bind(&self.profile_photo)
        .bind(self.is_phone_verified)
        .fetch_one(pool)
        .await?;
        Ok(user)
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile::from(self)
    }
}
