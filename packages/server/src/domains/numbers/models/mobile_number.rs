use anyhow::Result;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use sqlx::PgPool;

/// Seeded by the test-number endpoint.
pub const TEST_NUMBER: &str = "1234567890";

lazy_static! {
    static ref TEN_DIGITS: Regex = Regex::new(r"^[0-9]{10}$").unwrap();
}

/// MobileNumber - an entry in the marketing phone list
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MobileNumber {
    pub id: i64,
    pub number: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Trimmed number if it is exactly ten digits.
pub fn parse_number(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    TEN_DIGITS.is_match(trimmed).then_some(trimmed)
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl MobileNumber {
    pub async fn create(number: &str, pool: &PgPool) -> Result<Self> {
        let row = sqlx::query_as::<_, MobileNumber>(
            "INSERT INTO mobile_numbers (number) VALUES ($1) RETURNING *",
        )
        .bind(number)
        .fetch_one(pool)
        .await?;
        Ok(row)
    }

    /// Numbers not flagged as deleted, oldest first
    pub async fn find_active(pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, MobileNumber>(
            "SELECT * FROM mobile_numbers WHERE is_deleted = false ORDER BY id",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn exists_active(number: &str, pool: &PgPool) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM mobile_numbers WHERE number = $1 AND is_deleted = false)",
        )
        .bind(number)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    pub async fn delete(id: i64, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM mobile_numbers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_all(pool: &PgPool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM mobile_numbers")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
