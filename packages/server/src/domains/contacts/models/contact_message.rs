use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// ContactMessage - a submission from the public contact form
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub other_subject: Option<String>,
    pub comments: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Contact form body. Used for both create and update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub other_subject: Option<String>,
    pub comments: Option<String>,
}

impl ContactInput {
    /// Name, email and comments must be present and non-blank.
    pub fn has_required(&self) -> bool {
        [&self.name, &self.email, &self.comments]
            .iter()
            .all(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl ContactMessage {
    pub async fn create(input: &ContactInput, pool: &PgPool) -> Result<Self> {
        let contact = sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (name, email, phone, subject, other_subject, comments)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.subject)
        .bind(&input.other_subject)
        .bind(&input.comments)
        .fetch_one(pool)
        .await?;
        Ok(contact)
    }

    pub async fn find_by_id(id: i64, pool: &PgPool) -> Result<Option<Self>> {
        let contact =
            sqlx::query_as::<_, ContactMessage>("SELECT * FROM contact_messages WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(contact)
    }

    /// Newest first
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let contacts = sqlx::query_as::<_, ContactMessage>(
            "SELECT * FROM contact_messages ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(contacts)
    }

    /// Overwrite the fields present in `input`; absent fields keep their value.
    pub async fn update(id: i64, input: &ContactInput, pool: &PgPool) -> Result<Option<Self>> {
        let contact = sqlx::query_as::<_, ContactMessage>(
            r#"
            UPDATE contact_messages
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                subject = COALESCE($5, subject),
                other_subject = COALESCE($6, other_subject),
                comments = COALESCE($7, comments),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.subject)
        .bind(&input.other_subject)
        .bind(&input.comments)
        .fetch_optional(pool)
        .await?;
        Ok(contact)
    }

    /// Returns the number of rows deleted (0 or 1).
    pub async fn delete(id: i64, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_required() {
        let mut input = ContactInput {
            name: Some("Ravi".into()),
            email: Some("ravi@example.com".into()),
            comments: Some("Interested in plot 12".into()),
            ..Default::default()
        };
        assert!(input.has_required());

        input.comments = Some("   ".into());
        assert!(!input.has_required());

        input.comments = None;
        assert!(!input.has_required());
    }
}
