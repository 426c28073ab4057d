use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres};

use crate::common::pagination::Page;

/// SellEnquiry - a property an owner wants to sell or rent out
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SellEnquiry {
    pub id: i64,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub fields: SellEnquiryFields,
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The editable columns of an enquiry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SellEnquiryFields {
    pub property_type: String,
    pub property_sub_type: String,
    pub transaction_type: String,
    pub property_name: String,
    pub location: String,
    pub price: f64,
    pub description: String,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: f64,
    pub furnishing_status: Option<String>,
    pub floor_number: Option<i32>,
    pub total_floors: Option<i32>,
    pub availability_status: String,
    pub available_from: Option<NaiveDate>,
    pub parking_availability: Option<String>,
    pub parking_type: Option<String>,
    pub facing_direction: Option<String>,
    pub age_of_property: Option<String>,
    pub plot_length: Option<f64>,
    pub plot_width: Option<f64>,
    pub plot_unit: Option<String>,
    pub road_width: Option<f64>,
    pub road_unit: Option<String>,
    pub ownership_type: Option<String>,
    pub registry_available: Option<bool>,
    pub rera_id: Option<String>,
    pub tax_paid_upto: Option<String>,
    pub water_supply: Option<String>,
    pub electricity_available: Option<bool>,
    pub sewage_available: Option<String>,
    pub road_connectivity: Option<String>,
    pub suitable_for: Option<String>,
    pub nearby_landmarks: Json<Vec<serde_json::Value>>,
    pub amenities: Json<Vec<serde_json::Value>>,
    pub nearby_facilities: Option<String>,
    pub seller_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub property_images: Json<Vec<String>>,
    pub document: Option<String>,
    pub verification_docs: Json<Vec<String>>,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_mobile: String,
}

impl SellEnquiryFields {
    /// Every stored attachment path.
    pub fn attachments(&self) -> Vec<String> {
        self.property_images
            .iter()
            .chain(self.document.iter())
            .chain(self.verification_docs.iter())
            .cloned()
            .collect()
    }
}

type EnquiryQuery<'q> = QueryAs<'q, Postgres, SellEnquiry, PgArguments>;

/// Bind the editable columns in table order.
fn bind_fields<'q>(query: EnquiryQuery<'q>, f: &'q SellEnquiryFields) -> EnquiryQuery<'q> {
    query
        .bind(&f.property_type)
        .bind(&f.property_sub_type)
        .bind(&f.transaction_type)
        .bind(&f.property_name)
        .bind(&f.location)
        .bind(f.price)
        .bind(&f.description)
        .bind(f.bedrooms)
        .bind(f.bathrooms)
        .bind(f.area)
        .bind(&f.furnishing_status)
        .bind(f.floor_number)
        .bind(f.total_floors)
        .bind(&f.availability_status)
        .bind(f.available_from)
        .bind(&f.parking_availability)
        .bind(&f.parking_type)
        .bind(&f.facing_direction)
        .bind(&f.age_of_property)
        .bind(f.plot_length)
        .bind(f.plot_width)
        .bind(&f.plot_unit)
        .bind(f.road_width)
        .bind(&f.road_unit)
        .bind(&f.ownership_type)
        .bind(f.registry_available)
        .bind(&f.rera_id)
        .bind(&f.tax_paid_upto)
        .bind(&f.water_supply)
        .bind(f.electricity_available)
        .bind(&f.sewage_available)
        .bind(&f.road_connectivity)
        .bind(&f.suitable_for)
        .bind(&f.nearby_landmarks)
        .bind(&f.amenities)
        .bind(&f.nearby_facilities)
        .bind(&f.seller_type)
        .bind(f.latitude)
        .bind(f.longitude)
        .bind(&f.property_images)
        .bind(&f.document)
        .bind(&f.verification_docs)
        .bind(&f.contact_name)
        .bind(&f.contact_email)
        .bind(&f.contact_mobile)
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl SellEnquiry {
    pub async fn create(
        fields: &SellEnquiryFields,
        user_id: Option<i64>,
        pool: &PgPool,
    ) -> Result<Self> {
        let query = sqlx::query_as::<_, SellEnquiry>(
            r#"
            INSERT INTO sell_enquiries (
                property_type, property_sub_type, transaction_type, property_name, location,
                price, description, bedrooms, bathrooms, area,
                furnishing_status, floor_number, total_floors, availability_status, available_from,
                parking_availability, parking_type, facing_direction, age_of_property, plot_length,
                plot_width, plot_unit, road_width, road_unit, ownership_type,
                registry_available, rera_id, tax_paid_upto, water_supply, electricity_available,
                sewage_available, road_connectivity, suitable_for, nearby_landmarks, amenities,
                nearby_facilities, seller_type, latitude, longitude, property_images,
                document, verification_docs, contact_name, contact_email, contact_mobile,
                user_id
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20,
                $21, $22, $23, $24, $25, $26, $27, $28, $29, $30,
                $31, $32, $33, $34, $35, $36, $37, $38, $39, $40,
                $41, $42, $43, $44, $45, $46
            )
            RETURNING *
            "#,
        );
        let enquiry = bind_fields(query, fields)
            .bind(user_id)
            .fetch_one(pool)
            .await?;
        Ok(enquiry)
    }

    pub async fn find_by_id(id: i64, pool: &PgPool) -> Result<Option<Self>> {
        let enquiry =
            sqlx::query_as::<_, SellEnquiry>("SELECT * FROM sell_enquiries WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(enquiry)
    }

    /// Newest first
    pub async fn find_page(page: Page, pool: &PgPool) -> Result<Vec<Self>> {
        let enquiries = sqlx::query_as::<_, SellEnquiry>(
            "SELECT * FROM sell_enquiries ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(pool)
        .await?;
        Ok(enquiries)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sell_enquiries")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Overwrite every editable column of enquiry `id`.
    pub async fn update(id: i64, fields: &SellEnquiryFields, pool: &PgPool) -> Result<Option<Self>> {
        let query = sqlx::query_as::<_, SellEnquiry>(
            r#"
            UPDATE sell_enquiries
            SET
                property_type = $2,
                property_sub_type = $3,
                transaction_type = $4,
                property_name = $5,
                location = $6,
                price = $7,
                description = $8,
                bedrooms = $9,
                bathrooms = $10,
                area = $11,
                furnishing_status = $12,
                floor_number = $13,
                total_floors = $14,
                availability_status = $15,
                available_from = $16,
                parking_availability = $17,
                parking_type = $18,
                facing_direction = $19,
                age_of_property = $20,
                plot_length = $21,
                plot_width = $22,
                plot_unit = $23,
                road_width = $24,
                road_unit = $25,
                ownership_type = $26,
                registry_available = $27,
                rera_id = $28,
                tax_paid_upto = $29,
                water_supply = $30,
                electricity_available = $31,
                sewage_available = $32,
                road_connectivity = $33,
                suitable_for = $34,
                nearby_landmarks = $35,
                amenities = $36,
                nearby_facilities = $37,
                seller_type = $38,
                latitude = $39,
                longitude = $40,
                property_images = $41,
                document = $42,
                verification_docs = $43,
                contact_name = $44,
                contact_email = $45,
                contact_mobile = $46,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        );
        let enquiry = bind_fields(query.bind(id), fields)
            .fetch_optional(pool)
            .await?;
        Ok(enquiry)
    }

    pub async fn delete(id: i64, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sell_enquiries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
