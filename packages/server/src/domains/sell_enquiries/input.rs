//! Parsing of sell-enquiry form fields.
//!
//! Multipart forms deliver every value as text. Each field is trimmed; blank
//! values count as absent. Numbers and dates that fail to parse are reported
//! per field.

use chrono::NaiveDate;
use serde_json::Value;
use sqlx::types::Json;
use std::collections::HashMap;
use std::str::FromStr;

use super::models::SellEnquiryFields;
use super::sanitize::strip_html;
use crate::common::FieldError;

pub const INVALID_JSON_MESSAGE: &str =
    "Invalid format for amenities or nearby landmarks. Please provide valid JSON.";

#[derive(Debug, PartialEq)]
pub enum InputError {
    /// `amenities` or `nearbyLandmarks` was not a JSON array.
    InvalidJson,
    Fields(Vec<FieldError>),
}

/// Submitted enquiry values; `None` means the field was not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SellEnquiryInput {
    pub property_type: Option<String>,
    pub property_sub_type: Option<String>,
    pub transaction_type: Option<String>,
    pub property_name: Option<String>,
    pub location: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: Option<f64>,
    pub furnishing_status: Option<String>,
    pub floor_number: Option<i32>,
    pub total_floors: Option<i32>,
    pub availability_status: Option<String>,
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
    /// Checkbox semantics: anything other than "true" is false.
    pub registry_available: bool,
    pub rera_id: Option<String>,
    pub tax_paid_upto: Option<String>,
    pub water_supply: Option<String>,
    pub electricity_available: bool,
    pub sewage_available: Option<String>,
    pub road_connectivity: Option<String>,
    pub suitable_for: Option<String>,
    pub nearby_landmarks: Option<Vec<Value>>,
    pub amenities: Option<Vec<Value>>,
    pub nearby_facilities: Option<String>,
    pub seller_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_mobile: Option<String>,
}

struct FieldReader<'a> {
    fields: &'a HashMap<String, String>,
    errors: Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(String::from)
    }

    fn parsed<T: FromStr>(&mut self, name: &str, message: &str) -> Option<T> {
        let raw = self.text(name)?;
        match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                self.errors.push(FieldError::new(name, message));
                None
            }
        }
    }

    fn number(&mut self, name: &str) -> Option<f64> {
        self.parsed::<f64>(name, "Must be a number")
            .filter(|n| n.is_finite())
    }

    fn integer(&mut self, name: &str) -> Option<i32> {
        self.parsed::<i32>(name, "Must be a whole number")
    }

    fn date(&mut self, name: &str) -> Option<NaiveDate> {
        let raw = self.text(name)?;
        match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                self.errors
                    .push(FieldError::new(name, "Date must be in YYYY-MM-DD format"));
                None
            }
        }
    }

    fn flag(&self, name: &str) -> bool {
        self.text(name).as_deref() == Some("true")
    }

    fn json_array(&self, name: &str) -> Result<Option<Vec<Value>>, InputError> {
        let Some(raw) = self.text(name) else {
            return Ok(None);
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => Ok(Some(items)),
            _ => Err(InputError::InvalidJson),
        }
    }
}

impl SellEnquiryInput {
    /// Parse camelCase form fields.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, InputError> {
        let mut r = FieldReader {
            fields,
            errors: Vec::new(),
        };

        let amenities = r.json_array("amenities")?;
        let nearby_landmarks = r.json_array("nearbyLandmarks")?;

        let input = Self {
            property_type: r.text("propertyType"),
            property_sub_type: r.text("propertySubType"),
            transaction_type: r.text("transactionType"),
            property_name: r.text("propertyName"),
            location: r.text("location"),
            price: r.number("price"),
            description: r.text("description").map(|d| strip_html(&d)),
            bedrooms: r.integer("bedrooms"),
            bathrooms: r.integer("bathrooms"),
            area: r.number("area"),
            furnishing_status: r.text("furnishingStatus"),
            floor_number: r.integer("floorNumber"),
            total_floors: r.integer("totalFloors"),
            availability_status: r.text("availabilityStatus"),
            available_from: r.date("availableFrom"),
            parking_availability: r.text("parkingAvailability"),
            parking_type: r.text("parkingType"),
            facing_direction: r.text("facingDirection"),
            age_of_property: r.text("ageOfProperty"),
            plot_length: r.number("plotLength"),
            plot_width: r.number("plotWidth"),
            plot_unit: r.text("plotUnit"),
            road_width: r.number("roadWidth"),
            road_unit: r.text("roadUnit"),
            ownership_type: r.text("ownershipType"),
            registry_available: r.flag("registryAvailable"),
            rera_id: r.text("reraId"),
            tax_paid_upto: r.text("taxPaidUpto"),
            water_supply: r.text("waterSupply"),
            electricity_available: r.flag("electricityAvailable"),
            sewage_available: r.text("sewageAvailable"),
            road_connectivity: r.text("roadConnectivity"),
            suitable_for: r.text("suitableFor"),
            nearby_landmarks,
            amenities,
            nearby_facilities: r
                .text("nearbyFacilities")
                .map(|f| strip_html(&f))
                .filter(|f| !f.is_empty()),
            seller_type: r.text("sellerType"),
            latitude: r.number("latitude"),
            longitude: r.number("longitude"),
            contact_name: r.text("contactName"),
            contact_email: r.text("contactEmail"),
            contact_mobile: r.text("contactMobile"),
        };

        if r.errors.is_empty() {
            Ok(input)
        } else {
            Err(InputError::Fields(r.errors))
        }
    }

    /// Column values for a new enquiry. Missing required values stay empty
    /// (or zero) so validation reports them.
    pub fn into_new_fields(self) -> SellEnquiryFields {
        let mut fields = SellEnquiryFields::default();
        self.apply_to(&mut fields);
        fields
    }

    /// Overwrite the columns this input carries. Booleans are always written.
    pub fn apply_to(self, f: &mut SellEnquiryFields) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }
        fn set_opt<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        set(&mut f.property_type, self.property_type);
        set(&mut f.property_sub_type, self.property_sub_type);
        set(&mut f.transaction_type, self.transaction_type);
        set(&mut f.property_name, self.property_name);
        set(&mut f.location, self.location);
        set(&mut f.price, self.price);
        set(&mut f.description, self.description);
        set_opt(&mut f.bedrooms, self.bedrooms);
        set_opt(&mut f.bathrooms, self.bathrooms);
        set(&mut f.area, self.area);
        set_opt(&mut f.furnishing_status, self.furnishing_status);
        set_opt(&mut f.floor_number, self.floor_number);
        set_opt(&mut f.total_floors, self.total_floors);
        set(&mut f.availability_status, self.availability_status);
        set_opt(&mut f.available_from, self.available_from);
        set_opt(&mut f.parking_availability, self.parking_availability);
        set_opt(&mut f.parking_type, self.parking_type);
        set_opt(&mut f.facing_direction, self.facing_direction);
        set_opt(&mut f.age_of_property, self.age_of_property);
        set_opt(&mut f.plot_length, self.plot_length);
        set_opt(&mut f.plot_width, self.plot_width);
        set_opt(&mut f.plot_unit, self.plot_unit);
        set_opt(&mut f.road_width, self.road_width);
        set_opt(&mut f.road_unit, self.road_unit);
        set_opt(&mut f.ownership_type, self.ownership_type);
        f.registry_available = Some(self.registry_available);
        set_opt(&mut f.rera_id, self.rera_id);
        set_opt(&mut f.tax_paid_upto, self.tax_paid_upto);
        set_opt(&mut f.water_supply, self.water_supply);
        f.electricity_available = Some(self.electricity_available);
        set_opt(&mut f.sewage_available, self.sewage_available);
        set_opt(&mut f.road_connectivity, self.road_connectivity);
        set_opt(&mut f.suitable_for, self.suitable_for);
        set(&mut f.nearby_landmarks, self.nearby_landmarks.map(Json));
        set(&mut f.amenities, self.amenities.map(Json));
        set_opt(&mut f.nearby_facilities, self.nearby_facilities);
        set_opt(&mut f.seller_type, self.seller_type);
        set_opt(&mut f.latitude, self.latitude);
        set_opt(&mut f.longitude, self.longitude);
        set(&mut f.contact_name, self.contact_name);
        set(&mut f.contact_email, self.contact_email);
        set(&mut f.contact_mobile, self.contact_mobile);
    }
}
