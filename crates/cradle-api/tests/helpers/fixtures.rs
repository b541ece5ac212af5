use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use uuid::Uuid;

/// 1x1 transparent PNG as a data URI.
pub const PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

pub const CSV_DATA_URI: &str = "data:text/csv;base64,cmVnaW9uLHNhbGVzCm5vcnRoLDEyCnNvdXRoLDc=";

pub const TEST_PASSWORD: &str = "Passw0rd!";

/// A data URI whose decoded payload is `size` bytes.
pub fn csv_of_size(size: usize) -> String {
    format!("data:text/csv;base64,{}", STANDARD.encode(vec![b'a'; size]))
}

pub fn sign_up_body(email: &str) -> Value {
    json!({
        "business_name": "Acme Analytics",
        "contact_name": "Jordan Lee",
        "contact_number": "+1 555-0100",
        "business_address": "1 Market Street",
        "business_city": "Springfield",
        "business_state": "IL",
        "business_country": "US",
        "sector": "Retail",
        "organization_size": "11-50",
        "email": email,
        "password": TEST_PASSWORD,
    })
}

pub fn sub_user_body(email: &str) -> Value {
    json!({
        "first_name": "Sam",
        "last_name": "Rivera",
        "department": "Finance",
        "email": email,
        "password": TEST_PASSWORD,
        "user_img": PNG_DATA_URI,
    })
}

pub fn request_body(category_id: Uuid, request_type_id: Uuid) -> Value {
    json!({
        "category_id": category_id,
        "request_type_id": request_type_id,
        "data_title": "Quarterly sales",
        "data_description": "Sales by region for Q3",
        "data_type": "csv",
        "data_consent": 1,
        "data_file": CSV_DATA_URI,
    })
}
