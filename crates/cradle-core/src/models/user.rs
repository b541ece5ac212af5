use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{validate_contact_number, validate_not_blank, validate_password};

/// User role for authorization
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "user_role", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Business,
    User,
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Business => write!(f, "business"),
            UserRole::User => write!(f, "user"),
        }
    }
}

impl FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "business" => Ok(UserRole::Business),
            "user" => Ok(UserRole::User),
            _ => Err(anyhow::anyhow!("Invalid role: {}", s)),
        }
    }
}

/// Persisted user: either a business tenant, one of its sub-users, or an admin.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub business_name: Option<String>,
    pub contact_name: Option<String>,
    pub contact_number: Option<String>,
    pub business_address: Option<String>,
    pub business_city: Option<String>,
    pub business_state: Option<String>,
    pub business_country: Option<String>,
    pub sector: Option<String>,
    pub organization_size: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<String>,
    pub user_img: Option<String>,
    pub business_user_id: Option<Uuid>,
    pub is_verified: bool,
    pub is_active: bool,
    pub otp: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The business a user's data belongs to: a business owns itself, a
    /// sub-user belongs to its creator, admins belong to no tenant.
    pub fn owning_business_id(&self) -> Option<Uuid> {
        match self.role {
            UserRole::Business => Some(self.id),
            UserRole::User => self.business_user_id,
            UserRole::Admin => None,
        }
    }
}

/// User as returned by the API; never carries the hash or OTP.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_img: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_user_id: Option<Uuid>,
    pub is_verified: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            role: user.role,
            business_name: user.business_name,
            contact_name: user.contact_name,
            contact_number: user.contact_number,
            business_address: user.business_address,
            business_city: user.business_city,
            business_state: user.business_state,
            business_country: user.business_country,
            sector: user.sector,
            organization_size: user.organization_size,
            first_name: user.first_name,
            last_name: user.last_name,
            department: user.department,
            user_img: user.user_img,
            business_user_id: user.business_user_id,
            is_verified: user.is_verified,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Values for inserting a user row. Id and timestamps are assigned by the repository.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub business_name: Option<String>,
    pub contact_name: Option<String>,
    pub contact_number: Option<String>,
    pub business_address: Option<String>,
    pub business_city: Option<String>,
    pub business_state: Option<String>,
    pub business_country: Option<String>,
    pub sector: Option<String>,
    pub organization_size: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<String>,
    pub user_img: Option<String>,
    pub business_user_id: Option<Uuid>,
    pub is_verified: bool,
    pub is_active: bool,
    pub otp: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,
}

impl NewUser {
    /// A verified, active account with only the credentials filled in.
    pub fn with_credentials(email: String, password_hash: String, role: UserRole) -> Self {
        NewUser {
            email,
            password_hash,
            role,
            business_name: None,
            contact_name: None,
            contact_number: None,
            business_address: None,
            business_city: None,
            business_state: None,
            business_country: None,
            sector: None,
            organization_size: None,
            first_name: None,
            last_name: None,
            department: None,
            user_img: None,
            business_user_id: None,
            is_verified: true,
            is_active: true,
            otp: None,
            otp_expires_at: None,
        }
    }
}

/// Field-by-field partial update of a user. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub password_hash: Option<String>,
    pub business_name: Option<String>,
    pub contact_name: Option<String>,
    pub contact_number: Option<String>,
    pub business_address: Option<String>,
    pub business_city: Option<String>,
    pub business_state: Option<String>,
    pub business_country: Option<String>,
    pub sector: Option<String>,
    pub organization_size: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<String>,
    pub user_img: Option<String>,
    pub is_active: Option<bool>,
}

impl UserPatch {
    pub fn apply(self, user: &mut User) {
        if let Some(v) = self.password_hash {
            user.password_hash = v;
        }
        if let Some(v) = self.business_name {
            user.business_name = Some(v);
        }
        if let Some(v) = self.contact_name {
            user.contact_name = Some(v);
        }
        if let Some(v) = self.contact_number {
            user.contact_number = Some(v);
        }
        if let Some(v) = self.business_address {
            user.business_address = Some(v);
        }
        if let Some(v) = self.business_city {
            user.business_city = Some(v);
        }
        if let Some(v) = self.business_state {
            user.business_state = Some(v);
        }
        if let Some(v) = self.business_country {
            user.business_country = Some(v);
        }
        if let Some(v) = self.sector {
            user.sector = Some(v);
        }
        if let Some(v) = self.organization_size {
            user.organization_size = Some(v);
        }
        if let Some(v) = self.first_name {
            user.first_name = Some(v);
        }
        if let Some(v) = self.last_name {
            user.last_name = Some(v);
        }
        if let Some(v) = self.department {
            user.department = Some(v);
        }
        if let Some(v) = self.user_img {
            user.user_img = Some(v);
        }
        if let Some(v) = self.is_active {
            user.is_active = v;
        }
    }
}

/// Business self-registration
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 1, max = 200, message = "Business name is required"))]
    pub business_name: String,
    #[validate(length(min = 1, max = 200, message = "Contact name is required"))]
    pub contact_name: String,
    #[validate(custom(function = "validate_contact_number"))]
    pub contact_number: String,
    #[validate(length(min = 1, max = 500, message = "Business address is required"))]
    pub business_address: String,
    #[validate(length(min = 1, max = 100, message = "Business city is required"))]
    pub business_city: String,
    #[validate(length(min = 1, max = 100, message = "Business state is required"))]
    pub business_state: String,
    #[validate(length(min = 1, max = 100, message = "Business country is required"))]
    pub business_country: String,
    #[validate(length(min = 1, max = 100, message = "Sector is required"))]
    pub sector: String,
    #[validate(length(min = 1, max = 50, message = "Organization size is required"))]
    pub organization_size: String,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
    /// Optional base64 data URI of a profile image
    #[serde(default)]
    pub user_img: Option<String>,
}

/// Sub-user creation by an admin or a business
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 15, message = "First name must be between 1 and 15 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 15, message = "Last name must be between 1 and 15 characters"))]
    pub last_name: String,
    #[validate(length(min = 1, max = 15, message = "Department must be between 1 and 15 characters"))]
    pub department: String,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
    /// Base64 data URI of the profile image (`data:image/...`)
    pub user_img: String,
}

/// Partial user update; every field is optional
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateUserRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 15, message = "First name must be between 1 and 15 characters"))]
    pub first_name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 15, message = "Last name must be between 1 and 15 characters"))]
    pub last_name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 15, message = "Department must be between 1 and 15 characters"))]
    pub department: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub business_name: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub contact_name: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_contact_number"))]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub business_address: Option<String>,
    #[serde(default)]
    pub business_city: Option<String>,
    #[serde(default)]
    pub business_state: Option<String>,
    #[serde(default)]
    pub business_country: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub organization_size: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_password"))]
    pub password: Option<String>,
    /// Base64 data URI of a replacement profile image
    #[serde(default)]
    pub user_img: Option<String>,
    /// Activate or deactivate the account (admin only)
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct VerifyOtpRequest {
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(length(equal = 4, message = "OTP must be 4 digits"))]
    pub otp: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct ResendOtpRequest {
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct SignInRequest {
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Successful sign-in payload
#[derive(Debug, Serialize, ToSchema)]
pub struct SignInResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}
