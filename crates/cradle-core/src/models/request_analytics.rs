//! Request analytics: a data request with an attached file, a consent flag and
//! a forward-only status lifecycle (pending → in progress → completed).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::validation::validate_not_blank;

/// Lifecycle status of a request analytics record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RequestStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
}

impl RequestStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::InProgress => "in progress",
            RequestStatus::Completed => "completed",
        }
    }

    /// The next status in the chain, `None` once completed.
    pub const fn next(self) -> Option<RequestStatus> {
        match self {
            RequestStatus::Pending => Some(RequestStatus::InProgress),
            RequestStatus::InProgress => Some(RequestStatus::Completed),
            RequestStatus::Completed => None,
        }
    }
}

impl Display for RequestStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "in progress" => Ok(RequestStatus::InProgress),
            "completed" => Ok(RequestStatus::Completed),
            other => Err(AppError::InvalidState(format!(
                "Invalid status value '{}'",
                other
            ))),
        }
    }
}

/// Result of applying `advance` to a stored status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Advanced {
        from: RequestStatus,
        to: RequestStatus,
    },
    AlreadyCompleted,
}

impl Transition {
    /// Decide the transition for a raw stored status value.
    ///
    /// Fails with `InvalidState` when the stored value is outside the known states.
    pub fn plan(stored_status: &str) -> Result<Transition, AppError> {
        let from: RequestStatus = stored_status.parse()?;
        Ok(match from.next() {
            Some(to) => Transition::Advanced { from, to },
            None => Transition::AlreadyCompleted,
        })
    }
}

/// Persisted request analytics record.
///
/// `status` is kept as the raw stored text so a corrupted value can be read
/// back and reported instead of failing every query that touches the row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct RequestAnalytics {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_id: Option<Uuid>,
    pub category_id: Uuid,
    pub request_type_id: Uuid,
    pub data_title: String,
    pub data_description: String,
    pub data_type: String,
    /// 1 when consent was given, 0 otherwise
    pub data_consent: i16,
    pub data_file: String,
    pub output_file: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RequestAnalytics {
    pub fn parsed_status(&self) -> Result<RequestStatus, AppError> {
        self.status.parse()
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.parsed_status(), Ok(RequestStatus::Completed))
    }
}

/// Outcome of an `advance` call. `advanced` is false for the completed no-op.
#[derive(Debug, Clone)]
pub struct AdvanceOutcome {
    pub record: RequestAnalytics,
    pub advanced: bool,
    pub message: String,
}

/// Equality filter applied to a listing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    All,
    ByBusiness(Uuid),
    ByUser(Uuid),
}

impl ListScope {
    pub fn matches(&self, record: &RequestAnalytics) -> bool {
        match self {
            ListScope::All => true,
            ListScope::ByBusiness(id) => record.business_id == Some(*id),
            ListScope::ByUser(id) => record.user_id == *id,
        }
    }
}

/// Values for inserting a record; status always starts at pending.
#[derive(Debug, Clone)]
pub struct NewRequestAnalytics {
    pub user_id: Uuid,
    pub business_id: Option<Uuid>,
    pub category_id: Uuid,
    pub request_type_id: Uuid,
    pub data_title: String,
    pub data_description: String,
    pub data_type: String,
    pub data_consent: i16,
    pub data_file: String,
}

/// Field-by-field partial update. `None` leaves the stored value as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestAnalyticsPatch {
    pub category_id: Option<Uuid>,
    pub request_type_id: Option<Uuid>,
    pub data_title: Option<String>,
    pub data_description: Option<String>,
    pub data_type: Option<String>,
    pub data_consent: Option<i16>,
    pub data_file: Option<String>,
    pub output_file: Option<String>,
}

impl RequestAnalyticsPatch {
    pub fn is_empty(&self) -> bool {
        self == &RequestAnalyticsPatch::default()
    }

    pub fn apply(self, record: &mut RequestAnalytics) {
        if let Some(v) = self.category_id {
            record.category_id = v;
        }
        if let Some(v) = self.request_type_id {
            record.request_type_id = v;
        }
        if let Some(v) = self.data_title {
            record.data_title = v;
        }
        if let Some(v) = self.data_description {
            record.data_description = v;
        }
        if let Some(v) = self.data_type {
            record.data_type = v;
        }
        if let Some(v) = self.data_consent {
            record.data_consent = v;
        }
        if let Some(v) = self.data_file {
            record.data_file = v;
        }
        if let Some(v) = self.output_file {
            record.output_file = Some(v);
        }
    }
}

/// Accepts `0`, `1`, `true` or `false` and stores it as 0/1.
fn deserialize_consent<'de, D>(deserializer: D) -> Result<i16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Number(i64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Flag(flag) => Ok(i16::from(flag)),
        Raw::Number(n @ (0 | 1)) => Ok(n as i16),
        Raw::Number(n) => Err(serde::de::Error::custom(format!(
            "data_consent must be 0 or 1, got {}",
            n
        ))),
    }
}

fn deserialize_optional_consent<'de, D>(deserializer: D) -> Result<Option<i16>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_consent(deserializer).map(Some)
}

/// Request DTO for submitting a data request.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct CreateRequestAnalyticsRequest {
    /// Owner of the record. Only admins may submit on behalf of another user;
    /// for everyone else it defaults to the caller.
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub category_id: Uuid,
    pub request_type_id: Uuid,
    #[validate(
        length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub data_title: String,
    #[validate(length(min = 1, max = 5000, message = "Description must be between 1 and 5000 characters"))]
    pub data_description: String,
    #[validate(length(min = 1, max = 100, message = "Data type must be between 1 and 100 characters"))]
    pub data_type: String,
    #[serde(deserialize_with = "deserialize_consent")]
    #[schema(value_type = i16, minimum = 0, maximum = 1)]
    pub data_consent: i16,
    /// Base64 data URI of the attached file
    pub data_file: String,
}

/// Request DTO for editing a data request. Omitted fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateRequestAnalyticsRequest {
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub request_type_id: Option<Uuid>,
    #[serde(default)]
    #[validate(
        length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub data_title: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 5000, message = "Description must be between 1 and 5000 characters"))]
    pub data_description: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Data type must be between 1 and 100 characters"))]
    pub data_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_consent")]
    #[schema(value_type = Option<i16>, minimum = 0, maximum = 1)]
    pub data_consent: Option<i16>,
    /// Base64 data URI replacing the attached file
    #[serde(default)]
    pub data_file: Option<String>,
    /// Base64 data URI of the delivered output (admin only)
    #[serde(default)]
    pub output_file: Option<String>,
}
