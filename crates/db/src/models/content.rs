//! Content entity models and DTOs (announcements and events).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use scms_core::error::CoreError;
use scms_core::lifecycle::ExplicitStatus;
use scms_core::types::{DbId, Timestamp};

/// Content kinds sharing the publication lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Announcement,
    Event,
}

impl ContentKind {
    /// Parse from the database `kind` column.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "announcement" => Ok(Self::Announcement),
            "event" => Ok(Self::Event),
            other => Err(CoreError::Validation(format!(
                "Unknown content kind '{other}'. Must be one of: announcement, event"
            ))),
        }
    }

    /// The database column value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Announcement => "announcement",
            Self::Event => "event",
        }
    }
}

/// A row from the `content_items` table.
///
/// Title, body, and attachment are opaque payload; the lifecycle only
/// interprets `explicit_status`, the two schedule timestamps, `published_at`,
/// and `deleted_at`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContentItem {
    pub id: DbId,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub attachment_path: Option<String>,
    pub explicit_status: String,
    pub scheduled_publish_at: Option<Timestamp>,
    pub scheduled_unpublish_at: Option<Timestamp>,
    pub published_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ContentItem {
    /// The stored editor status, parsed.
    pub fn explicit_status(&self) -> Result<ExplicitStatus, CoreError> {
        ExplicitStatus::from_name(&self.explicit_status)
    }
}

/// DTO for creating a content item.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateContent {
    pub kind: ContentKind,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub body: String,
    pub attachment_path: Option<String>,
    /// Defaults to draft when omitted.
    pub explicit_status: Option<ExplicitStatus>,
    pub scheduled_publish_at: Option<Timestamp>,
    pub scheduled_unpublish_at: Option<Timestamp>,
}

/// DTO for updating a content item. Only non-`None` fields are applied.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateContent {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub body: Option<String>,
    pub attachment_path: Option<String>,
    pub explicit_status: Option<ExplicitStatus>,
    pub scheduled_publish_at: Option<Timestamp>,
    pub scheduled_unpublish_at: Option<Timestamp>,
    /// When `true`, clears both schedule timestamps. The partial-update
    /// COALESCE pattern cannot express "set to NULL" on its own.
    #[serde(default)]
    pub clear_schedule: bool,
}
