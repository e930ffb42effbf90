use chrono::{DateTime, Utc};
use uuid::Uuid;

/// User profile as owned by the relational store. Credentials live in the
/// identity service and never appear here.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub relation_to_patient: String,
    pub family_id: Uuid,
    pub avatar_key: Option<String>,
    pub avatar_url: Option<String>,
    pub main_challenges: Vec<String>,
    pub help_needs: Vec<String>,
    pub terms_accepted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for account registration.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub relation_to_patient: String,
    pub terms_accepted: bool,
    pub family_code: Option<String>,
}

/// Partial profile update.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub relation_to_patient: Option<String>,
    pub main_challenges: Option<Vec<String>>,
    pub help_needs: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyLinkStatus {
    Active,
    Inactive,
}

impl FamilyLinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// Shareable invite code binding users into one family.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyLink {
    pub id: Uuid,
    pub unique_code: String,
    pub creator_id: Uuid,
    pub family_id: Uuid,
    pub status: FamilyLinkStatus,
    pub member_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Pending email change. `verified_at` stays None until the code is confirmed.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailChangeRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub new_email: String,
    pub code_hash: String,
    pub sent_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Result of a successful avatar upload.
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarUpload {
    pub key: String,
    pub signed_url: String,
}
