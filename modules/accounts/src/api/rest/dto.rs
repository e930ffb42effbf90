use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::model::{
    AvatarUpload, FamilyLink, NewRegistration, Notification, ProfilePatch, UserProfile,
};

/// Registration request body. Field names follow the mobile client.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterReq {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub relation_to_dementia_person: String,
    #[serde(default)]
    pub terms_accepted: bool,
    pub family_code: Option<String>,
}

impl From<RegisterReq> for NewRegistration {
    fn from(req: RegisterReq) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
            relation_to_patient: req.relation_to_dementia_person,
            terms_accepted: req.terms_accepted,
            family_code: req.family_code,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub relation_to_dementia_person: String,
    pub family_id: Uuid,
}

impl From<UserProfile> for RegisteredUserDto {
    fn from(p: UserProfile) -> Self {
        Self {
            id: p.id,
            name: p.name,
            email: p.email,
            relation_to_dementia_person: p.relation_to_patient,
            family_id: p.family_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginReq {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Full user summary returned by login and profile reads.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub relation_to_dementia_person: String,
    pub family_id: Uuid,
    pub avatar_url: Option<String>,
    pub main_challenges: Vec<String>,
    pub help_needs: Vec<String>,
}

impl From<UserProfile> for UserDto {
    fn from(p: UserProfile) -> Self {
        Self {
            id: p.id,
            name: p.name,
            email: p.email,
            relation_to_dementia_person: p.relation_to_patient,
            family_id: p.family_id,
            avatar_url: p.avatar_url,
            main_challenges: p.main_challenges,
            help_needs: p.help_needs,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordReq {
    pub user_id: Uuid,
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestEmailChangeReq {
    pub user_id: Uuid,
    #[serde(default)]
    pub new_email: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmEmailChangeReq {
    pub user_id: Uuid,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SuccessDto {
    pub success: bool,
}

impl SuccessDto {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmailChangedDto {
    pub success: bool,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvatarDto {
    pub path: String,
    pub signed_url: String,
}

impl From<AvatarUpload> for AvatarDto {
    fn from(a: AvatarUpload) -> Self {
        Self {
            path: a.key,
            signed_url: a.signed_url,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileReq {
    pub name: Option<String>,
    pub relation_to_dementia_person: Option<String>,
    pub main_challenges: Option<Vec<String>>,
    pub help_needs: Option<Vec<String>>,
}

impl From<UpdateProfileReq> for ProfilePatch {
    fn from(req: UpdateProfileReq) -> Self {
        Self {
            name: req.name,
            relation_to_patient: req.relation_to_dementia_person,
            main_challenges: req.main_challenges,
            help_needs: req.help_needs,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PushTokenReq {
    pub user_id: Uuid,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub platform: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDto {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationDto {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            title: n.title,
            body: n.body,
            read: n.read,
            created_at: n.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NotificationListDto {
    pub notifications: Vec<NotificationDto>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFamilyLinkReq {
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FamilyLinkDto {
    pub id: Uuid,
    pub unique_code: String,
    pub family_id: Uuid,
    pub status: String,
    pub member_count: i32,
}

impl From<FamilyLink> for FamilyLinkDto {
    fn from(l: FamilyLink) -> Self {
        Self {
            id: l.id,
            unique_code: l.unique_code,
            family_id: l.family_id,
            status: l.status.as_str().to_string(),
            member_count: l.member_count,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FamilyLinkStatusReq {
    #[serde(default)]
    pub status: String,
}
