//! Conversions between storage models and contract types.

use serde_json::Value;

use crate::contract::model::{
    EmailChangeRequest, FamilyLink, FamilyLinkStatus, Notification, UserProfile,
};
use crate::infra::storage::entity::{
    email_change_request, family_link, notification, user_profile,
};

fn string_list(value: Value) -> Vec<String> {
    serde_json::from_value(value).unwrap_or_default()
}

pub fn json_list(items: &[String]) -> Value {
    serde_json::to_value(items).unwrap_or_else(|_| Value::Array(Vec::new()))
}

impl From<user_profile::Model> for UserProfile {
    fn from(m: user_profile::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            relation_to_patient: m.relation_to_patient,
            family_id: m.family_id,
            avatar_key: m.avatar_key,
            avatar_url: m.avatar_url,
            main_challenges: string_list(m.main_challenges),
            help_needs: string_list(m.help_needs),
            terms_accepted_at: m.terms_accepted_at,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<family_link::Model> for FamilyLink {
    fn from(m: family_link::Model) -> Self {
        Self {
            id: m.id,
            unique_code: m.unique_code,
            creator_id: m.creator_id,
            family_id: m.family_id,
            // Unknown values cannot appear: the column is only ever written
            // from FamilyLinkStatus::as_str.
            status: FamilyLinkStatus::parse(&m.status).unwrap_or(FamilyLinkStatus::Inactive),
            member_count: m.member_count,
            created_at: m.created_at,
        }
    }
}

impl From<email_change_request::Model> for EmailChangeRequest {
    fn from(m: email_change_request::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            new_email: m.new_email,
            code_hash: m.code_hash,
            sent_at: m.sent_at,
            verified_at: m.verified_at,
        }
    }
}

impl From<notification::Model> for Notification {
    fn from(m: notification::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            title: m.title,
            body: m.body,
            read: m.read,
            created_at: m.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_list_tolerates_malformed_json() {
        assert_eq!(string_list(json!(["a", "b"])), vec!["a", "b"]);
        assert!(string_list(json!({"not": "a list"})).is_empty());
        assert!(string_list(Value::Null).is_empty());
    }

    #[test]
    fn json_list_roundtrip() {
        let items = vec!["memory loss".to_string(), "wandering".to_string()];
        assert_eq!(string_list(json_list(&items)), items);
    }
}
