//! Guide matching end-to-end over fake ports, plus wire-level tests for the
//! CMS adapter.

use std::sync::Arc;

use async_trait::async_trait;
use httpmock::prelude::*;
use url::Url;
use uuid::Uuid;

use guides::contract::model::{Guide, Personalization};
use guides::domain::error::DomainError;
use guides::domain::ports::{ContentSource, ProfileSource};
use guides::domain::service::Service;
use guides::infra::http::HttpContentSource;

struct FixedContent {
    guides: Vec<Guide>,
}

#[async_trait]
impl ContentSource for FixedContent {
    async fn guides_for_relation(&self, relation: &str) -> anyhow::Result<Vec<Guide>> {
        Ok(self
            .guides
            .iter()
            .filter(|g| g.relation == relation)
            .cloned()
            .collect())
    }
}

struct FixedProfiles {
    user_id: Uuid,
    personalization: Option<Personalization>,
}

#[async_trait]
impl ProfileSource for FixedProfiles {
    async fn personalization(&self, user_id: Uuid) -> anyhow::Result<Option<Personalization>> {
        if user_id == self.user_id {
            Ok(self.personalization.clone())
        } else {
            Ok(None)
        }
    }
}

fn guide(id: &str, relation: &str, tags: &[&str], help_tags: &[&str]) -> Guide {
    Guide {
        id: id.to_string(),
        title: format!("Guide {id}"),
        slug: format!("guide-{id}"),
        summary: Some("summary".to_string()),
        relation: relation.to_string(),
        tags: tags.iter().map(|s| s.to_string()).collect(),
        help_tags: help_tags.iter().map(|s| s.to_string()).collect(),
    }
}

fn service_with(
    guides: Vec<Guide>,
    user_id: Uuid,
    personalization: Option<Personalization>,
) -> Service {
    Service::new(
        Arc::new(FixedContent { guides }),
        Arc::new(FixedProfiles {
            user_id,
            personalization,
        }),
    )
}

#[tokio::test]
async fn matches_on_main_challenges_and_ignores_other_relations() {
    let user_id = Uuid::new_v4();
    let svc = service_with(
        vec![
            guide("1", "child", &["Memory Loss"], &[]),
            guide("2", "child", &["nutrition"], &[]),
            guide("3", "spouse", &["memory loss"], &[]),
        ],
        user_id,
        Some(Personalization {
            relation_to_patient: "child".to_string(),
            main_challenges: vec!["memory loss".to_string()],
            help_needs: vec!["nutrition".to_string()],
        }),
    );

    let matched = svc.match_guides(user_id).await.unwrap();
    // Relation filter drops guide 3; main challenges take precedence so the
    // nutrition help-need never applies.
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].id, "1");
}

#[tokio::test]
async fn falls_back_to_help_needs_when_challenges_empty() {
    let user_id = Uuid::new_v4();
    let svc = service_with(
        vec![
            guide("1", "child", &[], &["Daily Care basics"]),
            guide("2", "child", &["finances"], &[]),
        ],
        user_id,
        Some(Personalization {
            relation_to_patient: "child".to_string(),
            main_challenges: vec![],
            help_needs: vec!["daily care".to_string()],
        }),
    );

    let matched = svc.match_guides(user_id).await.unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].id, "1");
}

#[tokio::test]
async fn no_needles_returns_relation_filtered_list() {
    let user_id = Uuid::new_v4();
    let svc = service_with(
        vec![
            guide("1", "child", &["a"], &[]),
            guide("2", "child", &["b"], &[]),
        ],
        user_id,
        Some(Personalization {
            relation_to_patient: "child".to_string(),
            main_challenges: vec![],
            help_needs: vec![],
        }),
    );

    let matched = svc.match_guides(user_id).await.unwrap();
    assert_eq!(matched.len(), 2);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let svc = service_with(vec![], Uuid::new_v4(), None);

    let err = svc.match_guides(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DomainError::UserNotFound { .. }));
}

// --- CMS adapter -----------------------------------------------------------

#[tokio::test]
async fn cms_client_queries_relation_and_parses_envelope() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/guides")
                .query_param("relation", "child")
                .query_param("visible", "true")
                .header("authorization", "Bearer cms-key");
            then.status(200).json_body(serde_json::json!({
                "data": [
                    {
                        "id": 7,
                        "title": "Handling memory loss",
                        "slug": "handling-memory-loss",
                        "summary": "Practical steps",
                        "relation": "child",
                        "tags": [{ "name": "memory loss" }],
                        "helpTags": [{ "name": "daily care" }]
                    },
                    {
                        "id": "str-8",
                        "title": "Wandering at night",
                        "slug": "wandering-at-night",
                        "summary": null,
                        "relation": "child",
                        "tags": [],
                        "helpTags": []
                    }
                ]
            }));
        })
        .await;

    let client = HttpContentSource::new(
        reqwest::Client::new(),
        Url::parse(&server.base_url()).unwrap(),
        "cms-key".to_string(),
    );

    let guides = client.guides_for_relation("child").await.unwrap();
    assert_eq!(guides.len(), 2);
    assert_eq!(guides[0].id, "7");
    assert_eq!(guides[0].tags, vec!["memory loss"]);
    assert_eq!(guides[0].help_tags, vec!["daily care"]);
    assert_eq!(guides[1].id, "str-8");
    assert_eq!(guides[1].summary, None);
    mock.assert_async().await;
}

#[tokio::test]
async fn cms_client_fails_on_upstream_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/guides");
            then.status(502);
        })
        .await;

    let client = HttpContentSource::new(
        reqwest::Client::new(),
        Url::parse(&server.base_url()).unwrap(),
        "cms-key".to_string(),
    );

    let err = client.guides_for_relation("child").await.unwrap_err();
    assert!(err.to_string().contains("502"));
}
