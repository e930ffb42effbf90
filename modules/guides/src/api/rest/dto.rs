use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::model::Guide;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchGuidesReq {
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuideDto {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub relation: String,
    pub tags: Vec<String>,
    pub help_tags: Vec<String>,
}

impl From<Guide> for GuideDto {
    fn from(g: Guide) -> Self {
        Self {
            id: g.id,
            title: g.title,
            slug: g.slug,
            summary: g.summary,
            relation: g.relation,
            tags: g.tags,
            help_tags: g.help_tags,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GuideListDto {
    pub guides: Vec<GuideDto>,
}
