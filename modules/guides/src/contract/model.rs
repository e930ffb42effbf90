/// CMS-owned guide content. Never persisted locally; fetched per request and
/// filtered in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Guide {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub relation: String,
    pub tags: Vec<String>,
    pub help_tags: Vec<String>,
}

/// The personalization answers guide matching runs on.
#[derive(Debug, Clone, PartialEq)]
pub struct Personalization {
    pub relation_to_patient: String,
    pub main_challenges: Vec<String>,
    pub help_needs: Vec<String>,
}
