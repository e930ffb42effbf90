use std::sync::Arc;

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::contract::model::{Guide, Personalization};
use crate::domain::error::DomainError;
use crate::domain::ports::{ContentSource, ProfileSource};

/// Domain service for guide matching.
#[derive(Clone)]
pub struct Service {
    content: Arc<dyn ContentSource>,
    profiles: Arc<dyn ProfileSource>,
}

impl Service {
    pub fn new(content: Arc<dyn ContentSource>, profiles: Arc<dyn ProfileSource>) -> Self {
        Self { content, profiles }
    }

    /// Match guides against the user's personalization answers: fetch the
    /// visible guides for their relation, then keep the ones whose tags or
    /// help tags contain any active needle. Main challenges take precedence
    /// over help needs; with neither, the relation-filtered list passes
    /// through unfiltered.
    #[instrument(name = "guides.service.match_guides", skip(self), fields(user_id = %user_id))]
    pub async fn match_guides(&self, user_id: Uuid) -> Result<Vec<Guide>, DomainError> {
        let personalization = self
            .profiles
            .personalization(user_id)
            .await
            .map_err(|e| DomainError::profile(e.to_string()))?
            .ok_or_else(|| DomainError::user_not_found(user_id))?;

        let guides = self
            .content
            .guides_for_relation(&personalization.relation_to_patient)
            .await
            .map_err(|e| DomainError::content(e.to_string()))?;

        let needles = active_needles(&personalization);
        let matched = filter_guides(guides, &needles);

        debug!(matched = matched.len(), "Guide matching finished");
        Ok(matched)
    }
}

/// Main challenges win over help needs; both empty means no tag filter.
fn active_needles(p: &Personalization) -> Vec<String> {
    let source = if !p.main_challenges.is_empty() {
        &p.main_challenges
    } else {
        &p.help_needs
    };
    source
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Keep guides whose tag or help-tag names case-insensitively contain at
/// least one needle.
fn filter_guides(guides: Vec<Guide>, needles: &[String]) -> Vec<Guide> {
    if needles.is_empty() {
        return guides;
    }
    guides
        .into_iter()
        .filter(|guide| {
            guide
                .tags
                .iter()
                .chain(guide.help_tags.iter())
                .any(|tag| {
                    let tag = tag.to_lowercase();
                    needles.iter().any(|needle| tag.contains(needle))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guide(id: &str, tags: &[&str], help_tags: &[&str]) -> Guide {
        Guide {
            id: id.to_string(),
            title: format!("Guide {id}"),
            slug: format!("guide-{id}"),
            summary: None,
            relation: "child".to_string(),
            tags: tags.iter().map(|s| s.to_string()).collect(),
            help_tags: help_tags.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn personalization(challenges: &[&str], needs: &[&str]) -> Personalization {
        Personalization {
            relation_to_patient: "child".to_string(),
            main_challenges: challenges.iter().map(|s| s.to_string()).collect(),
            help_needs: needs.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn main_challenges_take_precedence_over_help_needs() {
        let p = personalization(&["Memory Loss"], &["daily care"]);
        assert_eq!(active_needles(&p), vec!["memory loss"]);
    }

    #[test]
    fn help_needs_used_when_no_challenges() {
        let p = personalization(&[], &["Daily Care", "  "]);
        assert_eq!(active_needles(&p), vec!["daily care"]);
    }

    #[test]
    fn matching_is_case_insensitive_on_both_sides() {
        let guides = vec![
            guide("1", &["MEMORY LOSS support"], &[]),
            guide("2", &["nutrition"], &[]),
        ];
        let matched = filter_guides(guides, &["memory loss".to_string()]);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "1");
    }

    #[test]
    fn help_tags_also_match() {
        let guides = vec![
            guide("1", &[], &["wandering at night"]),
            guide("2", &[], &["finances"]),
        ];
        let matched = filter_guides(guides, &["wandering".to_string()]);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "1");
    }

    #[test]
    fn any_needle_is_enough() {
        let guides = vec![
            guide("1", &["nutrition"], &[]),
            guide("2", &["sleep"], &[]),
            guide("3", &["mobility"], &[]),
        ];
        let matched = filter_guides(
            guides,
            &["sleep".to_string(), "nutrition".to_string()],
        );
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn empty_needles_pass_everything_through() {
        let guides = vec![guide("1", &["a"], &[]), guide("2", &["b"], &[])];
        let matched = filter_guides(guides, &[]);
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn unmatched_guides_are_dropped() {
        let guides = vec![guide("1", &["nutrition"], &["finances"])];
        let matched = filter_guides(guides, &["sleep".to_string()]);
        assert!(matched.is_empty());
    }
}
