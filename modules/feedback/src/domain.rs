use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub id: Uuid,
    pub user_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Rating must be between 1 and 5, got {rating}")]
    InvalidRating { rating: i16 },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn insert(&self, feedback: Feedback) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn FeedbackRepository>,
}

impl Service {
    pub fn new(repo: Arc<dyn FeedbackRepository>) -> Self {
        Self { repo }
    }

    #[instrument(name = "feedback.service.submit", skip_all, fields(user_id = %user_id, rating))]
    pub async fn submit(
        &self,
        user_id: Uuid,
        rating: i16,
        comment: Option<String>,
    ) -> Result<(), DomainError> {
        if !(1..=5).contains(&rating) {
            return Err(DomainError::InvalidRating { rating });
        }

        let feedback = Feedback {
            id: Uuid::new_v4(),
            user_id,
            rating,
            comment: comment.filter(|c| !c.trim().is_empty()),
            created_at: Utc::now(),
        };

        self.repo
            .insert(feedback)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Feedback recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CapturingRepo {
        rows: Mutex<Vec<Feedback>>,
    }

    #[async_trait]
    impl FeedbackRepository for CapturingRepo {
        async fn insert(&self, feedback: Feedback) -> anyhow::Result<()> {
            self.rows.lock().unwrap().push(feedback);
            Ok(())
        }
    }

    fn service() -> (Service, Arc<CapturingRepo>) {
        let repo = Arc::new(CapturingRepo {
            rows: Mutex::new(Vec::new()),
        });
        (Service::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn rating_out_of_range_is_rejected() {
        let (svc, repo) = service();
        for rating in [0, 6, -1, 100] {
            let err = svc.submit(Uuid::new_v4(), rating, None).await.unwrap_err();
            assert!(matches!(err, DomainError::InvalidRating { .. }));
        }
        assert!(repo.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn valid_rating_with_comment_is_stored() {
        let (svc, repo) = service();
        svc.submit(Uuid::new_v4(), 3, Some("Very helpful".to_string()))
            .await
            .unwrap();

        let rows = repo.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].rating, 3);
        assert_eq!(rows[0].comment.as_deref(), Some("Very helpful"));
    }

    #[tokio::test]
    async fn blank_comment_is_dropped() {
        let (svc, repo) = service();
        svc.submit(Uuid::new_v4(), 5, Some("   ".to_string()))
            .await
            .unwrap();
        assert_eq!(repo.rows.lock().unwrap()[0].comment, None);
    }
}
