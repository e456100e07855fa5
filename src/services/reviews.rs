//! Destination reviews.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::{caller, optional_text, required_text};
use crate::aggregates::one_decimal;
use crate::error::{Result, SyncError};
use crate::interfaces::{Filter, RowStore};
use crate::model::{NewReview, Review};
use crate::profiles::{Joined, ProfileJoiner};
use crate::repository::Repository;

#[derive(Clone)]
pub struct ReviewService {
    me: Uuid,
    reviews: Repository<Review>,
    joiner: ProfileJoiner,
}

impl ReviewService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            me: caller(&store),
            reviews: Repository::new(store.clone()),
            joiner: ProfileJoiner::new(store),
        }
    }

    #[tracing::instrument(name = "reviews.submit", skip_all, fields(destination = %destination))]
    pub async fn submit(
        &self,
        destination: &str,
        rating: u8,
        text: &str,
        tips: Option<&str>,
    ) -> Result<Review> {
        let destination_name =
            required_text("destination_name", destination, "Please choose a destination")?;
        if !(1..=5).contains(&rating) {
            return Err(SyncError::validation("rating", "Please select a rating"));
        }
        let review_text = required_text("review_text", text, "Please write your review")?;

        let review = self
            .reviews
            .insert(&NewReview {
                user_id: self.me,
                destination_name,
                rating,
                review_text,
                tips: optional_text(tips),
                photos: None,
            })
            .await?;
        info!(rating, "Review submitted");
        Ok(review)
    }

    /// Reviews of one destination, newest first, with their authors.
    pub async fn list(&self, destination: &str) -> Result<Vec<Joined<Review>>> {
        let reviews = self
            .reviews
            .list(Filter::new().eq("destination_name", destination.trim()))
            .await?;
        self.joiner.join(reviews).await
    }

    /// Mean rating to one decimal, `None` without reviews.
    pub async fn average_rating(&self, destination: &str) -> Result<Option<f64>> {
        let reviews = self
            .reviews
            .list(Filter::new().eq("destination_name", destination.trim()))
            .await?;
        if reviews.is_empty() {
            return Ok(None);
        }
        let sum: f64 = reviews.iter().map(|r| f64::from(r.rating)).sum();
        Ok(Some(one_decimal(sum / reviews.len() as f64)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Sandbox;

    #[tokio::test]
    async fn test_reviews_are_public_and_averaged() {
        let sandbox = Sandbox::new();
        let asha = sandbox.sign_up("asha@example.com", Some("Asha")).await;
        let ravi = sandbox.sign_up("ravi@example.com", None).await;

        sandbox
            .services(&asha)
            .reviews()
            .submit("Hampi", 5, "Boulders everywhere", Some("Rent a cycle"))
            .await
            .unwrap();
        sandbox
            .services(&ravi)
            .reviews()
            .submit("Hampi", 4, "Hot in May", None)
            .await
            .unwrap();
        sandbox
            .services(&ravi)
            .reviews()
            .submit("Gokarna", 2, "Crowded", None)
            .await
            .unwrap();

        let meera = sandbox.sign_up("meera@example.com", None).await;
        let reviews = sandbox.services(&meera).reviews();
        let hampi = reviews.list("Hampi").await.unwrap();
        assert_eq!(hampi.len(), 2);
        assert_eq!(hampi[1].author.display_name, "Asha");
        assert_eq!(reviews.average_rating("Hampi").await.unwrap(), Some(4.5));
        assert_eq!(reviews.average_rating("Ziro").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rating_out_of_range() {
        let sandbox = Sandbox::new();
        let asha = sandbox.sign_up("asha@example.com", None).await;
        let reviews = sandbox.services(&asha).reviews();

        for rating in [0, 6] {
            let err = reviews.submit("Hampi", rating, "ok", None).await.unwrap_err();
            assert!(matches!(err, SyncError::Validation { field: "rating", .. }));
        }
        let err = reviews.submit("Hampi", 3, "  ", None).await.unwrap_err();
        assert!(matches!(err, SyncError::Validation { field: "review_text", .. }));
    }
}
