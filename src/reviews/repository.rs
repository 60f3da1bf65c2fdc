use chrono::NaiveDateTime;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::is_unique_violation;
use crate::reviews::{NewReview, Review, ReviewError, ReviewType, ReviewableOrder};

const REVIEW_COLUMNS: &str = "id, order_id, customer_id, restaurant_id, delivery_partner_id, \
     rating, review_text, review_type, response, responded_at, created_at";

/// Repository for database operations on reviews
#[derive(Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_order(&self, order_id: Uuid) -> Result<Option<ReviewableOrder>, ReviewError> {
        let order = sqlx::query_as::<_, ReviewableOrder>(
            r#"
            SELECT id, customer_id, restaurant_id, delivery_partner_id, order_status
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Insert a review; a restaurant review also becomes the order's
    /// rating and review text, in the same transaction
    pub async fn create(&self, review: &NewReview) -> Result<Review, ReviewError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, Review>(&format!(
            r#"
            INSERT INTO reviews (order_id, customer_id, restaurant_id, delivery_partner_id,
                                 rating, review_text, review_type, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            REVIEW_COLUMNS
        ))
        .bind(review.order_id)
        .bind(review.customer_id)
        .bind(review.restaurant_id)
        .bind(review.delivery_partner_id)
        .bind(review.rating)
        .bind(&review.review_text)
        .bind(review.review_type)
        .bind(review.created_at)
        .fetch_one(&mut *tx)
        .await;

        let created = match inserted {
            Ok(created) => created,
            Err(e) if is_unique_violation(&e) => {
                return Err(ReviewError::DuplicateReview(
                    review.review_type.as_str().to_string(),
                ))
            }
            Err(e) => return Err(e.into()),
        };

        if review.review_type == ReviewType::Restaurant {
            sqlx::query(
                "UPDATE orders SET rating = $2, review = $3, updated_at = $4 WHERE id = $1",
            )
            .bind(review.order_id)
            .bind(review.rating)
            .bind(&review.review_text)
            .bind(review.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, review_id: Uuid) -> Result<Option<Review>, ReviewError> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "SELECT {} FROM reviews WHERE id = $1",
            REVIEW_COLUMNS
        ))
        .bind(review_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    /// Newest first
    pub async fn find_by_restaurant(&self, restaurant_id: Uuid) -> Result<Vec<Review>, ReviewError> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {} FROM reviews WHERE restaurant_id = $1 ORDER BY created_at DESC",
            REVIEW_COLUMNS
        ))
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    pub async fn find_by_order(&self, order_id: Uuid) -> Result<Vec<Review>, ReviewError> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {} FROM reviews WHERE order_id = $1 ORDER BY review_type",
            REVIEW_COLUMNS
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    /// Store the restaurant's reply, replacing any earlier one
    pub async fn respond(
        &self,
        review_id: Uuid,
        response: &str,
        now: NaiveDateTime,
    ) -> Result<Review, ReviewError> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "UPDATE reviews SET response = $2, responded_at = $3 WHERE id = $1 RETURNING {}",
            REVIEW_COLUMNS
        ))
        .bind(review_id)
        .bind(response)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ReviewError::NotFound)?;

        Ok(review)
    }
}
