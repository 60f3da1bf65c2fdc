use chrono::NaiveDateTime;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{AuthenticatedUser, STAFF_ROLES};
use crate::orders::OrderStatus;
use crate::reviews::{
    CreateReviewRequest, NewReview, RespondToReviewRequest, Review, ReviewError,
    ReviewRepository, ReviewType, ReviewableOrder,
};

/// Check that `user` may leave this review on `order` and build the row
///
/// The order's customer may review it, and so may restaurant staff. Only a
/// delivered order is reviewable, and a delivery review needs a partner.
pub fn prepare_review(
    user: &AuthenticatedUser,
    order: &ReviewableOrder,
    request: CreateReviewRequest,
    now: NaiveDateTime,
) -> Result<NewReview, ReviewError> {
    if order.customer_id != user.user_id && !STAFF_ROLES.contains(&user.role) {
        return Err(ReviewError::Forbidden);
    }
    if order.order_status != OrderStatus::Delivered {
        return Err(ReviewError::OrderNotDelivered);
    }
    if request.review_type == ReviewType::Delivery && order.delivery_partner_id.is_none() {
        return Err(ReviewError::ValidationError(
            "Order has no delivery partner to review".to_string(),
        ));
    }

    Ok(NewReview {
        order_id: order.id,
        customer_id: order.customer_id,
        restaurant_id: order.restaurant_id,
        delivery_partner_id: order.delivery_partner_id,
        rating: request.rating,
        review_text: request.review_text,
        review_type: request.review_type,
        created_at: now,
    })
}

/// Service layer for review business logic
#[derive(Clone)]
pub struct ReviewService {
    repository: ReviewRepository,
}

impl ReviewService {
    pub fn new(repository: ReviewRepository) -> Self {
        Self { repository }
    }

    /// Create a review for a delivered order
    ///
    /// A restaurant review is also written to the order's `rating` and
    /// `review`, which is what restaurant analytics averages.
    pub async fn create_review(
        &self,
        user: &AuthenticatedUser,
        request: CreateReviewRequest,
        now: NaiveDateTime,
    ) -> Result<Review, ReviewError> {
        request
            .validate()
            .map_err(|e| ReviewError::ValidationError(e.to_string()))?;

        let order = self
            .repository
            .find_order(request.order_id)
            .await?
            .ok_or(ReviewError::OrderNotFound)?;

        let new_review = prepare_review(user, &order, request, now)?;
        let review = self.repository.create(&new_review).await?;

        tracing::info!(
            "Order {} received a {}-star {} review",
            review.order_id,
            review.rating,
            review.review_type.as_str()
        );
        Ok(review)
    }

    pub async fn respond(
        &self,
        review_id: Uuid,
        request: RespondToReviewRequest,
        now: NaiveDateTime,
    ) -> Result<Review, ReviewError> {
        request
            .validate()
            .map_err(|e| ReviewError::ValidationError(e.to_string()))?;

        self.repository.respond(review_id, &request.response, now).await
    }

    pub async fn get_review(&self, review_id: Uuid) -> Result<Review, ReviewError> {
        self.repository
            .find_by_id(review_id)
            .await?
            .ok_or(ReviewError::NotFound)
    }

    pub async fn reviews_for_restaurant(&self, restaurant_id: Uuid) -> Result<Vec<Review>, ReviewError> {
        self.repository.find_by_restaurant(restaurant_id).await
    }

    pub async fn reviews_for_order(&self, order_id: Uuid) -> Result<Vec<Review>, ReviewError> {
        self.repository.find_by_order(order_id).await
    }
}
