// HTTP handler for restaurant analytics

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Local;
use uuid::Uuid;

use crate::analytics::{AnalyticsAggregator, AnalyticsPeriod, AnalyticsQuery, AnalyticsReport};
use crate::error::ApiError;
use crate::AppState;

/// Handler for GET /api/analytics/restaurant/{restaurant_id}
#[utoipa::path(
    get,
    path = "/api/analytics/restaurant/{restaurant_id}",
    params(
        ("restaurant_id" = Uuid, Path, description = "Restaurant ID"),
        AnalyticsQuery
    ),
    responses(
        (status = 200, description = "Analytics for the period", body = AnalyticsReport),
        (status = 500, description = "Internal server error")
    ),
    tag = "analytics"
)]
pub async fn get_restaurant_analytics(
    State(state): State<AppState>,
    Path(restaurant_id): Path<Uuid>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsReport>, ApiError> {
    let period = query.period.unwrap_or_else(|| "today".to_string());
    let now = Local::now().naive_local();
    let since = AnalyticsPeriod::parse_lenient(&period).window_start(now);

    let orders = state.analytics_repo.fetch_orders(restaurant_id, since).await?;
    let items = state.analytics_repo.fetch_items(restaurant_id, since).await?;

    tracing::debug!(
        "Aggregating {} orders for restaurant {} since {}",
        orders.len(),
        restaurant_id,
        since
    );

    let report = AnalyticsAggregator::aggregate(restaurant_id, &period, now, &orders, &items);
    Ok(Json(report))
}
