pub mod analytics;
pub mod auth;
pub mod config;
pub mod coupons;
pub mod db;
pub mod error;
pub mod jobs;
pub mod menu;
pub mod notifications;
pub mod orders;
pub mod restaurants;
pub mod reviews;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use analytics::AnalyticsRepository;
use auth::{require_role, RequireRole, TokenService};
use config::Settings;
use coupons::{CouponRepository, CouponService};
use menu::{MenuRepository, MenuService};
use notifications::{NotificationRepository, NotificationService};
use orders::{OrderItemsRepository, OrderService, OrdersRepository, PricingPolicy};
use restaurants::Restaurant;
use reviews::{ReviewRepository, ReviewService};
use storage::{InMemoryStorage, Storage};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        coupons::handlers::list_coupons,
        coupons::handlers::create_coupon,
        coupons::handlers::deactivate_coupon,
        coupons::handlers::apply_coupon,
        orders::handlers::create_order_handler,
        orders::handlers::list_restaurant_orders_handler,
        orders::handlers::get_order_by_id_handler,
        orders::handlers::update_order_status_handler,
        orders::handlers::assign_delivery_handler,
        orders::handlers::cancel_order_handler,
        analytics::handlers::get_restaurant_analytics,
        restaurants::handlers::register_restaurant,
        restaurants::handlers::list_restaurants,
        restaurants::handlers::get_restaurant,
        restaurants::handlers::update_profile,
        restaurants::handlers::set_open_status,
        restaurants::handlers::set_business_hours,
        restaurants::handlers::set_payment_methods,
        menu::handlers::list_categories,
        menu::handlers::create_category,
        menu::handlers::list_food_items,
        menu::handlers::create_food_item,
        menu::handlers::update_food_item,
        menu::handlers::delete_food_item,
        reviews::handlers::list_restaurant_reviews,
        reviews::handlers::list_order_reviews,
        reviews::handlers::get_review,
        reviews::handlers::create_review,
        reviews::handlers::respond_to_review,
        notifications::handlers::list_user_notifications,
        notifications::handlers::mark_notification_read,
        notifications::handlers::create_notification,
    ),
    components(
        schemas(
            coupons::Coupon,
            coupons::CouponType,
            coupons::CreateCouponRequest,
            coupons::ApplyCouponRequest,
            coupons::ApplyCouponResponse,
            orders::Order,
            orders::OrderItem,
            orders::OrderStatus,
            orders::PaymentStatus,
            orders::PaymentMethod,
            orders::OrderLineRequest,
            orders::CreateOrderRequest,
            orders::UpdateStatusRequest,
            orders::AssignDeliveryRequest,
            orders::CancelOrderRequest,
            orders::OrderResponse,
            analytics::AnalyticsReport,
            analytics::TopItem,
            restaurants::Restaurant,
            restaurants::RegisterRestaurantRequest,
            restaurants::UpdateProfileRequest,
            restaurants::SetOpenStatusRequest,
            restaurants::BusinessHoursRequest,
            restaurants::PaymentMethodsRequest,
            menu::Category,
            menu::FoodItem,
            menu::FoodStatus,
            menu::CreateCategoryRequest,
            menu::CreateFoodItemRequest,
            menu::UpdateFoodItemRequest,
            reviews::Review,
            reviews::ReviewType,
            reviews::CreateReviewRequest,
            reviews::RespondToReviewRequest,
            notifications::Notification,
            notifications::NotificationType,
            notifications::CreateNotificationRequest,
        )
    ),
    tags(
        (name = "coupons", description = "Coupon management and preview"),
        (name = "orders", description = "Order placement and lifecycle"),
        (name = "analytics", description = "Restaurant performance reports"),
        (name = "restaurants", description = "Restaurant profiles"),
        (name = "menu", description = "Categories and food items"),
        (name = "reviews", description = "Order reviews and restaurant replies"),
        (name = "notifications", description = "Per-user notifications")
    ),
    info(
        title = "United Kart Restaurant API",
        version = "0.1.0",
        description = "Restaurant-side API of the United Kart food-delivery platform"
    )
)]
pub struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub token_service: Arc<TokenService>,
    pub coupon_service: CouponService,
    pub order_service: OrderService,
    pub analytics_repo: AnalyticsRepository,
    pub menu_service: MenuService,
    pub review_service: ReviewService,
    pub notification_service: NotificationService,
    pub restaurants: Arc<dyn Storage<Restaurant>>,
}

impl AppState {
    /// Wire repositories and services over one connection pool
    pub fn new(pool: PgPool, settings: Settings) -> Self {
        let restaurants: Arc<dyn Storage<Restaurant>> = Arc::new(InMemoryStorage::new());
        let coupon_repo = CouponRepository::new(pool.clone());

        let order_service = OrderService::new(
            OrdersRepository::new(pool.clone()),
            OrderItemsRepository::new(pool.clone()),
            coupon_repo.clone(),
            restaurants.clone(),
            PricingPolicy::from_settings(&settings),
        );

        Self {
            token_service: Arc::new(TokenService::new(settings.jwt_secret.clone())),
            coupon_service: CouponService::new(coupon_repo),
            order_service,
            menu_service: MenuService::new(MenuRepository::new(pool.clone())),
            review_service: ReviewService::new(ReviewRepository::new(pool.clone())),
            notification_service: NotificationService::new(NotificationRepository::new(
                pool.clone(),
            )),
            analytics_repo: AnalyticsRepository::new(pool),
            restaurants,
            settings: Arc::new(settings),
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Creates and configures the application router
///
/// Write routes sit behind the staff role policy. Reviews and notifications
/// need any signed-in user; reads and the coupon preview are open.
pub fn create_router(state: AppState) -> Router {
    let staff_only = Router::new()
        .route("/api/restaurant/coupons", post(coupons::create_coupon))
        .route(
            "/api/restaurant/coupons/:coupon_id/deactivate",
            put(coupons::deactivate_coupon),
        )
        .route("/api/orders", post(orders::create_order_handler))
        .route(
            "/api/orders/:order_id/status",
            put(orders::update_order_status_handler),
        )
        .route(
            "/api/orders/:order_id/assign_delivery",
            put(orders::assign_delivery_handler),
        )
        .route("/api/orders/:order_id/cancel", put(orders::cancel_order_handler))
        .route(
            "/api/restaurants/register",
            post(restaurants::register_restaurant),
        )
        .route("/api/restaurants/:id/profile", put(restaurants::update_profile))
        .route("/api/restaurants/:id/open", put(restaurants::set_open_status))
        .route(
            "/api/restaurants/:id/business_hours",
            put(restaurants::set_business_hours),
        )
        .route(
            "/api/restaurants/:id/payment_methods",
            put(restaurants::set_payment_methods),
        )
        .route("/api/menu/categories", post(menu::create_category))
        .route("/api/menu/items", post(menu::create_food_item))
        .route(
            "/api/menu/items/:id",
            put(menu::update_food_item).delete(menu::delete_food_item),
        )
        .route(
            "/api/restaurant/reviews/:id/respond",
            put(reviews::respond_to_review),
        )
        .route(
            "/api/restaurant/notifications",
            post(notifications::create_notification),
        )
        .route_layer(middleware::from_fn_with_state(
            RequireRole::staff(state.token_service.clone()),
            require_role,
        ));

    let signed_in = Router::new()
        .route("/api/restaurant/reviews", post(reviews::create_review))
        .route(
            "/api/restaurant/notifications/user/:user_id",
            get(notifications::list_user_notifications),
        )
        .route(
            "/api/restaurant/notifications/:id/read",
            put(notifications::mark_notification_read),
        )
        .route_layer(middleware::from_fn_with_state(
            RequireRole::signed_in(state.token_service.clone()),
            require_role,
        ));

    let public = Router::new()
        .route("/api/restaurant/coupons", get(coupons::list_coupons))
        .route("/api/restaurant/coupons/apply", post(coupons::apply_coupon))
        .route(
            "/api/orders/restaurant/:restaurant_id",
            get(orders::list_restaurant_orders_handler),
        )
        .route("/api/orders/:order_id", get(orders::get_order_by_id_handler))
        .route(
            "/api/analytics/restaurant/:restaurant_id",
            get(analytics::get_restaurant_analytics),
        )
        .route("/api/restaurants", get(restaurants::list_restaurants))
        .route("/api/restaurants/:id", get(restaurants::get_restaurant))
        .route("/api/menu/categories", get(menu::list_categories))
        .route("/api/menu/items/:id", get(menu::list_food_items))
        .route(
            "/api/restaurant/reviews/restaurant/:id",
            get(reviews::list_restaurant_reviews),
        )
        .route(
            "/api/restaurant/reviews/order/:id",
            get(reviews::list_order_reviews),
        )
        .route("/api/restaurant/reviews/:id", get(reviews::get_review));

    let cors = cors_layer(&state.settings.cors_origins);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public)
        .merge(signed_in)
        .merge(staff_only)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
