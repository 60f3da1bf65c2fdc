use chrono::NaiveDateTime;
use rand::Rng;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::config::Settings;
use crate::coupons::{CouponEvaluation, CouponEvaluator, CouponRepository};
use crate::orders::{
    CouponRedemption, CreateOrderRequest, NewOrder, NewOrderItem, Order, OrderError,
    OrderItemsRepository, OrderResponse, OrderStatus, OrdersRepository, PaymentMethod,
    PriceCalculator, StatusMachine,
};
use crate::restaurants::Restaurant;
use crate::storage::Storage;

const ORDER_NUMBER_ATTEMPTS: usize = 3;

/// Service-wide pricing defaults, overridable per restaurant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    pub tax_percentage: Decimal,
    pub delivery_fee: Decimal,
    pub min_order_amount: Decimal,
}

impl PricingPolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            tax_percentage: settings.gst_percentage,
            delivery_fee: settings.default_delivery_fee,
            min_order_amount: settings.min_order_amount,
        }
    }

    /// Apply a restaurant's own fee and minimum where it set them
    pub fn for_restaurant(&self, restaurant: Option<&Restaurant>) -> Self {
        match restaurant {
            Some(r) => Self {
                tax_percentage: self.tax_percentage,
                delivery_fee: r.delivery_fee.unwrap_or(self.delivery_fee),
                min_order_amount: r.min_order_amount.unwrap_or(self.min_order_amount),
            },
            None => *self,
        }
    }
}

/// A known restaurant must be open and take the requested payment method;
/// unknown restaurants are not checked
pub fn ensure_accepting(
    restaurant: Option<&Restaurant>,
    method: PaymentMethod,
) -> Result<(), OrderError> {
    let Some(restaurant) = restaurant else {
        return Ok(());
    };
    if !restaurant.is_open {
        return Err(OrderError::RestaurantClosed(restaurant.name.clone()));
    }
    if !restaurant.accepts(method) {
        return Err(OrderError::PaymentMethodNotAccepted(method));
    }
    Ok(())
}

/// `UK` + date + six random digits, e.g. `UK20240615042317`
pub fn generate_order_number(now: NaiveDateTime) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("UK{}{:06}", now.format("%Y%m%d"), suffix)
}

/// Service for order business logic
#[derive(Clone)]
pub struct OrderService {
    orders_repo: OrdersRepository,
    order_items_repo: OrderItemsRepository,
    coupon_repo: CouponRepository,
    restaurants: Arc<dyn Storage<Restaurant>>,
    pricing: PricingPolicy,
}

impl OrderService {
    pub fn new(
        orders_repo: OrdersRepository,
        order_items_repo: OrderItemsRepository,
        coupon_repo: CouponRepository,
        restaurants: Arc<dyn Storage<Restaurant>>,
        pricing: PricingPolicy,
    ) -> Self {
        Self {
            orders_repo,
            order_items_repo,
            coupon_repo,
            restaurants,
            pricing,
        }
    }

    /// Create a new order
    ///
    /// # Validation
    /// - At least one line, every quantity and unit price positive
    /// - A known restaurant must be open and accept the payment method
    /// - Subtotal must reach the restaurant's minimum (or the service default)
    /// - A supplied coupon code must be applicable at `now`; its discount and
    ///   any delivery-fee waiver feed the totals
    /// - The coupon use is counted atomically with the order insert
    pub async fn create_order(
        &self,
        request: CreateOrderRequest,
        now: NaiveDateTime,
    ) -> Result<OrderResponse, OrderError> {
        request
            .validate()
            .map_err(|e| OrderError::ValidationError(e.to_string()))?;

        let mut items = Vec::with_capacity(request.items.len());
        for line in &request.items {
            line.validate()
                .map_err(|e| OrderError::InvalidQuantity(e.to_string()))?;

            items.push(NewOrderItem {
                food_item_id: line.food_item_id,
                variant_id: line.variant_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
                total_price: PriceCalculator::calculate_subtotal(line.quantity, line.unit_price)?,
                special_instructions: line.special_instructions.clone(),
            });
        }

        let line_totals: Vec<Decimal> = items.iter().map(|item| item.total_price).collect();
        let subtotal = PriceCalculator::calculate_total(&line_totals)?;

        let restaurant = self
            .restaurants
            .get(request.restaurant_id)
            .await
            .map_err(|e| OrderError::DatabaseError(e.to_string()))?;
        ensure_accepting(restaurant.as_ref(), request.payment_method)?;
        let pricing = self.pricing.for_restaurant(restaurant.as_ref());

        if subtotal < pricing.min_order_amount {
            return Err(OrderError::BelowMinimum {
                minimum: pricing.min_order_amount,
                subtotal,
            });
        }

        let evaluation = match request.coupon_code.as_deref() {
            Some(code) => {
                let coupon = self.coupon_repo.find_by_code(code).await.map_err(|e| {
                    OrderError::DatabaseError(e.to_string())
                })?;
                let evaluation = CouponEvaluator::evaluate(coupon.as_ref(), subtotal, now);
                if !evaluation.applicable {
                    tracing::debug!("Coupon {} rejected for order subtotal {}", code, subtotal);
                    return Err(OrderError::CouponNotApplicable(code.to_string()));
                }
                evaluation
            }
            None => CouponEvaluation::not_applicable(),
        };

        let totals = PriceCalculator::assemble_totals(
            subtotal,
            pricing.tax_percentage,
            pricing.delivery_fee,
            &evaluation,
        )?;

        let redemption = evaluation.coupon.as_ref().map(|c| CouponRedemption {
            coupon_id: c.id,
            code: c.code.clone(),
        });

        let mut attempt = 0;
        let order = loop {
            attempt += 1;
            let new_order = NewOrder {
                order_number: generate_order_number(now),
                customer_id: request.customer_id,
                restaurant_id: request.restaurant_id,
                delivery_address_id: request.delivery_address_id,
                coupon_id: redemption.as_ref().map(|r| r.coupon_id),
                subtotal: totals.subtotal,
                tax_amount: totals.tax_amount,
                delivery_fee: totals.delivery_fee,
                discount_amount: totals.discount_amount,
                total_amount: totals.total_amount,
                payment_method: request.payment_method,
                special_instructions: request.special_instructions.clone(),
                created_at: now,
            };

            match self
                .orders_repo
                .create(&new_order, &items, redemption.as_ref())
                .await
            {
                Err(OrderError::DuplicateOrderNumber) if attempt < ORDER_NUMBER_ATTEMPTS => {
                    tracing::warn!("Order number {} already taken, retrying", new_order.order_number);
                }
                other => break other?,
            }
        };

        tracing::info!(
            "Created order {} for restaurant {}: subtotal={}, total={}",
            order.order_number,
            order.restaurant_id,
            order.subtotal,
            order.total_amount
        );

        self.with_items(order).await
    }

    /// All orders of one restaurant with their lines, newest first
    pub async fn list_restaurant_orders(
        &self,
        restaurant_id: Uuid,
    ) -> Result<Vec<OrderResponse>, OrderError> {
        let orders = self.orders_repo.find_by_restaurant(restaurant_id).await?;
        let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let mut items = self.order_items_repo.find_by_order_ids(&ids).await?;

        Ok(orders
            .into_iter()
            .map(|order| {
                let lines = items.remove(&order.id).unwrap_or_default();
                OrderResponse { order, items: lines }
            })
            .collect())
    }

    pub async fn get_order(&self, order_id: Uuid) -> Result<OrderResponse, OrderError> {
        let order = self.find(order_id).await?;
        self.with_items(order).await
    }

    /// Move an order to `new_status` if the lifecycle allows it
    pub async fn update_order_status(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
        now: NaiveDateTime,
    ) -> Result<OrderResponse, OrderError> {
        let order = self.find(order_id).await?;

        StatusMachine::transition(order.order_status, new_status)
            .map_err(OrderError::InvalidTransition)?;

        let updated = self
            .orders_repo
            .update_status(order_id, new_status, now)
            .await?;

        tracing::info!(
            "Order {} moved from {} to {}",
            updated.order_number,
            order.order_status,
            new_status
        );
        self.with_items(updated).await
    }

    pub async fn assign_delivery_partner(
        &self,
        order_id: Uuid,
        delivery_partner_id: Uuid,
        now: NaiveDateTime,
    ) -> Result<OrderResponse, OrderError> {
        let order = self.find(order_id).await?;

        if order.order_status.is_terminal() {
            return Err(OrderError::InvalidTransition(format!(
                "Cannot assign a delivery partner to a {} order",
                order.order_status
            )));
        }

        let updated = self
            .orders_repo
            .assign_delivery_partner(order_id, delivery_partner_id, now)
            .await?;

        tracing::info!(
            "Assigned delivery partner {} to order {}",
            delivery_partner_id,
            updated.order_number
        );
        self.with_items(updated).await
    }

    pub async fn cancel_order(
        &self,
        order_id: Uuid,
        reason: &str,
        now: NaiveDateTime,
    ) -> Result<OrderResponse, OrderError> {
        let order = self.find(order_id).await?;

        StatusMachine::transition(order.order_status, OrderStatus::Cancelled)
            .map_err(OrderError::InvalidTransition)?;

        let updated = self.orders_repo.cancel(order_id, reason, now).await?;

        tracing::info!("Cancelled order {}: {}", updated.order_number, reason);
        self.with_items(updated).await
    }

    async fn find(&self, order_id: Uuid) -> Result<Order, OrderError> {
        self.orders_repo
            .find_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound)
    }

    async fn with_items(&self, order: Order) -> Result<OrderResponse, OrderError> {
        let items = self.order_items_repo.find_by_order_id(order.id).await?;
        Ok(OrderResponse { order, items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn defaults() -> PricingPolicy {
        PricingPolicy {
            tax_percentage: dec!(18),
            delivery_fee: dec!(50),
            min_order_amount: dec!(100),
        }
    }

    fn restaurant(fee: Option<Decimal>, minimum: Option<Decimal>) -> Restaurant {
        let now = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Restaurant {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "Dosa Corner".to_string(),
            description: None,
            phone: "9876543210".to_string(),
            city: "Chennai".to_string(),
            postal_code: "600001".to_string(),
            cuisine_type: None,
            min_order_amount: minimum,
            delivery_fee: fee,
            is_open: true,
            opening_time: None,
            closing_time: None,
            payment_methods: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_order_number_format() {
        let now = NaiveDate::from_ymd_opt(2024, 6, 5)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap();
        let number = generate_order_number(now);

        assert_eq!(number.len(), 16);
        assert!(number.starts_with("UK20240605"));
        assert!(number[10..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_pricing_defaults_without_restaurant() {
        assert_eq!(defaults().for_restaurant(None), defaults());
    }

    #[test]
    fn test_restaurant_overrides_fee_and_minimum() {
        let r = restaurant(Some(dec!(20)), Some(dec!(250)));
        let pricing = defaults().for_restaurant(Some(&r));

        assert_eq!(pricing.delivery_fee, dec!(20));
        assert_eq!(pricing.min_order_amount, dec!(250));
        assert_eq!(pricing.tax_percentage, dec!(18));
    }

    #[test]
    fn test_restaurant_without_overrides_uses_defaults() {
        let r = restaurant(None, None);
        assert_eq!(defaults().for_restaurant(Some(&r)), defaults());
    }

    #[test]
    fn test_closed_restaurant_rejects_orders() {
        let mut r = restaurant(None, None);
        r.is_open = false;

        let result = ensure_accepting(Some(&r), PaymentMethod::Cash);
        assert!(matches!(result, Err(OrderError::RestaurantClosed(name)) if name == "Dosa Corner"));
    }

    #[test]
    fn test_unaccepted_payment_method_rejected() {
        let mut r = restaurant(None, None);
        r.payment_methods = vec![PaymentMethod::Upi];

        assert!(ensure_accepting(Some(&r), PaymentMethod::Upi).is_ok());
        assert!(matches!(
            ensure_accepting(Some(&r), PaymentMethod::Card),
            Err(OrderError::PaymentMethodNotAccepted(PaymentMethod::Card))
        ));
        assert!(ensure_accepting(None, PaymentMethod::Card).is_ok());
    }

    #[test]
    fn test_policy_from_settings() {
        let settings = Settings::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://localhost/kart".to_string()),
            "GST_PERCENTAGE" => Some("5".to_string()),
            _ => None,
        })
        .unwrap();

        let policy = PricingPolicy::from_settings(&settings);
        assert_eq!(policy.tax_percentage, dec!(5));
        assert_eq!(policy.delivery_fee, dec!(50.0));
        assert_eq!(policy.min_order_amount, dec!(100.0));
    }
}
