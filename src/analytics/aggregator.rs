use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::analytics::{AnalyticsPeriod, AnalyticsReport, OrderItemRecord, OrderRecord, TopItem};

/// Number of food items reported in `top_items`
pub const TOP_ITEMS_LIMIT: usize = 5;

/// Pure aggregation of order records into an analytics report
pub struct AnalyticsAggregator;

impl AnalyticsAggregator {
    /// Summarise `orders` of one restaurant created on or after the start of `period`.
    ///
    /// `items` may contain rows of any order; only those belonging to an order
    /// inside the window are ranked. Unknown periods report `today`, while the
    /// report echoes the period string exactly as given.
    pub fn aggregate(
        restaurant_id: Uuid,
        period: &str,
        now: NaiveDateTime,
        orders: &[OrderRecord],
        items: &[OrderItemRecord],
    ) -> AnalyticsReport {
        let start = AnalyticsPeriod::parse_lenient(period).window_start(now);

        let in_window: Vec<&OrderRecord> = orders
            .iter()
            .filter(|o| o.restaurant_id == restaurant_id && o.created_at >= start)
            .collect();

        let order_count = in_window.len() as i64;
        let revenue: Decimal = in_window.iter().map(|o| o.total_amount).sum();
        let avg_order_value = if order_count > 0 {
            round_money(revenue / Decimal::from(order_count))
        } else {
            Decimal::ZERO
        };

        let customers = in_window
            .iter()
            .map(|o| o.customer_id)
            .collect::<HashSet<_>>()
            .len() as i64;

        let ratings: Vec<i32> = in_window.iter().filter_map(|o| o.rating).collect();
        let total_ratings = ratings.len() as i64;
        let rating = if total_ratings > 0 {
            let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
            round_money(Decimal::from(sum) / Decimal::from(total_ratings))
        } else {
            Decimal::ZERO
        };

        let order_ids: HashSet<Uuid> = in_window.iter().map(|o| o.id).collect();
        let top_items = Self::rank_items(&order_ids, items);

        AnalyticsReport {
            period: period.to_string(),
            revenue,
            orders: order_count,
            avg_order_value,
            customers,
            rating,
            total_ratings,
            top_items,
        }
    }

    /// Sum quantity and revenue per food item, highest quantity first.
    /// Ties keep the order in which items were first seen.
    fn rank_items(order_ids: &HashSet<Uuid>, items: &[OrderItemRecord]) -> Vec<TopItem> {
        let mut ranked: Vec<TopItem> = Vec::new();
        let mut positions: HashMap<Uuid, usize> = HashMap::new();

        for item in items.iter().filter(|i| order_ids.contains(&i.order_id)) {
            match positions.get(&item.food_item_id) {
                Some(&idx) => {
                    ranked[idx].orders += i64::from(item.quantity);
                    ranked[idx].revenue += item.total_price;
                }
                None => {
                    positions.insert(item.food_item_id, ranked.len());
                    ranked.push(TopItem {
                        food_item_id: item.food_item_id,
                        orders: i64::from(item.quantity),
                        revenue: item.total_price,
                    });
                }
            }
        }

        // sort_by is stable
        ranked.sort_by(|a, b| b.orders.cmp(&a.orders));
        ranked.truncate(TOP_ITEMS_LIMIT);
        ranked
    }
}

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn at(d: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, d)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn order(
        restaurant_id: Uuid,
        customer_id: Uuid,
        total: Decimal,
        rating: Option<i32>,
        created_at: NaiveDateTime,
    ) -> OrderRecord {
        OrderRecord {
            id: Uuid::new_v4(),
            restaurant_id,
            customer_id,
            total_amount: total,
            rating,
            created_at,
        }
    }

    fn item(order_id: Uuid, food_item_id: Uuid, quantity: i32, total: Decimal) -> OrderItemRecord {
        OrderItemRecord {
            order_id,
            food_item_id,
            quantity,
            total_price: total,
        }
    }

    #[test]
    fn test_empty_window_reports_zeros() {
        let report =
            AnalyticsAggregator::aggregate(Uuid::new_v4(), "today", at(13, 12, 0, 0), &[], &[]);

        assert_eq!(report.period, "today");
        assert_eq!(report.revenue, Decimal::ZERO);
        assert_eq!(report.orders, 0);
        assert_eq!(report.avg_order_value, Decimal::ZERO);
        assert_eq!(report.customers, 0);
        assert_eq!(report.rating, Decimal::ZERO);
        assert_eq!(report.total_ratings, 0);
        assert!(report.top_items.is_empty());
    }

    #[test]
    fn test_today_boundary_at_midnight() {
        let restaurant = Uuid::new_v4();
        let customer = Uuid::new_v4();
        let orders = vec![
            order(restaurant, customer, dec!(100.00), None, at(12, 23, 59, 59)),
            order(restaurant, customer, dec!(250.00), None, at(13, 0, 0, 1)),
        ];

        let report =
            AnalyticsAggregator::aggregate(restaurant, "today", at(13, 18, 0, 0), &orders, &[]);

        assert_eq!(report.orders, 1);
        assert_eq!(report.revenue, dec!(250.00));
    }

    #[test]
    fn test_other_restaurants_are_ignored() {
        let restaurant = Uuid::new_v4();
        let orders = vec![
            order(restaurant, Uuid::new_v4(), dec!(100), None, at(13, 9, 0, 0)),
            order(Uuid::new_v4(), Uuid::new_v4(), dec!(900), None, at(13, 9, 0, 0)),
        ];

        let report =
            AnalyticsAggregator::aggregate(restaurant, "today", at(13, 18, 0, 0), &orders, &[]);

        assert_eq!(report.orders, 1);
        assert_eq!(report.revenue, dec!(100));
    }

    #[test]
    fn test_averages_and_distinct_customers() {
        let restaurant = Uuid::new_v4();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let orders = vec![
            order(restaurant, alice, dec!(100.00), Some(5), at(13, 9, 0, 0)),
            order(restaurant, alice, dec!(200.00), Some(4), at(13, 10, 0, 0)),
            order(restaurant, bob, dec!(100.00), None, at(13, 11, 0, 0)),
        ];

        let report =
            AnalyticsAggregator::aggregate(restaurant, "today", at(13, 18, 0, 0), &orders, &[]);

        assert_eq!(report.orders, 3);
        assert_eq!(report.revenue, dec!(400.00));
        assert_eq!(report.avg_order_value, dec!(133.33));
        assert_eq!(report.customers, 2);
        assert_eq!(report.total_ratings, 2);
        assert_eq!(report.rating, dec!(4.50));
    }

    #[test]
    fn test_rating_average_rounds_to_two_places() {
        let restaurant = Uuid::new_v4();
        let orders = vec![
            order(restaurant, Uuid::new_v4(), dec!(10), Some(5), at(13, 9, 0, 0)),
            order(restaurant, Uuid::new_v4(), dec!(10), Some(4), at(13, 9, 0, 0)),
            order(restaurant, Uuid::new_v4(), dec!(10), Some(4), at(13, 9, 0, 0)),
        ];

        let report =
            AnalyticsAggregator::aggregate(restaurant, "today", at(13, 18, 0, 0), &orders, &[]);

        assert_eq!(report.rating, dec!(4.33));
    }

    #[test]
    fn test_top_items_ranked_by_quantity_with_stable_ties() {
        let restaurant = Uuid::new_v4();
        let first = order(restaurant, Uuid::new_v4(), dec!(500), None, at(13, 9, 0, 0));
        let second = order(restaurant, Uuid::new_v4(), dec!(500), None, at(13, 10, 0, 0));

        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let items = vec![
            item(first.id, b, 7, dec!(70)),
            item(first.id, a, 4, dec!(40)),
            item(second.id, a, 6, dec!(60)),
            item(second.id, c, 7, dec!(140)),
        ];

        let report = AnalyticsAggregator::aggregate(
            restaurant,
            "today",
            at(13, 18, 0, 0),
            &[first, second],
            &items,
        );

        let ranking: Vec<(Uuid, i64, Decimal)> = report
            .top_items
            .iter()
            .map(|t| (t.food_item_id, t.orders, t.revenue))
            .collect();
        assert_eq!(
            ranking,
            vec![(a, 10, dec!(100)), (b, 7, dec!(70)), (c, 7, dec!(140))]
        );
    }

    #[test]
    fn test_top_items_limited_to_five() {
        let restaurant = Uuid::new_v4();
        let o = order(restaurant, Uuid::new_v4(), dec!(500), None, at(13, 9, 0, 0));
        let items: Vec<OrderItemRecord> = (1..=8)
            .map(|q| item(o.id, Uuid::new_v4(), q, Decimal::from(q * 10)))
            .collect();

        let report =
            AnalyticsAggregator::aggregate(restaurant, "today", at(13, 18, 0, 0), &[o], &items);

        let quantities: Vec<i64> = report.top_items.iter().map(|t| t.orders).collect();
        assert_eq!(quantities, vec![8, 7, 6, 5, 4]);
    }

    #[test]
    fn test_items_outside_window_are_not_ranked() {
        let restaurant = Uuid::new_v4();
        let old = order(restaurant, Uuid::new_v4(), dec!(100), None, at(12, 20, 0, 0));
        let fresh = order(restaurant, Uuid::new_v4(), dec!(100), None, at(13, 9, 0, 0));
        let dish = Uuid::new_v4();
        let items = vec![item(old.id, dish, 9, dec!(90)), item(fresh.id, dish, 1, dec!(10))];

        let report = AnalyticsAggregator::aggregate(
            restaurant,
            "today",
            at(13, 18, 0, 0),
            &[old, fresh],
            &items,
        );

        assert_eq!(report.top_items.len(), 1);
        assert_eq!(report.top_items[0].orders, 1);
        assert_eq!(report.top_items[0].revenue, dec!(10));
    }

    #[test]
    fn test_week_window_includes_monday() {
        let restaurant = Uuid::new_v4();
        // Thursday 13th; the week opened Monday 10th
        let orders = vec![
            order(restaurant, Uuid::new_v4(), dec!(10), None, at(9, 23, 0, 0)),
            order(restaurant, Uuid::new_v4(), dec!(20), None, at(10, 0, 0, 0)),
            order(restaurant, Uuid::new_v4(), dec!(30), None, at(12, 12, 0, 0)),
        ];

        let report =
            AnalyticsAggregator::aggregate(restaurant, "week", at(13, 18, 0, 0), &orders, &[]);

        assert_eq!(report.orders, 2);
        assert_eq!(report.revenue, dec!(50));
    }

    #[test]
    fn test_unknown_period_reports_today_and_echoes_input() {
        let restaurant = Uuid::new_v4();
        let orders = vec![
            order(restaurant, Uuid::new_v4(), dec!(10), None, at(12, 12, 0, 0)),
            order(restaurant, Uuid::new_v4(), dec!(20), None, at(13, 12, 0, 0)),
        ];

        let report = AnalyticsAggregator::aggregate(
            restaurant,
            "fortnight",
            at(13, 18, 0, 0),
            &orders,
            &[],
        );

        assert_eq!(report.period, "fortnight");
        assert_eq!(report.orders, 1);
        assert_eq!(report.revenue, dec!(20));
    }
}
