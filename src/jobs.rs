// Background maintenance tasks spawned at startup

use std::time::Duration;

use chrono::Local;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::coupons::CouponService;

/// Periodically deactivate coupons whose validity window has closed.
///
/// The first sweep runs immediately; failures are logged and retried on the
/// next tick.
pub fn spawn_coupon_expiry_sweep(service: CouponService, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match service.expire_coupons(Local::now().naive_local()).await {
                Ok(0) => tracing::debug!("Coupon expiry sweep: nothing to deactivate"),
                Ok(count) => tracing::info!("Coupon expiry sweep deactivated {} coupons", count),
                Err(e) => tracing::error!("Coupon expiry sweep failed: {}", e),
            }
        }
    })
}
