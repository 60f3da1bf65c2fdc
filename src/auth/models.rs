// Authorization data models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Roles carried in access token claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    RestaurantOwner,
    Customer,
    DeliveryPartner,
}

/// Roles allowed to manage coupons, orders and restaurant profiles
pub const STAFF_ROLES: [Role; 2] = [Role::Admin, Role::RestaurantOwner];

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Admin,
        Role::RestaurantOwner,
        Role::Customer,
        Role::DeliveryPartner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::RestaurantOwner => "restaurant_owner",
            Role::Customer => "customer",
            Role::DeliveryPartner => "delivery_partner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "restaurant_owner" => Ok(Role::RestaurantOwner),
            "customer" => Ok(Role::Customer),
            "delivery_partner" => Ok(Role::DeliveryPartner),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}
