//! Restaurant storefront entity.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// A restaurant storefront, listed publicly in name order.
#[derive(Debug, Clone, Serialize)]
pub struct Restaurant {
    pub id: i64,
    /// Unique name; the sort key for cursor pagination.
    pub name: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Restaurant response for list endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RestaurantResponse {
    #[schema(example = 7)]
    pub id: i64,
    #[schema(example = "Trattoria Roma")]
    pub name: String,
}

impl From<Restaurant> for RestaurantResponse {
    fn from(restaurant: Restaurant) -> Self {
        Self {
            id: restaurant.id,
            name: restaurant.name,
        }
    }
}
