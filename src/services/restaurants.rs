//! Restaurant listing with cursor pagination.

use std::sync::Arc;

use crate::domain::Restaurant;
use crate::errors::AppResult;
use crate::infra::RestaurantRepository;
use crate::types::{CursorPage, CursorParams};

pub struct RestaurantService {
    restaurant_repository: Arc<dyn RestaurantRepository>,
}

impl RestaurantService {
    pub fn new(restaurant_repository: Arc<dyn RestaurantRepository>) -> Self {
        Self {
            restaurant_repository,
        }
    }

    /// One keyset window of the name-ordered restaurant listing.
    pub async fn list_restaurants(
        &self,
        params: &CursorParams,
    ) -> AppResult<CursorPage<Restaurant>> {
        let rows = self
            .restaurant_repository
            .list_page(params.fetch_size(), params.cursor.clone(), params.direction())
            .await?;

        Ok(CursorPage::assemble(
            rows,
            params.limit(),
            params.cursor.is_some(),
            params.direction(),
            |restaurant| restaurant.name.clone(),
        ))
    }
}
