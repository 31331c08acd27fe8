//! Restaurant repository - keyset listing over the name-ordered table.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::domain::Restaurant;
use crate::errors::AppResult;
use crate::types::Direction;

use super::entities::restaurant::{Column, Entity as RestaurantEntity, Model};

/// Read contract for restaurant listings.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Fetch one keyset window, in query order.
    ///
    /// `Next` selects names strictly greater than the cursor, ascending;
    /// `Prev` selects names strictly smaller, descending. The caller asks
    /// for `limit + 1` rows to detect overflow, so implementations must not
    /// cap `fetch` themselves.
    async fn list_page(
        &self,
        fetch: u64,
        cursor: Option<String>,
        direction: Direction,
    ) -> AppResult<Vec<Restaurant>>;
}

/// SeaORM-backed implementation of [`RestaurantRepository`].
pub struct RestaurantStore {
    db: DatabaseConnection,
}

impl RestaurantStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_entity(model: Model) -> Restaurant {
    Restaurant {
        id: model.id,
        name: model.name,
        owner_id: model.owner_id,
        created_at: model.created_at,
    }
}

#[async_trait]
impl RestaurantRepository for RestaurantStore {
    async fn list_page(
        &self,
        fetch: u64,
        cursor: Option<String>,
        direction: Direction,
    ) -> AppResult<Vec<Restaurant>> {
        let mut query = RestaurantEntity::find();

        match direction {
            Direction::Next => {
                if let Some(cursor) = cursor {
                    query = query.filter(Column::Name.gt(cursor));
                }
                query = query.order_by_asc(Column::Name);
            }
            Direction::Prev => {
                if let Some(cursor) = cursor {
                    query = query.filter(Column::Name.lt(cursor));
                }
                query = query.order_by_desc(Column::Name);
            }
        }

        let models = query.limit(fetch).all(&self.db).await?;
        Ok(models.into_iter().map(to_entity).collect())
    }
}
