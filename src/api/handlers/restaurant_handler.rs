//! Restaurant listing handlers.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::AppState;
use crate::domain::RestaurantResponse;
use crate::errors::AppResult;
use crate::types::{CursorPage, CursorParams, RestaurantPage};

/// Create restaurant routes
pub fn restaurant_routes() -> Router<AppState> {
    Router::new().route("/", get(list_restaurants))
}

/// List restaurants with cursor pagination, ordered by name
#[utoipa::path(
    get,
    path = "/restaurants",
    tag = "Restaurants",
    params(CursorParams),
    responses(
        (status = 200, description = "One page of restaurants", body = RestaurantPage)
    )
)]
pub async fn list_restaurants(
    State(state): State<AppState>,
    Query(params): Query<CursorParams>,
) -> AppResult<Json<CursorPage<RestaurantResponse>>> {
    let page = state.services.restaurants.list_restaurants(&params).await?;

    Ok(Json(page.map(RestaurantResponse::from)))
}
