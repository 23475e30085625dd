use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};

use crate::{
    dto::favorites::{AddFavoriteRequest, FavoriteCheck, FavoriteList, RemovedFavorite},
    error::AppResult,
    middleware::auth::AuthCustomer,
    models::FavoriteView,
    response::ApiResponse,
    services::favorite_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_favorites).post(add_favorite))
        .route("/check/{product_id}", get(check_favorite))
        .route("/product/{product_id}", delete(remove_favorite_by_product))
        .route("/{favorite_id}", delete(remove_favorite))
}

#[utoipa::path(
    post,
    path = "/api/favorites",
    request_body = AddFavoriteRequest,
    responses(
        (status = 201, description = "Added to favorites", body = ApiResponse<FavoriteView>),
        (status = 404, description = "Product not found in catalog"),
        (status = 409, description = "Product already in favorites")
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    customer: AuthCustomer,
    Json(payload): Json<AddFavoriteRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<FavoriteView>>)> {
    let response = favorite_service::add_to_favorites(&state, &customer, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/favorites",
    responses(
        (status = 200, description = "Favorites of the current customer, newest first", body = ApiResponse<FavoriteList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn list_favorites(
    State(state): State<AppState>,
    customer: AuthCustomer,
) -> AppResult<Json<ApiResponse<FavoriteList>>> {
    let response = favorite_service::list_favorites(&state, &customer).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/favorites/check/{product_id}",
    params(
        ("product_id" = i64, Path, description = "Catalog product ID")
    ),
    responses(
        (status = 200, description = "Whether the product is a favorite", body = ApiResponse<FavoriteCheck>)
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn check_favorite(
    State(state): State<AppState>,
    customer: AuthCustomer,
    Path(product_id): Path<i64>,
) -> AppResult<Json<ApiResponse<FavoriteCheck>>> {
    let response = favorite_service::is_favorite(&state, &customer, product_id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/api/favorites/{favorite_id}",
    params(
        ("favorite_id" = i32, Path, description = "Favorite ID")
    ),
    responses(
        (status = 200, description = "Removed from favorites", body = ApiResponse<RemovedFavorite>),
        (status = 404, description = "Favorite not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    customer: AuthCustomer,
    Path(favorite_id): Path<i32>,
) -> AppResult<Json<ApiResponse<RemovedFavorite>>> {
    let response = favorite_service::remove_from_favorites(&state, &customer, favorite_id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/api/favorites/product/{product_id}",
    params(
        ("product_id" = i64, Path, description = "Catalog product ID")
    ),
    responses(
        (status = 200, description = "Removed from favorites", body = ApiResponse<RemovedFavorite>),
        (status = 404, description = "Favorite not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn remove_favorite_by_product(
    State(state): State<AppState>,
    customer: AuthCustomer,
    Path(product_id): Path<i64>,
) -> AppResult<Json<ApiResponse<RemovedFavorite>>> {
    let response =
        favorite_service::remove_from_favorites_by_product(&state, &customer, product_id).await?;
    Ok(Json(response))
}
