use sea_orm::{TransactionTrait, sea_query::LockType};

use crate::{
    dto::favorites::{AddFavoriteRequest, FavoriteCheck, FavoriteList, RemovedFavorite},
    error::{AppError, AppResult},
    middleware::auth::AuthCustomer,
    models::{Favorite, FavoriteView},
    response::{ApiResponse, Meta},
    services::{customer_service, favorite_store, favorite_views},
    state::AppState,
};

/// Add a catalog product to the customer's favorites.
///
/// The product must resolve through the catalog cache. The customer must
/// still be active inside the transaction, otherwise
/// [`AppError::CustomerNotFound`]. The duplicate check and the insert share
/// one transaction; a concurrent duplicate that slips past
/// the check is rejected by the live-pair unique index and reported the same
/// way.
pub async fn add_to_favorites(
    state: &AppState,
    customer: &AuthCustomer,
    payload: AddFavoriteRequest,
) -> AppResult<ApiResponse<FavoriteView>> {
    if payload.product_id <= 0 {
        return Err(AppError::BadRequest("product_id must be positive".into()));
    }

    // Resolved before the transaction opens so no connection waits on the catalog.
    let product = state
        .catalog
        .get_by_id(payload.product_id)
        .await
        .ok_or(AppError::ProductNotFound)?;

    let txn = state.orm.begin().await?;
    // The token was checked before this transaction; a deletion may have
    // committed since. The shared lock holds off one that has not.
    if customer_service::lock_active(&txn, customer.customer_id, LockType::Share)
        .await?
        .is_none()
    {
        return Err(AppError::CustomerNotFound);
    }
    if favorite_store::exists_active(&txn, customer.customer_id, product.id).await? {
        return Err(AppError::DuplicateFavorite);
    }
    let favorite = favorite_store::create(&txn, customer.customer_id, product.id).await?;
    txn.commit().await?;

    tracing::info!(
        customer_id = customer.customer_id,
        product_id = product.id,
        favorite_id = favorite.id,
        "favorite added"
    );

    let message = format!("Product '{}' added to favorites.", product.title);
    let view = FavoriteView {
        favorite,
        product: Some(product),
    };
    Ok(ApiResponse::success(message, view, Some(Meta::empty())))
}

pub async fn remove_from_favorites(
    state: &AppState,
    customer: &AuthCustomer,
    favorite_id: i32,
) -> AppResult<ApiResponse<RemovedFavorite>> {
    let favorite = favorite_store::find_by_id(&state.orm, favorite_id)
        .await?
        .filter(|f| f.customer_id == customer.customer_id)
        .ok_or(AppError::FavoriteNotFound)?;

    remove(state, favorite).await
}

pub async fn remove_from_favorites_by_product(
    state: &AppState,
    customer: &AuthCustomer,
    product_id: i64,
) -> AppResult<ApiResponse<RemovedFavorite>> {
    let favorite =
        favorite_store::find_by_customer_and_product(&state.orm, customer.customer_id, product_id)
            .await?
            .ok_or(AppError::FavoriteNotFound)?;

    remove(state, favorite).await
}

async fn remove(state: &AppState, favorite: Favorite) -> AppResult<ApiResponse<RemovedFavorite>> {
    // Only used for the message; a missing product never blocks removal.
    let title = state
        .catalog
        .get_by_id(favorite.product_id)
        .await
        .map(|p| p.title);

    // A single conditional update; losing a race to another removal is NotFound.
    if !favorite_store::soft_delete(&state.orm, favorite.id).await? {
        return Err(AppError::FavoriteNotFound);
    }

    tracing::info!(
        customer_id = favorite.customer_id,
        product_id = favorite.product_id,
        favorite_id = favorite.id,
        "favorite removed"
    );

    let message = match title {
        Some(title) => format!("Product '{title}' removed from favorites."),
        None => "Product removed from favorites.".to_string(),
    };
    let data = RemovedFavorite {
        favorite_id: favorite.id,
        product_id: favorite.product_id,
    };
    Ok(ApiResponse::success(message, data, Some(Meta::empty())))
}

pub async fn list_favorites(
    state: &AppState,
    customer: &AuthCustomer,
) -> AppResult<ApiResponse<FavoriteList>> {
    let items =
        favorite_views::views_for_customer(&state.orm, &state.catalog, customer.customer_id)
            .await?;
    let meta = Meta::total(items.len() as i64);
    Ok(ApiResponse::success(
        "Favorites successfully obtained.",
        FavoriteList { items },
        Some(meta),
    ))
}

pub async fn is_favorite(
    state: &AppState,
    customer: &AuthCustomer,
    product_id: i64,
) -> AppResult<ApiResponse<FavoriteCheck>> {
    let is_in_favorites =
        favorite_store::exists_active(&state.orm, customer.customer_id, product_id).await?;
    let message = if is_in_favorites {
        "Product is in favorites."
    } else {
        "Product is not in favorites."
    };
    Ok(ApiResponse::success(
        message,
        FavoriteCheck {
            product_id,
            is_in_favorites,
        },
        Some(Meta::empty()),
    ))
}
