use crate::{
    dto::products::ProductList,
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_products(state: &AppState) -> AppResult<ApiResponse<ProductList>> {
    let items = state.catalog.get_all().await;
    Ok(products_response("Products successfully obtained.", items))
}

pub async fn get_product(state: &AppState, id: i64) -> AppResult<ApiResponse<Product>> {
    let product = state
        .catalog
        .get_by_id(id)
        .await
        .ok_or(AppError::ProductNotFound)?;
    Ok(ApiResponse::success(
        "Product obtained successfully.",
        product,
        Some(Meta::empty()),
    ))
}

pub async fn list_by_category(
    state: &AppState,
    category: &str,
) -> AppResult<ApiResponse<ProductList>> {
    let items = state.catalog.get_by_category(category).await;
    Ok(products_response(
        "Category products successfully obtained.",
        items,
    ))
}

pub async fn search_products(state: &AppState, query: &str) -> AppResult<ApiResponse<ProductList>> {
    if query.trim().is_empty() {
        return Err(AppError::BadRequest("q must not be empty".into()));
    }
    let items = state.catalog.search_by_text(query).await;
    Ok(products_response(
        "Product search completed successfully.",
        items,
    ))
}

fn products_response(message: &str, items: Vec<Product>) -> ApiResponse<ProductList> {
    let meta = Meta::total(items.len() as i64);
    ApiResponse::success(message, ProductList { items }, Some(meta))
}
