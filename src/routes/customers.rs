use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};

use crate::{
    dto::customers::{CustomerList, CustomerProfile, DeletedCustomer, UpdateProfileRequest},
    error::AppResult,
    middleware::auth::AuthCustomer,
    models::Customer,
    response::ApiResponse,
    services::customer_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(profile).put(update_profile))
        .route("/all", get(list_customers))
        .route("/{id}", delete(delete_customer))
}

#[utoipa::path(
    get,
    path = "/api/customer",
    responses(
        (status = 200, description = "Current customer with favorites", body = ApiResponse<CustomerProfile>)
    ),
    security(("bearer_auth" = [])),
    tag = "Customer"
)]
pub async fn profile(
    State(state): State<AppState>,
    customer: AuthCustomer,
) -> AppResult<Json<ApiResponse<CustomerProfile>>> {
    let response = customer_service::get_profile(&state, &customer).await?;
    Ok(Json(response))
}

#[utoipa::path(
    put,
    path = "/api/customer",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<Customer>),
        (status = 400, description = "Invalid or taken email")
    ),
    security(("bearer_auth" = [])),
    tag = "Customer"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    customer: AuthCustomer,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    let response = customer_service::update_profile(&state, &customer, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/customer/all",
    responses(
        (status = 200, description = "Active customers with favorite counts", body = ApiResponse<CustomerList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Customer"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    _customer: AuthCustomer,
) -> AppResult<Json<ApiResponse<CustomerList>>> {
    let response = customer_service::list_customers(&state).await?;
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/api/customer/{id}",
    params(
        ("id" = i32, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Customer and favorites deleted", body = ApiResponse<DeletedCustomer>),
        (status = 403, description = "Customers cannot delete themselves"),
        (status = 404, description = "Customer not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Customer"
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    customer: AuthCustomer,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<DeletedCustomer>>> {
    let response = customer_service::delete_customer(&state, id, &customer).await?;
    Ok(Json(response))
}
