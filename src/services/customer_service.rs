use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, SqlErr, TransactionTrait,
    ActiveValue::Set,
    sea_query::{Expr, LockType},
};

use crate::{
    dto::customers::{
        CustomerList, CustomerProfile, CustomerSummary, DeletedCustomer, UpdateProfileRequest,
    },
    entity::customers::{ActiveModel, Column, Entity as Customers, Model as CustomerModel},
    error::{AppError, AppResult},
    middleware::auth::AuthCustomer,
    models::Customer,
    response::{ApiResponse, Meta},
    services::{favorite_store, favorite_views},
    state::AppState,
};

pub async fn find_active<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<CustomerModel>> {
    let customer = Customers::find_by_id(id)
        .filter(Column::DeletedAt.is_null())
        .one(db)
        .await?;
    Ok(customer)
}

/// [`find_active`] that also row-locks the customer until the surrounding
/// transaction ends. `LockType::Share` lets favorite writers run side by side
/// while keeping out a concurrent deletion, which takes `LockType::Update`.
/// Backends without row locks (SQLite) ignore the clause.
pub async fn lock_active<C: ConnectionTrait>(
    db: &C,
    id: i32,
    lock: LockType,
) -> AppResult<Option<CustomerModel>> {
    let customer = Customers::find_by_id(id)
        .filter(Column::DeletedAt.is_null())
        .lock(lock)
        .one(db)
        .await?;
    Ok(customer)
}

pub async fn get_profile(
    state: &AppState,
    customer: &AuthCustomer,
) -> AppResult<ApiResponse<CustomerProfile>> {
    let model = find_active(&state.orm, customer.customer_id)
        .await?
        .ok_or(AppError::CustomerNotFound)?;
    let favorites =
        favorite_views::views_for_customer(&state.orm, &state.catalog, customer.customer_id)
            .await?;

    let data = CustomerProfile {
        customer: customer_from_entity(model),
        favorites,
    };
    Ok(ApiResponse::success(
        "Profile with favorites successfully obtained",
        data,
        Some(Meta::empty()),
    ))
}

pub async fn update_profile(
    state: &AppState,
    customer: &AuthCustomer,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<Customer>> {
    let name = payload.name.map(|n| n.trim().to_string());
    let email = payload.email.map(|e| e.trim().to_lowercase());

    if let Some(name) = name.as_deref() {
        if name.is_empty() {
            return Err(AppError::BadRequest("name must not be empty".into()));
        }
        check_length("name", name)?;
    }
    if let Some(email) = email.as_deref() {
        check_length("email", email)?;
        validate_email(email)?;
        let taken = Customers::find()
            .filter(Column::Email.eq(email))
            .filter(Column::Id.ne(customer.customer_id))
            .filter(Column::DeletedAt.is_null())
            .one(&state.orm)
            .await?;
        if taken.is_some() {
            return Err(AppError::BadRequest("Email is already taken".into()));
        }
    }

    let existing = find_active(&state.orm, customer.customer_id)
        .await?
        .ok_or(AppError::CustomerNotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = name {
        active.name = Set(name);
    }
    if let Some(email) = email {
        active.email = Set(email);
    }
    active.updated_at = Set(Utc::now());

    let updated = match active.update(&state.orm).await {
        Ok(model) => model,
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Err(AppError::BadRequest("Email is already taken".into()));
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!(customer_id = updated.id, "profile updated");

    Ok(ApiResponse::success(
        "Profile updated",
        customer_from_entity(updated),
        Some(Meta::empty()),
    ))
}

/// Live customers, newest first, with their live favorite counts.
pub async fn list_customers(state: &AppState) -> AppResult<ApiResponse<CustomerList>> {
    let counts: std::collections::HashMap<i32, i64> =
        favorite_store::count_active_by_customer(&state.orm)
            .await?
            .into_iter()
            .collect();

    let items: Vec<CustomerSummary> = Customers::find()
        .filter(Column::DeletedAt.is_null())
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|model| CustomerSummary {
            favorites_count: counts.get(&model.id).copied().unwrap_or(0),
            id: model.id,
            name: model.name,
            email: model.email,
            created_at: model.created_at,
        })
        .collect();

    let meta = Meta::total(items.len() as i64);
    Ok(ApiResponse::success(
        "Customers",
        CustomerList { items },
        Some(meta),
    ))
}

/// Soft-delete a customer together with all of their live favorites.
///
/// A customer cannot delete themselves through this path. The favorite count,
/// the favorite cascade and the customer update commit together or not at
/// all; the reported count is the one read inside the transaction before
/// anything was deleted.
pub async fn delete_customer(
    state: &AppState,
    customer_id: i32,
    requesting: &AuthCustomer,
) -> AppResult<ApiResponse<DeletedCustomer>> {
    if customer_id == requesting.customer_id {
        return Err(AppError::SelfDeletionForbidden);
    }

    let txn = state.orm.begin().await?;

    // Held until commit; favorite adds for this customer wait on it.
    let customer = lock_active(&txn, customer_id, LockType::Update)
        .await?
        .ok_or(AppError::CustomerNotFound)?;

    let removed_favorites = favorite_store::count_active_for_customer(&txn, customer_id).await?;
    favorite_store::soft_delete_all_for_customer(&txn, customer_id).await?;

    let now = Utc::now();
    let result = Customers::update_many()
        .col_expr(Column::DeletedAt, Expr::value(now))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::Id.eq(customer_id))
        .filter(Column::DeletedAt.is_null())
        .exec(&txn)
        .await?;
    if result.rows_affected != 1 {
        return Err(AppError::CustomerNotFound);
    }

    txn.commit().await?;

    tracing::info!(
        customer_id,
        deleted_by = requesting.customer_id,
        removed_favorites,
        "customer deleted"
    );

    let message = format!(
        "Customer '{}' successfully deleted. {} favorites removed.",
        customer.name, removed_favorites
    );
    let data = DeletedCustomer {
        customer_id,
        customer_name: customer.name,
        removed_favorites,
    };
    Ok(ApiResponse::success(message, data, Some(Meta::empty())))
}

const MAX_FIELD_CHARS: usize = 255;

fn check_length(field: &str, value: &str) -> AppResult<()> {
    if value.chars().count() > MAX_FIELD_CHARS {
        return Err(AppError::BadRequest(format!(
            "{field} may not be greater than {MAX_FIELD_CHARS} characters"
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> AppResult<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid email".into()))
    }
}

fn customer_from_entity(model: CustomerModel) -> Customer {
    Customer {
        id: model.id,
        name: model.name,
        email: model.email,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
