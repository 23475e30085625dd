//! Persisted customer ↔ product relation.
//!
//! Every function takes any [`ConnectionTrait`], so callers choose between the
//! shared connection and an open transaction. Soft-deleted rows are invisible
//! to every query here.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, SqlErr,
    ActiveValue::{NotSet, Set},
    sea_query::Expr,
};

use crate::{
    entity::favorites::{ActiveModel, Column, Entity as Favorites, Model as FavoriteModel},
    error::{AppError, AppResult},
    models::Favorite,
};

/// Insert a live favorite. A concurrent insert of the same live pair loses
/// to the partial unique index and surfaces as [`AppError::DuplicateFavorite`].
pub async fn create<C: ConnectionTrait>(
    db: &C,
    customer_id: i32,
    product_id: i64,
) -> AppResult<Favorite> {
    let active = ActiveModel {
        id: NotSet,
        customer_id: Set(customer_id),
        product_id: Set(product_id),
        created_at: Set(Utc::now()),
        deleted_at: Set(None),
    };

    match active.insert(db).await {
        Ok(model) => Ok(favorite_from_entity(model)),
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Err(AppError::DuplicateFavorite)
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<Favorite>> {
    let favorite = Favorites::find_by_id(id)
        .filter(Column::DeletedAt.is_null())
        .one(db)
        .await?
        .map(favorite_from_entity);
    Ok(favorite)
}

pub async fn find_by_customer_and_product<C: ConnectionTrait>(
    db: &C,
    customer_id: i32,
    product_id: i64,
) -> AppResult<Option<Favorite>> {
    let favorite = Favorites::find()
        .filter(Column::CustomerId.eq(customer_id))
        .filter(Column::ProductId.eq(product_id))
        .filter(Column::DeletedAt.is_null())
        .one(db)
        .await?
        .map(favorite_from_entity);
    Ok(favorite)
}

/// Live favorites of a customer, newest first.
pub async fn list_by_customer<C: ConnectionTrait>(
    db: &C,
    customer_id: i32,
) -> AppResult<Vec<Favorite>> {
    let favorites = Favorites::find()
        .filter(Column::CustomerId.eq(customer_id))
        .filter(Column::DeletedAt.is_null())
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(favorite_from_entity)
        .collect();
    Ok(favorites)
}

pub async fn exists_active<C: ConnectionTrait>(
    db: &C,
    customer_id: i32,
    product_id: i64,
) -> AppResult<bool> {
    let count = Favorites::find()
        .filter(Column::CustomerId.eq(customer_id))
        .filter(Column::ProductId.eq(product_id))
        .filter(Column::DeletedAt.is_null())
        .count(db)
        .await?;
    Ok(count > 0)
}

pub async fn count_active_for_customer<C: ConnectionTrait>(
    db: &C,
    customer_id: i32,
) -> AppResult<u64> {
    let count = Favorites::find()
        .filter(Column::CustomerId.eq(customer_id))
        .filter(Column::DeletedAt.is_null())
        .count(db)
        .await?;
    Ok(count)
}

/// Live favorite counts per customer. Customers without favorites are absent.
pub async fn count_active_by_customer<C: ConnectionTrait>(db: &C) -> AppResult<Vec<(i32, i64)>> {
    let counts = Favorites::find()
        .select_only()
        .column(Column::CustomerId)
        .column_as(Column::Id.count(), "favorites_count")
        .filter(Column::DeletedAt.is_null())
        .group_by(Column::CustomerId)
        .into_tuple::<(i32, i64)>()
        .all(db)
        .await?;
    Ok(counts)
}

/// Mark one live favorite deleted. Returns `false` if no live row matched.
pub async fn soft_delete<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<bool> {
    let result = Favorites::update_many()
        .col_expr(Column::DeletedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id))
        .filter(Column::DeletedAt.is_null())
        .exec(db)
        .await?;
    Ok(result.rows_affected == 1)
}

/// Mark every live favorite of a customer deleted; returns how many were.
pub async fn soft_delete_all_for_customer<C: ConnectionTrait>(
    db: &C,
    customer_id: i32,
) -> AppResult<u64> {
    let result = Favorites::update_many()
        .col_expr(Column::DeletedAt, Expr::value(Utc::now()))
        .filter(Column::CustomerId.eq(customer_id))
        .filter(Column::DeletedAt.is_null())
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

fn favorite_from_entity(model: FavoriteModel) -> Favorite {
    Favorite {
        id: model.id,
        customer_id: model.customer_id,
        product_id: model.product_id,
        created_at: model.created_at,
    }
}
