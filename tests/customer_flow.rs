mod common;

use catalog_favorites_api::{
    dto::{customers::UpdateProfileRequest, favorites::AddFavoriteRequest},
    error::AppError,
    middleware::auth::AuthCustomer,
    services::{customer_service, favorite_service, favorite_store},
    state::AppState,
};
use sea_orm::ConnectionTrait;

async fn favorite(state: &AppState, customer: &AuthCustomer, product_id: i64) {
    favorite_service::add_to_favorites(state, customer, AddFavoriteRequest { product_id })
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_customer_cascades_favorites() {
    let state = common::setup_state(common::default_catalog()).await.unwrap();
    let john = common::create_customer(&state, "John", "john@example.com").await.unwrap();
    let admin = common::create_customer(&state, "Admin", "admin@example.com").await.unwrap();

    favorite(&state, &john, 1).await;
    favorite(&state, &john, 2).await;
    favorite(&state, &admin, 1).await;

    let deleted = customer_service::delete_customer(&state, john.customer_id, &admin)
        .await
        .unwrap();
    assert_eq!(
        deleted.message,
        "Customer 'John' successfully deleted. 2 favorites removed."
    );
    let data = deleted.data.unwrap();
    assert_eq!(data.customer_id, john.customer_id);
    assert_eq!(data.customer_name, "John");
    assert_eq!(data.removed_favorites, 2);

    assert!(
        favorite_store::list_by_customer(&state.orm, john.customer_id)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(customer_service::find_active(&state.orm, john.customer_id).await.unwrap().is_none());

    // Other customers keep their favorites.
    assert!(favorite_store::exists_active(&state.orm, admin.customer_id, 1).await.unwrap());

    let again = customer_service::delete_customer(&state, john.customer_id, &admin).await;
    assert!(matches!(again, Err(AppError::CustomerNotFound)));
}

#[tokio::test]
async fn self_deletion_is_forbidden() {
    let state = common::setup_state(common::default_catalog()).await.unwrap();
    let john = common::create_customer(&state, "John", "john@example.com").await.unwrap();

    let result = customer_service::delete_customer(&state, john.customer_id, &john).await;
    assert!(matches!(result, Err(AppError::SelfDeletionForbidden)));

    favorite(&state, &john, 7).await;
    let result = customer_service::delete_customer(&state, john.customer_id, &john).await;
    assert!(matches!(result, Err(AppError::SelfDeletionForbidden)));

    assert!(customer_service::find_active(&state.orm, john.customer_id).await.unwrap().is_some());
    assert!(favorite_store::exists_active(&state.orm, john.customer_id, 7).await.unwrap());
}

#[tokio::test]
async fn deleting_unknown_customer() {
    let state = common::setup_state(common::default_catalog()).await.unwrap();
    let admin = common::create_customer(&state, "Admin", "admin@example.com").await.unwrap();

    let result = customer_service::delete_customer(&state, 4242, &admin).await;
    assert!(matches!(result, Err(AppError::CustomerNotFound)));
}

#[tokio::test]
async fn failed_customer_update_rolls_back_favorite_cascade() {
    let state = common::setup_state(common::default_catalog()).await.unwrap();
    let john = common::create_customer(&state, "John", "john@example.com").await.unwrap();
    let admin = common::create_customer(&state, "Admin", "admin@example.com").await.unwrap();

    favorite(&state, &john, 1).await;
    favorite(&state, &john, 2).await;

    state
        .orm
        .execute_unprepared(
            "CREATE TRIGGER block_customer_delete BEFORE UPDATE OF deleted_at ON customers \
             WHEN NEW.deleted_at IS NOT NULL \
             BEGIN SELECT RAISE(ABORT, 'customer deletion blocked'); END",
        )
        .await
        .unwrap();

    let result = customer_service::delete_customer(&state, john.customer_id, &admin).await;
    assert!(matches!(result, Err(AppError::OrmError(_))));

    assert_eq!(
        favorite_store::count_active_for_customer(&state.orm, john.customer_id)
            .await
            .unwrap(),
        2
    );
    assert!(customer_service::find_active(&state.orm, john.customer_id).await.unwrap().is_some());
}

#[tokio::test]
async fn deleted_customer_cannot_add_favorites() {
    let state = common::setup_state(common::default_catalog()).await.unwrap();
    let john = common::create_customer(&state, "John", "john@example.com").await.unwrap();
    let admin = common::create_customer(&state, "Admin", "admin@example.com").await.unwrap();

    customer_service::delete_customer(&state, john.customer_id, &admin)
        .await
        .unwrap();

    // A request authenticated just before the deletion reaches the service.
    let result = favorite_service::add_to_favorites(
        &state,
        &john,
        AddFavoriteRequest { product_id: 7 },
    )
    .await;
    assert!(matches!(result, Err(AppError::CustomerNotFound)));
    assert!(!favorite_store::exists_active(&state.orm, john.customer_id, 7).await.unwrap());
}

#[tokio::test]
async fn profile_includes_favorites() {
    let state = common::setup_state(common::default_catalog()).await.unwrap();
    let john = common::create_customer(&state, "John", "john@example.com").await.unwrap();
    favorite(&state, &john, 7).await;

    let profile = customer_service::get_profile(&state, &john).await.unwrap();
    let data = profile.data.unwrap();
    assert_eq!(data.customer.name, "John");
    assert_eq!(data.favorites.len(), 1);
    assert_eq!(
        data.favorites[0].product.as_ref().map(|p| p.title.as_str()),
        Some("Test Product")
    );
}

#[tokio::test]
async fn update_profile_validates_email() {
    let state = common::setup_state(common::default_catalog()).await.unwrap();
    let john = common::create_customer(&state, "John", "john@example.com").await.unwrap();
    common::create_customer(&state, "Jane", "jane@example.com").await.unwrap();

    let taken = customer_service::update_profile(
        &state,
        &john,
        UpdateProfileRequest {
            email: Some("Jane@Example.com".into()),
            ..Default::default()
        },
    )
    .await;
    match taken {
        Err(AppError::BadRequest(message)) => assert_eq!(message, "Email is already taken"),
        other => panic!("expected BadRequest, got {other:?}"),
    }

    let blank = customer_service::update_profile(
        &state,
        &john,
        UpdateProfileRequest {
            name: Some("   ".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(blank, Err(AppError::BadRequest(_))));

    let long_name = customer_service::update_profile(
        &state,
        &john,
        UpdateProfileRequest {
            name: Some("n".repeat(256)),
            ..Default::default()
        },
    )
    .await;
    match long_name {
        Err(AppError::BadRequest(message)) => {
            assert_eq!(message, "name may not be greater than 255 characters")
        }
        other => panic!("expected BadRequest, got {other:?}"),
    }

    let long_email = customer_service::update_profile(
        &state,
        &john,
        UpdateProfileRequest {
            email: Some(format!("{}@example.com", "e".repeat(250))),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(long_email, Err(AppError::BadRequest(_))));

    let updated = customer_service::update_profile(
        &state,
        &john,
        UpdateProfileRequest {
            name: Some(" Johnny ".into()),
            email: Some("johnny@example.com".into()),
        },
    )
    .await
    .unwrap()
    .data
    .unwrap();
    assert_eq!(updated.name, "Johnny");
    assert_eq!(updated.email, "johnny@example.com");
}

#[tokio::test]
async fn list_customers_reports_live_favorite_counts() {
    let state = common::setup_state(common::default_catalog()).await.unwrap();
    let john = common::create_customer(&state, "John", "john@example.com").await.unwrap();
    let jane = common::create_customer(&state, "Jane", "jane@example.com").await.unwrap();

    favorite(&state, &john, 1).await;
    favorite(&state, &john, 2).await;
    favorite(&state, &john, 3).await;
    favorite_service::remove_from_favorites_by_product(&state, &john, 3)
        .await
        .unwrap();

    let list = customer_service::list_customers(&state).await.unwrap();
    assert_eq!(list.meta.unwrap().total, Some(2));
    let items = list.data.unwrap().items;
    let count_of = |id: i32| {
        items
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.favorites_count)
    };
    assert_eq!(count_of(john.customer_id), Some(2));
    assert_eq!(count_of(jane.customer_id), Some(0));
}
